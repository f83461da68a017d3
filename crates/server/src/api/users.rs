//! User management endpoints. All of them are admin-only; the created
//! API key is returned exactly once.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use uuid::Uuid;

use docstack_core::{Actor, DocstackError};

use crate::auth::require_actor;
use crate::state::AppState;
use crate::users::{CreatedUser, UserInput, UserSafe, UserUpdate};

use super::{error_response, ApiError, ErrorResponse};

fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<Actor, ApiError> {
    let actor = require_actor(state, headers)?;
    if !actor.is_admin() {
        return Err(error_response(DocstackError::Unauthorized(
            "Only administrators can manage users".to_string(),
        )));
    }
    Ok(actor)
}

/// Create a user (admin only)
///
/// The response contains the plaintext API key; it is not retrievable
/// afterwards.
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = UserInput,
    responses(
        (status = 201, description = "User created, API key included once", body = CreatedUser),
        (status = 401, description = "Not an administrator", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
pub async fn users_create(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(input): Json<UserInput>,
) -> Result<(StatusCode, Json<CreatedUser>), ApiError> {
    require_admin(&state, &headers)?;
    let (user, api_key) = state.users.create(&input).map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(CreatedUser { user, api_key })))
}

/// List active users (admin only)
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "Active users", body = Vec<UserSafe>),
        (status = 401, description = "Not an administrator", body = ErrorResponse)
    )
)]
pub async fn users_list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<UserSafe>>, ApiError> {
    require_admin(&state, &headers)?;
    Ok(Json(state.users.list()))
}

/// Get a user by ID (admin only)
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "The user", body = UserSafe),
        (status = 401, description = "Not an administrator", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn users_get(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<UserSafe>, ApiError> {
    require_admin(&state, &headers)?;
    let user = state.users.get(id).map_err(error_response)?;
    Ok(Json(user))
}

/// Update a user (admin only)
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ID")),
    request_body = UserUpdate,
    responses(
        (status = 200, description = "Updated user", body = UserSafe),
        (status = 401, description = "Not an administrator", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
pub async fn users_update(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(update): Json<UserUpdate>,
) -> Result<Json<UserSafe>, ApiError> {
    require_admin(&state, &headers)?;
    let user = state.users.update(id, &update).map_err(error_response)?;
    Ok(Json(user))
}

/// Deactivate a user (admin only)
///
/// Soft delete: the account stops authenticating but its id remains
/// resolvable for existing job records.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Deactivated user", body = UserSafe),
        (status = 401, description = "Not an administrator", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn users_delete(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<UserSafe>, ApiError> {
    require_admin(&state, &headers)?;
    let user = state.users.deactivate(id).map_err(error_response)?;
    Ok(Json(user))
}
