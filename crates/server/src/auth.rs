//! Request authentication: `Authorization: Bearer <api-key>` resolved
//! against the user registry.

use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;

use docstack_core::Actor;

use crate::api::ErrorResponse;
use crate::state::AppState;

/// Resolve the calling actor, or reject with 401.
///
/// Handlers call this first, the way the data-loading guard works in the
/// rest of the API: one helper, one rejection shape.
pub fn require_actor(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Actor, (StatusCode, Json<ErrorResponse>)> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| unauthorized("Missing or malformed Authorization header"))?;

    state
        .users
        .authenticate(token)
        .ok_or_else(|| unauthorized("Invalid API key"))
}

fn unauthorized(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}
