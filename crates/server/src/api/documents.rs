//! Document endpoints: multipart upload, CRUD, and download. The
//! admin-or-owner rule is applied here, before the store is touched.

use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use docstack_core::{Actor, DocstackError};
use docstack_jobs::authz;

use crate::auth::require_actor;
use crate::documents::{DocumentMeta, DocumentUpdate};
use crate::state::AppState;

use super::{error_response, ApiError, ErrorResponse};

/// Fetch a document and enforce the admin-or-owner rule.
fn get_authorized(
    state: &AppState,
    id: Uuid,
    actor: &Actor,
) -> Result<DocumentMeta, DocstackError> {
    let meta = state.documents.get_meta(id)?;
    if !authz::can_access_document(actor, &meta.to_ref()) {
        return Err(DocstackError::Unauthorized(
            "You do not have permission to access this document".to_string(),
        ));
    }
    Ok(meta)
}

/// Upload a document
///
/// multipart/form-data with a `file` field plus optional `title` and
/// `description` text fields. Title defaults to the uploaded file name.
#[utoipa::path(
    post,
    path = "/api/documents",
    tag = "Documents",
    request_body(content_type = "multipart/form-data", description = "File upload with optional title/description"),
    responses(
        (status = 201, description = "Document stored", body = DocumentMeta),
        (status = 400, description = "Malformed upload", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn documents_upload(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<DocumentMeta>), ApiError> {
    let actor = require_actor(&state, &headers)?;

    let mut title: Option<String> = None;
    let mut description: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        bad_request(format!("Multipart error: {}", e))
    })? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => {
                title = Some(field.text().await.map_err(|e| {
                    bad_request(format!("Failed to read title field: {}", e))
                })?);
            }
            "description" => {
                description = Some(field.text().await.map_err(|e| {
                    bad_request(format!("Failed to read description field: {}", e))
                })?);
            }
            "file" => {
                let file_name = field.file_name().unwrap_or("unnamed").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    bad_request(format!("Failed to read file: {}", e))
                })?;
                file = Some((file_name, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let (original_name, bytes) =
        file.ok_or_else(|| bad_request("No file provided".to_string()))?;
    let title = title.unwrap_or_else(|| original_name.clone());

    let meta = state
        .documents
        .create(&title, description, &original_name, &bytes, actor.id)
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(meta)))
}

/// List documents
///
/// Admins see all documents; other callers see only their own. Newest
/// first.
#[utoipa::path(
    get,
    path = "/api/documents",
    tag = "Documents",
    responses(
        (status = 200, description = "Documents visible to the caller", body = Vec<DocumentMeta>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn documents_list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<DocumentMeta>>, ApiError> {
    let actor = require_actor(&state, &headers)?;
    let docs = if actor.is_admin() {
        state.documents.list_all()
    } else {
        state.documents.list_by_owner(actor.id)
    };
    Ok(Json(docs))
}

/// Get a document by ID
#[utoipa::path(
    get,
    path = "/api/documents/{id}",
    tag = "Documents",
    params(("id" = String, Path, description = "Document ID")),
    responses(
        (status = 200, description = "The document", body = DocumentMeta),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse)
    )
)]
pub async fn documents_get(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentMeta>, ApiError> {
    let actor = require_actor(&state, &headers)?;
    let meta = get_authorized(&state, id, &actor).map_err(error_response)?;
    Ok(Json(meta))
}

/// Update document metadata
#[utoipa::path(
    put,
    path = "/api/documents/{id}",
    tag = "Documents",
    params(("id" = String, Path, description = "Document ID")),
    request_body = DocumentUpdate,
    responses(
        (status = 200, description = "Updated document", body = DocumentMeta),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse)
    )
)]
pub async fn documents_update(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(update): Json<DocumentUpdate>,
) -> Result<Json<DocumentMeta>, ApiError> {
    let actor = require_actor(&state, &headers)?;
    get_authorized(&state, id, &actor).map_err(error_response)?;
    let meta = state
        .documents
        .update(id, &update)
        .map_err(error_response)?;
    Ok(Json(meta))
}

/// Delete a document
#[utoipa::path(
    delete,
    path = "/api/documents/{id}",
    tag = "Documents",
    params(("id" = String, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Deleted document", body = DocumentMeta),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse)
    )
)]
pub async fn documents_delete(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentMeta>, ApiError> {
    let actor = require_actor(&state, &headers)?;
    get_authorized(&state, id, &actor).map_err(error_response)?;
    let meta = state.documents.delete(id).map_err(error_response)?;
    Ok(Json(meta))
}

/// Download the stored bytes of a document
#[utoipa::path(
    get,
    path = "/api/documents/{id}/download",
    tag = "Documents",
    params(("id" = String, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Raw document bytes"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Document or file not found", body = ErrorResponse)
    )
)]
pub async fn documents_download(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = require_actor(&state, &headers)?;
    let meta = get_authorized(&state, id, &actor).map_err(error_response)?;

    let path = state.documents.file_path(&meta);
    let bytes = tokio::fs::read(&path).await.map_err(|_| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Document file not found on server".to_string(),
            }),
        )
    })?;

    let disposition = format!("attachment; filename=\"{}\"", meta.original_name);
    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

fn bad_request(message: String) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse { error: message }),
    )
}
