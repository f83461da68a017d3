//! HTTP API: handlers grouped by resource, shared error shape, and the
//! OpenAPI aggregator.

pub mod doc;
pub mod documents;
pub mod health;
pub mod ingestion;
pub mod users;

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use docstack_core::DocstackError;

/// Error body returned by every non-2xx response.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map a core error to its HTTP rejection.
pub(crate) fn error_response(err: DocstackError) -> ApiError {
    let status = match &err {
        DocstackError::DocumentNotFound(_)
        | DocstackError::JobNotFound(_)
        | DocstackError::UserNotFound(_) => StatusCode::NOT_FOUND,
        DocstackError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DocstackError::InvalidState(_) => StatusCode::BAD_REQUEST,
        DocstackError::Conflict(_) => StatusCode::CONFLICT,
        DocstackError::Io(_) | DocstackError::Serialize(_) | DocstackError::Other(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}
