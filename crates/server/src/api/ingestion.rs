//! Ingestion job endpoints: create, list, get, admin force-update, and
//! cancel. Creation schedules the background execution and returns
//! without waiting for it.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use docstack_jobs::{IngestionJob, JobUpdate};

use crate::auth::require_actor;
use crate::state::AppState;

use super::{error_response, ApiError, ErrorResponse};

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateJobRequest {
    /// The document to process.
    #[schema(value_type = String)]
    pub document_id: Uuid,
}

/// Create a new ingestion job
///
/// Validates that the document exists and that the caller may act on it,
/// records the job as pending, and schedules exactly one background
/// execution. The response returns as soon as the job is recorded.
#[utoipa::path(
    post,
    path = "/api/ingestion/jobs",
    tag = "Ingestion",
    request_body = CreateJobRequest,
    responses(
        (status = 201, description = "Ingestion job created", body = Object),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse)
    )
)]
pub async fn jobs_create(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<IngestionJob>), ApiError> {
    let actor = require_actor(&state, &headers)?;
    let job = state
        .jobs
        .create(req.document_id, actor.id)
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// List ingestion jobs
///
/// Admins see all jobs; other callers see only the jobs they started.
/// Ordered newest first.
#[utoipa::path(
    get,
    path = "/api/ingestion/jobs",
    tag = "Ingestion",
    responses(
        (status = 200, description = "Jobs visible to the caller", body = Vec<Object>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn jobs_list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<IngestionJob>>, ApiError> {
    let actor = require_actor(&state, &headers)?;
    Ok(Json(state.jobs.list(&actor)))
}

/// Get an ingestion job by ID
#[utoipa::path(
    get,
    path = "/api/ingestion/jobs/{id}",
    tag = "Ingestion",
    params(("id" = String, Path, description = "Job ID")),
    responses(
        (status = 200, description = "The ingestion job", body = Object),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Job not found", body = ErrorResponse)
    )
)]
pub async fn jobs_get(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<IngestionJob>, ApiError> {
    let actor = require_actor(&state, &headers)?;
    let job = state.jobs.get(id, &actor).map_err(error_response)?;
    Ok(Json(job))
}

/// Force-update an ingestion job (admin only)
///
/// May set status and/or output with no transition checks: an operator
/// escape hatch, separate from the automatic driver transitions.
#[utoipa::path(
    patch,
    path = "/api/ingestion/jobs/{id}",
    tag = "Ingestion",
    params(("id" = String, Path, description = "Job ID")),
    request_body = Object,
    responses(
        (status = 200, description = "Updated job", body = Object),
        (status = 401, description = "Not an administrator", body = ErrorResponse),
        (status = 404, description = "Job not found", body = ErrorResponse)
    )
)]
pub async fn jobs_update(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(update): Json<JobUpdate>,
) -> Result<Json<IngestionJob>, ApiError> {
    let actor = require_actor(&state, &headers)?;
    let job = state
        .jobs
        .update(id, update, &actor)
        .map_err(error_response)?;
    Ok(Json(job))
}

/// Cancel an ingestion job
///
/// Only pending or processing jobs can be cancelled, by their starter or
/// an admin. Cancellation claims the terminal state; a concurrent driver
/// finalization that loses the race leaves the record untouched.
#[utoipa::path(
    delete,
    path = "/api/ingestion/jobs/{id}/cancel",
    tag = "Ingestion",
    params(("id" = String, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Cancelled job", body = Object),
        (status = 400, description = "Job already terminal", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Job not found", body = ErrorResponse),
        (status = 409, description = "Lost the race against finalization", body = ErrorResponse)
    )
)]
pub async fn jobs_cancel(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<IngestionJob>, ApiError> {
    let actor = require_actor(&state, &headers)?;
    let job = state.jobs.cancel(id, &actor).map_err(error_response)?;
    Ok(Json(job))
}

/// List ingestion jobs for a document
///
/// Authorization is against the document's owner: the owner sees every
/// job on their document, including jobs started by someone else.
#[utoipa::path(
    get,
    path = "/api/documents/{id}/jobs",
    tag = "Ingestion",
    params(("id" = String, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Jobs for the document", body = Vec<Object>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse)
    )
)]
pub async fn jobs_by_document(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<IngestionJob>>, ApiError> {
    let actor = require_actor(&state, &headers)?;
    let jobs = state
        .jobs
        .list_by_document(id, &actor)
        .map_err(error_response)?;
    Ok(Json(jobs))
}
