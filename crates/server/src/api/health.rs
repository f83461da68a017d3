use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use docstack_jobs::JobStore;

use crate::state::AppState;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub user_count: usize,
    pub document_count: usize,
    pub job_count: usize,
}

/// Server health and record counts
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Server is up", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        user_count: state.users.list().len(),
        document_count: state.documents.list_all().len(),
        job_count: state.job_store.list_all().len(),
    })
}
