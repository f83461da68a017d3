//! HTTP router construction.
//!
//! Assembles all Axum routes, middleware, and OpenAPI docs into a single
//! `Router`.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get};
use axum::Router;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::api;
use crate::state::AppState;

/// Build the complete application router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(api::health::health))
        // Users
        .route(
            "/api/users",
            get(api::users::users_list).post(api::users::users_create),
        )
        .route(
            "/api/users/{id}",
            get(api::users::users_get)
                .put(api::users::users_update)
                .delete(api::users::users_delete),
        )
        // Documents
        .route(
            "/api/documents",
            get(api::documents::documents_list).post(
                api::documents::documents_upload,
            ),
        )
        .route(
            "/api/documents/{id}",
            get(api::documents::documents_get)
                .put(api::documents::documents_update)
                .delete(api::documents::documents_delete),
        )
        .route(
            "/api/documents/{id}/download",
            get(api::documents::documents_download),
        )
        .route(
            "/api/documents/{id}/jobs",
            get(api::ingestion::jobs_by_document),
        )
        // Ingestion jobs
        .route(
            "/api/ingestion/jobs",
            get(api::ingestion::jobs_list).post(api::ingestion::jobs_create),
        )
        .route(
            "/api/ingestion/jobs/{id}",
            get(api::ingestion::jobs_get).patch(api::ingestion::jobs_update),
        )
        .route(
            "/api/ingestion/jobs/{id}/cancel",
            delete(api::ingestion::jobs_cancel),
        )
        .layer(DefaultBodyLimit::max(50 * 1024 * 1024))
        .layer(CorsLayer::permissive())
        .with_state(state)
        .merge(Scalar::with_url("/docs", api::doc::ApiDoc::openapi()))
}
