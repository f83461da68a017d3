//! OpenAPI documentation aggregator.
//!
//! Collects all `#[utoipa::path]`-annotated handlers and `ToSchema`-derived
//! types into a single OpenAPI spec, served via Scalar UI at `/docs`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "docstack API",
        version = "0.1.0",
        description = "Document service with asynchronous ingestion jobs and role-based visibility.",
    ),
    tags(
        (name = "Health", description = "Server readiness and record counts"),
        (name = "Users", description = "User registry CRUD with one-time API keys (admin only)"),
        (name = "Documents", description = "Document upload, metadata CRUD, and download"),
        (name = "Ingestion", description = "Asynchronous ingestion job lifecycle: create, list, inspect, force-update, cancel"),
    ),
    paths(
        // Health
        crate::api::health::health,
        // Users
        crate::api::users::users_create,
        crate::api::users::users_list,
        crate::api::users::users_get,
        crate::api::users::users_update,
        crate::api::users::users_delete,
        // Documents
        crate::api::documents::documents_upload,
        crate::api::documents::documents_list,
        crate::api::documents::documents_get,
        crate::api::documents::documents_update,
        crate::api::documents::documents_delete,
        crate::api::documents::documents_download,
        // Ingestion
        crate::api::ingestion::jobs_create,
        crate::api::ingestion::jobs_list,
        crate::api::ingestion::jobs_get,
        crate::api::ingestion::jobs_update,
        crate::api::ingestion::jobs_cancel,
        crate::api::ingestion::jobs_by_document,
    ),
    components(schemas(
        crate::api::ErrorResponse,
        crate::api::health::HealthResponse,
        crate::api::ingestion::CreateJobRequest,
        crate::users::UserInput,
        crate::users::UserUpdate,
        crate::users::UserSafe,
        crate::users::CreatedUser,
        crate::documents::DocumentMeta,
        crate::documents::DocumentUpdate,
        docstack_core::Role,
    ))
)]
pub struct ApiDoc;
