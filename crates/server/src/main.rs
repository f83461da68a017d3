mod api;
mod auth;
mod documents;
mod router;
mod state;
mod users;

use std::sync::Arc;

use tracing::info;

use docstack_core::Config;
use docstack_jobs::{IngestionJobManager, JobStore, MemoryJobStore};

use crate::documents::DocumentStore;
use crate::state::AppState;
use crate::users::UserStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    docstack_core::config::load_dotenv();
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let config = Config::from_env();
    config.log_summary();
    std::fs::create_dir_all(&config.storage.data_dir)?;

    let users = Arc::new(UserStore::new(&config.storage.data_dir)?);
    if let Some(api_key) = users.seed_admin(config.auth.bootstrap_admin_key.clone())? {
        // Shown exactly once; the registry only keeps the digest.
        info!("Seeded admin account — API key: {}", api_key);
    }

    let documents = Arc::new(DocumentStore::new(&config.storage.data_dir)?);

    let job_store: Arc<dyn JobStore> = Arc::new(MemoryJobStore::new());
    let jobs = Arc::new(IngestionJobManager::new(
        job_store.clone(),
        documents.clone(),
        users.clone(),
    ));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState {
        config,
        users,
        documents,
        jobs,
        job_store,
    });

    let app = router::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
