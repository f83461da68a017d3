use std::sync::Arc;

use docstack_core::Config;
use docstack_jobs::{IngestionJobManager, JobStore};

use crate::documents::DocumentStore;
use crate::users::UserStore;

pub struct AppState {
    pub config: Config,
    pub users: Arc<UserStore>,
    pub documents: Arc<DocumentStore>,
    pub jobs: Arc<IngestionJobManager>,
    /// Direct store handle, used for operational counts.
    pub job_store: Arc<dyn JobStore>,
}
