//! The ingestion job façade: creates jobs against existing documents,
//! hands them to the execution driver, and gates every read/mutate/cancel
//! path behind the authorization predicate.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use docstack_core::{Actor, DocstackError};

use crate::authz;
use crate::directory::{DocumentDirectory, IdentityDirectory};
use crate::driver::{JobDriver, CANCELLED_OUTPUT};
use crate::job::{IngestionJob, JobPatch, JobStatus, JobUpdate, NewJob};
use crate::store::JobStore;

pub struct IngestionJobManager {
    store: Arc<dyn JobStore>,
    documents: Arc<dyn DocumentDirectory>,
    identity: Arc<dyn IdentityDirectory>,
    driver: Arc<JobDriver>,
}

impl IngestionJobManager {
    pub fn new(
        store: Arc<dyn JobStore>,
        documents: Arc<dyn DocumentDirectory>,
        identity: Arc<dyn IdentityDirectory>,
    ) -> Self {
        let driver = Arc::new(JobDriver::new(store.clone(), documents.clone()));
        Self::with_driver(store, documents, identity, driver)
    }

    /// Manager with an explicit driver (tests pass one with a short delay
    /// and a pinned outcome).
    pub fn with_driver(
        store: Arc<dyn JobStore>,
        documents: Arc<dyn DocumentDirectory>,
        identity: Arc<dyn IdentityDirectory>,
        driver: Arc<JobDriver>,
    ) -> Self {
        Self {
            store,
            documents,
            identity,
            driver,
        }
    }

    /// Create a job for `document_id` on behalf of `actor_id`.
    ///
    /// The document must exist, the actor must resolve to an active user,
    /// and the actor must be admin or the document owner. The background
    /// execution is scheduled exactly once and not awaited; the call
    /// returns as soon as the job is recorded.
    pub fn create(&self, document_id: Uuid, actor_id: Uuid) -> Result<IngestionJob, DocstackError> {
        let document = self.documents.get(document_id)?;

        let user = self.identity.resolve(actor_id).map_err(|e| {
            if e.is_not_found() {
                DocstackError::Unauthorized("User not found".to_string())
            } else {
                e
            }
        })?;
        if !user.is_active {
            return Err(DocstackError::Unauthorized(
                "User account is disabled".to_string(),
            ));
        }

        let actor = Actor::new(user.id, user.role);
        if !authz::can_access_document(&actor, &document) {
            return Err(DocstackError::Unauthorized(
                "You do not have permission to create an ingestion job for this document"
                    .to_string(),
            ));
        }

        let job = self.store.insert(NewJob {
            document_id,
            started_by: actor_id,
        })?;
        info!(job_id = %job.id, document_id = %document_id, "ingestion job created");

        self.driver.spawn(job.id);

        Ok(job)
    }

    /// Fetch a single job. Existence is checked before authorization, so
    /// an unauthorized caller probing a missing id still sees not-found.
    pub fn get(&self, id: Uuid, actor: &Actor) -> Result<IngestionJob, DocstackError> {
        let job = self.store.get(id)?;
        if !authz::can_access_job(actor, &job) {
            return Err(DocstackError::Unauthorized(
                "You do not have permission to access this ingestion job".to_string(),
            ));
        }
        Ok(job)
    }

    /// All jobs visible to `actor`, newest first. Admins see everything;
    /// everyone else sees only the jobs they started.
    pub fn list(&self, actor: &Actor) -> Vec<IngestionJob> {
        if actor.is_admin() {
            self.store.list_all()
        } else {
            self.store.list_by_owner(actor.id)
        }
    }

    /// All jobs for a document, newest first. Authorization is against
    /// the document's owner, not each job's starter: the document owner
    /// sees every job on their document, including jobs started by
    /// someone else.
    pub fn list_by_document(
        &self,
        document_id: Uuid,
        actor: &Actor,
    ) -> Result<Vec<IngestionJob>, DocstackError> {
        let document = self.documents.get(document_id)?;
        if !authz::can_access_document(actor, &document) {
            return Err(DocstackError::Unauthorized(
                "You do not have permission to view ingestion jobs for this document".to_string(),
            ));
        }
        Ok(self.store.list_by_document(document_id))
    }

    /// Admin-only force update of status and/or output. No transition
    /// legality is enforced here: this is the operator escape hatch,
    /// distinct from the automatic driver transitions.
    pub fn update(
        &self,
        id: Uuid,
        update: JobUpdate,
        actor: &Actor,
    ) -> Result<IngestionJob, DocstackError> {
        if !actor.is_admin() {
            return Err(DocstackError::Unauthorized(
                "Only administrators can update ingestion jobs".to_string(),
            ));
        }
        // Existence check first so a missing id reports not-found rather
        // than a store-level conflict.
        self.store.get(id)?;
        self.store.conditional_update(
            id,
            &|_| true,
            JobPatch {
                status: update.status,
                completed_at: None,
                output: update.output,
            },
        )
    }

    /// Cancel a pending or processing job. The terminal write is guarded,
    /// so it races safely with the driver's finalization: whichever side
    /// lands second sees a conflict and leaves the record alone.
    pub fn cancel(&self, id: Uuid, actor: &Actor) -> Result<IngestionJob, DocstackError> {
        let job = self.store.get(id)?;

        if !authz::can_access_job(actor, &job) {
            return Err(DocstackError::Unauthorized(
                "You do not have permission to cancel this ingestion job".to_string(),
            ));
        }

        if job.status.is_terminal() {
            return Err(DocstackError::InvalidState(format!(
                "Cannot cancel job with status {:?}",
                job.status
            )));
        }

        let cancelled = self.store.conditional_update(
            id,
            &|j| !j.status.is_terminal(),
            JobPatch::finalize(JobStatus::Failed, CANCELLED_OUTPUT.to_string()),
        )?;
        info!(job_id = %id, "ingestion job cancelled");
        Ok(cancelled)
    }
}
