//! Background execution driver — one spawned task per ingestion job.
//!
//! [`JobDriver::spawn`] is the entry point: it hands the job id to a
//! tokio task and returns immediately; the creating request never waits
//! on it. The task moves the job to `Processing`, waits out the simulated
//! processing delay, then performs exactly one finalizing write through
//! the store's conditional update. A job that was cancelled in the
//! meantime is already terminal, so the guarded write comes back as a
//! conflict and the record is left untouched.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use docstack_core::DocstackError;

use crate::directory::DocumentDirectory;
use crate::job::{IngestionJob, JobPatch, JobStatus};
use crate::store::JobStore;

/// Fixed simulated processing time per job.
pub const PROCESSING_DELAY: Duration = Duration::from_secs(5);

/// Fraction of jobs that complete successfully.
const SUCCESS_RATE: f64 = 0.8;

/// Output written when a job is cancelled.
pub const CANCELLED_OUTPUT: &str = "Job was cancelled by user";

const FAILURE_OUTPUT: &str = "Failed to process document. Error: Could not parse file format.";

/// Schedules and runs the background state transitions for single jobs.
pub struct JobDriver {
    store: Arc<dyn JobStore>,
    documents: Arc<dyn DocumentDirectory>,
    delay: Duration,
    success_rate: f64,
}

impl JobDriver {
    pub fn new(store: Arc<dyn JobStore>, documents: Arc<dyn DocumentDirectory>) -> Self {
        Self::with_timing(store, documents, PROCESSING_DELAY, SUCCESS_RATE)
    }

    /// Driver with explicit delay and success rate. Tests use this to
    /// shorten the delay and pin the outcome; production wiring goes
    /// through [`JobDriver::new`].
    pub fn with_timing(
        store: Arc<dyn JobStore>,
        documents: Arc<dyn DocumentDirectory>,
        delay: Duration,
        success_rate: f64,
    ) -> Self {
        Self {
            store,
            documents,
            delay,
            success_rate,
        }
    }

    /// Spawn the execution for `job_id` as a fire-and-forget task.
    ///
    /// Failures inside the task are captured into the job record itself;
    /// nothing propagates to the caller and nothing is retried.
    pub fn spawn(self: &Arc<Self>, job_id: Uuid) {
        let driver = Arc::clone(self);
        tokio::spawn(async move {
            driver.run(job_id).await;
        });
    }

    async fn run(&self, job_id: Uuid) {
        // Pending → Processing. A conflict here means the job was
        // cancelled before execution started: skip entirely.
        let job = match self.store.conditional_update(
            job_id,
            &|j| j.status == JobStatus::Pending,
            JobPatch::status(JobStatus::Processing),
        ) {
            Ok(job) => job,
            Err(DocstackError::Conflict(_)) => {
                debug!(job_id = %job_id, "job no longer pending — skipping execution");
                return;
            }
            Err(e) => {
                warn!(job_id = %job_id, error = %e, "failed to start job execution");
                return;
            }
        };

        tokio::time::sleep(self.delay).await;

        let patch = self.outcome_patch(&job);
        self.finalize(job_id, patch);
    }

    /// Build the terminal patch: weighted random success referencing the
    /// document title, fixed failure text otherwise. A document lookup
    /// fault is folded into a failure patch so finalize still performs
    /// exactly one write.
    fn outcome_patch(&self, job: &IngestionJob) -> JobPatch {
        let success = rand::thread_rng().gen_bool(self.success_rate);
        if !success {
            return JobPatch::finalize(JobStatus::Failed, FAILURE_OUTPUT.to_string());
        }

        match self.documents.get(job.document_id) {
            Ok(document) => JobPatch::finalize(
                JobStatus::Completed,
                format!(
                    "Successfully processed {}. Extracted content and metadata.",
                    document.title
                ),
            ),
            Err(e) => JobPatch::finalize(
                JobStatus::Failed,
                format!("Error processing job: {}", e),
            ),
        }
    }

    /// The single finalizing write, guarded on "not already terminal".
    /// A conflict means someone else (cancel, or an admin) got there
    /// first; terminal states are never overwritten.
    fn finalize(&self, job_id: Uuid, patch: JobPatch) {
        let status = patch.status;
        match self
            .store
            .conditional_update(job_id, &|j| !j.status.is_terminal(), patch)
        {
            Ok(job) => match job.status {
                JobStatus::Completed => {
                    info!(job_id = %job_id, "ingestion job completed successfully");
                }
                _ => {
                    error!(
                        job_id = %job_id,
                        output = job.output.as_deref().unwrap_or(""),
                        "ingestion job failed"
                    );
                }
            },
            Err(DocstackError::Conflict(_)) => {
                debug!(job_id = %job_id, "job already finalized — leaving record untouched");
            }
            Err(e) => {
                warn!(
                    job_id = %job_id,
                    error = %e,
                    status = ?status,
                    "failed to finalize ingestion job"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::DocumentRef;
    use crate::job::NewJob;
    use crate::store::MemoryJobStore;
    use std::collections::HashMap;

    struct FixedDocs(HashMap<Uuid, DocumentRef>);

    impl DocumentDirectory for FixedDocs {
        fn get(&self, id: Uuid) -> Result<DocumentRef, DocstackError> {
            self.0
                .get(&id)
                .cloned()
                .ok_or(DocstackError::DocumentNotFound(id))
        }
    }

    fn setup(
        delay: Duration,
        success_rate: f64,
    ) -> (Arc<MemoryJobStore>, Arc<JobDriver>, Uuid) {
        let store = Arc::new(MemoryJobStore::new());
        let doc_id = Uuid::new_v4();
        let mut docs = HashMap::new();
        docs.insert(
            doc_id,
            DocumentRef {
                id: doc_id,
                owner: Uuid::new_v4(),
                title: "quarterly-report.pdf".to_string(),
            },
        );
        let driver = Arc::new(JobDriver::with_timing(
            store.clone(),
            Arc::new(FixedDocs(docs)),
            delay,
            success_rate,
        ));
        (store, driver, doc_id)
    }

    #[tokio::test]
    async fn test_successful_run_completes_with_title_in_output() {
        let (store, driver, doc_id) = setup(Duration::from_millis(10), 1.0);
        let job = store
            .insert(NewJob {
                document_id: doc_id,
                started_by: Uuid::new_v4(),
            })
            .unwrap();

        driver.spawn(job.id);
        tokio::time::sleep(Duration::from_millis(100)).await;

        let done = store.get(job.id).unwrap();
        assert_eq!(done.status, JobStatus::Completed);
        assert!(done.completed_at.is_some());
        assert!(done.output.unwrap().contains("quarterly-report.pdf"));
    }

    #[tokio::test]
    async fn test_failed_run_writes_failure_output() {
        let (store, driver, doc_id) = setup(Duration::from_millis(10), 0.0);
        let job = store
            .insert(NewJob {
                document_id: doc_id,
                started_by: Uuid::new_v4(),
            })
            .unwrap();

        driver.spawn(job.id);
        tokio::time::sleep(Duration::from_millis(100)).await;

        let done = store.get(job.id).unwrap();
        assert_eq!(done.status, JobStatus::Failed);
        assert!(done.completed_at.is_some());
        assert_eq!(done.output.as_deref(), Some(FAILURE_OUTPUT));
    }

    #[tokio::test]
    async fn test_driver_skips_job_cancelled_before_start() {
        let (store, driver, doc_id) = setup(Duration::from_millis(10), 1.0);
        let job = store
            .insert(NewJob {
                document_id: doc_id,
                started_by: Uuid::new_v4(),
            })
            .unwrap();

        // Cancel lands before the driver even starts.
        store
            .conditional_update(
                job.id,
                &|j| !j.status.is_terminal(),
                JobPatch::finalize(JobStatus::Failed, CANCELLED_OUTPUT.to_string()),
            )
            .unwrap();

        driver.spawn(job.id);
        tokio::time::sleep(Duration::from_millis(100)).await;

        let current = store.get(job.id).unwrap();
        assert_eq!(current.status, JobStatus::Failed);
        assert_eq!(current.output.as_deref(), Some(CANCELLED_OUTPUT));
    }

    #[tokio::test]
    async fn test_driver_never_overwrites_terminal_record() {
        let (store, driver, doc_id) = setup(Duration::from_millis(50), 1.0);
        let job = store
            .insert(NewJob {
                document_id: doc_id,
                started_by: Uuid::new_v4(),
            })
            .unwrap();

        driver.spawn(job.id);
        // Let the driver move the job to Processing, then cancel mid-flight.
        tokio::time::sleep(Duration::from_millis(20)).await;
        let cancelled = store
            .conditional_update(
                job.id,
                &|j| !j.status.is_terminal(),
                JobPatch::finalize(JobStatus::Failed, CANCELLED_OUTPUT.to_string()),
            )
            .unwrap();
        assert_eq!(cancelled.status, JobStatus::Failed);
        let cancelled_at = cancelled.completed_at;

        // The deferred finalization fires after cancellation and must be
        // a no-op.
        tokio::time::sleep(Duration::from_millis(120)).await;
        let current = store.get(job.id).unwrap();
        assert_eq!(current.status, JobStatus::Failed);
        assert_eq!(current.output.as_deref(), Some(CANCELLED_OUTPUT));
        assert_eq!(current.completed_at, cancelled_at);
    }

    #[tokio::test]
    async fn test_vanished_document_fails_the_job() {
        let store = Arc::new(MemoryJobStore::new());
        // Directory that knows no documents, mimicking the document
        // being deleted while the job is in flight.
        let driver = Arc::new(JobDriver::with_timing(
            store.clone(),
            Arc::new(FixedDocs(HashMap::new())),
            Duration::from_millis(10),
            1.0,
        ));
        let job = store
            .insert(NewJob {
                document_id: Uuid::new_v4(),
                started_by: Uuid::new_v4(),
            })
            .unwrap();

        driver.spawn(job.id);
        tokio::time::sleep(Duration::from_millis(100)).await;

        let done = store.get(job.id).unwrap();
        assert_eq!(done.status, JobStatus::Failed);
        assert!(done.completed_at.is_some());
        assert!(done.output.unwrap().starts_with("Error processing job:"));
    }
}
