//! Type definitions for ingestion jobs: status enum, the job record, and
//! the insert/patch shapes consumed by the job record store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current status of an ingestion job.
///
/// Moves forward only: `Pending → Processing → {Completed, Failed}`.
/// `Failed` is also reachable directly via cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Terminal jobs never change again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// One asynchronous ingestion attempt against a single document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionJob {
    pub id: Uuid,
    pub document_id: Uuid,
    /// The actor who started the job.
    pub started_by: Uuid,
    pub status: JobStatus,
    pub started_at: DateTime<Utc>,
    /// Set exactly once, when the job reaches a terminal state.
    pub completed_at: Option<DateTime<Utc>>,
    /// Human-readable result or error text.
    pub output: Option<String>,
}

/// Insert shape. The store assigns `id`, `started_at`, and the initial
/// `Pending` status.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub document_id: Uuid,
    pub started_by: Uuid,
}

/// Field-wise patch applied by [`conditional_update`].
///
/// `None` fields are left untouched.
///
/// [`conditional_update`]: crate::store::JobStore::conditional_update
#[derive(Debug, Clone, Default)]
pub struct JobPatch {
    pub status: Option<JobStatus>,
    pub completed_at: Option<DateTime<Utc>>,
    pub output: Option<String>,
}

impl JobPatch {
    /// Patch that only moves the status.
    pub fn status(status: JobStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Terminal patch: status + completion timestamp + output in one write.
    pub fn finalize(status: JobStatus, output: String) -> Self {
        Self {
            status: Some(status),
            completed_at: Some(Utc::now()),
            output: Some(output),
        }
    }
}

/// Admin force-update payload: may set status and/or output, with no
/// transition legality checks (escape hatch, distinct from the automatic
/// driver transitions).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobUpdate {
    pub status: Option<JobStatus>,
    pub output: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_status_serde() {
        for (variant, expected) in [
            (JobStatus::Pending, "pending"),
            (JobStatus::Processing, "processing"),
            (JobStatus::Completed, "completed"),
            (JobStatus::Failed, "failed"),
        ] {
            let json = serde_json::to_string(&variant).unwrap();
            assert_eq!(json, format!("\"{}\"", expected));
            let parsed: JobStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, variant);
        }
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn test_finalize_patch_sets_completion() {
        let patch = JobPatch::finalize(JobStatus::Completed, "done".to_string());
        assert_eq!(patch.status, Some(JobStatus::Completed));
        assert!(patch.completed_at.is_some());
        assert_eq!(patch.output.as_deref(), Some("done"));

        let patch = JobPatch::status(JobStatus::Processing);
        assert!(patch.completed_at.is_none());
        assert!(patch.output.is_none());
    }
}
