//! Job record store contract and the in-memory implementation.
//!
//! The store is the only shared mutable resource in the job lifecycle.
//! Terminal writes go through [`JobStore::conditional_update`], a single
//! atomic read-modify-write keyed by job id, which is what makes the
//! cancel/finalize race safe without any locking in the callers.

use std::sync::RwLock;

use chrono::Utc;
use indexmap::IndexMap;
use uuid::Uuid;

use docstack_core::DocstackError;

use crate::job::{IngestionJob, JobPatch, JobStatus, NewJob};

/// Durable keyed storage for job records.
pub trait JobStore: Send + Sync {
    /// Persist a new job with an assigned id, `Pending` status, and
    /// `started_at = now`.
    fn insert(&self, new: NewJob) -> Result<IngestionJob, DocstackError>;

    /// Fails with `JobNotFound` if absent.
    fn get(&self, id: Uuid) -> Result<IngestionJob, DocstackError>;

    /// All jobs, `started_at` descending.
    fn list_all(&self) -> Vec<IngestionJob>;

    /// Jobs started by `owner`, `started_at` descending.
    fn list_by_owner(&self, owner: Uuid) -> Vec<IngestionJob>;

    /// Jobs targeting `document_id`, `started_at` descending.
    fn list_by_document(&self, document_id: Uuid) -> Vec<IngestionJob>;

    /// Atomic read-modify-write: apply `patch` only if `predicate` holds
    /// for the current record. Fails with `JobNotFound` if the record is
    /// absent and `Conflict` if the predicate rejects the current state.
    fn conditional_update(
        &self,
        id: Uuid,
        predicate: &dyn Fn(&IngestionJob) -> bool,
        patch: JobPatch,
    ) -> Result<IngestionJob, DocstackError>;
}

/// In-memory job store.
///
/// Uses `IndexMap` to preserve insertion order while allowing O(1)
/// lookups by job ID; list operations still sort explicitly so the
/// ordering contract does not lean on insertion order.
#[derive(Debug, Default)]
pub struct MemoryJobStore {
    jobs: RwLock<IndexMap<Uuid, IngestionJob>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted_desc(mut jobs: Vec<IngestionJob>) -> Vec<IngestionJob> {
        jobs.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        jobs
    }
}

impl JobStore for MemoryJobStore {
    fn insert(&self, new: NewJob) -> Result<IngestionJob, DocstackError> {
        let job = IngestionJob {
            id: Uuid::new_v4(),
            document_id: new.document_id,
            started_by: new.started_by,
            status: JobStatus::Pending,
            started_at: Utc::now(),
            completed_at: None,
            output: None,
        };
        let mut jobs = self.jobs.write().expect("job store lock poisoned");
        jobs.insert(job.id, job.clone());
        Ok(job)
    }

    fn get(&self, id: Uuid) -> Result<IngestionJob, DocstackError> {
        let jobs = self.jobs.read().expect("job store lock poisoned");
        jobs.get(&id)
            .cloned()
            .ok_or(DocstackError::JobNotFound(id))
    }

    fn list_all(&self) -> Vec<IngestionJob> {
        let jobs = self.jobs.read().expect("job store lock poisoned");
        Self::sorted_desc(jobs.values().cloned().collect())
    }

    fn list_by_owner(&self, owner: Uuid) -> Vec<IngestionJob> {
        let jobs = self.jobs.read().expect("job store lock poisoned");
        Self::sorted_desc(
            jobs.values()
                .filter(|j| j.started_by == owner)
                .cloned()
                .collect(),
        )
    }

    fn list_by_document(&self, document_id: Uuid) -> Vec<IngestionJob> {
        let jobs = self.jobs.read().expect("job store lock poisoned");
        Self::sorted_desc(
            jobs.values()
                .filter(|j| j.document_id == document_id)
                .cloned()
                .collect(),
        )
    }

    fn conditional_update(
        &self,
        id: Uuid,
        predicate: &dyn Fn(&IngestionJob) -> bool,
        patch: JobPatch,
    ) -> Result<IngestionJob, DocstackError> {
        let mut jobs = self.jobs.write().expect("job store lock poisoned");
        let job = jobs.get_mut(&id).ok_or(DocstackError::JobNotFound(id))?;

        if !predicate(job) {
            return Err(DocstackError::Conflict(format!(
                "Concurrent update rejected for job {}",
                id
            )));
        }

        if let Some(status) = patch.status {
            job.status = status;
        }
        if let Some(completed_at) = patch.completed_at {
            job.completed_at = Some(completed_at);
        }
        if let Some(output) = patch.output {
            job.output = Some(output);
        }

        Ok(job.clone())
    }
}
