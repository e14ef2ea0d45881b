use std::sync::Arc;

use thiserror::Error;

use haulnet_core::{DomainError, ExpectedVersion, JobId};
use haulnet_jobs::Job;

/// Job store operation error.
///
/// These are **infrastructure errors** (storage, concurrency) as opposed to
/// domain errors (validation, state machine).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JobStoreError {
    /// The stored version moved since the caller loaded the job.
    #[error("optimistic concurrency check failed: {0}")]
    Concurrency(String),

    #[error("job {0} already exists")]
    Duplicate(JobId),

    #[error("job {0} not found")]
    NotFound(JobId),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<JobStoreError> for DomainError {
    fn from(value: JobStoreError) -> Self {
        match value {
            JobStoreError::Concurrency(_) => DomainError::conflict("job was modified concurrently"),
            JobStoreError::NotFound(id) => DomainError::not_found(format!("job {id}")),
            other => DomainError::infrastructure(other.to_string()),
        }
    }
}

/// Job records keyed by id.
///
/// ## Commit semantics
///
/// `commit()` is a compare-and-swap: it replaces the stored record only if the
/// stored version still equals `expected`. Two writers that loaded the same
/// version can never both commit; the loser gets `Concurrency` and must reload.
///
/// Implementations must make `commit()` atomic per job. No cross-job locking is
/// required.
pub trait JobStore: Send + Sync {
    /// Store a brand new job. Fails with `Duplicate` if the id is taken.
    fn insert(&self, job: Job) -> Result<(), JobStoreError>;

    fn load(&self, id: JobId) -> Result<Option<Job>, JobStoreError>;

    /// Replace the stored job if its version still matches `expected`.
    fn commit(&self, job: Job, expected: ExpectedVersion) -> Result<(), JobStoreError>;

    /// Snapshot of every job matching `predicate`.
    fn scan(&self, predicate: &dyn Fn(&Job) -> bool) -> Result<Vec<Job>, JobStoreError>;
}

impl<S> JobStore for Arc<S>
where
    S: JobStore + ?Sized,
{
    fn insert(&self, job: Job) -> Result<(), JobStoreError> {
        (**self).insert(job)
    }

    fn load(&self, id: JobId) -> Result<Option<Job>, JobStoreError> {
        (**self).load(id)
    }

    fn commit(&self, job: Job, expected: ExpectedVersion) -> Result<(), JobStoreError> {
        (**self).commit(job, expected)
    }

    fn scan(&self, predicate: &dyn Fn(&Job) -> bool) -> Result<Vec<Job>, JobStoreError> {
        (**self).scan(predicate)
    }
}
