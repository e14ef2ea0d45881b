use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use haulnet_core::{AggregateRoot, ExpectedVersion, JobId};
use haulnet_jobs::Job;

use super::r#trait::{JobStore, JobStoreError};

/// In-memory job store.
///
/// Sharded map; `commit` holds the shard write guard for the duration of the
/// version check and the swap, so it is atomic per job without a global lock.
#[derive(Debug, Default)]
pub struct InMemoryJobStore {
    jobs: DashMap<JobId, Job>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

impl JobStore for InMemoryJobStore {
    fn insert(&self, job: Job) -> Result<(), JobStoreError> {
        match self.jobs.entry(*job.id()) {
            Entry::Occupied(e) => Err(JobStoreError::Duplicate(*e.key())),
            Entry::Vacant(e) => {
                e.insert(job);
                Ok(())
            }
        }
    }

    fn load(&self, id: JobId) -> Result<Option<Job>, JobStoreError> {
        Ok(self.jobs.get(&id).map(|j| j.value().clone()))
    }

    fn commit(&self, job: Job, expected: ExpectedVersion) -> Result<(), JobStoreError> {
        let id = *job.id();
        let mut stored = self.jobs.get_mut(&id).ok_or(JobStoreError::NotFound(id))?;

        let current = stored.version();
        if !expected.matches(current) {
            return Err(JobStoreError::Concurrency(format!(
                "expected {expected:?}, found {current}"
            )));
        }

        *stored = job;
        Ok(())
    }

    fn scan(&self, predicate: &dyn Fn(&Job) -> bool) -> Result<Vec<Job>, JobStoreError> {
        let mut jobs: Vec<Job> = self
            .jobs
            .iter()
            .filter(|j| predicate(j.value()))
            .map(|j| j.value().clone())
            .collect();
        jobs.sort_by(|a, b| b.created_at().cmp(&a.created_at()).then_with(|| b.id().cmp(a.id())));
        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use haulnet_core::{ActorId, Aggregate};
    use haulnet_jobs::{Address, CargoType, JobCommand, JobDetails};

    fn open_job() -> Job {
        let details = JobDetails {
            origin: Address::new("Curitiba", "PR", "Rua XV"),
            destination: Address::new("Joinville", "SC", "Av. Brasil"),
            cargo_type: Some(CargoType::Other),
            ..JobDetails::default()
        };
        Job::open(JobId::new(), ActorId::new(), details, Utc::now()).unwrap().0
    }

    fn accepted(job: &Job) -> Job {
        let mut next = job.clone();
        let events = next
            .handle(&JobCommand::Accept {
                driver_id: ActorId::new(),
                occurred_at: Utc::now(),
            })
            .unwrap();
        for e in &events {
            next.apply(e);
        }
        next
    }

    #[test]
    fn insert_rejects_duplicates() {
        let store = InMemoryJobStore::new();
        let job = open_job();

        store.insert(job.clone()).unwrap();
        assert_eq!(store.insert(job.clone()), Err(JobStoreError::Duplicate(*job.id())));
    }

    #[test]
    fn stale_commit_is_rejected() {
        let store = InMemoryJobStore::new();
        let job = open_job();
        store.insert(job.clone()).unwrap();

        let first = accepted(&job);
        let second = accepted(&job);

        store.commit(first.clone(), ExpectedVersion::Exact(job.version())).unwrap();
        let err = store
            .commit(second, ExpectedVersion::Exact(job.version()))
            .unwrap_err();
        assert!(matches!(err, JobStoreError::Concurrency(_)));

        assert_eq!(store.load(*job.id()).unwrap(), Some(first));
    }

    #[test]
    fn commit_requires_existing_job() {
        let store = InMemoryJobStore::new();
        let job = open_job();
        let err = store.commit(job.clone(), ExpectedVersion::Any).unwrap_err();
        assert_eq!(err, JobStoreError::NotFound(*job.id()));
    }
}
