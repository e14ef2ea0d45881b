//! Job lifecycle orchestration.
//!
//! Every mutation goes through the same pipeline:
//!
//! ```text
//! Principal + JobCommand
//!   ↓
//! 1. Load current record
//!   ↓
//! 2. Authorize (role + ownership, no status checks)
//!   ↓
//! 3. Handle (state machine decides exactly one event)
//!   ↓
//! 4. Commit with ExpectedVersion::Exact (compare-and-swap)
//!   ↓
//! 5. Publish EventEnvelope<DomainEvent> to the bus
//! ```
//!
//! A lost compare-and-swap reloads and re-runs steps 2-4, so a writer that
//! raced a competing accept ends up seeing the new state and failing with a
//! conflict rather than overwriting it.

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use haulnet_auth::{JobParties, Operation, Principal, authorize};
use haulnet_core::{Aggregate, AggregateRoot, DomainError, DomainResult, ExpectedVersion, JobId};
use haulnet_events::{Event, EventBus, EventEnvelope};
use haulnet_jobs::{DomainEvent, Job, JobCommand, JobDetails, JobEvent, JobFilter, JobQuery};

use crate::config::InfraConfig;
use crate::job_store::{JobStore, JobStoreError};

pub const JOB_AGGREGATE_TYPE: &str = "freight.job";

/// Reported when every commit attempt lost a race.
const CONTENDED: &str = "job is being updated by someone else, try again";

/// The policy check that guards each command.
fn operation_for<'a>(command: &JobCommand, parties: &'a JobParties) -> Operation<'a> {
    match command {
        JobCommand::Accept { .. } => Operation::AcceptJob,
        JobCommand::Reject { .. } => Operation::RejectJob(parties),
        JobCommand::Start { .. } => Operation::StartJob(parties),
        JobCommand::Complete { .. } => Operation::CompleteJob(parties),
        JobCommand::Cancel { .. } => Operation::CancelJob(parties),
        JobCommand::Rate { .. } => Operation::RateJob(parties),
    }
}

/// Owns the job records and is the only writer to them.
#[derive(Debug)]
pub struct JobRegistry<S, B> {
    store: S,
    bus: B,
    config: InfraConfig,
}

impl<S, B> JobRegistry<S, B> {
    pub fn new(store: S, bus: B) -> Self {
        Self::with_config(store, bus, InfraConfig::default())
    }

    pub fn with_config(store: S, bus: B, config: InfraConfig) -> Self {
        Self { store, bus, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }
}

impl<S, B> JobRegistry<S, B>
where
    S: JobStore,
    B: EventBus<EventEnvelope<DomainEvent>>,
{
    pub fn create_job(&self, principal: &Principal, details: JobDetails) -> DomainResult<Job> {
        authorize(principal, Operation::CreateJob)?;

        let (job, created) = Job::open(JobId::new(), principal.actor_id(), details, Utc::now())?;
        self.store.insert(job.clone())?;

        info!(job_id = %job.job_id(), shipper_id = %job.shipper_id(), "job created");
        self.publish(created, &job);
        Ok(job)
    }

    pub fn accept_job(&self, principal: &Principal, job_id: JobId) -> DomainResult<Job> {
        let command = JobCommand::Accept {
            driver_id: principal.actor_id(),
            occurred_at: Utc::now(),
        };
        self.execute(principal, job_id, command)
    }

    pub fn reject_job(&self, principal: &Principal, job_id: JobId) -> DomainResult<Job> {
        let command = JobCommand::Reject {
            driver_id: principal.actor_id(),
            occurred_at: Utc::now(),
        };
        self.execute(principal, job_id, command)
    }

    pub fn start_job(&self, principal: &Principal, job_id: JobId) -> DomainResult<Job> {
        let command = JobCommand::Start {
            driver_id: principal.actor_id(),
            occurred_at: Utc::now(),
        };
        self.execute(principal, job_id, command)
    }

    pub fn complete_job(&self, principal: &Principal, job_id: JobId) -> DomainResult<Job> {
        let command = JobCommand::Complete {
            driver_id: principal.actor_id(),
            occurred_at: Utc::now(),
        };
        self.execute(principal, job_id, command)
    }

    pub fn cancel_job(&self, principal: &Principal, job_id: JobId) -> DomainResult<Job> {
        let command = JobCommand::Cancel {
            shipper_id: principal.actor_id(),
            occurred_at: Utc::now(),
        };
        self.execute(principal, job_id, command)
    }

    pub fn rate_job(&self, principal: &Principal, job_id: JobId, score: i32) -> DomainResult<Job> {
        let command = JobCommand::Rate {
            shipper_id: principal.actor_id(),
            score,
            occurred_at: Utc::now(),
        };
        self.execute(principal, job_id, command)
    }

    /// Newest first. Drivers must pass a filter; shippers get their own jobs.
    pub fn list_jobs(&self, principal: &Principal, filter: Option<JobFilter>) -> DomainResult<Vec<Job>> {
        authorize(principal, Operation::ListJobs)?;
        let query = JobQuery::for_principal(principal, filter)?;
        Ok(self.store.scan(&|job| query.matches(job))?)
    }

    /// Jobs the caller may not see are reported as missing.
    pub fn get_job(&self, principal: &Principal, job_id: JobId) -> DomainResult<Job> {
        let not_found = || DomainError::not_found(format!("job {job_id}"));
        let job = self.store.load(job_id)?.ok_or_else(not_found)?;
        authorize(principal, Operation::ViewJob(&job.parties())).map_err(|_| not_found())?;
        Ok(job)
    }

    fn execute(
        &self,
        principal: &Principal,
        job_id: JobId,
        command: JobCommand,
    ) -> DomainResult<Job> {
        let limit = self.config.accept_retry_limit.max(1);
        let mut attempt = 0usize;

        loop {
            attempt += 1;

            let mut job = self
                .store
                .load(job_id)?
                .ok_or_else(|| DomainError::not_found(format!("job {job_id}")))?;

            let parties = job.parties();
            authorize(principal, operation_for(&command, &parties))?;

            let expected = ExpectedVersion::Exact(job.version());
            let events = match job.handle(&command) {
                Ok(events) => events,
                Err(err) => {
                    if attempt > 1 {
                        info!(
                            job_id = %job_id,
                            actor_id = %principal.actor_id(),
                            error = %err,
                            "lost race for job"
                        );
                    }
                    return Err(err);
                }
            };
            for event in &events {
                job.apply(event);
            }

            match self.store.commit(job.clone(), expected) {
                Ok(()) => {
                    for event in events {
                        info!(
                            job_id = %job_id,
                            actor_id = %principal.actor_id(),
                            event = event.event_type(),
                            status = %job.status(),
                            "job updated"
                        );
                        self.publish(event, &job);
                    }
                    return Ok(job);
                }
                Err(JobStoreError::Concurrency(msg)) if attempt < limit => {
                    debug!(job_id = %job_id, attempt, reason = %msg, "commit raced, reloading");
                }
                Err(JobStoreError::Concurrency(msg)) => {
                    warn!(job_id = %job_id, attempts = attempt, reason = %msg, "gave up after repeated commit races");
                    return Err(DomainError::conflict(CONTENDED));
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn publish(&self, event: JobEvent, job: &Job) {
        let event_type = event.event_type();
        let envelope = EventEnvelope::new(
            Uuid::now_v7(),
            *job.id().as_uuid(),
            JOB_AGGREGATE_TYPE,
            job.version(),
            DomainEvent::job(event, job.clone()),
        );

        if let Err(err) = self.bus.publish(envelope) {
            warn!(job_id = %job.job_id(), event = event_type, error = ?err, "event publication failed");
        }
    }
}
