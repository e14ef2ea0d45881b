use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use haulnet_auth::JobParties;
use haulnet_core::{ActorId, Aggregate, AggregateRoot, DomainError, DomainResult, JobId, ValueObject};
use haulnet_events::Event;

/// Job status lifecycle.
///
/// ```text
/// open ──accept──▶ accepted ──start──▶ in_progress ──complete──▶ completed
///  ▲                  │
///  └────reject────────┘
/// open | accepted ──cancel──▶ cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Open,
    Accepted,
    InProgress,
    Completed,
    Cancelled,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Open => "open",
            JobStatus::Accepted => "accepted",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
            JobStatus::Cancelled => "cancelled",
        }
    }
}

impl core::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CargoType {
    #[serde(alias = "mudanca")]
    Relocation,
    #[serde(alias = "entrega")]
    Delivery,
    #[serde(alias = "outro")]
    Other,
}

impl CargoType {
    pub fn as_str(self) -> &'static str {
        match self {
            CargoType::Relocation => "relocation",
            CargoType::Delivery => "delivery",
            CargoType::Other => "other",
        }
    }
}

/// Structured address. Missing parts deserialize as blank and fail validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, alias = "cidade")]
    pub city: String,
    #[serde(default, alias = "estado")]
    pub region: String,
    #[serde(default, alias = "endereco")]
    pub street: String,
}

impl ValueObject for Address {}

impl Address {
    pub fn new(city: impl Into<String>, region: impl Into<String>, street: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            region: region.into(),
            street: street.into(),
        }
    }

    fn validate(&self, prefix: &str) -> DomainResult<()> {
        for (name, value) in [("city", &self.city), ("region", &self.region), ("street", &self.street)] {
            if value.trim().is_empty() {
                return Err(DomainError::validation(
                    format!("{prefix}.{name}"),
                    "must not be blank",
                ));
            }
        }
        Ok(())
    }

    fn trimmed(&self) -> Self {
        Self::new(self.city.trim(), self.region.trim(), self.street.trim())
    }
}

impl core::fmt::Display for Address {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}, {}/{}", self.street, self.city, self.region)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub score: u8,
    pub rated: bool,
}

/// Shipper-supplied job details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetails {
    #[serde(default)]
    pub origin: Address,
    #[serde(default)]
    pub destination: Address,
    pub cargo_type: Option<CargoType>,
    pub estimated_weight: Option<f64>,
    pub price: Option<f64>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl JobDetails {
    fn validate(&self) -> DomainResult<CargoType> {
        self.origin.validate("origin")?;
        self.destination.validate("destination")?;
        let cargo_type = self
            .cargo_type
            .ok_or_else(|| DomainError::validation("cargoType", "is required"))?;

        for (name, value) in [("estimatedWeight", self.estimated_weight), ("price", self.price)] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(DomainError::validation(name, "must be a non-negative number"));
                }
            }
        }
        Ok(cargo_type)
    }
}

/// Aggregate root: Job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    id: JobId,
    shipper_id: ActorId,
    driver_id: Option<ActorId>,
    origin: Address,
    destination: Address,
    cargo_type: CargoType,
    estimated_weight: Option<f64>,
    price: Option<f64>,
    status: JobStatus,
    created_at: DateTime<Utc>,
    scheduled_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    rejected_by: BTreeSet<ActorId>,
    rating: Option<Rating>,
    version: u64,
}

impl Job {
    /// Validate details and post a new open job.
    pub fn open(
        id: JobId,
        shipper_id: ActorId,
        details: JobDetails,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<(Self, JobEvent)> {
        let cargo_type = details.validate()?;

        let mut job = Self {
            id,
            shipper_id,
            driver_id: None,
            origin: details.origin.trimmed(),
            destination: details.destination.trimmed(),
            cargo_type,
            estimated_weight: details.estimated_weight,
            price: details.price,
            status: JobStatus::Open,
            created_at: occurred_at,
            scheduled_at: details.scheduled_at,
            completed_at: None,
            rejected_by: BTreeSet::new(),
            rating: None,
            version: 0,
        };

        let created = JobEvent::JobCreated {
            job_id: id,
            shipper_id,
            occurred_at,
        };
        job.apply(&created);
        Ok((job, created))
    }

    pub fn job_id(&self) -> JobId {
        self.id
    }

    pub fn shipper_id(&self) -> ActorId {
        self.shipper_id
    }

    pub fn driver_id(&self) -> Option<ActorId> {
        self.driver_id
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn origin(&self) -> &Address {
        &self.origin
    }

    pub fn destination(&self) -> &Address {
        &self.destination
    }

    pub fn cargo_type(&self) -> CargoType {
        self.cargo_type
    }

    pub fn estimated_weight(&self) -> Option<f64> {
        self.estimated_weight
    }

    pub fn price(&self) -> Option<f64> {
        self.price
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn scheduled_at(&self) -> Option<DateTime<Utc>> {
        self.scheduled_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn rejected_by(&self) -> &BTreeSet<ActorId> {
        &self.rejected_by
    }

    pub fn rating(&self) -> Option<Rating> {
        self.rating
    }

    pub fn parties(&self) -> JobParties {
        JobParties {
            shipper_id: self.shipper_id,
            driver_id: self.driver_id,
            open: self.status == JobStatus::Open,
        }
    }

    pub fn has_rejected(&self, driver_id: ActorId) -> bool {
        self.rejected_by.contains(&driver_id)
    }
}

impl AggregateRoot for Job {
    type Id = JobId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobCommand {
    Accept { driver_id: ActorId, occurred_at: DateTime<Utc> },
    Reject { driver_id: ActorId, occurred_at: DateTime<Utc> },
    Start { driver_id: ActorId, occurred_at: DateTime<Utc> },
    Complete { driver_id: ActorId, occurred_at: DateTime<Utc> },
    Cancel { shipper_id: ActorId, occurred_at: DateTime<Utc> },
    Rate { shipper_id: ActorId, score: i32, occurred_at: DateTime<Utc> },
}

/// One event per successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum JobEvent {
    JobCreated {
        job_id: JobId,
        shipper_id: ActorId,
        occurred_at: DateTime<Utc>,
    },
    JobAccepted {
        job_id: JobId,
        shipper_id: ActorId,
        driver_id: ActorId,
        occurred_at: DateTime<Utc>,
    },
    /// An unassigned job was declined.
    JobRejected {
        job_id: JobId,
        driver_id: ActorId,
        occurred_at: DateTime<Utc>,
    },
    /// The assigned driver backed out; the job is open again.
    JobReopened {
        job_id: JobId,
        driver_id: ActorId,
        occurred_at: DateTime<Utc>,
    },
    JobStarted {
        job_id: JobId,
        shipper_id: ActorId,
        driver_id: ActorId,
        occurred_at: DateTime<Utc>,
    },
    JobCompleted {
        job_id: JobId,
        shipper_id: ActorId,
        driver_id: ActorId,
        occurred_at: DateTime<Utc>,
    },
    JobCancelled {
        job_id: JobId,
        shipper_id: ActorId,
        driver_id: Option<ActorId>,
        occurred_at: DateTime<Utc>,
    },
    JobRated {
        job_id: JobId,
        driver_id: Option<ActorId>,
        score: u8,
        occurred_at: DateTime<Utc>,
    },
}

impl JobEvent {
    pub fn job_id(&self) -> JobId {
        match self {
            JobEvent::JobCreated { job_id, .. }
            | JobEvent::JobAccepted { job_id, .. }
            | JobEvent::JobRejected { job_id, .. }
            | JobEvent::JobReopened { job_id, .. }
            | JobEvent::JobStarted { job_id, .. }
            | JobEvent::JobCompleted { job_id, .. }
            | JobEvent::JobCancelled { job_id, .. }
            | JobEvent::JobRated { job_id, .. } => *job_id,
        }
    }
}

impl Event for JobEvent {
    fn event_type(&self) -> &'static str {
        match self {
            JobEvent::JobCreated { .. } => "jobCreated",
            JobEvent::JobAccepted { .. } => "jobAccepted",
            JobEvent::JobRejected { .. } => "jobRejected",
            JobEvent::JobReopened { .. } => "jobReopened",
            JobEvent::JobStarted { .. } => "jobStarted",
            JobEvent::JobCompleted { .. } => "jobCompleted",
            JobEvent::JobCancelled { .. } => "jobCancelled",
            JobEvent::JobRated { .. } => "jobRated",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            JobEvent::JobCreated { occurred_at, .. }
            | JobEvent::JobAccepted { occurred_at, .. }
            | JobEvent::JobRejected { occurred_at, .. }
            | JobEvent::JobReopened { occurred_at, .. }
            | JobEvent::JobStarted { occurred_at, .. }
            | JobEvent::JobCompleted { occurred_at, .. }
            | JobEvent::JobCancelled { occurred_at, .. }
            | JobEvent::JobRated { occurred_at, .. } => *occurred_at,
        }
    }
}

impl Aggregate for Job {
    type Command = JobCommand;
    type Event = JobEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            JobEvent::JobCreated { .. } => {
                self.status = JobStatus::Open;
                self.driver_id = None;
            }
            JobEvent::JobAccepted { driver_id, .. } => {
                self.status = JobStatus::Accepted;
                self.driver_id = Some(*driver_id);
            }
            JobEvent::JobRejected { driver_id, .. } => {
                self.rejected_by.insert(*driver_id);
            }
            JobEvent::JobReopened { driver_id, .. } => {
                self.rejected_by.insert(*driver_id);
                self.status = JobStatus::Open;
                self.driver_id = None;
            }
            JobEvent::JobStarted { .. } => {
                self.status = JobStatus::InProgress;
            }
            JobEvent::JobCompleted { occurred_at, .. } => {
                self.status = JobStatus::Completed;
                self.completed_at = Some(*occurred_at);
            }
            JobEvent::JobCancelled { .. } => {
                self.status = JobStatus::Cancelled;
            }
            JobEvent::JobRated { score, .. } => {
                self.rating = Some(Rating {
                    score: *score,
                    rated: true,
                });
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            JobCommand::Accept { driver_id, occurred_at } => self.handle_accept(*driver_id, *occurred_at),
            JobCommand::Reject { driver_id, occurred_at } => self.handle_reject(*driver_id, *occurred_at),
            JobCommand::Start { driver_id, occurred_at } => self.handle_start(*driver_id, *occurred_at),
            JobCommand::Complete { driver_id, occurred_at } => {
                self.handle_complete(*driver_id, *occurred_at)
            }
            JobCommand::Cancel { occurred_at, .. } => self.handle_cancel(*occurred_at),
            JobCommand::Rate { score, occurred_at, .. } => self.handle_rate(*score, *occurred_at),
        }
    }
}

impl Job {
    fn handle_accept(&self, driver_id: ActorId, occurred_at: DateTime<Utc>) -> DomainResult<Vec<JobEvent>> {
        if self.status != JobStatus::Open || self.driver_id.is_some() {
            return Err(DomainError::conflict("job no longer available"));
        }
        if self.has_rejected(driver_id) {
            return Err(DomainError::conflict("job was already declined by this driver"));
        }

        Ok(vec![JobEvent::JobAccepted {
            job_id: self.id,
            shipper_id: self.shipper_id,
            driver_id,
            occurred_at,
        }])
    }

    fn handle_reject(&self, driver_id: ActorId, occurred_at: DateTime<Utc>) -> DomainResult<Vec<JobEvent>> {
        if !matches!(self.status, JobStatus::Open | JobStatus::Accepted) {
            return Err(DomainError::conflict(format!(
                "job cannot be rejected while {}",
                self.status
            )));
        }
        if self.has_rejected(driver_id) {
            return Err(DomainError::conflict("job already rejected by this driver"));
        }

        let event = if self.status == JobStatus::Accepted {
            JobEvent::JobReopened {
                job_id: self.id,
                driver_id,
                occurred_at,
            }
        } else {
            JobEvent::JobRejected {
                job_id: self.id,
                driver_id,
                occurred_at,
            }
        };
        Ok(vec![event])
    }

    fn handle_start(&self, driver_id: ActorId, occurred_at: DateTime<Utc>) -> DomainResult<Vec<JobEvent>> {
        if self.status != JobStatus::Accepted {
            return Err(DomainError::conflict(format!(
                "job must be accepted to start (currently {})",
                self.status
            )));
        }

        Ok(vec![JobEvent::JobStarted {
            job_id: self.id,
            shipper_id: self.shipper_id,
            driver_id,
            occurred_at,
        }])
    }

    fn handle_complete(&self, driver_id: ActorId, occurred_at: DateTime<Utc>) -> DomainResult<Vec<JobEvent>> {
        if self.status != JobStatus::InProgress {
            return Err(DomainError::conflict(format!(
                "job must be in progress to complete (currently {})",
                self.status
            )));
        }

        Ok(vec![JobEvent::JobCompleted {
            job_id: self.id,
            shipper_id: self.shipper_id,
            driver_id,
            occurred_at,
        }])
    }

    fn handle_cancel(&self, occurred_at: DateTime<Utc>) -> DomainResult<Vec<JobEvent>> {
        if !matches!(self.status, JobStatus::Open | JobStatus::Accepted) {
            return Err(DomainError::conflict(format!(
                "job cannot be cancelled while {}",
                self.status
            )));
        }

        Ok(vec![JobEvent::JobCancelled {
            job_id: self.id,
            shipper_id: self.shipper_id,
            driver_id: self.driver_id,
            occurred_at,
        }])
    }

    fn handle_rate(&self, score: i32, occurred_at: DateTime<Utc>) -> DomainResult<Vec<JobEvent>> {
        let score = u8::try_from(score)
            .ok()
            .filter(|s| (1..=5).contains(s))
            .ok_or_else(|| DomainError::validation("score", "must be between 1 and 5"))?;

        if self.status != JobStatus::Completed {
            return Err(DomainError::conflict("only completed jobs can be rated"));
        }
        if self.rating.is_some_and(|r| r.rated) {
            return Err(DomainError::conflict("job already rated"));
        }

        Ok(vec![JobEvent::JobRated {
            job_id: self.id,
            driver_id: self.driver_id,
            score,
            occurred_at,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haulnet_core::ErrorKind;

    fn details() -> JobDetails {
        JobDetails {
            origin: Address::new("Curitiba", "PR", "Rua XV, 100"),
            destination: Address::new("Joinville", "SC", "Av. Brasil, 20"),
            cargo_type: Some(CargoType::Relocation),
            estimated_weight: Some(850.0),
            price: Some(1200.0),
            scheduled_at: None,
        }
    }

    fn open_job() -> Job {
        Job::open(JobId::new(), ActorId::new(), details(), Utc::now()).unwrap().0
    }

    fn run(job: &mut Job, cmd: JobCommand) -> DomainResult<JobEvent> {
        let mut events = job.handle(&cmd)?;
        assert_eq!(events.len(), 1, "every mutation emits exactly one event");
        let event = events.remove(0);
        job.apply(&event);
        Ok(event)
    }

    fn accept(driver_id: ActorId) -> JobCommand {
        JobCommand::Accept {
            driver_id,
            occurred_at: Utc::now(),
        }
    }

    fn reject(driver_id: ActorId) -> JobCommand {
        JobCommand::Reject {
            driver_id,
            occurred_at: Utc::now(),
        }
    }

    #[test]
    fn open_emits_created_and_starts_unassigned() {
        let shipper = ActorId::new();
        let (job, event) = Job::open(JobId::new(), shipper, details(), Utc::now()).unwrap();

        assert!(matches!(event, JobEvent::JobCreated { shipper_id, .. } if shipper_id == shipper));
        assert_eq!(job.status(), JobStatus::Open);
        assert_eq!(job.driver_id(), None);
        assert_eq!(job.version(), 1);
    }

    #[test]
    fn open_rejects_missing_fields() {
        let mut d = details();
        d.origin.city = "   ".into();
        let err = Job::open(JobId::new(), ActorId::new(), d, Utc::now()).unwrap_err();
        assert_eq!(err.field(), Some("origin.city"));

        let mut d = details();
        d.cargo_type = None;
        let err = Job::open(JobId::new(), ActorId::new(), d, Utc::now()).unwrap_err();
        assert_eq!(err.field(), Some("cargoType"));

        let mut d = details();
        d.price = Some(-1.0);
        let err = Job::open(JobId::new(), ActorId::new(), d, Utc::now()).unwrap_err();
        assert_eq!(err.field(), Some("price"));
    }

    #[test]
    fn accept_assigns_driver_and_second_accept_conflicts() {
        let mut job = open_job();
        let d1 = ActorId::new();

        run(&mut job, accept(d1)).unwrap();
        assert_eq!(job.status(), JobStatus::Accepted);
        assert_eq!(job.driver_id(), Some(d1));

        let err = run(&mut job, accept(ActorId::new())).unwrap_err();
        assert_eq!(err, DomainError::conflict("job no longer available"));
    }

    #[test]
    fn reject_after_accept_reopens_and_remembers_driver() {
        let mut job = open_job();
        let d1 = ActorId::new();
        run(&mut job, accept(d1)).unwrap();

        let event = run(&mut job, reject(d1)).unwrap();
        assert!(matches!(event, JobEvent::JobReopened { .. }));
        assert_eq!(job.status(), JobStatus::Open);
        assert_eq!(job.driver_id(), None);
        assert!(job.has_rejected(d1));

        let err = run(&mut job, accept(d1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn declining_open_job_twice_conflicts() {
        let mut job = open_job();
        let d = ActorId::new();

        let event = run(&mut job, reject(d)).unwrap();
        assert!(matches!(event, JobEvent::JobRejected { .. }));
        assert_eq!(job.status(), JobStatus::Open);

        let err = run(&mut job, reject(d)).unwrap_err();
        assert_eq!(err, DomainError::conflict("job already rejected by this driver"));
    }

    #[test]
    fn full_lifecycle_sets_completed_at_and_allows_one_rating() {
        let mut job = open_job();
        let shipper = job.shipper_id();
        let d = ActorId::new();
        let done_at = Utc::now();

        run(&mut job, accept(d)).unwrap();
        run(&mut job, JobCommand::Start { driver_id: d, occurred_at: Utc::now() }).unwrap();
        assert_eq!(job.status(), JobStatus::InProgress);
        assert_eq!(job.completed_at(), None);

        run(&mut job, JobCommand::Complete { driver_id: d, occurred_at: done_at }).unwrap();
        assert_eq!(job.status(), JobStatus::Completed);
        assert_eq!(job.completed_at(), Some(done_at));

        let rate = |score| JobCommand::Rate {
            shipper_id: shipper,
            score,
            occurred_at: Utc::now(),
        };
        assert_eq!(run(&mut job, rate(9)).unwrap_err().field(), Some("score"));
        run(&mut job, rate(5)).unwrap();
        assert_eq!(job.rating(), Some(Rating { score: 5, rated: true }));
        assert_eq!(run(&mut job, rate(4)).unwrap_err(), DomainError::conflict("job already rated"));
    }

    #[test]
    fn rating_before_completion_conflicts() {
        let mut job = open_job();
        let shipper_id = job.shipper_id();
        let err = run(
            &mut job,
            JobCommand::Rate {
                shipper_id,
                score: 3,
                occurred_at: Utc::now(),
            },
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(job.rating(), None);
    }

    #[test]
    fn start_requires_accepted_and_cancel_requires_open_or_accepted() {
        let mut job = open_job();
        let d = ActorId::new();

        let err = run(&mut job, JobCommand::Start { driver_id: d, occurred_at: Utc::now() }).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        run(&mut job, accept(d)).unwrap();
        run(&mut job, JobCommand::Start { driver_id: d, occurred_at: Utc::now() }).unwrap();

        let shipper_id = job.shipper_id();
        let err = run(
            &mut job,
            JobCommand::Cancel {
                shipper_id,
                occurred_at: Utc::now(),
            },
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn cancelled_job_rejects_everything_and_stays_unchanged() {
        let mut job = open_job();
        let d = ActorId::new();
        run(&mut job, accept(d)).unwrap();
        let shipper_id = job.shipper_id();
        let event = run(
            &mut job,
            JobCommand::Cancel {
                shipper_id,
                occurred_at: Utc::now(),
            },
        )
        .unwrap();
        assert!(matches!(event, JobEvent::JobCancelled { driver_id: Some(x), .. } if x == d));

        let snapshot = job.clone();
        let now = Utc::now();
        let commands = [
            accept(ActorId::new()),
            reject(d),
            JobCommand::Start { driver_id: d, occurred_at: now },
            JobCommand::Complete { driver_id: d, occurred_at: now },
            JobCommand::Cancel { shipper_id: job.shipper_id(), occurred_at: now },
            JobCommand::Rate { shipper_id: job.shipper_id(), score: 4, occurred_at: now },
        ];
        for cmd in commands {
            let err = job.handle(&cmd).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Conflict, "{cmd:?}");
        }
        assert_eq!(job, snapshot);
    }

    #[test]
    fn legacy_cargo_and_address_names_deserialize() {
        let d: JobDetails = serde_json::from_value(serde_json::json!({
            "origin": { "cidade": "Curitiba", "estado": "PR", "endereco": "Rua XV" },
            "destination": { "city": "Joinville", "region": "SC", "street": "Av. Brasil" },
            "cargoType": "mudanca",
        }))
        .unwrap();
        assert_eq!(d.cargo_type, Some(CargoType::Relocation));
        assert_eq!(d.origin.city, "Curitiba");
    }

    #[test]
    fn event_names_are_stable() {
        let (_, created) = Job::open(JobId::new(), ActorId::new(), details(), Utc::now()).unwrap();
        assert_eq!(created.event_type(), "jobCreated");
        let json = serde_json::to_value(&created).unwrap();
        assert_eq!(json["type"], "jobCreated");
        assert!(json.get("shipperId").is_some());
    }
}
