//! Live location of jobs in transit.
//!
//! The assigned driver reports positions while the job is `in_progress`; the
//! latest report per job is kept and pushed to the owning shipper. History is
//! not retained.

use chrono::Utc;
use dashmap::DashMap;
use tracing::{debug, warn};
use uuid::Uuid;

use haulnet_auth::{Operation, Principal, authorize};
use haulnet_core::{AggregateRoot, DomainError, DomainResult, JobId};
use haulnet_events::{EventBus, EventEnvelope};
use haulnet_jobs::{DomainEvent, GeoPoint, Job, JobLocation, JobStatus};

use crate::job_store::JobStore;

pub const LOCATION_AGGREGATE_TYPE: &str = "freight.location";

#[derive(Debug)]
pub struct LocationTracker<J, B> {
    locations: DashMap<JobId, JobLocation>,
    jobs: J,
    bus: B,
}

impl<J, B> LocationTracker<J, B>
where
    J: JobStore,
    B: EventBus<EventEnvelope<DomainEvent>>,
{
    pub fn new(jobs: J, bus: B) -> Self {
        Self {
            locations: DashMap::new(),
            jobs,
            bus,
        }
    }

    /// Replace the job's last known position.
    pub fn update_location(&self, principal: &Principal, job_id: JobId, point: GeoPoint) -> DomainResult<JobLocation> {
        let job = self.load(job_id)?;
        authorize(principal, Operation::ReportLocation(&job.parties()))?;

        let location = JobLocation::report(job_id, point, Utc::now())?;
        if job.status() != JobStatus::InProgress {
            return Err(DomainError::conflict("job is not in progress"));
        }

        self.locations.insert(job_id, location);
        debug!(
            job_id = %job_id,
            actor_id = %principal.actor_id(),
            latitude = location.latitude,
            longitude = location.longitude,
            "location updated"
        );

        self.publish(&job, location);
        Ok(location)
    }

    pub fn get_location(&self, principal: &Principal, job_id: JobId) -> DomainResult<JobLocation> {
        let job = self.load(job_id)?;
        authorize(principal, Operation::ViewLocation(&job.parties()))?;

        self.locations
            .get(&job_id)
            .map(|l| *l.value())
            .ok_or_else(|| DomainError::not_found(format!("location for job {job_id}")))
    }

    fn load(&self, job_id: JobId) -> DomainResult<Job> {
        self.jobs
            .load(job_id)?
            .ok_or_else(|| DomainError::not_found(format!("job {job_id}")))
    }

    fn publish(&self, job: &Job, location: JobLocation) {
        let envelope = EventEnvelope::new(
            Uuid::now_v7(),
            *job.job_id().as_uuid(),
            LOCATION_AGGREGATE_TYPE,
            job.version(),
            DomainEvent::LocationUpdated {
                recipient: job.shipper_id(),
                location,
            },
        );

        if let Err(err) = self.bus.publish(envelope) {
            warn!(job_id = %job.job_id(), error = ?err, "event publication failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use haulnet_core::{ActorId, ErrorKind};
    use haulnet_events::{Event, InMemoryEventBus};
    use haulnet_jobs::{Address, CargoType, JobDetails};

    use crate::job_registry::JobRegistry;
    use crate::job_store::InMemoryJobStore;

    type Bus = Arc<InMemoryEventBus<EventEnvelope<DomainEvent>>>;

    struct Fixture {
        registry: JobRegistry<Arc<InMemoryJobStore>, Bus>,
        tracker: LocationTracker<Arc<InMemoryJobStore>, Bus>,
        bus: Bus,
        shipper: Principal,
        driver: Principal,
    }

    fn fixture() -> Fixture {
        let jobs = Arc::new(InMemoryJobStore::new());
        let bus: Bus = Arc::new(InMemoryEventBus::new());
        Fixture {
            registry: JobRegistry::new(jobs.clone(), bus.clone()),
            tracker: LocationTracker::new(jobs, bus.clone()),
            bus,
            shipper: Principal::shipper(ActorId::new()),
            driver: Principal::driver(ActorId::new()),
        }
    }

    fn accepted_job(f: &Fixture) -> JobId {
        let details = JobDetails {
            origin: Address::new("Curitiba", "PR", "Rua XV"),
            destination: Address::new("Joinville", "SC", "Av. Brasil"),
            cargo_type: Some(CargoType::Delivery),
            ..JobDetails::default()
        };
        let id = f.registry.create_job(&f.shipper, details).unwrap().job_id();
        f.registry.accept_job(&f.driver, id).unwrap();
        id
    }

    #[test]
    fn only_jobs_in_transit_take_positions() {
        let f = fixture();
        let id = accepted_job(&f);

        let err = f.tracker.update_location(&f.driver, id, GeoPoint::new(-25.4, -49.2)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        f.registry.start_job(&f.driver, id).unwrap();
        f.tracker.update_location(&f.driver, id, GeoPoint::new(-25.4, -49.2)).unwrap();
        let latest = f.tracker.update_location(&f.driver, id, GeoPoint::new(-26.0, -48.9)).unwrap();

        assert_eq!(f.tracker.get_location(&f.shipper, id).unwrap(), latest);
        assert_eq!(f.tracker.get_location(&f.driver, id).unwrap().latitude, -26.0);

        f.registry.complete_job(&f.driver, id).unwrap();
        let err = f.tracker.update_location(&f.driver, id, GeoPoint::new(0.0, 0.0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn strangers_can_neither_report_nor_follow() {
        let f = fixture();
        let id = accepted_job(&f);
        f.registry.start_job(&f.driver, id).unwrap();

        let stranger = Principal::driver(ActorId::new());
        let err = f.tracker.update_location(&stranger, id, GeoPoint::new(1.0, 1.0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
        let err = f.tracker.get_location(&stranger, id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
        let err = f
            .tracker
            .get_location(&Principal::shipper(ActorId::new()), id)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
    }

    #[test]
    fn missing_job_location_and_bad_points() {
        let f = fixture();
        let err = f.tracker.get_location(&f.shipper, JobId::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let id = accepted_job(&f);
        f.registry.start_job(&f.driver, id).unwrap();
        let err = f.tracker.get_location(&f.shipper, id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = f
            .tracker
            .update_location(&f.driver, id, GeoPoint { latitude: None, longitude: Some(1.0) })
            .unwrap_err();
        assert_eq!(err.field(), Some("latitude"));
    }

    #[test]
    fn reports_are_published_for_the_shipper() {
        let f = fixture();
        let id = accepted_job(&f);
        f.registry.start_job(&f.driver, id).unwrap();
        let sub = f.bus.subscribe();

        f.tracker.update_location(&f.driver, id, GeoPoint::new(-25.4, -49.2)).unwrap();

        let published = sub.try_recv().unwrap();
        assert_eq!(published.aggregate_type(), LOCATION_AGGREGATE_TYPE);
        assert_eq!(published.payload().event_type(), "locationUpdated");
        assert!(matches!(
            published.payload(),
            DomainEvent::LocationUpdated { recipient, .. } if *recipient == f.shipper.actor_id()
        ));
    }
}
