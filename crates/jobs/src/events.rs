//! Events published on the bus after a successful commit.

use chrono::{DateTime, Utc};
use serde::Serialize;

use haulnet_core::ActorId;
use haulnet_events::Event;

use crate::{ContactHandoff, Job, JobEvent, JobLocation};

/// Everything the notification side consumes.
///
/// Job events travel with the committed snapshot so subscribers never re-read
/// the store to find out who to notify.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DomainEvent {
    Job { event: JobEvent, job: Job },
    ContactInitiated { recipient: ActorId, handoff: ContactHandoff },
    /// Driver reported a new position; the owning shipper is told.
    LocationUpdated { recipient: ActorId, location: JobLocation },
}

impl DomainEvent {
    pub fn job(event: JobEvent, job: Job) -> Self {
        DomainEvent::Job { event, job }
    }
}

impl Event for DomainEvent {
    fn event_type(&self) -> &'static str {
        match self {
            DomainEvent::Job { event, .. } => event.event_type(),
            DomainEvent::ContactInitiated { .. } => "contactInitiated",
            DomainEvent::LocationUpdated { .. } => "locationUpdated",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            DomainEvent::Job { event, .. } => event.occurred_at(),
            DomainEvent::ContactInitiated { handoff, .. } => handoff.engagement.created_at,
            DomainEvent::LocationUpdated { location, .. } => location.updated_at,
        }
    }
}
