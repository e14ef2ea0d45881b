//! Fire-and-forget notification delivery.

use std::sync::Arc;

use serde_json::{Value as JsonValue, json};
use tracing::{debug, warn};

use haulnet_auth::Role;
use haulnet_core::ActorId;
use haulnet_events::Event;
use haulnet_jobs::{DomainEvent, Job, JobEvent};

use super::connections::{ConnectionRegistry, Notification, NotificationKind};

/// Outcome of a single push. Never an error for the caller.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// Recipient not registered; dropped.
    Offline,
    /// Transport refused the push; dropped.
    Failed,
}

/// Who a domain event is pushed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Nobody,
    Actor(ActorId, NotificationKind),
    Role(Role, NotificationKind),
}

/// Closed routing table for every domain event.
pub fn route_for(event: &DomainEvent) -> Route {
    match event {
        DomainEvent::Job { event, job } => match event {
            JobEvent::JobCreated { .. } => Route::Role(Role::Driver, NotificationKind::NewJobAvailable),
            JobEvent::JobAccepted { .. } | JobEvent::JobStarted { .. } | JobEvent::JobCompleted { .. } => {
                Route::Actor(job.shipper_id(), NotificationKind::JobStatusChanged)
            }
            JobEvent::JobRejected { .. } | JobEvent::JobReopened { .. } => Route::Nobody,
            JobEvent::JobCancelled { driver_id, .. } => match driver_id {
                Some(d) => Route::Actor(*d, NotificationKind::JobStatusChanged),
                None => Route::Nobody,
            },
            JobEvent::JobRated { driver_id, .. } => match driver_id {
                Some(d) => Route::Actor(*d, NotificationKind::JobRated),
                None => Route::Nobody,
            },
        },
        DomainEvent::ContactInitiated { recipient, .. } => {
            Route::Actor(*recipient, NotificationKind::ContactInitiated)
        }
        DomainEvent::LocationUpdated { recipient, .. } => {
            Route::Actor(*recipient, NotificationKind::LocationUpdated)
        }
    }
}

fn job_payload(event: &JobEvent, job: &Job) -> JsonValue {
    json!({ "event": event.event_type(), "job": job })
}

/// Pushes notifications to whoever is registered right now.
///
/// Nothing is queued for offline recipients and nothing is retried; a client
/// that missed a push catches up by listing jobs.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    connections: Arc<ConnectionRegistry>,
}

impl NotificationDispatcher {
    pub fn new(connections: Arc<ConnectionRegistry>) -> Self {
        Self { connections }
    }

    pub fn connections(&self) -> &Arc<ConnectionRegistry> {
        &self.connections
    }

    pub fn notify_actor(&self, actor_id: ActorId, event: NotificationKind, payload: JsonValue) -> Delivery {
        let Some(handle) = self.connections.lookup(actor_id) else {
            debug!(actor_id = %actor_id, event = %event, "recipient offline, notification dropped");
            return Delivery::Offline;
        };

        match handle.push(Notification { event, payload }) {
            Ok(()) => Delivery::Delivered,
            Err(err) => {
                warn!(actor_id = %actor_id, event = %event, error = %err, "notification push failed");
                Delivery::Failed
            }
        }
    }

    /// Returns how many sessions accepted the push.
    pub fn broadcast_to_role(&self, role: Role, event: NotificationKind, payload: JsonValue) -> usize {
        let mut delivered = 0;
        for (actor_id, handle) in self.connections.all_with_role(role) {
            let notification = Notification {
                event,
                payload: payload.clone(),
            };
            match handle.push(notification) {
                Ok(()) => delivered += 1,
                Err(err) => {
                    warn!(actor_id = %actor_id, event = %event, error = %err, "notification push failed");
                }
            }
        }
        debug!(role = %role, event = %event, delivered, "broadcast");
        delivered
    }

    /// Route one committed domain event.
    pub fn dispatch(&self, event: &DomainEvent) {
        let payload = match event {
            DomainEvent::Job { event, job } => job_payload(event, job),
            DomainEvent::ContactInitiated { handoff, .. } => json!({
                "event": event.event_type(),
                "engagement": handoff.engagement,
                "summary": handoff.summary,
            }),
            DomainEvent::LocationUpdated { location, .. } => json!({
                "event": event.event_type(),
                "location": location,
            }),
        };

        match route_for(event) {
            Route::Nobody => {}
            Route::Actor(actor_id, kind) => {
                self.notify_actor(actor_id, kind, payload);
            }
            Route::Role(role, kind) => {
                self.broadcast_to_role(role, kind, payload);
            }
        }
    }
}
