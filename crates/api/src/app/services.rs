use std::{convert::Infallible, io, sync::Arc, time::Duration};

use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use serde_json::json;
use tokio_stream::{Stream, StreamExt, wrappers::ReceiverStream};
use tracing::info;
use uuid::Uuid;

use haulnet_auth::Principal;
use haulnet_core::ActorId;
use haulnet_events::{EventEnvelope, InMemoryEventBus};
use haulnet_infra::{
    EngagementLog, InMemoryEngagementStore, InMemoryJobStore, JobRegistry, LocationTracker,
    realtime::{ConnectionRegistry, Notification, NotificationDispatcher, TransportHandle},
    workers::{NotificationWorker, WorkerHandle},
};
use haulnet_jobs::DomainEvent;

use crate::config::ApiConfig;

pub type Bus = Arc<InMemoryEventBus<EventEnvelope<DomainEvent>>>;
pub type Jobs = JobRegistry<Arc<InMemoryJobStore>, Bus>;
pub type Engagements = EngagementLog<Arc<InMemoryEngagementStore>, Arc<InMemoryJobStore>, Bus>;
pub type Locations = LocationTracker<Arc<InMemoryJobStore>, Bus>;

/// Everything the handlers need, shared behind one `Arc`.
pub struct AppServices {
    pub jobs: Jobs,
    pub engagements: Engagements,
    pub locations: Locations,
    pub connections: Arc<ConnectionRegistry>,
    sse_keepalive: Duration,
    // Held so the worker lives as long as the router.
    _notifier: WorkerHandle,
}

pub fn build_services(config: &ApiConfig) -> io::Result<AppServices> {
    let bus: Bus = Arc::new(InMemoryEventBus::new());
    let job_store = Arc::new(InMemoryJobStore::new());
    let connections = Arc::new(ConnectionRegistry::new());

    let notifier = NotificationWorker::spawn(
        "haulnet-notifier",
        &bus,
        NotificationDispatcher::new(connections.clone()),
    )?;

    Ok(AppServices {
        jobs: JobRegistry::with_config(job_store.clone(), bus.clone(), config.infra),
        engagements: EngagementLog::new(Arc::new(InMemoryEngagementStore::new()), job_store.clone(), bus.clone()),
        locations: LocationTracker::new(job_store, bus),
        connections,
        sse_keepalive: config.sse_keepalive,
        _notifier: notifier,
    })
}

/// Unregisters a push session when its stream is dropped, unless a newer
/// session for the same actor has replaced it.
struct SessionGuard {
    connections: Arc<ConnectionRegistry>,
    actor_id: ActorId,
    session_id: Uuid,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if self.connections.unregister_session(self.actor_id, self.session_id) {
            info!(actor_id = %self.actor_id, session_id = %self.session_id, "push session closed");
        }
    }
}

fn to_sse(notification: Notification) -> SseEvent {
    SseEvent::default()
        .event(notification.event.as_str())
        .data(notification.payload.to_string())
}

/// Register the caller for push and stream their notifications as SSE.
pub fn actor_sse_stream(
    services: Arc<AppServices>,
    principal: Principal,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let (handle, rx) = TransportHandle::channel();
    let guard = SessionGuard {
        connections: services.connections.clone(),
        actor_id: principal.actor_id(),
        session_id: handle.session_id(),
    };

    if services
        .connections
        .register(principal.actor_id(), principal.role(), handle)
        .is_some()
    {
        info!(actor_id = %principal.actor_id(), "push session replaced");
    }
    info!(actor_id = %principal.actor_id(), role = %principal.role(), session_id = %guard.session_id, "push session opened");

    let ready = SseEvent::default().event("ready").data(
        json!({
            "actorId": principal.actor_id(),
            "role": principal.role(),
        })
        .to_string(),
    );

    let notifications = ReceiverStream::new(rx).map(move |n| {
        let _session = &guard;
        Ok::<_, Infallible>(to_sse(n))
    });
    let stream = tokio_stream::iter([Ok::<_, Infallible>(ready)]).chain(notifications);

    Sse::new(stream).keep_alive(KeepAlive::new().interval(services.sse_keepalive))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn services() -> Arc<AppServices> {
        Arc::new(build_services(&ApiConfig::for_secret("test-secret")).unwrap())
    }

    #[tokio::test]
    async fn dropping_the_stream_unregisters_the_session() {
        let services = services();
        let driver = Principal::driver(ActorId::new());

        let stream = actor_sse_stream(services.clone(), driver);
        assert!(services.connections.lookup(driver.actor_id()).is_some());

        drop(stream);
        assert!(services.connections.lookup(driver.actor_id()).is_none());
    }

    #[tokio::test]
    async fn stale_stream_leaves_the_newer_session_registered() {
        let services = services();
        let driver = Principal::driver(ActorId::new());

        let first = actor_sse_stream(services.clone(), driver);
        let first_session = services.connections.lookup(driver.actor_id()).unwrap().session_id();
        let second = actor_sse_stream(services.clone(), driver);
        let second_session = services.connections.lookup(driver.actor_id()).unwrap().session_id();
        assert_ne!(first_session, second_session);

        drop(first);
        let current = services.connections.lookup(driver.actor_id()).unwrap();
        assert_eq!(current.session_id(), second_session);

        drop(second);
        assert!(services.connections.lookup(driver.actor_id()).is_none());
    }
}
