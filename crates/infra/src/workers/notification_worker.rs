use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use haulnet_events::{EventBus, EventEnvelope, Subscription};
use haulnet_jobs::DomainEvent;

use crate::realtime::NotificationDispatcher;

/// Handle to control and join a background worker.
#[derive(Debug)]
pub struct WorkerHandle {
    shutdown: mpsc::Sender<()>,
    join: Option<thread::JoinHandle<()>>,
}

impl WorkerHandle {
    /// Request graceful shutdown and wait for the worker to stop.
    pub fn shutdown(mut self) {
        let _ = self.shutdown.send(());
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
    }
}

/// Bridges the event bus to the notification dispatcher.
///
/// Runs on its own thread so a slow recipient never holds up the operation
/// that produced the event.
#[derive(Debug)]
pub struct NotificationWorker;

impl NotificationWorker {
    /// Subscribe now, then route every published event on a worker thread.
    pub fn spawn<B>(name: &'static str, bus: &B, dispatcher: NotificationDispatcher) -> io::Result<WorkerHandle>
    where
        B: EventBus<EventEnvelope<DomainEvent>>,
    {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let sub = bus.subscribe();

        let join = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || worker_loop(name, sub, shutdown_rx, &dispatcher))?;

        info!(worker = name, "notification worker started");
        Ok(WorkerHandle {
            shutdown: shutdown_tx,
            join: Some(join),
        })
    }
}

fn worker_loop(
    name: &'static str,
    sub: Subscription<EventEnvelope<DomainEvent>>,
    shutdown_rx: mpsc::Receiver<()>,
    dispatcher: &NotificationDispatcher,
) {
    let tick = Duration::from_millis(250);

    loop {
        match shutdown_rx.try_recv() {
            Ok(()) | Err(mpsc::TryRecvError::Disconnected) => break,
            Err(mpsc::TryRecvError::Empty) => {}
        }

        match sub.recv_timeout(tick) {
            Ok(envelope) => {
                debug!(
                    worker = name,
                    aggregate_id = %envelope.aggregate_id(),
                    sequence = envelope.sequence_number(),
                    "routing event"
                );
                dispatcher.dispatch(envelope.payload());
            }
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    info!(worker = name, "notification worker stopped");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Instant;

    use super::*;
    use haulnet_auth::{Principal, Role};
    use haulnet_core::ActorId;
    use haulnet_events::InMemoryEventBus;
    use haulnet_jobs::{Address, CargoType, JobDetails};

    use crate::job_registry::JobRegistry;
    use crate::job_store::InMemoryJobStore;
    use crate::realtime::{ConnectionRegistry, NotificationKind, NotificationReceiver, TransportHandle};

    fn wait_for(rx: &mut NotificationReceiver) -> Option<crate::realtime::Notification> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if let Ok(n) = rx.try_recv() {
                return Some(n);
            }
            thread::sleep(Duration::from_millis(10));
        }
        None
    }

    #[test]
    fn committed_events_reach_connected_actors() {
        let bus = Arc::new(InMemoryEventBus::<EventEnvelope<DomainEvent>>::new());
        let connections = Arc::new(ConnectionRegistry::new());
        let registry = JobRegistry::new(Arc::new(InMemoryJobStore::new()), bus.clone());
        let worker =
            NotificationWorker::spawn("notify-test", &bus, NotificationDispatcher::new(connections.clone())).unwrap();

        let shipper = Principal::shipper(ActorId::new());
        let driver = Principal::driver(ActorId::new());
        let offline_driver = Principal::driver(ActorId::new());

        let (dh, mut drx) = TransportHandle::channel();
        connections.register(driver.actor_id(), Role::Driver, dh);
        let (sh, mut srx) = TransportHandle::channel();
        connections.register(shipper.actor_id(), Role::Shipper, sh);

        let details = JobDetails {
            origin: Address::new("Curitiba", "PR", "Rua XV"),
            destination: Address::new("Joinville", "SC", "Av. Brasil"),
            cargo_type: Some(CargoType::Delivery),
            ..JobDetails::default()
        };
        let job = registry.create_job(&shipper, details).unwrap();
        let note = wait_for(&mut drx).unwrap();
        assert_eq!(note.event, NotificationKind::NewJobAvailable);
        assert!(connections.lookup(offline_driver.actor_id()).is_none());

        registry.accept_job(&driver, job.job_id()).unwrap();
        let note = wait_for(&mut srx).unwrap();
        assert_eq!(note.event, NotificationKind::JobStatusChanged);
        assert_eq!(note.payload["event"], "jobAccepted");

        connections.unregister(driver.actor_id());
        registry.reject_job(&driver, job.job_id()).unwrap();

        worker.shutdown();
        assert!(drx.try_recv().is_err());
    }
}
