//! Connection registry: the directory of actors reachable for push.
//!
//! One entry per actor. A reconnect replaces the previous session; a
//! disconnect only removes the entry if it still belongs to the session that
//! is going away, so a late disconnect never evicts a newer connection.

use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value as JsonValue;
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

use haulnet_auth::Role;
use haulnet_core::ActorId;

/// Maximum pending notifications per session before new ones are dropped.
pub const NOTIFICATION_CHANNEL_CAPACITY: usize = 256;

pub type NotificationReceiver = mpsc::Receiver<Notification>;

/// Wire event names pushed to clients.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum NotificationKind {
    #[serde(rename = "newJobAvailable")]
    NewJobAvailable,
    #[serde(rename = "jobStatusChanged")]
    JobStatusChanged,
    #[serde(rename = "jobRated")]
    JobRated,
    #[serde(rename = "contactInitiated")]
    ContactInitiated,
    #[serde(rename = "locationUpdated")]
    LocationUpdated,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::NewJobAvailable => "newJobAvailable",
            NotificationKind::JobStatusChanged => "jobStatusChanged",
            NotificationKind::JobRated => "jobRated",
            NotificationKind::ContactInitiated => "contactInitiated",
            NotificationKind::LocationUpdated => "locationUpdated",
        }
    }
}

impl core::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named event with a JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub event: NotificationKind,
    pub payload: JsonValue,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("session {0} is closed")]
    Closed(Uuid),

    #[error("session {0} is not keeping up")]
    Full(Uuid),
}

/// Sending half of one live session.
#[derive(Debug, Clone)]
pub struct TransportHandle {
    session_id: Uuid,
    tx: mpsc::Sender<Notification>,
}

impl TransportHandle {
    /// New handle plus the receiver the transport drains.
    pub fn channel() -> (Self, NotificationReceiver) {
        let (tx, rx) = mpsc::channel(NOTIFICATION_CHANNEL_CAPACITY);
        (
            Self {
                session_id: Uuid::now_v7(),
                tx,
            },
            rx,
        )
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Never waits: a full or closed session is an error for the caller to log.
    pub fn push(&self, notification: Notification) -> Result<(), TransportError> {
        self.tx.try_send(notification).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => TransportError::Full(self.session_id),
            mpsc::error::TrySendError::Closed(_) => TransportError::Closed(self.session_id),
        })
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[derive(Debug, Clone)]
struct Session {
    role: Role,
    handle: TransportHandle,
}

/// Concurrency-safe `actor -> session` map.
///
/// Internally sharded; callers never lock. Operations on the same actor are
/// linearizable because each one touches a single map entry atomically.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    sessions: DashMap<ActorId, Session>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert; returns the handle this registration replaced, if any.
    pub fn register(&self, actor_id: ActorId, role: Role, handle: TransportHandle) -> Option<TransportHandle> {
        self.sessions
            .insert(actor_id, Session { role, handle })
            .map(|previous| previous.handle)
    }

    /// Remove whatever session the actor has. No-op when absent.
    pub fn unregister(&self, actor_id: ActorId) -> bool {
        self.sessions.remove(&actor_id).is_some()
    }

    /// Remove the actor's entry only if it is still `session_id`.
    pub fn unregister_session(&self, actor_id: ActorId, session_id: Uuid) -> bool {
        self.sessions
            .remove_if(&actor_id, |_, s| s.handle.session_id == session_id)
            .is_some()
    }

    pub fn lookup(&self, actor_id: ActorId) -> Option<TransportHandle> {
        self.sessions.get(&actor_id).map(|s| s.handle.clone())
    }

    pub fn all_with_role(&self, role: Role) -> Vec<(ActorId, TransportHandle)> {
        self.sessions
            .iter()
            .filter(|e| e.value().role == role)
            .map(|e| (*e.key(), e.value().handle.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
