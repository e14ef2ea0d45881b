use chrono::{DateTime, Utc};

/// A domain-agnostic event.
///
/// Events are immutable facts: every successful state-machine mutation produces
/// exactly one of them.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name (e.g. "jobAccepted").
    fn event_type(&self) -> &'static str;

    /// When the event occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;
}
