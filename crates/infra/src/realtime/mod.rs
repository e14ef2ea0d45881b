//! Real-time push: who is connected, and what they get told.

pub mod connections;
pub mod dispatcher;

pub use connections::{
    ConnectionRegistry, Notification, NotificationKind, NotificationReceiver, TransportError, TransportHandle,
};
pub use dispatcher::{Delivery, NotificationDispatcher, Route, route_for};
