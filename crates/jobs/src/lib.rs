//! Freight job domain module.
//!
//! Business rules for the job lifecycle, live location and contact records,
//! implemented as deterministic domain logic (no IO, no HTTP, no storage).

pub mod engagement;
pub mod events;
pub mod job;
pub mod listing;
pub mod location;

pub use engagement::{ContactHandoff, Engagement, HandoffSummary, latest_per_job};
pub use events::DomainEvent;
pub use job::{Address, CargoType, Job, JobCommand, JobDetails, JobEvent, JobStatus, Rating};
pub use listing::{JobFilter, JobQuery};
pub use location::{GeoPoint, JobLocation};
