//! Infrastructure layer: stores, the job registry, engagement log, location
//! tracking and real-time notification delivery.

pub mod config;
pub mod engagement_log;
pub mod job_registry;
pub mod job_store;
pub mod location_tracker;
pub mod realtime;
pub mod workers;

pub use config::InfraConfig;
pub use engagement_log::{EngagementLog, EngagementStore, EngagementStoreError, InMemoryEngagementStore};
pub use job_registry::JobRegistry;
pub use job_store::{InMemoryJobStore, JobStore, JobStoreError};
pub use location_tracker::LocationTracker;
