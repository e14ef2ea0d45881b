//! Job record storage boundary.
//!
//! Jobs are stored as current-state records keyed by id; every mutation is a
//! versioned compare-and-swap against the stored record.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryJobStore;
pub use r#trait::{JobStore, JobStoreError};
