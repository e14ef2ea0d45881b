//! Logging setup shared by every binary in the workspace.

pub mod logging;

pub use logging::{LogFormat, init, init_with};
