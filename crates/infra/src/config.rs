//! Infrastructure tuning knobs.

/// Settings for the job registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfraConfig {
    /// How many times a mutation reloads and retries after losing a
    /// compare-and-swap to an unrelated concurrent write.
    pub accept_retry_limit: usize,
}

impl InfraConfig {
    pub const DEFAULT_RETRY_LIMIT: usize = 8;
}

impl Default for InfraConfig {
    fn default() -> Self {
        Self {
            accept_retry_limit: Self::DEFAULT_RETRY_LIMIT,
        }
    }
}
