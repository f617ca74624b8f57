//! Application behavior configuration.

use std::time::Duration;

/// Runtime behavior of the dispatch pipeline.
///
/// Controls the size of the worker pool that runs provider calls and how
/// long shutdown waits for in-flight calls before cancelling them.
#[derive(Debug, Clone)]
pub struct BehaviorConfig {
    /// Concurrent provider calls; one slot per provider is enough.
    pub pool_size: usize,
    /// How long shutdown waits for in-flight calls to drain.
    pub shutdown_grace: Duration,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            pool_size: 2,
            shutdown_grace: Duration::from_secs(5),
        }
    }
}

impl BehaviorConfig {
    /// Creates a BehaviorConfig with a grace period specified in seconds.
    pub fn with_shutdown_grace_seconds(mut self, seconds: u64) -> Self {
        self.shutdown_grace = Duration::from_secs(seconds);
        self
    }

    pub fn with_pool_size(mut self, size: usize) -> Self {
        self.pool_size = size;
        self
    }
}
