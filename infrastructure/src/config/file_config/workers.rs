//! Worker pool configuration from TOML (`[workers]` section)

use duet_application::BehaviorConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileWorkersConfig {
    /// Concurrent provider calls (default: 2)
    pub pool_size: usize,
    /// Seconds in-flight calls get to finish on shutdown (default: 5)
    pub shutdown_grace_secs: u64,
}

impl Default for FileWorkersConfig {
    fn default() -> Self {
        let behavior = BehaviorConfig::default();
        Self {
            pool_size: behavior.pool_size,
            shutdown_grace_secs: behavior.shutdown_grace.as_secs(),
        }
    }
}

impl FileWorkersConfig {
    pub fn to_behavior(&self) -> BehaviorConfig {
        BehaviorConfig::default()
            .with_pool_size(self.pool_size)
            .with_shutdown_grace_seconds(self.shutdown_grace_secs)
    }
}
