//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to application types on
//! demand.

mod http;
mod providers;
mod retry;
mod storage;
mod workers;

pub use http::FileHttpConfig;
pub use providers::{FileProviderConfig, FileProvidersConfig};
pub use retry::FileRetryConfig;
pub use storage::FileStorageConfig;
pub use workers::FileWorkersConfig;

use duet_application::WorkerPool;
use duet_domain::ProviderId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("http.{0} cannot be 0")]
    InvalidTimeout(&'static str),

    #[error("retry.max_attempts cannot be 0")]
    NoAttempts,

    #[error("retry.multiplier cannot be 0")]
    InvalidMultiplier,

    #[error(
        "workers.pool_size must be at least {min} (got {0})",
        min = WorkerPool::MIN_SIZE
    )]
    PoolTooSmall(usize),

    #[error("{0} endpoint cannot be empty")]
    EmptyEndpoint(ProviderId),

    #[error("{0} model name cannot be empty")]
    EmptyModelName(ProviderId),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Endpoint, model and key settings per provider
    pub providers: FileProvidersConfig,
    /// HTTP client timeouts
    pub http: FileHttpConfig,
    /// Retry schedule for provider calls
    pub retry: FileRetryConfig,
    /// Worker pool sizing and shutdown
    pub workers: FileWorkersConfig,
    /// History and credential file locations
    pub storage: FileStorageConfig,
}

impl FileConfig {
    /// Validate the configuration, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.http.connect_timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout("connect_timeout_secs"));
        }
        if self.http.read_timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout("read_timeout_secs"));
        }

        if self.retry.max_attempts == 0 {
            return Err(ConfigValidationError::NoAttempts);
        }
        if self.retry.multiplier == 0 {
            return Err(ConfigValidationError::InvalidMultiplier);
        }

        if self.workers.pool_size < WorkerPool::MIN_SIZE {
            return Err(ConfigValidationError::PoolTooSmall(self.workers.pool_size));
        }

        for id in ProviderId::ALL {
            let provider = self.providers.get(id);
            if matches!(&provider.endpoint, Some(e) if e.trim().is_empty()) {
                return Err(ConfigValidationError::EmptyEndpoint(id));
            }
            if matches!(&provider.model, Some(m) if m.trim().is_empty()) {
                return Err(ConfigValidationError::EmptyModelName(id));
            }
        }

        Ok(())
    }
}
