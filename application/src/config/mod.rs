//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`RetryPolicy`]: attempt budget and backoff schedule per provider call
//! - [`ProviderProfile`]: endpoint, model and instruction for one provider
//! - [`BehaviorConfig`]: worker pool sizing and shutdown grace period

pub mod behavior;
pub mod provider_profile;
pub mod retry_policy;

pub use behavior::BehaviorConfig;
pub use provider_profile::{DEFAULT_SYSTEM_INSTRUCTION, ProviderProfile};
pub use retry_policy::RetryPolicy;
