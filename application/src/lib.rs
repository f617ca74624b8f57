//! Application layer for duet
//!
//! This crate contains the provider client, the worker pool, use cases,
//! port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod provider_client;
pub mod use_cases;
pub mod worker_pool;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::{BehaviorConfig, ProviderProfile, RetryPolicy};
pub use ports::{
    chat_gateway::{ChatGateway, ChatMessage, ChatRequest, ChatRole, GatewayError},
    conversation_repository::ConversationRepository,
    credential_store::CredentialStore,
    progress::{CallState, DispatchProgress, NoProgress},
    response_view::{NoView, ResponseView},
};
pub use provider_client::ProviderClient;
pub use use_cases::credentials::{CredentialError, CredentialsUseCase};
pub use use_cases::dispatch_query::{DispatchError, DispatchQueryUseCase};
pub use use_cases::history::{DEFAULT_EXPORT_LIMIT, HistoryError, HistoryUseCase};
pub use worker_pool::{PoolError, ShutdownOutcome, WorkerPool};
