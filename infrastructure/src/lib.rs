//! Infrastructure layer for duet
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod providers;
pub mod storage;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use providers::{HttpChatGateway, HttpGatewayError};
pub use storage::{CredentialFile, InMemoryConversationStore, JsonlConversationStore, StoreError};
