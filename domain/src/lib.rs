//! Domain layer for duet
//!
//! This crate contains the core entities, value objects and the response
//! normalizer. It has no dependencies on infrastructure or presentation
//! concerns.
//!
//! # Core Concepts
//!
//! - **Query**: a validated, non-empty request sent to both providers
//! - **ProviderResult**: the settled outcome of one provider call
//! - **ConversationRecord**: the persisted pair of answers for one query
//! - **Normalization**: turning a raw chat-completion payload into plain text

pub mod conversation;
pub mod core;
pub mod response;

// Re-export commonly used types
pub use conversation::{ConversationRecord, ProviderResult};
pub use core::{error::DomainError, provider::ProviderId, query::Query};
pub use response::{PARSE_FAILED, normalize};
