//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation
//! adapters must implement.

pub mod chat_gateway;
pub mod conversation_repository;
pub mod credential_store;
pub mod progress;
pub mod response_view;
