//! Core domain concepts shared across all subdomains.
//!
//! - [`query::Query`]: a validated query to send to both providers
//! - [`provider::ProviderId`]: the two provider slots (primary, search-augmented)
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod provider;
pub mod query;
pub mod string;
