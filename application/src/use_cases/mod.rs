//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod credentials;
pub mod dispatch_query;
pub mod history;
