//! Conversation subdomain - the outcome of one dual-provider exchange.
//!
//! - [`ProviderResult`] - one provider's settled outcome
//! - [`ConversationRecord`] - the persisted pair of answers for a query

pub mod record;
pub mod result;

pub use record::ConversationRecord;
pub use result::ProviderResult;
