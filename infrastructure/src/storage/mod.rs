//! Storage adapters for conversation history and provider credentials.
//!
//! - [`JsonlConversationStore`]: append-only JSONL history file
//! - [`InMemoryConversationStore`]: history kept for the process lifetime
//! - [`CredentialFile`]: API keys in a JSON file readable only by the owner

mod credential_file;
mod error;
mod jsonl_store;
mod memory_store;

pub use credential_file::CredentialFile;
pub use error::StoreError;
pub use jsonl_store::JsonlConversationStore;
pub use memory_store::InMemoryConversationStore;

use duet_domain::ConversationRecord;

/// Newest first, at most `limit` records. Ties keep file order reversed.
fn newest_first(mut records: Vec<ConversationRecord>, limit: usize) -> Vec<ConversationRecord> {
    records.reverse();
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    records.truncate(limit);
    records
}
