//! Port for persisting conversation records.
//!
//! The repository owns records once they are handed over. Methods are
//! synchronous and non-fallible: storage problems are reported as `false`
//! or an empty result so they never disrupt the dispatch flow.

use duet_domain::ConversationRecord;

/// Storage for completed exchanges.
pub trait ConversationRepository: Send + Sync {
    /// Persist a record. Returns `false` if it could not be stored.
    fn save(&self, record: &ConversationRecord) -> bool;

    /// Most recent records, newest first, at most `limit` of them.
    fn list_recent(&self, limit: usize) -> Vec<ConversationRecord>;

    /// Look up a record by id.
    fn get_by_id(&self, id: &str) -> Option<ConversationRecord>;
}
