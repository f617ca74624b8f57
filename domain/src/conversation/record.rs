//! Conversation record entity.

use super::result::ProviderResult;
use crate::core::query::Query;
use serde::{Deserialize, Serialize};

/// One completed exchange: a query and both providers' answers.
///
/// Both response fields are always populated. A provider that failed
/// contributes its failure reason instead of an answer, so a record is
/// never half-filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRecord {
    /// Unique identifier generated per submission
    pub id: String,
    /// The query as submitted
    pub query: String,
    /// Text shown in the primary provider's slot
    pub primary_response: String,
    /// Text shown in the search-augmented provider's slot
    pub secondary_response: String,
    /// Creation time in epoch milliseconds
    pub timestamp: i64,
}

impl ConversationRecord {
    /// Assemble a record from both settled provider results.
    pub fn new(
        id: impl Into<String>,
        query: &Query,
        primary: ProviderResult,
        secondary: ProviderResult,
        timestamp: i64,
    ) -> Self {
        Self {
            id: id.into(),
            query: query.content().to_string(),
            primary_response: Self::fill(primary.into_text()),
            secondary_response: Self::fill(secondary.into_text()),
            timestamp,
        }
    }

    fn fill(text: String) -> String {
        if text.trim().is_empty() {
            "(empty response)".to_string()
        } else {
            text
        }
    }
}
