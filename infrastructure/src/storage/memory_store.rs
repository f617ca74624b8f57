//! In-memory conversation store.

use super::newest_first;
use duet_application::ConversationRepository;
use duet_domain::ConversationRecord;
use std::sync::Mutex;

/// Keeps records for the lifetime of the process (used with `--no-history`).
#[derive(Default)]
pub struct InMemoryConversationStore {
    records: Mutex<Vec<ConversationRecord>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ConversationRepository for InMemoryConversationStore {
    fn save(&self, record: &ConversationRecord) -> bool {
        match self.records.lock() {
            Ok(mut records) => {
                records.push(record.clone());
                true
            }
            Err(_) => false,
        }
    }

    fn list_recent(&self, limit: usize) -> Vec<ConversationRecord> {
        self.records
            .lock()
            .map(|records| newest_first(records.clone(), limit))
            .unwrap_or_default()
    }

    fn get_by_id(&self, id: &str) -> Option<ConversationRecord> {
        self.records
            .lock()
            .ok()?
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }
}
