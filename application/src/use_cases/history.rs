//! History use case
//!
//! Read access to saved conversations and export to a JSON file.

use crate::ports::conversation_repository::ConversationRepository;
use duet_domain::ConversationRecord;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Number of records exported when no limit is given.
pub const DEFAULT_EXPORT_LIMIT: usize = 100;

/// Errors from history operations
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Conversation not found: {0}")]
    NotFound(String),

    #[error("Failed to serialize conversations: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Use case for browsing and exporting saved conversations
#[derive(Clone)]
pub struct HistoryUseCase {
    repository: Arc<dyn ConversationRepository>,
}

impl HistoryUseCase {
    pub fn new(repository: Arc<dyn ConversationRepository>) -> Self {
        Self { repository }
    }

    /// Most recent conversations, newest first.
    pub fn recent(&self, limit: usize) -> Vec<ConversationRecord> {
        self.repository.list_recent(limit)
    }

    pub fn find(&self, id: &str) -> Result<ConversationRecord, HistoryError> {
        self.repository
            .get_by_id(id)
            .ok_or_else(|| HistoryError::NotFound(id.to_string()))
    }

    /// Write up to `limit` recent conversations to `path` as a pretty JSON
    /// array. Returns the number of records written.
    pub fn export(&self, path: &Path, limit: usize) -> Result<usize, HistoryError> {
        let records = self.repository.list_recent(limit);
        let json = serde_json::to_string_pretty(&records)?;

        std::fs::write(path, json).map_err(|source| {
            warn!("Export to {} failed: {}", path.display(), source);
            HistoryError::Write {
                path: path.to_path_buf(),
                source,
            }
        })?;

        info!("Exported {} conversation(s) to {}", records.len(), path.display());
        Ok(records.len())
    }
}
