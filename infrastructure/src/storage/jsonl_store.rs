//! JSONL file store for conversation records.
//!
//! Each [`ConversationRecord`] is serialized as a single JSON line and
//! appended to the file. Reads parse the whole file and skip lines that do
//! not decode.

use super::error::StoreError;
use super::newest_first;
use duet_application::ConversationRepository;
use duet_domain::ConversationRecord;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Append-only conversation history.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Every save is flushed before
/// it reports success.
pub struct JsonlConversationStore {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlConversationStore {
    /// Open (or create) the history file at `path`.
    ///
    /// Creates parent directories if they don't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| StoreError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        debug!("Conversation history at {}", path.display());
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    fn read_all(&self) -> Vec<ConversationRecord> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not read history {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        let mut records = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let Ok(line) = line else {
                warn!("Stopped reading history at line {}", index + 1);
                break;
            };
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<ConversationRecord>(&line) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping malformed history line {}: {}", index + 1, e),
            }
        }
        records
    }
}

impl ConversationRepository for JsonlConversationStore {
    fn save(&self, record: &ConversationRecord) -> bool {
        let line = match serde_json::to_string(record) {
            Ok(line) => line,
            Err(e) => {
                warn!("Could not serialize conversation {}: {}", record.id, e);
                return false;
            }
        };

        let Ok(mut writer) = self.writer.lock() else {
            return false;
        };

        match writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
            Ok(()) => true,
            Err(e) => {
                warn!("Could not write to {}: {}", self.path.display(), e);
                false
            }
        }
    }

    fn list_recent(&self, limit: usize) -> Vec<ConversationRecord> {
        newest_first(self.read_all(), limit)
    }

    fn get_by_id(&self, id: &str) -> Option<ConversationRecord> {
        self.read_all().into_iter().find(|r| r.id == id)
    }
}

impl Drop for JsonlConversationStore {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
