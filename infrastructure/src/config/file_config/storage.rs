//! Storage configuration from TOML (`[storage]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// Conversation history file (default: `<data dir>/duet/history.jsonl`)
    pub history_path: Option<PathBuf>,
    /// Stored API keys (default: `<data dir>/duet/credentials.json`)
    pub credentials_path: Option<PathBuf>,
}

impl FileStorageConfig {
    pub fn history_path(&self) -> PathBuf {
        self.history_path
            .clone()
            .unwrap_or_else(|| data_dir().join("history.jsonl"))
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.credentials_path
            .clone()
            .unwrap_or_else(|| data_dir().join("credentials.json"))
    }
}

/// `$XDG_DATA_HOME/duet`, or `./.duet` when no data dir is known.
fn data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("duet"))
        .unwrap_or_else(|| PathBuf::from(".duet"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths_live_in_data_dir() {
        let config = FileStorageConfig::default();
        assert!(config.history_path().ends_with("duet/history.jsonl"));
        assert!(config.credentials_path().ends_with("duet/credentials.json"));
    }

    #[test]
    fn test_explicit_paths_win() {
        let config = FileStorageConfig {
            history_path: Some(PathBuf::from("/tmp/h.jsonl")),
            credentials_path: None,
        };
        assert_eq!(config.history_path(), PathBuf::from("/tmp/h.jsonl"));
    }
}
