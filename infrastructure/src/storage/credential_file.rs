//! JSON credential file.
//!
//! Stores one API key per provider as `{"primary": "...", "search-augmented": "..."}`.
//! On Unix the file is created with mode 0600.

use duet_application::CredentialStore;
use duet_domain::ProviderId;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

type Secrets = BTreeMap<String, String>;

/// File-backed [`CredentialStore`].
pub struct CredentialFile {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CredentialFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current file contents. A missing file is empty; `None` means the
    /// file exists but could not be read or parsed.
    fn read(&self) -> Option<Secrets> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Some(Secrets::new()),
            Err(e) => {
                warn!("Could not read {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(secrets) => Some(secrets),
            Err(e) => {
                warn!("Malformed credential file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn write(&self, secrets: &Secrets) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(secrets).map_err(std::io::Error::other)?;

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&self.path)?;
        file.write_all(json.as_bytes())?;

        // `mode` only applies when the file is created.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }
}

impl CredentialStore for CredentialFile {
    fn set_credential(&self, provider: ProviderId, secret: &str) -> bool {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        // Never replace a file we could not read: it may hold other keys.
        let Some(mut secrets) = self.read() else {
            return false;
        };
        secrets.insert(provider.as_str().to_string(), secret.to_string());

        match self.write(&secrets) {
            Ok(()) => {
                debug!("Saved {} key to {}", provider, self.path.display());
                true
            }
            Err(e) => {
                warn!("Could not save credentials to {}: {}", self.path.display(), e);
                false
            }
        }
    }

    fn get_credential(&self, provider: ProviderId) -> Option<String> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.read()?
            .remove(provider.as_str())
            .filter(|secret| !secret.trim().is_empty())
    }
}
