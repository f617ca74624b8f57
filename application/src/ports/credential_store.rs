//! Port for storing provider credentials.

use duet_domain::ProviderId;

/// Persistent storage for provider API keys.
pub trait CredentialStore: Send + Sync {
    /// Store a secret for a provider. Returns `false` on failure.
    fn set_credential(&self, provider: ProviderId, secret: &str) -> bool;

    /// Stored secret for a provider, if any.
    fn get_credential(&self, provider: ProviderId) -> Option<String>;
}
