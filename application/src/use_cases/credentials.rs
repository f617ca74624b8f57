//! Credentials use case
//!
//! Stores API keys and applies them to the live provider clients.

use crate::ports::credential_store::CredentialStore;
use crate::provider_client::ProviderClient;
use duet_domain::ProviderId;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors from credential operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("API key must not be empty")]
    Empty,

    #[error("Failed to save the {} API key", .0.display_name())]
    StoreFailed(ProviderId),
}

/// Use case for managing provider credentials
pub struct CredentialsUseCase {
    store: Arc<dyn CredentialStore>,
    primary: Arc<ProviderClient>,
    secondary: Arc<ProviderClient>,
}

impl CredentialsUseCase {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        primary: Arc<ProviderClient>,
        secondary: Arc<ProviderClient>,
    ) -> Self {
        Self {
            store,
            primary,
            secondary,
        }
    }

    fn client(&self, provider: ProviderId) -> &ProviderClient {
        match provider {
            ProviderId::Primary => &self.primary,
            ProviderId::SearchAugmented => &self.secondary,
        }
    }

    /// Persist a secret and apply it to the matching client.
    ///
    /// The client picks up the new key on its next call even if the store
    /// rejects it.
    pub fn store(&self, provider: ProviderId, secret: &str) -> Result<(), CredentialError> {
        let secret = secret.trim();
        if secret.is_empty() {
            return Err(CredentialError::Empty);
        }

        self.client(provider).set_credential(secret);

        if !self.store.set_credential(provider, secret) {
            return Err(CredentialError::StoreFailed(provider));
        }

        info!("Stored API key for {}", provider);
        Ok(())
    }

    /// Apply stored secrets to clients that have no credential yet.
    ///
    /// Returns the providers that received a key.
    pub fn load_into_clients(&self) -> Vec<ProviderId> {
        let mut loaded = Vec::new();

        for provider in ProviderId::ALL {
            let client = self.client(provider);
            if client.has_credential() {
                continue;
            }
            if let Some(secret) = self.store.get_credential(provider)
                && !secret.trim().is_empty()
            {
                client.set_credential(secret);
                loaded.push(provider);
            }
        }

        debug!("Loaded stored API keys for {:?}", loaded);
        loaded
    }
}
