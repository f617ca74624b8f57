//! Provider configuration from TOML (`[providers]` section)

use duet_application::ProviderProfile;
use duet_domain::ProviderId;
use serde::{Deserialize, Serialize};

/// Settings for one provider slot.
///
/// Unset fields fall back to the built-in profile for the slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Chat-completions endpoint URL.
    pub endpoint: Option<String>,
    /// Model identifier sent with every request.
    pub model: Option<String>,
    /// Environment variable holding the API key
    /// (default: "OPENAI_API_KEY" / "PERPLEXITY_API_KEY").
    pub api_key_env: Option<String>,
    /// Direct API key (not recommended, use the env var or `duet set-key`).
    pub api_key: Option<String>,
    /// Sampling temperature.
    pub temperature: Option<f32>,
}

impl FileProviderConfig {
    /// Build the runtime profile for `id`, applying any overrides.
    pub fn to_profile(&self, id: ProviderId) -> ProviderProfile {
        let mut profile = ProviderProfile::for_provider(id);
        if let Some(endpoint) = &self.endpoint {
            profile = profile.with_endpoint(endpoint.trim());
        }
        if let Some(model) = &self.model {
            profile = profile.with_model(model.trim());
        }
        if self.temperature.is_some() {
            profile = profile.with_temperature(self.temperature);
        }
        profile
    }

    /// Name of the environment variable holding this provider's key.
    pub fn api_key_env(&self, id: ProviderId) -> &str {
        match &self.api_key_env {
            Some(name) if !name.trim().is_empty() => name.trim(),
            _ => default_api_key_env(id),
        }
    }

    /// Key from the config file, falling back to the environment variable.
    ///
    /// `lookup` reads an environment variable; empty values count as unset.
    pub fn resolve_api_key(
        &self,
        id: ProviderId,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Option<String> {
        let non_empty = |value: String| {
            let value = value.trim().to_string();
            (!value.is_empty()).then_some(value)
        };

        self.api_key
            .clone()
            .and_then(non_empty)
            .or_else(|| lookup(self.api_key_env(id)).and_then(non_empty))
    }
}

fn default_api_key_env(id: ProviderId) -> &'static str {
    match id {
        ProviderId::Primary => "OPENAI_API_KEY",
        ProviderId::SearchAugmented => "PERPLEXITY_API_KEY",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    /// General-purpose chat provider (OpenAI by default).
    pub primary: FileProviderConfig,
    /// Search-augmented provider (Perplexity by default).
    pub search: FileProviderConfig,
}

impl FileProvidersConfig {
    pub fn get(&self, id: ProviderId) -> &FileProviderConfig {
        match id {
            ProviderId::Primary => &self.primary,
            ProviderId::SearchAugmented => &self.search,
        }
    }
}
