//! Provider identifier value object

use super::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The two provider slots a query is sent to (Value Object)
///
/// Exactly two providers take part in every exchange: a primary
/// chat-completion endpoint and a web-search-augmented one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProviderId {
    Primary,
    SearchAugmented,
}

impl ProviderId {
    /// Both providers, in display order
    pub const ALL: [ProviderId; 2] = [ProviderId::Primary, ProviderId::SearchAugmented];

    /// Get the string identifier for this provider
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Primary => "primary",
            ProviderId::SearchAugmented => "search-augmented",
        }
    }

    /// Human-readable name used in panel headers and diagnostics
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderId::Primary => "Primary",
            ProviderId::SearchAugmented => "Search-Augmented",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProviderId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "primary" | "openai" | "chatgpt" => Ok(ProviderId::Primary),
            "search-augmented" | "search" | "perplexity" => Ok(ProviderId::SearchAugmented),
            other => Err(DomainError::UnknownProvider(other.to_string())),
        }
    }
}

impl Serialize for ProviderId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProviderId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_roundtrip() {
        for id in ProviderId::ALL {
            let parsed: ProviderId = id.to_string().parse().unwrap();
            assert_eq!(id, parsed);
        }
    }

    #[test]
    fn test_legacy_aliases() {
        assert_eq!("chatgpt".parse::<ProviderId>().unwrap(), ProviderId::Primary);
        assert_eq!("OpenAI".parse::<ProviderId>().unwrap(), ProviderId::Primary);
        assert_eq!(
            "perplexity".parse::<ProviderId>().unwrap(),
            ProviderId::SearchAugmented
        );
    }

    #[test]
    fn test_unknown_provider() {
        let err = "gemini".parse::<ProviderId>().unwrap_err();
        assert_eq!(err, DomainError::UnknownProvider("gemini".to_string()));
    }
}
