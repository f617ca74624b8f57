//! Provider profile: the fixed, per-provider half of a provider client.

use crate::ports::chat_gateway::{ChatMessage, ChatRequest};
use duet_domain::{ProviderId, Query};
use serde::{Deserialize, Serialize};

/// Instruction sent as the system message to both providers.
///
/// Asks for plain conversational text so the normalizer has little to strip.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "Be precise and concise. \
Do not use LaTeX, markdown formatting, or symbols like [1][2] for references. \
Use plain, conversational language as if speaking directly to a person. \
Format information clearly with regular bullet points for lists. \
Use everyday language and avoid academic or technical jargon when possible. \
Return only the actual answer content, without any metadata, json, or citations. \
Do not use any markdown formatting, especially no asterisks (**) for bold text. \
Do not include any special Unicode characters like \\u2022.";

/// Endpoint, model and request shape for one provider.
///
/// Both providers speak the same chat-completion protocol; the profile is
/// the only thing that differs between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderProfile {
    pub id: ProviderId,
    /// Full chat-completions URL
    pub endpoint: String,
    /// Model identifier sent in the request body
    pub model: String,
    pub system_instruction: String,
    /// Sampling temperature, omitted from the body when unset
    pub temperature: Option<f32>,
}

impl ProviderProfile {
    /// OpenAI chat completions.
    pub fn primary() -> Self {
        Self {
            id: ProviderId::Primary,
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4.1-nano".to_string(),
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            temperature: None,
        }
    }

    /// Perplexity chat completions (web-search-augmented).
    pub fn search_augmented() -> Self {
        Self {
            id: ProviderId::SearchAugmented,
            endpoint: "https://api.perplexity.ai/chat/completions".to_string(),
            model: "sonar".to_string(),
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            temperature: Some(0.7),
        }
    }

    /// Default profile for a provider slot.
    pub fn for_provider(id: ProviderId) -> Self {
        match id {
            ProviderId::Primary => Self::primary(),
            ProviderId::SearchAugmented => Self::search_augmented(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Build the chat request for a query.
    pub fn request_for(&self, query: &Query) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(&self.system_instruction),
                ChatMessage::user(query.content()),
            ],
            temperature: self.temperature,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let query = Query::try_new(r#"Say "hi" \ bye"#).unwrap();
        let request = ProviderProfile::primary().request_for(&query);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gpt-4.1-nano");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], r#"Say "hi" \ bye"#);
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn test_search_profile_sends_temperature() {
        let query = Query::try_new("news").unwrap();
        let request = ProviderProfile::search_augmented().request_for(&query);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "sonar");
        assert!(json["temperature"].as_f64().is_some());
    }

    #[test]
    fn test_for_provider() {
        for id in ProviderId::ALL {
            assert_eq!(ProviderProfile::for_provider(id).id, id);
        }
    }
}
