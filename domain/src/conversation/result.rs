//! Provider outcome value object.

use serde::{Deserialize, Serialize};

/// Settled outcome of one provider call.
///
/// A failure carries a human-readable reason that is shown to the user
/// in place of an answer; it is never escalated into a pipeline error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum ProviderResult {
    Success(String),
    Failure(String),
}

impl ProviderResult {
    /// Creates a successful result.
    pub fn success(text: impl Into<String>) -> Self {
        ProviderResult::Success(text.into())
    }

    /// Creates a failed result with a diagnostic reason.
    pub fn failure(reason: impl Into<String>) -> Self {
        ProviderResult::Failure(reason.into())
    }

    /// Returns `true` if the provider produced an answer.
    pub fn is_success(&self) -> bool {
        matches!(self, ProviderResult::Success(_))
    }

    /// The answer text or the failure reason.
    pub fn text(&self) -> &str {
        match self {
            ProviderResult::Success(text) | ProviderResult::Failure(text) => text,
        }
    }

    /// Consume the result, yielding the text to display in either case.
    pub fn into_text(self) -> String {
        match self {
            ProviderResult::Success(text) | ProviderResult::Failure(text) => text,
        }
    }
}
