//! Capability interfaces for the external models.
//!
//! The generator, classifier and moderator are opaque collaborators. Each
//! is a single-method async trait so a local model, a remote API or a test
//! double can be plugged in without touching the services that use them.
//! Implementations must be safe to call concurrently.

pub mod mocks;

#[cfg(feature = "remote")]
mod gemini;
#[cfg(feature = "remote")]
mod http_classifier;

#[cfg(feature = "remote")]
pub use gemini::{extract_response_text, GeminiClient};
#[cfg(feature = "remote")]
pub use http_classifier::HttpClassifier;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::{MoodlensError, Result};

/// A label with its probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    /// Emotion label, e.g. `joy`.
    pub label: String,
    /// Probability in `[0, 1]`.
    pub score: f32,
}

impl LabelScore {
    /// Creates a new label score.
    #[must_use]
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Allow/block decision from content moderation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationDecision {
    /// Whether the content may be published.
    pub allowed: bool,
    /// Human-readable reason.
    pub reason: String,
}

/// Free-text generation, e.g. an instruction-tuned LLM.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generates a completion for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Emotion classification.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Returns a distribution over emotion labels for `text`.
    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>>;
}

/// Content moderation.
#[async_trait]
pub trait Moderator: Send + Sync {
    /// Decides whether `text` may be published.
    async fn moderate(&self, text: &str) -> Result<ModerationDecision>;
}

/// Placeholder generator used when none is configured. Every call fails, so
/// the rewrite path always takes the softening fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableGenerator;

#[async_trait]
impl Generator for UnavailableGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(MoodlensError::Unavailable("generator"))
    }
}

/// Placeholder classifier used when none is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableClassifier;

#[async_trait]
impl Classifier for UnavailableClassifier {
    async fn classify(&self, _text: &str) -> Result<Vec<LabelScore>> {
        Err(MoodlensError::Unavailable("classifier"))
    }
}

/// Placeholder moderator used when none is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableModerator;

#[async_trait]
impl Moderator for UnavailableModerator {
    async fn moderate(&self, _text: &str) -> Result<ModerationDecision> {
        Err(MoodlensError::Unavailable("moderator"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unavailable_collaborators_fail() {
        assert!(matches!(
            UnavailableGenerator.generate("p").await,
            Err(MoodlensError::Unavailable("generator"))
        ));
        assert!(UnavailableClassifier.classify("t").await.is_err());
        assert!(UnavailableModerator.moderate("t").await.is_err());
    }

    #[test]
    fn test_label_score_serde() {
        let score = LabelScore::new("joy", 0.5);
        let json = serde_json::to_value(&score).unwrap();
        assert_eq!(json, serde_json::json!({"label": "joy", "score": 0.5}));
    }

    #[tokio::test]
    async fn test_automock_generator() {
        let mut mock = MockGenerator::new();
        mock.expect_generate()
            .times(1)
            .returning(|prompt| Ok(format!("echo: {prompt}")));
        assert_eq!(mock.generate("hi").await.unwrap(), "echo: hi");
    }
}
