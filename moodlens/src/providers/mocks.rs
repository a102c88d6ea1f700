//! Mock collaborators for tests, demos and offline runs.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{Classifier, Generator, LabelScore, ModerationDecision, Moderator};
use crate::errors::{MoodlensError, Result};

/// What a [`MockTextGenerator`] does when called.
#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Fail(String),
}

/// Mock text generator.
///
/// Replies are consumed in order; once the script is exhausted the last
/// reply repeats. With no script at all it echoes the text between
/// `Input: "` and the closing quote of the prompt, i.e. it hands the
/// source back unchanged.
#[derive(Debug, Default)]
pub struct MockTextGenerator {
    script: Mutex<VecDeque<Reply>>,
    last: Mutex<Option<Reply>>,
    latency: Option<Duration>,
    prompts: Mutex<Vec<String>>,
    call_count: AtomicUsize,
}

impl MockTextGenerator {
    /// Creates a generator that always returns `text`.
    #[must_use]
    pub fn returning(text: impl Into<String>) -> Self {
        Self::scripted(vec![Ok(text.into())])
    }

    /// Creates a generator that always fails with `message`.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::scripted(vec![Err(message.into())])
    }

    /// Creates a generator that echoes the quoted source of the prompt.
    #[must_use]
    pub fn echo() -> Self {
        Self::default()
    }

    /// Creates a generator that walks through `replies` in order.
    #[must_use]
    pub fn scripted(replies: Vec<std::result::Result<String, String>>) -> Self {
        let script = replies
            .into_iter()
            .map(|reply| match reply {
                Ok(text) => Reply::Text(text),
                Err(message) => Reply::Fail(message),
            })
            .collect();
        Self {
            script: Mutex::new(script),
            ..Self::default()
        }
    }

    /// Adds artificial latency to every call.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Returns the call count.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Returns every prompt received so far.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    /// Resets the mock.
    pub fn reset(&self) {
        self.call_count.store(0, Ordering::SeqCst);
        self.prompts.lock().clear();
    }

    fn next_reply(&self) -> Option<Reply> {
        let next = self.script.lock().pop_front();
        let mut last = self.last.lock();
        if let Some(reply) = next {
            *last = Some(reply);
        }
        last.clone()
    }
}

fn echo_source(prompt: &str) -> String {
    let Some(start) = prompt.rfind("Input: \"") else {
        return prompt.to_string();
    };
    let body = &prompt[start + "Input: \"".len()..];
    let end = body.rfind('"').unwrap_or(body.len());
    body[..end].replace("\\\"", "\"")
}

#[async_trait]
impl Generator for MockTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().push(prompt.to_string());
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match self.next_reply() {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Fail(message)) => Err(MoodlensError::Generation(message)),
            None => Ok(echo_source(prompt)),
        }
    }
}

/// Mock classifier returning a fixed distribution.
#[derive(Debug, Default)]
pub struct MockClassifier {
    results: Vec<LabelScore>,
    fail: bool,
    call_count: AtomicUsize,
}

impl MockClassifier {
    /// Creates a classifier that always returns `results` (in the given
    /// order, unsorted).
    #[must_use]
    pub fn new(results: Vec<LabelScore>) -> Self {
        Self {
            results,
            ..Self::default()
        }
    }

    /// Creates a classifier whose every call fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Returns the call count.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(&self, _text: &str) -> Result<Vec<LabelScore>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(MoodlensError::Classification("mock failure".to_string()));
        }
        Ok(self.results.clone())
    }
}

/// Mock moderator that blocks any text containing one of its blocked
/// words (case-insensitive).
#[derive(Debug, Default)]
pub struct MockModerator {
    blocked_words: Vec<String>,
    fail: bool,
    call_count: AtomicUsize,
}

impl MockModerator {
    /// Creates a moderator blocking `blocked_words`.
    #[must_use]
    pub fn new(blocked_words: Vec<String>) -> Self {
        Self {
            blocked_words: blocked_words.into_iter().map(|w| w.to_lowercase()).collect(),
            ..Self::default()
        }
    }

    /// Creates a moderator whose every call fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Returns the call count.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Moderator for MockModerator {
    async fn moderate(&self, text: &str) -> Result<ModerationDecision> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(MoodlensError::Moderation("mock failure".to_string()));
        }
        let lowered = text.to_lowercase();
        let hit = self.blocked_words.iter().find(|w| lowered.contains(w.as_str()));
        Ok(match hit {
            Some(word) => ModerationDecision {
                allowed: false,
                reason: format!("blocked word: {word}"),
            },
            None => ModerationDecision {
                allowed: true,
                reason: "Content approved".to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_returning_repeats() {
        let generator = MockTextGenerator::returning("hello");
        assert_eq!(generator.generate("a").await.unwrap(), "hello");
        assert_eq!(generator.generate("b").await.unwrap(), "hello");
        assert_eq!(generator.call_count(), 2);
        assert_eq!(generator.prompts(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_scripted_then_last_repeats() {
        let generator =
            MockTextGenerator::scripted(vec![Err("down".to_string()), Ok("fine".to_string())]);
        assert!(generator.generate("p").await.is_err());
        assert_eq!(generator.generate("p").await.unwrap(), "fine");
        assert_eq!(generator.generate("p").await.unwrap(), "fine");
    }

    #[tokio::test]
    async fn test_echo_extracts_source() {
        let generator = MockTextGenerator::echo();
        let prompt = "Rewrite.\n\nInput: \"say \\\"hi\\\" now\"\nOutput:";
        assert_eq!(generator.generate(prompt).await.unwrap(), "say \"hi\" now");
    }

    #[tokio::test]
    async fn test_reset() {
        let generator = MockTextGenerator::echo();
        generator.generate("x").await.unwrap();
        generator.reset();
        assert_eq!(generator.call_count(), 0);
        assert!(generator.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_mock_classifier() {
        let classifier = MockClassifier::new(vec![LabelScore::new("joy", 0.9)]);
        assert_eq!(classifier.classify("x").await.unwrap().len(), 1);
        assert!(MockClassifier::failing().classify("x").await.is_err());
    }

    #[tokio::test]
    async fn test_mock_moderator() {
        let moderator = MockModerator::new(vec!["Idiot".to_string()]);
        assert!(moderator.moderate("hello").await.unwrap().allowed);
        let decision = moderator.moderate("you IDIOT").await.unwrap();
        assert!(!decision.allowed);
        assert_eq!(decision.reason, "blocked word: idiot");
        assert_eq!(moderator.call_count(), 2);
    }
}
