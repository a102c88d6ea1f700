//! The guarded rewrite state machine.
//!
//! ```text
//! INIT -> GENERATED -> VALIDATED -> FINALIZED
//!                   \-> FALLBACK  -/
//! ```
//!
//! The generator is asked once (or up to `retry.max_attempts` times for
//! transient failures). Its answer then passes three guards in priority
//! order: polarity, acceptability, residual strength. A failed polarity or
//! acceptability guard replaces the answer with `soften(source)`; the
//! residual guard softens whatever is about to be returned.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::{build_prompt, extract_generated_text, Tone};
use crate::config::RewriteConfig;
use crate::errors::{MoodlensError, Result};
use crate::events::{names, EventSink, NoOpEventSink};
use crate::guards::{check_acceptance, is_polarity_flip, needs_softening, soften, GuardFailure};
use crate::providers::Generator;
use crate::retry::with_retry;

/// A rewrite request as received from a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRequest {
    /// Text to rewrite.
    pub text: String,
    /// Requested tone. Missing or unrecognized values mean neutral.
    #[serde(default)]
    pub tone: Tone,
}

impl RewriteRequest {
    /// Creates a new request.
    #[must_use]
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

/// Rewrite response. An empty `text` is the canonical answer for empty input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteResult {
    /// The rewritten text.
    pub text: String,
}

/// States a rewrite passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteState {
    /// Request accepted.
    Init,
    /// Generator answered (possibly with nothing usable).
    Generated,
    /// The generated text passed the polarity and acceptability guards.
    Validated,
    /// The generated text was replaced by `soften(source)`.
    Fallback,
    /// Residual check done, result ready.
    Finalized,
}

/// Everything the orchestrator decided for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewriteOutcome {
    /// Final text.
    pub text: String,
    /// Request id used in logs and events. `None` for empty input.
    pub request_id: Option<Uuid>,
    /// States visited, in order.
    pub states: Vec<RewriteState>,
    /// The guard that rejected the generated text, if any.
    pub fallback: Option<GuardFailure>,
    /// Whether the residual guard had to soften the final text.
    pub residual_softened: bool,
}

impl RewriteOutcome {
    fn empty() -> Self {
        Self {
            text: String::new(),
            request_id: None,
            states: vec![RewriteState::Init, RewriteState::Finalized],
            fallback: None,
            residual_softened: false,
        }
    }

    /// Whether the fallback path was taken.
    #[must_use]
    pub const fn used_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// The last state reached.
    #[must_use]
    pub fn final_state(&self) -> RewriteState {
        self.states.last().copied().unwrap_or(RewriteState::Init)
    }
}

impl From<RewriteOutcome> for RewriteResult {
    fn from(outcome: RewriteOutcome) -> Self {
        Self { text: outcome.text }
    }
}

/// Runs guarded rewrites against a generator.
///
/// Cheap to clone; all clones share the same generator and sink.
#[derive(Clone)]
pub struct Rewriter {
    generator: Arc<dyn Generator>,
    events: Arc<dyn EventSink>,
    config: RewriteConfig,
}

impl std::fmt::Debug for Rewriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rewriter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Rewriter {
    /// Creates a rewriter with default settings and no event sink.
    #[must_use]
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self {
            generator,
            events: Arc::new(NoOpEventSink),
            config: RewriteConfig::default(),
        }
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Sets the rewrite configuration.
    #[must_use]
    pub fn with_config(mut self, config: RewriteConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the rewrite configuration.
    #[must_use]
    pub const fn config(&self) -> &RewriteConfig {
        &self.config
    }

    /// Rewrites `source` in `tone`. Never fails: generator errors and guard
    /// rejections fall back to rule-based softening of the source.
    pub async fn rewrite(&self, source: &str, tone: Tone) -> RewriteResult {
        self.rewrite_detailed(source, tone).await.into()
    }

    /// Handles a transport-level request.
    pub async fn rewrite_request(&self, request: &RewriteRequest) -> RewriteResult {
        self.rewrite(&request.text, request.tone).await
    }

    /// Like [`Rewriter::rewrite`], but also reports the path taken.
    pub async fn rewrite_detailed(&self, source: &str, tone: Tone) -> RewriteOutcome {
        let source = source.trim();
        if source.is_empty() {
            debug!("Empty input, skipping generation");
            return RewriteOutcome::empty();
        }

        let request_id = Uuid::new_v4();
        let span = info_span!("rewrite", %request_id, tone = tone.as_str());
        self.run(source, tone, request_id).instrument(span).await
    }

    async fn run(&self, source: &str, tone: Tone, request_id: Uuid) -> RewriteOutcome {
        let mut states = vec![RewriteState::Init];
        self.events
            .emit(
                names::REWRITE_STARTED,
                Some(json!({ "request_id": request_id, "tone": tone })),
            )
            .await;

        let prompt = build_prompt(tone, source);
        let generated = match self.generate(&prompt).await {
            Ok(text) => {
                debug!(chars = text.len(), "Generator answered");
                self.events
                    .emit(names::REWRITE_GENERATED, Some(json!({ "request_id": request_id })))
                    .await;
                text
            }
            Err(e) => {
                warn!(error = %e, fallback = true, "Generation failed");
                self.events
                    .emit(
                        names::REWRITE_GENERATION_FAILED,
                        Some(json!({ "request_id": request_id, "error": e.to_string() })),
                    )
                    .await;
                String::new()
            }
        };
        states.push(RewriteState::Generated);

        // Acceptability only runs while the output is still the generator's.
        let failure = if is_polarity_flip(source, &generated) {
            Some(GuardFailure::PolarityFlip)
        } else {
            check_acceptance(source, &generated, self.config.min_overlap)
        };

        let mut output = match failure {
            Some(guard) => {
                info!(guard = guard.as_str(), fallback = true, "Guard rejected generated text");
                self.events
                    .emit(
                        names::REWRITE_GUARD_FAILED,
                        Some(json!({ "request_id": request_id, "guard": guard })),
                    )
                    .await;
                states.push(RewriteState::Fallback);
                soften(source)
            }
            None => {
                states.push(RewriteState::Validated);
                generated
            }
        };

        let residual_softened = needs_softening(&output);
        if residual_softened {
            info!(guard = "residual", "Softening residual strong terms");
            output = soften(&output);
            self.events
                .emit(
                    names::REWRITE_RESIDUAL_SOFTENED,
                    Some(json!({ "request_id": request_id })),
                )
                .await;
        }
        states.push(RewriteState::Finalized);

        self.events
            .emit(
                names::REWRITE_COMPLETED,
                Some(json!({
                    "request_id": request_id,
                    "state": RewriteState::Finalized,
                    "fallback": failure.is_some(),
                    "guard": failure,
                    "residual_softened": residual_softened,
                })),
            )
            .await;

        RewriteOutcome {
            text: output,
            request_id: Some(request_id),
            states,
            fallback: failure,
            residual_softened,
        }
    }

    /// Calls the generator under the retry policy and optional timeout.
    /// Empty extracted text counts as a (retryable) failure.
    async fn generate(&self, prompt: &str) -> Result<String> {
        let generator = self.generator.as_ref();
        let timeout = self.config.generation_timeout();

        with_retry(&self.config.retry, MoodlensError::is_transient, move || async move {
            let raw = match timeout {
                Some(limit) => tokio::time::timeout(limit, generator.generate(prompt))
                    .await
                    .map_err(|_| MoodlensError::GenerationTimeout(limit.as_secs_f64()))??,
                None => generator.generate(prompt).await?,
            };
            let text = extract_generated_text(&raw);
            if text.is_empty() {
                Err(MoodlensError::Generation("generator returned no text".to_string()))
            } else {
                Ok(text)
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CollectingEventSink;
    use crate::providers::mocks::MockTextGenerator;

    #[tokio::test]
    async fn test_states_on_validated_path() {
        let generator = Arc::new(MockTextGenerator::returning("The app is a bit slow at times."));
        let rewriter = Rewriter::new(generator);
        let outcome = rewriter
            .rewrite_detailed("The app is slow at times", Tone::Neutral)
            .await;

        assert_eq!(outcome.text, "The app is a bit slow at times.");
        assert_eq!(
            outcome.states,
            vec![
                RewriteState::Init,
                RewriteState::Generated,
                RewriteState::Validated,
                RewriteState::Finalized
            ]
        );
        assert!(!outcome.used_fallback());
        assert!(outcome.request_id.is_some());
    }

    #[tokio::test]
    async fn test_states_on_fallback_path() {
        let rewriter = Rewriter::new(Arc::new(MockTextGenerator::failing("boom")));
        let outcome = rewriter.rewrite_detailed("awful app", Tone::Polite).await;

        assert_eq!(outcome.text, "poor app.");
        assert_eq!(outcome.fallback, Some(GuardFailure::EmptyOutput));
        assert_eq!(outcome.states[2], RewriteState::Fallback);
        assert_eq!(outcome.final_state(), RewriteState::Finalized);
    }

    #[tokio::test]
    async fn test_empty_outcome() {
        let rewriter = Rewriter::new(Arc::new(MockTextGenerator::echo()));
        let outcome = rewriter.rewrite_detailed(" \n\t ", Tone::Neutral).await;
        assert_eq!(outcome.text, "");
        assert_eq!(outcome.request_id, None);
        assert_eq!(outcome.states, vec![RewriteState::Init, RewriteState::Finalized]);
    }

    #[tokio::test]
    async fn test_event_trail() {
        let sink = Arc::new(CollectingEventSink::new());
        let rewriter = Rewriter::new(Arc::new(MockTextGenerator::echo()))
            .with_event_sink(sink.clone());
        rewriter.rewrite("I hate this awful app", Tone::Neutral).await;

        assert_eq!(
            sink.event_types(),
            vec![
                names::REWRITE_STARTED,
                names::REWRITE_GENERATED,
                names::REWRITE_GUARD_FAILED,
                names::REWRITE_COMPLETED
            ]
        );
        let data = sink.payload(names::REWRITE_GUARD_FAILED).unwrap();
        assert_eq!(data["guard"], "trivial_change");
    }

    #[tokio::test]
    async fn test_request_deserializes_with_default_tone() {
        let request: RewriteRequest = serde_json::from_str(r#"{"text": "meh"}"#).unwrap();
        assert_eq!(request.tone, Tone::Neutral);
        let request: RewriteRequest =
            serde_json::from_str(r#"{"text": "meh", "tone": "snarky"}"#).unwrap();
        assert_eq!(request.tone, Tone::Neutral);

        let rewriter = Rewriter::new(Arc::new(MockTextGenerator::echo()));
        let result = rewriter.rewrite_request(&RewriteRequest::new("", Tone::Polite)).await;
        assert_eq!(serde_json::to_value(&result).unwrap(), json!({"text": ""}));
    }
}
