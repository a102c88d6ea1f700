//! Content moderation.
//!
//! [`ModerationService`] is fail-closed: if the moderator errors, the text
//! is blocked. [`GenerativeModerator`] implements [`Moderator`] by asking a
//! [`Generator`] for a one-word ALLOW/BLOCK verdict.

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::{Arc, LazyLock};
use tracing::{info, warn};

use crate::errors::Result;
use crate::events::{names, EventSink, NoOpEventSink};
use crate::providers::{Generator, ModerationDecision, Moderator};

/// Reason given for allowed content.
pub const REASON_APPROVED: &str = "Content approved";
/// Reason given when the moderator blocks content.
pub const REASON_BLOCKED: &str =
    "Content blocked: contains hate/harassment/politics/sexual/violence/PII info.";
/// Reason given when moderation itself failed.
pub const REASON_ERROR: &str = "Error during moderation";

impl ModerationDecision {
    /// An approval.
    #[must_use]
    pub fn approved() -> Self {
        Self {
            allowed: true,
            reason: REASON_APPROVED.to_string(),
        }
    }

    /// A block for policy reasons.
    #[must_use]
    pub fn blocked() -> Self {
        Self {
            allowed: false,
            reason: REASON_BLOCKED.to_string(),
        }
    }

    /// The fail-closed decision used when moderation errors.
    #[must_use]
    pub fn error() -> Self {
        Self {
            allowed: false,
            reason: REASON_ERROR.to_string(),
        }
    }
}

/// Moderation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationRequest {
    /// Text to moderate.
    pub text: String,
}

const MODERATION_PROMPT: &str = "You are a content moderation system for an anonymous mood sharing platform.
Decide if the INPUT contains ANY of the following:

- discrimination or hate speech
- insults/abuse/harassment
- sensitive political content
- sexual or pornographic content
- graphic violence or gore
- personal identifiable information (full names, phone numbers, email addresses, home addresses, social media handles)

Reply exactly one word: ALLOW or BLOCK.

INPUT:
";

static ALLOW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bALLOW\b").expect("failed to compile allow verdict regex"));

/// Builds the moderation prompt for `text`.
#[must_use]
pub fn build_moderation_prompt(text: &str) -> String {
    format!("{MODERATION_PROMPT}{}", text.trim())
}

/// Reads a generator's verdict. Only a whole-word `ALLOW` (any case)
/// allows; anything else, including an empty reply, blocks.
#[must_use]
pub fn parse_moderation_reply(raw: &str) -> ModerationDecision {
    if ALLOW_RE.is_match(&raw.trim().to_uppercase()) {
        ModerationDecision::approved()
    } else {
        ModerationDecision::blocked()
    }
}

/// [`Moderator`] backed by a text generator.
#[derive(Clone)]
pub struct GenerativeModerator {
    generator: Arc<dyn Generator>,
}

impl std::fmt::Debug for GenerativeModerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerativeModerator").finish_non_exhaustive()
    }
}

impl GenerativeModerator {
    /// Creates a moderator that asks `generator` for verdicts.
    #[must_use]
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl Moderator for GenerativeModerator {
    async fn moderate(&self, text: &str) -> Result<ModerationDecision> {
        let raw = self.generator.generate(&build_moderation_prompt(text)).await?;
        tracing::debug!(verdict = %raw.trim(), "Moderation verdict");
        Ok(parse_moderation_reply(&raw))
    }
}

/// Fail-closed moderation over any [`Moderator`].
#[derive(Clone)]
pub struct ModerationService {
    moderator: Arc<dyn Moderator>,
    events: Arc<dyn EventSink>,
}

impl std::fmt::Debug for ModerationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModerationService").finish_non_exhaustive()
    }
}

impl ModerationService {
    /// Creates a service around `moderator`.
    #[must_use]
    pub fn new(moderator: Arc<dyn Moderator>) -> Self {
        Self {
            moderator,
            events: Arc::new(NoOpEventSink),
        }
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Decides whether `text` may be published. Blank text is approved
    /// without asking the moderator.
    pub async fn moderate(&self, text: &str) -> ModerationDecision {
        if text.trim().is_empty() {
            return ModerationDecision::approved();
        }

        match self.moderator.moderate(text).await {
            Ok(decision) => {
                if !decision.allowed {
                    info!(reason = %decision.reason, "Content blocked");
                    self.events
                        .emit(
                            names::MODERATION_BLOCKED,
                            Some(json!({ "reason": decision.reason })),
                        )
                        .await;
                }
                decision
            }
            Err(e) => {
                warn!(error = %e, "Moderation failed, blocking");
                self.events
                    .emit(names::MODERATION_FAILED, Some(json!({ "error": e.to_string() })))
                    .await;
                ModerationDecision::error()
            }
        }
    }

    /// Handles a transport-level request.
    pub async fn moderate_request(&self, request: &ModerationRequest) -> ModerationDecision {
        self.moderate(&request.text).await
    }
}
