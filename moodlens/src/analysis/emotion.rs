//! Coarse emotion analysis of posts through a text generator.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

use super::cache::AnalysisCache;
use crate::errors::{MoodlensError, Result};
use crate::events::{names, EventSink, NoOpEventSink};
use crate::providers::Generator;
use crate::utils::content_fingerprint;

/// Three-way emotion of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Sentiment {
    /// Positive.
    Positive,
    /// Neutral, also used for anything unrecognized.
    #[default]
    Neutral,
    /// Negative.
    Negative,
}

impl Sentiment {
    /// Parses a sentiment name; unknown names are neutral.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "positive" => Self::Positive,
            "negative" => Self::Negative,
            _ => Self::Neutral,
        }
    }

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl From<String> for Sentiment {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of analysing one post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionAnalysis {
    /// Overall emotion.
    pub emotion: Sentiment,
    /// Short keywords describing the post.
    pub keywords: Vec<String>,
    /// Emojis found in the post, concatenated in order.
    pub emojis: String,
}

impl EmotionAnalysis {
    /// The default returned when analysis fails.
    #[must_use]
    pub fn neutral(emojis: String) -> Self {
        Self {
            emotion: Sentiment::Neutral,
            keywords: Vec::new(),
            emojis,
        }
    }
}

const EMOJI_RANGES: &[(u32, u32)] = &[
    (0x1F600, 0x1F64F), // emoticons
    (0x1F300, 0x1F5FF), // symbols and pictographs
    (0x1F680, 0x1F6FF), // transport and map
    (0x1F1E0, 0x1F1FF), // regional indicators
    (0x2702, 0x27B0),   // dingbats
    (0x24C2, 0x1F251),  // enclosed characters
];

fn is_emoji(c: char) -> bool {
    let code = u32::from(c);
    EMOJI_RANGES
        .iter()
        .any(|&(start, end)| (start..=end).contains(&code))
}

/// Returns every emoji character in `text`, in order.
#[must_use]
pub fn extract_emojis(text: &str) -> String {
    text.chars().filter(|&c| is_emoji(c)).collect()
}

const ANALYSIS_PROMPT: &str = r#"Analyze the emotional tone of this text (including any emojis).
Reply ONLY in JSON format:
{
    "emotion": "positive" or "neutral" or "negative",
    "keywords": ["keyword1", "keyword2", "keyword3"]
}

TEXT:
"#;

/// Builds the analysis prompt for `text`.
#[must_use]
pub fn build_analysis_prompt(text: &str) -> String {
    format!("{ANALYSIS_PROMPT}{text}")
}

#[derive(Deserialize)]
struct AnalysisReply {
    #[serde(default)]
    emotion: Sentiment,
    #[serde(default)]
    keywords: Vec<String>,
}

/// Parses a generator reply, tolerating a surrounding markdown code fence.
/// The returned analysis has no emojis; the caller adds them.
pub fn parse_analysis_reply(raw: &str) -> Result<EmotionAnalysis> {
    let mut body = raw.trim();
    body = body
        .strip_prefix("```json")
        .or_else(|| body.strip_prefix("```"))
        .unwrap_or(body);
    body = body.strip_suffix("```").unwrap_or(body).trim();

    let reply: AnalysisReply = serde_json::from_str(body)
        .map_err(|e| MoodlensError::Generation(format!("unparsable analysis reply: {e}")))?;
    Ok(EmotionAnalysis {
        emotion: reply.emotion,
        keywords: reply.keywords,
        emojis: String::new(),
    })
}

/// Analyses posts with a generator, caching results by content fingerprint.
#[derive(Clone)]
pub struct EmotionAnalyzer {
    generator: Arc<dyn Generator>,
    cache: Arc<dyn AnalysisCache>,
    events: Arc<dyn EventSink>,
}

impl std::fmt::Debug for EmotionAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmotionAnalyzer")
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl EmotionAnalyzer {
    /// Creates an analyzer.
    #[must_use]
    pub fn new(generator: Arc<dyn Generator>, cache: Arc<dyn AnalysisCache>) -> Self {
        Self {
            generator,
            cache,
            events: Arc::new(NoOpEventSink),
        }
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Analyses `text`. Never fails: generator or parse errors yield a
    /// neutral analysis, which is not cached. Blank text is neutral without
    /// a generator call.
    pub async fn analyze(&self, text: &str) -> EmotionAnalysis {
        let emojis = extract_emojis(text);
        if text.trim().is_empty() {
            return EmotionAnalysis::neutral(emojis);
        }

        let fingerprint = content_fingerprint(text);
        if let Some(cached) = self.cache.get(&fingerprint) {
            debug!(%fingerprint, "Analysis cache hit");
            self.events
                .emit(
                    names::ANALYSIS_CACHE_HIT,
                    Some(json!({ "fingerprint": fingerprint })),
                )
                .await;
            return cached;
        }

        let result = self
            .generator
            .generate(&build_analysis_prompt(text))
            .await
            .and_then(|raw| parse_analysis_reply(&raw));

        match result {
            Ok(mut analysis) => {
                analysis.emojis = emojis;
                self.cache.put(fingerprint, analysis.clone());
                analysis
            }
            Err(e) => {
                warn!(error = %e, "Emotion analysis failed, defaulting to neutral");
                self.events
                    .emit(names::ANALYSIS_FAILED, Some(json!({ "error": e.to_string() })))
                    .await;
                EmotionAnalysis::neutral(emojis)
            }
        }
    }
}
