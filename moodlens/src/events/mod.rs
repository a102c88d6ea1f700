//! Named service events and the sinks that receive them.
//!
//! Services emit named events (`rewrite.started`, `rewrite.guard_failed`,
//! `analysis.cache_hit`, ...) with an optional JSON payload. Sinks are
//! injected through [`MoodlensContext`](crate::context::MoodlensContext);
//! there is no process-wide sink.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink, RecordedEvent};

/// Event names emitted by the crate.
pub mod names {
    /// A rewrite request was accepted for processing.
    pub const REWRITE_STARTED: &str = "rewrite.started";
    /// The generator produced usable text.
    pub const REWRITE_GENERATED: &str = "rewrite.generated";
    /// The generator failed, timed out or returned nothing usable.
    pub const REWRITE_GENERATION_FAILED: &str = "rewrite.generation_failed";
    /// A guard rejected the generated text.
    pub const REWRITE_GUARD_FAILED: &str = "rewrite.guard_failed";
    /// Residual strong terms were softened out of the final text.
    pub const REWRITE_RESIDUAL_SOFTENED: &str = "rewrite.residual_softened";
    /// The rewrite finished.
    pub const REWRITE_COMPLETED: &str = "rewrite.completed";
    /// Moderation blocked a text.
    pub const MODERATION_BLOCKED: &str = "moderation.blocked";
    /// Moderation failed and the text was blocked.
    pub const MODERATION_FAILED: &str = "moderation.failed";
    /// Classification failed and an empty result was returned.
    pub const CLASSIFY_FAILED: &str = "classify.failed";
    /// Emotion analysis was served from the cache.
    pub const ANALYSIS_CACHE_HIT: &str = "analysis.cache_hit";
    /// Emotion analysis failed and the neutral default was returned.
    pub const ANALYSIS_FAILED: &str = "analysis.failed";
    /// The context was shut down.
    pub const CONTEXT_SHUTDOWN: &str = "context.shutdown";
}
