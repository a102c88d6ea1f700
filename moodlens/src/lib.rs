//! # MoodLens
//!
//! Guarded rewriting of harsh reviews into a requested tone, plus the
//! emotion classification, moderation and analysis services around it.
//!
//! MoodLens provides:
//!
//! - **Softening**: deterministic, rule-based replacement of strong and
//!   profane wording
//! - **Guards**: polarity, triviality and overlap checks on generated text
//! - **Rewrite orchestration**: one generation attempt per request with a
//!   softened fallback whenever a guard rejects the output
//! - **Collaborator services**: classification, moderation and cached
//!   emotion analysis over pluggable model backends
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use moodlens::prelude::*;
//!
//! let context = MoodlensContext::builder()
//!     .with_generator(Arc::new(GeminiClient::new(&config.gemini)?))
//!     .with_config(config)
//!     .build()?;
//!
//! let result = context.rewriter().rewrite("The app is awful", Tone::Polite).await;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod analysis;
pub mod classify;
pub mod config;
pub mod context;
pub mod errors;
pub mod events;
pub mod guards;
pub mod moderation;
pub mod observability;
pub mod providers;
pub mod retry;
pub mod rewrite;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::analysis::{
        AnalysisCache, EmotionAnalysis, EmotionAnalyzer, InMemoryAnalysisCache, Sentiment,
    };
    pub use crate::classify::{ClassifierService, ClassifyRequest, ClassifyResponse};
    pub use crate::config::MoodlensConfig;
    pub use crate::context::{MoodlensContext, MoodlensContextBuilder};
    pub use crate::errors::{ConfigError, MoodlensError, Result};
    pub use crate::events::{EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::guards::{is_polarity_flip, needs_softening, soften, GuardFailure};
    pub use crate::moderation::{GenerativeModerator, ModerationRequest, ModerationService};
    #[cfg(feature = "remote")]
    pub use crate::providers::{GeminiClient, HttpClassifier};
    pub use crate::providers::{
        Classifier, Generator, LabelScore, ModerationDecision, Moderator,
    };
    pub use crate::rewrite::{RewriteOutcome, RewriteRequest, RewriteResult, Rewriter, Tone};
}
