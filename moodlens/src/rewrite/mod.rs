//! Guarded rewriting of review text.
//!
//! [`Rewriter`] asks an external [`Generator`](crate::providers::Generator)
//! for a softened version of the source, then runs the polarity,
//! acceptability and residual guards from [`crate::guards`]. Any rejection
//! falls back to [`soften`](crate::guards::soften) applied to the source, so
//! non-empty input always yields a well-formed, softened answer.

mod orchestrator;
mod prompt;
mod tone;


pub use orchestrator::{RewriteOutcome, RewriteRequest, RewriteResult, RewriteState, Rewriter};
pub use prompt::{build_prompt, extract_generated_text, OUTPUT_MARKER};
pub use tone::Tone;
