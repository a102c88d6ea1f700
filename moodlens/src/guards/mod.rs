//! Guards for generated rewrites and the softening fallback.
//!
//! - [`soften`] / [`needs_softening`]: the rule-based universal fallback
//! - [`is_polarity_flip`]: clean positive/negative flip detection
//! - [`is_trivial_change`] / [`has_sufficient_overlap`]: acceptance checks

mod acceptance;
mod polarity;
mod soften;

pub use acceptance::{has_sufficient_overlap, is_trivial_change, DEFAULT_MIN_OVERLAP};
pub use polarity::{has_negative, has_positive, is_polarity_flip, Polarity, PolarityLexicon};
pub use soften::{needs_softening, soften, soften_rules, SoftenRule, TermKind};

use serde::{Deserialize, Serialize};

/// Why a generated rewrite was rejected in favour of the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardFailure {
    /// The rewrite flipped the source's polarity.
    PolarityFlip,
    /// The generator produced nothing usable.
    EmptyOutput,
    /// The rewrite only changed whitespace or casing.
    TrivialChange,
    /// The rewrite shares too little vocabulary with the source.
    InsufficientOverlap,
}

impl GuardFailure {
    /// Short name used in logs and events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PolarityFlip => "polarity_flip",
            Self::EmptyOutput => "empty_output",
            Self::TrivialChange => "trivial_change",
            Self::InsufficientOverlap => "insufficient_overlap",
        }
    }
}

impl std::fmt::Display for GuardFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checks whether a generated rewrite is acceptable: non-empty, a real
/// edit, and still about the same thing as the source.
#[must_use]
pub fn check_acceptance(source: &str, output: &str, min_overlap: f64) -> Option<GuardFailure> {
    if output.is_empty() {
        Some(GuardFailure::EmptyOutput)
    } else if is_trivial_change(source, output) {
        Some(GuardFailure::TrivialChange)
    } else if !has_sufficient_overlap(source, output, min_overlap) {
        Some(GuardFailure::InsufficientOverlap)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_acceptance_order() {
        assert_eq!(check_acceptance("x", "", 0.35), Some(GuardFailure::EmptyOutput));
        assert_eq!(
            check_acceptance("The app", "the  APP", 0.35),
            Some(GuardFailure::TrivialChange)
        );
        assert_eq!(
            check_acceptance("The app is slow", "Cats sleep a lot", 0.35),
            Some(GuardFailure::InsufficientOverlap)
        );
        assert_eq!(
            check_acceptance("The app is awful", "The app is poor", 0.35),
            None
        );
    }

    #[test]
    fn test_guard_failure_serde() {
        let json = serde_json::to_string(&GuardFailure::PolarityFlip).unwrap();
        assert_eq!(json, "\"polarity_flip\"");
        assert_eq!(GuardFailure::TrivialChange.to_string(), "trivial_change");
    }
}
