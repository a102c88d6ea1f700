//! Acceptance checks for generated rewrites.

use crate::utils::{jaccard_similarity, normalize_whitespace, tokenize};

/// Default Jaccard threshold below which a rewrite counts as unrelated.
pub const DEFAULT_MIN_OVERLAP: f64 = 0.35;

/// Returns true when `output` differs from `source` only in whitespace or
/// letter case.
#[must_use]
pub fn is_trivial_change(source: &str, output: &str) -> bool {
    normalize_whitespace(source).to_lowercase() == normalize_whitespace(output).to_lowercase()
}

/// Returns true when the token sets of `source` and `output` overlap by at
/// least `threshold` (Jaccard). A score of zero never passes, whatever the
/// threshold.
#[must_use]
pub fn has_sufficient_overlap(source: &str, output: &str, threshold: f64) -> bool {
    let score = jaccard_similarity(tokenize(source), tokenize(output));
    score > 0.0 && score >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trivial_change_whitespace_and_case() {
        assert!(is_trivial_change("Bad  app", "bad app"));
        assert!(is_trivial_change(" Bad app\n", "BAD APP"));
    }

    #[test]
    fn test_punctuation_is_not_trivial() {
        assert!(!is_trivial_change("bad app", "bad app."));
        assert!(!is_trivial_change("bad app", "poor app"));
    }

    #[test]
    fn test_overlap_threshold() {
        // {the, app, is, slow} vs {the, app, is, quick}: 3 / 5
        assert!(has_sufficient_overlap(
            "the app is slow",
            "the app is quick",
            DEFAULT_MIN_OVERLAP
        ));
        assert!(!has_sufficient_overlap(
            "the app is slow",
            "bananas grow in warm climates",
            DEFAULT_MIN_OVERLAP
        ));
    }

    #[test]
    fn test_overlap_exactly_at_threshold_passes() {
        // 1 / 2
        assert!(has_sufficient_overlap("a", "a b", 0.5));
    }

    #[test]
    fn test_empty_output_never_overlaps() {
        assert!(!has_sufficient_overlap("the app", "", 0.0));
    }

    #[test]
    fn test_zero_threshold_still_needs_a_shared_word() {
        assert!(!has_sufficient_overlap("This app is awful", "!!! 123 ???", 0.0));
        assert!(!has_sufficient_overlap("This app is awful", "cats sleep", 0.0));
        assert!(has_sufficient_overlap("This app is awful", "the app", 0.0));
    }
}
