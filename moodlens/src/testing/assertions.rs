//! Panicking assertions for the rewrite guarantees.

use crate::guards::{is_polarity_flip, is_trivial_change, needs_softening, PolarityLexicon};

/// Panics if `output` clearly flips the polarity of `source`.
#[track_caller]
pub fn assert_no_polarity_flip(source: &str, output: &str) {
    if is_polarity_flip(source, output) {
        let lexicon = PolarityLexicon::global();
        panic!(
            "polarity flipped from {:?} to {:?}\n  source: {source:?}\n  output: {output:?}",
            lexicon.sense(source),
            lexicon.sense(output),
        );
    }
}

/// Panics if `output` still contains a strong or profane term.
#[track_caller]
pub fn assert_residual_clean(output: &str) {
    assert!(
        !needs_softening(output),
        "output still needs softening: {output:?}"
    );
}

/// Panics if `output` differs from `source` only by whitespace or casing.
#[track_caller]
pub fn assert_substantive_change(source: &str, output: &str) {
    assert!(
        !is_trivial_change(source, output),
        "output is a trivial edit of the source\n  source: {source:?}\n  output: {output:?}"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passing_assertions() {
        assert_no_polarity_flip("awful app", "poor app.");
        assert_residual_clean("poor app.");
        assert_substantive_change("awful app", "poor app.");
    }

    #[test]
    #[should_panic(expected = "polarity flipped")]
    fn test_flip_panics() {
        assert_no_polarity_flip("awful app", "great app");
    }

    #[test]
    #[should_panic(expected = "still needs softening")]
    fn test_residual_panics() {
        assert_residual_clean("this sucks");
    }

    #[test]
    #[should_panic(expected = "trivial edit")]
    fn test_trivial_panics() {
        assert_substantive_change("Awful  app", "awful app");
    }
}
