//! Coarse polarity sensing and flip detection.
//!
//! This is vocabulary membership, not sentiment analysis. Only clean flips
//! are caught, where each side commits to a single polarity; mixed or
//! neutral text on either side is never reported as a flip. The one piece
//! of syntax understood is a negated positive (`not good`, `not very
//! useful`), which reads as negative. The lexicon is English-only.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::utils::tokenize;

const POSITIVE_WORDS: &[&str] = &[
    "useful",
    "great",
    "good",
    "excellent",
    "awesome",
    "amazing",
    "love",
    "like",
    "satisfied",
    "fantastic",
    "positive",
    "pleased",
    "wonderful",
    "nice",
];

const NEGATIVE_WORDS: &[&str] = &[
    "useless",
    "bad",
    "awful",
    "terrible",
    "horrible",
    "hate",
    "dislike",
    "poor",
    "worst",
    "disgusting",
    "garbage",
    "broken",
    "issue",
    "problem",
    "negative",
    "shit",
    "shitty",
    "sucks",
];

const NEGATOR: &str = "not";
/// Words allowed between the negator and the positive word it negates.
const NEGATION_BRIDGES: &[&str] = &["very", "really"];

/// Two disjoint sets of lowercase tokens used for polarity sensing.
#[derive(Debug, Clone)]
pub struct PolarityLexicon {
    positive: HashSet<&'static str>,
    negative: HashSet<&'static str>,
}

impl PolarityLexicon {
    fn from_tables(positive: &[&'static str], negative: &[&'static str]) -> Self {
        Self {
            positive: positive.iter().copied().collect(),
            negative: negative.iter().copied().collect(),
        }
    }

    /// The process-wide lexicon.
    #[must_use]
    pub fn global() -> &'static Self {
        &LEXICON
    }

    /// Returns true if no token is both positive and negative.
    #[must_use]
    pub fn is_disjoint(&self) -> bool {
        self.positive.is_disjoint(&self.negative)
    }

    /// Classifies the vocabulary of `text`. A positive word preceded by
    /// `not`, optionally with `very` or `really` in between, counts as
    /// negative.
    #[must_use]
    pub fn sense(&self, text: &str) -> Polarity {
        let tokens = tokenize(text);
        let mut has_positive = false;
        let mut has_negative = false;
        for (i, token) in tokens.iter().enumerate() {
            if self.negative.contains(token.as_str()) {
                has_negative = true;
            } else if self.positive.contains(token.as_str()) {
                if is_negated(&tokens[..i]) {
                    has_negative = true;
                } else {
                    has_positive = true;
                }
            }
        }
        Polarity::from_flags(has_positive, has_negative)
    }
}

fn is_negated(preceding: &[String]) -> bool {
    match preceding {
        [.., last] if last == NEGATOR => true,
        [.., negator, bridge] => {
            negator == NEGATOR && NEGATION_BRIDGES.contains(&bridge.as_str())
        }
        _ => false,
    }
}

static LEXICON: LazyLock<PolarityLexicon> =
    LazyLock::new(|| PolarityLexicon::from_tables(POSITIVE_WORDS, NEGATIVE_WORDS));

/// What the lexicon can tell about a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Positive vocabulary only.
    Positive,
    /// Negative vocabulary only.
    Negative,
    /// Both kinds of vocabulary.
    Mixed,
    /// Neither.
    Neutral,
}

impl Polarity {
    const fn from_flags(has_positive: bool, has_negative: bool) -> Self {
        match (has_positive, has_negative) {
            (true, false) => Self::Positive,
            (false, true) => Self::Negative,
            (true, true) => Self::Mixed,
            (false, false) => Self::Neutral,
        }
    }

    /// The polarity the other side would have to commit to for a flip.
    #[must_use]
    pub const fn opposite(self) -> Option<Self> {
        match self {
            Self::Positive => Some(Self::Negative),
            Self::Negative => Some(Self::Positive),
            Self::Mixed | Self::Neutral => None,
        }
    }
}

/// Returns true if `text` contains clearly positive vocabulary.
#[must_use]
pub fn has_positive(text: &str) -> bool {
    matches!(
        PolarityLexicon::global().sense(text),
        Polarity::Positive | Polarity::Mixed
    )
}

/// Returns true if `text` contains clearly negative vocabulary.
#[must_use]
pub fn has_negative(text: &str) -> bool {
    matches!(
        PolarityLexicon::global().sense(text),
        Polarity::Negative | Polarity::Mixed
    )
}

/// Returns true when `source` is unambiguously one polarity and `output`
/// is unambiguously the other.
#[must_use]
pub fn is_polarity_flip(source: &str, output: &str) -> bool {
    let lexicon = PolarityLexicon::global();
    lexicon
        .sense(source)
        .opposite()
        .is_some_and(|flipped| lexicon.sense(output) == flipped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexicon_is_disjoint() {
        assert!(PolarityLexicon::global().is_disjoint());
    }

    #[test]
    fn test_token_level_membership() {
        assert!(has_positive("it was GREAT"));
        // substring only, not a token
        assert!(!has_positive("greatness"));
        assert!(has_negative("a real problem"));
        assert!(!has_negative("problematic"));
    }

    #[test]
    fn test_sense() {
        let lexicon = PolarityLexicon::global();
        assert_eq!(lexicon.sense("nice and good"), Polarity::Positive);
        assert_eq!(lexicon.sense("broken again"), Polarity::Negative);
        assert_eq!(lexicon.sense("good idea, bad execution"), Polarity::Mixed);
        assert_eq!(lexicon.sense("the parcel arrived"), Polarity::Neutral);
    }

    #[test]
    fn test_negated_positive_reads_negative() {
        let lexicon = PolarityLexicon::global();
        assert_eq!(lexicon.sense("not very useful"), Polarity::Negative);
        assert_eq!(lexicon.sense("it is not good"), Polarity::Negative);
        assert_eq!(lexicon.sense("Not really nice"), Polarity::Negative);
        assert_eq!(lexicon.sense("not good, but great support"), Polarity::Mixed);
    }

    #[test]
    fn test_negation_only_reaches_the_next_positive() {
        let lexicon = PolarityLexicon::global();
        // bridge words other than very/really break the negation
        assert_eq!(lexicon.sense("not at all good"), Polarity::Positive);
        // `not` on its own carries no polarity
        assert_eq!(lexicon.sense("it is not here yet"), Polarity::Neutral);
        assert_eq!(
            lexicon.sense("this app is useful and the support is not lacking"),
            Polarity::Positive
        );
    }

    #[test]
    fn test_stray_not_does_not_hide_a_flip() {
        assert!(is_polarity_flip(
            "this app is useless and the support is broken",
            "this app is useful and the support is not lacking"
        ));
    }

    #[test]
    fn test_flip_negative_to_positive() {
        assert!(is_polarity_flip("This app is useless", "This app is useful"));
    }

    #[test]
    fn test_flip_positive_to_negative() {
        assert!(is_polarity_flip(
            "Great service, very happy",
            "Terrible service, very unhappy"
        ));
    }

    #[test]
    fn test_no_flip_when_either_side_is_ambiguous() {
        // mixed source
        assert!(!is_polarity_flip("good but broken", "great"));
        // neutral source
        assert!(!is_polarity_flip("the box arrived", "awful"));
        // negated positive stays negative
        assert!(!is_polarity_flip("useless", "not very useful"));
        assert!(!is_polarity_flip("it sucks", "it is not good"));
        // mixed output
        assert!(!is_polarity_flip("useless", "useful but broken"));
        // neutral output
        assert!(!is_polarity_flip("great", "it arrived"));
        // same polarity
        assert!(!is_polarity_flip("awful", "poor"));
    }

    #[test]
    fn test_opposite() {
        assert_eq!(Polarity::Positive.opposite(), Some(Polarity::Negative));
        assert_eq!(Polarity::Mixed.opposite(), None);
    }
}
