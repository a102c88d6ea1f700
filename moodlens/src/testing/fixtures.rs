//! Sentence corpora.

/// Clearly negative sentences that carry strong or profane terms.
pub const NEGATIVE_SOURCES: &[&str] = &[
    "This product is fucking useless, I hate it",
    "The app is awful and the support is terrible",
    "Shitty service, the food was garbage",
    "The update sucks and everything is broken",
    "Worst purchase ever, really disgusting quality",
];

/// Clearly positive sentences.
pub const POSITIVE_SOURCES: &[&str] = &[
    "Great service, very happy",
    "I love this app, it is really excellent",
    "Amazing support and a wonderful team",
];

/// Sentences with no lexicon vocabulary at all.
pub const NEUTRAL_SOURCES: &[&str] = &[
    "The package arrived on Tuesday",
    "Delivery took three days",
];

/// Replies that read as the opposite of a negative source.
pub const POSITIVE_ANTONYM_REPLY: &str = "This product is great and useful, I love it";

/// Replies that read as the opposite of a positive source.
pub const NEGATIVE_ANTONYM_REPLY: &str = "Terrible service, awful and broken, I hate it";

/// A reply unrelated to any source in this module.
pub const UNRELATED_REPLY: &str = "The weather in Lisbon was sunny and warm today";

/// Every source sentence in this module.
pub fn all_sources() -> impl Iterator<Item = &'static str> {
    NEGATIVE_SOURCES
        .iter()
        .chain(POSITIVE_SOURCES)
        .chain(NEUTRAL_SOURCES)
        .copied()
}
