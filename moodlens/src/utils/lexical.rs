//! Tokenization, whitespace normalization and token-set similarity.

use regex::Regex;
use std::collections::HashSet;
use std::hash::Hash;
use std::sync::LazyLock;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z']+").expect("failed to compile token regex"));

/// Collapses runs of whitespace to a single space and trims both ends.
#[must_use]
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercases `s` and returns the maximal runs of `[a-z']`, in order.
///
/// Anything else (digits, punctuation, non-ASCII letters) acts as a
/// separator and is discarded.
#[must_use]
pub fn tokenize(s: &str) -> Vec<String> {
    let lowered = s.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// The distinct tokens of `s`.
#[must_use]
pub fn token_set(s: &str) -> HashSet<String> {
    tokenize(s).into_iter().collect()
}

/// Jaccard similarity `|A ∩ B| / |A ∪ B|` of two token sequences.
///
/// Returns 0.0 when either side is empty, so an empty candidate never
/// counts as overlapping with anything.
pub fn jaccard_similarity<T, A, B>(a: A, b: B) -> f64
where
    T: Eq + Hash,
    A: IntoIterator<Item = T>,
    B: IntoIterator<Item = T>,
{
    let a: HashSet<T> = a.into_iter().collect();
    let b: HashSet<T> = b.into_iter().collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(&b).count();
    let union = a.len() + b.len() - intersection;
    #[allow(clippy::cast_precision_loss)]
    let similarity = intersection as f64 / union as f64;
    similarity
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a \t b\n\nc  "), "a b c");
        assert_eq!(normalize_whitespace(""), "");
        assert_eq!(normalize_whitespace("   "), "");
    }

    #[test]
    fn test_tokenize_lowercases_and_splits() {
        assert_eq!(
            tokenize("Don't STOP, it's 100% great!"),
            vec!["don't", "stop", "it's", "great"]
        );
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("123 ... !!!").is_empty());
    }

    #[test]
    fn test_tokenize_non_ascii_is_separator() {
        assert_eq!(tokenize("café au lait"), vec!["caf", "au", "lait"]);
    }

    #[test]
    fn test_jaccard_identical() {
        let a = tokenize("the quick fox");
        assert!((jaccard_similarity(a.clone(), a) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_jaccard_partial() {
        let sim = jaccard_similarity(tokenize("a b c"), tokenize("b c d"));
        assert!((sim - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_jaccard_ignores_duplicates() {
        let sim = jaccard_similarity(tokenize("a a a b"), tokenize("a b"));
        assert!((sim - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_jaccard_empty_side_is_zero() {
        assert!(jaccard_similarity(tokenize(""), tokenize("a b")).abs() < f64::EPSILON);
        assert!(jaccard_similarity(tokenize("a b"), tokenize("")).abs() < f64::EPSILON);
        assert!(jaccard_similarity(tokenize(""), tokenize("")).abs() < f64::EPSILON);
    }
}
