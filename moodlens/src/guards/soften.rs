//! Rule-based softening of strong and profane vocabulary.
//!
//! The rule table is plain data applied in a fixed order. Text produced by
//! an earlier rule is never rescanned by a later one, so `fucking` becomes
//! `very` and stays `very` even though `very` is itself an intensifier the
//! table removes from the user's own words.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::utils::normalize_whitespace;

/// What a softening rule targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermKind {
    /// Profanity or a strong subjective word. Its presence means the text
    /// still needs softening.
    Strong,
    /// A pure intensity word. Removed while softening but harmless if it
    /// survives.
    Intensifier,
}

/// A single `(pattern, replacement)` softening rule.
#[derive(Debug, Clone)]
pub struct SoftenRule {
    pattern: Regex,
    replacement: &'static str,
    kind: TermKind,
}

impl SoftenRule {
    fn compile(pattern: &str, replacement: &'static str, kind: TermKind) -> Self {
        let pattern = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .expect("failed to compile softening rule");
        Self {
            pattern,
            replacement,
            kind,
        }
    }

    /// The word-boundary-delimited pattern this rule matches.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// The milder replacement (may be empty for pure deletions).
    #[must_use]
    pub const fn replacement(&self) -> &'static str {
        self.replacement
    }

    /// Whether this rule targets strong language or a plain intensifier.
    #[must_use]
    pub const fn kind(&self) -> TermKind {
        self.kind
    }

    /// Returns true if the pattern matches anywhere in `text`.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

const RULE_TABLE: &[(&str, &str, TermKind)] = &[
    (r"\bfuck(?:ing)?\b", "very", TermKind::Strong),
    (r"\bshit(?:ty)?\b", "bad", TermKind::Strong),
    (r"\buseless\b", "not very useful", TermKind::Strong),
    (r"\bawful\b", "poor", TermKind::Strong),
    (r"\bterrible\b", "poor", TermKind::Strong),
    (r"\bhate\b", "dislike", TermKind::Strong),
    (r"\bgarbage\b", "poor quality", TermKind::Strong),
    (r"\bsucks?\b", "is not good", TermKind::Strong),
    (r"\breally\b", "", TermKind::Intensifier),
    (r"\bvery\b", "", TermKind::Intensifier),
];

static RULES: LazyLock<Vec<SoftenRule>> = LazyLock::new(|| {
    RULE_TABLE
        .iter()
        .map(|&(pattern, replacement, kind)| SoftenRule::compile(pattern, replacement, kind))
        .collect()
});

static HAVE_BAD_RE: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(r"\bhave\s+bad\s+([a-z]+)\b")
        .case_insensitive(true)
        .build()
        .expect("failed to compile article fix regex")
});

static SPACE_BEFORE_PUNCT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+([,.!?;:])").expect("failed to compile punctuation spacing regex")
});

/// The process-wide softening rules, in application order.
#[must_use]
pub fn soften_rules() -> &'static [SoftenRule] {
    &RULES
}

/// Piece of text during softening: either still the caller's words or
/// already produced by a rule.
enum Segment<'a> {
    Original(&'a str),
    Softened(&'static str),
}

fn apply_rule<'a>(rule: &SoftenRule, segments: Vec<Segment<'a>>) -> Vec<Segment<'a>> {
    let mut out = Vec::with_capacity(segments.len());
    for segment in segments {
        let text = match segment {
            Segment::Original(text) => text,
            softened @ Segment::Softened(_) => {
                out.push(softened);
                continue;
            }
        };
        let mut last = 0;
        for m in rule.pattern.find_iter(text) {
            if m.start() > last {
                out.push(Segment::Original(&text[last..m.start()]));
            }
            out.push(Segment::Softened(rule.replacement));
            last = m.end();
        }
        if last < text.len() {
            out.push(Segment::Original(&text[last..]));
        }
    }
    out
}

/// Softens `text` with the fixed rule table.
///
/// 1. Every rule is applied in order as a case-insensitive whole-word
///    substitution over the caller's words.
/// 2. `have bad X` becomes `have a bad X`.
/// 3. Whitespace is collapsed and spaces before `, . ! ? ; :` are dropped.
/// 4. A period is appended when the text ends in an alphanumeric char.
#[must_use]
pub fn soften(text: &str) -> String {
    let segments = soften_rules()
        .iter()
        .fold(vec![Segment::Original(text)], |segments, rule| {
            apply_rule(rule, segments)
        });

    let joined: String = segments
        .iter()
        .map(|segment| match segment {
            Segment::Original(text) => *text,
            Segment::Softened(text) => *text,
        })
        .collect();

    let fixed = HAVE_BAD_RE.replace_all(&joined, "have a bad $1");
    let collapsed = normalize_whitespace(&fixed);
    let mut out = SPACE_BEFORE_PUNCT_RE
        .replace_all(&collapsed, "$1")
        .into_owned();

    if out.chars().last().is_some_and(char::is_alphanumeric) {
        out.push('.');
    }
    out
}

/// Returns true if `text` still carries a strong or profane term.
///
/// Intensifiers are not counted: `soften` itself emits `very` as the mild
/// stand-in for profanity.
#[must_use]
pub fn needs_softening(text: &str) -> bool {
    soften_rules()
        .iter()
        .filter(|rule| rule.kind == TermKind::Strong)
        .any(|rule| rule.matches(text))
}
