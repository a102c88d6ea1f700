//! Requested tone and its prompt descriptor.

use serde::{Deserialize, Serialize};

/// Tone the rewrite should take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Tone {
    /// Neutral and objective.
    #[default]
    Neutral,
    /// Constructive and encouraging.
    Positive,
    /// Respectful and non-confrontational.
    Polite,
}

impl Tone {
    /// All tones, in declaration order.
    pub const ALL: [Self; 3] = [Self::Neutral, Self::Positive, Self::Polite];

    /// Parses a tone name. Unrecognized names (including empty) map to
    /// [`Tone::Neutral`].
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "positive" => Self::Positive,
            "polite" => Self::Polite,
            _ => Self::Neutral,
        }
    }

    /// The lowercase name of this tone.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Positive => "positive",
            Self::Polite => "polite",
        }
    }

    /// The natural-language descriptor used in the generation prompt.
    #[must_use]
    pub const fn descriptor(self) -> &'static str {
        match self {
            Self::Neutral => "neutral and objective",
            Self::Positive => "positive, constructive, encouraging",
            Self::Polite => "polite, respectful, non-confrontational",
        }
    }
}

impl From<String> for Tone {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl From<&str> for Tone {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
