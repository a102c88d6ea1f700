//! Error types for the moodlens library.
//!
//! Collaborator calls (generation, classification, moderation) report
//! failures through [`MoodlensError`]. The services that wrap those
//! collaborators convert errors into their declared failure policy, so
//! most public operations never return an error to the caller.

use thiserror::Error;

/// Convenience result alias used across the crate.
pub type Result<T> = std::result::Result<T, MoodlensError>;

/// The main error type for moodlens operations.
#[derive(Debug, Error)]
pub enum MoodlensError {
    /// The text generator failed or returned nothing usable.
    #[error("Generation error: {0}")]
    Generation(String),

    /// The generator did not answer within the configured timeout.
    #[error("Generation timed out after {0:.1}s")]
    GenerationTimeout(f64),

    /// The emotion classifier failed.
    #[error("Classification error: {0}")]
    Classification(String),

    /// The moderation collaborator failed.
    #[error("Moderation error: {0}")]
    Moderation(String),

    /// No collaborator is configured for the requested capability.
    #[error("{0} is not configured")]
    Unavailable(&'static str),

    /// Invalid configuration.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Transport-level failure talking to a remote service.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for MoodlensError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(feature = "remote")]
impl From<reqwest::Error> for MoodlensError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

impl MoodlensError {
    /// Returns true if retrying the same call could plausibly succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Generation(_) | Self::GenerationTimeout(_) | Self::Http(_)
        )
    }
}

/// Error raised when configuration is invalid.
#[derive(Debug, Clone, Error)]
#[error("Invalid configuration for '{field}': {message}")]
pub struct ConfigError {
    /// The offending field, dotted path style (e.g. `rewrite.min_overlap`).
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::new("rewrite.min_overlap", "must be within [0, 1]");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for 'rewrite.min_overlap': must be within [0, 1]"
        );
    }

    #[test]
    fn test_config_error_converts() {
        let err: MoodlensError = ConfigError::new("x", "bad").into();
        assert!(matches!(err, MoodlensError::Config(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_transient_errors() {
        assert!(MoodlensError::Generation("boom".into()).is_transient());
        assert!(MoodlensError::GenerationTimeout(2.0).is_transient());
        assert!(!MoodlensError::Unavailable("generator").is_transient());
    }

    #[test]
    fn test_serde_json_error_converts() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: MoodlensError = parse.unwrap_err().into();
        assert!(matches!(err, MoodlensError::Serialization(_)));
    }

    #[test]
    fn test_timeout_display() {
        let err = MoodlensError::GenerationTimeout(1.5);
        assert_eq!(err.to_string(), "Generation timed out after 1.5s");
    }
}
