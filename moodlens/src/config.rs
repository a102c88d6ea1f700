//! Runtime configuration.
//!
//! Everything has a default, so an empty JSON object is a valid config.
//! Values are layered: defaults, then an optional JSON file, then
//! environment overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::errors::{ConfigError, Result};
use crate::guards::DEFAULT_MIN_OVERLAP;
use crate::retry::RetryConfig;

/// Environment variable overriding the log filter.
pub const ENV_LOG: &str = "MOODLENS_LOG";
/// Environment variable holding the Gemini API key.
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
/// Fallback environment variable for the Gemini API key.
pub const ENV_GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
/// Environment variable overriding the Gemini model.
pub const ENV_GEMINI_MODEL: &str = "GEMINI_MODEL";
/// Environment variable overriding the classifier endpoint.
pub const ENV_CLASSIFIER_URL: &str = "MOODLENS_CLASSIFIER_URL";
/// Environment variable overriding the rewrite overlap threshold.
pub const ENV_MIN_OVERLAP: &str = "MOODLENS_MIN_OVERLAP";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoodlensConfig {
    /// Rewrite orchestration.
    #[serde(default)]
    pub rewrite: RewriteConfig,
    /// Remote generative model.
    #[serde(default)]
    pub gemini: GeminiConfig,
    /// Remote emotion classifier.
    #[serde(default)]
    pub classifier: ClassifierConfig,
    /// Logging.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Emotion analysis.
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl MoodlensConfig {
    /// Creates a config with all defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Applies overrides from the process environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary key lookup. Empty values are
    /// ignored, as are values that fail to parse.
    #[must_use]
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(level) = get(ENV_LOG) {
            self.logging.level = level;
        }
        if let Some(key) = get(ENV_GEMINI_API_KEY).or_else(|| get(ENV_GOOGLE_API_KEY)) {
            self.gemini.api_key = Some(key);
        }
        if let Some(model) = get(ENV_GEMINI_MODEL) {
            self.gemini.model = model;
        }
        if let Some(url) = get(ENV_CLASSIFIER_URL) {
            self.classifier.base_url = Some(url);
        }
        match get(ENV_MIN_OVERLAP).map(|v| v.trim().parse::<f64>()) {
            Some(Ok(value)) => self.rewrite.min_overlap = value,
            Some(Err(e)) => {
                tracing::warn!(variable = ENV_MIN_OVERLAP, error = %e, "Ignoring unparsable override");
            }
            None => {}
        }
        self
    }

    /// Checks every section for out-of-range values.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.rewrite.validate()?;
        self.gemini.validate()?;
        self.classifier.validate()?;
        self.analysis.validate()
    }
}

/// Rewrite orchestration settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewriteConfig {
    /// Minimum token-set Jaccard overlap between source and rewrite.
    #[serde(default = "default_min_overlap")]
    pub min_overlap: f64,
    /// Per-attempt generation timeout. `None` waits indefinitely.
    #[serde(default)]
    pub generation_timeout_seconds: Option<f64>,
    /// Retry policy for generator calls.
    #[serde(default)]
    pub retry: RetryConfig,
}

const fn default_min_overlap() -> f64 {
    DEFAULT_MIN_OVERLAP
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            min_overlap: default_min_overlap(),
            generation_timeout_seconds: None,
            retry: RetryConfig::default(),
        }
    }
}

impl RewriteConfig {
    /// Sets the overlap threshold.
    #[must_use]
    pub fn with_min_overlap(mut self, min_overlap: f64) -> Self {
        self.min_overlap = min_overlap;
        self
    }

    /// Sets the generation timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.generation_timeout_seconds = Some(seconds);
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Generation timeout as a `Duration`.
    #[must_use]
    pub fn generation_timeout(&self) -> Option<Duration> {
        self.generation_timeout_seconds.map(Duration::from_secs_f64)
    }

    fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.min_overlap) {
            return Err(ConfigError::new(
                "rewrite.min_overlap",
                format!("must be within [0, 1], got {}", self.min_overlap),
            ));
        }
        if let Some(seconds) = self.generation_timeout_seconds {
            check_positive("rewrite.generation_timeout_seconds", seconds)?;
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::new("rewrite.retry.max_attempts", "must be at least 1"));
        }
        if self.retry.max_delay_ms < self.retry.base_delay_ms {
            return Err(ConfigError::new(
                "rewrite.retry.max_delay_ms",
                "must not be smaller than base_delay_ms",
            ));
        }
        Ok(())
    }
}

/// Gemini generative API settings.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Model name, e.g. `gemini-2.5-flash`.
    #[serde(default = "default_gemini_model")]
    pub model: String,
    /// API root, without a trailing slash.
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
    /// API key. Read from the environment, never written back out.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_gemini_timeout")]
    pub timeout_seconds: f64,
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

const fn default_gemini_timeout() -> f64 {
    60.0
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_gemini_model(),
            base_url: default_gemini_base_url(),
            api_key: None,
            timeout_seconds: default_gemini_timeout(),
        }
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl GeminiConfig {
    /// Request timeout as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_seconds)
    }

    /// Whether an API key is available.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::new("gemini.model", "must not be empty"));
        }
        check_positive("gemini.timeout_seconds", self.timeout_seconds)
    }
}

/// Remote emotion classifier settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Classifier service root. `None` leaves classification unconfigured.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_classifier_timeout")]
    pub timeout_seconds: f64,
}

const fn default_classifier_timeout() -> f64 {
    30.0
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_seconds: default_classifier_timeout(),
        }
    }
}

impl ClassifierConfig {
    /// Request timeout as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_seconds)
    }

    fn validate(&self) -> std::result::Result<(), ConfigError> {
        check_positive("classifier.timeout_seconds", self.timeout_seconds)
    }
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, human friendly.
    Pretty,
    /// Single-line text.
    #[default]
    Compact,
    /// Newline-delimited JSON.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `moodlens=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Line format.
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Emotion analysis settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// How long a cached analysis stays valid.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,
}

const fn default_cache_ttl() -> u64 {
    86_400
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            cache_ttl_seconds: default_cache_ttl(),
        }
    }
}

impl AnalysisConfig {
    /// Cache TTL as a `Duration`.
    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.cache_ttl_seconds == 0 {
            return Err(ConfigError::new("analysis.cache_ttl_seconds", "must be positive"));
        }
        Ok(())
    }
}

fn check_positive(field: &str, seconds: f64) -> std::result::Result<(), ConfigError> {
    if seconds.is_finite() && seconds > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::new(field, format!("must be a positive number of seconds, got {seconds}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MoodlensError;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = MoodlensConfig::default();
        assert!((config.rewrite.min_overlap - 0.35).abs() < f64::EPSILON);
        assert_eq!(config.rewrite.generation_timeout(), None);
        assert_eq!(config.rewrite.retry.max_attempts, 1);
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert_eq!(config.gemini.timeout(), Duration::from_secs(60));
        assert!(!config.gemini.has_api_key());
        assert_eq!(config.classifier.base_url, None);
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert_eq!(config.analysis.cache_ttl(), Duration::from_secs(86_400));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_json_is_default() {
        let config = MoodlensConfig::from_json_str("{}").unwrap();
        assert_eq!(config, MoodlensConfig::default());
    }

    #[test]
    fn test_partial_json() {
        let config = MoodlensConfig::from_json_str(
            r#"{"rewrite": {"min_overlap": 0.5, "retry": {"max_attempts": 3}},
                "logging": {"format": "json"}}"#,
        )
        .unwrap();
        assert!((config.rewrite.min_overlap - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.rewrite.retry.max_attempts, 3);
        assert_eq!(config.rewrite.retry.base_delay_ms, 250);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_overlap_rejected() {
        let err = MoodlensConfig::from_json_str(r#"{"rewrite": {"min_overlap": 1.5}}"#).unwrap_err();
        match err {
            MoodlensError::Config(e) => assert_eq!(e.field, "rewrite.min_overlap"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_timeouts_rejected() {
        let mut config = MoodlensConfig::default();
        config.rewrite.generation_timeout_seconds = Some(0.0);
        assert!(config.validate().is_err());

        let mut config = MoodlensConfig::default();
        config.gemini.timeout_seconds = f64::NAN;
        assert_eq!(config.validate().unwrap_err().field, "gemini.timeout_seconds");

        let mut config = MoodlensConfig::default();
        config.analysis.cache_ttl_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_retry_rejected() {
        let mut config = MoodlensConfig::default();
        config.rewrite.retry.max_attempts = 0;
        assert_eq!(config.validate().unwrap_err().field, "rewrite.retry.max_attempts");

        let mut config = MoodlensConfig::default();
        config.rewrite.retry.max_delay_ms = 10;
        assert_eq!(config.validate().unwrap_err().field, "rewrite.retry.max_delay_ms");
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            MoodlensConfig::from_json_str("{not json"),
            Err(MoodlensError::Serialization(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"gemini": {{"model": "gemini-2.0-pro"}}}}"#).unwrap();
        let config = MoodlensConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.gemini.model, "gemini-2.0-pro");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = MoodlensConfig::from_json_file(dir.path().join("absent.json"));
        assert!(matches!(result, Err(MoodlensError::Io(_))));
    }

    #[test]
    fn test_env_overrides() {
        let config = MoodlensConfig::default().with_overrides_from(lookup(&[
            (ENV_LOG, "moodlens=debug"),
            (ENV_GOOGLE_API_KEY, "google-key"),
            (ENV_GEMINI_MODEL, "gemini-x"),
            (ENV_CLASSIFIER_URL, "http://localhost:8000"),
            (ENV_MIN_OVERLAP, "0.2"),
        ]));
        assert_eq!(config.logging.level, "moodlens=debug");
        assert_eq!(config.gemini.api_key.as_deref(), Some("google-key"));
        assert_eq!(config.gemini.model, "gemini-x");
        assert_eq!(config.classifier.base_url.as_deref(), Some("http://localhost:8000"));
        assert!((config.rewrite.min_overlap - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_gemini_key_preferred_over_google_key() {
        let config = MoodlensConfig::default().with_overrides_from(lookup(&[
            (ENV_GEMINI_API_KEY, "gemini-key"),
            (ENV_GOOGLE_API_KEY, "google-key"),
        ]));
        assert_eq!(config.gemini.api_key.as_deref(), Some("gemini-key"));
    }

    #[test]
    fn test_blank_and_unparsable_overrides_ignored() {
        let config = MoodlensConfig::default().with_overrides_from(lookup(&[
            (ENV_GEMINI_MODEL, "   "),
            (ENV_MIN_OVERLAP, "lots"),
        ]));
        assert_eq!(config, MoodlensConfig::default());
    }

    #[test]
    fn test_api_key_not_serialized_or_debugged() {
        let mut config = MoodlensConfig::default();
        config.gemini.api_key = Some("secret".to_string());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
        assert!(!format!("{config:?}").contains("secret"));
    }
}
