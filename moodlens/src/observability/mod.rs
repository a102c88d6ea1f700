//! Tracing subscriber setup.
//!
//! Logs go to stderr so stdout stays free for command output.

use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::{LogFormat, LoggingConfig};

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Builds the log filter: `RUST_LOG` when set, else the configured level,
/// else `info`.
#[must_use]
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global tracing subscriber.
///
/// Returns `false` if tracing was already initialized, by this function or
/// by anyone else.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return false;
    }

    let fmt = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);
    let layer = match config.format {
        LogFormat::Pretty => fmt.pretty().boxed(),
        LogFormat::Compact => fmt.compact().boxed(),
        LogFormat::Json => fmt.json().with_current_span(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(layer.with_filter(build_filter(&config.level)))
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        let config = LoggingConfig {
            level: "moodlens=debug".to_string(),
            format: LogFormat::Json,
        };
        init_tracing(&config);
        assert!(!init_tracing(&config));
        assert!(!init_tracing(&LoggingConfig::default()));
    }

    #[test]
    fn test_build_filter_accepts_directives() {
        let filter = build_filter("warn,moodlens=debug");
        assert!(!filter.to_string().is_empty());
    }
}
