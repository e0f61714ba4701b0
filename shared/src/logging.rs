//! Logging infrastructure for the listing wizard
//!
//! Installs a `tracing-subscriber` formatter once per process. `RUST_LOG`
//! takes precedence over the configured level.

use std::sync::Once;

use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// One-time initialization flag for logging
static INIT: Once = Once::new();

/// Logging configuration structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Level used when `RUST_LOG` is not set
    pub level: Level,
    /// Include the event target in log lines
    pub with_target: bool,
    /// Include thread ids
    pub with_thread_ids: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            with_target: false,
            with_thread_ids: false,
        }
    }
}

impl LoggingConfig {
    /// Build from the configuration file section, falling back to INFO
    pub fn from_settings(settings: &LoggingSettings) -> Self {
        Self {
            level: parse_level(&settings.level).unwrap_or(Level::INFO),
            with_target: settings.with_target,
            with_thread_ids: settings.with_thread_ids,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        if debug {
            self.level = Level::DEBUG;
        }
        self
    }
}

/// Parse a level name, case-insensitively
pub fn parse_level(name: &str) -> Option<Level> {
    match name.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Initialize logging; later calls are ignored
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.level.as_str().to_ascii_lowercase()));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(config.with_target)
            .with_thread_ids(config.with_thread_ids)
            .with_level(true)
            .try_init();
    });
}

/// Check if logging has been initialized
pub fn is_logging_initialized() -> bool {
    INIT.is_completed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), Some(Level::DEBUG));
        assert_eq!(parse_level(" warning "), Some(Level::WARN));
        assert_eq!(parse_level("verbose"), None);
    }

    #[test]
    fn test_config_from_settings() {
        let settings = LoggingSettings {
            level: "trace".to_string(),
            with_target: true,
            with_thread_ids: true,
        };
        let config = LoggingConfig::from_settings(&settings);
        assert_eq!(config.level, Level::TRACE);
        assert!(config.with_target);
        assert!(config.with_thread_ids);

        let fallback = LoggingConfig::from_settings(&LoggingSettings {
            level: "nonsense".to_string(),
            ..LoggingSettings::default()
        });
        assert_eq!(fallback.level, Level::INFO);
        assert!(!fallback.with_thread_ids);
    }

    #[test]
    fn test_debug_override() {
        let config = LoggingConfig::default().with_debug(true);
        assert_eq!(config.level, Level::DEBUG);

        let unchanged = LoggingConfig::default().with_debug(false);
        assert_eq!(unchanged.level, Level::INFO);
    }

    #[test]
    fn test_init_is_idempotent() {
        init_logging(LoggingConfig::default());
        init_logging(LoggingConfig::default().with_debug(true));
        assert!(is_logging_initialized());
    }
}
