//! Tracing subscriber setup.
//!
//! The library itself only emits `tracing` events. Applications that want
//! them printed can install a formatter with [`init_logging`].

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Default log level when none is configured.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// A simple level (`info`, `debug`, ...) or a full `EnvFilter` directive
    /// string such as `warn,openfrogans=trace`.
    pub level: String,
}

impl LoggingConfig {
    /// Create a config with the given level or directive string.
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
        }
    }

    fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return DEFAULT_LOG_LEVEL.to_string();
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_string(),
            "debug" => "debug".to_string(),
            "info" => "info".to_string(),
            "warn" | "warning" => "warn".to_string(),
            "error" => "error".to_string(),
            "off" | "none" => "off".to_string(),
            _ => trimmed.to_string(),
        }
    }

    fn config_env_filter(&self) -> EnvFilter {
        let directives = Self::normalize_level_directives(&self.level);
        EnvFilter::try_new(directives)
            .unwrap_or_else(|_| EnvFilter::default().add_directive(LevelFilter::INFO.into()))
    }

    /// Build the effective filter.
    ///
    /// Directives from `RUST_LOG` are appended to the configured level, so
    /// they win for the targets they name. Invalid directives fall back to
    /// the configured level, then to `info`.
    pub fn env_filter(&self) -> EnvFilter {
        let env_directives = std::env::var(EnvFilter::DEFAULT_ENV)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        match env_directives {
            Some(env_directives) => {
                let config_directives = Self::normalize_level_directives(&self.level);
                EnvFilter::try_new(format!("{},{}", config_directives, env_directives))
                    .or_else(|_| EnvFilter::try_new(&env_directives))
                    .unwrap_or_else(|_| self.config_env_filter())
            }
            None => self.config_env_filter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_LEVEL)
    }
}

/// Install a global formatting subscriber.
///
/// Returns false if a global subscriber was already installed, in which case
/// the existing one is left in place.
pub fn init_logging(config: &LoggingConfig) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_target(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        assert_eq!(LoggingConfig::default().level, "info");
    }

    #[test]
    fn test_normalize_simple_levels() {
        assert_eq!(LoggingConfig::normalize_level_directives("DEBUG"), "debug");
        assert_eq!(LoggingConfig::normalize_level_directives(" Warning "), "warn");
        assert_eq!(LoggingConfig::normalize_level_directives("none"), "off");
        assert_eq!(LoggingConfig::normalize_level_directives(""), "info");
    }

    #[test]
    fn test_normalize_keeps_directive_strings() {
        assert_eq!(
            LoggingConfig::normalize_level_directives("warn,openfrogans::resolver=trace"),
            "warn,openfrogans::resolver=trace"
        );
    }

    #[test]
    fn test_config_filter_accepts_directives() {
        let filter = LoggingConfig::new("warn,openfrogans=debug").config_env_filter();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_init_logging_twice() {
        let config = LoggingConfig::new("error");
        init_logging(&config);
        assert!(!init_logging(&config));
    }
}
