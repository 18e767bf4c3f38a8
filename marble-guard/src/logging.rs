//! Logging utilities and configuration for marble-guard.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the application, with [`setup::init_logging`] as a ready-made option.

use serde::{Deserialize, Serialize};
use tracing::Level;

/// Logging configuration for a validation run.
///
/// Controls how much a [`DatasetValidator`](crate::core::DatasetValidator)
/// logs beyond the spans and events every run emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Base log level for marble-guard components
    #[serde(with = "level_serde")]
    pub base_level: Level,
    /// Whether to log a line per passed check
    pub log_check_details: bool,
    /// Whether to log record source operations
    pub log_data_operations: bool,
    /// Whether to log run metrics when a run completes
    pub log_metrics: bool,
    /// Maximum length for logged field values
    pub max_field_length: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            base_level: Level::INFO,
            log_check_details: false,
            log_data_operations: true,
            log_metrics: true,
            max_field_length: 256,
        }
    }
}

impl LogConfig {
    /// Creates a verbose configuration suitable for debugging.
    pub fn verbose() -> Self {
        Self {
            base_level: Level::DEBUG,
            log_check_details: true,
            log_data_operations: true,
            log_metrics: true,
            max_field_length: 1024,
        }
    }

    /// Creates a minimal configuration with the lowest overhead.
    pub fn production() -> Self {
        Self {
            base_level: Level::WARN,
            log_check_details: false,
            log_data_operations: false,
            log_metrics: false,
            max_field_length: 128,
        }
    }

    pub fn balanced() -> Self {
        Self::default()
    }
}

/// Debug logging that is skipped unless the config's base level allows it.
#[macro_export]
macro_rules! perf_debug {
    ($config:expr, $($arg:tt)*) => {
        if $config.base_level >= tracing::Level::DEBUG {
            tracing::debug!($($arg)*);
        }
    };
}

/// Per-check logging, enabled by `log_check_details`.
#[macro_export]
macro_rules! log_check {
    ($config:expr, $($arg:tt)*) => {
        if $config.log_check_details {
            tracing::debug!($($arg)*);
        }
    };
}

/// Record source logging, enabled by `log_data_operations`.
#[macro_export]
macro_rules! log_data_op {
    ($config:expr, $($arg:tt)*) => {
        if $config.log_data_operations {
            tracing::info!($($arg)*);
        }
    };
}

/// Truncates a string to at most `max_length` bytes, on a character boundary.
pub fn truncate_field(value: &str, max_length: usize) -> String {
    if value.len() <= max_length {
        return value.to_string();
    }

    let end = value
        .char_indices()
        .map(|(index, _)| index)
        .take_while(|&index| index <= max_length)
        .last()
        .unwrap_or(0);
    format!("{}...(truncated)", &value[..end])
}

mod level_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S: Serializer>(level: &Level, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&level.as_str().to_lowercase())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Level, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Level::from_str(&raw).map_err(serde::de::Error::custom)
    }
}

/// Utilities for installing a `tracing` subscriber.
pub mod setup {
    use crate::error::{MarbleError, Result};
    use tracing::Level;

    /// Configuration for the global subscriber.
    #[derive(Debug, Clone)]
    pub struct LoggingConfig {
        /// Log level for everything outside marble-guard
        pub level: Level,
        /// Log level for marble-guard components
        pub marble_level: Level,
        /// Whether to use JSON output format
        pub json_format: bool,
        /// Environment filter override
        pub env_filter: Option<String>,
    }

    impl Default for LoggingConfig {
        fn default() -> Self {
            Self {
                level: Level::INFO,
                marble_level: Level::DEBUG,
                json_format: false,
                env_filter: None,
            }
        }
    }

    impl LoggingConfig {
        pub fn production() -> Self {
            Self {
                level: Level::WARN,
                marble_level: Level::INFO,
                json_format: true,
                env_filter: None,
            }
        }

        pub fn development() -> Self {
            Self {
                level: Level::DEBUG,
                marble_level: Level::TRACE,
                json_format: false,
                env_filter: None,
            }
        }

        pub fn with_level(mut self, level: Level) -> Self {
            self.level = level;
            self
        }

        pub fn with_marble_level(mut self, level: Level) -> Self {
            self.marble_level = level;
            self
        }

        pub fn with_json_format(mut self, enabled: bool) -> Self {
            self.json_format = enabled;
            self
        }

        pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
            self.env_filter = Some(filter.into());
            self
        }

        /// Builds the environment filter string.
        pub fn env_filter(&self) -> String {
            if let Some(ref filter) = self.env_filter {
                filter.clone()
            } else {
                format!(
                    "{},marble_guard={}",
                    self.level.as_str().to_lowercase(),
                    self.marble_level.as_str().to_lowercase()
                )
            }
        }
    }

    /// Installs a global subscriber. `RUST_LOG` overrides the configured filter.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use marble_guard::logging::setup::{init_logging, LoggingConfig};
    ///
    /// init_logging(LoggingConfig::development().with_json_format(true)).unwrap();
    /// ```
    pub fn init_logging(config: LoggingConfig) -> Result<()> {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.env_filter()));

        let fmt_layer = if config.json_format {
            tracing_subscriber::fmt::layer().json().boxed()
        } else {
            tracing_subscriber::fmt::layer().boxed()
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| MarbleError::Configuration(format!("Failed to install logger: {e}")))
    }
}
