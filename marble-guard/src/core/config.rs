//! Validator configuration.

use super::suite::STANDARD_SUITE_NAME;
use crate::error::{MarbleError, Result};
use crate::logging::LogConfig;
use crate::sources::CsvOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration of a [`DatasetValidator`](super::DatasetValidator).
///
/// Every field has a default, so a configuration file only needs the values
/// it changes:
///
/// ```rust
/// use marble_guard::core::ValidatorConfig;
///
/// let config = ValidatorConfig::from_json_str(r#"{
///     "suite_name": "season_3",
///     "csv": { "delimiter": 59 }
/// }"#).unwrap();
///
/// assert_eq!(config.suite_name, "season_3");
/// assert_eq!(config.csv.delimiter, b';');
/// assert_eq!(config.csv.extension, "csv");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Name recorded in reports
    pub suite_name: String,
    pub logging: LogConfig,
    /// Options for directory sources
    pub csv: CsvOptions,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            suite_name: STANDARD_SUITE_NAME.to_string(),
            logging: LogConfig::default(),
            csv: CsvOptions::default(),
        }
    }
}

impl ValidatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| MarbleError::Configuration(format!("Invalid validator configuration: {e}")))
    }

    /// Reads a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            MarbleError::Configuration(format!(
                "Failed to read configuration '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_json_str(&contents)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_suite_name(mut self, name: impl Into<String>) -> Self {
        self.suite_name = name.into();
        self
    }

    pub fn with_logging(mut self, logging: LogConfig) -> Self {
        self.logging = logging;
        self
    }

    pub fn with_csv_options(mut self, csv: CsvOptions) -> Self {
        self.csv = csv;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Table;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ValidatorConfig::default();
        assert_eq!(config.suite_name, STANDARD_SUITE_NAME);
        assert_eq!(config.csv, CsvOptions::default());
        assert_eq!(config.logging, LogConfig::default());
    }

    #[test]
    fn test_json_round_trip() {
        let config = ValidatorConfig::new()
            .with_suite_name("finals")
            .with_logging(LogConfig::verbose())
            .with_csv_options(CsvOptions::default().with_file_name(Table::End, "ends.csv"));

        let parsed = ValidatorConfig::from_json_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_invalid_json_is_configuration_error() {
        let err = ValidatorConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, MarbleError::Configuration(_)));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"logging": {{"base_level": "debug"}}}}"#).unwrap();

        let config = ValidatorConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.logging.base_level, tracing::Level::DEBUG);
        assert_eq!(config.suite_name, STANDARD_SUITE_NAME);

        assert!(ValidatorConfig::from_json_file("/nonexistent/marble-guard.json").is_err());
    }
}
