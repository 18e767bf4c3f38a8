//! Report and failure formatting.
//!
//! A run ends either in a [`ValidationReport`] or in the first violation as a
//! [`MarbleError`]; formatters render both.
//!
//! # Examples
//!
//! ```rust
//! use marble_guard::core::ValidationReport;
//! use marble_guard::formatters::{FormatterConfig, HumanFormatter, ResultFormatter};
//!
//! let formatter = HumanFormatter::with_config(FormatterConfig::minimal());
//! let output = formatter.format(&ValidationReport::new("marbles")).unwrap();
//! assert!(output.contains("Validation PASSED"));
//! ```

use crate::core::ValidationReport;
use crate::error::{ErrorKind, MarbleError, Result};
use serde_json::json;
use std::fmt::Write;

/// Configuration options for formatting.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Include run metrics
    pub include_metrics: bool,
    /// Include per-check summaries
    pub include_checks: bool,
    /// Include per-table row counts
    pub include_tables: bool,
    /// Whether to use colorized output (human formatter)
    pub use_colors: bool,
    /// Whether to include timestamps
    pub include_timestamps: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            include_metrics: true,
            include_checks: true,
            include_tables: true,
            use_colors: true,
            include_timestamps: true,
        }
    }
}

impl FormatterConfig {
    /// Creates a minimal configuration showing only the summary.
    pub fn minimal() -> Self {
        Self {
            include_metrics: true,
            include_checks: false,
            include_tables: false,
            use_colors: false,
            include_timestamps: false,
        }
    }

    /// Creates a configuration suitable for CI environments.
    pub fn ci() -> Self {
        Self {
            use_colors: false,
            ..Self::default()
        }
    }

    pub fn with_metrics(mut self, include: bool) -> Self {
        self.include_metrics = include;
        self
    }

    pub fn with_checks(mut self, include: bool) -> Self {
        self.include_checks = include;
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }
}

/// Trait for rendering validation outcomes.
pub trait ResultFormatter {
    /// Formats the report of a passed run.
    fn format(&self, report: &ValidationReport) -> Result<String>;

    /// Formats the violation or error that ended a run.
    fn format_failure(&self, error: &MarbleError) -> Result<String> {
        Ok(describe_failure(error))
    }
}

/// A one-paragraph, human-readable description of a failed run.
///
/// ```rust
/// use marble_guard::error::MarbleError;
/// use marble_guard::formatters::describe_failure;
///
/// let err = MarbleError::RosterViolation {
///     battle: "B1".to_string(),
///     marble: "Sunny".to_string(),
///     color: "Yellow".to_string(),
/// };
/// assert!(describe_failure(&err).starts_with("Dataset rejected (roster)"));
/// ```
pub fn describe_failure(error: &MarbleError) -> String {
    let kind = error.kind();
    if kind == ErrorKind::Operational {
        format!("Validation could not complete: {error}")
    } else {
        format!("Dataset rejected ({kind}): {error}")
    }
}

/// Formats outcomes as JSON.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    config: FormatterConfig,
    pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
            pretty: true,
        }
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            pretty: true,
        }
    }

    /// Sets whether to use pretty-printed JSON.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    fn render(&self, value: &serde_json::Value) -> Result<String> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.map_err(|e| MarbleError::Internal(format!("Failed to serialize result to JSON: {e}")))
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultFormatter for JsonFormatter {
    fn format(&self, report: &ValidationReport) -> Result<String> {
        let mut value = json!({
            "status": "passed",
            "suite_name": report.suite_name,
        });

        if let Some(object) = value.as_object_mut() {
            if self.config.include_timestamps {
                object.insert("timestamp".to_string(), json!(report.timestamp));
            }
            if let Some(source) = &report.source {
                object.insert("source".to_string(), json!(source));
            }
            if self.config.include_tables {
                object.insert("table_rows".to_string(), json!(report.table_rows));
            }
            if self.config.include_checks {
                object.insert("checks".to_string(), serde_json::to_value(&report.checks)?);
            }
            if self.config.include_metrics {
                object.insert("metrics".to_string(), serde_json::to_value(&report.metrics)?);
            }
        }

        self.render(&value)
    }

    fn format_failure(&self, error: &MarbleError) -> Result<String> {
        self.render(&json!({
            "status": "failed",
            "kind": error.kind(),
            "violation": error.is_violation(),
            "message": error.to_string(),
        }))
    }
}

/// Formats outcomes as console text.
#[derive(Debug, Clone)]
pub struct HumanFormatter {
    config: FormatterConfig,
}

impl HumanFormatter {
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
        }
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }

    fn paint(&self, text: &str, color: &str) -> String {
        if self.config.use_colors {
            format!("\x1b[{color}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultFormatter for HumanFormatter {
    fn format(&self, report: &ValidationReport) -> Result<String> {
        let config = &self.config;
        let mut output = String::new();

        writeln!(output)?;
        writeln!(output, "✅ {}", self.paint("Validation PASSED", "32"))?;
        writeln!(output)?;
        writeln!(output, "Suite: {}", report.suite_name)?;
        if let Some(source) = &report.source {
            writeln!(output, "Source: {source}")?;
        }
        if config.include_timestamps {
            writeln!(output, "Timestamp: {}", report.timestamp)?;
        }

        if config.include_tables && !report.table_rows.is_empty() {
            writeln!(output)?;
            writeln!(output, "📋 Tables:")?;
            for (table, rows) in &report.table_rows {
                writeln!(output, "   {table}: {rows} rows")?;
            }
        }

        if config.include_checks && !report.checks.is_empty() {
            writeln!(output)?;
            writeln!(output, "🔍 Checks:")?;
            for check in &report.checks {
                writeln!(
                    output,
                    "   {} {} ({} items, {}ms)",
                    self.paint("✓", "32"),
                    check.name,
                    check.items_checked,
                    check.duration_ms
                )?;
                if !check.tables.is_empty() {
                    writeln!(output, "      reads: {}", check.tables.join(", "))?;
                }
                for (key, value) in &check.custom {
                    writeln!(output, "      {key}: {value}")?;
                }
                if let Some(message) = &check.message {
                    writeln!(output, "      {message}")?;
                }
            }
        }

        if config.include_metrics {
            writeln!(output)?;
            writeln!(output, "📊 Summary Statistics:")?;
            writeln!(output, "   Tables: {}", report.metrics.tables_validated)?;
            writeln!(output, "   Rows: {}", report.metrics.total_rows)?;
            writeln!(output, "   Checks: {}", report.metrics.checks_run)?;
            writeln!(output, "   Execution Time: {}ms", report.metrics.execution_time_ms)?;
        }

        writeln!(output)?;
        Ok(output)
    }

    fn format_failure(&self, error: &MarbleError) -> Result<String> {
        let mut output = String::new();
        writeln!(output)?;
        writeln!(output, "❌ {}", self.paint("Validation FAILED", "31"))?;
        writeln!(output)?;
        writeln!(output, "   {}", describe_failure(error))?;
        writeln!(output)?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CheckSummary;

    fn sample_report() -> ValidationReport {
        let mut report = ValidationReport::new("marbles").with_source("CSV directory 'data'");
        report.table_rows.insert("colors".to_string(), 3);
        report.add_check(CheckSummary {
            name: "lifecycle".to_string(),
            description: None,
            tables: vec!["marbles".to_string(), "begin".to_string()],
            custom: [("marbles".to_string(), "4".to_string())].into_iter().collect(),
            items_checked: 4,
            message: Some("21 events replayed".to_string()),
            duration_ms: 1,
        });
        report.metrics.checks_run = 1;
        report
    }

    fn overlap() -> MarbleError {
        MarbleError::OverlapViolation {
            first: "B1".to_string(),
            second: "B2".to_string(),
            first_end: 600.0,
            second_begin: 300.0,
        }
    }

    #[test]
    fn test_json_report() {
        let output = JsonFormatter::new().format(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["status"], "passed");
        assert_eq!(value["checks"][0]["items_checked"], 4);
        assert_eq!(value["checks"][0]["tables"][1], "begin");
        assert_eq!(value["checks"][0]["custom"]["marbles"], "4");
        assert_eq!(value["table_rows"]["colors"], 3);
    }

    #[test]
    fn test_json_minimal_omits_sections() {
        let output = JsonFormatter::with_config(FormatterConfig::minimal())
            .with_pretty(false)
            .format(&sample_report())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(value.get("checks").is_none());
        assert!(value.get("timestamp").is_none());
        assert!(value.get("metrics").is_some());
        assert!(!output.contains('\n'));
    }

    #[test]
    fn test_json_failure() {
        let output = JsonFormatter::new().format_failure(&overlap()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["kind"], "overlap");
        assert_eq!(value["violation"], true);
    }

    #[test]
    fn test_human_report_without_colors() {
        let output = HumanFormatter::with_config(FormatterConfig::ci())
            .format(&sample_report())
            .unwrap();
        assert!(output.contains("Validation PASSED"));
        assert!(output.contains("colors: 3 rows"));
        assert!(output.contains("lifecycle (4 items, 1ms)"));
        assert!(output.contains("reads: marbles, begin"));
        assert!(output.contains("marbles: 4"));
        assert!(output.contains("21 events replayed"));
        assert!(!output.contains("\x1b["));
    }

    #[test]
    fn test_human_failure() {
        let output = HumanFormatter::new().format_failure(&overlap()).unwrap();
        assert!(output.contains("Validation FAILED"));
        assert!(output.contains("Dataset rejected (overlap)"));
        assert!(output.contains("00:10:00.0"));
    }

    #[test]
    fn test_describe_operational_failure() {
        let err = MarbleError::data_source("CSV", "Failed to open 'data/colors.csv'");
        assert!(describe_failure(&err).starts_with("Validation could not complete"));
    }
}
