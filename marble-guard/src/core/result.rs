//! Reports produced by a successful validation run.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Execution metrics of a validation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationMetrics {
    /// Tables that passed the schema phase
    pub tables_validated: usize,
    /// Rows across all tables
    pub total_rows: usize,
    /// Checks run after the schema phase
    pub checks_run: usize,
    /// Wall-clock duration of the run in milliseconds
    pub execution_time_ms: u64,
}

impl ValidationMetrics {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Summary of one passed check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckSummary {
    pub name: String,
    pub description: Option<String>,
    /// Tables the check read
    #[serde(default)]
    pub tables: Vec<String>,
    /// Custom metadata the check declared
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom: BTreeMap<String, String>,
    pub items_checked: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub duration_ms: u64,
}

/// Report of a dataset that passed every check.
///
/// A run that finds a violation returns the violation as an error instead,
/// so a report always describes a valid dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub suite_name: String,
    /// RFC 3339 timestamp of when the report was created
    pub timestamp: String,
    /// Description of the record source, when the run loaded one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Rows per table, keyed by table name
    pub table_rows: BTreeMap<String, usize>,
    /// Checks in the order they ran
    pub checks: Vec<CheckSummary>,
    pub metrics: ValidationMetrics,
}

impl ValidationReport {
    /// Creates an empty report stamped with the current time.
    pub fn new(suite_name: impl Into<String>) -> Self {
        Self {
            suite_name: suite_name.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            source: None,
            table_rows: BTreeMap::new(),
            checks: Vec::new(),
            metrics: ValidationMetrics::new(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn add_check(&mut self, summary: CheckSummary) {
        self.checks.push(summary);
    }

    /// Summary of the named check, if it ran.
    pub fn check(&self, name: &str) -> Option<&CheckSummary> {
        self.checks.iter().find(|summary| summary.name == name)
    }

    /// Serializes the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_timestamp_is_rfc3339() {
        let report = ValidationReport::new("marbles");
        assert!(chrono::DateTime::parse_from_rfc3339(&report.timestamp).is_ok());
        assert!(report.checks.is_empty());
    }

    #[test]
    fn test_report_json() {
        let mut report = ValidationReport::new("marbles").with_source("in-memory source");
        report.table_rows.insert("colors".to_string(), 3);
        report.add_check(CheckSummary {
            name: "battle_overlap".to_string(),
            description: None,
            tables: vec!["battles".to_string()],
            custom: BTreeMap::new(),
            items_checked: 1,
            message: None,
            duration_ms: 0,
        });

        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["suite_name"], "marbles");
        assert_eq!(value["table_rows"]["colors"], 3);
        assert_eq!(value["checks"][0]["name"], "battle_overlap");
        assert_eq!(value["checks"][0]["tables"][0], "battles");
        assert!(value["checks"][0].get("custom").is_none());
        assert!(report.check("battle_overlap").is_some());
        assert!(report.check("lifecycle").is_none());
    }
}
