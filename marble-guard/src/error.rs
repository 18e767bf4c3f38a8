//! Error types for the marble-guard validation library.
//!
//! Every failure a validation run can produce is a variant of [`MarbleError`].
//! The first six variants are dataset violations; the remaining ones cover
//! loading, configuration and internal problems. A run never recovers from
//! any of them: the first error aborts the run and is returned to the caller.

use crate::lifecycle::LifecycleState;
use crate::time::format_time;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The main error type for the marble-guard library.
#[derive(Error, Debug)]
pub enum MarbleError {
    /// A field could not be coerced to its required type.
    #[error("Format error in table '{table}' row {row}, field '{field}': {message}")]
    Format {
        /// Name of the table the row belongs to
        table: String,
        /// Zero-based index of the row within the table
        row: usize,
        /// Name of the offending field
        field: String,
        /// What was wrong with the raw value
        message: String,
    },

    /// A coerced field failed a value or membership predicate.
    #[error("Schema violation in table '{table}' row {row}, field '{field}': {reason}")]
    SchemaViolation {
        /// Name of the table the row belongs to
        table: String,
        /// Zero-based index of the row within the table
        row: usize,
        /// Name of the offending field
        field: String,
        /// Description of the failed predicate
        reason: String,
    },

    /// A marble fights in a battle its color is not registered for.
    #[error(
        "Roster violation in battle '{battle}': marble '{marble}' has color '{color}', which is not registered for the battle"
    )]
    RosterViolation {
        battle: String,
        marble: String,
        color: String,
    },

    /// Two battles' time intervals overlap.
    #[error(
        "Overlap violation: battle '{first}' ends at {} but battle '{second}' begins at {}",
        format_time(*.first_end),
        format_time(*.second_begin)
    )]
    OverlapViolation {
        /// Battle with the earlier begin time
        first: String,
        /// Battle that follows it in begin-time order
        second: String,
        first_end: f64,
        second_begin: f64,
    },

    /// An event is illegal in the marble's current lifecycle state.
    #[error(
        "Lifecycle violation for marble '{marble}' at {}: {reason} (state: {state}, event: {event})",
        format_time(*.time)
    )]
    LifecycleViolation {
        marble: String,
        /// State the marble was in when the event arrived
        state: LifecycleState,
        /// Rendering of the offending event
        event: String,
        /// Time of the offending event in seconds
        time: f64,
        reason: String,
    },

    /// The replayed level does not match the declared final level.
    #[error(
        "Final level violation for marble '{marble}': declared {expected}, replayed {}",
        display_level(.actual)
    )]
    FinalLevelViolation {
        marble: String,
        expected: i64,
        /// Level reached by replay, `None` when the marble was never born
        actual: Option<i64>,
    },

    /// Error from data source operations.
    #[error("Data source error: {message}")]
    DataSource {
        /// Type of data source (e.g., "CSV", "Memory")
        source_type: String,
        /// Detailed error message
        message: String,
        /// Optional underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Error from Arrow operations.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Error from I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error when parsing a standalone value outside of a table context.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Error related to configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error from serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic internal error for unexpected conditions.
    #[error("Internal error: {0}")]
    Internal(String),
}

fn display_level(level: &Option<i64>) -> String {
    match level {
        Some(level) => level.to_string(),
        None => "none (marble was never born)".to_string(),
    }
}

/// A type alias for `Result<T, MarbleError>`.
pub type Result<T> = std::result::Result<T, MarbleError>;

/// Coarse classification of a [`MarbleError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Format,
    Schema,
    Roster,
    Overlap,
    Lifecycle,
    FinalLevel,
    /// Loading, configuration or internal failures
    Operational,
}

impl ErrorKind {
    /// Returns the string representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Format => "format",
            ErrorKind::Schema => "schema",
            ErrorKind::Roster => "roster",
            ErrorKind::Overlap => "overlap",
            ErrorKind::Lifecycle => "lifecycle",
            ErrorKind::FinalLevel => "final_level",
            ErrorKind::Operational => "operational",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl MarbleError {
    /// Creates a format error for a field of a table row.
    pub fn format(
        table: impl Into<String>,
        row: usize,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Format {
            table: table.into(),
            row,
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a schema violation for a field of a table row.
    pub fn schema_violation(
        table: impl Into<String>,
        row: usize,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::SchemaViolation {
            table: table.into(),
            row,
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new data source error.
    pub fn data_source(source_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DataSource {
            source_type: source_type.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new data source error with a source error.
    pub fn data_source_with_source(
        source_type: impl Into<String>,
        message: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::DataSource {
            source_type: source_type.into(),
            message: message.into(),
            source: Some(source),
        }
    }

    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MarbleError::Format { .. } => ErrorKind::Format,
            MarbleError::SchemaViolation { .. } => ErrorKind::Schema,
            MarbleError::RosterViolation { .. } => ErrorKind::Roster,
            MarbleError::OverlapViolation { .. } => ErrorKind::Overlap,
            MarbleError::LifecycleViolation { .. } => ErrorKind::Lifecycle,
            MarbleError::FinalLevelViolation { .. } => ErrorKind::FinalLevel,
            _ => ErrorKind::Operational,
        }
    }

    /// Returns true if the error describes a problem with the dataset itself
    /// rather than with loading or configuration.
    pub fn is_violation(&self) -> bool {
        self.kind() != ErrorKind::Operational
    }
}

impl From<serde_json::Error> for MarbleError {
    fn from(err: serde_json::Error) -> Self {
        MarbleError::Serialization(err.to_string())
    }
}

impl From<std::fmt::Error> for MarbleError {
    fn from(err: std::fmt::Error) -> Self {
        MarbleError::Internal(format!("Failed to format output: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_format_error_display() {
        let err = MarbleError::format("begin", 3, "Time", "expected 3 ':'-separated parts");
        assert_eq!(
            err.to_string(),
            "Format error in table 'begin' row 3, field 'Time': expected 3 ':'-separated parts"
        );
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_overlap_violation_display_uses_clock_times() {
        let err = MarbleError::OverlapViolation {
            first: "B1".to_string(),
            second: "B2".to_string(),
            first_end: 3723.5,
            second_begin: 60.0,
        };
        assert_eq!(
            err.to_string(),
            "Overlap violation: battle 'B1' ends at 01:02:03.5 but battle 'B2' begins at 00:01:00.0"
        );
    }

    #[test]
    fn test_final_level_violation_without_birth() {
        let err = MarbleError::FinalLevelViolation {
            marble: "Ghost".to_string(),
            expected: 2,
            actual: None,
        };
        assert!(err.to_string().contains("never born"));
        assert_eq!(err.kind(), ErrorKind::FinalLevel);
    }

    #[test]
    fn test_data_source_error_with_source() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err = MarbleError::data_source_with_source("CSV", "Could not open", Box::new(source));
        assert!(err.source().is_some());
        assert!(!err.is_violation());
    }
}
