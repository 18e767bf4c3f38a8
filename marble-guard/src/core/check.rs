//! The check trait run by a validation suite.

use super::dataset::Dataset;
use crate::error::Result;
use crate::schema::Table;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;

/// Outcome of a check that passed.
///
/// A check that finds a violation returns it as an error instead, so there is
/// no failure status here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Number of items the check examined (references, battle pairs, marbles, ...)
    pub items_checked: usize,
    /// Optional message providing additional context
    pub message: Option<String>,
}

impl CheckResult {
    /// A passed check that examined `items_checked` items.
    pub fn passed(items_checked: usize) -> Self {
        Self {
            items_checked,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Metadata associated with a check.
///
/// The suite copies it into the [`CheckSummary`](super::CheckSummary) of every
/// check that passes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckMetadata {
    /// Tables the check reads
    pub tables: Vec<Table>,
    /// Additional key-value pairs for custom metadata
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub custom: BTreeMap<String, String>,
}

impl CheckMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata for a check reading the given tables.
    pub fn for_tables<I>(tables: I) -> Self
    where
        I: IntoIterator<Item = Table>,
    {
        Self {
            tables: tables.into_iter().collect(),
            custom: BTreeMap::new(),
        }
    }

    pub fn with_custom(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom.insert(key.into(), value.into());
        self
    }

    /// Names of the tables the check reads.
    pub fn table_names(&self) -> Vec<String> {
        self.tables.iter().map(|table| table.name().to_string()).collect()
    }
}

/// A whole-dataset consistency check.
///
/// Checks run after the schema phase, over the immutable [`Dataset`]. The
/// first violation found is returned as an error and aborts the run.
pub trait DatasetCheck: Debug + Send + Sync {
    /// Evaluates the check.
    fn evaluate(&self, dataset: &Dataset) -> Result<CheckResult>;

    /// Returns the name of the check.
    fn name(&self) -> &str;

    /// Returns a description of what this check validates.
    fn description(&self) -> Option<&str> {
        None
    }

    /// Returns the metadata associated with this check.
    fn metadata(&self) -> CheckMetadata {
        CheckMetadata::new()
    }
}

/// A boxed check for use in collections.
pub type BoxedCheck = Box<dyn DatasetCheck>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_metadata_builder() {
        let metadata = CheckMetadata::for_tables([Table::Battles, Table::BattleColors])
            .with_custom("references", "2");

        assert_eq!(metadata.tables, vec![Table::Battles, Table::BattleColors]);
        assert_eq!(metadata.table_names(), vec!["battles", "battle-colors"]);
        assert_eq!(metadata.custom.get("references"), Some(&"2".to_string()));
    }

    #[test]
    fn test_metadata_skips_empty_custom() {
        let json = serde_json::to_string(&CheckMetadata::for_tables([Table::Colors])).unwrap();
        assert!(!json.contains("custom"));
    }
}
