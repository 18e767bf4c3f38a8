//! Referential integrity across the dataset tables.
//!
//! The schema phase already resolves references while it coerces rows. This
//! check re-asserts every reference over the typed [`Dataset`], so a dataset
//! assembled by other means gets the same guarantee.
//!
//! ```rust
//! use marble_guard::constraints::ForeignKeyConstraint;
//! use marble_guard::schema::{columns, KeySpace, Table};
//!
//! let constraint = ForeignKeyConstraint::standard();
//! assert!(constraint
//!     .references()
//!     .iter()
//!     .any(|r| r.table == Table::End && r.field == columns::LOCATION && r.target == KeySpace::Marbles));
//! ```

use crate::core::{CheckMetadata, CheckResult, Dataset, DatasetCheck};
use crate::error::{MarbleError, Result};
use crate::schema::{columns, KeySpace, Table, BATTLE_LOCATION, NO_LOCATION};
use tracing::{debug, instrument, warn};

/// One reference field: values of `table.field` must name an existing
/// `target` key, unless they equal one of `sentinels`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub table: Table,
    pub field: &'static str,
    pub target: KeySpace,
    pub sentinels: Vec<&'static str>,
}

impl Reference {
    pub fn new(table: Table, field: &'static str, target: KeySpace) -> Self {
        Self {
            table,
            field,
            target,
            sentinels: Vec::new(),
        }
    }

    /// Accepts `sentinel` in place of a key.
    pub fn allow(mut self, sentinel: &'static str) -> Self {
        self.sentinels.push(sentinel);
        self
    }
}

/// Checks a declarative list of references against the dataset.
#[derive(Debug, Clone)]
pub struct ForeignKeyConstraint {
    references: Vec<Reference>,
}

impl ForeignKeyConstraint {
    /// An empty constraint; add references with [`reference`](Self::reference).
    pub fn new() -> Self {
        Self {
            references: Vec::new(),
        }
    }

    /// Every reference of the standard marble dataset.
    pub fn standard() -> Self {
        use columns::*;

        Self::new()
            .reference(Reference::new(Table::Marbles, COLOR, KeySpace::Colors))
            .reference(Reference::new(Table::Begin, MARBLE_NAME, KeySpace::Marbles))
            .reference(Reference::new(Table::Begin, LOCATION, KeySpace::Marbles).allow(NO_LOCATION))
            .reference(Reference::new(Table::Level, MARBLE_NAME, KeySpace::Marbles))
            .reference(Reference::new(Table::End, MARBLE_NAME, KeySpace::Marbles))
            .reference(
                Reference::new(Table::End, LOCATION, KeySpace::Marbles)
                    .allow(BATTLE_LOCATION)
                    .allow(NO_LOCATION),
            )
            .reference(Reference::new(Table::BattleColors, BATTLE_ID, KeySpace::Battles))
            .reference(Reference::new(Table::BattleColors, COLOR, KeySpace::Colors))
            .reference(Reference::new(Table::BattleMarbles, BATTLE_ID, KeySpace::Battles))
            .reference(Reference::new(Table::BattleMarbles, MARBLE_NAME, KeySpace::Marbles))
    }

    pub fn reference(mut self, reference: Reference) -> Self {
        self.references.push(reference);
        self
    }

    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    fn check_reference(&self, dataset: &Dataset, reference: &Reference) -> Result<usize> {
        let values = reference_values(dataset, reference.table, reference.field)?;

        for (row, value) in &values {
            let is_sentinel = reference.sentinels.iter().any(|sentinel| sentinel == value);
            if is_sentinel || key_exists(dataset, reference.target, value) {
                continue;
            }

            warn!(
                table = %reference.table,
                row,
                field = reference.field,
                value,
                "Unresolved reference"
            );
            return Err(MarbleError::schema_violation(
                reference.table.name(),
                *row,
                reference.field,
                format!("unknown {} '{value}'", reference.target.noun()),
            ));
        }

        Ok(values.len())
    }
}

impl Default for ForeignKeyConstraint {
    fn default() -> Self {
        Self::standard()
    }
}

fn key_exists(dataset: &Dataset, space: KeySpace, key: &str) -> bool {
    match space {
        KeySpace::Colors => dataset.colors().contains(key),
        KeySpace::Marbles => dataset.marbles().contains(key),
        KeySpace::Battles => dataset.battles().contains(key),
    }
}

/// Values of `table.field` paired with their row index.
fn reference_values<'a>(
    dataset: &'a Dataset,
    table: Table,
    field: &str,
) -> Result<Vec<(usize, &'a str)>> {
    use columns::*;

    let values: Vec<(usize, &str)> = match (table, field) {
        (Table::Marbles, COLOR) => dataset
            .marbles()
            .iter()
            .enumerate()
            .map(|(row, marble)| (row, marble.color.as_str()))
            .collect(),
        (Table::Begin, MARBLE_NAME) => dataset
            .begins()
            .iter()
            .map(|record| (record.row, record.marble.as_str()))
            .collect(),
        (Table::Begin, LOCATION) => dataset
            .begins()
            .iter()
            .map(|record| (record.row, record.location.as_str()))
            .collect(),
        (Table::Level, MARBLE_NAME) => dataset
            .levels()
            .iter()
            .map(|record| (record.row, record.marble.as_str()))
            .collect(),
        (Table::End, MARBLE_NAME) => dataset
            .ends()
            .iter()
            .map(|record| (record.row, record.marble.as_str()))
            .collect(),
        (Table::End, LOCATION) => dataset
            .ends()
            .iter()
            .map(|record| (record.row, record.location.as_str()))
            .collect(),
        (Table::BattleColors, BATTLE_ID) => dataset
            .battle_colors()
            .iter()
            .enumerate()
            .map(|(row, entry)| (row, entry.battle.as_str()))
            .collect(),
        (Table::BattleColors, COLOR) => dataset
            .battle_colors()
            .iter()
            .enumerate()
            .map(|(row, entry)| (row, entry.color.as_str()))
            .collect(),
        (Table::BattleMarbles, BATTLE_ID) => dataset
            .battle_marbles()
            .iter()
            .enumerate()
            .map(|(row, entry)| (row, entry.battle.as_str()))
            .collect(),
        (Table::BattleMarbles, MARBLE_NAME) => dataset
            .battle_marbles()
            .iter()
            .enumerate()
            .map(|(row, entry)| (row, entry.marble.as_str()))
            .collect(),
        _ => {
            return Err(MarbleError::Configuration(format!(
                "'{table}.{field}' is not a reference field"
            )))
        }
    };

    Ok(values)
}

impl DatasetCheck for ForeignKeyConstraint {
    #[instrument(skip(self, dataset), fields(check = "foreign_key"))]
    fn evaluate(&self, dataset: &Dataset) -> Result<CheckResult> {
        let mut checked = 0;
        for reference in &self.references {
            let count = self.check_reference(dataset, reference)?;
            debug!(
                table = %reference.table,
                field = reference.field,
                values = count,
                "References resolved"
            );
            checked += count;
        }
        Ok(CheckResult::passed(checked))
    }

    fn name(&self) -> &str {
        "foreign_key"
    }

    fn description(&self) -> Option<&str> {
        Some("Every reference field names an existing color, marble or battle")
    }

    fn metadata(&self) -> CheckMetadata {
        let mut tables: Vec<Table> = self.references.iter().map(|r| r.table).collect();
        tables.dedup();
        CheckMetadata::for_tables(tables)
            .with_custom("references", self.references.len().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BattleMarble, Dataset};
    use crate::test_fixtures::DatasetFixture;

    #[test]
    fn test_standard_dataset_resolves() {
        let dataset = DatasetFixture::tournament().dataset().unwrap();
        let result = ForeignKeyConstraint::standard().evaluate(&dataset).unwrap();
        assert!(result.items_checked > 0);
    }

    #[test]
    fn test_unknown_reference_is_schema_violation() {
        let dataset = DatasetFixture::tournament().dataset().unwrap();
        let mut parts = dataset.to_parts();
        parts.battle_marbles.push(BattleMarble {
            battle: "B1".to_string(),
            marble: "Phantom".to_string(),
        });
        let dataset = Dataset::from_parts(parts).unwrap();

        let err = ForeignKeyConstraint::standard()
            .evaluate(&dataset)
            .unwrap_err();
        match err {
            MarbleError::SchemaViolation {
                table,
                row,
                field,
                reason,
            } => {
                assert_eq!(table, "battle-marbles");
                assert_eq!(row, 5);
                assert_eq!(field, "Marble Name");
                assert_eq!(reason, "unknown marble 'Phantom'");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_sentinels_are_accepted() {
        let dataset = DatasetFixture::tournament().dataset().unwrap();
        let constraint = ForeignKeyConstraint::new().reference(
            Reference::new(Table::End, columns::LOCATION, KeySpace::Marbles)
                .allow(BATTLE_LOCATION)
                .allow(NO_LOCATION),
        );
        assert!(constraint.evaluate(&dataset).is_ok());

        let strict = ForeignKeyConstraint::new().reference(Reference::new(
            Table::End,
            columns::LOCATION,
            KeySpace::Marbles,
        ));
        assert!(strict.evaluate(&dataset).is_err());
    }

    #[test]
    fn test_non_reference_field_is_configuration_error() {
        let dataset = DatasetFixture::tournament().dataset().unwrap();
        let constraint = ForeignKeyConstraint::new().reference(Reference::new(
            Table::Colors,
            columns::HEX_CODE,
            KeySpace::Colors,
        ));
        assert!(matches!(
            constraint.evaluate(&dataset),
            Err(MarbleError::Configuration(_))
        ));
    }
}
