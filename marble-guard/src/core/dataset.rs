//! The immutable, schema-validated marble dataset shared by every check.

use super::records::{
    Battle, BattleColor, BattleMarble, BeginRecord, Color, EndRecord, LevelRecord, Marble,
};
use crate::error::{MarbleError, Result};
use crate::schema::{KeyRegistry, SchemaCatalog, Table, TypedRow};
use crate::sources::RecordSource;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument};

/// A record with a unique identity.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Color {
    fn key(&self) -> &str {
        &self.name
    }
}

impl Keyed for Marble {
    fn key(&self) -> &str {
        &self.name
    }
}

impl Keyed for Battle {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Records in source order plus an index by identity.
#[derive(Debug, Clone)]
pub struct KeyedTable<T> {
    rows: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T: Keyed> KeyedTable<T> {
    /// Builds the table; a duplicate identity is an internal error because
    /// the schema phase already rejects duplicates.
    pub fn new(rows: Vec<T>) -> Result<Self> {
        let mut index = HashMap::with_capacity(rows.len());
        for (position, row) in rows.iter().enumerate() {
            if index.insert(row.key().to_string(), position).is_some() {
                return Err(MarbleError::Internal(format!(
                    "duplicate identity '{}' reached the dataset",
                    row.key()
                )));
            }
        }
        Ok(Self { rows, index })
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.index.get(key).map(|&position| &self.rows[position])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Records in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.rows.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<'a, T: Keyed> IntoIterator for &'a KeyedTable<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Owned typed tables, used to assemble a [`Dataset`] directly.
#[derive(Debug, Clone, Default)]
pub struct DatasetParts {
    pub colors: Vec<Color>,
    pub marbles: Vec<Marble>,
    pub begins: Vec<BeginRecord>,
    pub levels: Vec<LevelRecord>,
    pub ends: Vec<EndRecord>,
    pub battles: Vec<Battle>,
    pub battle_colors: Vec<BattleColor>,
    pub battle_marbles: Vec<BattleMarble>,
}

/// All eight tables of a run, validated and typed.
///
/// Built once per run and never mutated; every check borrows it.
#[derive(Debug, Clone)]
pub struct Dataset {
    colors: KeyedTable<Color>,
    marbles: KeyedTable<Marble>,
    begins: Vec<BeginRecord>,
    levels: Vec<LevelRecord>,
    ends: Vec<EndRecord>,
    battles: KeyedTable<Battle>,
    battle_colors: Vec<BattleColor>,
    battle_marbles: Vec<BattleMarble>,
}

impl Dataset {
    /// Loads every table from `source` and runs the schema phase.
    ///
    /// Tables are loaded and validated one at a time in
    /// [`Table::VALIDATION_ORDER`]; the first failure aborts loading.
    #[instrument(skip(source, catalog), fields(source = %source.description()))]
    pub fn load(source: &dyn RecordSource, catalog: &SchemaCatalog) -> Result<Self> {
        let mut keys = KeyRegistry::new();
        let mut typed = BTreeMap::new();

        for table in Table::VALIDATION_ORDER {
            let rows = source.load(table)?;
            debug!(table = %table, rows = rows.len(), "Loaded table");
            let validated = catalog.validate_table(table, &rows, &mut keys)?;
            typed.insert(table, validated);
        }

        Self::from_typed_tables(&typed)
    }

    /// Builds the dataset from tables that already passed schema validation.
    pub fn from_typed_tables(tables: &BTreeMap<Table, Vec<TypedRow>>) -> Result<Self> {
        fn convert<T>(tables: &BTreeMap<Table, Vec<TypedRow>>, table: Table) -> Result<Vec<T>>
        where
            T: for<'a> TryFrom<&'a TypedRow, Error = MarbleError>,
        {
            tables
                .get(&table)
                .ok_or_else(|| {
                    MarbleError::Internal(format!("table '{table}' was not validated"))
                })?
                .iter()
                .map(|row| T::try_from(row))
                .collect()
        }

        Self::from_parts(DatasetParts {
            colors: convert(tables, Table::Colors)?,
            marbles: convert(tables, Table::Marbles)?,
            begins: convert(tables, Table::Begin)?,
            levels: convert(tables, Table::Level)?,
            ends: convert(tables, Table::End)?,
            battles: convert(tables, Table::Battles)?,
            battle_colors: convert(tables, Table::BattleColors)?,
            battle_marbles: convert(tables, Table::BattleMarbles)?,
        })
    }

    /// Assembles a dataset from typed tables without running the schema
    /// phase. Only identity uniqueness is enforced; references are left to
    /// the referential check.
    pub fn from_parts(parts: DatasetParts) -> Result<Self> {
        Ok(Self {
            colors: KeyedTable::new(parts.colors)?,
            marbles: KeyedTable::new(parts.marbles)?,
            begins: parts.begins,
            levels: parts.levels,
            ends: parts.ends,
            battles: KeyedTable::new(parts.battles)?,
            battle_colors: parts.battle_colors,
            battle_marbles: parts.battle_marbles,
        })
    }

    /// Copies the typed tables out of the dataset.
    pub fn to_parts(&self) -> DatasetParts {
        DatasetParts {
            colors: self.colors.as_slice().to_vec(),
            marbles: self.marbles.as_slice().to_vec(),
            begins: self.begins.clone(),
            levels: self.levels.clone(),
            ends: self.ends.clone(),
            battles: self.battles.as_slice().to_vec(),
            battle_colors: self.battle_colors.clone(),
            battle_marbles: self.battle_marbles.clone(),
        }
    }

    pub fn colors(&self) -> &KeyedTable<Color> {
        &self.colors
    }

    pub fn marbles(&self) -> &KeyedTable<Marble> {
        &self.marbles
    }

    pub fn begins(&self) -> &[BeginRecord] {
        &self.begins
    }

    pub fn levels(&self) -> &[LevelRecord] {
        &self.levels
    }

    pub fn ends(&self) -> &[EndRecord] {
        &self.ends
    }

    pub fn battles(&self) -> &KeyedTable<Battle> {
        &self.battles
    }

    pub fn battle_colors(&self) -> &[BattleColor] {
        &self.battle_colors
    }

    pub fn battle_marbles(&self) -> &[BattleMarble] {
        &self.battle_marbles
    }

    /// Number of rows loaded for a table.
    pub fn row_count(&self, table: Table) -> usize {
        match table {
            Table::Colors => self.colors.len(),
            Table::Marbles => self.marbles.len(),
            Table::Begin => self.begins.len(),
            Table::Level => self.levels.len(),
            Table::End => self.ends.len(),
            Table::Battles => self.battles.len(),
            Table::BattleColors => self.battle_colors.len(),
            Table::BattleMarbles => self.battle_marbles.len(),
        }
    }

    /// Total number of rows across all tables.
    pub fn total_rows(&self) -> usize {
        Table::VALIDATION_ORDER
            .iter()
            .map(|table| self.row_count(*table))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Location;
    use crate::test_fixtures::DatasetFixture;

    #[test]
    fn test_load_standard_fixture() {
        let dataset = DatasetFixture::tournament().dataset().unwrap();

        assert_eq!(dataset.row_count(Table::Colors), 3);
        assert_eq!(dataset.row_count(Table::Marbles), 4);
        assert_eq!(dataset.row_count(Table::Battles), 2);
        assert!(dataset.marbles().contains("Rusty"));
        assert_eq!(dataset.marbles().get("Rusty").unwrap().color, "Red");
        assert_eq!(dataset.battles().get("B1").unwrap().begin, 600.0);
        assert_eq!(
            dataset.total_rows(),
            Table::VALIDATION_ORDER
                .iter()
                .map(|t| dataset.row_count(*t))
                .sum::<usize>()
        );
    }

    #[test]
    fn test_keyed_table_preserves_source_order() {
        let dataset = DatasetFixture::tournament().dataset().unwrap();
        let names: Vec<&str> = dataset.marbles().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Rusty", "Azure", "Crimson", "Sky"]);
    }

    #[test]
    fn test_keyed_table_rejects_duplicates() {
        let colors = vec![
            Color {
                name: "Red".to_string(),
                hex_code: "#FF0000".to_string(),
            },
            Color {
                name: "Red".to_string(),
                hex_code: "#EE0000".to_string(),
            },
        ];
        assert!(matches!(
            KeyedTable::new(colors),
            Err(MarbleError::Internal(_))
        ));
    }

    #[test]
    fn test_parts_round_trip_keeps_order() {
        let dataset = DatasetFixture::tournament().dataset().unwrap();
        let rebuilt = Dataset::from_parts(dataset.to_parts()).unwrap();
        assert_eq!(rebuilt.total_rows(), dataset.total_rows());
        assert_eq!(rebuilt.begins(), dataset.begins());
    }

    #[test]
    fn test_begin_location_battle_names_a_marble() {
        let mut fixture = DatasetFixture::empty();
        fixture
            .color("Red", "#FF0000")
            .marble("BATTLE", "Red", 1)
            .marble("Ember", "Red", 0)
            .begin("00:01:00.0", "BATTLE", "-", 1, "Born")
            .begin("00:02:00.0", "Ember", "BATTLE", 0, "Summon");
        let dataset = fixture.dataset().unwrap();

        assert_eq!(dataset.begins()[0].location, Location::Nowhere);
        assert_eq!(
            dataset.begins()[1].location,
            Location::Marble("BATTLE".to_string())
        );
    }

    #[test]
    fn test_load_stops_at_first_invalid_table() {
        let mut fixture = DatasetFixture::tournament();
        fixture.color("Green", "#00FF00 ");
        let err = fixture.dataset().unwrap_err();
        assert!(matches!(err, MarbleError::Format { ref table, .. } if table == "colors"));
    }
}
