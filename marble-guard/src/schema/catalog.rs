//! The declared schemas of the eight marble dataset tables.

use super::predicate::{KeyRegistry, KeySpace, Predicate};
use super::table::{FieldSpec, Table, TableSchema, TypedRow};
use crate::error::{MarbleError, Result};
use crate::sources::RawRow;

/// Column names shared by the table schemas and record conversions.
pub mod columns {
    pub const COLOR: &str = "Color";
    pub const HEX_CODE: &str = "Hex Code";
    pub const MARBLE_NAME: &str = "Marble Name";
    pub const FULL_NAME: &str = "Full Name";
    pub const TYPE: &str = "Type";
    pub const FINAL_LEVEL: &str = "Final Level";
    pub const KILLS: &str = "Kills";
    pub const TIME: &str = "Time";
    pub const LOCATION: &str = "Location";
    pub const LEVEL: &str = "Level";
    pub const BATTLE_ID: &str = "Battle Id";
    pub const BEGIN: &str = "Begin";
    pub const END: &str = "End";
    pub const IS_WINNER: &str = "Is Winner";
}

/// Location value meaning "no location".
pub const NO_LOCATION: &str = "-";
/// End location value meaning the marble ended inside a battle.
pub const BATTLE_LOCATION: &str = "BATTLE";

pub const BEGIN_KINDS: [&str; 3] = ["Born", "Summon", "Revive"];
pub const END_KINDS: [&str; 2] = ["Death", "Survive"];

/// The full set of table schemas, held in validation order.
#[derive(Debug, Clone)]
pub struct SchemaCatalog {
    schemas: Vec<TableSchema>,
}

impl SchemaCatalog {
    /// Builds the catalog of the standard marble dataset.
    pub fn standard() -> Self {
        use columns::*;

        let known_marble = || Predicate::KnownKey(KeySpace::Marbles);
        let known_color = || Predicate::KnownKey(KeySpace::Colors);
        let known_battle = || Predicate::KnownKey(KeySpace::Battles);

        let schemas = vec![
            TableSchema::new(Table::Colors)
                .field(FieldSpec::text(COLOR))
                .field(FieldSpec::text(HEX_CODE).must(Predicate::HexCode))
                .identity(COLOR, KeySpace::Colors),
            TableSchema::new(Table::Marbles)
                .field(FieldSpec::text(MARBLE_NAME))
                .field(FieldSpec::text(FULL_NAME))
                .field(FieldSpec::text(TYPE))
                .field(FieldSpec::text(COLOR).must(known_color()))
                .field(FieldSpec::integer(FINAL_LEVEL).must(Predicate::NonNegative))
                .field(FieldSpec::integer(KILLS).must(Predicate::NonNegative))
                .identity(MARBLE_NAME, KeySpace::Marbles),
            TableSchema::new(Table::Begin)
                .field(FieldSpec::time(TIME))
                .field(FieldSpec::text(MARBLE_NAME).must(known_marble()))
                .field(FieldSpec::text(LOCATION).must(Predicate::AnyOf(vec![
                    Predicate::one_of(&[NO_LOCATION]),
                    known_marble(),
                ])))
                .field(FieldSpec::integer(LEVEL).must(Predicate::NonNegative))
                .field(FieldSpec::text(TYPE).must(Predicate::one_of(&BEGIN_KINDS))),
            TableSchema::new(Table::Level)
                .field(FieldSpec::time(TIME))
                .field(FieldSpec::text(MARBLE_NAME).must(known_marble()))
                .field(FieldSpec::integer(LEVEL).must(Predicate::NonNegative)),
            TableSchema::new(Table::End)
                .field(FieldSpec::time(TIME))
                .field(FieldSpec::text(MARBLE_NAME).must(known_marble()))
                .field(FieldSpec::text(LOCATION).must(Predicate::AnyOf(vec![
                    Predicate::one_of(&[BATTLE_LOCATION, NO_LOCATION]),
                    known_marble(),
                ])))
                .field(FieldSpec::integer(LEVEL).must(Predicate::NonNegative))
                .field(FieldSpec::text(TYPE).must(Predicate::one_of(&END_KINDS))),
            TableSchema::new(Table::Battles)
                .field(FieldSpec::text(BATTLE_ID))
                .field(FieldSpec::time(BEGIN))
                .field(FieldSpec::time(END))
                .identity(BATTLE_ID, KeySpace::Battles),
            TableSchema::new(Table::BattleColors)
                .field(FieldSpec::text(BATTLE_ID).must(known_battle()))
                .field(FieldSpec::text(COLOR).must(known_color()))
                .field(FieldSpec::boolean(IS_WINNER)),
            TableSchema::new(Table::BattleMarbles)
                .field(FieldSpec::text(BATTLE_ID).must(known_battle()))
                .field(FieldSpec::text(MARBLE_NAME).must(known_marble())),
        ];

        Self { schemas }
    }

    /// Schemas in validation order.
    pub fn schemas(&self) -> &[TableSchema] {
        &self.schemas
    }

    /// Returns the schema of a table.
    pub fn schema(&self, table: Table) -> Result<&TableSchema> {
        self.schemas
            .iter()
            .find(|schema| schema.table == table)
            .ok_or_else(|| MarbleError::Configuration(format!("no schema declared for '{table}'")))
    }

    /// Validates one table's rows, registering its identity keys on success.
    pub fn validate_table(
        &self,
        table: Table,
        rows: &[RawRow],
        keys: &mut KeyRegistry,
    ) -> Result<Vec<TypedRow>> {
        self.schema(table)?.validate(rows, keys)
    }
}

impl Default for SchemaCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_catalog_order_matches_validation_order() {
        let catalog = SchemaCatalog::standard();
        let tables: Vec<Table> = catalog.schemas().iter().map(|s| s.table).collect();
        assert_eq!(tables, Table::VALIDATION_ORDER.to_vec());
    }

    #[test]
    fn test_column_sets() {
        let catalog = SchemaCatalog::standard();
        assert_eq!(
            catalog.schema(Table::Marbles).unwrap().field_names(),
            vec!["Marble Name", "Full Name", "Type", "Color", "Final Level", "Kills"]
        );
        assert_eq!(
            catalog.schema(Table::End).unwrap().field_names(),
            vec!["Time", "Marble Name", "Location", "Level", "Type"]
        );
        assert_eq!(
            catalog.schema(Table::BattleColors).unwrap().field_names(),
            vec!["Battle Id", "Color", "Is Winner"]
        );
    }

    #[test]
    fn test_every_dependency_is_validated_earlier() {
        let catalog = SchemaCatalog::standard();
        let mut validated = Vec::new();
        for schema in catalog.schemas() {
            for space in schema.dependencies() {
                assert!(
                    validated.contains(&space),
                    "{} depends on {space} before it is validated",
                    schema.table
                );
            }
            if let Some((_, space)) = schema.identity {
                validated.push(space);
            }
        }
    }

    #[test]
    fn test_malformed_hex_code_is_format_error() {
        let catalog = SchemaCatalog::standard();
        let mut keys = KeyRegistry::new();
        let err = catalog
            .validate_table(
                Table::Colors,
                &[row(&[("Color", "Red"), ("Hex Code", "#ff0000")])],
                &mut keys,
            )
            .unwrap_err();
        assert!(matches!(err, MarbleError::Format { ref field, .. } if field == "Hex Code"));
    }

    #[test]
    fn test_end_location_accepts_battle_sentinel_only_for_end() {
        let catalog = SchemaCatalog::standard();
        let mut keys = KeyRegistry::new();
        keys.register(KeySpace::Marbles, ["Alpha"]);

        let end_row = row(&[
            ("Time", "00:01:00.0"),
            ("Marble Name", "Alpha"),
            ("Location", "BATTLE"),
            ("Level", "1"),
            ("Type", "Death"),
        ]);
        assert!(catalog
            .validate_table(Table::End, &[end_row], &mut keys)
            .is_ok());

        let begin_row = row(&[
            ("Time", "00:01:00.0"),
            ("Marble Name", "Alpha"),
            ("Location", "BATTLE"),
            ("Level", "1"),
            ("Type", "Born"),
        ]);
        let err = catalog
            .validate_table(Table::Begin, &[begin_row], &mut keys)
            .unwrap_err();
        assert!(matches!(err, MarbleError::SchemaViolation { ref field, .. } if field == "Location"));
    }

    #[test]
    fn test_begin_kind_must_be_enumerated() {
        let catalog = SchemaCatalog::standard();
        let mut keys = KeyRegistry::new();
        keys.register(KeySpace::Marbles, ["Alpha"]);
        let begin_row = row(&[
            ("Time", "00:01:00.0"),
            ("Marble Name", "Alpha"),
            ("Location", "-"),
            ("Level", "1"),
            ("Type", "Death"),
        ]);
        let err = catalog
            .validate_table(Table::Begin, &[begin_row], &mut keys)
            .unwrap_err();
        assert!(err.to_string().contains("Born, Summon, Revive"));
    }
}
