//! Table identities, field descriptors and per-table row validation.

use super::predicate::{KeyRegistry, KeySpace, Predicate};
use super::value::{Coercion, Value};
use crate::error::{ErrorKind, MarbleError, Result};
use crate::sources::RawRow;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use tracing::{debug, instrument};

/// The eight tables of a marble dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Table {
    Colors,
    Marbles,
    Begin,
    Level,
    End,
    Battles,
    BattleColors,
    BattleMarbles,
}

impl Table {
    /// All tables in the order they must be validated.
    pub const VALIDATION_ORDER: [Table; 8] = [
        Table::Colors,
        Table::Marbles,
        Table::Begin,
        Table::Level,
        Table::End,
        Table::Battles,
        Table::BattleColors,
        Table::BattleMarbles,
    ];

    /// Dataset name of the table, also the default CSV file stem.
    pub fn name(&self) -> &'static str {
        match self {
            Table::Colors => "colors",
            Table::Marbles => "marbles",
            Table::Begin => "begin",
            Table::Level => "level",
            Table::End => "end",
            Table::Battles => "battles",
            Table::BattleColors => "battle-colors",
            Table::BattleMarbles => "battle-marbles",
        }
    }

    /// Looks up a table by its dataset name.
    pub fn from_name(name: &str) -> Option<Table> {
        Table::VALIDATION_ORDER
            .into_iter()
            .find(|table| table.name() == name)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Declares one field of a table: its name, coercion and predicates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub coercion: Coercion,
    pub predicates: Vec<Predicate>,
}

impl FieldSpec {
    /// A plain text field with no predicates.
    pub fn text(name: &'static str) -> Self {
        Self::new(name, Coercion::Text)
    }

    /// An integer field.
    pub fn integer(name: &'static str) -> Self {
        Self::new(name, Coercion::Integer)
    }

    /// A `HH:MM:SS.s` time field.
    pub fn time(name: &'static str) -> Self {
        Self::new(name, Coercion::Time)
    }

    /// A boolean field.
    pub fn boolean(name: &'static str) -> Self {
        Self::new(name, Coercion::Boolean)
    }

    pub fn new(name: &'static str, coercion: Coercion) -> Self {
        Self {
            name,
            coercion,
            predicates: Vec::new(),
        }
    }

    /// Adds a predicate the coerced value must satisfy.
    pub fn must(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }
}

/// The declared shape of a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSchema {
    pub table: Table,
    pub fields: Vec<FieldSpec>,
    /// Field whose values form the table's identity, and the key space they
    /// are registered under once the table validates
    pub identity: Option<(&'static str, KeySpace)>,
}

impl TableSchema {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            fields: Vec::new(),
            identity: None,
        }
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Declares the identity field. Its values must be unique and are
    /// registered under `space` for later tables to reference.
    pub fn identity(mut self, field: &'static str, space: KeySpace) -> Self {
        self.identity = Some((field, space));
        self
    }

    /// Names of the declared fields, in declaration order.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|field| field.name).collect()
    }

    /// Key spaces referenced by any predicate of this schema.
    pub fn dependencies(&self) -> Vec<KeySpace> {
        let mut spaces: Vec<KeySpace> = self
            .fields
            .iter()
            .flat_map(|field| field.predicates.iter().flat_map(Predicate::key_spaces))
            .collect();
        spaces.dedup();
        spaces
    }

    /// Validates and coerces every row of the table.
    ///
    /// Each row must carry exactly the declared fields; each field must coerce
    /// and pass every predicate. The first failing row aborts validation. On
    /// success, identity keys are registered in `keys`.
    #[instrument(skip(self, rows, keys), fields(table = %self.table, rows = rows.len()))]
    pub fn validate(&self, rows: &[RawRow], keys: &mut KeyRegistry) -> Result<Vec<TypedRow>> {
        for space in self.dependencies() {
            if !keys.is_registered(space) {
                return Err(MarbleError::Configuration(format!(
                    "table '{}' references {space} keys that have not been validated yet",
                    self.table
                )));
            }
        }

        let mut typed_rows = Vec::with_capacity(rows.len());
        let mut seen_identities = HashSet::new();

        for (index, row) in rows.iter().enumerate() {
            let typed = self.validate_row(index, row, keys)?;

            if let Some((field, space)) = self.identity {
                let key = typed.text(field)?;
                if !seen_identities.insert(key.to_string()) {
                    return Err(MarbleError::schema_violation(
                        self.table.name(),
                        index,
                        field,
                        format!("duplicate {space} '{key}' (identity must be unique)"),
                    ));
                }
            }

            typed_rows.push(typed);
        }

        if let Some((_, space)) = self.identity {
            keys.register(space, seen_identities);
        }

        debug!(
            table = %self.table,
            rows = typed_rows.len(),
            "Table passed schema validation"
        );
        Ok(typed_rows)
    }

    fn validate_row(&self, index: usize, row: &RawRow, keys: &KeyRegistry) -> Result<TypedRow> {
        let table = self.table.name();

        if let Some(extra) = row
            .keys()
            .find(|key| !self.fields.iter().any(|field| field.name == key.as_str()))
        {
            return Err(MarbleError::schema_violation(
                table,
                index,
                extra.as_str(),
                "undeclared field",
            ));
        }

        let mut values = BTreeMap::new();
        for field in &self.fields {
            let raw = row.get(field.name).ok_or_else(|| {
                MarbleError::schema_violation(table, index, field.name, "missing required field")
            })?;

            let value = field
                .coercion
                .apply(raw)
                .map_err(|reason| MarbleError::format(table, index, field.name, reason))?;

            for predicate in &field.predicates {
                if !predicate.evaluate(&value, keys)? {
                    let reason = format!(
                        "value '{raw}' fails {}: expected a value that {}",
                        predicate.name(),
                        predicate.description()
                    );
                    return Err(match predicate.failure_kind() {
                        ErrorKind::Format => MarbleError::format(table, index, field.name, reason),
                        _ => MarbleError::schema_violation(table, index, field.name, reason),
                    });
                }
            }

            values.insert(field.name, value);
        }

        Ok(TypedRow {
            table: self.table,
            index,
            values,
        })
    }
}

/// A row whose fields have been coerced and checked against its schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypedRow {
    pub table: Table,
    /// Zero-based position of the row in its table
    pub index: usize,
    values: BTreeMap<&'static str, Value>,
}

impl TypedRow {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    pub fn text(&self, field: &str) -> Result<&str> {
        self.typed(field, Value::as_text, Coercion::Text)
    }

    pub fn integer(&self, field: &str) -> Result<i64> {
        self.typed(field, Value::as_integer, Coercion::Integer)
    }

    pub fn time(&self, field: &str) -> Result<f64> {
        self.typed(field, Value::as_time, Coercion::Time)
    }

    pub fn boolean(&self, field: &str) -> Result<bool> {
        self.typed(field, Value::as_bool, Coercion::Boolean)
    }

    fn typed<'a, T>(
        &'a self,
        field: &str,
        extract: impl FnOnce(&'a Value) -> Option<T>,
        expected: Coercion,
    ) -> Result<T> {
        self.values.get(field).and_then(extract).ok_or_else(|| {
            MarbleError::Internal(format!(
                "table '{}' row {} has no {expected} field '{field}'",
                self.table, self.index
            ))
        })
    }
}
