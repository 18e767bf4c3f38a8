//! Declarative table schemas and row-level validation.
//!
//! Every table is described by a [`TableSchema`]: a list of [`FieldSpec`]s,
//! each with a [`Coercion`] from the raw string and a list of named
//! [`Predicate`]s over the coerced [`Value`]. Validation of a table turns raw
//! rows into [`TypedRow`]s or fails on the first offending field.
//!
//! Predicates that reference another table (for example "is a known marble")
//! read from a [`KeyRegistry`] that is filled as identity tables validate.
//! This fixes the validation order:
//!
//! ```text
//! colors ─► marbles ─► begin, level, end, battles ─► battle-colors, battle-marbles
//! ```
//!
//! ## Example
//!
//! ```rust
//! use marble_guard::schema::{KeyRegistry, SchemaCatalog, Table};
//! use marble_guard::sources::RawRow;
//!
//! let catalog = SchemaCatalog::standard();
//! let mut keys = KeyRegistry::new();
//!
//! let mut red = RawRow::new();
//! red.insert("Color".to_string(), "Red".to_string());
//! red.insert("Hex Code".to_string(), "#FF0000".to_string());
//!
//! let rows = catalog.validate_table(Table::Colors, &[red], &mut keys).unwrap();
//! assert_eq!(rows[0].text("Hex Code").unwrap(), "#FF0000");
//! ```

mod catalog;
mod predicate;
mod table;
mod value;

pub use catalog::{
    columns, SchemaCatalog, BATTLE_LOCATION, BEGIN_KINDS, END_KINDS, NO_LOCATION,
};
pub use predicate::{is_hex_code, KeyRegistry, KeySpace, Predicate};
pub use table::{FieldSpec, Table, TableSchema, TypedRow};
pub use value::{Coercion, Value};
