//! In-memory record source.

use super::{batch_to_rows, RawRow, RecordSource};
use crate::error::{MarbleError, Result};
use crate::schema::Table;
use arrow::record_batch::RecordBatch;
use std::collections::BTreeMap;

/// Rows held in memory, registered per table.
///
/// Only registered tables can be loaded; a table that was never registered is
/// a data source error rather than an empty table.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: BTreeMap<Table, Vec<RawRow>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// A source with every table registered and empty.
    pub fn with_all_tables() -> Self {
        Self {
            tables: Table::VALIDATION_ORDER
                .into_iter()
                .map(|table| (table, Vec::new()))
                .collect(),
        }
    }

    /// Registers `rows` for `table`, replacing any previous rows.
    pub fn with_rows(mut self, table: Table, rows: Vec<RawRow>) -> Self {
        self.tables.insert(table, rows);
        self
    }

    /// Appends one row to `table`, registering the table if needed.
    pub fn push_row<I, K, V>(&mut self, table: Table, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let row = fields
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        self.tables.entry(table).or_default().push(row);
        self
    }

    /// Registers the rows of an Arrow record batch for `table`.
    ///
    /// Every column is rendered as text, so the batch may use any Arrow type;
    /// nulls become empty strings.
    pub fn with_record_batch(mut self, table: Table, batch: &RecordBatch) -> Result<Self> {
        let rows = batch_to_rows(batch, "Memory")?;
        self.tables.insert(table, rows);
        Ok(self)
    }

    /// Creates a source holding a single table read from a record batch.
    pub fn from_record_batch(table: Table, batch: &RecordBatch) -> Result<Self> {
        Self::new().with_record_batch(table, batch)
    }

    pub fn is_registered(&self, table: Table) -> bool {
        self.tables.contains_key(&table)
    }
}

impl RecordSource for MemorySource {
    fn load(&self, table: Table) -> Result<Vec<RawRow>> {
        self.tables.get(&table).cloned().ok_or_else(|| {
            MarbleError::data_source("Memory", format!("table '{table}' was not registered"))
        })
    }

    fn description(&self) -> String {
        format!("in-memory source ({} tables)", self.tables.len())
    }
}
