//! Record sources for marble datasets.
//!
//! A [`RecordSource`] yields, per [`Table`], the table's rows as ordered
//! field-name to raw-string mappings. Coercion and validation happen later in
//! the schema phase, so sources never interpret values.

use crate::error::{MarbleError, Result};
use crate::schema::Table;
use arrow::array::Array;
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use std::collections::BTreeMap;
use std::fmt::Debug;

mod csv;
mod memory;

pub use csv::{CsvOptions, CsvSource};
pub use memory::MemorySource;

/// One raw row: field name to unparsed value.
pub type RawRow = BTreeMap<String, String>;

/// A provider of raw table rows.
///
/// # Examples
///
/// ```rust
/// use marble_guard::schema::Table;
/// use marble_guard::sources::{MemorySource, RecordSource};
///
/// let mut source = MemorySource::new();
/// source.push_row(Table::Colors, [("Color", "Red"), ("Hex Code", "#FF0000")]);
///
/// let rows = source.load(Table::Colors).unwrap();
/// assert_eq!(rows[0]["Color"], "Red");
/// assert!(source.load(Table::Marbles).is_err());
/// ```
pub trait RecordSource: Debug + Send + Sync {
    /// Loads every row of `table` in source order.
    ///
    /// A table the source cannot provide is a data source error.
    fn load(&self, table: Table) -> Result<Vec<RawRow>>;

    /// Returns a human-readable description of this source.
    fn description(&self) -> String;
}

/// Converts a record batch into raw rows, rendering every cell as text.
///
/// Null cells become empty strings.
pub(crate) fn batch_to_rows(batch: &RecordBatch, source_type: &str) -> Result<Vec<RawRow>> {
    let schema = batch.schema();
    let options = FormatOptions::default();

    let formatters = batch
        .columns()
        .iter()
        .map(|column| ArrayFormatter::try_new(column.as_ref(), &options))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| {
            MarbleError::data_source_with_source(
                source_type,
                "Failed to render record batch columns",
                Box::new(e),
            )
        })?;

    let mut rows = Vec::with_capacity(batch.num_rows());
    for index in 0..batch.num_rows() {
        let mut row = RawRow::new();
        for ((field, column), formatter) in schema
            .fields()
            .iter()
            .zip(batch.columns())
            .zip(&formatters)
        {
            let value = if column.is_null(index) {
                String::new()
            } else {
                formatter.value(index).to_string()
            };
            row.insert(field.name().clone(), value);
        }
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;

    #[test]
    fn test_batch_to_rows_renders_text_and_nulls() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("Marble Name", DataType::Utf8, true),
            Field::new("Kills", DataType::Int64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec![Some("Alpha"), None])),
                Arc::new(Int64Array::from(vec![Some(3), Some(0)])),
            ],
        )
        .unwrap();

        let rows = batch_to_rows(&batch, "Memory").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Marble Name"], "Alpha");
        assert_eq!(rows[0]["Kills"], "3");
        assert_eq!(rows[1]["Marble Name"], "");
    }
}
