//! CSV directory source backed by the Arrow CSV reader.

use super::{batch_to_rows, RawRow, RecordSource};
use crate::error::{MarbleError, Result};
use crate::schema::Table;
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::{DataType, Field, Schema};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Seek;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Options for reading CSV tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    /// Field delimiter
    pub delimiter: u8,
    /// Quote character
    pub quote: u8,
    /// Extension appended to the table name, without the dot
    pub extension: String,
    /// Per-table file names that replace `<table>.<extension>`
    pub file_names: BTreeMap<Table, String>,
    /// Number of rows per Arrow batch
    pub batch_size: usize,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            extension: "csv".to_string(),
            file_names: BTreeMap::new(),
            batch_size: 8192,
        }
    }
}

impl CsvOptions {
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Reads `table` from `file_name` instead of the default file name.
    pub fn with_file_name(mut self, table: Table, file_name: impl Into<String>) -> Self {
        self.file_names.insert(table, file_name.into());
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// File name a table is read from.
    pub fn file_name(&self, table: Table) -> String {
        self.file_names
            .get(&table)
            .cloned()
            .unwrap_or_else(|| format!("{}.{}", table.name(), self.extension))
    }
}

/// Reads each table from a CSV file in one directory.
///
/// The header line names the fields. Every column is read as text so that
/// coercion stays with the schema phase; empty cells become empty strings.
///
/// # Examples
///
/// ```rust,no_run
/// use marble_guard::schema::Table;
/// use marble_guard::sources::{CsvSource, RecordSource};
///
/// let source = CsvSource::new("data");
/// let colors = source.load(Table::Colors)?;
/// # Ok::<(), marble_guard::error::MarbleError>(())
/// ```
#[derive(Debug, Clone)]
pub struct CsvSource {
    directory: PathBuf,
    options: CsvOptions,
}

impl CsvSource {
    /// Creates a source reading `<directory>/<table>.csv`.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self::with_options(directory, CsvOptions::default())
    }

    pub fn with_options(directory: impl Into<PathBuf>, options: CsvOptions) -> Self {
        Self {
            directory: directory.into(),
            options,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn options(&self) -> &CsvOptions {
        &self.options
    }

    /// Path a table is read from.
    pub fn path_for(&self, table: Table) -> PathBuf {
        self.directory.join(self.options.file_name(table))
    }

    fn format(&self) -> Format {
        Format::default()
            .with_header(true)
            .with_delimiter(self.options.delimiter)
            .with_quote(self.options.quote)
    }

    fn read_file(&self, path: &Path) -> Result<Vec<RawRow>> {
        let mut file = File::open(path).map_err(|e| {
            MarbleError::data_source_with_source(
                "CSV",
                format!("Failed to open '{}'", path.display()),
                Box::new(e),
            )
        })?;

        // Only the header is needed; every column is then read as text.
        let (inferred, _) = self.format().infer_schema(&mut file, Some(0))?;
        let schema = Arc::new(Schema::new(
            inferred
                .fields()
                .iter()
                .map(|field| Field::new(field.name(), DataType::Utf8, true))
                .collect::<Vec<_>>(),
        ));
        file.rewind()?;

        let reader = ReaderBuilder::new(schema)
            .with_format(self.format())
            .with_batch_size(self.options.batch_size)
            .build(file)?;

        let mut rows = Vec::new();
        for batch in reader {
            let batch = batch.map_err(|e| {
                MarbleError::data_source_with_source(
                    "CSV",
                    format!("Failed to read '{}'", path.display()),
                    Box::new(e),
                )
            })?;
            rows.extend(batch_to_rows(&batch, "CSV")?);
        }
        Ok(rows)
    }
}

impl RecordSource for CsvSource {
    #[instrument(skip(self), fields(path = %self.path_for(table).display()))]
    fn load(&self, table: Table) -> Result<Vec<RawRow>> {
        let path = self.path_for(table);
        let rows = self.read_file(&path)?;
        debug!(table = %table, rows = rows.len(), "Read CSV table");
        Ok(rows)
    }

    fn description(&self) -> String {
        format!("CSV directory '{}'", self.directory.display())
    }
}
