//! Prelude for commonly used types and traits in marble-guard.

pub use crate::core::{
    Dataset, DatasetCheck, DatasetValidator, ValidationReport, ValidationSuite, ValidatorConfig,
};
pub use crate::error::{ErrorKind, MarbleError, Result};
pub use crate::formatters::{FormatterConfig, HumanFormatter, JsonFormatter, ResultFormatter};
pub use crate::logging::LogConfig;
pub use crate::schema::{SchemaCatalog, Table};
pub use crate::sources::{CsvOptions, CsvSource, MemorySource, RecordSource};
