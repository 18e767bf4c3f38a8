//! Core types of a validation run.
//!
//! ## Key Components
//!
//! - **[`Dataset`]**: the eight tables after the schema phase, typed and read-only
//! - **[`DatasetCheck`]**: a whole-dataset check run after the schema phase
//! - **[`ValidationSuite`]**: an ordered collection of checks
//! - **[`DatasetValidator`]**: source, schema phase, dataset and suite in one call
//! - **[`ValidationReport`]**: what a passed run reports
//!
//! ## Example
//!
//! ```rust,no_run
//! use marble_guard::core::{DatasetValidator, ValidatorConfig};
//!
//! let validator = DatasetValidator::new(ValidatorConfig::default());
//! match validator.validate_dir("data") {
//!     Ok(report) => println!("{} rows valid", report.metrics.total_rows),
//!     Err(violation) => eprintln!("{violation}"),
//! }
//! ```

mod check;
mod config;
mod dataset;
mod records;
mod result;
mod suite;
mod validator;

pub use check::{BoxedCheck, CheckMetadata, CheckResult, DatasetCheck};
pub use config::ValidatorConfig;
pub use dataset::{Dataset, DatasetParts, Keyed, KeyedTable};
pub use records::{
    Battle, BattleColor, BattleMarble, BeginKind, BeginRecord, Color, EndKind, EndRecord,
    LevelRecord, Location, Marble,
};
pub use result::{CheckSummary, ValidationMetrics, ValidationReport};
pub use suite::{ValidationSuite, ValidationSuiteBuilder, STANDARD_SUITE_NAME};
pub use validator::DatasetValidator;
