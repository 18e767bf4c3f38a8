//! # Marble Guard - Consistency Validation for Marble Tournament Datasets
//!
//! Marble Guard checks that a marble tournament dataset is internally
//! consistent before anyone builds statistics on top of it. A dataset is eight
//! tables: colors, marbles, begin, level, end, battles, battle colors and
//! battle marbles.
//!
//! ## Overview
//!
//! A run has two phases:
//!
//! 1. **Schema phase.** Each table is loaded and validated in a fixed order.
//!    Every field is coerced to its declared type and must satisfy its
//!    declared predicates, including membership in the identity sets of the
//!    tables loaded before it.
//! 2. **Check phase.** The typed dataset is handed to a
//!    [`ValidationSuite`](core::ValidationSuite): referential integrity,
//!    non-overlapping battles, battle rosters and a replay of every marble's
//!    lifecycle through a state machine.
//!
//! The first violation ends the run and is returned as a [`MarbleError`](error::MarbleError).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use marble_guard::formatters::{HumanFormatter, ResultFormatter};
//!
//! # fn example() -> marble_guard::error::Result<()> {
//! let formatter = HumanFormatter::new();
//! match marble_guard::validate_dir("data/season_1") {
//!     Ok(report) => print!("{}", formatter.format(&report)?),
//!     Err(violation) => eprint!("{}", formatter.format_failure(&violation)?),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Data Sources
//!
//! Tables are read through the [`RecordSource`](sources::RecordSource) trait.
//! [`CsvSource`](sources::CsvSource) reads one CSV file per table from a
//! directory and [`MemorySource`](sources::MemorySource) holds rows built in
//! code or taken from Arrow record batches.
//!
//! ## Logging
//!
//! Marble Guard logs through `tracing`. Install a subscriber with
//! [`logging::setup::init_logging`] or bring your own.

pub mod constraints;
pub mod core;
pub mod error;
pub mod formatters;
pub mod lifecycle;
pub mod logging;
pub mod prelude;
pub mod schema;
pub mod sources;
pub mod time;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_fixtures;

use crate::core::{DatasetValidator, ValidationReport};
use crate::error::Result;
use std::path::Path;

/// Validates the CSV dataset in `directory` with the default configuration.
///
/// Returns the report of a valid dataset, or the first violation.
pub fn validate_dir(directory: impl AsRef<Path>) -> Result<ValidationReport> {
    DatasetValidator::default().validate_dir(directory)
}
