//! The end-to-end validation entry point.

use super::config::ValidatorConfig;
use super::dataset::Dataset;
use super::result::ValidationReport;
use super::suite::ValidationSuite;
use crate::error::Result;
use crate::logging::truncate_field;
use crate::schema::SchemaCatalog;
use crate::sources::{CsvSource, RecordSource};
use crate::{log_check, log_data_op, perf_debug};
use std::path::Path;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Runs the schema phase and then the check suite over a record source.
///
/// # Examples
///
/// ```rust
/// use marble_guard::core::{DatasetValidator, ValidatorConfig};
/// use marble_guard::sources::MemorySource;
///
/// let validator = DatasetValidator::new(ValidatorConfig::default());
///
/// // Every table registered, all empty: trivially valid.
/// let report = validator.validate(&MemorySource::with_all_tables()).unwrap();
/// assert_eq!(report.metrics.total_rows, 0);
/// ```
#[derive(Debug, Clone)]
pub struct DatasetValidator {
    config: ValidatorConfig,
    catalog: SchemaCatalog,
    suite: ValidationSuite,
}

impl DatasetValidator {
    /// A validator running the standard catalog and suite.
    pub fn new(config: ValidatorConfig) -> Self {
        let suite = ValidationSuite::standard_with_name(config.suite_name.as_str());
        Self {
            config,
            catalog: SchemaCatalog::standard(),
            suite,
        }
    }

    /// Replaces the check suite.
    pub fn with_suite(mut self, suite: ValidationSuite) -> Self {
        self.suite = suite;
        self
    }

    /// Replaces the schema catalog.
    pub fn with_catalog(mut self, catalog: SchemaCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    pub fn suite(&self) -> &ValidationSuite {
        &self.suite
    }

    /// Loads every table from `source` and runs the schema phase.
    #[instrument(skip(self, source), fields(source = %source.description()))]
    pub fn load_dataset(&self, source: &dyn RecordSource) -> Result<Dataset> {
        log_data_op!(
            self.config.logging,
            source = %source.description(),
            "Loading marble dataset"
        );
        let start = Instant::now();

        let dataset = Dataset::load(source, &self.catalog)?;

        log_data_op!(
            self.config.logging,
            rows = dataset.total_rows(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Dataset passed schema validation"
        );
        Ok(dataset)
    }

    /// Validates an already loaded dataset with the suite.
    pub fn validate_dataset(&self, dataset: &Dataset) -> Result<ValidationReport> {
        let report = self.suite.run(dataset)?;

        for check in &report.checks {
            log_check!(
                self.config.logging,
                check = %check.name,
                items = check.items_checked,
                duration_ms = check.duration_ms,
                "Check summary"
            );
        }
        if self.config.logging.log_metrics {
            info!(
                metrics.tables = report.metrics.tables_validated,
                metrics.rows = report.metrics.total_rows,
                metrics.checks = report.metrics.checks_run,
                metrics.duration_ms = report.metrics.execution_time_ms,
                "Validation metrics"
            );
        }
        Ok(report)
    }

    /// Loads and validates the dataset provided by `source`.
    ///
    /// Returns the report of a valid dataset, or the first violation found.
    #[instrument(skip(self, source), fields(suite = %self.suite.name()))]
    pub fn validate(&self, source: &dyn RecordSource) -> Result<ValidationReport> {
        let outcome = self
            .load_dataset(source)
            .and_then(|dataset| self.validate_dataset(&dataset))
            .map(|report| report.with_source(source.description()));

        if let Err(ref err) = outcome {
            warn!(
                error.kind = %err.kind(),
                error = %truncate_field(&err.to_string(), self.config.logging.max_field_length),
                "Dataset is invalid"
            );
        } else {
            perf_debug!(self.config.logging, "Dataset is valid");
        }
        outcome
    }

    /// Validates the CSV tables in `directory` using the configured CSV options.
    pub fn validate_dir(&self, directory: impl AsRef<Path>) -> Result<ValidationReport> {
        let source = CsvSource::with_options(directory.as_ref(), self.config.csv.clone());
        self.validate(&source)
    }
}

impl Default for DatasetValidator {
    fn default() -> Self {
        Self::new(ValidatorConfig::default())
    }
}
