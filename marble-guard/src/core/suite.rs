//! Validation suite for organizing and running dataset checks.

use super::check::{BoxedCheck, DatasetCheck};
use super::dataset::Dataset;
use super::result::{CheckSummary, ValidationReport};
use crate::constraints::{
    BattleOverlapConstraint, BattleRosterConstraint, ForeignKeyConstraint, LifecycleConstraint,
};
use crate::error::Result;
use crate::schema::Table;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument};

/// Name of the standard suite.
pub const STANDARD_SUITE_NAME: &str = "marble_dataset";

/// An ordered collection of checks run against one dataset.
///
/// Checks run in insertion order and the first violation aborts the run.
///
/// # Examples
///
/// ```rust
/// use marble_guard::core::ValidationSuite;
/// use marble_guard::constraints::BattleOverlapConstraint;
///
/// let suite = ValidationSuite::builder("schedule")
///     .description("Battle schedule only")
///     .check(BattleOverlapConstraint::new())
///     .build();
/// assert_eq!(suite.checks().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ValidationSuite {
    name: String,
    description: Option<String>,
    checks: Vec<Arc<dyn DatasetCheck>>,
}

impl ValidationSuite {
    /// Creates a new builder for constructing a validation suite.
    pub fn builder(name: impl Into<String>) -> ValidationSuiteBuilder {
        ValidationSuiteBuilder::new(name)
    }

    /// The four standard checks: foreign keys, battle overlap, battle roster,
    /// lifecycle.
    pub fn standard() -> Self {
        Self::standard_with_name(STANDARD_SUITE_NAME)
    }

    /// The standard checks under a custom suite name.
    pub fn standard_with_name(name: impl Into<String>) -> Self {
        Self::builder(name)
            .description("Referential integrity, battle schedule, battle rosters and marble lifecycles")
            .check(ForeignKeyConstraint::standard())
            .check(BattleOverlapConstraint::new())
            .check(BattleRosterConstraint::new())
            .check(LifecycleConstraint::new())
            .build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn checks(&self) -> &[Arc<dyn DatasetCheck>] {
        &self.checks
    }

    /// Runs every check against `dataset`.
    ///
    /// Returns a report when all checks pass, or the first violation.
    #[instrument(skip(self, dataset), fields(
        suite.name = %self.name,
        suite.checks = self.checks.len()
    ))]
    pub fn run(&self, dataset: &Dataset) -> Result<ValidationReport> {
        info!(
            suite.name = %self.name,
            suite.checks = self.checks.len(),
            dataset.rows = dataset.total_rows(),
            "Starting validation suite"
        );
        let start_time = Instant::now();

        let mut report = ValidationReport::new(&self.name);
        for table in Table::VALIDATION_ORDER {
            report
                .table_rows
                .insert(table.name().to_string(), dataset.row_count(table));
        }

        for check in &self.checks {
            let check_start = Instant::now();
            let result = match check.evaluate(dataset) {
                Ok(result) => result,
                Err(err) => {
                    error!(
                        suite.name = %self.name,
                        check.name = check.name(),
                        error.kind = %err.kind(),
                        error = %err,
                        "Validation suite aborted"
                    );
                    return Err(err);
                }
            };

            let duration_ms = check_start.elapsed().as_millis() as u64;
            debug!(
                check.name = check.name(),
                check.items = result.items_checked,
                check.duration_ms = duration_ms,
                "Check passed"
            );
            let metadata = check.metadata();
            report.add_check(CheckSummary {
                name: check.name().to_string(),
                description: check.description().map(str::to_string),
                tables: metadata.table_names(),
                custom: metadata.custom,
                items_checked: result.items_checked,
                message: result.message,
                duration_ms,
            });
        }

        report.metrics.tables_validated = Table::VALIDATION_ORDER.len();
        report.metrics.total_rows = dataset.total_rows();
        report.metrics.checks_run = report.checks.len();
        report.metrics.execution_time_ms = start_time.elapsed().as_millis() as u64;

        info!(
            suite.name = %self.name,
            metrics.checks = report.metrics.checks_run,
            metrics.rows = report.metrics.total_rows,
            metrics.duration_ms = report.metrics.execution_time_ms,
            suite.result = "passed",
            "Validation suite completed"
        );
        Ok(report)
    }
}

impl Default for ValidationSuite {
    fn default() -> Self {
        Self::standard()
    }
}

/// Builder for constructing `ValidationSuite` instances.
#[derive(Debug)]
pub struct ValidationSuiteBuilder {
    name: String,
    description: Option<String>,
    checks: Vec<Arc<dyn DatasetCheck>>,
}

impl ValidationSuiteBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            checks: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Appends a check; checks run in the order they are added.
    pub fn check(mut self, check: impl DatasetCheck + 'static) -> Self {
        self.checks.push(Arc::new(check));
        self
    }

    /// Appends already boxed checks.
    pub fn checks<I>(mut self, checks: I) -> Self
    where
        I: IntoIterator<Item = BoxedCheck>,
    {
        self.checks.extend(checks.into_iter().map(Arc::from));
        self
    }

    pub fn build(self) -> ValidationSuite {
        ValidationSuite {
            name: self.name,
            description: self.description,
            checks: self.checks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CheckResult, DatasetCheck};
    use crate::error::{ErrorKind, MarbleError};
    use crate::test_fixtures::DatasetFixture;

    #[derive(Debug)]
    struct AlwaysFails;

    impl DatasetCheck for AlwaysFails {
        fn evaluate(&self, _dataset: &Dataset) -> Result<CheckResult> {
            Err(MarbleError::OverlapViolation {
                first: "B1".to_string(),
                second: "B2".to_string(),
                first_end: 10.0,
                second_begin: 5.0,
            })
        }

        fn name(&self) -> &str {
            "always_fails"
        }
    }

    #[derive(Debug)]
    struct Counter(usize);

    impl DatasetCheck for Counter {
        fn evaluate(&self, _dataset: &Dataset) -> Result<CheckResult> {
            Ok(CheckResult::passed(self.0))
        }

        fn name(&self) -> &str {
            "counter"
        }
    }

    #[test]
    fn test_standard_suite_order() {
        let suite = ValidationSuite::standard();
        let names: Vec<&str> = suite.checks().iter().map(|check| check.name()).collect();
        assert_eq!(
            names,
            vec!["foreign_key", "battle_overlap", "battle_roster", "lifecycle"]
        );
    }

    #[test]
    fn test_standard_suite_passes_tournament() {
        let dataset = DatasetFixture::tournament().dataset().unwrap();
        let report = ValidationSuite::standard().run(&dataset).unwrap();

        assert_eq!(report.suite_name, STANDARD_SUITE_NAME);
        assert_eq!(report.checks.len(), 4);
        assert_eq!(report.metrics.checks_run, 4);
        assert_eq!(report.metrics.tables_validated, 8);
        assert_eq!(report.table_rows["marbles"], 4);
        assert_eq!(report.check("lifecycle").unwrap().items_checked, 4);
    }

    #[test]
    fn test_report_carries_check_metadata() {
        let dataset = DatasetFixture::tournament().dataset().unwrap();
        let report = ValidationSuite::standard().run(&dataset).unwrap();

        let overlap = report.check("battle_overlap").unwrap();
        assert_eq!(overlap.tables, vec!["battles"]);
        assert!(overlap.custom.is_empty());

        let foreign_key = report.check("foreign_key").unwrap();
        assert!(foreign_key.tables.contains(&"battle-marbles".to_string()));
        let references = ForeignKeyConstraint::standard().references().len().to_string();
        assert_eq!(foreign_key.custom.get("references"), Some(&references));

        let lifecycle = report.check("lifecycle").unwrap();
        assert_eq!(lifecycle.tables.first().map(String::as_str), Some("marbles"));
    }

    #[test]
    fn test_first_violation_aborts() {
        let dataset = DatasetFixture::tournament().dataset().unwrap();
        let suite = ValidationSuite::builder("custom")
            .check(AlwaysFails)
            .check(Counter(3))
            .build();

        let err = suite.run(&dataset).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Overlap);
    }

    #[test]
    fn test_boxed_checks() {
        let dataset = DatasetFixture::tournament().dataset().unwrap();
        let boxed: Vec<BoxedCheck> = vec![Box::new(Counter(2)), Box::new(Counter(5))];
        let report = ValidationSuite::builder("boxed")
            .checks(boxed)
            .build()
            .run(&dataset)
            .unwrap();

        let items: Vec<usize> = report.checks.iter().map(|c| c.items_checked).collect();
        assert_eq!(items, vec![2, 5]);
    }
}
