//! Battles must not overlap in time.

use crate::core::{Battle, CheckMetadata, CheckResult, Dataset, DatasetCheck};
use crate::error::{MarbleError, Result};
use crate::schema::Table;
use tracing::{debug, instrument, warn};

/// Checks that battles, ordered by begin time, each end strictly before the
/// next one begins.
///
/// This is a global check over the `battles` table, not a per-marble one.
#[derive(Debug, Clone, Default)]
pub struct BattleOverlapConstraint;

impl BattleOverlapConstraint {
    pub fn new() -> Self {
        Self
    }
}

/// Checks a set of battle intervals, returning the number of adjacent pairs
/// compared.
///
/// Battles are stably sorted by begin time, so battles sharing a begin time
/// keep their input order. Each adjacent pair needs `first.end < second.begin`.
///
/// ```rust
/// use marble_guard::constraints::check_battle_intervals;
/// use marble_guard::core::Battle;
///
/// let battle = |id: &str, begin: f64, end: f64| Battle { id: id.to_string(), begin, end };
///
/// assert!(check_battle_intervals(&[battle("B1", 0.0, 10.0), battle("B2", 20.0, 30.0)]).is_ok());
/// assert!(check_battle_intervals(&[battle("B1", 0.0, 10.0), battle("B2", 5.0, 15.0)]).is_err());
/// ```
pub fn check_battle_intervals(battles: &[Battle]) -> Result<usize> {
    let mut ordered: Vec<&Battle> = battles.iter().collect();
    ordered.sort_by(|a, b| a.begin.total_cmp(&b.begin));

    for pair in ordered.windows(2) {
        let (first, second) = (pair[0], pair[1]);
        if first.end >= second.begin {
            warn!(
                first = %first.id,
                second = %second.id,
                "Battles overlap"
            );
            return Err(MarbleError::OverlapViolation {
                first: first.id.clone(),
                second: second.id.clone(),
                first_end: first.end,
                second_begin: second.begin,
            });
        }
    }

    Ok(ordered.len().saturating_sub(1))
}

impl DatasetCheck for BattleOverlapConstraint {
    #[instrument(skip(self, dataset), fields(check = "battle_overlap"))]
    fn evaluate(&self, dataset: &Dataset) -> Result<CheckResult> {
        let pairs = check_battle_intervals(dataset.battles().as_slice())?;
        debug!(battles = dataset.battles().len(), pairs, "Battle intervals are disjoint");
        Ok(CheckResult::passed(pairs))
    }

    fn name(&self) -> &str {
        "battle_overlap"
    }

    fn description(&self) -> Option<&str> {
        Some("No two battles overlap in time")
    }

    fn metadata(&self) -> CheckMetadata {
        CheckMetadata::for_tables([Table::Battles])
    }
}
