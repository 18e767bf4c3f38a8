//! Battle participants must belong to a registered color.

use crate::core::{CheckMetadata, CheckResult, Dataset, DatasetCheck};
use crate::error::{MarbleError, Result};
use crate::schema::Table;
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument, warn};

/// Checks that every marble fighting in a battle has one of the colors
/// declared for that battle in `battle-colors`.
///
/// Battles are checked in file order and participants in row order, so the
/// reported violation is the first one in that order.
#[derive(Debug, Clone, Default)]
pub struct BattleRosterConstraint;

impl BattleRosterConstraint {
    pub fn new() -> Self {
        Self
    }
}

impl DatasetCheck for BattleRosterConstraint {
    #[instrument(skip(self, dataset), fields(check = "battle_roster"))]
    fn evaluate(&self, dataset: &Dataset) -> Result<CheckResult> {
        let mut colors: HashMap<&str, HashSet<&str>> = HashMap::new();
        for entry in dataset.battle_colors() {
            colors
                .entry(entry.battle.as_str())
                .or_default()
                .insert(entry.color.as_str());
        }

        let mut participants: HashMap<&str, Vec<&str>> = HashMap::new();
        for entry in dataset.battle_marbles() {
            participants
                .entry(entry.battle.as_str())
                .or_default()
                .push(entry.marble.as_str());
        }

        let no_colors = HashSet::new();
        let mut checked = 0;

        for battle in dataset.battles() {
            let allowed = colors.get(battle.id.as_str()).unwrap_or(&no_colors);
            let Some(marbles) = participants.get(battle.id.as_str()) else {
                continue;
            };

            for &name in marbles {
                let marble = dataset.marbles().get(name).ok_or_else(|| {
                    MarbleError::Internal(format!(
                        "participant '{name}' of battle '{}' is missing from the dataset",
                        battle.id
                    ))
                })?;

                if !allowed.contains(marble.color.as_str()) {
                    warn!(
                        battle = %battle.id,
                        marble = name,
                        color = %marble.color,
                        "Marble color not registered for battle"
                    );
                    return Err(MarbleError::RosterViolation {
                        battle: battle.id.clone(),
                        marble: name.to_string(),
                        color: marble.color.clone(),
                    });
                }
                checked += 1;
            }

            debug!(battle = %battle.id, participants = marbles.len(), "Roster valid");
        }

        Ok(CheckResult::passed(checked))
    }

    fn name(&self) -> &str {
        "battle_roster"
    }

    fn description(&self) -> Option<&str> {
        Some("Every battle participant has a color registered for the battle")
    }

    fn metadata(&self) -> CheckMetadata {
        CheckMetadata::for_tables([
            Table::Marbles,
            Table::Battles,
            Table::BattleColors,
            Table::BattleMarbles,
        ])
    }
}
