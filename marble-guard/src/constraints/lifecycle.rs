//! Per-marble lifecycle replay and final level check.

use crate::core::{CheckMetadata, CheckResult, Dataset, DatasetCheck};
use crate::error::Result;
use crate::lifecycle::{EventStreams, LifecycleMachine};
use crate::schema::Table;
use tracing::{debug, instrument, warn};

/// Replays every marble's event stream through the lifecycle state machine
/// and compares the replayed level with the declared final level.
///
/// Marbles are replayed in file order; a marble with no events at all fails
/// the final level comparison because it was never born.
#[derive(Debug, Clone, Default)]
pub struct LifecycleConstraint;

impl LifecycleConstraint {
    pub fn new() -> Self {
        Self
    }
}

impl DatasetCheck for LifecycleConstraint {
    #[instrument(skip(self, dataset), fields(check = "lifecycle"))]
    fn evaluate(&self, dataset: &Dataset) -> Result<CheckResult> {
        let streams = EventStreams::build(dataset)?;

        for marble in dataset.marbles() {
            let events = streams.for_marble(&marble.name);
            let mut machine = LifecycleMachine::new(marble.name.as_str());

            let outcome = machine
                .replay(events)
                .and_then(|()| machine.finish(marble.final_level));
            if let Err(err) = outcome {
                warn!(marble = %marble.name, error = %err, "Lifecycle replay failed");
                return Err(err);
            }

            debug!(
                marble = %marble.name,
                events = events.len(),
                state = %machine.state(),
                "Lifecycle replayed"
            );
        }

        Ok(CheckResult::passed(dataset.marbles().len())
            .with_message(format!("{} events replayed", streams.event_count())))
    }

    fn name(&self) -> &str {
        "lifecycle"
    }

    fn description(&self) -> Option<&str> {
        Some("Every marble's events form a legal lifecycle ending at its declared final level")
    }

    fn metadata(&self) -> CheckMetadata {
        CheckMetadata::for_tables([
            Table::Marbles,
            Table::Begin,
            Table::Level,
            Table::End,
            Table::Battles,
            Table::BattleMarbles,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MarbleError;
    use crate::lifecycle::LifecycleState;
    use crate::test_fixtures::DatasetFixture;

    fn solo() -> DatasetFixture {
        let mut fixture = DatasetFixture::empty();
        fixture
            .color("Red", "#FF0000")
            .battle("B1", "00:10:00.0", "00:15:00.0")
            .battle_color("B1", "Red", true);
        fixture
    }

    #[test]
    fn test_standard_dataset_replays() {
        let dataset = DatasetFixture::tournament().dataset().unwrap();
        let result = LifecycleConstraint::new().evaluate(&dataset).unwrap();
        assert_eq!(result.items_checked, 4);
        assert!(result.message.unwrap().ends_with("events replayed"));
    }

    #[test]
    fn test_born_and_survived_with_wrong_final_level() {
        let mut fixture = solo();
        fixture
            .marble("Alpha", "Red", 2)
            .begin("00:01:00.0", "Alpha", "-", 1, "Born")
            .end("00:05:00.0", "Alpha", "-", 1, "Survive");
        let dataset = fixture.dataset().unwrap();

        let err = LifecycleConstraint::new().evaluate(&dataset).unwrap_err();
        assert!(matches!(
            err,
            MarbleError::FinalLevelViolation {
                expected: 2,
                actual: Some(1),
                ..
            }
        ));
    }

    #[test]
    fn test_level_jump_in_battle() {
        let mut fixture = solo();
        fixture
            .marble("Alpha", "Red", 3)
            .battle_marble("B1", "Alpha")
            .begin("00:01:00.0", "Alpha", "-", 1, "Born")
            .level("00:12:00.0", "Alpha", 3);
        let dataset = fixture.dataset().unwrap();

        let err = LifecycleConstraint::new().evaluate(&dataset).unwrap_err();
        assert!(matches!(
            err,
            MarbleError::LifecycleViolation {
                state: LifecycleState::InBattle,
                ..
            }
        ));
    }

    #[test]
    fn test_event_after_survival() {
        let mut fixture = solo();
        fixture
            .marble("Alpha", "Red", 1)
            .battle_marble("B1", "Alpha")
            .begin("00:01:00.0", "Alpha", "-", 1, "Born")
            .end("00:05:00.0", "Alpha", "-", 1, "Survive");
        let dataset = fixture.dataset().unwrap();

        match LifecycleConstraint::new().evaluate(&dataset).unwrap_err() {
            MarbleError::LifecycleViolation { state, reason, .. } => {
                assert_eq!(state, LifecycleState::Done);
                assert!(reason.contains("done"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_marble_without_events_was_never_born() {
        let mut fixture = solo();
        fixture.marble("Ghost", "Red", 0);
        let dataset = fixture.dataset().unwrap();

        let err = LifecycleConstraint::new().evaluate(&dataset).unwrap_err();
        assert!(matches!(
            err,
            MarbleError::FinalLevelViolation { actual: None, .. }
        ));
    }

    #[test]
    fn test_death_outside_battle_location() {
        let mut fixture = solo();
        fixture
            .marble("Alpha", "Red", 1)
            .battle_marble("B1", "Alpha")
            .begin("00:01:00.0", "Alpha", "-", 1, "Born")
            .end("00:12:00.0", "Alpha", "-", 1, "Death");
        let dataset = fixture.dataset().unwrap();

        let err = LifecycleConstraint::new().evaluate(&dataset).unwrap_err();
        assert!(err.to_string().contains("death must happen in battle"));
    }
}
