//! Assembly of per-marble event streams from the event tables.

use super::event::{LifecycleEvent, TimedEvent};
use crate::core::Dataset;
use crate::error::{MarbleError, Result};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Time-ordered event streams of every marble that has at least one event.
///
/// Events are appended per marble in group order begin, level, end, battle
/// entry, battle exit (row order within a group) and then stably sorted by
/// time, so events sharing a timestamp keep that group order.
#[derive(Debug, Clone, Default)]
pub struct EventStreams {
    streams: HashMap<String, Vec<TimedEvent>>,
}

impl EventStreams {
    /// Builds every marble's stream in a single pass over the tables.
    #[instrument(skip(dataset))]
    pub fn build(dataset: &Dataset) -> Result<Self> {
        let streams = collect(dataset, |_| true)?;
        debug!(marbles = streams.len(), "Assembled event streams");
        Ok(Self { streams })
    }

    /// Events of one marble in replay order; empty if it has none.
    pub fn for_marble(&self, marble: &str) -> &[TimedEvent] {
        self.streams.get(marble).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of marbles with at least one event.
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Total number of events across all streams.
    pub fn event_count(&self) -> usize {
        self.streams.values().map(Vec::len).sum()
    }
}

/// Assembles the stream of a single marble without building the others.
pub fn assemble(dataset: &Dataset, marble: &str) -> Result<Vec<TimedEvent>> {
    let mut streams = collect(dataset, |name| name == marble)?;
    Ok(streams.remove(marble).unwrap_or_default())
}

// Appends the events of every marble accepted by `keep` in group order, then
// sorts each stream by time.
fn collect<F>(dataset: &Dataset, keep: F) -> Result<HashMap<String, Vec<TimedEvent>>>
where
    F: Fn(&str) -> bool,
{
    let mut streams: HashMap<String, Vec<TimedEvent>> = HashMap::new();
    let mut push = |marble: &str, event: TimedEvent| {
        streams.entry(marble.to_string()).or_default().push(event);
    };

    for record in dataset.begins().iter().filter(|r| keep(&r.marble)) {
        push(&record.marble, TimedEvent::new(record.time, record.into()));
    }
    for record in dataset.levels().iter().filter(|r| keep(&r.marble)) {
        push(&record.marble, TimedEvent::new(record.time, record.into()));
    }
    for record in dataset.ends().iter().filter(|r| keep(&r.marble)) {
        push(&record.marble, TimedEvent::new(record.time, record.into()));
    }

    let battles = dataset.battles();
    let mut participations = Vec::new();
    for entry in dataset.battle_marbles().iter().filter(|e| keep(&e.marble)) {
        let battle = battles.get(&entry.battle).ok_or_else(|| {
            MarbleError::Internal(format!(
                "battle '{}' of marble '{}' is missing from the dataset",
                entry.battle, entry.marble
            ))
        })?;
        participations.push((entry, battle));
    }
    for (entry, battle) in &participations {
        push(
            &entry.marble,
            TimedEvent::new(
                battle.begin,
                LifecycleEvent::BeginBattle {
                    battle: battle.id.clone(),
                },
            ),
        );
    }
    for (entry, battle) in &participations {
        push(
            &entry.marble,
            TimedEvent::new(
                battle.end,
                LifecycleEvent::EndBattle {
                    battle: battle.id.clone(),
                },
            ),
        );
    }

    for events in streams.values_mut() {
        sort_by_time(events);
    }
    Ok(streams)
}

// `sort_by` is stable; ties keep append order.
fn sort_by_time(events: &mut [TimedEvent]) {
    events.sort_by(|a, b| a.time.total_cmp(&b.time));
}
