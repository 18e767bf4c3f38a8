//! Lifecycle events of a single marble.

use crate::core::{BeginKind, BeginRecord, EndKind, EndRecord, LevelRecord, Location};
use crate::time::format_time;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payload-free discriminant of a [`LifecycleEvent`], used by the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Born,
    Summon,
    Revive,
    Level,
    Death,
    Survive,
    BeginBattle,
    EndBattle,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Born => "Born",
            EventKind::Summon => "Summon",
            EventKind::Revive => "Revive",
            EventKind::Level => "Level",
            EventKind::Death => "Death",
            EventKind::Survive => "Survive",
            EventKind::BeginBattle => "Begin Battle",
            EventKind::EndBattle => "End Battle",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Something that happened to a marble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    Born { level: i64, location: Location },
    Summon { level: i64, location: Location },
    Revive { level: i64, location: Location },
    Level { level: i64 },
    Death { level: i64, location: Location },
    Survive { level: i64, location: Location },
    /// The marble entered a battle it is registered for
    BeginBattle { battle: String },
    /// A battle the marble is registered for closed
    EndBattle { battle: String },
}

impl LifecycleEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            LifecycleEvent::Born { .. } => EventKind::Born,
            LifecycleEvent::Summon { .. } => EventKind::Summon,
            LifecycleEvent::Revive { .. } => EventKind::Revive,
            LifecycleEvent::Level { .. } => EventKind::Level,
            LifecycleEvent::Death { .. } => EventKind::Death,
            LifecycleEvent::Survive { .. } => EventKind::Survive,
            LifecycleEvent::BeginBattle { .. } => EventKind::BeginBattle,
            LifecycleEvent::EndBattle { .. } => EventKind::EndBattle,
        }
    }

    /// Level carried by the event, if any.
    pub fn level(&self) -> Option<i64> {
        match self {
            LifecycleEvent::Born { level, .. }
            | LifecycleEvent::Summon { level, .. }
            | LifecycleEvent::Revive { level, .. }
            | LifecycleEvent::Level { level }
            | LifecycleEvent::Death { level, .. }
            | LifecycleEvent::Survive { level, .. } => Some(*level),
            LifecycleEvent::BeginBattle { .. } | LifecycleEvent::EndBattle { .. } => None,
        }
    }

    /// Location carried by the event, if any.
    pub fn location(&self) -> Option<&Location> {
        match self {
            LifecycleEvent::Born { location, .. }
            | LifecycleEvent::Summon { location, .. }
            | LifecycleEvent::Revive { location, .. }
            | LifecycleEvent::Death { location, .. }
            | LifecycleEvent::Survive { location, .. } => Some(location),
            _ => None,
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleEvent::Level { level } => write!(f, "Level(level={level})"),
            LifecycleEvent::BeginBattle { battle } | LifecycleEvent::EndBattle { battle } => {
                write!(f, "{}(battle={battle})", self.kind())
            }
            other => match (other.level(), other.location()) {
                (Some(level), Some(location)) => {
                    write!(f, "{}(level={level}, location={location})", other.kind())
                }
                _ => write!(f, "{}", other.kind()),
            },
        }
    }
}

impl From<&BeginRecord> for LifecycleEvent {
    fn from(record: &BeginRecord) -> Self {
        let level = record.level;
        let location = record.location.clone();
        match record.kind {
            BeginKind::Born => LifecycleEvent::Born { level, location },
            BeginKind::Summon => LifecycleEvent::Summon { level, location },
            BeginKind::Revive => LifecycleEvent::Revive { level, location },
        }
    }
}

impl From<&LevelRecord> for LifecycleEvent {
    fn from(record: &LevelRecord) -> Self {
        LifecycleEvent::Level {
            level: record.level,
        }
    }
}

impl From<&EndRecord> for LifecycleEvent {
    fn from(record: &EndRecord) -> Self {
        let level = record.level;
        let location = record.location.clone();
        match record.kind {
            EndKind::Death => LifecycleEvent::Death { level, location },
            EndKind::Survive => LifecycleEvent::Survive { level, location },
        }
    }
}

/// A lifecycle event and the time it happened, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent {
    pub time: f64,
    pub event: LifecycleEvent,
}

impl TimedEvent {
    pub fn new(time: f64, event: LifecycleEvent) -> Self {
        Self { time, event }
    }

    pub fn kind(&self) -> EventKind {
        self.event.kind()
    }
}

impl fmt::Display for TimedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.event, format_time(self.time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_display() {
        let born = TimedEvent::new(
            61.0,
            LifecycleEvent::Born {
                level: 1,
                location: Location::Nowhere,
            },
        );
        assert_eq!(born.to_string(), "Born(level=1, location=-) at 00:01:01.0");

        let enter = TimedEvent::new(
            600.0,
            LifecycleEvent::BeginBattle {
                battle: "B1".to_string(),
            },
        );
        assert_eq!(enter.to_string(), "Begin Battle(battle=B1) at 00:10:00.0");
    }

    #[test]
    fn test_from_end_record() {
        let record = EndRecord {
            row: 0,
            time: 10.0,
            marble: "Alpha".to_string(),
            location: Location::Battle,
            level: 2,
            kind: EndKind::Death,
        };
        let event = LifecycleEvent::from(&record);
        assert_eq!(event.kind(), EventKind::Death);
        assert_eq!(event.level(), Some(2));
        assert_eq!(event.location(), Some(&Location::Battle));
    }

    #[test]
    fn test_battle_events_carry_no_level_or_location() {
        let event = LifecycleEvent::EndBattle {
            battle: "B1".to_string(),
        };
        assert_eq!(event.level(), None);
        assert_eq!(event.location(), None);
    }
}
