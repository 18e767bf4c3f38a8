//! The marble lifecycle state machine.
//!
//! The legal transitions live in the pure [`transition`] function, which maps
//! a state and an event kind to the next state plus a [`StateEffect`]. The
//! [`LifecycleMachine`] applies that effect to the tracked level, so the
//! transition table can be tested without any level arithmetic.
//!
//! | State    | Event        | Effect                    | Next     |
//! |----------|--------------|---------------------------|----------|
//! | Unalive  | Born, Summon | level = event level       | Alive    |
//! | Alive    | Begin Battle |                           | InBattle |
//! | Alive    | Survive      | location is not `BATTLE`  | Done     |
//! | InBattle | End Battle   |                           | Alive    |
//! | InBattle | Level        | event level = level + 1   | InBattle |
//! | InBattle | Death        | location is `BATTLE`      | Dead     |
//! | Dead     | Revive       | event level = level       | Alive    |
//! | Dead     | End Battle   |                           | Dead     |
//!
//! Every other pair is illegal, and no event at all is accepted once the
//! marble is `Done`.
//!
//! A marble born during a battle starts `Alive` rather than `InBattle`, so it
//! cannot level up in that battle. This is a known limitation.

use super::event::{EventKind, TimedEvent};
use crate::error::{MarbleError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// Lifecycle state of a marble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LifecycleState {
    #[default]
    Unalive,
    Alive,
    InBattle,
    Dead,
    Done,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Unalive => "unalive",
            LifecycleState::Alive => "alive",
            LifecycleState::InBattle => "in battle",
            LifecycleState::Dead => "dead",
            LifecycleState::Done => "done",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a transition does to the tracked level or requires of the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateEffect {
    None,
    /// Level becomes the event's level
    InitLevel,
    /// Event level must be exactly one above the current level
    IncrementLevel,
    /// Event level must equal the current level
    RetainLevel,
    /// Event location must be `BATTLE`
    RequireBattleLocation,
    /// Event location must not be `BATTLE`
    ForbidBattleLocation,
}

/// A legal transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: LifecycleState,
    pub effect: StateEffect,
}

impl Transition {
    const fn to(next: LifecycleState, effect: StateEffect) -> Self {
        Self { next, effect }
    }
}

/// An event kind with no legal transition from a state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IllegalTransition {
    pub state: LifecycleState,
    pub kind: EventKind,
    pub reason: String,
}

impl fmt::Display for IllegalTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (state: {}, event: {})", self.reason, self.state, self.kind)
    }
}

impl std::error::Error for IllegalTransition {}

/// Looks up the transition for `kind` in `state`.
pub fn transition(
    state: LifecycleState,
    kind: EventKind,
) -> std::result::Result<Transition, IllegalTransition> {
    use EventKind as E;
    use LifecycleState as S;

    let transition = match (state, kind) {
        (S::Done, _) => {
            return Err(IllegalTransition {
                state,
                kind,
                reason: "no events are permitted once the lifecycle is done".to_string(),
            })
        }
        (S::Unalive, E::Born | E::Summon) => Transition::to(S::Alive, StateEffect::InitLevel),
        (S::Alive, E::BeginBattle) => Transition::to(S::InBattle, StateEffect::None),
        (S::Alive, E::Survive) => Transition::to(S::Done, StateEffect::ForbidBattleLocation),
        (S::InBattle, E::EndBattle) => Transition::to(S::Alive, StateEffect::None),
        (S::InBattle, E::Level) => Transition::to(S::InBattle, StateEffect::IncrementLevel),
        (S::InBattle, E::Death) => Transition::to(S::Dead, StateEffect::RequireBattleLocation),
        (S::Dead, E::Revive) => Transition::to(S::Alive, StateEffect::RetainLevel),
        (S::Dead, E::EndBattle) => Transition::to(S::Dead, StateEffect::None),
        _ => {
            return Err(IllegalTransition {
                state,
                kind,
                reason: format!("no legal transition from {state} on {kind}"),
            })
        }
    };

    Ok(transition)
}

/// Replays one marble's events, tracking its state and level.
#[derive(Debug, Clone)]
pub struct LifecycleMachine {
    marble: String,
    state: LifecycleState,
    level: Option<i64>,
}

impl LifecycleMachine {
    pub fn new(marble: impl Into<String>) -> Self {
        Self {
            marble: marble.into(),
            state: LifecycleState::Unalive,
            level: None,
        }
    }

    pub fn marble(&self) -> &str {
        &self.marble
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Current level; `None` until the marble is born or summoned.
    pub fn level(&self) -> Option<i64> {
        self.level
    }

    /// Applies one event, failing with a lifecycle violation when the event
    /// is illegal in the current state or its effect does not hold.
    pub fn apply(&mut self, event: &TimedEvent) -> Result<()> {
        let step = transition(self.state, event.kind())
            .map_err(|illegal| self.violation(event, illegal.reason))?;

        self.level = self.apply_effect(step.effect, event)?;
        trace!(
            marble = %self.marble,
            from = %self.state,
            to = %step.next,
            event = %event,
            "Lifecycle transition"
        );
        self.state = step.next;
        Ok(())
    }

    /// Applies every event in order.
    pub fn replay<'a, I>(&mut self, events: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a TimedEvent>,
    {
        for event in events {
            self.apply(event)?;
        }
        Ok(())
    }

    /// Checks the replayed level against the declared final level.
    pub fn finish(&self, declared_final_level: i64) -> Result<()> {
        if self.level == Some(declared_final_level) {
            Ok(())
        } else {
            Err(MarbleError::FinalLevelViolation {
                marble: self.marble.clone(),
                expected: declared_final_level,
                actual: self.level,
            })
        }
    }

    fn apply_effect(&self, effect: StateEffect, event: &TimedEvent) -> Result<Option<i64>> {
        let event_level = event.event.level();
        let location = event.event.location();

        match effect {
            StateEffect::None => Ok(self.level),
            StateEffect::InitLevel => match event_level {
                Some(level) => Ok(Some(level)),
                None => Err(self.violation(event, "event carries no level".to_string())),
            },
            StateEffect::IncrementLevel => {
                let expected = self.level.and_then(|level| level.checked_add(1));
                if self.level.is_some() && expected.is_none() {
                    Err(self.violation(
                        event,
                        format!("level {} cannot increase any further", display_level(self.level)),
                    ))
                } else if event_level.is_some() && event_level == expected {
                    Ok(event_level)
                } else {
                    Err(self.violation(
                        event,
                        format!(
                            "level must increase by exactly one, from {} to {}",
                            display_level(self.level),
                            display_level(expected)
                        ),
                    ))
                }
            }
            StateEffect::RetainLevel => {
                if event_level.is_some() && event_level == self.level {
                    Ok(self.level)
                } else {
                    Err(self.violation(
                        event,
                        format!(
                            "revival level must equal the level at death ({})",
                            display_level(self.level)
                        ),
                    ))
                }
            }
            StateEffect::RequireBattleLocation => {
                if location.is_some_and(|location| location.is_battle()) {
                    Ok(self.level)
                } else {
                    Err(self.violation(event, "death must happen in battle".to_string()))
                }
            }
            StateEffect::ForbidBattleLocation => {
                if location.is_some_and(|location| location.is_battle()) {
                    Err(self.violation(event, "survival cannot happen in battle".to_string()))
                } else {
                    Ok(self.level)
                }
            }
        }
    }

    fn violation(&self, event: &TimedEvent, reason: String) -> MarbleError {
        MarbleError::LifecycleViolation {
            marble: self.marble.clone(),
            state: self.state,
            event: event.event.to_string(),
            time: event.time,
            reason,
        }
    }
}

fn display_level(level: Option<i64>) -> String {
    level.map_or_else(|| "none".to_string(), |level| level.to_string())
}
