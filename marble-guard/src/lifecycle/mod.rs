//! Per-marble lifecycle replay.
//!
//! [`EventStreams`] merges each marble's begin, level and end rows with the
//! battle entries and exits derived from its battle participation, and
//! [`LifecycleMachine`] replays the merged stream against the lifecycle
//! transition table.

mod event;
mod machine;
mod stream;

pub use event::{EventKind, LifecycleEvent, TimedEvent};
pub use machine::{
    transition, IllegalTransition, LifecycleMachine, LifecycleState, StateEffect, Transition,
};
pub use stream::{assemble, EventStreams};
