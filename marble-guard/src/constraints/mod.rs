//! Whole-dataset consistency checks.
//!
//! Each check implements [`DatasetCheck`](crate::core::DatasetCheck) and runs
//! over the immutable [`Dataset`](crate::core::Dataset) after the schema phase:
//!
//! 1. [`ForeignKeyConstraint`] - every reference field names an existing color,
//!    marble or battle, or one of the field's sentinels (`-`, `BATTLE`).
//! 2. [`BattleOverlapConstraint`] - battles sorted by begin time never overlap.
//! 3. [`BattleRosterConstraint`] - battle participants have a color registered
//!    for the battle.
//! 4. [`LifecycleConstraint`] - each marble's events replay legally and end at
//!    its declared final level.
//!
//! [`ValidationSuite::standard`](crate::core::ValidationSuite::standard) runs
//! them in this order.

mod battle_overlap;
mod foreign_key;
mod lifecycle;
mod roster;

pub use battle_overlap::{check_battle_intervals, BattleOverlapConstraint};
pub use foreign_key::{ForeignKeyConstraint, Reference};
pub use lifecycle::LifecycleConstraint;
pub use roster::BattleRosterConstraint;
