//! Typed records of the marble dataset tables.
//!
//! Each record is built from a [`TypedRow`] that already passed its table
//! schema, so conversions only fail on internal inconsistencies.

use crate::error::{MarbleError, Result};
use crate::schema::{columns, TypedRow, BATTLE_LOCATION, NO_LOCATION};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named color usable by marbles and battles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub name: String,
    pub hex_code: String,
}

/// A competing marble.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marble {
    pub name: String,
    pub full_name: String,
    /// Free-form marble type from the `Type` column
    pub kind: String,
    pub color: String,
    pub final_level: i64,
    pub kills: i64,
}

/// Where a begin or end event happened.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    /// The `-` sentinel
    Nowhere,
    /// The `BATTLE` sentinel, only legal on end rows
    Battle,
    /// Another marble, by name
    Marble(String),
}

impl Location {
    /// Parses the location of an end row, where both sentinels apply.
    pub fn parse(raw: &str) -> Self {
        match raw {
            NO_LOCATION => Location::Nowhere,
            BATTLE_LOCATION => Location::Battle,
            name => Location::Marble(name.to_string()),
        }
    }

    /// Parses the location of a begin row. `BATTLE` is not a sentinel there,
    /// so it names a marble.
    pub fn parse_begin(raw: &str) -> Self {
        match raw {
            NO_LOCATION => Location::Nowhere,
            name => Location::Marble(name.to_string()),
        }
    }

    pub fn is_battle(&self) -> bool {
        matches!(self, Location::Battle)
    }

    /// The raw column value.
    pub fn as_str(&self) -> &str {
        match self {
            Location::Nowhere => NO_LOCATION,
            Location::Battle => BATTLE_LOCATION,
            Location::Marble(name) => name,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of a begin row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BeginKind {
    Born,
    Summon,
    Revive,
}

impl BeginKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Born" => Some(BeginKind::Born),
            "Summon" => Some(BeginKind::Summon),
            "Revive" => Some(BeginKind::Revive),
            _ => None,
        }
    }
}

/// Kind of an end row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndKind {
    Death,
    Survive,
}

impl EndKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Death" => Some(EndKind::Death),
            "Survive" => Some(EndKind::Survive),
            _ => None,
        }
    }
}

/// A birth, summon or revival.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeginRecord {
    /// Zero-based row index in the `begin` table
    pub row: usize,
    pub time: f64,
    pub marble: String,
    pub location: Location,
    pub level: i64,
    pub kind: BeginKind,
}

/// A level change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelRecord {
    pub row: usize,
    pub time: f64,
    pub marble: String,
    pub level: i64,
}

/// A death or survival.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndRecord {
    pub row: usize,
    pub time: f64,
    pub marble: String,
    pub location: Location,
    pub level: i64,
    pub kind: EndKind,
}

/// A time-bounded battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Battle {
    pub id: String,
    /// Begin time in seconds
    pub begin: f64,
    /// End time in seconds
    pub end: f64,
}

/// Declares a color eligible in a battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleColor {
    pub battle: String,
    pub color: String,
    pub is_winner: bool,
}

/// Declares a marble's participation in a battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleMarble {
    pub battle: String,
    pub marble: String,
}

fn unknown_literal(row: &TypedRow, field: &str, value: &str) -> MarbleError {
    MarbleError::Internal(format!(
        "table '{}' row {} passed schema validation with unexpected {field} '{value}'",
        row.table, row.index
    ))
}

impl TryFrom<&TypedRow> for Color {
    type Error = MarbleError;

    fn try_from(row: &TypedRow) -> Result<Self> {
        Ok(Self {
            name: row.text(columns::COLOR)?.to_string(),
            hex_code: row.text(columns::HEX_CODE)?.to_string(),
        })
    }
}

impl TryFrom<&TypedRow> for Marble {
    type Error = MarbleError;

    fn try_from(row: &TypedRow) -> Result<Self> {
        Ok(Self {
            name: row.text(columns::MARBLE_NAME)?.to_string(),
            full_name: row.text(columns::FULL_NAME)?.to_string(),
            kind: row.text(columns::TYPE)?.to_string(),
            color: row.text(columns::COLOR)?.to_string(),
            final_level: row.integer(columns::FINAL_LEVEL)?,
            kills: row.integer(columns::KILLS)?,
        })
    }
}

impl TryFrom<&TypedRow> for BeginRecord {
    type Error = MarbleError;

    fn try_from(row: &TypedRow) -> Result<Self> {
        let kind = row.text(columns::TYPE)?;
        Ok(Self {
            row: row.index,
            time: row.time(columns::TIME)?,
            marble: row.text(columns::MARBLE_NAME)?.to_string(),
            location: Location::parse_begin(row.text(columns::LOCATION)?),
            level: row.integer(columns::LEVEL)?,
            kind: BeginKind::parse(kind).ok_or_else(|| unknown_literal(row, columns::TYPE, kind))?,
        })
    }
}

impl TryFrom<&TypedRow> for LevelRecord {
    type Error = MarbleError;

    fn try_from(row: &TypedRow) -> Result<Self> {
        Ok(Self {
            row: row.index,
            time: row.time(columns::TIME)?,
            marble: row.text(columns::MARBLE_NAME)?.to_string(),
            level: row.integer(columns::LEVEL)?,
        })
    }
}

impl TryFrom<&TypedRow> for EndRecord {
    type Error = MarbleError;

    fn try_from(row: &TypedRow) -> Result<Self> {
        let kind = row.text(columns::TYPE)?;
        Ok(Self {
            row: row.index,
            time: row.time(columns::TIME)?,
            marble: row.text(columns::MARBLE_NAME)?.to_string(),
            location: Location::parse(row.text(columns::LOCATION)?),
            level: row.integer(columns::LEVEL)?,
            kind: EndKind::parse(kind).ok_or_else(|| unknown_literal(row, columns::TYPE, kind))?,
        })
    }
}

impl TryFrom<&TypedRow> for Battle {
    type Error = MarbleError;

    fn try_from(row: &TypedRow) -> Result<Self> {
        Ok(Self {
            id: row.text(columns::BATTLE_ID)?.to_string(),
            begin: row.time(columns::BEGIN)?,
            end: row.time(columns::END)?,
        })
    }
}

impl TryFrom<&TypedRow> for BattleColor {
    type Error = MarbleError;

    fn try_from(row: &TypedRow) -> Result<Self> {
        Ok(Self {
            battle: row.text(columns::BATTLE_ID)?.to_string(),
            color: row.text(columns::COLOR)?.to_string(),
            is_winner: row.boolean(columns::IS_WINNER)?,
        })
    }
}

impl TryFrom<&TypedRow> for BattleMarble {
    type Error = MarbleError;

    fn try_from(row: &TypedRow) -> Result<Self> {
        Ok(Self {
            battle: row.text(columns::BATTLE_ID)?.to_string(),
            marble: row.text(columns::MARBLE_NAME)?.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_parse() {
        assert_eq!(Location::parse("-"), Location::Nowhere);
        assert_eq!(Location::parse("BATTLE"), Location::Battle);
        assert_eq!(
            Location::parse("Alpha"),
            Location::Marble("Alpha".to_string())
        );
        assert!(Location::Battle.is_battle());
        assert_eq!(Location::Marble("Alpha".to_string()).to_string(), "Alpha");
    }

    #[test]
    fn test_begin_location_has_no_battle_sentinel() {
        assert_eq!(Location::parse_begin("-"), Location::Nowhere);
        assert_eq!(
            Location::parse_begin("BATTLE"),
            Location::Marble("BATTLE".to_string())
        );
        assert_eq!(
            Location::parse_begin("Alpha"),
            Location::Marble("Alpha".to_string())
        );
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(BeginKind::parse("Summon"), Some(BeginKind::Summon));
        assert_eq!(BeginKind::parse("Death"), None);
        assert_eq!(EndKind::parse("Survive"), Some(EndKind::Survive));
        assert_eq!(EndKind::parse("survive"), None);
    }
}
