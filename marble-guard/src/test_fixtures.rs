//! Dataset fixtures for validation tests.
//!
//! [`DatasetFixture`] assembles raw rows table by table, so a test can start
//! from an empty or a known-valid dataset and add just the rows it is about.

use crate::core::Dataset;
use crate::error::Result;
use crate::schema::columns::*;
use crate::schema::{SchemaCatalog, Table};
use crate::sources::MemorySource;

/// An in-memory marble dataset under construction.
#[derive(Debug, Clone)]
pub struct DatasetFixture {
    source: MemorySource,
}

impl DatasetFixture {
    /// All eight tables registered, no rows.
    pub fn empty() -> Self {
        Self {
            source: MemorySource::with_all_tables(),
        }
    }

    /// A small valid tournament: three colors, four marbles, two battles.
    ///
    /// Rusty fights both battles and levels up in each; Azure dies in B1 and
    /// is revived by Rusty; Crimson is summoned by Rusty and levels up in B1;
    /// Sky is born between the battles and dies in B2.
    pub fn tournament() -> Self {
        let mut fixture = Self::empty();
        fixture
            .color("Red", "#FF0000")
            .color("Blue", "#0000FF")
            .color("Yellow", "#FFFF00")
            .marble("Rusty", "Red", 3)
            .marble("Azure", "Blue", 1)
            .marble("Crimson", "Red", 1)
            .marble("Sky", "Blue", 2)
            .battle("B1", "00:10:00.0", "00:15:00.0")
            .battle("B2", "00:20:00.0", "00:25:00.0")
            .battle_color("B1", "Red", true)
            .battle_color("B1", "Blue", false)
            .battle_color("B2", "Red", true)
            .battle_color("B2", "Blue", false)
            .battle_marble("B1", "Rusty")
            .battle_marble("B1", "Azure")
            .battle_marble("B1", "Crimson")
            .battle_marble("B2", "Rusty")
            .battle_marble("B2", "Sky")
            .begin("00:01:00.0", "Rusty", "-", 1, "Born")
            .begin("00:02:00.0", "Azure", "-", 1, "Born")
            .begin("00:05:00.0", "Crimson", "Rusty", 0, "Summon")
            .begin("00:18:00.0", "Azure", "Rusty", 1, "Revive")
            .begin("00:19:00.0", "Sky", "-", 2, "Born")
            .level("00:12:00.0", "Rusty", 2)
            .level("00:14:00.0", "Crimson", 1)
            .level("00:22:00.0", "Rusty", 3)
            .end("00:13:00.0", "Azure", "BATTLE", 1, "Death")
            .end("00:24:00.0", "Sky", "BATTLE", 2, "Death")
            .end("00:30:00.0", "Rusty", "-", 3, "Survive")
            .end("00:30:00.0", "Azure", "-", 1, "Survive");
        fixture
    }

    pub fn color(&mut self, name: &str, hex_code: &str) -> &mut Self {
        self.source
            .push_row(Table::Colors, [(COLOR, name), (HEX_CODE, hex_code)]);
        self
    }

    /// Adds a marble; full name, type and kills are filled in.
    pub fn marble(&mut self, name: &str, color: &str, final_level: i64) -> &mut Self {
        let full_name = format!("{name} the Marble");
        let final_level = final_level.to_string();
        self.source.push_row(
            Table::Marbles,
            [
                (MARBLE_NAME, name),
                (FULL_NAME, full_name.as_str()),
                (TYPE, "Fighter"),
                (COLOR, color),
                (FINAL_LEVEL, final_level.as_str()),
                (KILLS, "0"),
            ],
        );
        self
    }

    pub fn begin(
        &mut self,
        time: &str,
        marble: &str,
        location: &str,
        level: i64,
        kind: &str,
    ) -> &mut Self {
        let level = level.to_string();
        self.source.push_row(
            Table::Begin,
            [
                (TIME, time),
                (MARBLE_NAME, marble),
                (LOCATION, location),
                (LEVEL, level.as_str()),
                (TYPE, kind),
            ],
        );
        self
    }

    pub fn level(&mut self, time: &str, marble: &str, level: i64) -> &mut Self {
        let level = level.to_string();
        self.source.push_row(
            Table::Level,
            [(TIME, time), (MARBLE_NAME, marble), (LEVEL, level.as_str())],
        );
        self
    }

    pub fn end(
        &mut self,
        time: &str,
        marble: &str,
        location: &str,
        level: i64,
        kind: &str,
    ) -> &mut Self {
        let level = level.to_string();
        self.source.push_row(
            Table::End,
            [
                (TIME, time),
                (MARBLE_NAME, marble),
                (LOCATION, location),
                (LEVEL, level.as_str()),
                (TYPE, kind),
            ],
        );
        self
    }

    pub fn battle(&mut self, id: &str, begin: &str, end: &str) -> &mut Self {
        self.source
            .push_row(Table::Battles, [(BATTLE_ID, id), (BEGIN, begin), (END, end)]);
        self
    }

    pub fn battle_color(&mut self, battle: &str, color: &str, is_winner: bool) -> &mut Self {
        let is_winner = if is_winner { "true" } else { "false" };
        self.source.push_row(
            Table::BattleColors,
            [(BATTLE_ID, battle), (COLOR, color), (IS_WINNER, is_winner)],
        );
        self
    }

    pub fn battle_marble(&mut self, battle: &str, marble: &str) -> &mut Self {
        self.source.push_row(
            Table::BattleMarbles,
            [(BATTLE_ID, battle), (MARBLE_NAME, marble)],
        );
        self
    }

    pub fn source(&self) -> &MemorySource {
        &self.source
    }

    /// Runs the schema phase with the standard catalog.
    pub fn dataset(&self) -> Result<Dataset> {
        Dataset::load(&self.source, &SchemaCatalog::standard())
    }
}

impl Default for DatasetFixture {
    fn default() -> Self {
        Self::empty()
    }
}
