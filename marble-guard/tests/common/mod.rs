//! Shared helpers for integration tests: a CSV tournament dataset on disk.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use tempfile::TempDir;

/// CSV lines per file, header first.
pub struct CsvDataset {
    files: BTreeMap<&'static str, Vec<String>>,
}

impl CsvDataset {
    /// Every table with its header and no rows.
    pub fn empty() -> Self {
        let headers = [
            ("colors.csv", "Color,Hex Code"),
            ("marbles.csv", "Marble Name,Full Name,Type,Color,Final Level,Kills"),
            ("begin.csv", "Time,Marble Name,Location,Level,Type"),
            ("level.csv", "Time,Marble Name,Level"),
            ("end.csv", "Time,Marble Name,Location,Level,Type"),
            ("battles.csv", "Battle Id,Begin,End"),
            ("battle-colors.csv", "Battle Id,Color,Is Winner"),
            ("battle-marbles.csv", "Battle Id,Marble Name"),
        ];
        Self {
            files: headers
                .into_iter()
                .map(|(file, header)| (file, vec![header.to_string()]))
                .collect(),
        }
    }

    /// A valid two-battle tournament.
    pub fn tournament() -> Self {
        let mut dataset = Self::empty();
        dataset
            .rows("colors.csv", &["Red,#FF0000", "Blue,#0000FF", "Yellow,#FFFF00"])
            .rows(
                "marbles.csv",
                &[
                    "Rusty,Rusty the Red,Fighter,Red,3,1",
                    "Azure,\"Azure, the Blue\",Fighter,Blue,1,0",
                    "Crimson,Crimson the Red,Summon,Red,1,0",
                    "Sky,Sky the Blue,Fighter,Blue,2,0",
                ],
            )
            .rows(
                "begin.csv",
                &[
                    "00:01:00.0,Rusty,-,1,Born",
                    "00:02:00.0,Azure,-,1,Born",
                    "00:05:00.0,Crimson,Rusty,0,Summon",
                    "00:18:00.0,Azure,Rusty,1,Revive",
                    "00:19:00.0,Sky,-,2,Born",
                ],
            )
            .rows(
                "level.csv",
                &[
                    "00:12:00.0,Rusty,2",
                    "00:14:00.0,Crimson,1",
                    "00:22:00.0,Rusty,3",
                ],
            )
            .rows(
                "end.csv",
                &[
                    "00:13:00.0,Azure,BATTLE,1,Death",
                    "00:24:00.0,Sky,BATTLE,2,Death",
                    "00:30:00.0,Rusty,-,3,Survive",
                    "00:30:00.0,Azure,-,1,Survive",
                ],
            )
            .rows("battles.csv", &["B1,00:10:00.0,00:15:00.0", "B2,00:20:00.0,00:25:00.0"])
            .rows(
                "battle-colors.csv",
                &["B1,Red,true", "B1,Blue,false", "B2,Red,yes", "B2,Blue,no"],
            )
            .rows(
                "battle-marbles.csv",
                &["B1,Rusty", "B1,Azure", "B1,Crimson", "B2,Rusty", "B2,Sky"],
            );
        dataset
    }

    /// Appends data lines to a file.
    pub fn rows(&mut self, file: &'static str, lines: &[&str]) -> &mut Self {
        let entry = self.files.entry(file).or_default();
        entry.extend(lines.iter().map(|line| line.to_string()));
        self
    }

    /// Replaces the first line of `file` that equals `from`.
    pub fn replace(&mut self, file: &'static str, from: &str, to: &str) -> &mut Self {
        let lines = self.files.get_mut(file).expect("known file");
        let line = lines
            .iter_mut()
            .find(|line| line.as_str() == from)
            .unwrap_or_else(|| panic!("no line '{from}' in {file}"));
        *line = to.to_string();
        self
    }

    /// Drops a file so the table is missing on disk.
    pub fn remove(&mut self, file: &'static str) -> &mut Self {
        self.files.remove(file);
        self
    }

    /// Writes every file into a fresh temporary directory.
    pub fn write(&self) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (file, lines) in &self.files {
            let mut contents = lines.join("\n");
            contents.push('\n');
            fs::write(dir.path().join(file), contents).unwrap();
        }
        dir
    }
}
