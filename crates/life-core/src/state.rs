//! Saved-game interchange record.
//!
//! This is the JSON shape written by the browser front end's save button:
//! `{ "showGridLines": true, "turnCounter": 12, "gameCells": [{"x": 1, "y": 0}, ...] }`.

use crate::{Coordinate, Error, Result};
use serde::{Deserialize, Serialize};

/// One persisted live cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRecord {
    pub x: i64,
    pub y: i64,
}

impl From<CellRecord> for Coordinate {
    fn from(record: CellRecord) -> Self {
        Coordinate::new(record.x, record.y)
    }
}

impl From<Coordinate> for CellRecord {
    fn from(coord: Coordinate) -> Self {
        Self {
            x: coord.x,
            y: coord.y,
        }
    }
}

fn default_show_grid_lines() -> bool {
    true
}

/// A persisted game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedGame {
    /// Display preference, carried through untouched
    #[serde(default = "default_show_grid_lines")]
    pub show_grid_lines: bool,
    #[serde(default)]
    pub turn_counter: u64,
    pub game_cells: Vec<CellRecord>,
}

impl SavedGame {
    pub fn new(turn_counter: u64, cells: impl IntoIterator<Item = Coordinate>) -> Self {
        Self {
            show_grid_lines: true,
            turn_counter,
            game_cells: cells.into_iter().map(CellRecord::from).collect(),
        }
    }

    /// Parse a saved game, reporting anything unusable as `MalformedState`
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Err(Error::MalformedState("no saved state present".to_string()));
        }

        serde_json::from_str(json).map_err(|e| Error::MalformedState(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.game_cells.iter().copied().map(Coordinate::from)
    }
}
