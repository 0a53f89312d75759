//! Sparse, unbounded 2D grid of live cells.

use life_core::{Bounds, Coordinate, Measurement};
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::collections::HashMap;

/// A live cell. Its coordinate never changes once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    position: Coordinate,
}

impl Cell {
    pub fn new(x: i64, y: i64) -> Self {
        Self {
            position: Coordinate::new(x, y),
        }
    }

    pub fn at(position: Coordinate) -> Self {
        Self { position }
    }

    pub fn x(&self) -> i64 {
        self.position.x
    }

    pub fn y(&self) -> i64 {
        self.position.y
    }

    pub fn position(&self) -> Coordinate {
        self.position
    }
}

/// Moore neighborhood of a position, split by occupancy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Neighbors {
    /// Live cells around the position
    pub alive: Vec<Cell>,
    /// Surrounding positions with no cell
    pub absent: Vec<Coordinate>,
}

impl Neighbors {
    pub fn alive_count(&self) -> usize {
        self.alive.len()
    }
}

/// Live cells keyed by coordinate. Absence means dead.
#[derive(Debug, Default)]
pub struct SparseGrid {
    cells: HashMap<Coordinate, Cell>,
    // Empty whenever the map changed since the last `all_cells` call
    flat: OnceCell<Vec<Cell>>,
}

impl SparseGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a cell at its own coordinate, replacing any cell already there
    pub fn add(&mut self, cell: Cell) {
        self.cells.insert(cell.position(), cell);
        self.invalidate();
    }

    /// Remove the cell at `(x, y)` if there is one
    pub fn remove(&mut self, x: i64, y: i64) -> Option<Cell> {
        let removed = self.cells.remove(&Coordinate::new(x, y));
        if removed.is_some() {
            self.invalidate();
        }
        removed
    }

    pub fn get(&self, x: i64, y: i64) -> Option<Cell> {
        self.cells.get(&Coordinate::new(x, y)).copied()
    }

    /// Classify each of the eight surrounding positions as alive or absent.
    /// Only `(x, y)` itself is skipped, never its row or column.
    pub fn neighbors(&self, x: i64, y: i64) -> Neighbors {
        let mut neighbors = Neighbors {
            alive: Vec::with_capacity(8),
            absent: Vec::with_capacity(8),
        };

        for pos in Coordinate::new(x, y).moore_neighborhood() {
            match self.cells.get(&pos) {
                Some(cell) => neighbors.alive.push(*cell),
                None => neighbors.absent.push(pos),
            }
        }

        neighbors
    }

    /// Every live cell, in no particular order. Cached until the next mutation.
    pub fn all_cells(&self) -> &[Cell] {
        self.flat
            .get_or_init(|| self.cells.values().copied().collect())
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Bounding box of the live cells; the unit box at the origin when empty
    pub fn measure(&self) -> Measurement {
        Measurement::from(Bounds::enclosing(
            self.all_cells().iter().map(|cell| &cell.position),
        ))
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.flat.take();
    }

    #[cfg(test)]
    fn is_cached(&self) -> bool {
        self.flat.get().is_some()
    }
}

impl Clone for SparseGrid {
    fn clone(&self) -> Self {
        Self {
            cells: self.cells.clone(),
            flat: OnceCell::new(),
        }
    }
}

impl FromIterator<Coordinate> for SparseGrid {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        let mut grid = Self::new();
        for pos in iter {
            grid.cells.insert(pos, Cell::at(pos));
        }
        grid
    }
}
