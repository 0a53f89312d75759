//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer coordinate on the unbounded plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i64,
    pub y: i64,
}

impl Coordinate {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Offset by `(dx, dy)`. Wraps at the integer limits so the plane has no edge
    /// at which neighbor arithmetic could fail.
    pub fn offset(&self, dx: i64, dy: i64) -> Self {
        Self {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
        }
    }

    /// The eight Moore-neighborhood positions around this coordinate
    pub fn moore_neighborhood(&self) -> [Coordinate; 8] {
        let mut out = [*self; 8];
        let mut i = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                out[i] = self.offset(dx, dy);
                i += 1;
            }
        }
        out
    }
}

impl From<(i64, i64)> for Coordinate {
    fn from((x, y): (i64, i64)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Extreme coordinates of a population
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: i64,
    pub min_y: i64,
    pub max_x: i64,
    pub max_y: i64,
}

impl Bounds {
    /// Smallest box containing every coordinate, or the unit box at the origin
    /// when there are none.
    pub fn enclosing<'a, I>(coords: I) -> Self
    where
        I: IntoIterator<Item = &'a Coordinate>,
    {
        let mut iter = coords.into_iter();
        let Some(first) = iter.next() else {
            return Self::default();
        };

        iter.fold(
            Self {
                min_x: first.x,
                min_y: first.y,
                max_x: first.x,
                max_y: first.y,
            },
            |b, c| Self {
                min_x: b.min_x.min(c.x),
                min_y: b.min_y.min(c.y),
                max_x: b.max_x.max(c.x),
                max_y: b.max_y.max(c.y),
            },
        )
    }
}

/// Bounding box plus its inclusive extent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    pub width: u64,
    pub height: u64,
    pub bounds: Bounds,
}

impl From<Bounds> for Measurement {
    fn from(bounds: Bounds) -> Self {
        Self {
            width: bounds.max_x.abs_diff(bounds.min_x).saturating_add(1),
            height: bounds.max_y.abs_diff(bounds.min_y).saturating_add(1),
            bounds,
        }
    }
}

/// Read-only view of one generation handed to drivers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub generation: u64,
    pub alive_cells: Vec<Coordinate>,
    pub bounds: Measurement,
}

impl Snapshot {
    pub fn population(&self) -> usize {
        self.alive_cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alive_cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moore_neighborhood_excludes_center_only() {
        let center = Coordinate::new(5, -5);
        let ring = center.moore_neighborhood();

        assert_eq!(ring.len(), 8);
        assert!(!ring.contains(&center));
        // Same row and same column must still be present
        assert!(ring.contains(&Coordinate::new(4, -5)));
        assert!(ring.contains(&Coordinate::new(6, -5)));
        assert!(ring.contains(&Coordinate::new(5, -4)));
        assert!(ring.contains(&Coordinate::new(5, -6)));
    }

    #[test]
    fn test_offset_wraps_at_limits() {
        let edge = Coordinate::new(i64::MAX, i64::MIN);
        assert_eq!(edge.offset(1, -1), Coordinate::new(i64::MIN, i64::MAX));
    }

    #[test]
    fn test_empty_bounds_is_unit_box() {
        let m = Measurement::from(Bounds::enclosing(std::iter::empty()));
        assert_eq!(m.width, 1);
        assert_eq!(m.height, 1);
        assert_eq!(m.bounds, Bounds::default());
    }

    #[test]
    fn test_bounds_enclosing() {
        let coords = [
            Coordinate::new(-3, 2),
            Coordinate::new(4, -1),
            Coordinate::new(0, 7),
        ];
        let m = Measurement::from(Bounds::enclosing(&coords));

        assert_eq!(
            m.bounds,
            Bounds {
                min_x: -3,
                min_y: -1,
                max_x: 4,
                max_y: 7
            }
        );
        assert_eq!(m.width, 8);
        assert_eq!(m.height, 9);
    }

    #[test]
    fn test_measurement_json_shape() {
        let m = Measurement::from(Bounds {
            min_x: 1,
            min_y: 2,
            max_x: 3,
            max_y: 4,
        });
        let json = serde_json::to_value(m).unwrap();
        assert_eq!(json["width"], 3);
        assert_eq!(json["bounds"]["minX"], 1);
        assert_eq!(json["bounds"]["maxY"], 4);
    }
}
