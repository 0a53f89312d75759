//! Named seed patterns and random soups.

use life_core::{Coordinate, Error, Result};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// A named starting configuration, anchored at its top-left corner
pub struct Pattern {
    pub name: &'static str,
    pub cells: &'static [(i64, i64)],
}

impl Pattern {
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.cells.iter().map(|&(x, y)| Coordinate::new(x, y))
    }
}

pub const PATTERNS: &[Pattern] = &[
    Pattern {
        name: "block",
        cells: &[(0, 0), (1, 0), (0, 1), (1, 1)],
    },
    Pattern {
        name: "blinker",
        cells: &[(0, 0), (1, 0), (2, 0)],
    },
    Pattern {
        name: "toad",
        cells: &[(1, 0), (2, 0), (3, 0), (0, 1), (1, 1), (2, 1)],
    },
    Pattern {
        name: "beacon",
        cells: &[(0, 0), (1, 0), (0, 1), (1, 1), (2, 2), (3, 2), (2, 3), (3, 3)],
    },
    Pattern {
        name: "glider",
        cells: &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)],
    },
    Pattern {
        name: "r-pentomino",
        cells: &[(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)],
    },
    Pattern {
        name: "diehard",
        cells: &[(6, 0), (0, 1), (1, 1), (1, 2), (5, 2), (6, 2), (7, 2)],
    },
    Pattern {
        name: "acorn",
        cells: &[(1, 0), (3, 1), (0, 2), (1, 2), (4, 2), (5, 2), (6, 2)],
    },
    Pattern {
        name: "pulsar",
        cells: &[
            // Top half
            (2, 0), (3, 0), (4, 0), (8, 0), (9, 0), (10, 0),
            (0, 2), (5, 2), (7, 2), (12, 2),
            (0, 3), (5, 3), (7, 3), (12, 3),
            (0, 4), (5, 4), (7, 4), (12, 4),
            (2, 5), (3, 5), (4, 5), (8, 5), (9, 5), (10, 5),
            // Bottom half (mirrored)
            (2, 7), (3, 7), (4, 7), (8, 7), (9, 7), (10, 7),
            (0, 8), (5, 8), (7, 8), (12, 8),
            (0, 9), (5, 9), (7, 9), (12, 9),
            (0, 10), (5, 10), (7, 10), (12, 10),
            (2, 12), (3, 12), (4, 12), (8, 12), (9, 12), (10, 12),
        ],
    },
    Pattern {
        name: "gosper-glider-gun",
        cells: &[
            (0, 4), (0, 5), (1, 4), (1, 5),
            (10, 4), (10, 5), (10, 6), (11, 3), (11, 7), (12, 2), (12, 8),
            (13, 2), (13, 8), (14, 5), (15, 3), (15, 7), (16, 4), (16, 5),
            (16, 6), (17, 5), (20, 2), (20, 3), (20, 4), (21, 2), (21, 3),
            (21, 4), (22, 1), (22, 5), (24, 0), (24, 1), (24, 5), (24, 6),
            (34, 2), (34, 3), (35, 2), (35, 3),
        ],
    },
];

/// Look up a pattern by name, ignoring case and `_`/space versus `-`
pub fn find(name: &str) -> Result<&'static Pattern> {
    let wanted = name.trim().to_ascii_lowercase().replace(['_', ' '], "-");
    PATTERNS
        .iter()
        .find(|p| p.name == wanted)
        .ok_or_else(|| {
            let known: Vec<&str> = PATTERNS.iter().map(|p| p.name).collect();
            Error::Validation(format!(
                "unknown pattern '{}' (known: {})",
                name,
                known.join(", ")
            ))
        })
}

/// Random field of `width` x `height` cells anchored at the origin, each alive
/// with probability `density`
pub fn random_soup(width: i64, height: i64, density: f64, rng: &mut ChaCha8Rng) -> Vec<Coordinate> {
    let mut cells = Vec::new();

    for y in 0..height {
        for x in 0..width {
            let roll = rng.gen::<f64>();
            if roll < density {
                cells.push(Coordinate::new(x, y));
            }
        }
    }

    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_find_pattern() {
        assert_eq!(find("glider").unwrap().cells.len(), 5);
        assert_eq!(find("Gosper Glider Gun").unwrap().cells.len(), 36);
        assert_eq!(find("R_Pentomino").unwrap().name, "r-pentomino");
        assert!(matches!(find("spaceship"), Err(Error::Validation(_))));
    }

    #[test]
    fn test_patterns_have_no_duplicate_cells() {
        for pattern in PATTERNS {
            let unique: HashSet<_> = pattern.cells.iter().collect();
            assert_eq!(unique.len(), pattern.cells.len(), "{}", pattern.name);
        }
    }

    #[test]
    fn test_random_soup_is_reproducible() {
        let mut a = ChaCha8Rng::seed_from_u64(42);
        let mut b = ChaCha8Rng::seed_from_u64(42);
        let soup_a = random_soup(20, 20, 0.3, &mut a);
        let soup_b = random_soup(20, 20, 0.3, &mut b);

        assert_eq!(soup_a, soup_b);
        assert!(!soup_a.is_empty());
        assert!(soup_a.len() < 400);
        assert!(soup_a
            .iter()
            .all(|c| (0..20).contains(&c.x) && (0..20).contains(&c.y)));
    }

    #[test]
    fn test_random_soup_density_extremes() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert!(random_soup(10, 10, 0.0, &mut rng).is_empty());
        assert_eq!(random_soup(10, 10, 1.0, &mut rng).len(), 100);
    }
}
