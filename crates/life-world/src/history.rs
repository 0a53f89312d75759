//! Recent-generation memory for spotting populations that stop changing.

use crate::grid::Cell;
use std::collections::hash_map::DefaultHasher;
use std::collections::VecDeque;
use std::hash::{Hash, Hasher};

/// Order-independent fingerprint of a population
pub fn fingerprint(cells: &[Cell]) -> u64 {
    let mut sum = 0u64;
    let mut xor = 0u64;
    for cell in cells {
        let mut hasher = DefaultHasher::new();
        cell.position().hash(&mut hasher);
        let h = hasher.finish();
        sum = sum.wrapping_add(h);
        xor ^= h.rotate_left(17);
    }

    let mut hasher = DefaultHasher::new();
    (cells.len(), sum, xor).hash(&mut hasher);
    hasher.finish()
}

/// Bounded window of fingerprints, newest last
#[derive(Debug, Clone)]
pub struct History {
    depth: usize,
    seen: VecDeque<u64>,
}

impl History {
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            seen: VecDeque::with_capacity(depth),
        }
    }

    /// Record a generation. Returns the period when it matches one of the
    /// remembered generations (1 for a still life).
    pub fn observe(&mut self, cells: &[Cell]) -> Option<usize> {
        self.observe_fingerprint(fingerprint(cells))
    }

    pub fn observe_fingerprint(&mut self, print: u64) -> Option<usize> {
        let period = self
            .seen
            .iter()
            .rev()
            .position(|&p| p == print)
            .map(|i| i + 1);

        if self.depth > 0 {
            if self.seen.len() == self.depth {
                self.seen.pop_front();
            }
            self.seen.push_back(print);
        }

        period
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(coords: &[(i64, i64)]) -> Vec<Cell> {
        coords.iter().map(|&(x, y)| Cell::new(x, y)).collect()
    }

    #[test]
    fn test_fingerprint_ignores_order() {
        let a = cells(&[(0, 0), (1, 2), (-3, 4)]);
        let b = cells(&[(-3, 4), (0, 0), (1, 2)]);
        assert_eq!(fingerprint(&a), fingerprint(&b));
        assert_ne!(fingerprint(&a), fingerprint(&cells(&[(0, 0), (1, 2)])));
        assert_ne!(fingerprint(&a), fingerprint(&cells(&[(0, 0), (2, 1), (-3, 4)])));
    }

    #[test]
    fn test_detects_still_life() {
        let mut history = History::new(4);
        let block = cells(&[(0, 0), (0, 1), (1, 0), (1, 1)]);
        assert_eq!(history.observe(&block), None);
        assert_eq!(history.observe(&block), Some(1));
    }

    #[test]
    fn test_detects_period_two() {
        let mut history = History::new(4);
        let horizontal = cells(&[(1, 0), (2, 0), (3, 0)]);
        let vertical = cells(&[(2, -1), (2, 0), (2, 1)]);

        assert_eq!(history.observe(&horizontal), None);
        assert_eq!(history.observe(&vertical), None);
        assert_eq!(history.observe(&horizontal), Some(2));
        assert_eq!(history.observe(&vertical), Some(2));
    }

    #[test]
    fn test_window_is_bounded() {
        let mut history = History::new(2);
        for print in [1, 2, 3] {
            assert_eq!(history.observe_fingerprint(print), None);
        }
        assert_eq!(history.len(), 2);
        // 1 has been forgotten
        assert_eq!(history.observe_fingerprint(1), None);
        assert_eq!(history.observe_fingerprint(3), Some(2));
    }

    #[test]
    fn test_zero_depth_never_matches() {
        let mut history = History::new(0);
        assert_eq!(history.observe_fingerprint(7), None);
        assert_eq!(history.observe_fingerprint(7), None);
        assert!(history.is_empty());
    }
}
