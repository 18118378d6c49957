//! Uniform grid for proximity queries over buildings and antennas.

use std::collections::HashMap;
use std::hash::Hash;

use crate::antenna::distance_squared;

type Cell = (i64, i64);

/// Grid-based spatial hash mapping cells to the entities located in them.
///
/// Queries scan every cell overlapping the bounding square of the query disc,
/// so they may return entities slightly outside the radius but never miss one.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialIndex<K>
where
    K: Copy + Eq + Hash + Ord,
{
    cell_size: i64,
    cells: HashMap<Cell, Vec<K>>,
    positions: HashMap<K, (i64, i64)>,
}

impl<K> SpatialIndex<K>
where
    K: Copy + Eq + Hash + Ord,
{
    /// Create an empty index. Non-positive cell sizes are clamped to 1.
    pub fn new(cell_size: i64) -> Self {
        SpatialIndex {
            cell_size: cell_size.max(1),
            cells: HashMap::new(),
            positions: HashMap::new(),
        }
    }

    #[inline]
    fn cell(&self, x: i64, y: i64) -> Cell {
        (x.div_euclid(self.cell_size), y.div_euclid(self.cell_size))
    }

    pub fn cell_size(&self) -> i64 {
        self.cell_size
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn contains(&self, key: K) -> bool {
        self.positions.contains_key(&key)
    }

    pub fn position(&self, key: K) -> Option<(i64, i64)> {
        self.positions.get(&key).copied()
    }

    /// Insert an entity. Re-inserting an existing key moves it.
    pub fn insert(&mut self, key: K, x: i64, y: i64) {
        if self.positions.contains_key(&key) {
            self.remove(key);
        }
        let cell = self.cell(x, y);
        self.cells.entry(cell).or_default().push(key);
        self.positions.insert(key, (x, y));
    }

    /// Remove an entity, returning its last position.
    pub fn remove(&mut self, key: K) -> Option<(i64, i64)> {
        let (x, y) = self.positions.remove(&key)?;
        let cell = self.cell(x, y);
        if let Some(entries) = self.cells.get_mut(&cell) {
            if let Some(pos) = entries.iter().position(|&k| k == key) {
                entries.swap_remove(pos);
            }
            if entries.is_empty() {
                self.cells.remove(&cell);
            }
        }
        Some((x, y))
    }

    /// Move an entity to a new position.
    pub fn relocate(&mut self, key: K, x: i64, y: i64) {
        self.insert(key, x, y);
    }

    /// Candidate entities within `radius` of `(x, y)`; may contain false positives.
    pub fn query_radius(&self, x: i64, y: i64, radius: i64) -> Vec<K> {
        let radius = radius.max(0);
        let (min_cx, min_cy) = self.cell(x - radius, y - radius);
        let (max_cx, max_cy) = self.cell(x + radius, y + radius);

        let mut result = Vec::new();
        for cx in min_cx..=max_cx {
            for cy in min_cy..=max_cy {
                if let Some(entries) = self.cells.get(&(cx, cy)) {
                    result.extend_from_slice(entries);
                }
            }
        }
        result
    }

    /// Entities whose exact distance to `(x, y)` is at most `radius`, sorted by key.
    pub fn query_within(&self, x: i64, y: i64, radius: i64) -> Vec<K> {
        let radius_sq = radius * radius;
        let mut result: Vec<K> = self
            .query_radius(x, y, radius)
            .into_iter()
            .filter(|key| {
                self.positions
                    .get(key)
                    .map(|&(kx, ky)| distance_squared(x, y, kx, ky) <= radius_sq)
                    .unwrap_or(false)
            })
            .collect();
        result.sort_unstable();
        result
    }

    /// Number of occupied cells and stored entities.
    pub fn stats(&self) -> (usize, usize) {
        (self.cells.len(), self.positions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_never_misses_cell_boundary() {
        let mut grid = SpatialIndex::new(100);
        grid.insert(1usize, 99, 99);
        grid.insert(2usize, 100, 100);
        grid.insert(3usize, 450, 0);

        let hits = grid.query_within(100, 100, 2);
        assert_eq!(hits, vec![1, 2]);
        assert!(!grid.query_radius(100, 100, 50).contains(&3));
    }

    #[test]
    fn test_remove_drops_empty_cells() {
        let mut grid = SpatialIndex::new(10);
        grid.insert(7u32, 5, 5);
        assert_eq!(grid.stats(), (1, 1));
        assert_eq!(grid.remove(7), Some((5, 5)));
        assert_eq!(grid.stats(), (0, 0));
        assert_eq!(grid.remove(7), None);
    }
}
