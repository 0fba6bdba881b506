//! Cell storage implementation
//!
//! Sparse row-based storage for occupied cells, plus per-row and per-column
//! occupancy counters. The printable size is derived from the counters: it
//! is always the smallest box covering every occupied slot, so releasing the
//! last cell of a trailing row or column shrinks it immediately.

use std::collections::BTreeMap;

use gridcalc_core::{Position, Size};
use tracing::trace;

use crate::cell::Cell;

/// Sparse storage for sheet cells
///
/// Structure: `BTreeMap<row, BTreeMap<col, Cell>>`, ordered so printing can
/// walk rows and columns in sequence.
#[derive(Debug, Default)]
pub struct CellStorage {
    /// Row index → column map
    rows: BTreeMap<i32, BTreeMap<i32, Cell>>,

    /// Occupied slots per row; rows with no slots have no entry
    row_counts: BTreeMap<i32, usize>,

    /// Occupied slots per column; columns with no slots have no entry
    col_counts: BTreeMap<i32, usize>,

    /// Cached printable size, kept in step with the counters
    size: Size,
}

impl CellStorage {
    /// Create a new empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cell
    pub fn get(&self, pos: Position) -> Option<&Cell> {
        self.rows.get(&pos.row).and_then(|r| r.get(&pos.col))
    }

    /// Get a mutable cell
    pub fn get_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        self.rows.get_mut(&pos.row).and_then(|r| r.get_mut(&pos.col))
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.get(pos).is_some()
    }

    /// Get the cell at `pos`, creating an empty one if the slot is free.
    ///
    /// Creating a cell grows the printable size to include `pos`.
    pub fn occupy(&mut self, pos: Position) -> &mut Cell {
        let row = self.rows.entry(pos.row).or_default();
        if !row.contains_key(&pos.col) {
            *self.row_counts.entry(pos.row).or_default() += 1;
            *self.col_counts.entry(pos.col).or_default() += 1;
            let size = Size::new(
                self.size.rows.max(pos.row + 1),
                self.size.cols.max(pos.col + 1),
            );
            if size != self.size {
                trace!(rows = size.rows, cols = size.cols, "grid grown");
                self.size = size;
            }
        }
        row.entry(pos.col).or_default()
    }

    /// Remove the cell at `pos`, shrinking the printable size if it was on
    /// the boundary
    pub fn release(&mut self, pos: Position) -> Option<Cell> {
        let row = self.rows.get_mut(&pos.row)?;
        let cell = row.remove(&pos.col)?;
        if row.is_empty() {
            self.rows.remove(&pos.row);
        }

        decrement(&mut self.row_counts, pos.row);
        decrement(&mut self.col_counts, pos.col);
        self.shrink_to_fit();

        Some(cell)
    }

    /// Recompute the printable size from the occupancy counters
    fn shrink_to_fit(&mut self) {
        let size = Size::new(extent(&self.row_counts), extent(&self.col_counts));
        if size != self.size {
            trace!(rows = size.rows, cols = size.cols, "grid shrunk");
            self.size = size;
        }
    }

    /// Smallest box covering every occupied slot
    pub fn size(&self) -> Size {
        self.size
    }

    /// Number of occupied slots
    pub fn cell_count(&self) -> usize {
        self.rows.values().map(|r| r.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over occupied cells in row order
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> {
        self.rows.iter().flat_map(|(&row, cols)| {
            cols.iter()
                .map(move |(&col, cell)| (Position::new(row, col), cell))
        })
    }

    /// Iterate over all cells in `row` in column order
    pub fn iter_row(&self, row: i32) -> impl Iterator<Item = (i32, &Cell)> {
        self.rows
            .get(&row)
            .into_iter()
            .flat_map(|cols| cols.iter().map(|(&col, cell)| (col, cell)))
    }

    /// Occupied slot counts for a row and a column, for consistency checks
    pub fn occupancy(&self, row: i32, col: i32) -> (usize, usize) {
        (
            self.row_counts.get(&row).copied().unwrap_or(0),
            self.col_counts.get(&col).copied().unwrap_or(0),
        )
    }
}

fn decrement(counts: &mut BTreeMap<i32, usize>, key: i32) {
    if let Some(count) = counts.get_mut(&key) {
        *count -= 1;
        if *count == 0 {
            counts.remove(&key);
        }
    }
}

fn extent(counts: &BTreeMap<i32, usize>) -> i32 {
    counts.keys().next_back().map_or(0, |&last| last + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pos(row: i32, col: i32) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn test_storage_get_set() {
        let mut storage = CellStorage::new();
        assert!(storage.is_empty());

        storage.occupy(pos(0, 0));
        storage.occupy(pos(5, 10));

        assert!(storage.contains(pos(0, 0)));
        assert!(storage.contains(pos(5, 10)));
        assert!(!storage.contains(pos(1, 1)));
        assert_eq!(storage.cell_count(), 2);
    }

    #[test]
    fn test_occupy_is_idempotent() {
        let mut storage = CellStorage::new();
        storage.occupy(pos(2, 2));
        storage.occupy(pos(2, 2));

        assert_eq!(storage.cell_count(), 1);
        assert_eq!(storage.occupancy(2, 2), (1, 1));
        assert_eq!(storage.size(), Size::new(3, 3));
    }

    #[test]
    fn test_size_grows_and_shrinks() {
        let mut storage = CellStorage::new();
        assert_eq!(storage.size(), Size::new(0, 0));

        storage.occupy(pos(1, 1));
        storage.occupy(pos(4, 0));
        storage.occupy(pos(0, 6));
        assert_eq!(storage.size(), Size::new(5, 7));

        storage.release(pos(4, 0));
        assert_eq!(storage.size(), Size::new(2, 7));

        storage.release(pos(0, 6));
        assert_eq!(storage.size(), Size::new(2, 2));

        storage.release(pos(1, 1));
        assert_eq!(storage.size(), Size::new(0, 0));
        assert!(storage.is_empty());
    }

    #[test]
    fn test_release_inner_cell_keeps_size() {
        let mut storage = CellStorage::new();
        storage.occupy(pos(0, 0));
        storage.occupy(pos(3, 3));

        storage.release(pos(0, 0));
        assert_eq!(storage.size(), Size::new(4, 4));
        assert_eq!(storage.occupancy(0, 0), (0, 0));
    }

    #[test]
    fn test_release_missing_cell() {
        let mut storage = CellStorage::new();
        storage.occupy(pos(1, 1));
        assert!(storage.release(pos(0, 0)).is_none());
        assert!(storage.release(pos(1, 0)).is_none());
        assert_eq!(storage.occupancy(1, 1), (1, 1));
        assert_eq!(storage.size(), Size::new(2, 2));
    }

    #[test]
    fn test_iteration_order() {
        let mut storage = CellStorage::new();
        storage.occupy(pos(2, 0));
        storage.occupy(pos(0, 3));
        storage.occupy(pos(0, 1));

        let positions: Vec<_> = storage.iter().map(|(p, _)| p).collect();
        assert_eq!(positions, vec![pos(0, 1), pos(0, 3), pos(2, 0)]);

        let cols: Vec<_> = storage.iter_row(0).map(|(c, _)| c).collect();
        assert_eq!(cols, vec![1, 3]);
        assert_eq!(storage.iter_row(1).count(), 0);
    }
}
