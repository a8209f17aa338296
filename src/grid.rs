// Grid geometry for an arbitrary cols x rows board
//
// No board object is materialised: cells are classified on demand by the
// callers (blocked = in some body set, free otherwise).

use crate::types::Coord;

/// Board dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub cols: i32,
    pub rows: i32,
}

impl Grid {
    pub fn new(cols: i32, rows: i32) -> Self {
        Grid { cols, rows }
    }

    /// True iff 0 <= x < cols and 0 <= y < rows
    pub fn in_bounds(&self, pos: Coord) -> bool {
        pos.x >= 0 && pos.x < self.cols && pos.y >= 0 && pos.y < self.rows
    }

    /// In-bounds 4-neighbours of `pos`, always in the order +x, -x, +y, -y.
    /// Downstream tie-breaking depends on this order.
    pub fn neighbors(&self, pos: Coord) -> Vec<Coord> {
        [
            Coord::new(pos.x + 1, pos.y),
            Coord::new(pos.x - 1, pos.y),
            Coord::new(pos.x, pos.y + 1),
            Coord::new(pos.x, pos.y - 1),
        ]
        .iter()
        .copied()
        .filter(|&c| self.in_bounds(c))
        .collect()
    }

    /// Total number of cells on the board
    pub fn cell_count(&self) -> usize {
        (self.cols.max(0) as usize) * (self.rows.max(0) as usize)
    }

    /// Dense index of an in-bounds cell, used by the search scratch buffers
    pub fn index_of(&self, pos: Coord) -> Option<usize> {
        if self.in_bounds(pos) {
            Some((pos.y * self.cols + pos.x) as usize)
        } else {
            None
        }
    }

    /// Every cell, enumerated column by column (x outer, y inner)
    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.cols).flat_map(move |x| (0..self.rows).map(move |y| Coord::new(x, y)))
    }
}
