//! The board: an M×N grid of marks with node/link geometry.
//!
//! Storage is a flat row-major `Vec`: `cells[row * columns + col]`.
//! Out-of-range access panics; callers only ever address cells derived from
//! the board's own geometry.

use crate::types::{Coord, Mark};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    columns: usize,
    cells: Vec<Mark>,
}

impl Board {
    /// A board with every cell set to `Wall`.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![Mark::Wall; rows * columns],
        }
    }

    #[inline(always)]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline(always)]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[inline(always)]
    pub fn get(&self, (row, col): Coord) -> Mark {
        assert!(row < self.rows && col < self.columns, "cell ({row}, {col}) is off the board");
        self.cells[row * self.columns + col]
    }

    #[inline(always)]
    pub fn set(&mut self, (row, col): Coord, mark: Mark) {
        assert!(row < self.rows && col < self.columns, "cell ({row}, {col}) is off the board");
        self.cells[row * self.columns + col] = mark;
    }

    pub fn cells(&self) -> &[Mark] {
        &self.cells
    }

    /// Rendering weights, row-major.
    pub fn weights(&self) -> Vec<u8> {
        self.cells.iter().map(|m| m.weight()).collect()
    }

    /// Count cells carrying `mark`.
    pub fn count(&self, mark: Mark) -> usize {
        self.cells.iter().filter(|&&m| m == mark).count()
    }

    #[inline(always)]
    pub fn is_node(&self, (row, col): Coord) -> bool {
        row % 2 == 1 && col % 2 == 1 && row < self.rows - 1 && col < self.columns - 1
    }

    #[inline(always)]
    pub fn is_border(&self, (row, col): Coord) -> bool {
        row == 0 || col == 0 || row == self.rows - 1 || col == self.columns - 1
    }

    /// Node cells two steps away (up, down, left, right) that stay strictly
    /// inside the outer frame.
    pub fn node_neighbors(&self, (row, col): Coord) -> Vec<Coord> {
        let mut neighbors = Vec::with_capacity(4);
        if row >= 3 {
            neighbors.push((row - 2, col));
        }
        if row + 2 < self.rows - 1 {
            neighbors.push((row + 2, col));
        }
        if col >= 3 {
            neighbors.push((row, col - 2));
        }
        if col + 2 < self.columns - 1 {
            neighbors.push((row, col + 2));
        }
        neighbors
    }

    /// The link cell joining two node cells two steps apart.
    #[inline(always)]
    pub fn link_between(a: Coord, b: Coord) -> Coord {
        ((a.0 + b.0) / 2, (a.1 + b.1) / 2)
    }

    /// The node cell one step inside from a border cell.
    pub fn step_inward(&self, (row, col): Coord) -> Coord {
        if row == 0 {
            (1, col)
        } else if row == self.rows - 1 {
            (self.rows - 2, col)
        } else if col == 0 {
            (row, 1)
        } else if col == self.columns - 1 {
            (row, self.columns - 2)
        } else {
            (row, col)
        }
    }

    /// All node cells in row-major order.
    pub fn node_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        (1..self.rows.saturating_sub(1))
            .step_by(2)
            .flat_map(move |row| (1..self.columns.saturating_sub(1)).step_by(2).map(move |col| (row, col)))
    }
}
