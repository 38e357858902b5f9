//! Walled grid environment
//!
//! The user-supplied `R x C` matrix is stored inside a ring of walls, so
//! every interior cell has four neighbors and lookups never leave the grid.
//! Coordinates are 1-based interior positions.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::machine::Neighborhood;
use crate::SimulationError;

/// Cell kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Free and not yet visited
    Empty,
    /// Obstacle or border
    Wall,
    /// Free and visited at least once
    Visited,
    /// Current bot cell (view overlay only, never stored)
    Bot,
}

/// Interior grid coordinate (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Row, 1..=rows
    pub row: usize,
    /// Column, 1..=cols
    pub col: usize,
}

impl Position {
    /// Create position
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Neighbor one step along `(d_row, d_col)`
    ///
    /// Saturates at zero; only called on interior cells whose neighbors
    /// are inside the border ring.
    pub fn offset(&self, (d_row, d_col): (isize, isize)) -> Self {
        Self {
            row: self.row.saturating_add_signed(d_row),
            col: self.col.saturating_add_signed(d_col),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Bordered grid with visited bookkeeping
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// Interior rows
    rows: usize,
    /// Interior columns
    cols: usize,
    /// Row-major cells including the border, (rows + 2) x (cols + 2)
    cells: Vec<Cell>,
    /// Cells still Empty
    remaining: usize,
}

impl Grid {
    /// Build from a matrix of 0 (free) / 1 (wall) values
    pub fn build(raw_rows: &[Vec<u8>]) -> Result<Self, SimulationError> {
        let rows = raw_rows.len();
        let cols = raw_rows.first().map(Vec::len).unwrap_or(0);
        if rows == 0 || cols == 0 {
            return Err(SimulationError::InvalidGrid("grid has no cells".to_string()));
        }

        let width = cols + 2;
        let mut cells = vec![Cell::Wall; (rows + 2) * width];
        let mut remaining = 0;

        for (r, raw) in raw_rows.iter().enumerate() {
            if raw.len() != cols {
                return Err(SimulationError::InvalidGrid(format!(
                    "row {} has {} cells, expected {}",
                    r + 1,
                    raw.len(),
                    cols
                )));
            }
            for (c, &value) in raw.iter().enumerate() {
                let cell = match value {
                    0 => {
                        remaining += 1;
                        Cell::Empty
                    }
                    1 => Cell::Wall,
                    other => {
                        return Err(SimulationError::InvalidGrid(format!(
                            "value {} at ({}, {}) is neither 0 nor 1",
                            other,
                            r + 1,
                            c + 1
                        )))
                    }
                };
                cells[(r + 1) * width + c + 1] = cell;
            }
        }

        Ok(Self {
            rows,
            cols,
            cells,
            remaining,
        })
    }

    /// Interior row count
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Interior column count
    pub fn cols(&self) -> usize {
        self.cols
    }

    fn index(&self, pos: Position) -> usize {
        pos.row * (self.cols + 2) + pos.col
    }

    /// Whether `pos` is an interior coordinate
    pub fn contains(&self, pos: Position) -> bool {
        (1..=self.rows).contains(&pos.row) && (1..=self.cols).contains(&pos.col)
    }

    /// Cell at `pos`; border coordinates (row/col 0 or n + 1) are valid
    pub fn cell(&self, pos: Position) -> Cell {
        self.cells[self.index(pos)]
    }

    /// Whether `pos` is a wall
    pub fn is_wall(&self, pos: Position) -> bool {
        self.cell(pos) == Cell::Wall
    }

    /// Wall signature around an interior cell, in N, E, W, S order
    pub fn neighborhood(&self, pos: Position) -> Neighborhood {
        Neighborhood::from_walls([
            self.is_wall(Position::new(pos.row - 1, pos.col)),
            self.is_wall(Position::new(pos.row, pos.col + 1)),
            self.is_wall(Position::new(pos.row, pos.col - 1)),
            self.is_wall(Position::new(pos.row + 1, pos.col)),
        ])
    }

    /// Mark `pos` visited; true only on the first visit
    pub fn mark_visited(&mut self, pos: Position) -> bool {
        let idx = self.index(pos);
        if self.cells[idx] == Cell::Empty {
            self.cells[idx] = Cell::Visited;
            self.remaining -= 1;
            true
        } else {
            false
        }
    }

    /// Free cells not yet visited
    pub fn remaining_unvisited(&self) -> usize {
        self.remaining
    }

    /// Non-wall interior cells in row-major order
    pub fn free_cells(&self) -> Vec<Position> {
        (1..=self.rows)
            .flat_map(|row| (1..=self.cols).map(move |col| Position::new(row, col)))
            .filter(|&pos| !self.is_wall(pos))
            .collect()
    }

    /// One uniform draw over `free_cells`
    pub fn random_free_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Position> {
        self.free_cells().choose(rng).copied()
    }

    /// Interior cells with the bot overlaid, row by row
    pub fn view(&self, bot: Option<Position>) -> Vec<Vec<Cell>> {
        (1..=self.rows)
            .map(|row| {
                (1..=self.cols)
                    .map(|col| {
                        let pos = Position::new(row, col);
                        if Some(pos) == bot {
                            Cell::Bot
                        } else {
                            self.cell(pos)
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn room() -> Grid {
        Grid::build(&[vec![0, 0, 0], vec![0, 1, 0]]).unwrap()
    }

    #[test]
    fn test_border_is_wall() {
        let grid = room();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        for col in 0..=4 {
            assert!(grid.is_wall(Position::new(0, col)));
            assert!(grid.is_wall(Position::new(3, col)));
        }
        assert!(grid.is_wall(Position::new(1, 0)));
        assert!(grid.is_wall(Position::new(2, 4)));
        assert_eq!(grid.remaining_unvisited(), 5);
    }

    #[test]
    fn test_neighborhood_reads_news() {
        let grid = room();
        // Top-left: wall to the north and west, free east and south
        assert_eq!(grid.neighborhood(Position::new(1, 1)).to_string(), "NXWX");
        // Top-middle: inner wall to the south
        assert_eq!(grid.neighborhood(Position::new(1, 2)).to_string(), "NXXS");
        // Bottom-right: inner wall to the west
        assert_eq!(grid.neighborhood(Position::new(2, 3)).to_string(), "XEWS");
    }

    #[test]
    fn test_mark_visited_is_idempotent() {
        let mut grid = room();
        let pos = Position::new(1, 1);
        assert!(grid.mark_visited(pos));
        assert!(!grid.mark_visited(pos));
        assert_eq!(grid.remaining_unvisited(), 4);
        assert_eq!(grid.cell(pos), Cell::Visited);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            Grid::build(&[]),
            Err(SimulationError::InvalidGrid(_))
        ));
        assert!(matches!(
            Grid::build(&[vec![0, 0], vec![0]]),
            Err(SimulationError::InvalidGrid(_))
        ));
        assert!(matches!(
            Grid::build(&[vec![0, 2]]),
            Err(SimulationError::InvalidGrid(_))
        ));
    }

    #[test]
    fn test_free_cells_and_random_draw() {
        let grid = room();
        let free = grid.free_cells();
        assert_eq!(free.len(), 5);
        assert!(!free.contains(&Position::new(2, 2)));

        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..10 {
            let pick = grid.random_free_cell(&mut a).unwrap();
            assert!(free.contains(&pick));
            assert_eq!(Some(pick), grid.random_free_cell(&mut b));
        }

        let walled = Grid::build(&[vec![1]]).unwrap();
        assert_eq!(walled.random_free_cell(&mut a), None);
    }

    #[test]
    fn test_view_overlays_bot() {
        let grid = room();
        let view = grid.view(Some(Position::new(2, 1)));
        assert_eq!(view[1][0], Cell::Bot);
        assert_eq!(view[1][1], Cell::Wall);
        assert_eq!(view[0][0], Cell::Empty);
    }
}
