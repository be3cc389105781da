//! Fixed 15x15 grid of stones

use serde::{Deserialize, Serialize};

use super::{Pos, Stone, BOARD_SIZE, TOTAL_CELLS};
use crate::error::BoardError;

/// Game board
///
/// Pure data: occupancy rules are enforced by `GameState`, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [[Stone; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [[Stone::Empty; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        BOARD_SIZE
    }

    /// Get stone at position
    #[inline]
    pub fn get(&self, pos: Pos) -> Stone {
        self.cells[pos.row as usize][pos.col as usize]
    }

    /// Place (or clear, with `Stone::Empty`) a stone
    #[inline]
    pub fn set(&mut self, pos: Pos, stone: Stone) {
        self.cells[pos.row as usize][pos.col as usize] = stone;
    }

    /// Bounds-checked read by raw coordinates
    pub fn get_at(&self, row: usize, col: usize) -> Result<Stone, BoardError> {
        Pos::try_new(row, col).map(|pos| self.get(pos))
    }

    /// Bounds-checked write by raw coordinates
    pub fn set_at(&mut self, row: usize, col: usize, stone: Stone) -> Result<(), BoardError> {
        let pos = Pos::try_new(row, col)?;
        self.set(pos, stone);
        Ok(())
    }

    /// Check if position is empty
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.get(pos) == Stone::Empty
    }

    /// Total stones on board
    pub fn stone_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&s| s != Stone::Empty)
            .count()
    }

    /// Stones of one color
    pub fn count(&self, stone: Stone) -> usize {
        self.cells.iter().flatten().filter(|&&s| s == stone).count()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.stone_count() == TOTAL_CELLS
    }

    /// Check if board is empty
    pub fn is_board_empty(&self) -> bool {
        self.stone_count() == 0
    }

    /// Empty cells in row-major order
    pub fn empty_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..TOTAL_CELLS)
            .map(Pos::from_index)
            .filter(move |&p| self.is_empty(p))
    }

    /// Occupied cells with their stone, in row-major order
    pub fn stones(&self) -> impl Iterator<Item = (Pos, Stone)> + '_ {
        (0..TOTAL_CELLS).map(Pos::from_index).filter_map(move |p| {
            let s = self.get(p);
            (s != Stone::Empty).then_some((p, s))
        })
    }

    /// True if any stone lies within Chebyshev distance `radius` of `pos`
    pub fn has_neighbor(&self, pos: Pos, radius: i32) -> bool {
        for dr in -radius..=radius {
            for dc in -radius..=radius {
                if dr == 0 && dc == 0 {
                    continue;
                }
                if let Some(p) = pos.offset(dr, dc, 1) {
                    if !self.is_empty(p) {
                        return true;
                    }
                }
            }
        }
        false
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
