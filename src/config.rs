//! Session configuration as handed over by the menu layer

use crate::adaptive::DifficultyLevel;
use crate::board::Board;
use crate::error::Result;

/// Who makes the first move of each game
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Seat {
    Human,
    Machine,
}

/// Validated session setup: board geometry, difficulty and first mover
#[derive(Copy, Clone, Debug)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    pub level: DifficultyLevel,
    pub first_mover: Seat,
}

impl GameConfig {
    /// Builds a configuration, rejecting unusable dimensions up front
    pub fn new(
        rows: usize,
        cols: usize,
        level: DifficultyLevel,
        first_mover: Seat,
    ) -> Result<Self> {
        Board::check_dimensions(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            level,
            first_mover,
        })
    }

    /// The classic 6x7 board
    pub fn standard(level: DifficultyLevel, first_mover: Seat) -> Self {
        Self {
            rows: 6,
            cols: 7,
            level,
            first_mover,
        }
    }

    /// The small 5x4 board
    pub fn compact(level: DifficultyLevel, first_mover: Seat) -> Self {
        Self {
            rows: 5,
            cols: 4,
            level,
            first_mover,
        }
    }

    /// A fresh, empty board for this configuration
    pub fn board(&self) -> Result<Board> {
        Board::new(self.rows, self.cols)
    }
}
