//! Grid model for the playing board
//!
//! Cells are stored left-to-right, bottom-to-top (row 0 is the bottom row)
//! with a per-column fill height for O(1) legality checks. Alongside the cell
//! array the board maintains two bitmasks over a single `u128`, laid out one
//! column per `rows + 1` bits; from these it derives a canonical fingerprint
//! of (grid contents, side to move) used as the transposition cache key.

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::error::{GameError, Result};
use crate::{MAX_BOARD_SIZE, MIN_BOARD_SIZE, WIN_LENGTH};

/// The four alignment directions as (row, column) deltas
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// One of the two players' disc colours
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Side {
    Red,
    Yellow,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Red => Side::Yellow,
            Side::Yellow => Side::Red,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Red => write!(f, "Red"),
            Side::Yellow => write!(f, "Yellow"),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    rows: usize,
    cols: usize,
    win_length: usize,
    // cells are stored left-to-right, bottom-to-top
    cells: Vec<Option<Side>>,
    heights: Vec<usize>,
    to_move: Side,
    num_moves: usize,
    // mask of red discs and mask of all discs, one column per rows + 1 bits
    red_mask: u128,
    all_mask: u128,
}

impl Board {
    /// Creates an empty board with Red to move.
    ///
    /// Fails with a configuration error if either dimension is outside
    /// the supported range or the win length fits along neither axis.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        Self::check_dimensions(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            win_length: WIN_LENGTH,
            cells: vec![None; rows * cols],
            heights: vec![0; cols],
            to_move: Side::Red,
            num_moves: 0,
            red_mask: 0,
            all_mask: 0,
        })
    }

    /// Validates board dimensions without constructing a board
    pub fn check_dimensions(rows: usize, cols: usize) -> Result<()> {
        for value in [rows, cols] {
            if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&value) {
                return Err(GameError::DimensionOutOfRange {
                    value,
                    min: MIN_BOARD_SIZE,
                    max: MAX_BOARD_SIZE,
                });
            }
        }
        if WIN_LENGTH > rows && WIN_LENGTH > cols {
            return Err(GameError::WinLengthTooLarge {
                win_length: WIN_LENGTH,
                rows,
                cols,
            });
        }
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn win_length(&self) -> usize {
        self.win_length
    }

    pub fn num_moves(&self) -> usize {
        self.num_moves
    }

    pub fn to_move(&self) -> Side {
        self.to_move
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<Side> {
        self.cells[col + self.cols * row]
    }

    pub fn height(&self, column: usize) -> usize {
        self.heights[column]
    }

    pub fn playable(&self, column: usize) -> bool {
        column < self.cols && self.heights[column] < self.rows
    }

    /// Columns that can still take a disc, in ascending order.
    /// Empty exactly when the board is full.
    pub fn legal_columns(&self) -> Vec<usize> {
        (0..self.cols).filter(|&c| self.playable(c)).collect()
    }

    pub fn is_full(&self) -> bool {
        self.num_moves == self.rows * self.cols
    }

    /// Places a disc for `side`, returning the row it landed in
    pub fn drop_piece(&mut self, column: usize, side: Side) -> Result<usize> {
        self.check_playable(column)?;
        Ok(self.place_unchecked(column, side))
    }

    /// Places a disc behind a guard that retracts it again when dropped,
    /// whatever path control takes out of the enclosing scope
    pub fn place(&mut self, column: usize, side: Side) -> Result<PlacedDisc<'_>> {
        self.check_playable(column)?;
        let row = self.place_unchecked(column, side);
        Ok(PlacedDisc {
            board: self,
            column,
            row,
        })
    }

    /// Removes the top disc of a column
    pub fn undo(&mut self, column: usize) -> Result<()> {
        if column >= self.cols {
            return Err(GameError::ColumnOutOfRange {
                column,
                cols: self.cols,
            });
        }
        if self.heights[column] == 0 {
            return Err(GameError::ColumnEmpty { column });
        }
        self.retract(column);
        Ok(())
    }

    fn check_playable(&self, column: usize) -> Result<()> {
        if column >= self.cols {
            return Err(GameError::ColumnOutOfRange {
                column,
                cols: self.cols,
            });
        }
        if self.heights[column] >= self.rows {
            return Err(GameError::ColumnFull { column });
        }
        Ok(())
    }

    fn place_unchecked(&mut self, column: usize, side: Side) -> usize {
        let row = self.heights[column];
        self.cells[column + self.cols * row] = Some(side);
        let bit = self.bit(row, column);
        if side == Side::Red {
            self.red_mask |= bit;
        }
        self.all_mask |= bit;
        self.heights[column] += 1;
        self.num_moves += 1;
        self.to_move = side.opponent();
        row
    }

    fn retract(&mut self, column: usize) {
        let row = self.heights[column] - 1;
        let Some(side) = self.cells[column + self.cols * row].take() else {
            // heights and cells always move together
            debug_assert!(false, "fill height points at an empty cell");
            return;
        };
        let bit = self.bit(row, column);
        if side == Side::Red {
            self.red_mask &= !bit;
        }
        self.all_mask &= !bit;
        self.heights[column] -= 1;
        self.num_moves -= 1;
        self.to_move = side;
    }

    fn bit(&self, row: usize, column: usize) -> u128 {
        1u128 << (column * (self.rows + 1) + row)
    }

    /// Checks the four directions through the given cell for an alignment
    /// of `win_length`. This localized check is the win test performed after
    /// every placement; it never scans the whole board.
    pub fn winner_at(&self, row: usize, col: usize) -> Option<Side> {
        let side = self.cell(row, col)?;
        for (dr, dc) in DIRECTIONS {
            let run = 1
                + self.run_length(row, col, dr, dc, side)
                + self.run_length(row, col, -dr, -dc, side);
            if run >= self.win_length {
                return Some(side);
            }
        }
        None
    }

    /// Would dropping into this column complete an alignment for `side`?
    pub fn is_winning_drop(&self, column: usize, side: Side) -> bool {
        if !self.playable(column) {
            return false;
        }
        let row = self.heights[column];
        for (dr, dc) in DIRECTIONS {
            let run = 1
                + self.run_length(row, column, dr, dc, side)
                + self.run_length(row, column, -dr, -dc, side);
            if run >= self.win_length {
                return true;
            }
        }
        false
    }

    fn run_length(&self, row: usize, col: usize, dr: isize, dc: isize, side: Side) -> usize {
        let mut run = 0;
        let mut r = row as isize + dr;
        let mut c = col as isize + dc;
        while r >= 0
            && r < self.rows as isize
            && c >= 0
            && c < self.cols as isize
            && self.cell(r as usize, c as usize) == Some(side)
        {
            run += 1;
            r += dr;
            c += dc;
        }
        run
    }

    /// Canonical fingerprint of (grid contents, side to move).
    ///
    /// The sum of the mover's disc mask and the full disc mask identifies a
    /// position uniquely within the column-striped bit layout; the top bit
    /// distinguishes the mover on an otherwise empty board.
    pub fn fingerprint(&self) -> u128 {
        let mover_mask = match self.to_move {
            Side::Red => self.red_mask,
            Side::Yellow => self.red_mask ^ self.all_mask,
        };
        let side_bit = match self.to_move {
            Side::Red => 0,
            Side::Yellow => 1u128 << 127,
        };
        (mover_mask + self.all_mask) | side_bit
    }
}

/// Scoped "move applied" state: the disc placed on creation is retracted
/// when the guard goes out of scope, so a search step can never leave the
/// board permanently altered, even on an early return.
pub struct PlacedDisc<'a> {
    board: &'a mut Board,
    column: usize,
    row: usize,
}

impl PlacedDisc<'_> {
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn column(&self) -> usize {
        self.column
    }
}

impl Deref for PlacedDisc<'_> {
    type Target = Board;

    fn deref(&self) -> &Self::Target {
        self.board
    }
}

impl DerefMut for PlacedDisc<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.board
    }
}

impl Drop for PlacedDisc<'_> {
    fn drop(&mut self) {
        self.board.retract(self.column);
    }
}
