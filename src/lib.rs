//! An adaptive agent for playing the board game 'Connect 4'
//!
//! This agent picks its moves with a depth-limited game tree search and
//! retunes its own strength between games from the human player's results.
//!
//! # Basic Usage
//!
//! ```
//! use connect4_engine::board::{Board, Side};
//! use connect4_engine::search::{SearchConfig, SearchEngine};
//!
//!# use connect4_engine::error::GameError;
//!# fn main() -> Result<(), GameError> {
//! let mut board = Board::new(6, 7)?;
//! let mut engine = SearchEngine::new();
//! let outcome = engine.best_move(&mut board, Side::Red, &SearchConfig::with_depth(4))?;
//!
//! assert_eq!(outcome.column, 3);
//!# Ok(())
//!# }
//! ```

use static_assertions::*;

pub mod adaptive;

pub mod board;

pub mod config;

pub mod error;

pub mod evaluator;

pub mod hint;

pub mod search;

pub mod transposition_table;


/// The number of aligned discs that wins a game
pub const WIN_LENGTH: usize = 4;

/// The smallest supported board dimension
pub const MIN_BOARD_SIZE: usize = 4;

/// The largest supported board dimension
pub const MAX_BOARD_SIZE: usize = 8;

// ensure that the largest board fits in a u128 for the position fingerprint
const_assert!(MAX_BOARD_SIZE * (MAX_BOARD_SIZE + 1) < 128);
