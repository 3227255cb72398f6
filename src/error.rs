use std::time::Duration;

use thiserror::Error;

/// All failures surfaced by the engine.
///
/// The illegal-move and no-legal-move variants indicate caller bugs: the
/// presentation layer is expected to consult `legal_columns`/`is_full` before
/// issuing a request. The configuration variants are fatal at session setup.
/// No variant leaves the board partially mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// Attempted to play outside the board
    #[error("column {column} is out of range, the board has {cols} columns")]
    ColumnOutOfRange { column: usize, cols: usize },

    /// Attempted to play into a full column
    #[error("column {column} is full")]
    ColumnFull { column: usize },

    /// Attempted to undo from an empty column
    #[error("column {column} is empty, nothing to undo")]
    ColumnEmpty { column: usize },

    /// Search was invoked on a full board
    #[error("no legal moves remain")]
    NoLegalMoves,

    /// A board dimension is outside the supported range
    #[error("board dimension {value} is outside the supported range {min}..={max}")]
    DimensionOutOfRange {
        value: usize,
        min: usize,
        max: usize,
    },

    /// The win length cannot fit along either board axis
    #[error("win length {win_length} exceeds both dimensions of a {rows}x{cols} board")]
    WinLengthTooLarge {
        win_length: usize,
        rows: usize,
        cols: usize,
    },

    /// A search was requested with a depth limit of zero
    #[error("search depth must be at least 1")]
    ZeroDepth,

    /// The move-time budget cannot guarantee a completed depth-1 search
    #[error("time budget {budget:?} is below the minimum of {min:?}")]
    TimeBudgetTooSmall { budget: Duration, min: Duration },
}

pub type Result<T> = std::result::Result<T, GameError>;
