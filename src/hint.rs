//! Move suggestion facade
//!
//! A hint is the engine's genuine best judgment at a reduced depth: never
//! deeper than the active difficulty profile and never randomized, so a
//! suggestion cannot outplay the opponent it is meant to help against.

use crate::adaptive::SessionContext;
use crate::board::{Board, Side};
use crate::error::Result;
use crate::search::{SearchConfig, SearchEngine};

/// Search depth used for suggestions, capped by the active profile
pub const SUGGESTION_DEPTH: u8 = 2;

/// Suggests a column for `side` to play.
///
/// Leaves the board unchanged and records the request in the session's
/// performance tracker. Fails with `NoLegalMoves` on a full board.
pub fn suggest(
    engine: &mut SearchEngine,
    board: &mut Board,
    side: Side,
    session: &mut SessionContext,
) -> Result<usize> {
    let depth = session.controller.profile().depth.min(SUGGESTION_DEPTH);
    // with_depth carries no imperfection, so a hint is never randomized
    let config = SearchConfig::with_depth(depth);
    let outcome = engine.best_move(board, side, &config)?;
    session.tracker.record_hint();
    Ok(outcome.column)
}
