//! Depth-limited game tree search with alpha-beta pruning
//!
//! The search is a negamax over the board's mutate-then-undo discipline:
//! a disc is placed behind a `PlacedDisc` guard before recursing and
//! retracted when the guard leaves scope, so the board always comes back
//! from a search exactly as it went in.
//!
//! Every node first looks for an immediate winning drop, then for a draw,
//! and only then recurses; columns are tried from the middle outwards with
//! the cached best column first, which tightens pruning without changing
//! the chosen value. Root columns are each searched with a full window so
//! all of them receive exact scores; the imperfection draw and the hint
//! facade both rely on that.
//!
//! A move-time budget drives iterative deepening: depth 1 first, then one
//! extra ply at a time, polling the deadline only between root siblings and
//! completed iterations, and always returning the last fully-completed
//! depth's result.

use std::time::{Duration, Instant};

use rand::prelude::*;
use rand::rngs::StdRng;

use crate::board::{Board, Side};
use crate::error::{GameError, Result};
use crate::evaluator::{self, WIN_SCORE};
use crate::transposition_table::{Bound, TranspositionTable};

/// A score below every reachable evaluation
const MIN_SCORE: i32 = -(WIN_SCORE + 1);

/// Smallest move-time budget that still guarantees a completed depth-1
/// search on the largest supported board
pub const MIN_TIME_BUDGET: Duration = Duration::from_millis(10);

/// Near-best tolerance used when no explicit value is configured
pub const DEFAULT_IMPERFECTION_TOLERANCE: i32 = 8;

/// Tunable parameters for a single `best_move` call
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Maximum search depth in plies
    pub depth: u8,
    /// Optional wall-clock budget for the whole call
    pub time_budget: Option<Duration>,
    /// Whether to consult and fill the transposition cache
    pub use_cache: bool,
    /// Probability of deliberately playing a near-best move instead of the
    /// best one; zero disables the draw entirely
    pub imperfection_rate: f64,
    /// How far below the best score a move may be and still count as
    /// near-best for the imperfection draw
    pub imperfection_tolerance: i32,
}

impl SearchConfig {
    /// A deterministic full-strength configuration at the given depth
    pub fn with_depth(depth: u8) -> Self {
        Self {
            depth,
            time_budget: None,
            use_cache: true,
            imperfection_rate: 0.0,
            imperfection_tolerance: DEFAULT_IMPERFECTION_TOLERANCE,
        }
    }
}

/// What a `best_move` call found
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    /// The column to play
    pub column: usize,
    /// Score of that column from the searching side's perspective
    pub score: i32,
    /// Every node visited across all completed iterations
    pub nodes_explored: usize,
    /// Deepest fully-completed iteration
    pub depth_reached: u8,
    /// Wall-clock time spent
    pub elapsed: Duration,
}

#[derive(Clone, Copy)]
struct RootMove {
    column: usize,
    score: i32,
}

/// Returns the board's columns ordered from the middle outwards, as the
/// middle columns are usually the better moves
pub fn column_order(cols: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..cols).collect();
    order.sort_by_key(|&c| ((2 * c as i32 - (cols as i32 - 1)).abs(), c));
    order
}

/// An agent that picks moves by searching the game tree
pub struct SearchEngine {
    transposition_table: TranspositionTable,
    // board geometry the cache entries belong to
    table_geometry: Option<(usize, usize, usize)>,
    node_count: usize,
    rng: StdRng,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self {
            transposition_table: TranspositionTable::new(),
            table_geometry: None,
            node_count: 0,
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates an engine with a fixed imperfection-draw seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            ..Self::new()
        }
    }

    /// Searches for the best move for `side` on the given board.
    ///
    /// The board is mutated during the search and restored before this
    /// returns. Fails with `NoLegalMoves` on a full board and with a
    /// configuration error on an unusable depth or time budget.
    pub fn best_move(
        &mut self,
        board: &mut Board,
        side: Side,
        config: &SearchConfig,
    ) -> Result<SearchOutcome> {
        if config.depth == 0 {
            return Err(GameError::ZeroDepth);
        }
        if let Some(budget) = config.time_budget {
            if budget < MIN_TIME_BUDGET {
                return Err(GameError::TimeBudgetTooSmall {
                    budget,
                    min: MIN_TIME_BUDGET,
                });
            }
        }
        if board.is_full() {
            return Err(GameError::NoLegalMoves);
        }

        self.refresh_table_for(board);
        self.node_count = 0;
        let start = Instant::now();
        let deadline = config.time_budget.map(|budget| start + budget);

        let mut completed: Option<(Vec<RootMove>, u8)> = None;
        for depth in 1..=config.depth {
            match self.search_root(board, side, depth, deadline, config.use_cache) {
                Some(root_moves) => completed = Some((root_moves, depth)),
                // deadline expired inside this iteration, keep the last one
                None => break,
            }
            if deadline.map_or(false, |d| Instant::now() >= d) {
                break;
            }
        }

        // not even depth 1 finished: the budget was unusable after all
        let (root_moves, depth_reached) =
            completed.ok_or_else(|| GameError::TimeBudgetTooSmall {
                budget: config.time_budget.unwrap_or(Duration::ZERO),
                min: MIN_TIME_BUDGET,
            })?;

        let (column, score) = self
            .select_column(board, &root_moves, config)
            .ok_or(GameError::NoLegalMoves)?;

        Ok(SearchOutcome {
            column,
            score,
            nodes_explored: self.node_count,
            depth_reached,
            elapsed: start.elapsed(),
        })
    }

    /// Cache entries are only meaningful for one board geometry
    fn refresh_table_for(&mut self, board: &Board) {
        let geometry = (board.rows(), board.cols(), board.win_length());
        if self.table_geometry != Some(geometry) {
            self.transposition_table.clear();
            self.table_geometry = Some(geometry);
        }
    }

    /// Searches every root column at the given depth, each with a full
    /// window so its score is exact. Returns `None` if the deadline expired
    /// before the iteration finished.
    fn search_root(
        &mut self,
        board: &mut Board,
        side: Side,
        depth: u8,
        deadline: Option<Instant>,
        use_cache: bool,
    ) -> Option<Vec<RootMove>> {
        let mut root_moves = Vec::with_capacity(board.cols());
        for column in column_order(board.cols()) {
            if deadline.map_or(false, |d| Instant::now() >= d) {
                return None;
            }
            self.node_count += 1;
            let mut placed = match board.place(column, side) {
                Ok(placed) => placed,
                Err(_) => continue,
            };
            let row = placed.row();
            let score = if placed.winner_at(row, column).is_some() {
                WIN_SCORE
            } else {
                -self.negamax(
                    &mut placed,
                    side.opponent(),
                    depth - 1,
                    MIN_SCORE,
                    -MIN_SCORE,
                    use_cache,
                )
            };
            drop(placed);
            root_moves.push(RootMove { column, score });
        }
        Some(root_moves)
    }

    /// Performs the game tree search.
    ///
    /// Returns the score of the position for the side to move.
    fn negamax(
        &mut self,
        board: &mut Board,
        side: Side,
        depth: u8,
        mut alpha: i32,
        beta: i32,
        use_cache: bool,
    ) -> i32 {
        self.node_count += 1;

        // no moves left: the game is drawn
        if board.is_full() {
            return 0;
        }

        // check for a next-move win for the current player
        for column in 0..board.cols() {
            if board.is_winning_drop(column, side) {
                return WIN_SCORE;
            }
        }

        if depth == 0 {
            return evaluator::score(board, side);
        }

        let key = board.fingerprint();
        if use_cache {
            if let Some(score) = self.transposition_table.probe(key, depth, alpha, beta) {
                return score;
            }
        }

        let alpha_in = alpha;
        let mut best = MIN_SCORE;
        let mut best_column = 0;
        for column in self.ordered_columns(board, key, use_cache) {
            let mut placed = match board.place(column, side) {
                Ok(placed) => placed,
                Err(_) => continue,
            };
            // the search window is flipped for the other player
            let score = -self.negamax(&mut placed, side.opponent(), depth - 1, -beta, -alpha, use_cache);
            drop(placed);

            if score > best {
                best = score;
                best_column = column;
            }
            if best > alpha {
                alpha = best;
            }
            // a perfect opponent will not pick this branch
            if alpha >= beta {
                break;
            }
        }

        if use_cache {
            let bound = if best <= alpha_in {
                Bound::Upper
            } else if best >= beta {
                Bound::Lower
            } else {
                Bound::Exact
            };
            self.transposition_table
                .store(key, depth, best, bound, best_column);
        }

        best
    }

    /// Playable columns from the middle outwards, with the cached best
    /// column pulled to the front. Ordering only changes search effort,
    /// never the chosen value.
    fn ordered_columns(&self, board: &Board, key: u128, use_cache: bool) -> Vec<usize> {
        let mut order: Vec<usize> = column_order(board.cols())
            .into_iter()
            .filter(|&column| board.playable(column))
            .collect();
        if use_cache {
            if let Some(cached) = self.transposition_table.best_column(key) {
                if let Some(position) = order.iter().position(|&column| column == cached) {
                    order.remove(position);
                    order.insert(0, cached);
                }
            }
        }
        order
    }

    /// Picks the column to report: the best by score, ties broken towards
    /// the centre and then the lowest index, or, with the configured
    /// probability, a uniform draw among the near-best columns.
    fn select_column(
        &mut self,
        board: &Board,
        root_moves: &[RootMove],
        config: &SearchConfig,
    ) -> Option<(usize, i32)> {
        let cols = board.cols() as i32;
        let center_distance = |column: usize| (2 * column as i32 - (cols - 1)).abs();

        let mut best: Option<RootMove> = None;
        for &candidate in root_moves {
            best = Some(match best {
                None => candidate,
                Some(current) => {
                    let improves = candidate.score > current.score
                        || (candidate.score == current.score
                            && (center_distance(candidate.column) < center_distance(current.column)
                                || (center_distance(candidate.column)
                                    == center_distance(current.column)
                                    && candidate.column < current.column)));
                    if improves {
                        candidate
                    } else {
                        current
                    }
                }
            });
        }
        let best = best?;

        if config.imperfection_rate > 0.0
            && self.rng.gen_bool(config.imperfection_rate.clamp(0.0, 1.0))
        {
            let near_best: Vec<RootMove> = root_moves
                .iter()
                .copied()
                .filter(|candidate| best.score - candidate.score <= config.imperfection_tolerance)
                .collect();
            if let Some(pick) = near_best.choose(&mut self.rng) {
                return Some((pick.column, pick.score));
            }
        }

        Some((best.column, best.score))
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_ordered_centre_out() {
        assert_eq!(column_order(7), vec![3, 2, 4, 1, 5, 0, 6]);
        assert_eq!(column_order(4), vec![1, 2, 0, 3]);
        assert_eq!(column_order(5), vec![2, 1, 3, 0, 4]);
    }

    #[test]
    fn zero_depth_is_a_configuration_error() {
        let mut board = Board::new(6, 7).unwrap();
        let mut engine = SearchEngine::new();
        let config = SearchConfig {
            depth: 0,
            ..SearchConfig::with_depth(1)
        };
        assert_eq!(
            engine.best_move(&mut board, Side::Red, &config),
            Err(GameError::ZeroDepth)
        );
    }

    #[test]
    fn undersized_time_budget_is_a_configuration_error() {
        let mut board = Board::new(6, 7).unwrap();
        let mut engine = SearchEngine::new();
        let mut config = SearchConfig::with_depth(4);
        config.time_budget = Some(Duration::from_millis(1));
        assert!(matches!(
            engine.best_move(&mut board, Side::Red, &config),
            Err(GameError::TimeBudgetTooSmall { .. })
        ));
    }

    #[test]
    fn budgeted_search_reports_a_completed_depth() {
        let mut board = Board::new(6, 7).unwrap();
        let mut engine = SearchEngine::new();
        let mut config = SearchConfig::with_depth(4);
        config.time_budget = Some(Duration::from_secs(30));
        let outcome = engine.best_move(&mut board, Side::Red, &config).unwrap();
        assert!(outcome.depth_reached >= 1);
        assert!(outcome.depth_reached <= 4);
        assert!(outcome.nodes_explored > 0);
    }

    #[test]
    fn cache_survives_only_one_geometry() {
        let mut engine = SearchEngine::new();
        let config = SearchConfig::with_depth(3);

        let mut standard = Board::new(6, 7).unwrap();
        let first = engine.best_move(&mut standard, Side::Red, &config).unwrap();
        assert!(standard.playable(first.column));

        let mut compact = Board::new(5, 4).unwrap();
        let second = engine.best_move(&mut compact, Side::Red, &config).unwrap();
        assert!(compact.playable(second.column));
        assert!(second.column < 4);
    }
}
