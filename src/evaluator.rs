//! Static heuristic scoring of a position
//!
//! Every length-`win_length` window along the four alignment directions is
//! scored on its own: windows holding discs of both colours are dead and
//! count for nothing, single-coloured windows score super-linearly in their
//! disc count, and a completed window scores the win sentinel. The total is
//! taken as the perspective side's windows minus the opponent's, plus a
//! centre-column occupancy difference, so that for every position
//! `score(board, a) == -score(board, a.opponent())`.
//!
//! There is no recursion here; this runs at every leaf of the search.

use crate::board::{Board, Side};

/// Sentinel magnitude of an already-won position
pub const WIN_SCORE: i32 = 1_000_000;

/// Bonus per disc held in the centre column
const CENTER_WEIGHT: i32 = 3;

/// Weight of a single-coloured window by disc count
fn window_weight(count: usize, win_length: usize) -> i32 {
    if count == win_length {
        WIN_SCORE
    } else if count + 1 == win_length {
        32
    } else if count + 2 == win_length {
        4
    } else {
        0
    }
}

/// Scores the board from the given side's perspective
pub fn score(board: &Board, perspective: Side) -> i32 {
    let rows = board.rows() as isize;
    let cols = board.cols() as isize;
    let reach = (board.win_length() - 1) as isize;

    let mut total = 0;
    for (dr, dc) in [(0isize, 1isize), (1, 0), (1, 1), (1, -1)] {
        for row in 0..rows {
            for col in 0..cols {
                // only windows that lie fully on the board
                let end_row = row + dr * reach;
                let end_col = col + dc * reach;
                if end_row >= rows || end_col < 0 || end_col >= cols {
                    continue;
                }
                total += window_score(board, row, col, dr, dc, perspective);
            }
        }
    }

    let center = board.cols() / 2;
    for row in 0..board.rows() {
        match board.cell(row, center) {
            Some(side) if side == perspective => total += CENTER_WEIGHT,
            Some(_) => total -= CENTER_WEIGHT,
            None => {}
        }
    }

    total
}

fn window_score(
    board: &Board,
    row: isize,
    col: isize,
    dr: isize,
    dc: isize,
    perspective: Side,
) -> i32 {
    let mut mine = 0;
    let mut theirs = 0;
    for i in 0..board.win_length() as isize {
        match board.cell((row + dr * i) as usize, (col + dc * i) as usize) {
            Some(side) if side == perspective => mine += 1,
            Some(_) => theirs += 1,
            None => {}
        }
    }
    if mine > 0 && theirs > 0 {
        0
    } else if mine > 0 {
        window_weight(mine, board.win_length())
    } else if theirs > 0 {
        -window_weight(theirs, board.win_length())
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;
    use rand::rngs::StdRng;

    #[test]
    fn empty_board_is_balanced() {
        let board = Board::new(6, 7).unwrap();
        assert_eq!(score(&board, Side::Red), 0);
        assert_eq!(score(&board, Side::Yellow), 0);
    }

    #[test]
    fn scores_are_antisymmetric() {
        let mut board = Board::new(6, 7).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let mut side = Side::Red;
        for _ in 0..20 {
            let legal = board.legal_columns();
            let Some(&column) = legal.choose(&mut rng) else {
                break;
            };
            board.drop_piece(column, side).unwrap();
            side = side.opponent();
            assert_eq!(score(&board, Side::Red), -score(&board, Side::Yellow));
        }
    }

    #[test]
    fn center_discs_outscore_edge_discs() {
        let mut center = Board::new(6, 7).unwrap();
        center.drop_piece(3, Side::Red).unwrap();
        let mut edge = Board::new(6, 7).unwrap();
        edge.drop_piece(0, Side::Red).unwrap();
        assert!(score(&center, Side::Red) > score(&edge, Side::Red));
    }

    #[test]
    fn near_completion_dominates_scattered_pairs() {
        let mut three = Board::new(6, 7).unwrap();
        for column in 1..4 {
            three.drop_piece(column, Side::Red).unwrap();
        }
        let mut pairs = Board::new(6, 7).unwrap();
        pairs.drop_piece(0, Side::Red).unwrap();
        pairs.drop_piece(1, Side::Red).unwrap();
        pairs.drop_piece(5, Side::Red).unwrap();
        assert!(score(&three, Side::Red) > score(&pairs, Side::Red));
    }

    #[test]
    fn won_position_scores_the_sentinel() {
        let mut board = Board::new(6, 7).unwrap();
        for column in 0..4 {
            board.drop_piece(column, Side::Yellow).unwrap();
        }
        assert!(score(&board, Side::Yellow) >= WIN_SCORE);
        assert!(score(&board, Side::Red) <= -WIN_SCORE);
    }
}
