//! Heuristic evaluation function for Gomoku board positions
//!
//! Positions are scored from one player's point of view:
//! - every run of that player's stones, weighted by length and openness
//! - minus the same for the opponent
//!
//! `position_bonus` scores a single candidate cell (center and contact) and is
//! added on top by the move selector.

use crate::board::{Board, Pos, Stone};
use crate::rules::DIRECTIONS;

use super::patterns::run_score;

/// Bonus for each occupied cell touching a candidate
const ADJACENT_BONUS: i32 = 5;

/// Evaluate the board from the perspective of the given color.
///
/// Symmetric: `evaluate(board, Black) == -evaluate(board, White)`.
#[must_use]
pub fn evaluate(board: &Board, color: Stone) -> i32 {
    evaluate_patterns(board, color) - evaluate_patterns(board, color.opponent())
}

/// Sum of run scores for every run of `color`, each counted once.
fn evaluate_patterns(board: &Board, color: Stone) -> i32 {
    let mut score = 0;
    for (pos, stone) in board.stones() {
        if stone != color {
            continue;
        }
        for &(dr, dc) in &DIRECTIONS {
            score += evaluate_line(board, pos, dr, dc, color);
        }
    }
    score
}

/// Score the run that starts at `pos` along (dr, dc).
///
/// Only counts the run if `pos` is its first stone (no same-color stone in
/// the negative direction) so each run is scored exactly once.
fn evaluate_line(board: &Board, pos: Pos, dr: i32, dc: i32, color: Stone) -> i32 {
    let before = pos.offset(-dr, -dc, 1).map(|p| board.get(p));
    if before == Some(color) {
        return 0;
    }

    let mut open_ends = i32::from(before == Some(Stone::Empty));
    let mut count = 1;
    let mut step = 1;
    loop {
        match pos.offset(dr, dc, step).map(|p| board.get(p)) {
            Some(s) if s == color => count += 1,
            Some(Stone::Empty) => {
                open_ends += 1;
                break;
            }
            _ => break,
        }
        step += 1;
    }

    run_score(count, open_ends)
}

/// Local desirability of an empty cell: closer to the center and touching
/// more stones is better.
#[must_use]
pub fn position_bonus(board: &Board, pos: Pos) -> i32 {
    let mut adjacent = 0;
    for dr in -1..=1 {
        for dc in -1..=1 {
            if dr == 0 && dc == 0 {
                continue;
            }
            if pos.offset(dr, dc, 1).is_some_and(|p| !board.is_empty(p)) {
                adjacent += 1;
            }
        }
    }
    adjacent * ADJACENT_BONUS - pos.manhattan(Pos::center())
}
