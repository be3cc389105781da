//! Shallow min/max look-ahead over local replies
//!
//! The positional tier scores each root candidate by searching a few plies of
//! replies. Only the best `REPLY_CAP` local cells are tried at each node, so a
//! depth-2 search stays well inside one UI frame.
//!
//! # Example
//!
//! ```
//! use gomoku::board::{Board, Pos, Stone};
//! use gomoku::search::Lookahead;
//!
//! let mut board = Board::new();
//! board.set(Pos::new(7, 7), Stone::Black);
//!
//! let mut lookahead = Lookahead::new();
//! let score = lookahead.search(&mut board, Stone::White, Stone::Black, 1);
//! assert!(lookahead.nodes() > 1);
//! assert!(score > -100_000);
//! ```

use crate::board::{Board, Pos, Stone};
use crate::eval::{evaluate, PatternScore};
use crate::rules::{check_win, run_length, DIRECTIONS};

/// Infinity score for alpha-beta bounds
const INF: i32 = PatternScore::FIVE + 1;

/// Replies considered at each internal node
pub const REPLY_CAP: usize = 8;

/// Bounded-depth searcher with a node counter
#[derive(Debug, Default)]
pub struct Lookahead {
    nodes: u64,
}

impl Lookahead {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score `board` for `ai` with `to_move` about to play.
    ///
    /// Depth 0 is a single static evaluation. The board is restored before
    /// returning.
    pub fn search(&mut self, board: &mut Board, to_move: Stone, ai: Stone, depth: u8) -> i32 {
        self.alpha_beta(board, to_move, ai, depth, -INF, INF)
    }

    fn alpha_beta(
        &mut self,
        board: &mut Board,
        to_move: Stone,
        ai: Stone,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.nodes += 1;
        if depth == 0 {
            return evaluate(board, ai);
        }

        let replies = local_candidates(board, REPLY_CAP);
        if replies.is_empty() {
            return evaluate(board, ai);
        }

        let maximizing = to_move == ai;
        let mut best = if maximizing { -INF } else { INF };

        for pos in replies {
            board.set(pos, to_move);
            let score = if check_win(board, pos) {
                self.nodes += 1;
                if maximizing {
                    PatternScore::FIVE
                } else {
                    -PatternScore::FIVE
                }
            } else {
                self.alpha_beta(board, to_move.opponent(), ai, depth - 1, alpha, beta)
            };
            board.set(pos, Stone::Empty);

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }
            if alpha >= beta {
                break;
            }
        }

        best
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub fn reset_nodes(&mut self) {
        self.nodes = 0;
    }
}

/// Empty cells near existing stones, best first, at most `cap` of them.
///
/// Cells are ranked by the runs of either colour they touch (longer runs
/// weigh quadratically), then row-major.
pub fn local_candidates(board: &Board, cap: usize) -> Vec<Pos> {
    let mut scored: Vec<(i32, Pos)> = board
        .empty_cells()
        .filter(|&p| board.has_neighbor(p, 1))
        .map(|p| (contact_score(board, p), p))
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    scored.into_iter().take(cap).map(|(_, p)| p).collect()
}

fn contact_score(board: &Board, pos: Pos) -> i32 {
    let mut score = 0;
    for color in [Stone::Black, Stone::White] {
        for &(dr, dc) in &DIRECTIONS {
            let joined = run_length(board, pos, dr, dc, color, 4)
                + run_length(board, pos, -dr, -dc, color, 4);
            score += joined * joined;
        }
    }
    score
}
