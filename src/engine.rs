//! Main AI engine integrating all search components
//!
//! The engine picks a move by walking four tiers in strict priority:
//!
//! 1. **Immediate win**: first empty cell (row-major) that completes five
//! 2. **Block**: first empty cell where the opponent would complete five
//! 3. **Threat block**: the cell that best cuts the opponent's live threes,
//!    counted over five-cell windows the opponent can still fill
//! 4. **Positional**: a capped set of candidates, each scored by a shallow
//!    look-ahead plus a center/contact bonus, with difficulty-dependent noise
//!
//! # Example
//!
//! ```
//! use gomoku::engine::{AiPlayer, Difficulty};
//! use gomoku::{Board, Pos, Stone};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut board = Board::new();
//! board.set(Pos::new(7, 7), Stone::Black);
//!
//! let ai = AiPlayer::new(Difficulty::Hard);
//! let mut rng = StdRng::seed_from_u64(1);
//! let result = ai.select_move(&board, Stone::White, &mut rng);
//! let pos = result.best_move.unwrap();
//! assert!(board.is_empty(pos));
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::{debug, instrument};

use crate::board::{Board, Pos, Stone};
use crate::eval::{position_bonus, PatternScore};
use crate::rules::check_win;
use crate::search::{Lookahead, ThreatSearcher};

/// AI strength levels
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Tuning for this level
    pub fn config(self) -> AiConfig {
        match self {
            Difficulty::Easy => AiConfig {
                randomness: 20.0,
                lookahead_depth: 0,
                candidate_cap: 10,
            },
            Difficulty::Medium => AiConfig {
                randomness: 5.0,
                lookahead_depth: 1,
                candidate_cap: 10,
            },
            Difficulty::Hard => AiConfig {
                randomness: 1.0,
                lookahead_depth: 2,
                candidate_cap: 20,
            },
        }
    }

    /// Next level, wrapping Hard back to Easy (UI cycle button)
    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(name)
    }
}

/// Knobs for the positional tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiConfig {
    /// Upper bound of the uniform noise added to each candidate score
    pub randomness: f64,
    /// Plies searched below each candidate (0 = static evaluation)
    pub lookahead_depth: u8,
    /// Root candidates kept when the board has more empty cells than this
    pub candidate_cap: usize,
}

/// Tier that produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    /// Completes five
    ImmediateWin,
    /// Stops the opponent completing five
    Block,
    /// Cuts an opponent run of three or four
    ThreatBlock,
    /// Look-ahead over capped candidates
    Positional,
}

/// Result of a move search with statistics.
#[derive(Debug, Clone)]
pub struct MoveResult {
    /// Best move found; `None` only on a full board
    pub best_move: Option<Pos>,
    /// Score of the chosen move (before noise)
    pub score: i32,
    pub search_type: SearchType,
    /// Time taken in milliseconds
    pub time_ms: u64,
    /// Number of nodes searched
    pub nodes: u64,
}

impl MoveResult {
    #[inline]
    fn tier(pos: Option<Pos>, score: i32, search_type: SearchType, start: Instant, nodes: u64) -> Self {
        Self {
            best_move: pos,
            score,
            search_type,
            time_ms: start.elapsed().as_millis() as u64,
            nodes,
        }
    }
}

/// Heuristic move selector. Stateless apart from its configuration, so one
/// instance can serve any number of games.
#[derive(Debug, Clone, Copy)]
pub struct AiPlayer {
    config: AiConfig,
}

impl AiPlayer {
    #[must_use]
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_config(difficulty.config())
    }

    #[must_use]
    pub fn with_config(config: AiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> AiConfig {
        self.config
    }

    /// Best move only
    pub fn get_move<R: Rng + ?Sized>(&self, board: &Board, color: Stone, rng: &mut R) -> Option<Pos> {
        self.select_move(board, color, rng).best_move
    }

    /// Choose a move for `color`. Never returns an occupied cell and never
    /// mutates `board`.
    #[instrument(skip(self, board, rng), fields(stones = board.stone_count()))]
    pub fn select_move<R: Rng + ?Sized>(&self, board: &Board, color: Stone, rng: &mut R) -> MoveResult {
        let start = Instant::now();
        let opponent = color.opponent();
        let mut threats = ThreatSearcher::new();

        // 1. Win now
        if let Some(pos) = threats.find_winning_cell(board, color) {
            debug!(?pos, "immediate win");
            return MoveResult::tier(
                Some(pos),
                PatternScore::FIVE,
                SearchType::ImmediateWin,
                start,
                threats.nodes(),
            );
        }

        // 2. Stop the opponent winning now
        if let Some(pos) = threats.find_winning_cell(board, opponent) {
            debug!(?pos, "blocking five");
            return MoveResult::tier(
                Some(pos),
                PatternScore::FIVE - 1,
                SearchType::Block,
                start,
                threats.nodes(),
            );
        }

        // 3. Cut open threes and fours
        if let Some(threat) = threats.best_block(board, opponent) {
            debug!(pos = ?threat.pos, score = threat.score, "blocking threat");
            return MoveResult::tier(
                Some(threat.pos),
                threat.score,
                SearchType::ThreatBlock,
                start,
                threats.nodes(),
            );
        }

        // 4. Positional
        let mut lookahead = Lookahead::new();
        let mut scratch = *board;
        let mut best: Option<(f64, i32, Pos)> = None;

        for pos in self.root_candidates(board) {
            scratch.set(pos, color);
            let score = if check_win(&scratch, pos) {
                PatternScore::FIVE
            } else {
                lookahead.search(&mut scratch, opponent, color, self.config.lookahead_depth)
            };
            scratch.set(pos, Stone::Empty);

            let score = score + position_bonus(board, pos);
            let perturbed = f64::from(score) + rng.gen::<f64>() * self.config.randomness;
            if best.map_or(true, |(b, _, _)| perturbed > b) {
                best = Some((perturbed, score, pos));
            }
        }

        let nodes = threats.nodes() + lookahead.nodes();
        match best {
            Some((_, score, pos)) => {
                debug!(?pos, score, nodes, "positional move");
                MoveResult::tier(Some(pos), score, SearchType::Positional, start, nodes)
            }
            None => MoveResult::tier(None, 0, SearchType::Positional, start, nodes),
        }
    }

    /// Root candidates for the positional tier.
    ///
    /// When more than `candidate_cap` cells are empty, keep the best by
    /// (near a stone first, then closer to the center, then row-major).
    fn root_candidates(&self, board: &Board) -> Vec<Pos> {
        let mut cells: Vec<Pos> = board.empty_cells().collect();
        if cells.len() > self.config.candidate_cap {
            let center = Pos::center();
            cells.sort_by_key(|&p| (!board.has_neighbor(p, 2), p.manhattan(center), p));
            cells.truncate(self.config.candidate_cap);
        }
        cells
    }
}

impl Default for AiPlayer {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::TOTAL_CELLS;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    fn setup_board(setup: &[(u8, u8, Stone)]) -> Board {
        let mut board = Board::new();
        for &(r, c, stone) in setup {
            board.set(Pos::new(r, c), stone);
        }
        board
    }

    /// Full board without any five: column pairs alternate colour and odd
    /// rows shift the pattern by two.
    fn drawn_board() -> Board {
        let mut board = Board::new();
        for idx in 0..TOTAL_CELLS {
            let p = Pos::from_index(idx);
            let (r, c) = (p.row as usize, p.col as usize);
            let stone = if ((c + 2 * (r % 2)) / 2) % 2 == 0 {
                Stone::Black
            } else {
                Stone::White
            };
            board.set(p, stone);
        }
        board
    }

    #[test]
    fn test_difficulty_table() {
        assert_eq!(
            Difficulty::Easy.config(),
            AiConfig {
                randomness: 20.0,
                lookahead_depth: 0,
                candidate_cap: 10
            }
        );
        assert_eq!(Difficulty::Medium.config().lookahead_depth, 1);
        assert_eq!(Difficulty::Hard.config().candidate_cap, 20);
        assert_eq!(Difficulty::Hard.next(), Difficulty::Easy);
        assert_eq!(Difficulty::default(), Difficulty::Medium);
    }

    #[test]
    fn test_immediate_win() {
        let board = setup_board(&[
            (3, 3, Stone::White),
            (3, 4, Stone::White),
            (3, 5, Stone::White),
            (3, 6, Stone::White),
            (10, 10, Stone::Black),
            (10, 11, Stone::Black),
        ]);
        let mut rng = StdRng::seed_from_u64(0);
        for difficulty in ALL {
            let result = AiPlayer::new(difficulty).select_move(&board, Stone::White, &mut rng);
            assert_eq!(result.search_type, SearchType::ImmediateWin);
            assert_eq!(result.best_move, Some(Pos::new(3, 2)));
        }
    }

    #[test]
    fn test_win_preferred_over_block() {
        let board = setup_board(&[
            (12, 3, Stone::White),
            (12, 4, Stone::White),
            (12, 5, Stone::White),
            (12, 6, Stone::White),
            (1, 3, Stone::Black),
            (1, 4, Stone::Black),
            (1, 5, Stone::Black),
            (1, 6, Stone::Black),
        ]);
        let mut rng = StdRng::seed_from_u64(0);
        let result = AiPlayer::new(Difficulty::Easy).select_move(&board, Stone::White, &mut rng);
        assert_eq!(result.search_type, SearchType::ImmediateWin);
        assert_eq!(result.best_move.map(|p| p.row), Some(12));
    }

    #[test]
    fn test_blocks_single_winning_cell() {
        let board = setup_board(&[
            (10, 9, Stone::White),
            (10, 10, Stone::Black),
            (10, 11, Stone::Black),
            (10, 12, Stone::Black),
            (10, 13, Stone::Black),
        ]);
        let mut rng = StdRng::seed_from_u64(3);
        for difficulty in ALL {
            let result = AiPlayer::new(difficulty).select_move(&board, Stone::White, &mut rng);
            assert_eq!(result.search_type, SearchType::Block);
            assert_eq!(result.best_move, Some(Pos::new(10, 14)));
        }
    }

    #[test]
    fn test_scenario_open_four_blocked_at_an_end() {
        let board = setup_board(&[
            (5, 5, Stone::Black),
            (5, 6, Stone::Black),
            (5, 7, Stone::Black),
            (5, 8, Stone::Black),
        ]);
        let mut rng = StdRng::seed_from_u64(11);
        let pos = AiPlayer::new(Difficulty::Medium)
            .get_move(&board, Stone::White, &mut rng)
            .unwrap();
        assert!(pos == Pos::new(5, 4) || pos == Pos::new(5, 9), "got {pos}");
    }

    #[test]
    fn test_threat_block_open_three() {
        let board = setup_board(&[
            (7, 6, Stone::Black),
            (7, 7, Stone::Black),
            (7, 8, Stone::Black),
            (8, 7, Stone::White),
        ]);
        let mut rng = StdRng::seed_from_u64(5);
        let result = AiPlayer::new(Difficulty::Hard).select_move(&board, Stone::White, &mut rng);
        assert_eq!(result.search_type, SearchType::ThreatBlock);
        assert_eq!(result.best_move, Some(Pos::new(7, 5)));
    }

    #[test]
    fn test_dead_three_left_to_positional() {
        let board = setup_board(&[
            (7, 0, Stone::White),
            (7, 1, Stone::Black),
            (7, 2, Stone::Black),
            (7, 3, Stone::Black),
            (7, 5, Stone::White),
        ]);
        let mut rng = StdRng::seed_from_u64(5);
        let result = AiPlayer::new(Difficulty::Hard).select_move(&board, Stone::White, &mut rng);
        assert_eq!(result.search_type, SearchType::Positional);
    }

    #[test]
    fn test_full_board_has_no_move() {
        let board = drawn_board();
        assert!(board.is_full());
        let mut rng = StdRng::seed_from_u64(0);
        let result = AiPlayer::default().select_move(&board, Stone::Black, &mut rng);
        assert_eq!(result.best_move, None);
    }

    #[test]
    fn test_single_empty_cell_is_taken() {
        let mut board = drawn_board();
        board.set(Pos::new(14, 14), Stone::Empty);
        let mut rng = StdRng::seed_from_u64(0);
        let pos = AiPlayer::new(Difficulty::Hard).get_move(&board, Stone::White, &mut rng);
        assert_eq!(pos, Some(Pos::new(14, 14)));
    }

    #[test]
    fn test_opening_near_center() {
        let board = Board::new();
        let mut rng = StdRng::seed_from_u64(9);
        let result = AiPlayer::new(Difficulty::Hard).select_move(&board, Stone::Black, &mut rng);
        assert_eq!(result.search_type, SearchType::Positional);
        let pos = result.best_move.unwrap();
        assert!(pos.manhattan(Pos::center()) <= 2, "got {pos}");
    }

    #[test]
    fn test_never_picks_occupied_cell() {
        let mut rng = StdRng::seed_from_u64(42);
        for game in 0..12 {
            let mut board = Board::new();
            let stones = 10 + game * 15;
            let mut color = Stone::Black;
            while board.stone_count() < stones {
                let idx = rng.gen_range(0..TOTAL_CELLS);
                let pos = Pos::from_index(idx);
                if board.is_empty(pos) {
                    board.set(pos, color);
                    color = color.opponent();
                }
            }
            for difficulty in ALL {
                let before = board;
                let result = AiPlayer::new(difficulty).select_move(&board, color, &mut rng);
                let pos = result.best_move.expect("board has empty cells");
                assert!(board.is_empty(pos), "{difficulty} chose occupied {pos}");
                assert_eq!(board, before);
            }
        }
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let board = setup_board(&[(7, 7, Stone::Black)]);
        let ai = AiPlayer::new(Difficulty::Easy);
        let a = ai.get_move(&board, Stone::White, &mut StdRng::seed_from_u64(99));
        let b = ai.get_move(&board, Stone::White, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }
}
