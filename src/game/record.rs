//! Snapshot-shaped save/resync unit

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{GameStatus, MoveHistory};
use crate::board::{Board, Pos, Stone};
use crate::engine::Difficulty;
use crate::rules::check_win;

/// Accumulated thinking time in milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerTimes {
    pub black_ms: u64,
    pub white_ms: u64,
}

impl PlayerTimes {
    pub fn from_durations(black: Duration, white: Duration) -> Self {
        Self {
            black_ms: black.as_millis() as u64,
            white_ms: white.as_millis() as u64,
        }
    }

    pub fn black(&self) -> Duration {
        Duration::from_millis(self.black_ms)
    }

    pub fn white(&self) -> Duration {
        Duration::from_millis(self.white_ms)
    }
}

/// Everything needed to rebuild a `GameState`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub board: Board,
    pub current_player: Stone,
    pub status: GameStatus,
    pub last_move: Option<Pos>,
    pub history: MoveHistory,
    pub vs_ai: bool,
    pub ai_color: Stone,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub player_times: PlayerTimes,
}

impl GameRecord {
    /// Structural checks for records that come from disk or from a peer
    pub fn is_consistent(&self) -> bool {
        let players_ok = self.current_player != Stone::Empty && self.ai_color != Stone::Empty;
        let count_ok = self.board.stone_count() == self.history.len();
        let last_ok = self
            .last_move
            .map_or(self.history.is_empty(), |p| !self.board.is_empty(p));
        players_ok && count_ok && last_ok && self.balance_ok() && self.status_ok()
    }

    /// Black moves first, so it is never behind and at most one stone ahead.
    fn balance_ok(&self) -> bool {
        let black = self.board.count(Stone::Black);
        let white = self.board.count(Stone::White);
        black == white || black == white + 1
    }

    /// `status` must agree with the board and with whose turn it is.
    fn status_ok(&self) -> bool {
        match self.status {
            GameStatus::InProgress => {
                let to_move = if self.board.count(Stone::Black) > self.board.count(Stone::White) {
                    Stone::White
                } else {
                    Stone::Black
                };
                self.current_player == to_move
            }
            GameStatus::Won(Stone::Empty) => false,
            GameStatus::Won(winner) => {
                winner == self.current_player
                    && self
                        .last_move
                        .is_some_and(|p| self.board.get(p) == winner && check_win(&self.board, p))
            }
            GameStatus::Draw => self.board.is_full(),
        }
    }
}
