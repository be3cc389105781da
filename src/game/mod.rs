//! Game-state engine: turn order, terminal status, history and undo
//!
//! All mutation of a game goes through [`GameState::place_piece`]; when the
//! state is shared with a network receiver it is wrapped in [`SharedGame`],
//! which serializes every caller behind one mutex.

pub mod clock;
pub mod history;
pub mod record;
pub mod shared;
pub mod state;

pub use clock::PlayerClock;
pub use history::{MoveHistory, Snapshot};
pub use record::{GameRecord, PlayerTimes};
pub use shared::SharedGame;
pub use state::GameState;

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::board::{Pos, Stone};

/// Terminal status of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    InProgress,
    Won(Stone),
    Draw,
}

impl GameStatus {
    #[inline]
    pub fn is_over(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    #[inline]
    pub fn winner(self) -> Option<Stone> {
        match self {
            GameStatus::Won(stone) => Some(stone),
            _ => None,
        }
    }
}

/// One accepted placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub row: usize,
    pub col: usize,
    pub player: Stone,
    /// Unix time in milliseconds
    pub timestamp_ms: u64,
}

impl Move {
    pub fn new(pos: Pos, player: Stone) -> Self {
        Self {
            row: pos.row as usize,
            col: pos.col as usize,
            player,
            timestamp_ms: now_millis(),
        }
    }

    pub fn pos(&self) -> Pos {
        Pos::new(self.row as u8, self.col as u8)
    }
}

/// Which side of a network session this process is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkRole {
    Host { color: Stone },
    Guest { color: Stone },
}

impl NetworkRole {
    /// Host plays Black, guest plays White unless configured otherwise
    pub fn host() -> Self {
        NetworkRole::Host { color: Stone::Black }
    }

    pub fn guest() -> Self {
        NetworkRole::Guest { color: Stone::White }
    }

    pub fn local_color(self) -> Stone {
        match self {
            NetworkRole::Host { color } | NetworkRole::Guest { color } => color,
        }
    }

    pub fn remote_color(self) -> Stone {
        self.local_color().opponent()
    }

    pub fn is_host(self) -> bool {
        matches!(self, NetworkRole::Host { .. })
    }
}

/// Generate a Unix timestamp in millis.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
