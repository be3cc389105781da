//! Pre-move snapshots for exact undo

use serde::{Deserialize, Serialize};

use super::GameStatus;
use crate::board::{Board, Pos, Stone};

/// Full game state captured immediately before a move.
///
/// `current_player` is the player who made the move that followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub board: Board,
    pub current_player: Stone,
    pub status: GameStatus,
    pub last_move: Option<Pos>,
}

impl Snapshot {
    /// Player whose move this snapshot precedes
    #[inline]
    pub fn mover(&self) -> Stone {
        self.current_player
    }
}

/// Append-only log of snapshots; entries are never mutated, only popped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoveHistory {
    entries: Vec<Snapshot>,
}

impl MoveHistory {
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(crate::board::TOTAL_CELLS),
        }
    }

    pub fn record(&mut self, snapshot: Snapshot) {
        self.entries.push(snapshot);
    }

    pub fn pop(&mut self) -> Option<Snapshot> {
        self.entries.pop()
    }

    pub fn peek(&self) -> Option<&Snapshot> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.entries.iter()
    }
}
