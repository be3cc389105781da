//! Mutex-guarded handle shared by the UI and the network receiver

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{GameState, Move};
use crate::error::MoveError;

/// Cloneable handle to one `GameState`.
///
/// Every mutation goes through the lock, so a local click and a remote move
/// can never interleave inside `place_piece`.
#[derive(Debug, Clone, Default)]
pub struct SharedGame {
    inner: Arc<Mutex<GameState>>,
}

impl SharedGame {
    pub fn new(state: GameState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    /// Lock the game. A panic in another holder does not corrupt the state
    /// (every transition validates before mutating), so poisoning is ignored.
    pub fn lock(&self) -> MutexGuard<'_, GameState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with<R>(&self, f: impl FnOnce(&GameState) -> R) -> R {
        f(&self.lock())
    }

    pub fn with_mut<R>(&self, f: impl FnOnce(&mut GameState) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn place_piece(&self, row: usize, col: usize) -> bool {
        self.lock().place_piece(row, col)
    }

    pub fn try_place(&self, row: usize, col: usize) -> Result<Move, MoveError> {
        self.lock().try_place(row, col)
    }

    pub fn undo(&self) -> bool {
        self.lock().undo()
    }

    pub fn reset(&self) {
        self.lock().reset()
    }
}
