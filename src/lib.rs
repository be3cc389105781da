//! Gomoku (five in a row) on a 15x15 board
//!
//! - Black moves first, turns alternate
//! - Five or more stones in a row win (overlines allowed)
//! - A full board with no five is a draw
//!
//! Games are played hotseat, against a heuristic AI, or against a remote
//! player over TCP.
//!
//! # Architecture
//!
//! - [`board`]: Board representation
//! - [`rules`]: Win detection
//! - [`game`]: Game state machine, history and undo, shared handle
//! - [`eval`]: Position evaluation and heuristics
//! - [`search`]: Threat scanning and shallow look-ahead
//! - [`engine`]: AI move selection integrating the above
//! - [`network`]: Two-player sessions over TCP
//! - [`persist`]: Save/load games as JSON
//! - [`config`]: TOML configuration
//! - [`ui`]: egui front end
//!
//! # Quick Start
//!
//! ```
//! use gomoku::{Difficulty, GameState, Pos, Stone};
//!
//! let mut game = GameState::with_ai(Stone::White, Difficulty::Easy);
//! assert!(game.place_piece(7, 7));
//!
//! // The AI answered inside the same call
//! assert_eq!(game.move_count(), 2);
//! assert_eq!(game.board().get(Pos::new(7, 7)), Stone::Black);
//! assert_eq!(game.current_player(), Stone::Black);
//!
//! // Undo takes back the AI reply and the move it answered
//! assert!(game.undo());
//! assert!(game.board().is_board_empty());
//! ```

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod game;
pub mod network;
pub mod persist;
pub mod rules;
pub mod search;
pub mod ui;

// Re-export commonly used types for convenience
pub use board::{Board, Pos, Stone, BOARD_SIZE};
pub use engine::{AiPlayer, Difficulty, MoveResult, SearchType};
pub use error::{MoveError, NetworkError};
pub use game::{GameRecord, GameState, GameStatus, SharedGame};
pub use network::{NetworkSession, SessionStatus};
