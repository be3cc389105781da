//! Error types for the Gomoku crate

use std::path::PathBuf;

use crate::board::Stone;

/// Raw coordinates outside the 15x15 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("position ({row}, {col}) is out of bounds (must be 0-14)")]
    OutOfBounds { row: usize, col: usize },
}

/// Why a placement was rejected. Callers of `place_piece` only see `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error(transparent)]
    OutOfBounds(#[from] BoardError),

    #[error("cell ({row}, {col}) is already occupied")]
    Occupied { row: usize, col: usize },

    #[error("game already over")]
    GameOver,
}

/// Session-level failures. None of these touch the game state.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("peer disconnected")]
    Disconnected,

    #[error("network I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("move from {got:?} but {expected:?} is to play")]
    WrongPlayer { expected: Stone, got: Stone },

    #[error("stale move: sequence {got}, expected {expected}")]
    StaleSequence { expected: usize, got: usize },

    #[error("move {row},{col} rejected by local state: {source}")]
    Rejected {
        row: usize,
        col: usize,
        source: MoveError,
    },

    #[error("not the local player's turn")]
    NotYourTurn,
}

/// Errors from saving or loading a game record.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse saved game {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_error_display() {
        let err = BoardError::OutOfBounds { row: 15, col: 2 };
        assert_eq!(
            err.to_string(),
            "position (15, 2) is out of bounds (must be 0-14)"
        );
    }

    #[test]
    fn test_move_error_wraps_board_error() {
        let err: MoveError = BoardError::OutOfBounds { row: 0, col: 20 }.into();
        assert_eq!(err.to_string(), "position (0, 20) is out of bounds (must be 0-14)");
        assert_eq!(MoveError::GameOver.to_string(), "game already over");
    }

    #[test]
    fn test_network_error_display() {
        let err = NetworkError::StaleSequence { expected: 4, got: 2 };
        assert_eq!(err.to_string(), "stale move: sequence 2, expected 4");
    }
}
