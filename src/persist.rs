//! Saving and loading games as pretty-printed JSON

use std::fs;
use std::path::Path;

use tracing::{info, instrument};

use crate::error::PersistError;
use crate::game::GameRecord;

/// Default save file name, next to the working directory
pub const DEFAULT_SAVE_PATH: &str = "saved_game.json";

/// Write `record` to `path`, replacing any existing file.
#[instrument(skip_all, fields(path = %path.display(), moves = record.history.len()))]
pub fn save_game(path: &Path, record: &GameRecord) -> Result<(), PersistError> {
    let json = serde_json::to_string_pretty(record).map_err(|source| PersistError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| PersistError::Io {
        operation: "write",
        path: path.to_path_buf(),
        source,
    })?;
    info!("game saved");
    Ok(())
}

/// Read a record previously written by [`save_game`].
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_game(path: &Path) -> Result<GameRecord, PersistError> {
    let content = fs::read_to_string(path).map_err(|source| PersistError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source,
    })?;
    let record: GameRecord = serde_json::from_str(&content).map_err(|source| PersistError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    info!(moves = record.history.len(), "game loaded");
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Stone;
    use crate::engine::Difficulty;
    use crate::game::GameState;

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.json");

        let mut state = GameState::new();
        state.set_difficulty(Difficulty::Hard);
        for (r, c) in [(7, 7), (7, 8), (8, 8)] {
            assert!(state.place_piece(r, c));
        }
        let record = state.record();

        save_game(&path, &record).unwrap();
        let loaded = load_game(&path).unwrap();
        assert_eq!(loaded, record);
        assert!(loaded.is_consistent());
        assert_eq!(loaded.current_player, Stone::White);
        assert_eq!(loaded.difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_saved_file_is_readable_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.json");
        let mut state = GameState::new();
        assert!(state.place_piece(0, 0));
        save_game(&path, &state.record()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["current_player"], "white");
        assert_eq!(value["difficulty"], "medium");
        assert_eq!(value["history"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_game(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, PersistError::Io { operation: "read", .. }));
    }

    #[test]
    fn test_load_rejects_out_of_range_move() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tampered.json");
        let mut state = GameState::new();
        assert!(state.place_piece(7, 7));
        save_game(&path, &state.record()).unwrap();

        let mut value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        value["last_move"] = serde_json::json!({"row": 99, "col": 99});
        fs::write(&path, value.to_string()).unwrap();

        assert!(matches!(load_game(&path), Err(PersistError::Json { .. })));
    }

    #[test]
    fn test_load_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_game(&path), Err(PersistError::Json { .. })));
    }
}
