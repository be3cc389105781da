use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::warn;

use crate::board::Stone;
use crate::engine::Difficulty;
use crate::error::ConfigError;
use crate::persist::DEFAULT_SAVE_PATH;

/// AI opponent settings
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AiSettings {
    /// Play against the AI on startup
    pub enabled: bool,
    /// Colour the AI plays
    pub color: Stone,
    pub difficulty: Difficulty,
}

impl Default for AiSettings {
    fn default() -> Self {
        AiSettings {
            enabled: true,
            color: Stone::White,
            difficulty: Difficulty::Medium,
        }
    }
}

/// Two-player network settings
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    /// Port the host listens on
    pub port: u16,
    /// Give up connecting to a host after this long
    pub connect_timeout_ms: u64,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        NetworkSettings {
            port: 5555,
            connect_timeout_ms: 5_000,
        }
    }
}

impl NetworkSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where Save/Load read and write the game
    pub save_path: PathBuf,
    /// `tracing` level filter: error, warn, info, debug or trace
    pub log_level: String,
    pub ai: AiSettings,
    pub network: NetworkSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            save_path: PathBuf::from(DEFAULT_SAVE_PATH),
            log_level: "info".into(),
            ai: AiSettings::default(),
            network: NetworkSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ai.color == Stone::Empty {
            return Err(ConfigError::Validation(
                "ai.color must be black or white".into(),
            ));
        }
        if self.network.port == 0 {
            return Err(ConfigError::Validation(
                "network.port must be > 0".into(),
            ));
        }
        if self.network.connect_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "network.connect_timeout_ms must be > 0".into(),
            ));
        }
        if self.save_path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "save_path must not be empty".into(),
            ));
        }
        if self.log_level.parse::<tracing::Level>().is_err() {
            return Err(ConfigError::Validation(format!(
                "log_level '{}' is not one of error, warn, info, debug, trace",
                self.log_level
            )));
        }
        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> Result<String, ConfigError> {
        toml::to_string_pretty(&AppConfig::default())
            .map_err(|e| ConfigError::Validation(format!("default config does not serialize: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().expect("default config should be valid");
        assert_eq!(config.network.port, 5555);
        assert_eq!(config.ai.color, Stone::White);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[ai]
difficulty = "hard"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.ai.difficulty, Difficulty::Hard);
        assert!(config.ai.enabled);
        assert_eq!(config.network, NetworkSettings::default());
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_validation_rejects_empty_ai_color() {
        let mut config = AppConfig::default();
        config.ai.color = Stone::Empty;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_port() {
        let mut config = AppConfig::default();
        config.network.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_unknown_log_level() {
        let mut config = AppConfig::default();
        config.log_level = "loud".into();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("nonexistent_config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gomoku.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
log_level = "debug"

[ai]
color = "black"

[network]
port = 6000
"#
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.ai.color, Stone::Black);
        assert_eq!(config.network.port, 6000);
        assert_eq!(config.log_level, "debug");
        // Others are defaults
        assert_eq!(config.ai.difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[ai\nenabled = yes").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = AppConfig::default_toml().unwrap();
        let config: AppConfig = toml::from_str(&toml_str).unwrap();
        config.validate().expect("roundtripped config should be valid");
        assert_eq!(config, AppConfig::default());
    }
}
