//! Configuration types for the quest polling client.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::quest_dirs;

/// Top-level configuration for the questling client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestConfig {
    /// Gateway API settings.
    pub api: ApiConfig,
    /// Token file settings.
    pub token: TokenConfig,
    /// Poll loop settings.
    pub runner: RunnerConfig,
}

/// Gateway API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the quest gateway (no trailing slash).
    pub base_url: String,
    /// Optional per-request timeout in seconds.
    ///
    /// Absent by default: requests wait on the transport's own limits.
    pub request_timeout_secs: Option<u64>,
    /// How many token revalidations a single logical request may trigger
    /// before giving up on a persistent 401.
    pub auth_retry_limit: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://quest.redactedairways.com/ecom-gateway".to_owned(),
            request_timeout_secs: None,
            auth_retry_limit: 1,
        }
    }
}

/// Token file configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Token file path (None = `<config dir>/token.txt`).
    pub path: Option<PathBuf>,
}

/// Poll loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Pause between consecutive task completions, in milliseconds.
    pub task_pacing_ms: u64,
    /// Pause between poll cycles, in seconds.
    pub cooldown_secs: u64,
    /// Maximum number of cycle records retained in memory.
    pub history_limit: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            task_pacing_ms: 1000,
            cooldown_secs: 3600,
            history_limit: 50,
        }
    }
}

impl QuestConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::QuestError::Config(e.to_string()))
    }

    /// Load configuration, treating a missing file as all-defaults.
    ///
    /// A file that exists but fails to parse is still an error; silently
    /// running with defaults over a broken config would mask typos.
    pub fn load_or_default(path: &std::path::Path) -> crate::error::Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::QuestError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path (`<config dir>/config.toml`).
    pub fn default_config_path() -> PathBuf {
        quest_dirs::config_file()
    }

    /// Effective token file path: the `[token]` override if set, otherwise
    /// the default location next to the config file.
    #[must_use]
    pub fn token_path(&self) -> PathBuf {
        self.token
            .path
            .clone()
            .unwrap_or_else(quest_dirs::token_file)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = QuestConfig::default();
        assert!(config.api.base_url.starts_with("https://"));
        assert!(!config.api.base_url.ends_with('/'));
        assert!(config.api.request_timeout_secs.is_none());
        assert_eq!(config.api.auth_retry_limit, 1);
        assert_eq!(config.runner.task_pacing_ms, 1000);
        assert_eq!(config.runner.cooldown_secs, 3600);
        assert!(config.runner.history_limit > 0);
        assert!(config.token.path.is_none());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = QuestConfig::default();
        config.api.base_url = "http://localhost:9999".to_owned();
        config.api.auth_retry_limit = 3;
        config.runner.task_pacing_ms = 0;
        config.token.path = Some(dir.path().join("custom-token.txt"));

        assert!(config.save_to_file(&path).is_ok());
        assert!(path.exists());

        let loaded = QuestConfig::from_file(&path).unwrap();
        assert_eq!(loaded.api.base_url, "http://localhost:9999");
        assert_eq!(loaded.api.auth_retry_limit, 3);
        assert_eq!(loaded.runner.task_pacing_ms, 0);
        assert_eq!(loaded.token.path, Some(dir.path().join("custom-token.txt")));
    }

    #[test]
    fn from_file_nonexistent_returns_error() {
        let result = QuestConfig::from_file(std::path::Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn from_file_invalid_toml_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").unwrap();

        let result = QuestConfig::from_file(&path);
        assert!(result.is_err());
    }

    #[test]
    fn load_or_default_missing_file_is_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = QuestConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.api.auth_retry_limit, 1);
    }

    #[test]
    fn load_or_default_broken_file_is_still_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\nbase_url = ").unwrap();
        assert!(QuestConfig::load_or_default(&path).is_err());
    }

    #[test]
    fn partial_file_fills_missing_sections_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[runner]\ncooldown_secs = 60\n").unwrap();

        let config = QuestConfig::from_file(&path).unwrap();
        assert_eq!(config.runner.cooldown_secs, 60);
        assert_eq!(config.runner.task_pacing_ms, 1000);
        assert_eq!(config.api.auth_retry_limit, 1);
    }

    #[test]
    fn default_config_path_ends_with_config_toml() {
        let path = QuestConfig::default_config_path();
        let path_str = path.to_string_lossy();
        assert!(path_str.ends_with("config.toml"));
        assert!(path_str.contains("questling"));
    }

    #[test]
    fn token_path_prefers_explicit_override() {
        let mut config = QuestConfig::default();
        config.token.path = Some(PathBuf::from("/tmp/elsewhere/tok"));
        assert_eq!(config.token_path(), PathBuf::from("/tmp/elsewhere/tok"));
    }

    #[test]
    fn token_path_defaults_under_config_dir() {
        let config = QuestConfig::default();
        let path = config.token_path();
        assert!(path.to_string_lossy().ends_with("token.txt"));
    }

    #[test]
    fn config_serializes_to_toml() {
        let config = QuestConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("base_url"));
        assert!(toml_str.contains("task_pacing_ms"));
        assert!(toml_str.contains("cooldown_secs"));
    }
}
