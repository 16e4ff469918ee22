//! Centralized application directory paths for questling.
//!
//! Provides a single source of truth for the filesystem paths used by the
//! client. Uses the [`dirs`] crate for platform-appropriate directory
//! resolution.
//!
//! # Directory Layout
//!
//! | Purpose | macOS | Linux |
//! |---------|-------|-------|
//! | Config | `~/Library/Application Support/questling/` | `~/.config/questling/` |
//!
//! # Environment Overrides
//!
//! - `QUESTLING_CONFIG_DIR` — overrides [`config_dir`]

use std::path::PathBuf;

/// Application config directory.
///
/// Used for `config.toml` and the default token file location.
///
/// Resolves to `dirs::config_dir()/questling/` by default. Override with
/// the `QUESTLING_CONFIG_DIR` environment variable.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("QUESTLING_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("questling"))
        .unwrap_or_else(|| PathBuf::from("/tmp/questling-config"))
}

/// Main config file path (`config_dir()/config.toml`).
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Default token file path (`config_dir()/token.txt`).
///
/// The token file is a plain text file so it can be seeded by hand or by
/// external tooling; see [`crate::token::TokenStore`].
#[must_use]
pub fn token_file() -> PathBuf {
    config_dir().join("token.txt")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_dir_is_nonempty() {
        let dir = config_dir();
        assert!(!dir.as_os_str().is_empty());
    }

    #[test]
    fn config_file_ends_with_config_toml() {
        let path = config_file();
        let s = path.to_string_lossy();
        assert!(s.ends_with("config.toml"), "config_file: {s}");
    }

    #[test]
    fn token_file_ends_with_token_txt() {
        let path = token_file();
        let s = path.to_string_lossy();
        assert!(s.ends_with("token.txt"), "token_file: {s}");
    }

    #[test]
    fn config_dir_override_via_env() {
        let key = "QUESTLING_CONFIG_DIR";
        let original = std::env::var_os(key);

        // Override value must keep "questling" in the path: tests in other
        // modules read this variable concurrently and assert on it.
        unsafe { std::env::set_var(key, "/custom/questling") };
        let result = config_dir();
        assert_eq!(result, PathBuf::from("/custom/questling"));

        // Restore.
        match original {
            Some(val) => unsafe { std::env::set_var(key, val) },
            None => unsafe { std::env::remove_var(key) },
        }
    }
}
