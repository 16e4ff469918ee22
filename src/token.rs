//! Persistent bearer-token storage.
//!
//! The gateway issues an opaque bearer token that outlives any single run of
//! the client, so it lives in a plain text file (seedable by hand) rather
//! than in memory. Exactly one [`TokenStore`] owns that file; the API client
//! re-reads it on every request attempt and the revalidation flow replaces
//! it in place. Writes are atomic (temp file + rename) so a crash mid-save
//! never leaves a truncated token behind.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Errors raised by [`TokenStore`] operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The token file does not exist.
    #[error("token file not found: {}", .0.display())]
    Missing(PathBuf),

    /// The token file exists but contains only whitespace.
    #[error("token file is empty: {}", .0.display())]
    Empty(PathBuf),

    /// The token file could not be read.
    #[error("cannot read token file: {0}")]
    Io(String),

    /// The token file could not be written.
    #[error("cannot write token file: {0}")]
    Write(String),
}

/// Owns the token file on disk.
///
/// Injected into the API client so there is no ambient file access; tests
/// point it at a temp directory.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Create a store backed by the given file path. The file need not
    /// exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current token, trimming surrounding whitespace.
    pub fn load(&self) -> Result<String, StoreError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::Missing(self.path.clone()));
            }
            Err(e) => {
                return Err(StoreError::Io(format!("{}: {e}", self.path.display())));
            }
        };
        let token = contents.trim();
        if token.is_empty() {
            return Err(StoreError::Empty(self.path.clone()));
        }
        Ok(token.to_string())
    }

    /// Atomically replace the persisted token.
    ///
    /// Writes a sibling temp file and renames it over the target, creating
    /// parent directories as needed.
    pub fn save(&self, token: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Write(format!("cannot create {}: {e}", parent.display()))
                })?;
            }
        }
        let tmp = staging_path(&self.path);
        std::fs::write(&tmp, token)
            .map_err(|e| StoreError::Write(format!("{}: {e}", tmp.display())))?;
        std::fs::rename(&tmp, &self.path)
            .map_err(|e| StoreError::Write(format!("{}: {e}", self.path.display())))
    }
}

/// Sibling path used for staged writes (`token.txt` → `token.txt.tmp`).
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("token"));
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.txt"));
        store.save("abc123").unwrap();
        assert_eq!(store.load().unwrap(), "abc123");
    }

    #[test]
    fn load_missing_file_is_distinct_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.txt"));
        match store.load() {
            Err(StoreError::Missing(path)) => assert!(path.ends_with("token.txt")),
            other => panic!("expected Missing, got {other:?}"),
        }
    }

    #[test]
    fn load_blank_file_is_distinct_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.txt");
        std::fs::write(&path, "  \n\t").unwrap();
        let store = TokenStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Empty(_))));
    }

    #[test]
    fn load_trims_surrounding_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.txt");
        std::fs::write(&path, "  tok-42\n").unwrap();
        let store = TokenStore::new(&path);
        assert_eq!(store.load().unwrap(), "tok-42");
    }

    #[test]
    fn save_overwrites_previous_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.txt"));
        store.save("old-token").unwrap();
        store.save("new-token").unwrap();
        assert_eq!(store.load().unwrap(), "new-token");
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("nested/deeper/token.txt"));
        store.save("abc").unwrap();
        assert_eq!(store.load().unwrap(), "abc");
    }

    #[test]
    fn save_leaves_no_staging_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.txt"));
        store.save("abc").unwrap();
        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![OsString::from("token.txt")]);
    }

    #[test]
    fn store_error_messages_name_the_path() {
        let store = TokenStore::new("/nonexistent/dir/token.txt");
        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("token.txt"), "{err}");
    }
}
