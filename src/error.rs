//! Error types for the questling crate.

/// Top-level error type for the quest polling system.
#[derive(Debug, thiserror::Error)]
pub enum QuestError {
    /// Configuration error (file access, TOML parse, invalid values).
    #[error("config error: {0}")]
    Config(String),

    /// Token file storage error.
    #[error("token store error: {0}")]
    Store(#[from] crate::token::StoreError),

    /// Gateway API error.
    #[error("api error: {0}")]
    Api(#[from] crate::api::ApiError),

    /// Poll loop error.
    #[error("runner error: {0}")]
    Runner(#[from] crate::runner::RunnerError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, QuestError>;
