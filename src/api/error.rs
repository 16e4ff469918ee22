//! Error types for the gateway API module.
//!
//! Each variant carries a stable error code (SCREAMING_SNAKE_CASE) that is
//! included in the Display output and accessible via [`ApiError::code()`].
//! Runner events carry these codes so fail-open failures stay machine
//! readable.

/// Stable error codes for programmatic error handling.
///
/// These codes never change and form part of the public API contract.
/// Use these for distinguishing errors rather than parsing Display output.
pub mod error_codes {
    /// Non-success HTTP status (other than the handled 401).
    pub const HTTP_STATUS: &str = "HTTP_STATUS";

    /// Response body was not valid JSON.
    pub const PARSE_FAILED: &str = "PARSE_FAILED";

    /// Connection, TLS, or timeout failure before any status line.
    pub const TRANSPORT_FAILED: &str = "TRANSPORT_FAILED";

    /// Token revalidation did not produce a usable token.
    pub const REVALIDATION_FAILED: &str = "REVALIDATION_FAILED";

    /// The server kept answering 401 after the revalidation budget.
    pub const AUTH_RETRIES_EXHAUSTED: &str = "AUTH_RETRIES_EXHAUSTED";

    /// Token file could not be read or written.
    pub const TOKEN_STORE: &str = "TOKEN_STORE";

    /// The task action has no completion endpoint.
    pub const UNSUPPORTED_ACTION: &str = "UNSUPPORTED_ACTION";
}

/// Errors produced by gateway API calls.
///
/// Each variant includes a stable error code accessible via
/// [`ApiError::code()`]. The Display impl formats as `[CODE] message`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The gateway answered with a non-success status.
    ///
    /// A 401 on a primary request is consumed by the revalidation loop
    /// and resurfaces, if persistent, as
    /// [`ApiError::AuthRetriesExhausted`]. A 401 from the revalidation
    /// endpoint itself is reported as-is.
    #[error("[{}] gateway returned HTTP {status}", error_codes::HTTP_STATUS)]
    Http {
        /// The HTTP status code.
        status: u16,
    },

    /// A success response carried a body that is not valid JSON.
    #[error("[{}] {}", error_codes::PARSE_FAILED, .0)]
    Parse(String),

    /// The request never produced a status line (connect/TLS/timeout).
    #[error("[{}] {}", error_codes::TRANSPORT_FAILED, .0)]
    Transport(String),

    /// The revalidation response carried no usable `token` field.
    ///
    /// The previously persisted token stays in place.
    #[error("[{}] {}", error_codes::REVALIDATION_FAILED, .0)]
    Revalidation(String),

    /// Every revalidation in the configured budget was spent and the
    /// server still answers 401.
    #[error(
        "[{}] still unauthorized after {limit} token revalidation(s)",
        error_codes::AUTH_RETRIES_EXHAUSTED
    )]
    AuthRetriesExhausted {
        /// The configured revalidation budget that was exhausted.
        limit: u32,
    },

    /// The token file could not be read or written.
    #[error("[{}] {}", error_codes::TOKEN_STORE, .0)]
    Store(#[from] crate::token::StoreError),

    /// No completion endpoint exists for this task action.
    #[error(
        "[{}] no completion endpoint for task action: {}",
        error_codes::UNSUPPORTED_ACTION,
        .0
    )]
    UnsupportedAction(String),
}

impl ApiError {
    /// Returns the stable error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Http { .. } => error_codes::HTTP_STATUS,
            Self::Parse(_) => error_codes::PARSE_FAILED,
            Self::Transport(_) => error_codes::TRANSPORT_FAILED,
            Self::Revalidation(_) => error_codes::REVALIDATION_FAILED,
            Self::AuthRetriesExhausted { .. } => error_codes::AUTH_RETRIES_EXHAUSTED,
            Self::Store(_) => error_codes::TOKEN_STORE,
            Self::UnsupportedAction(_) => error_codes::UNSUPPORTED_ACTION,
        }
    }

    /// HTTP status carried by this error, when one exists.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status } => Some(*status),
            _ => None,
        }
    }
}

/// Convenience alias for gateway API results.
pub type Result<T> = std::result::Result<T, ApiError>;
