//! Error types for minutegen.
//!
//! Library crates use [`MinutegenError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all minutegen operations.
#[derive(Debug, thiserror::Error)]
pub enum MinutegenError {
    /// Configuration loading or validation error, including a missing
    /// template slot id.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while fetching a listing or a minutes document.
    #[error("network error: {0}")]
    Network(String),

    /// Filesystem I/O error (template read, output write).
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failure while building one render target.
    #[error("render error: {0}")]
    Render(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, MinutegenError>;

impl MinutegenError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
