//! Error types for PageBuilder.
//!
//! Library crates use [`PageBuilderError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all PageBuilder operations.
#[derive(Debug, thiserror::Error)]
pub enum PageBuilderError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error (layout files, navigation fragments).
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Page property payload could not be accepted.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Layout loading or placeholder substitution failed.
    #[error("template error: {0}")]
    Template(String),

    /// The navigation renderer could not produce markup.
    #[error("navigation error: {0}")]
    Navigation(String),

    /// A request collaborator (initializer, CMS hook) failed.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// URL-encoded JSON request field could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PageBuilderError>;

impl PageBuilderError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create a template error from any displayable message.
    pub fn template(msg: impl Into<String>) -> Self {
        Self::Template(msg.into())
    }

    /// Create a navigation error from any displayable message.
    pub fn navigation(msg: impl Into<String>) -> Self {
        Self::Navigation(msg.into())
    }

    /// Create an upstream error from any displayable message.
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
