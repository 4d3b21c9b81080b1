//! Error types for path tokenizing and resolution.
//!
//! Every fallible operation returns `Result<T, PathError>`. The compatibility
//! surface (`get`, `set`, `is_valid`) folds all of them into `None` / `false`.

use thiserror::Error;

/// Broad classification of a [`PathError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    SyntaxInvalid,
    ResolutionFailed,
    NotCallable,
    ResourceExhausted,
    Config,
}

/// Errors produced while tokenizing or resolving a path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    /// Malformed path text
    #[error("Syntax error at position {position}: {reason}")]
    SyntaxInvalid { position: usize, reason: String },

    /// A step could not be resolved or a write did not take effect
    #[error("Resolution failed: {0}")]
    ResolutionFailed(String),

    /// A call container was applied to something that is not callable
    #[error("Not callable: {0}")]
    NotCallable(String),

    /// Nesting exceeded the configured depth limit
    #[error("Nesting depth limit of {0} exceeded")]
    DepthExceeded(usize),

    /// An option passed to `configure` was rejected
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl PathError {
    pub fn syntax(position: usize, reason: impl Into<String>) -> Self {
        PathError::SyntaxInvalid {
            position,
            reason: reason.into(),
        }
    }

    pub fn resolution(msg: impl Into<String>) -> Self {
        PathError::ResolutionFailed(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PathError::SyntaxInvalid { .. } => ErrorKind::SyntaxInvalid,
            PathError::ResolutionFailed(_) => ErrorKind::ResolutionFailed,
            PathError::NotCallable(_) => ErrorKind::NotCallable,
            PathError::DepthExceeded(_) => ErrorKind::ResourceExhausted,
            PathError::Config(_) => ErrorKind::Config,
        }
    }
}

/// Result type alias for path operations
pub type Result<T> = std::result::Result<T, PathError>;
