//! CLI support for tkpath
//!
//! Provides programmatic access to the `tkpath` binary's commands so they
//! can be embedded in other tools.

mod convert;
mod run;

pub use convert::{json_to_value, value_to_json};
pub use run::{Action, RunOptions, RunResult, execute};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// Tokenizing or resolution failed
    #[error("{0}")]
    Path(#[from] crate::PathError),
    /// JSON parsing error
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// No input provided
    #[error("No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,
    /// Nothing equal to the searched value exists in the input
    #[error("Value not found")]
    NotFound,
}
