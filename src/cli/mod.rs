//! CLI support for cohort-rule
//!
//! Provides programmatic access to the command-line functionality so other
//! tools can validate and try out rules the same way.

mod check;
mod tokens;

pub use check::{CheckOptions, CheckResult, execute_check};
pub use tokens::dump_tokens;

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Compile(#[from] crate::Error),

    #[error("Evaluation error: {0}")]
    Eval(#[from] crate::EvalError),

    #[error("Invalid record: {0}")]
    Record(#[from] crate::RecordError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Use --input or pipe a JSON record to stdin.")]
    NoInput,
}
