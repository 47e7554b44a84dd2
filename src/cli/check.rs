//! Validate rules and evaluate them against a JSON record

use super::CliError;
use crate::{EvalConfig, Evaluator, Record, compile, convert::value_to_json};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The rule to check
    pub expression: String,
    /// JSON record
    pub input: Option<String>,
    /// Only validate syntax, don't evaluate
    pub syntax_only: bool,
    pub config: EvalConfig,
}

/// Result of a check operation
#[derive(Debug, PartialEq)]
pub enum CheckResult {
    /// Syntax validation passed; carries the canonical form of the rule
    SyntaxValid(String),
    /// Rule evaluated against the record
    Evaluated {
        value: serde_json::Value,
        matched: bool,
    },
}

impl CheckResult {
    /// One-line verdict, printed on stderr by the binary.
    pub fn status(&self) -> &'static str {
        match self {
            CheckResult::SyntaxValid(_) => "Syntax is valid",
            CheckResult::Evaluated { matched: true, .. } => "Record matches",
            CheckResult::Evaluated { matched: false, .. } => "Record does not match",
        }
    }
}

/// Execute a check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let expr = compile(&options.expression)?;

    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid(expr.to_string()));
    }

    let json_str = options.input.as_ref().ok_or(CliError::NoInput)?;
    let record = Record::from_json(serde_json::from_str(json_str)?)?;
    log::debug!("evaluating {} against record with {} field(s)", expr, record.len());

    let value = Evaluator::with_config(options.config).evaluate(&expr, &record)?;
    let matched = value.is_truthy();

    Ok(CheckResult::Evaluated {
        value: value_to_json(value),
        matched,
    })
}
