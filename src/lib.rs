//! Cohort rules: a small boolean filter language over participant records.
//!
//! ```
//! use cohort_rule::{compile, Evaluator, Record};
//! use serde_json::json;
//!
//! let rule = compile("{enrollee.subject} = true and {age} >= 18").unwrap();
//! let record = Record::from_json(json!({
//!     "enrollee": {"subject": true},
//!     "age": 34
//! }))
//! .unwrap();
//!
//! assert!(Evaluator::new().matches(&rule, &record).unwrap());
//! ```
pub mod ast;
pub mod builder;
pub mod cli;
pub mod convert;
pub mod evaluator;
pub mod facet;
pub mod functions;
pub mod lexer;
pub mod parser;
pub mod record;
pub mod value;

use thiserror::Error;

pub use ast::{CompareOp, Expr, FunctionCall, Literal, Operand, Position, Token, TokenKind, VariableRef};
pub use builder::{Joiner, concat_search_expressions, concat_search_expressions_with};
pub use evaluator::{EvalConfig, EvalError, Evaluator, evaluate};
pub use facet::{Facet, FacetError};
pub use functions::FunctionRegistry;
pub use lexer::{LexError, Lexer, tokenize};
pub use parser::{ParseError, Parser, parse};
pub use record::{Record, RecordError};
pub use value::{Number, Value};

/// Failure to turn source text into an expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

impl Error {
    pub fn position(&self) -> Position {
        match self {
            Error::Lex(e) => e.position(),
            Error::Parse(e) => e.position,
        }
    }
}

/// Tokenizes and parses `source` in one step.
pub fn compile(source: &str) -> Result<Expr, Error> {
    let tokens = tokenize(source)?;
    Ok(parse(tokens)?)
}
