//! # Cohort Rule Language - Abstract Syntax Tree
//!
//! This module defines the tokens and expression tree for the cohort rule
//! language, a small boolean filter language used to select participants
//! by comparing fields of their records.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens and source positions produced by the lexer
//! - **[path]** - Variable references (`{enrollee.subject}`) and their segments
//! - **[operators]** - Comparison operators
//! - **[expressions]** - Expression nodes (literals, comparisons, boolean combinators)
//!
//! ## Quick Start
//!
//! ```text
//! {enrollee.subject} = true and {enrollee.consented} = true
//! ```
//!
//! This rule keeps enrollees that are study subjects and have consented.
//!
//! ## Core Concepts
//!
//! ### Variables
//!
//! A variable is a dotted path wrapped in braces. Segments may carry an
//! array index or a quoted key, and plain fields may trail the closing brace:
//!
//! ```text
//! {profile.givenName}
//! {answer.medical_history.diagnosis}
//! {profile["ourhealth"].givenName}
//! {question1[0]["sub"]}.trailer
//! ```
//!
//! ### Precedence
//!
//! From loosest to tightest: `or`, `and`, then the unary `!` and
//! `include(...)` forms. Parentheses override everything and leave no trace
//! in the tree.
//!
//! ```text
//! {a} = 1 or {b} = 2 and {c} = 3      // a or (b and c)
//! ({a} = 1 or {b} = 2) and {c} = 3    // (a or b) and c
//! ```
//!
//! ### Functions
//!
//! Function calls may stand on their own or take the place of an operand:
//!
//! ```text
//! lower({profile.name}) contains 'smith'
//! max({age}, 18) >= 21
//! ```
pub mod expressions;
pub mod operators;
pub mod path;
pub mod tokens;

pub use expressions::{Expr, FunctionCall, Literal, Operand};
pub use operators::CompareOp;
pub use path::{PathSegment, VariableRef};
pub use tokens::{Position, Token, TokenKind};
