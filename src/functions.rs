//! Functions callable from rules, keyed by name.
//!
//! The default table holds the functions the participant search service
//! understands: `lower`, `trim`, `min` and `max`.

use std::collections::HashMap;
use std::fmt;

use std::cmp::Ordering;

use crate::{
    evaluator::EvalError,
    value::{Number, Value},
};

/// Signature shared by every callable function. Arguments arrive evaluated.
pub type NativeFn = dyn Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync;

pub struct FunctionRegistry {
    functions: HashMap<String, Box<NativeFn>>,
}

impl FunctionRegistry {
    /// A table with no functions at all.
    pub fn empty() -> Self {
        FunctionRegistry {
            functions: HashMap::new(),
        }
    }

    /// A table with the built-in functions.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register("lower", lower);
        registry.register("trim", trim);
        registry.register("min", min);
        registry.register("max", max);
        registry
    }

    /// Adds or replaces a function.
    pub fn register<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Box::new(function));
    }

    pub fn get(&self, name: &str) -> Option<&NativeFn> {
        self.functions.get(name).map(|f| f.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}

fn single_arg<'a>(name: &'static str, args: &'a [Value]) -> Result<&'a Value, EvalError> {
    match args {
        [arg] => Ok(arg),
        _ => Err(EvalError::Arity {
            function: name.to_string(),
            expected: "exactly 1".to_string(),
            found: args.len(),
        }),
    }
}

/// lower(x) - lowercases a string
fn lower(args: &[Value]) -> Result<Value, EvalError> {
    match single_arg("lower", args)? {
        Value::Null => Ok(Value::Null),
        Value::String(s) => Ok(Value::String(s.to_lowercase())),
        other => Err(EvalError::TypeError(format!(
            "lower() requires string, got {}",
            other.type_name()
        ))),
    }
}

/// trim(x) - removes leading and trailing whitespace
fn trim(args: &[Value]) -> Result<Value, EvalError> {
    match single_arg("trim", args)? {
        Value::Null => Ok(Value::Null),
        Value::String(s) => Ok(Value::String(s.trim().to_string())),
        other => Err(EvalError::TypeError(format!(
            "trim() requires string, got {}",
            other.type_name()
        ))),
    }
}

fn min(args: &[Value]) -> Result<Value, EvalError> {
    extreme("min", args, Ordering::Less)
}

fn max(args: &[Value]) -> Result<Value, EvalError> {
    extreme("max", args, Ordering::Greater)
}

/// Picks the argument that orders `wins` against every other one.
/// Nulls are skipped; with nothing left the result is null.
fn extreme(name: &'static str, args: &[Value], wins: Ordering) -> Result<Value, EvalError> {
    if args.is_empty() {
        return Err(EvalError::Arity {
            function: name.to_string(),
            expected: "at least 1".to_string(),
            found: 0,
        });
    }

    let mut best: Option<(&Value, Number)> = None;
    for arg in args {
        if *arg == Value::Null {
            continue;
        }
        let n = arg.as_number().ok_or_else(|| {
            EvalError::TypeError(format!(
                "{}() requires numbers, got {}",
                name,
                arg.type_name()
            ))
        })?;
        match best {
            Some((_, current)) if n.partial_cmp(&current) != Some(wins) => {}
            _ => best = Some((arg, n)),
        }
    }

    Ok(best.map(|(v, _)| v.clone()).unwrap_or(Value::Null))
}
