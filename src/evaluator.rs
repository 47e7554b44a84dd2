use thiserror::Error;

use crate::{
    ast::{CompareOp, Expr, FunctionCall, Operand},
    functions::FunctionRegistry,
    record::Record,
    value::Value,
};

/// Errors that can occur during rule evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Type mismatch or invalid operation for the given type
    #[error("type error: {0}")]
    TypeError(String),

    /// Ordering comparison on a value that is not a number
    #[error("cannot compare {left} {op} {right}: both operands must be numeric")]
    NotNumeric {
        op: CompareOp,
        left: &'static str,
        right: &'static str,
    },

    /// Boolean operator applied to a non-boolean value
    #[error("{operator} requires a boolean operand, got {found}")]
    NotBoolean {
        operator: &'static str,
        found: &'static str,
    },

    /// Call to a function missing from the registry
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// Wrong number of arguments
    #[error("{function}() expects {expected} argument(s), got {found}")]
    Arity {
        function: String,
        expected: String,
        found: usize,
    },
}

/// Evaluation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalConfig {
    /// `contains` on strings ignores case, as the search service's
    /// `ILIKE` filter does
    pub case_insensitive_contains: bool,
    /// `and`, `or`, `!` and `include` reject operands other than booleans
    /// and null; when off, truthiness is used instead
    pub strict_booleans: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            case_insensitive_contains: true,
            strict_booleans: true,
        }
    }
}

impl EvalConfig {
    pub fn case_insensitive_contains(mut self, enabled: bool) -> Self {
        self.case_insensitive_contains = enabled;
        self
    }

    pub fn strict_booleans(mut self, enabled: bool) -> Self {
        self.strict_booleans = enabled;
        self
    }
}

/// The rule evaluator.
///
/// Holds the function table and settings; evaluation itself never mutates
/// the evaluator, so one instance can serve many records at once.
#[derive(Debug, Default)]
pub struct Evaluator {
    functions: FunctionRegistry,
    config: EvalConfig,
}

impl Evaluator {
    /// Creates an evaluator with the built-in functions and default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EvalConfig) -> Self {
        Evaluator {
            functions: FunctionRegistry::default(),
            config,
        }
    }

    pub fn with_functions(mut self, functions: FunctionRegistry) -> Self {
        self.functions = functions;
        self
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    pub fn functions_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.functions
    }

    /// Evaluates an expression against one record.
    ///
    /// Missing variables resolve to `null`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cohort_rule::{compile, Evaluator, Record, Value};
    ///
    /// let rule = compile("{enrollee.subject} = true").unwrap();
    /// let record = Record::new().with("enrollee.subject", true);
    ///
    /// let result = Evaluator::new().evaluate(&rule, &record).unwrap();
    /// assert_eq!(result, Value::Boolean(true));
    /// ```
    pub fn evaluate(&self, expr: &Expr, record: &Record) -> Result<Value, EvalError> {
        match expr {
            Expr::Literal(lit) => Ok(Value::from(lit)),
            Expr::Variable(var) => Ok(record.lookup(var).cloned().unwrap_or(Value::Null)),
            Expr::Comparison { left, op, right } => {
                let left = self.eval_operand(left, record)?;
                let right = self.eval_operand(right, record)?;
                self.compare(*op, &left, &right).map(Value::Boolean)
            }
            Expr::Call(call) => self.eval_call(call, record),
            Expr::Not(inner) => {
                let value = self.evaluate(inner, record)?;
                Ok(Value::Boolean(!self.condition("!", &value)?))
            }
            Expr::Include(inner) => {
                let value = self.evaluate(inner, record)?;
                Ok(Value::Boolean(self.condition("include", &value)?))
            }
            Expr::And(left, right) => {
                let left = self.evaluate(left, record)?;
                if !self.condition("and", &left)? {
                    return Ok(Value::Boolean(false));
                }
                let right = self.evaluate(right, record)?;
                Ok(Value::Boolean(self.condition("and", &right)?))
            }
            Expr::Or(left, right) => {
                let left = self.evaluate(left, record)?;
                if self.condition("or", &left)? {
                    return Ok(Value::Boolean(true));
                }
                let right = self.evaluate(right, record)?;
                Ok(Value::Boolean(self.condition("or", &right)?))
            }
        }
    }

    /// Evaluates and reduces the result to a yes/no answer using
    /// truthiness, so a bare `{enrollee.subject}` selects truthy fields.
    pub fn matches(&self, expr: &Expr, record: &Record) -> Result<bool, EvalError> {
        Ok(self.evaluate(expr, record)?.is_truthy())
    }

    fn eval_operand(&self, operand: &Operand, record: &Record) -> Result<Value, EvalError> {
        match operand {
            Operand::Variable(var) => Ok(record.lookup(var).cloned().unwrap_or(Value::Null)),
            Operand::Literal(lit) => Ok(Value::from(lit)),
            Operand::Call(call) => self.eval_call(call, record),
        }
    }

    fn eval_call(&self, call: &FunctionCall, record: &Record) -> Result<Value, EvalError> {
        let function = self
            .functions
            .get(&call.name)
            .ok_or_else(|| EvalError::UnknownFunction(call.name.clone()))?;

        let args = call
            .args
            .iter()
            .map(|arg| self.evaluate(arg, record))
            .collect::<Result<Vec<_>, _>>()?;

        log::trace!("calling {}() with {} argument(s)", call.name, args.len());
        function(&args)
    }

    fn condition(&self, operator: &'static str, value: &Value) -> Result<bool, EvalError> {
        match value.as_bool() {
            Some(b) => Ok(b),
            None if !self.config.strict_booleans => Ok(value.is_truthy()),
            None => Err(EvalError::NotBoolean {
                operator,
                found: value.type_name(),
            }),
        }
    }

    fn compare(&self, op: CompareOp, left: &Value, right: &Value) -> Result<bool, EvalError> {
        match op {
            CompareOp::Equal => Ok(values_equal(left, right)),
            CompareOp::NotEqual => Ok(!values_equal(left, right)),
            CompareOp::Contains => self.contains(left, right),
            ordinal => {
                let (Some(l), Some(r)) = (left.coerce_number(), right.coerce_number()) else {
                    return Err(EvalError::NotNumeric {
                        op: ordinal,
                        left: left.type_name(),
                        right: right.type_name(),
                    });
                };
                Ok(match ordinal {
                    CompareOp::LessThan => l < r,
                    CompareOp::LessEqual => l <= r,
                    CompareOp::GreaterThan => l > r,
                    _ => l >= r,
                })
            }
        }
    }

    fn contains(&self, haystack: &Value, needle: &Value) -> Result<bool, EvalError> {
        match haystack {
            Value::Null => Ok(false),
            Value::Array(items) => Ok(items.iter().any(|item| values_equal(item, needle))),
            Value::String(s) => {
                let needle = match needle {
                    Value::String(n) => n.clone(),
                    Value::Integer(n) => n.to_string(),
                    Value::Float(n) => n.to_string(),
                    Value::Boolean(b) => b.to_string(),
                    Value::Null => return Ok(false),
                    other => {
                        return Err(EvalError::TypeError(format!(
                            "cannot search a string for {}",
                            other.type_name()
                        )));
                    }
                };
                if self.config.case_insensitive_contains {
                    Ok(s.to_lowercase().contains(&needle.to_lowercase()))
                } else {
                    Ok(s.contains(&needle))
                }
            }
            Value::Object(map) => match needle {
                Value::String(key) => Ok(map.contains_key(key)),
                other => Err(EvalError::TypeError(format!(
                    "object keys are strings, got {}",
                    other.type_name()
                ))),
            },
            other => Err(EvalError::TypeError(format!(
                "contains requires array, string or object, got {}",
                other.type_name()
            ))),
        }
    }
}

/// Numbers compare by value (`1 = 1.0`); everything else structurally.
fn values_equal(left: &Value, right: &Value) -> bool {
    match (left.as_number(), right.as_number()) {
        (Some(l), Some(r)) => l.partial_cmp(&r) == Some(std::cmp::Ordering::Equal),
        _ => left == right,
    }
}

/// Evaluates `expr` against `record` with a default [`Evaluator`].
pub fn evaluate(expr: &Expr, record: &Record) -> Result<Value, EvalError> {
    Evaluator::new().evaluate(expr, record)
}
