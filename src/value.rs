use std::cmp::Ordering;
use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};

use crate::ast::Literal;

/// A value read from a record or produced by evaluation.
///
/// Integers and floats stay distinct, as they do in record JSON.
///
/// # Examples
///
/// ```
/// use cohort_rule::Value;
/// use std::collections::HashMap;
///
/// let subject = Value::Boolean(true);
/// let age = Value::Integer(42);
/// let name = Value::String("Alice".to_string());
///
/// let mut profile = HashMap::new();
/// profile.insert("name".to_string(), name);
/// let profile = Value::Object(profile);
/// assert_eq!(profile.type_name(), "object");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,

    Boolean(bool),

    Float(f64),

    /// Integer number (preserved separately from floats)
    Integer(i64),

    String(String),

    Array(Vec<Value>),

    Object(HashMap<String, Value>),
}

impl Value {
    /// Check if the value is truthy (for top-level matching)
    pub fn is_truthy(&self) -> bool {
        use Value::*;
        match self {
            Null => false,
            Boolean(b) => *b,
            Float(n) => *n != 0.0,
            Integer(n) => *n != 0,
            String(s) => !s.is_empty(),
            Array(arr) => !arr.is_empty(),
            Object(obj) => !obj.is_empty(),
        }
    }

    /// Strict boolean view: booleans as-is, `null` as `false`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            Value::Null => Some(false),
            _ => None,
        }
    }

    /// Get as float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric view of a number value. Strings are not coerced.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Integer(n) => Some(Number::Exact(Decimal::from(*n))),
            Value::Float(n) => Some(Number::from_f64(*n)),
            _ => None,
        }
    }

    /// Numeric view used by ordering comparisons; numeric strings coerce.
    pub fn coerce_number(&self) -> Option<Number> {
        match self {
            Value::String(s) => {
                let s = s.trim();
                Decimal::from_str(s)
                    .or_else(|_| Decimal::from_scientific(s))
                    .map(Number::Exact)
                    .ok()
                    .or_else(|| {
                        s.parse::<f64>()
                            .ok()
                            .filter(|n| n.is_finite())
                            .map(Number::from_f64)
                    })
            }
            other => other.as_number(),
        }
    }

    /// Returns a human-readable type name
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

impl From<&Literal> for Value {
    fn from(lit: &Literal) -> Self {
        match lit {
            Literal::Integer(n) => Value::Integer(*n),
            Literal::Float(n) => Value::Float(*n),
            Literal::String(s) => Value::String(s.clone()),
            Literal::Boolean(b) => Value::Boolean(*b),
            Literal::Null => Value::Null,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

/// A number ready for comparison.
///
/// Decimals compare exactly. Floats outside what a `Decimal` holds
/// (beyond ~7.9e28, or with more than 28 fractional digits) stay as `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Exact(Decimal),
    Approx(f64),
}

impl Number {
    pub fn from_f64(n: f64) -> Self {
        match Decimal::from_f64(n) {
            Some(d) if d.to_f64() == Some(n) => Number::Exact(d),
            _ => Number::Approx(n),
        }
    }

    pub fn to_f64(self) -> f64 {
        match self {
            Number::Exact(d) => d.to_f64().unwrap_or(f64::NAN),
            Number::Approx(n) => n,
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Number::Exact(l), Number::Exact(r)) => Some(l.cmp(r)),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }
}
