use std::fmt;

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// Equal (`=`)
    Equal,
    /// Not equal (`!=`)
    NotEqual,
    /// Less than (`<`)
    LessThan,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than (`>`)
    GreaterThan,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Collection membership or substring (`contains`)
    Contains,
}

impl CompareOp {
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        match lexeme {
            "=" => Some(CompareOp::Equal),
            "!=" => Some(CompareOp::NotEqual),
            "<" => Some(CompareOp::LessThan),
            "<=" => Some(CompareOp::LessEqual),
            ">" => Some(CompareOp::GreaterThan),
            ">=" => Some(CompareOp::GreaterEqual),
            "contains" => Some(CompareOp::Contains),
            _ => None,
        }
    }

    /// Canonical spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Equal => "=",
            CompareOp::NotEqual => "!=",
            CompareOp::LessThan => "<",
            CompareOp::LessEqual => "<=",
            CompareOp::GreaterThan => ">",
            CompareOp::GreaterEqual => ">=",
            CompareOp::Contains => "contains",
        }
    }

    /// Ordering comparisons require both operands to be numeric.
    pub fn is_ordinal(&self) -> bool {
        matches!(
            self,
            CompareOp::LessThan
                | CompareOp::LessEqual
                | CompareOp::GreaterThan
                | CompareOp::GreaterEqual
        )
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
