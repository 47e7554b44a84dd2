use std::fmt;

use crate::ast::{CompareOp, VariableRef};

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Literal integer
    ///
    /// # Example
    /// ```text
    /// 42
    /// ```
    Integer(i64),

    /// Literal decimal number
    ///
    /// # Example
    /// ```text
    /// 42.5
    /// ```
    Float(f64),

    /// Single-quoted string literal
    ///
    /// # Example
    /// ```text
    /// 'hello'
    /// ```
    String(String),

    Boolean(bool),

    Null,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(n) => write!(f, "{}", n),
            // Keep a fractional part so the text lexes back as a decimal.
            Literal::Float(n) if n.is_finite() && n.fract() == 0.0 => write!(f, "{:.1}", n),
            Literal::Float(n) => write!(f, "{}", n),
            Literal::String(s) => write!(f, "'{}'", s),
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Null => f.write_str("null"),
        }
    }
}

/// A function applied to a list of argument expressions.
///
/// # Examples
/// ```text
/// lower({profile.name})
/// max({age}, 18)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<Expr>,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, args: Vec<Expr>) -> Self {
        FunctionCall {
            name: name.into(),
            args,
        }
    }
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", arg)?;
        }
        f.write_str(")")
    }
}

/// One side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Variable(VariableRef),
    Literal(Literal),
    Call(FunctionCall),
}

impl Operand {
    /// The operand as a standalone expression.
    pub fn into_expr(self) -> Expr {
        match self {
            Operand::Variable(var) => Expr::Variable(var),
            Operand::Literal(lit) => Expr::Literal(lit),
            Operand::Call(call) => Expr::Call(call),
        }
    }
}

impl From<VariableRef> for Operand {
    fn from(var: VariableRef) -> Self {
        Operand::Variable(var)
    }
}

impl From<Literal> for Operand {
    fn from(lit: Literal) -> Self {
        Operand::Literal(lit)
    }
}

impl From<FunctionCall> for Operand {
    fn from(call: FunctionCall) -> Self {
        Operand::Call(call)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Variable(var) => write!(f, "{}", var),
            Operand::Literal(lit) => write!(f, "{}", lit),
            Operand::Call(call) => write!(f, "{}", call),
        }
    }
}

/// Abstract Syntax Tree node representing a parsed rule.
///
/// Parenthesized groups do not get a node of their own: they only steer how
/// the tree is built.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),

    /// Bare variable, evaluated for truthiness when used as a condition
    ///
    /// # Example
    /// ```text
    /// {enrollee.subject}
    /// ```
    Variable(VariableRef),

    /// Comparison between two operands
    ///
    /// # Examples
    /// ```text
    /// {age} >= 18
    /// {profile.name} contains 'smith'
    /// lower({profile.name}) = 'john'
    /// ```
    Comparison {
        left: Operand,
        op: CompareOp,
        right: Operand,
    },

    /// Standalone function call
    Call(FunctionCall),

    /// Negation (`!expr`)
    Not(Box<Expr>),

    /// Logical AND, left-associative
    And(Box<Expr>, Box<Expr>),

    /// Logical OR, left-associative
    Or(Box<Expr>, Box<Expr>),

    /// Inclusion predicate (`include(expr)`)
    ///
    /// Evaluates like its operand, but marks the rule as one that selects
    /// participants rather than one that is only displayed.
    Include(Box<Expr>),
}

impl Expr {
    pub fn compare(left: impl Into<Operand>, op: CompareOp, right: impl Into<Operand>) -> Self {
        Expr::Comparison {
            left: left.into(),
            op,
            right: right.into(),
        }
    }

    pub fn and(left: Expr, right: Expr) -> Self {
        Expr::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Expr, right: Expr) -> Self {
        Expr::Or(Box::new(left), Box::new(right))
    }

    pub fn not(operand: Expr) -> Self {
        Expr::Not(Box::new(operand))
    }

    pub fn include(operand: Expr) -> Self {
        Expr::Include(Box::new(operand))
    }

    /// Whether the top of the tree is an `include(...)` predicate.
    pub fn is_inclusion(&self) -> bool {
        matches!(self, Expr::Include(_))
    }

    /// Every variable referenced by the expression, in source order.
    pub fn variables(&self) -> Vec<&VariableRef> {
        let mut vars = Vec::new();
        self.collect_variables(&mut vars);
        vars
    }

    fn collect_variables<'a>(&'a self, vars: &mut Vec<&'a VariableRef>) {
        match self {
            Expr::Literal(_) => {}
            Expr::Variable(var) => vars.push(var),
            Expr::Comparison { left, right, .. } => {
                for operand in [left, right] {
                    match operand {
                        Operand::Variable(var) => vars.push(var),
                        Operand::Literal(_) => {}
                        Operand::Call(call) => call.args.iter().for_each(|a| a.collect_variables(vars)),
                    }
                }
            }
            Expr::Call(call) => call.args.iter().for_each(|a| a.collect_variables(vars)),
            Expr::Not(inner) | Expr::Include(inner) => inner.collect_variables(vars),
            Expr::And(left, right) | Expr::Or(left, right) => {
                left.collect_variables(vars);
                right.collect_variables(vars);
            }
        }
    }

    /// Binding strength, loosest first.
    fn precedence(&self) -> u8 {
        match self {
            Expr::Or(..) => 1,
            Expr::And(..) => 2,
            Expr::Not(_) | Expr::Include(_) => 3,
            _ => 4,
        }
    }

    fn fmt_child(&self, f: &mut fmt::Formatter<'_>, min: u8) -> fmt::Result {
        if self.precedence() < min {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

/// Renders canonical source text that parses back to the same tree.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(lit) => write!(f, "{}", lit),
            Expr::Variable(var) => write!(f, "{}", var),
            Expr::Comparison { left, op, right } => write!(f, "{} {} {}", left, op, right),
            Expr::Call(call) => write!(f, "{}", call),
            Expr::Not(inner) => {
                f.write_str("!")?;
                inner.fmt_child(f, 3)
            }
            Expr::Include(inner) => write!(f, "include({})", inner),
            Expr::And(left, right) => {
                left.fmt_child(f, 2)?;
                f.write_str(" and ")?;
                right.fmt_child(f, 3)
            }
            Expr::Or(left, right) => {
                left.fmt_child(f, 1)?;
                f.write_str(" or ")?;
                right.fmt_child(f, 2)
            }
        }
    }
}
