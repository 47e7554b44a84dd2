//! Recursive descent parser for cohort rules.
//!
//! Grammar:
//!   expression   = or_expr ;
//!   or_expr      = and_expr { "or" and_expr } ;
//!   and_expr     = unary { "and" unary } ;
//!   unary        = "!" unary | "include" "(" or_expr ")" | primary ;
//!   primary      = "(" or_expr ")" | operand [ OPERATOR operand ] ;
//!   operand      = VARIABLE | literal | function_call ;
//!   function_call = FUNCTION_NAME "(" [ or_expr { "," or_expr } ] ")" ;
//!
//! Nesting deeper than [`MAX_NESTING`] is rejected.

use thiserror::Error;

use crate::{
    ast::{CompareOp, Expr, FunctionCall, Literal, Operand, Position, Token, TokenKind, VariableRef},
    lexer::{LexError, Lexer},
};

/// A structurally invalid token sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected} at {position}, found {found}")]
pub struct ParseError {
    pub position: Position,
    pub expected: String,
    pub found: String,
    pub found_kind: TokenKind,
}

/// Deepest allowed nesting of groups, `!`, `include(...)` and call
/// arguments. Evaluation and rendering recurse as deep as parsing does.
pub const MAX_NESTING: usize = 128;

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    depth: usize,
}

impl Parser {
    /// Creates a parser over lexed tokens. Whitespace is dropped and a
    /// trailing `Eof` is added when missing.
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut tokens: Vec<Token> = tokens.into_iter().filter(|t| !t.is_trivia()).collect();

        if tokens.last().is_none_or(|t| t.kind != TokenKind::Eof) {
            let position = tokens
                .last()
                .map(|t| Position {
                    offset: t.position.offset + t.lexeme.chars().count(),
                    line: t.position.line,
                    column: t.position.column + t.lexeme.chars().count(),
                })
                .unwrap_or_default();
            tokens.push(Token::new(TokenKind::Eof, "", position));
        }

        Parser {
            tokens,
            current: 0,
            depth: 0,
        }
    }

    /// Lexes `source` and creates a parser over the result.
    pub fn from_source(source: &str) -> Result<Self, LexError> {
        Ok(Parser::new(Lexer::new(source).tokenize()?))
    }

    fn peek(&self) -> &Token {
        // `new` guarantees a trailing Eof, and `advance` never moves past it.
        &self.tokens[self.current]
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.current].clone();
        if token.kind != TokenKind::Eof {
            self.current += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn error(&self, expected: &str) -> ParseError {
        let token = self.peek();
        ParseError {
            position: token.position,
            expected: expected.to_string(),
            found: token.describe(),
            found_kind: token.kind,
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(expected))
        }
    }

    fn parse_literal(&self, token: &Token) -> Result<Literal, ParseError> {
        let literal = match token.kind {
            TokenKind::Number if token.lexeme.contains('.') => {
                Literal::Float(token.lexeme.parse::<f64>().map_err(|_| self.token_error(token, "a valid number"))?)
            }
            TokenKind::Number => match token.lexeme.parse::<i64>() {
                Ok(n) => Literal::Integer(n),
                // Too large for an integer; keep it as a decimal.
                Err(_) => Literal::Float(token.lexeme.parse::<f64>().map_err(|_| self.token_error(token, "a valid number"))?),
            },
            TokenKind::String => {
                // Strip the surrounding quotes: 'John' -> John
                let inner = token
                    .lexeme
                    .strip_prefix('\'')
                    .and_then(|rest| rest.strip_suffix('\''))
                    .ok_or_else(|| self.token_error(token, "a quoted string"))?;
                Literal::String(inner.to_string())
            }
            TokenKind::Boolean => Literal::Boolean(token.lexeme == "true"),
            TokenKind::Null => Literal::Null,
            _ => return Err(self.token_error(token, "a literal")),
        };
        Ok(literal)
    }

    fn token_error(&self, token: &Token, expected: &str) -> ParseError {
        ParseError {
            position: token.position,
            expected: expected.to_string(),
            found: token.describe(),
            found_kind: token.kind,
        }
    }

    fn parse_variable(&self, token: &Token) -> Result<VariableRef, ParseError> {
        VariableRef::from_lexeme(&token.lexeme)
            .ok_or_else(|| self.token_error(token, "a well-formed variable"))
    }

    fn parse_function_call(&mut self) -> Result<FunctionCall, ParseError> {
        let name = self.advance().lexeme;
        self.expect(TokenKind::ParenOpen, "'(' after function name")?;

        let mut args = vec![];
        if !self.check(TokenKind::ParenClose) {
            args.push(self.parse_expression()?);
            while self.check(TokenKind::Comma) {
                self.advance();
                args.push(self.parse_expression()?);
            }
        }

        self.expect(TokenKind::ParenClose, "',' or ')' in argument list")?;
        Ok(FunctionCall { name, args })
    }

    /// Parse a comparison operand: variable, literal or function call
    fn parse_operand(&mut self) -> Result<Operand, ParseError> {
        let kind = self.peek().kind;
        match kind {
            TokenKind::Variable => {
                let token = self.advance();
                Ok(Operand::Variable(self.parse_variable(&token)?))
            }
            k if k.is_literal() => {
                let token = self.advance();
                Ok(Operand::Literal(self.parse_literal(&token)?))
            }
            TokenKind::FunctionName => Ok(Operand::Call(self.parse_function_call()?)),
            _ => Err(self.error("a variable, literal or function call")),
        }
    }

    /// Parse primary expressions: a parenthesized group, or an operand
    /// optionally followed by a comparison
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        if self.check(TokenKind::ParenOpen) {
            self.advance();
            let expr = self.parse_expression()?;
            self.expect(TokenKind::ParenClose, "')'")?;
            return Ok(expr);
        }

        let kind = self.peek().kind;
        if kind != TokenKind::Variable && kind != TokenKind::FunctionName && !kind.is_literal() {
            return Err(self.error("an expression"));
        }

        let left = self.parse_operand()?;

        if self.check(TokenKind::Operator) {
            let token = self.advance();
            let op = CompareOp::from_lexeme(&token.lexeme).ok_or_else(|| ParseError {
                position: token.position,
                expected: "a comparison operator".to_string(),
                found: token.describe(),
                found_kind: token.kind,
            })?;
            let right = self.parse_operand()?;
            return Ok(Expr::Comparison { left, op, right });
        }

        Ok(left.into_expr())
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(self.error("shallower nesting"));
        }
        self.depth += 1;
        let result = self.parse_prefixed();
        self.depth -= 1;
        result
    }

    fn parse_prefixed(&mut self) -> Result<Expr, ParseError> {
        match self.peek().kind {
            TokenKind::Not => {
                self.advance();
                // Right-associative; `!!x` stays doubly negated
                let operand = self.parse_unary()?;
                Ok(Expr::Not(Box::new(operand)))
            }
            TokenKind::Include => {
                self.advance();
                self.expect(TokenKind::ParenOpen, "'(' after include")?;
                let operand = self.parse_expression()?;
                self.expect(TokenKind::ParenClose, "')'")?;
                Ok(Expr::Include(Box::new(operand)))
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        while self.check(TokenKind::And) {
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;

        while self.check(TokenKind::Or) {
            self.advance();
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_or()
    }

    /// Parses a complete rule; anything left after it is an error.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;
        self.expect(TokenKind::Eof, "end of input")?;
        log::debug!("parsed rule: {}", expr);
        Ok(expr)
    }
}

/// Parses a token sequence, as produced by [`crate::tokenize`], into an
/// expression tree.
pub fn parse(tokens: Vec<Token>) -> Result<Expr, ParseError> {
    Parser::new(tokens).parse()
}

#[test]
fn test_missing_right_operand_points_at_eof() {
    let err = Parser::from_source("{a} = ").unwrap().parse().unwrap_err();
    assert_eq!(err.found_kind, TokenKind::Eof);
    assert_eq!(err.position.offset, 6);
    assert_eq!(err.found, "end of input");
}
