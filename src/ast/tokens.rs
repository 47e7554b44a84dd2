use std::fmt;

/// Location of a token or error in the source text.
///
/// `offset` counts characters from the start of the input; `line` and
/// `column` are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// The position of the first character of any input.
    pub fn start() -> Self {
        Position {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// The category of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Argument separator (`,`)
    Comma,

    /// Integer or decimal number
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 3.14
    /// ```
    Number,

    /// Single-quoted string, no escapes
    ///
    /// # Examples
    /// ```text
    /// 'active'
    /// 'item #1'
    /// ```
    String,

    /// Braced field path, including any trailing dotted suffix
    ///
    /// # Examples
    /// ```text
    /// {enrollee.subject}
    /// {profile["ourhealth"].givenName}
    /// {question1[0]}.trailer
    /// ```
    Variable,

    /// `true` or `false`
    Boolean,

    /// `null`
    Null,

    /// Spaces, tabs, carriage returns and newlines
    Whitespace,

    /// Comparison operator: `=`, `!=`, `<`, `<=`, `>`, `>=` or `contains`
    Operator,

    /// Logical AND (lowercase word `and`)
    And,

    /// Logical OR (lowercase word `or`)
    Or,

    /// `(`
    ParenOpen,

    /// `)`
    ParenClose,

    /// Negation (`!`)
    Not,

    /// The `include` keyword
    Include,

    /// Any other identifier, used as a function name
    ///
    /// # Examples
    /// ```text
    /// lower
    /// max
    /// ```
    FunctionName,

    /// End of input
    Eof,
}

impl TokenKind {
    /// Grammar-style name of the token kind.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Comma => "COMMA",
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
            TokenKind::Variable => "VARIABLE",
            TokenKind::Boolean => "BOOLEAN",
            TokenKind::Null => "NULL",
            TokenKind::Whitespace => "WHITESPACE",
            TokenKind::Operator => "OPERATOR",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::ParenOpen => "PAREN_OPEN",
            TokenKind::ParenClose => "PAREN_CLOSE",
            TokenKind::Not => "NOT",
            TokenKind::Include => "INCLUDE",
            TokenKind::FunctionName => "FUNCTION_NAME",
            TokenKind::Eof => "EOF",
        }
    }

    /// Literal tokens that can stand as an operand.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::Number | TokenKind::String | TokenKind::Boolean | TokenKind::Null
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// The exact source text of the token (empty for `Eof`)
    pub lexeme: String,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, position: Position) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            position,
        }
    }

    /// Tokens the parser skips.
    pub fn is_trivia(&self) -> bool {
        self.kind == TokenKind::Whitespace
    }

    /// Human-readable description used in error messages.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of input".to_string(),
            kind => format!("{} '{}'", kind, self.lexeme),
        }
    }
}
