use thiserror::Error;

use crate::ast::path::scan_variable;
use crate::ast::{Position, Token, TokenKind};

/// Errors raised while splitting source text into tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A character that starts no token
    #[error("unexpected character '{ch}' at {position}")]
    UnexpectedChar { ch: char, position: Position },

    /// A string literal without its closing quote on the same line
    #[error("unterminated string starting at {position}")]
    UnterminatedString { position: Position },

    /// A backslash inside a string literal; escapes are not supported
    #[error("unsupported character '{ch}' in string at {position}")]
    InvalidStringChar { ch: char, position: Position },

    /// A character that does not fit the variable grammar
    #[error("unexpected character '{ch}' in variable at {position}")]
    InvalidVariable { ch: char, position: Position },

    /// A variable that runs into the end of input
    #[error("unterminated variable starting at {position}")]
    UnterminatedVariable { position: Position },
}

impl LexError {
    pub fn position(&self) -> Position {
        match self {
            LexError::UnexpectedChar { position, .. }
            | LexError::UnterminatedString { position }
            | LexError::InvalidStringChar { position, .. }
            | LexError::InvalidVariable { position, .. }
            | LexError::UnterminatedVariable { position } => *position,
        }
    }
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    finished: bool,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            finished: false,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn current_position(&self) -> Position {
        Position {
            offset: self.position,
            line: self.line,
            column: self.column,
        }
    }

    /// Position of a character at or after the cursor on the current line.
    fn position_at(&self, offset: usize) -> Position {
        Position {
            offset,
            line: self.line,
            column: self.column + (offset - self.position),
        }
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.position += 1;
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn advance_to(&mut self, end: usize) {
        while self.position < end {
            self.advance();
        }
    }

    fn lexeme_from(&self, start: usize) -> String {
        self.input[start..self.position].iter().collect()
    }

    fn read_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(ch) = self.current_char() {
            if pred(ch) {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self) {
        self.read_while(|c| c.is_ascii_digit());

        // A dot only belongs to the number when digits follow it.
        if self.current_char() == Some('.') && self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            self.read_while(|c| c.is_ascii_digit());
        }
    }

    fn read_string(&mut self, start: Position) -> Result<(), LexError> {
        self.advance(); // Consume opening quote

        loop {
            match self.current_char() {
                Some('\'') => {
                    self.advance();
                    return Ok(());
                }
                None | Some('\n') | Some('\r') => {
                    return Err(LexError::UnterminatedString { position: start });
                }
                Some('\\') => {
                    return Err(LexError::InvalidStringChar {
                        ch: '\\',
                        position: self.current_position(),
                    });
                }
                Some(_) => self.advance(),
            }
        }
    }

    fn read_variable(&mut self, start: Position) -> Result<(), LexError> {
        match scan_variable(&self.input, self.position) {
            Ok((_, end)) => {
                self.advance_to(end);
                Ok(())
            }
            Err(err) => match self.input.get(err.at) {
                Some(&ch) => Err(LexError::InvalidVariable {
                    ch,
                    position: self.position_at(err.at),
                }),
                None => Err(LexError::UnterminatedVariable { position: start }),
            },
        }
    }

    fn read_identifier(&mut self) -> TokenKind {
        let start = self.position;
        self.read_while(|c| c.is_ascii_alphanumeric() || c == '_');

        match self.lexeme_from(start).as_str() {
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "true" | "false" => TokenKind::Boolean,
            "null" => TokenKind::Null,
            "include" => TokenKind::Include,
            "contains" => TokenKind::Operator,
            _ => TokenKind::FunctionName,
        }
    }

    /// Returns the next token, whitespace included. After the end of input
    /// every call yields `Eof`.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let start_pos = self.current_position();

        let kind = match self.current_char() {
            None => {
                self.finished = true;
                return Ok(Token::new(TokenKind::Eof, "", start_pos));
            }
            Some(' ' | '\t' | '\r' | '\n') => {
                self.read_while(|c| matches!(c, ' ' | '\t' | '\r' | '\n'));
                TokenKind::Whitespace
            }
            Some(',') => {
                self.advance();
                TokenKind::Comma
            }
            Some('(') => {
                self.advance();
                TokenKind::ParenOpen
            }
            Some(')') => {
                self.advance();
                TokenKind::ParenClose
            }
            Some('=') => {
                self.advance();
                TokenKind::Operator
            }
            Some('!') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    TokenKind::Operator
                } else {
                    self.advance();
                    TokenKind::Not
                }
            }
            Some('<' | '>') => {
                self.advance();
                if self.current_char() == Some('=') {
                    self.advance();
                }
                TokenKind::Operator
            }
            Some('\'') => {
                self.read_string(start_pos)?;
                TokenKind::String
            }
            Some('{') => {
                self.read_variable(start_pos)?;
                TokenKind::Variable
            }
            Some(ch) if ch.is_ascii_digit() => {
                self.read_number();
                TokenKind::Number
            }
            Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => self.read_identifier(),
            Some(ch) => {
                return Err(LexError::UnexpectedChar {
                    ch,
                    position: start_pos,
                });
            }
        };

        Ok(Token::new(kind, self.lexeme_from(start), start_pos))
    }

    /// Consumes the lexer, returning every token up to and including `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        while !self.finished {
            tokens.push(self.next_token()?);
        }
        log::trace!("tokenized {} tokens", tokens.len());
        Ok(tokens)
    }
}

/// Splits `source` into tokens, whitespace included, ending with `Eof`.
///
/// ```
/// use cohort_rule::{tokenize, TokenKind};
///
/// let kinds: Vec<TokenKind> = tokenize("{age} >= 18")
///     .unwrap()
///     .into_iter()
///     .map(|t| t.kind)
///     .collect();
/// assert_eq!(
///     kinds,
///     vec![
///         TokenKind::Variable,
///         TokenKind::Whitespace,
///         TokenKind::Operator,
///         TokenKind::Whitespace,
///         TokenKind::Number,
///         TokenKind::Eof,
///     ]
/// );
/// ```
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("and or true false null include contains");
    let mut kinds = vec![];
    loop {
        let token = lexer.next_token().unwrap();
        if token.kind == TokenKind::Eof {
            break;
        }
        if !token.is_trivia() {
            kinds.push(token.kind);
        }
    }
    assert_eq!(
        kinds,
        vec![
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Boolean,
            TokenKind::Boolean,
            TokenKind::Null,
            TokenKind::Include,
            TokenKind::Operator,
        ]
    );
}

#[test]
fn test_eof_repeats() {
    let mut lexer = Lexer::new("");
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
}
