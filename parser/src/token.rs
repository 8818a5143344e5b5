//! FILENAME: parser/src/token.rs
//! PURPOSE: Token definitions for the formula lexer.
//! CONTEXT: Tokens are the atomic units produced by the lexer and consumed by the parser.
//! Each token keeps the lexeme as written and its character offset in the
//! caller's original text, so diagnostics can point back at the source.

/// Classification of a token.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    // Literals and names
    Number,
    Variable,
    /// An identifier immediately followed by '('
    Function,

    /// Any of + - * / ^ % > < = ! and the compounds >= <= == != **
    Operator,

    // Delimiters
    ParenOpen,
    ParenClose,
    Comma,

    // Keywords (bilingual)
    If,
    Then,
    Else,
    Or,
    And,

    // Special
    EndOfInput,
}

/// A single lexeme with its kind and source position.
#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Zero-based character offset into the original formula text.
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            position,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EndOfInput
    }

    /// Returns the operator text if this is an operator token.
    pub fn operator(&self) -> Option<&str> {
        match self.kind {
            TokenKind::Operator => Some(self.text.as_str()),
            _ => None,
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Number => write!(f, "number"),
            TokenKind::Variable => write!(f, "variable"),
            TokenKind::Function => write!(f, "function"),
            TokenKind::Operator => write!(f, "operator"),
            TokenKind::ParenOpen => write!(f, "'('"),
            TokenKind::ParenClose => write!(f, "')'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::If => write!(f, "IF"),
            TokenKind::Then => write!(f, "THEN"),
            TokenKind::Else => write!(f, "ELSE"),
            TokenKind::Or => write!(f, "OR"),
            TokenKind::And => write!(f, "AND"),
            TokenKind::EndOfInput => write!(f, "end of input"),
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::EndOfInput => write!(f, "end of input"),
            _ => write!(f, "'{}'", self.text),
        }
    }
}
