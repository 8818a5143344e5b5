//! FILENAME: parser/src/lexer.rs
//! PURPOSE: Scans a raw formula string and produces a stream of Tokens.
//! CONTEXT: This is the first stage of the parsing pipeline. It normalizes
//! spacing, reads numbers and identifiers, resolves bilingual keywords and
//! tells functions apart from variables by looking ahead for '('.
//!
//! SUPPORTED OPERATORS:
//! - Single char: + - * / ^ % > < = !
//! - Multi char: >= <= == != **
//! - Delimiters: ( ) ,
//!
//! The lexer never fails. Characters it does not recognize are skipped;
//! reporting them is the validator's job.

use crate::token::{Token, TokenKind};

/// A keyword table maps an upper-cased word to the token it produces.
pub type KeywordTable = &'static [(&'static str, TokenKind)];

pub const CYRILLIC_KEYWORDS: KeywordTable = &[
    ("ЕСЛИ", TokenKind::If),
    ("ТОГДА", TokenKind::Then),
    ("ИНАЧЕ", TokenKind::Else),
    ("ИЛИ", TokenKind::Or),
    ("И", TokenKind::And),
];

pub const LATIN_KEYWORDS: KeywordTable = &[
    ("IF", TokenKind::If),
    ("THEN", TokenKind::Then),
    ("ELSE", TokenKind::Else),
    ("OR", TokenKind::Or),
    ("AND", TokenKind::And),
];

/// Keyword tables in lookup order.
pub const KEYWORD_TABLES: &[KeywordTable] = &[CYRILLIC_KEYWORDS, LATIN_KEYWORDS];

/// Resolves a word to its keyword token kind, ignoring case.
pub fn keyword_kind(word: &str) -> Option<TokenKind> {
    let upper = word.to_uppercase();
    KEYWORD_TABLES
        .iter()
        .flat_map(|table| table.iter())
        .find(|(keyword, _)| *keyword == upper)
        .map(|(_, kind)| *kind)
}

/// Returns true if `word` is a keyword in any supported language.
pub fn is_keyword(word: &str) -> bool {
    keyword_kind(word).is_some()
}

const COMPOUND_OPERATORS: &[&str] = &[">=", "<=", "==", "!=", "**"];

pub struct Lexer {
    /// Normalized characters.
    chars: Vec<char>,
    /// Original character offset of each normalized character.
    positions: Vec<usize>,
    cursor: usize,
    /// Length of the original text in characters.
    end: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let (chars, positions) = normalize(input);
        Lexer {
            chars,
            positions,
            cursor: 0,
            end: input.chars().count(),
        }
    }

    /// Advances the lexer and returns the next token.
    /// Returns EndOfInput once the input is exhausted, and on every call after.
    pub fn next_token(&mut self) -> Token {
        loop {
            self.skip_whitespace();

            let Some(&ch) = self.chars.get(self.cursor) else {
                return Token::new(TokenKind::EndOfInput, "", self.end);
            };

            let token = match ch {
                c if c.is_ascii_digit() => self.read_number(),
                c if is_identifier_char(c) => self.read_identifier(),
                '+' | '-' | '*' | '/' | '^' | '%' | '>' | '<' | '=' | '!' => self.read_operator(),
                '(' => self.read_single(TokenKind::ParenOpen),
                ')' => self.read_single(TokenKind::ParenClose),
                ',' => self.read_single(TokenKind::Comma),
                other => {
                    log::trace!(target: "LEXER", "skipping '{}' at {}", other, self.position_of(self.cursor));
                    self.cursor += 1;
                    continue;
                }
            };

            log::trace!(target: "LEXER", "{:?} {:?} at {}", token.kind, token.text, token.position);
            return token;
        }
    }

    fn position_of(&self, index: usize) -> usize {
        self.positions.get(index).copied().unwrap_or(self.end)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.chars.get(self.cursor) {
            if !ch.is_whitespace() {
                break;
            }
            self.cursor += 1;
        }
    }

    fn read_single(&mut self, kind: TokenKind) -> Token {
        let start = self.cursor;
        self.cursor += 1;
        Token::new(kind, self.chars[start].to_string(), self.position_of(start))
    }

    /// Reads a run of digits and dots. Malformed runs like "1.2.3" are kept
    /// whole; converting them is left to the parser.
    fn read_number(&mut self) -> Token {
        let start = self.cursor;
        while let Some(&ch) = self.chars.get(self.cursor) {
            if ch.is_ascii_digit() || ch == '.' {
                self.cursor += 1;
            } else {
                break;
            }
        }
        let text: String = self.chars[start..self.cursor].iter().collect();
        Token::new(TokenKind::Number, text, self.position_of(start))
    }

    /// Reads letters and underscores. Digits never continue an identifier,
    /// so "A1" is the variable A followed by the number 1.
    fn read_identifier(&mut self) -> Token {
        let start = self.cursor;
        while let Some(&ch) = self.chars.get(self.cursor) {
            if is_identifier_char(ch) {
                self.cursor += 1;
            } else {
                break;
            }
        }
        let text: String = self.chars[start..self.cursor].iter().collect();
        let position = self.position_of(start);

        if let Some(kind) = keyword_kind(&text) {
            return Token::new(kind, text, position);
        }

        if self.next_non_whitespace() == Some('(') {
            Token::new(TokenKind::Function, text, position)
        } else {
            Token::new(TokenKind::Variable, text, position)
        }
    }

    /// Peeks past whitespace without consuming anything.
    fn next_non_whitespace(&self) -> Option<char> {
        self.chars[self.cursor..]
            .iter()
            .copied()
            .find(|ch| !ch.is_whitespace())
    }

    /// Handles single and compound operators, preferring the longest match.
    fn read_operator(&mut self) -> Token {
        let start = self.cursor;
        if let Some(pair) = self.chars.get(start..start + 2) {
            let pair: String = pair.iter().collect();
            if COMPOUND_OPERATORS.contains(&pair.as_str()) {
                self.cursor += 2;
                return Token::new(TokenKind::Operator, pair, self.position_of(start));
            }
        }
        self.read_single(TokenKind::Operator)
    }
}

impl Iterator for Lexer {
    type Item = Token;

    /// Yields every token up to, but not including, EndOfInput.
    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        if token.is_eof() {
            None
        } else {
            Some(token)
        }
    }
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphabetic() || ch.is_ascii_digit()
}

/// Trims the input and collapses whitespace runs. A run survives as a single
/// space only when it separates two words (letter/letter, letter/digit or
/// digit/letter), so "A B" stays two identifiers while "A + B" becomes "A+B".
fn normalize(input: &str) -> (Vec<char>, Vec<usize>) {
    let source: Vec<char> = input.chars().collect();
    let first = source.iter().position(|ch| !ch.is_whitespace());
    let Some(first) = first else {
        return (Vec::new(), Vec::new());
    };
    let last = source
        .iter()
        .rposition(|ch| !ch.is_whitespace())
        .unwrap_or(first);

    let mut chars = Vec::with_capacity(last - first + 1);
    let mut positions = Vec::with_capacity(last - first + 1);
    let mut index = first;

    while index <= last {
        let ch = source[index];
        if !ch.is_whitespace() {
            chars.push(ch);
            positions.push(index);
            index += 1;
            continue;
        }

        let run_start = index;
        while index <= last && source[index].is_whitespace() {
            index += 1;
        }
        // `first` and `last` are non-whitespace, so both neighbours exist.
        let prev = source[run_start - 1];
        let next = source[index];
        if is_word_char(prev) && is_word_char(next) && !(prev.is_ascii_digit() && next.is_ascii_digit()) {
            chars.push(' ');
            positions.push(run_start);
        }
    }

    (chars, positions)
}
