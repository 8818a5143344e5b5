//! FILENAME: parser/src/lib.rs
//! PURPOSE: Library root for the bilingual formula parser.
//! CONTEXT: This crate exposes the lexer, parser, AST and tree codec
//! needed to turn formula text (or tagged JSON) into evaluatable trees.
//!
//! PIPELINE: Formula String --> Lexer --> Tokens --> Parser --> AST --> Evaluator
//!
//! SUPPORTED FEATURES:
//! - Arithmetic: +, -, *, /, ^ or ** (power), % (remainder)
//! - Comparison: =, ==, !=, <, >, <=, >=
//! - Logic: AND / И, OR / ИЛИ with short-circuit semantics
//! - Conditionals: IF a THEN b ELSE c, ЕСЛИ a ТОГДА b ИНАЧЕ c, IF(a, b, c)
//! - Function calls: max(a, b), sqrt(x)
//! - Parentheses for grouping
//! - Unary sign: -A, +5

pub mod ast;
pub mod codec;
pub mod lexer;
pub mod parser;
pub mod token;

// Register the separate tests module
#[cfg(test)]
mod tests;

// Re-export commonly used types for convenience
pub use ast::{ArithmeticOperator, ComparisonOperator, Expression, LogicalOperator, UnaryOperator};
pub use codec::{from_json_str, from_json_value, to_json, to_json_string, CodecError, CodecResult};
pub use lexer::{is_keyword, keyword_kind, Lexer, CYRILLIC_KEYWORDS, KEYWORD_TABLES, LATIN_KEYWORDS};
pub use parser::{parse, parse_prefix, ParseError, ParseResult, Parser};
pub use token::{Token, TokenKind};
