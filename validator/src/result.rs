//! FILENAME: validator/src/result.rs
//! PURPOSE: Diagnostics produced by the validator.

use serde::Serialize;

/// Machine-readable diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationCode {
    EmptyFormula,
    FormulaTooLong,
    InvalidCharacter,
    InvalidCyrillicWord,
    ExtraClosingParen,
    MissingClosingParen,
    NestingTooDeep,
    InvalidOperatorSequence,
    FormulaEndsWithOperator,
    SyntaxError,
}

impl ValidationCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationCode::EmptyFormula => "EMPTY_FORMULA",
            ValidationCode::FormulaTooLong => "FORMULA_TOO_LONG",
            ValidationCode::InvalidCharacter => "INVALID_CHARACTER",
            ValidationCode::InvalidCyrillicWord => "INVALID_CYRILLIC_WORD",
            ValidationCode::ExtraClosingParen => "EXTRA_CLOSING_PAREN",
            ValidationCode::MissingClosingParen => "MISSING_CLOSING_PAREN",
            ValidationCode::NestingTooDeep => "NESTING_TOO_DEEP",
            ValidationCode::InvalidOperatorSequence => "INVALID_OPERATOR_SEQUENCE",
            ValidationCode::FormulaEndsWithOperator => "FORMULA_ENDS_WITH_OPERATOR",
            ValidationCode::SyntaxError => "SYNTAX_ERROR",
        }
    }
}

impl std::fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single diagnostic. `position` is a character offset into the
/// formula as given, or None when the problem has no single location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub message: String,
    pub position: Option<usize>,
    pub code: ValidationCode,
}

impl ValidationError {
    pub fn new(code: ValidationCode, message: impl Into<String>) -> Self {
        ValidationError {
            message: message.into(),
            position: None,
            code,
        }
    }

    pub fn at(code: ValidationCode, message: impl Into<String>, position: usize) -> Self {
        ValidationError {
            message: message.into(),
            position: Some(position),
            code,
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.position {
            Some(position) => write!(
                f,
                "validation error at position {}: {}",
                position, self.message
            ),
            None => write!(f, "validation error: {}", self.message),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Outcome of validating one formula.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        ValidationResult {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Records an error and marks the result invalid.
    pub fn push_error(&mut self, error: ValidationError) {
        self.is_valid = false;
        self.errors.push(error);
    }

    pub fn extend_errors(&mut self, errors: impl IntoIterator<Item = ValidationError>) {
        for error in errors {
            self.push_error(error);
        }
    }

    pub fn has_code(&self, code: ValidationCode) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }

    /// Each error formatted with its position.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        ValidationResult::new()
    }
}
