//! FILENAME: validator/src/validator.rs
//! PURPOSE: Staged validation of formula text with positional diagnostics.
//! CONTEXT: The parser stops at the first problem. The validator runs a set
//! of cheap independent checks first so that every locatable issue is
//! reported, then (only if those pass) a full parse for the first syntax error.
//!
//! STAGES:
//! 1. Structure: empty / too long
//! 2. Characters: anything outside digits, whitespace, operators, letters, '_'
//! 3. Cyrillic words (optional): non-keyword Cyrillic words
//! 4. Parentheses: extra ')', missing ')', nesting deeper than max_depth
//! 5. Operators: runs of 3+ operator characters, trailing operator
//! 6. Syntax: full parse, only when 1-5 found nothing
//! 7. Warnings: mixed alphabets, complexity, long identifiers

use crate::config::ValidatorConfig;
use crate::result::{ValidationCode, ValidationError, ValidationResult};
use formula_parser::{is_keyword, CYRILLIC_KEYWORDS};
use once_cell::sync::Lazy;
use regex::Regex;

/// Characters besides letters, digits, whitespace and '_' that may appear.
const ALLOWED_SYMBOLS: &[char] = &[
    '+', '-', '*', '/', '^', '%', '=', '!', '>', '<', '(', ')', ',', '.',
];

/// Operator characters a formula must not end with ('+' and '-' may be unary).
const TRAILING_OPERATORS: &[char] = &['*', '/', '^', '%', '=', '!', '>', '<'];

static OPERATOR_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-+*/^%=!<>]{3,}").expect("operator run pattern"));

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-zА-Яа-яЁё_][A-Za-zА-Яа-яЁё0-9_]*").expect("identifier pattern")
});

/// Validates formulas. Holds only configuration, so one instance can be
/// reused and validating the same text always gives the same result.
#[derive(Debug, Clone, Default)]
pub struct FormulaValidator {
    config: ValidatorConfig,
}

impl FormulaValidator {
    pub fn new() -> Self {
        FormulaValidator::default()
    }

    pub fn with_config(config: ValidatorConfig) -> Self {
        FormulaValidator { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Runs every stage and collects all diagnostics.
    pub fn validate(&self, formula: &str) -> ValidationResult {
        log::debug!(target: "VALIDATE", "validate {:?}", formula);
        let mut result = ValidationResult::new();

        if let Some(error) = self.check_structure(formula) {
            result.push_error(error);
        }

        result.extend_errors(self.check_characters(formula));

        if self.config.cyrillic_keywords_only {
            result.extend_errors(self.check_cyrillic_words(formula));
        }

        if let Some(error) = self.check_parentheses(formula) {
            result.push_error(error);
        }

        result.extend_errors(self.check_operators(formula));

        if result.is_valid {
            if let Some(error) = self.check_syntax(formula) {
                result.push_error(error);
            }
        }

        result.warnings = self.collect_warnings(formula);

        log::debug!(
            target: "VALIDATE",
            "valid={} errors={} warnings={}",
            result.is_valid,
            result.errors.len(),
            result.warnings.len()
        );
        result
    }

    fn check_structure(&self, formula: &str) -> Option<ValidationError> {
        let trimmed = formula.trim();

        if trimmed.is_empty() {
            return Some(ValidationError::new(
                ValidationCode::EmptyFormula,
                "formula must not be empty",
            ));
        }

        if trimmed.chars().count() > self.config.max_length {
            return Some(ValidationError::new(
                ValidationCode::FormulaTooLong,
                format!(
                    "formula is too long (maximum {} characters)",
                    self.config.max_length
                ),
            ));
        }

        None
    }

    fn check_characters(&self, formula: &str) -> Vec<ValidationError> {
        formula
            .chars()
            .enumerate()
            .filter(|(_, ch)| !is_allowed_character(*ch))
            .map(|(i, ch)| {
                ValidationError::at(
                    ValidationCode::InvalidCharacter,
                    format!("invalid character '{}'", ch),
                    i,
                )
            })
            .collect()
    }

    /// Every Cyrillic word must be one of the Cyrillic keywords.
    fn check_cyrillic_words(&self, formula: &str) -> Vec<ValidationError> {
        let allowed: Vec<&str> = CYRILLIC_KEYWORDS.iter().map(|(word, _)| *word).collect();
        let chars: Vec<char> = formula.chars().collect();
        let mut errors = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            if !is_cyrillic_letter(chars[i]) {
                i += 1;
                continue;
            }

            let start = i;
            while i < chars.len() && (is_cyrillic_letter(chars[i]) || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();

            if !allowed.contains(&word.to_uppercase().as_str()) {
                errors.push(ValidationError::at(
                    ValidationCode::InvalidCyrillicWord,
                    format!(
                        "Cyrillic word '{}' is not an allowed keyword; only {} are permitted",
                        word,
                        allowed.join(", ")
                    ),
                    start,
                ));
            }
        }

        errors
    }

    fn check_parentheses(&self, formula: &str) -> Option<ValidationError> {
        let mut open: Vec<usize> = Vec::new();
        let mut too_deep: Option<usize> = None;

        for (i, ch) in formula.chars().enumerate() {
            match ch {
                '(' => {
                    open.push(i);
                    if open.len() > self.config.max_depth && too_deep.is_none() {
                        too_deep = Some(i);
                    }
                }
                ')' => {
                    if open.pop().is_none() {
                        return Some(ValidationError::at(
                            ValidationCode::ExtraClosingParen,
                            "extra closing parenthesis",
                            i,
                        ));
                    }
                }
                _ => {}
            }
        }

        // The earliest unmatched '(' is the outermost one left open.
        if let Some(&first_unclosed) = open.first() {
            let missing = open.len();
            return Some(ValidationError::at(
                ValidationCode::MissingClosingParen,
                format!(
                    "missing {} closing parenthes{}",
                    missing,
                    if missing == 1 { "is" } else { "es" }
                ),
                first_unclosed,
            ));
        }

        too_deep.map(|position| {
            ValidationError::at(
                ValidationCode::NestingTooDeep,
                format!(
                    "parentheses are nested too deeply (maximum {} levels)",
                    self.config.max_depth
                ),
                position,
            )
        })
    }

    fn check_operators(&self, formula: &str) -> Vec<ValidationError> {
        let mut errors: Vec<ValidationError> = OPERATOR_RUN
            .find_iter(formula)
            .map(|m| {
                ValidationError::at(
                    ValidationCode::InvalidOperatorSequence,
                    format!("invalid operator sequence '{}'", m.as_str()),
                    char_offset(formula, m.start()),
                )
            })
            .collect();

        let last = formula
            .chars()
            .enumerate()
            .filter(|(_, ch)| !ch.is_whitespace())
            .last();
        if let Some((i, ch)) = last {
            if TRAILING_OPERATORS.contains(&ch) {
                errors.push(ValidationError::at(
                    ValidationCode::FormulaEndsWithOperator,
                    "formula must not end with an operator",
                    i,
                ));
            }
        }

        errors
    }

    fn check_syntax(&self, formula: &str) -> Option<ValidationError> {
        let err = formula_parser::parse(formula).err()?;
        Some(ValidationError {
            message: format!("syntax error: {}", err.message),
            position: err.position,
            code: ValidationCode::SyntaxError,
        })
    }

    fn collect_warnings(&self, formula: &str) -> Vec<String> {
        let mut warnings = Vec::new();

        let has_cyrillic = formula.chars().any(is_cyrillic_letter);
        let has_latin = formula.chars().any(|ch| ch.is_ascii_alphabetic());
        if has_cyrillic && has_latin {
            warnings.push("formula mixes Cyrillic and Latin words".to_string());
        }

        let open_parens = formula.chars().filter(|ch| *ch == '(').count();
        if open_parens > self.config.complexity_paren_threshold {
            warnings.push("formula may be too complex to read".to_string());
        }

        for name in IDENTIFIER.find_iter(formula).map(|m| m.as_str()) {
            if !is_keyword(name) && name.chars().count() > self.config.max_identifier_length {
                warnings.push(format!("variable '{}' has a very long name", name));
            }
        }

        warnings
    }
}

fn is_allowed_character(ch: char) -> bool {
    ch.is_ascii_digit()
        || ch.is_whitespace()
        || ALLOWED_SYMBOLS.contains(&ch)
        || ch == '_'
        || ch.is_ascii_alphabetic()
        || is_cyrillic_letter(ch)
}

fn is_cyrillic_letter(ch: char) -> bool {
    ch.is_alphabetic()
        && matches!(ch,
            '\u{0400}'..='\u{052F}'
            | '\u{1C80}'..='\u{1C8F}'
            | '\u{2DE0}'..='\u{2DFF}'
            | '\u{A640}'..='\u{A69F}')
}

/// Converts a byte offset from the regex engine to a character offset.
fn char_offset(text: &str, byte_offset: usize) -> usize {
    text[..byte_offset].chars().count()
}

/// Validates with the default configuration and returns only the verdict.
pub fn quick_validate(formula: &str) -> bool {
    FormulaValidator::new().validate(formula).is_valid
}

/// Validates with the default configuration and returns the verdict with
/// each error formatted as text.
pub fn validate_and_get_errors(formula: &str) -> (bool, Vec<String>) {
    let result = FormulaValidator::new().validate(formula);
    (result.is_valid, result.error_messages())
}
