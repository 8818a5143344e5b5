//! FILENAME: engine/src/error.rs
//! PURPOSE: Error types raised while evaluating formula trees.

use formula_parser::ParseError;
use thiserror::Error;

/// Errors returned by a bound function (built-in or user supplied).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FunctionError {
    #[error("{name} requires {expected}")]
    Arity { name: String, expected: String },

    /// The arguments are outside the function's domain, e.g. sqrt of a negative.
    #[error("{0}")]
    Domain(String),

    #[error("{0}")]
    Custom(String),
}

impl FunctionError {
    pub fn arity(name: impl Into<String>, expected: impl Into<String>) -> Self {
        FunctionError::Arity {
            name: name.into(),
            expected: expected.into(),
        }
    }
}

/// Errors raised by evaluation. The first one encountered in evaluation
/// order (left before right, condition before branch, arguments left to
/// right) is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("variable '{0}' not found")]
    VariableNotFound(String),

    #[error("function '{0}' not found")]
    FunctionNotFound(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("modulo by zero")]
    ModuloByZero,

    /// An error returned by the function itself, passed through unchanged.
    #[error("{source}")]
    Function {
        name: String,
        #[source]
        source: FunctionError,
    },
}

pub type EvalResult<T> = Result<T, EvalError>;

/// Error for the one-shot parse-and-evaluate entry point.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),
}
