//! FILENAME: engine/src/lib.rs
//! PURPOSE: Main library entry point for the formula engine.
//! CONTEXT: Re-exports the evaluation context, evaluator and error types,
//! and offers a one-shot parse-and-evaluate helper.

pub mod context;
pub mod error;
pub mod evaluator;
pub mod functions;

// Re-export commonly used types at the crate root
pub use context::{Context, Function};
pub use error::{EvalError, EvalResult, FormulaError, FunctionError};
pub use evaluator::{evaluate, Evaluator};
pub use formula_parser::Expression;

/// Parses `formula` and evaluates it against `context`.
pub fn evaluate_formula(formula: &str, context: &Context) -> Result<f64, FormulaError> {
    let expr = formula_parser::parse(formula)?;
    Ok(evaluate(&expr, context)?)
}
