//! FILENAME: tests/common/mod.rs
//! Fixtures shared by the engine integration tests.

#![allow(dead_code)]

use formula_engine::{evaluate_formula, Context, FormulaError, FunctionError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Parses and evaluates, panicking with the formula on failure.
pub fn eval(formula: &str, context: &Context) -> f64 {
    match evaluate_formula(formula, context) {
        Ok(value) => value,
        Err(err) => panic!("{:?} failed: {}", formula, err),
    }
}

pub fn eval_err(formula: &str, context: &Context) -> FormulaError {
    match evaluate_formula(formula, context) {
        Ok(value) => panic!("{:?} unexpectedly evaluated to {}", formula, value),
        Err(err) => err,
    }
}

/// A context with the default functions and a handful of pricing inputs.
pub fn pricing_context() -> Context {
    Context::with_defaults().with_variables([
        ("age", 25.0),
        ("salary", 50000.0),
        ("A", 5.0),
        ("B", 10.0),
        ("C", 2.0),
    ])
}

/// A context binding `myFunc` to a function that always fails with an
/// arity error, plus a counter of how many times it was invoked.
pub fn failing_function_context() -> (Context, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let context = Context::with_defaults().with_function("myFunc", move |_: &[f64]| {
        counter.fetch_add(1, Ordering::SeqCst);
        Err(FunctionError::arity("myFunc", "exactly 2 arguments"))
    });
    (context, calls)
}
