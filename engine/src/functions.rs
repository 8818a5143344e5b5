//! FILENAME: engine/src/functions.rs
//! PURPOSE: The default function registry.
//! CONTEXT: Installed per context by `Context::with_defaults`; there is no
//! process-wide table. Names are lower-case and matched exactly.
//!
//! | name | arity | errors                         |
//! |------|-------|--------------------------------|
//! | abs  | 1     | arity                          |
//! | sqrt | 1     | arity, negative argument       |
//! | max  | >= 1  | arity                          |
//! | min  | >= 1  | arity                          |
//! | sum  | any   | none (empty sum is 0)          |

use crate::context::Context;
use crate::error::FunctionError;

pub fn register_defaults(context: &mut Context) {
    context.register_function("abs", fn_abs);
    context.register_function("sqrt", fn_sqrt);
    context.register_function("max", fn_max);
    context.register_function("min", fn_min);
    context.register_function("sum", fn_sum);
}

pub fn fn_abs(args: &[f64]) -> Result<f64, FunctionError> {
    match args {
        [x] => Ok(x.abs()),
        _ => Err(FunctionError::arity("abs", "exactly 1 argument")),
    }
}

pub fn fn_sqrt(args: &[f64]) -> Result<f64, FunctionError> {
    match args {
        [x] if *x < 0.0 => Err(FunctionError::Domain("sqrt of negative number".to_string())),
        [x] => Ok(x.sqrt()),
        _ => Err(FunctionError::arity("sqrt", "exactly 1 argument")),
    }
}

pub fn fn_max(args: &[f64]) -> Result<f64, FunctionError> {
    let (first, rest) = args
        .split_first()
        .ok_or_else(|| FunctionError::arity("max", "at least 1 argument"))?;
    Ok(rest.iter().fold(*first, |acc, &x| if x > acc { x } else { acc }))
}

pub fn fn_min(args: &[f64]) -> Result<f64, FunctionError> {
    let (first, rest) = args
        .split_first()
        .ok_or_else(|| FunctionError::arity("min", "at least 1 argument"))?;
    Ok(rest.iter().fold(*first, |acc, &x| if x < acc { x } else { acc }))
}

pub fn fn_sum(args: &[f64]) -> Result<f64, FunctionError> {
    Ok(args.iter().sum())
}
