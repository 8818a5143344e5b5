//! FILENAME: validator/src/lib.rs
//! PURPOSE: Library root for the formula validator.
//! CONTEXT: Checks formula text before it is parsed and evaluated, reporting
//! every locatable problem with a code and a character position instead of
//! stopping at the first one.

pub mod config;
pub mod result;
pub mod validator;


pub use config::ValidatorConfig;
pub use result::{ValidationCode, ValidationError, ValidationResult};
pub use validator::{quick_validate, validate_and_get_errors, FormulaValidator};
