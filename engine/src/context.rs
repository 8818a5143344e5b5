//! FILENAME: engine/src/context.rs
//! PURPOSE: Variable bindings and the function table used during evaluation.
//! CONTEXT: A Context is built by the caller and only borrowed by the
//! evaluator, so a single parsed tree can be evaluated against many contexts,
//! and one context can serve concurrent read-only evaluations.

use crate::error::FunctionError;
use crate::functions;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A callable bound in the function table.
pub type Function = Arc<dyn Fn(&[f64]) -> Result<f64, FunctionError> + Send + Sync>;

#[derive(Clone, Default)]
pub struct Context {
    pub variables: HashMap<String, f64>,
    pub functions: HashMap<String, Function>,
}

impl Context {
    /// An empty context with no variables and no functions.
    pub fn new() -> Self {
        Context::default()
    }

    /// A context pre-populated with abs, sqrt, max, min and sum.
    pub fn with_defaults() -> Self {
        let mut context = Context::new();
        functions::register_defaults(&mut context);
        context
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: f64) -> Self {
        self.set_variable(name, value);
        self
    }

    pub fn with_variables<I, S>(mut self, variables: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        for (name, value) in variables {
            self.set_variable(name, value);
        }
        self
    }

    pub fn with_function<F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&[f64]) -> Result<f64, FunctionError> + Send + Sync + 'static,
    {
        self.register_function(name, function);
        self
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: f64) {
        self.variables.insert(name.into(), value);
    }

    /// Binds `function` under `name`, replacing any previous binding.
    pub fn register_function<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&[f64]) -> Result<f64, FunctionError> + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Arc::new(function));
    }

    pub fn variable(&self, name: &str) -> Option<f64> {
        self.variables.get(name).copied()
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.functions.keys().collect();
        names.sort();
        f.debug_struct("Context")
            .field("variables", &self.variables)
            .field("functions", &names)
            .finish()
    }
}
