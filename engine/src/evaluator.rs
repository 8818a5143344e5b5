//! FILENAME: engine/src/evaluator.rs
//! PURPOSE: Evaluates AST expressions against a Context.
//! CONTEXT: After a formula is parsed (or decoded from JSON) into an
//! Expression tree, this module walks the tree and computes a number.
//! Booleans are plain numbers: comparisons and logical nodes yield 1.0 or
//! 0.0, and any nonzero value counts as true.
//!
//! EVALUATION RULES:
//! - Operation and Comparison evaluate both sides, left first.
//! - Logical short-circuits: the right side is skipped when the left side
//!   already decides the result, including any error it would raise.
//! - Conditional without an else branch yields 0 when the condition is false.
//! - Function arguments are evaluated left to right before the call.

use crate::context::Context;
use crate::error::{EvalError, EvalResult};
use formula_parser::{
    ArithmeticOperator, ComparisonOperator, Expression, LogicalOperator, UnaryOperator,
};

/// Walks an expression tree using the bindings of one context.
pub struct Evaluator<'a> {
    context: &'a Context,
}

impl<'a> Evaluator<'a> {
    pub fn new(context: &'a Context) -> Self {
        Evaluator { context }
    }

    /// Evaluates an expression and returns the result.
    pub fn evaluate(&self, expr: &Expression) -> EvalResult<f64> {
        match expr {
            Expression::Literal { value } => Ok(*value),
            Expression::Variable { name } => self.eval_variable(name),
            Expression::Unary { op, operand } => self.eval_unary(*op, operand),
            Expression::Operation { op, left, right } => self.eval_operation(*op, left, right),
            Expression::Comparison { op, left, right } => self.eval_comparison(*op, left, right),
            Expression::Logical { op, left, right } => self.eval_logical(*op, left, right),
            Expression::Conditional {
                condition,
                then_branch,
                else_branch,
            } => self.eval_conditional(condition, then_branch, else_branch.as_deref()),
            Expression::Function { name, args } => self.eval_function(name, args),
        }
    }

    fn eval_variable(&self, name: &str) -> EvalResult<f64> {
        self.context
            .variable(name)
            .ok_or_else(|| EvalError::VariableNotFound(name.to_string()))
    }

    fn eval_unary(&self, op: UnaryOperator, operand: &Expression) -> EvalResult<f64> {
        let value = self.evaluate(operand)?;
        match op {
            UnaryOperator::Plus => Ok(value),
            UnaryOperator::Negate => Ok(-value),
        }
    }

    fn eval_operation(
        &self,
        op: ArithmeticOperator,
        left: &Expression,
        right: &Expression,
    ) -> EvalResult<f64> {
        let l = self.evaluate(left)?;
        let r = self.evaluate(right)?;

        match op {
            ArithmeticOperator::Add => Ok(l + r),
            ArithmeticOperator::Subtract => Ok(l - r),
            ArithmeticOperator::Multiply => Ok(l * r),
            ArithmeticOperator::Divide => {
                if r == 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                Ok(l / r)
            }
            ArithmeticOperator::Power => Ok(l.powf(r)),
            ArithmeticOperator::Modulo => {
                if r == 0.0 {
                    return Err(EvalError::ModuloByZero);
                }
                // Truncated remainder; the sign follows the dividend.
                Ok(l % r)
            }
        }
    }

    fn eval_comparison(
        &self,
        op: ComparisonOperator,
        left: &Expression,
        right: &Expression,
    ) -> EvalResult<f64> {
        let l = self.evaluate(left)?;
        let r = self.evaluate(right)?;

        let result = match op {
            ComparisonOperator::Equal => l == r,
            ComparisonOperator::NotEqual => l != r,
            ComparisonOperator::GreaterThan => l > r,
            ComparisonOperator::LessThan => l < r,
            ComparisonOperator::GreaterEqual => l >= r,
            ComparisonOperator::LessEqual => l <= r,
        };

        Ok(as_number(result))
    }

    fn eval_logical(
        &self,
        op: LogicalOperator,
        left: &Expression,
        right: &Expression,
    ) -> EvalResult<f64> {
        let l = self.evaluate(left)?;

        match op {
            LogicalOperator::Or if l != 0.0 => {
                log::trace!(target: "EVAL", "OR short-circuit");
                Ok(1.0)
            }
            LogicalOperator::And if l == 0.0 => {
                log::trace!(target: "EVAL", "AND short-circuit");
                Ok(0.0)
            }
            _ => {
                let r = self.evaluate(right)?;
                Ok(as_number(r != 0.0))
            }
        }
    }

    fn eval_conditional(
        &self,
        condition: &Expression,
        then_branch: &Expression,
        else_branch: Option<&Expression>,
    ) -> EvalResult<f64> {
        if self.evaluate(condition)? != 0.0 {
            return self.evaluate(then_branch);
        }

        match else_branch {
            Some(else_branch) => self.evaluate(else_branch),
            None => Ok(0.0),
        }
    }

    /// Evaluates a function call.
    fn eval_function(&self, name: &str, args: &[Expression]) -> EvalResult<f64> {
        let function = self
            .context
            .function(name)
            .ok_or_else(|| EvalError::FunctionNotFound(name.to_string()))?;

        let values = args
            .iter()
            .map(|arg| self.evaluate(arg))
            .collect::<EvalResult<Vec<f64>>>()?;

        log::trace!(target: "EVAL", "call {}({:?})", name, values);

        (**function)(&values).map_err(|source| EvalError::Function {
            name: name.to_string(),
            source,
        })
    }
}

fn as_number(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

/// Evaluates `expr` against `context`.
pub fn evaluate(expr: &Expression, context: &Context) -> EvalResult<f64> {
    log::debug!(target: "EVAL", "evaluate {} node", expr.node_type());
    let result = Evaluator::new(context).evaluate(expr);
    if let Err(err) = &result {
        log::debug!(target: "EVAL", "evaluation failed: {}", err);
    }
    result
}
