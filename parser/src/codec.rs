//! FILENAME: parser/src/codec.rs
//! PURPOSE: Tagged JSON exchange format for Expression trees.
//! CONTEXT: Program-authored formulas arrive as one JSON object per node with
//! a "type" discriminator. Decoding is strict: a missing field names itself,
//! and a failing child is wrapped with the branch it came from.
//!
//! NODE FORMAT:
//! - literal:      { "type": "literal", "value": 2 }
//! - variable:     { "type": "variable", "name": "a" }
//! - unary:        { "type": "unary", "operator": "-", "operand": {..} }
//! - operation:    { "type": "operation", "operator": "+", "left": {..}, "right": {..} }
//! - comparison:   { "type": "comparison", "operator": ">=", "left": {..}, "right": {..} }
//! - logical:      { "type": "logical", "operator": "AND", "left": {..}, "right": {..} }
//! - conditional:  { "type": "conditional", "condition": {..}, "then": {..}, "else": {..}? }
//! - function:     { "type": "function", "name": "max", "args": [{..}, ..] }

use crate::ast::{
    ArithmeticOperator, ComparisonOperator, Expression, LogicalOperator, UnaryOperator,
};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object for a node")]
    NotAnObject,

    #[error("{node} node missing {field}")]
    MissingField { node: String, field: &'static str },

    #[error("{node} node field {field} must be {expected}")]
    InvalidField {
        node: String,
        field: &'static str,
        expected: &'static str,
    },

    #[error("unknown node type: {0}")]
    UnknownNodeType(String),

    #[error("unknown {node} operator: {operator}")]
    UnknownOperator { node: &'static str, operator: String },

    #[error("{node} node has an empty name")]
    EmptyName { node: &'static str },

    #[error("error parsing {context}: {source}")]
    Child {
        context: String,
        #[source]
        source: Box<CodecError>,
    },
}

pub type CodecResult<T> = Result<T, CodecError>;

/// Serializes a tree into its tagged JSON value.
/// JSON has no infinity or NaN, so trees holding one are refused.
pub fn to_json(expr: &Expression) -> CodecResult<Value> {
    ensure_finite(expr)?;
    Ok(serde_json::to_value(expr)?)
}

/// Serializes a tree into a JSON string.
pub fn to_json_string(expr: &Expression) -> CodecResult<String> {
    ensure_finite(expr)?;
    Ok(serde_json::to_string(expr)?)
}

fn ensure_finite(expr: &Expression) -> CodecResult<()> {
    match expr {
        Expression::Literal { value } if !value.is_finite() => Err(CodecError::InvalidField {
            node: "literal".to_string(),
            field: "value",
            expected: "a finite number",
        }),
        Expression::Literal { .. } | Expression::Variable { .. } => Ok(()),
        Expression::Unary { operand, .. } => ensure_finite(operand),
        Expression::Operation { left, right, .. }
        | Expression::Comparison { left, right, .. }
        | Expression::Logical { left, right, .. } => {
            ensure_finite(left)?;
            ensure_finite(right)
        }
        Expression::Conditional {
            condition,
            then_branch,
            else_branch,
        } => {
            ensure_finite(condition)?;
            ensure_finite(then_branch)?;
            else_branch.as_deref().map_or(Ok(()), ensure_finite)
        }
        Expression::Function { args, .. } => args.iter().try_for_each(ensure_finite),
    }
}

/// Decodes a tree from JSON text.
pub fn from_json_str(input: &str) -> CodecResult<Expression> {
    let value: Value = serde_json::from_str(input)?;
    from_json_value(&value)
}

/// Decodes a tree from an already parsed JSON value.
pub fn from_json_value(value: &Value) -> CodecResult<Expression> {
    let object = value.as_object().ok_or(CodecError::NotAnObject)?;
    let node_type = match object.get("type") {
        Some(Value::String(tag)) => tag.as_str(),
        Some(_) => {
            return Err(CodecError::InvalidField {
                node: "node".to_string(),
                field: "type",
                expected: "a string",
            })
        }
        None => {
            return Err(CodecError::MissingField {
                node: "node".to_string(),
                field: "type",
            })
        }
    };

    log::trace!(target: "CODEC", "decoding {} node", node_type);

    match node_type {
        "literal" => {
            let value = number_field(object, "literal", "value")?;
            Ok(Expression::literal(value))
        }

        "variable" => {
            let name = string_field(object, "variable", "name")?;
            if name.is_empty() {
                return Err(CodecError::EmptyName { node: "variable" });
            }
            Ok(Expression::variable(name))
        }

        "unary" => {
            let symbol = string_field(object, "unary", "operator")?;
            let op = UnaryOperator::from_symbol(&symbol).ok_or(CodecError::UnknownOperator {
                node: "unary",
                operator: symbol,
            })?;
            let operand = child(object, "unary", "operand", "operand")?;
            Ok(Expression::unary(op, operand))
        }

        "operation" => {
            let symbol = string_field(object, "operation", "operator")?;
            let op = ArithmeticOperator::from_symbol(&symbol).ok_or(CodecError::UnknownOperator {
                node: "operation",
                operator: symbol,
            })?;
            let left = child(object, "operation", "left", "left operand")?;
            let right = child(object, "operation", "right", "right operand")?;
            Ok(Expression::operation(op, left, right))
        }

        "comparison" => {
            let symbol = string_field(object, "comparison", "operator")?;
            let op = ComparisonOperator::from_symbol(&symbol).ok_or(CodecError::UnknownOperator {
                node: "comparison",
                operator: symbol,
            })?;
            let left = child(object, "comparison", "left", "left operand")?;
            let right = child(object, "comparison", "right", "right operand")?;
            Ok(Expression::comparison(op, left, right))
        }

        "logical" => {
            let symbol = string_field(object, "logical", "operator")?;
            let op = LogicalOperator::from_symbol(&symbol).ok_or(CodecError::UnknownOperator {
                node: "logical",
                operator: symbol,
            })?;
            let left = child(object, "logical", "left", "left operand")?;
            let right = child(object, "logical", "right", "right operand")?;
            Ok(Expression::logical(op, left, right))
        }

        "conditional" => {
            let condition = child(object, "conditional", "condition", "condition")?;
            let then_branch = child(object, "conditional", "then", "then branch")?;
            let else_branch = match object.get("else") {
                None | Some(Value::Null) => None,
                Some(value) => Some(decode_child(value, "else branch")?),
            };
            Ok(Expression::conditional(condition, then_branch, else_branch))
        }

        "function" => {
            let name = string_field(object, "function", "name")?;
            if name.is_empty() {
                return Err(CodecError::EmptyName { node: "function" });
            }
            let args = match object.get("args") {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(items)) => items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| decode_child(item, &format!("function argument {}", i)))
                    .collect::<CodecResult<Vec<_>>>()?,
                Some(_) => {
                    return Err(CodecError::InvalidField {
                        node: "function".to_string(),
                        field: "args",
                        expected: "an array",
                    })
                }
            };
            Ok(Expression::function(name, args))
        }

        other => Err(CodecError::UnknownNodeType(other.to_string())),
    }
}

fn number_field(object: &Map<String, Value>, node: &str, field: &'static str) -> CodecResult<f64> {
    match object.get(field) {
        None | Some(Value::Null) => Err(CodecError::MissingField {
            node: node.to_string(),
            field,
        }),
        Some(value) => value.as_f64().ok_or_else(|| CodecError::InvalidField {
            node: node.to_string(),
            field,
            expected: "a number",
        }),
    }
}

fn string_field(object: &Map<String, Value>, node: &str, field: &'static str) -> CodecResult<String> {
    match object.get(field) {
        None | Some(Value::Null) => Err(CodecError::MissingField {
            node: node.to_string(),
            field,
        }),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(CodecError::InvalidField {
            node: node.to_string(),
            field,
            expected: "a string",
        }),
    }
}

/// Decodes a required child node, wrapping failures with `context`.
fn child(
    object: &Map<String, Value>,
    node: &str,
    field: &'static str,
    context: &str,
) -> CodecResult<Expression> {
    match object.get(field) {
        None | Some(Value::Null) => Err(CodecError::MissingField {
            node: node.to_string(),
            field,
        }),
        Some(value) => decode_child(value, context),
    }
}

fn decode_child(value: &Value, context: &str) -> CodecResult<Expression> {
    from_json_value(value).map_err(|source| CodecError::Child {
        context: context.to_string(),
        source: Box::new(source),
    })
}

/// Deserializing through serde uses the same strict decoder.
impl<'de> Deserialize<'de> for Expression {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        from_json_value(&value).map_err(serde::de::Error::custom)
    }
}
