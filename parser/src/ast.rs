//! FILENAME: parser/src/ast.rs
//! PURPOSE: Defines the Abstract Syntax Tree (AST) for formula expressions.
//! CONTEXT: After the Lexer tokenizes a formula string, the Parser converts
//! those tokens into this tree structure. The engine crate then traverses
//! this tree to compute the final result.
//!
//! SUPPORTED EXPRESSIONS:
//! - Literals: numbers only (booleans are encoded as 1.0 / 0.0)
//! - Variables: A, price, ставка
//! - Arithmetic: +, -, *, /, ^ (also written **), %
//! - Comparison: =, !=, >, <, >=, <=
//! - Logical: AND / И, OR / ИЛИ (short-circuit)
//! - Conditionals: IF c THEN a ELSE b, IF(c, a, b), ЕСЛИ ... ТОГДА ... ИНАЧЕ
//! - Function calls: max(a, b), sqrt(x)
//!
//! The tree serializes to the tagged JSON node format (see `codec`).

use serde::Serialize;

/// Represents a parsed formula expression.
/// Every node owns its children; the tree is immutable once built.
#[derive(Debug, PartialEq, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Expression {
    /// A numeric literal.
    Literal { value: f64 },

    /// A variable resolved from the evaluation context by exact name.
    Variable { name: String },

    /// A unary sign: -x or +x.
    Unary {
        #[serde(rename = "operator")]
        op: UnaryOperator,
        operand: Box<Expression>,
    },

    /// Arithmetic: left op right.
    Operation {
        #[serde(rename = "operator")]
        op: ArithmeticOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    /// Comparison yielding 1.0 or 0.0.
    Comparison {
        #[serde(rename = "operator")]
        op: ComparisonOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    /// AND / OR. The right side is only evaluated when needed.
    Logical {
        #[serde(rename = "operator")]
        op: LogicalOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    /// IF-THEN-ELSE. A missing else branch evaluates to 0.
    Conditional {
        condition: Box<Expression>,
        #[serde(rename = "then")]
        then_branch: Box<Expression>,
        #[serde(rename = "else", skip_serializing_if = "Option::is_none")]
        else_branch: Option<Box<Expression>>,
    },

    /// A call resolved against the context's function table at evaluation time.
    Function { name: String, args: Vec<Expression> },
}

impl Expression {
    pub fn literal(value: f64) -> Self {
        Expression::Literal { value }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Expression::Variable { name: name.into() }
    }

    pub fn unary(op: UnaryOperator, operand: Expression) -> Self {
        Expression::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn operation(op: ArithmeticOperator, left: Expression, right: Expression) -> Self {
        Expression::Operation {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn comparison(op: ComparisonOperator, left: Expression, right: Expression) -> Self {
        Expression::Comparison {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn logical(op: LogicalOperator, left: Expression, right: Expression) -> Self {
        Expression::Logical {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn conditional(
        condition: Expression,
        then_branch: Expression,
        else_branch: Option<Expression>,
    ) -> Self {
        Expression::Conditional {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: else_branch.map(Box::new),
        }
    }

    pub fn function(name: impl Into<String>, args: Vec<Expression>) -> Self {
        Expression::Function {
            name: name.into(),
            args,
        }
    }

    /// The node's tag in the JSON tree format.
    pub fn node_type(&self) -> &'static str {
        match self {
            Expression::Literal { .. } => "literal",
            Expression::Variable { .. } => "variable",
            Expression::Unary { .. } => "unary",
            Expression::Operation { .. } => "operation",
            Expression::Comparison { .. } => "comparison",
            Expression::Logical { .. } => "logical",
            Expression::Conditional { .. } => "conditional",
            Expression::Function { .. } => "function",
        }
    }
}

/// Unary operators.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum UnaryOperator {
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Negate,
}

/// Arithmetic operators. `^` and `**` both map to Power.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum ArithmeticOperator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
    #[serde(rename = "^")]
    Power,
    #[serde(rename = "%")]
    Modulo,
}

/// Comparison operators. `==` is accepted as a spelling of `=`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum ComparisonOperator {
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = ">=")]
    GreaterEqual,
    #[serde(rename = "<=")]
    LessEqual,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum LogicalOperator {
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

impl UnaryOperator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(UnaryOperator::Plus),
            "-" => Some(UnaryOperator::Negate),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOperator::Plus => "+",
            UnaryOperator::Negate => "-",
        }
    }
}

impl ArithmeticOperator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(ArithmeticOperator::Add),
            "-" => Some(ArithmeticOperator::Subtract),
            "*" => Some(ArithmeticOperator::Multiply),
            "/" => Some(ArithmeticOperator::Divide),
            "^" | "**" => Some(ArithmeticOperator::Power),
            "%" => Some(ArithmeticOperator::Modulo),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ArithmeticOperator::Add => "+",
            ArithmeticOperator::Subtract => "-",
            ArithmeticOperator::Multiply => "*",
            ArithmeticOperator::Divide => "/",
            ArithmeticOperator::Power => "^",
            ArithmeticOperator::Modulo => "%",
        }
    }
}

impl ComparisonOperator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "=" | "==" => Some(ComparisonOperator::Equal),
            "!=" => Some(ComparisonOperator::NotEqual),
            ">" => Some(ComparisonOperator::GreaterThan),
            "<" => Some(ComparisonOperator::LessThan),
            ">=" => Some(ComparisonOperator::GreaterEqual),
            "<=" => Some(ComparisonOperator::LessEqual),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOperator::Equal => "=",
            ComparisonOperator::NotEqual => "!=",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::GreaterEqual => ">=",
            ComparisonOperator::LessEqual => "<=",
        }
    }
}

impl LogicalOperator {
    /// Accepts the Latin and Cyrillic spellings in any case.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol.to_uppercase().as_str() {
            "AND" | "И" => Some(LogicalOperator::And),
            "OR" | "ИЛИ" => Some(LogicalOperator::Or),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
        }
    }
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl std::fmt::Display for ArithmeticOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl std::fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl std::fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Renders the tree back to formula text. Binary nodes are fully
/// parenthesized, so a tree produced by `parse` re-parses to an equal tree.
/// Decoded trees can differ: a negative literal re-parses as a negated
/// positive one (same value), and names the lexer cannot read back, such
/// as `f1`, do not survive.
impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Literal { value } => write!(f, "{}", value),
            Expression::Variable { name } => write!(f, "{}", name),
            Expression::Unary { op, operand } => write!(f, "{}{}", op, operand),
            Expression::Operation { op, left, right } => {
                write!(f, "({} {} {})", left, op, right)
            }
            Expression::Comparison { op, left, right } => {
                write!(f, "({} {} {})", left, op, right)
            }
            Expression::Logical { op, left, right } => {
                write!(f, "({} {} {})", left, op, right)
            }
            Expression::Conditional {
                condition,
                then_branch,
                else_branch,
            } => match else_branch {
                Some(else_branch) => {
                    write!(f, "IF({}, {}, {})", condition, then_branch, else_branch)
                }
                None => write!(f, "IF({}, {})", condition, then_branch),
            },
            Expression::Function { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}
