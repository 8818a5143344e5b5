//! FILENAME: parser/src/parser.rs
//! PURPOSE: Recursive descent parser that converts a stream of Tokens into an AST.
//! CONTEXT: This is the second stage of the parsing pipeline. It pulls tokens
//! from the Lexer one at a time and builds an Expression tree that can be evaluated.
//!
//! GRAMMAR:
//!   expression     --> logical_or
//!   logical_or     --> logical_and ( OR logical_and )*
//!   logical_and    --> comparison ( AND comparison )*
//!   comparison     --> additive ( (">" | "<" | ">=" | "<=" | "=" | "==" | "!=") additive )*
//!   additive       --> multiplicative ( ("+" | "-") multiplicative )*
//!   multiplicative --> unary ( ("*" | "/" | "%") unary )*
//!   unary          --> ("+" | "-") unary | power
//!   power          --> primary ( ("^" | "**") unary )?
//!   primary        --> NUMBER | VARIABLE | function_call | conditional | "(" expression ")"
//!   conditional    --> IF "(" logical_or "," logical_or ( "," logical_or )? ")"
//!                    | IF logical_or THEN logical_or ( ELSE logical_or )?
//!   function_call  --> FUNCTION "(" ( expression ( "," expression )* )? ")"
//!
//! IF, THEN, ELSE, OR and AND have Cyrillic spellings (ЕСЛИ, ТОГДА, ИНАЧЕ, ИЛИ, И).
//! All binary levels are left-associative, so "5 > 3 > 1" is "(5 > 3) > 1".

use crate::ast::{
    ArithmeticOperator, ComparisonOperator, Expression, LogicalOperator, UnaryOperator,
};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

/// Parser errors with descriptive messages.
#[derive(Debug, PartialEq, Clone)]
pub struct ParseError {
    pub message: String,
    /// Character offset of the offending token, when one is known.
    pub position: Option<usize>,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        ParseError {
            message: message.into(),
            position: None,
        }
    }

    pub fn at(message: impl Into<String>, position: usize) -> Self {
        ParseError {
            message: message.into(),
            position: Some(position),
        }
    }

    /// Prefixes the message with what was being parsed, keeping the position.
    fn context(self, what: &str) -> Self {
        ParseError {
            message: format!("error parsing {}: {}", what, self.message),
            position: self.position,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.position {
            Some(position) => write!(f, "Parse error at position {}: {}", position, self.message),
            None => write!(f, "Parse error: {}", self.message),
        }
    }
}

impl std::error::Error for ParseError {}

pub type ParseResult<T> = Result<T, ParseError>;

/// The Parser struct holds the lexer and current token state.
pub struct Parser {
    lexer: Lexer,
    current_token: Token,
}

impl Parser {
    /// Creates a new parser from an input string.
    /// Automatically advances to the first token.
    pub fn new(input: &str) -> Self {
        let mut lexer = Lexer::new(input);
        let current_token = lexer.next_token();
        Parser {
            lexer,
            current_token,
        }
    }

    /// Parses the entire input and returns the AST.
    /// Tokens left over after a complete expression are an error.
    pub fn parse(&mut self) -> ParseResult<Expression> {
        let expr = self.parse_prefix()?;

        if !self.current_token.is_eof() {
            return Err(self.error_here(format!(
                "unexpected token after expression: {}",
                self.current_token
            )));
        }

        Ok(expr)
    }

    /// Parses the first complete expression and stops, leaving any
    /// remaining tokens unread.
    pub fn parse_prefix(&mut self) -> ParseResult<Expression> {
        if self.current_token.is_eof() {
            return Err(ParseError::new("empty formula"));
        }
        self.parse_expression()
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        self.current_token = self.lexer.next_token();
    }

    fn error_here(&self, message: impl Into<String>) -> ParseError {
        ParseError::at(message, self.current_token.position)
    }

    /// Checks that the current token has the expected kind and consumes it.
    fn expect(&mut self, expected: TokenKind, message: &str) -> ParseResult<()> {
        if self.current_token.kind == expected {
            self.advance();
            Ok(())
        } else {
            Err(self.error_here(format!("{}, found {}", message, self.current_token)))
        }
    }

    /// Returns the current arithmetic operator if its spelling is one of `candidates`.
    fn arithmetic_operator_in(&self, candidates: &[&str]) -> Option<ArithmeticOperator> {
        self.current_token
            .operator()
            .filter(|op| candidates.contains(op))
            .and_then(ArithmeticOperator::from_symbol)
    }

    /// Entry point for expression parsing.
    fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.parse_logical_or()
    }

    /// Parses OR / ИЛИ chains.
    fn parse_logical_or(&mut self) -> ParseResult<Expression> {
        let left = self.parse_logical_and()?;
        self.logical_or_tail(left)
    }

    fn logical_or_tail(&mut self, mut left: Expression) -> ParseResult<Expression> {
        while self.current_token.kind == TokenKind::Or {
            self.advance();
            let right = self.parse_logical_and()?;
            left = Expression::logical(LogicalOperator::Or, left, right);
        }
        Ok(left)
    }

    /// Parses AND / И chains.
    fn parse_logical_and(&mut self) -> ParseResult<Expression> {
        let left = self.parse_comparison()?;
        self.logical_and_tail(left)
    }

    fn logical_and_tail(&mut self, mut left: Expression) -> ParseResult<Expression> {
        while self.current_token.kind == TokenKind::And {
            self.advance();
            let right = self.parse_comparison()?;
            left = Expression::logical(LogicalOperator::And, left, right);
        }
        Ok(left)
    }

    /// Parses comparison expressions (>, <, >=, <=, =, ==, !=).
    fn parse_comparison(&mut self) -> ParseResult<Expression> {
        let left = self.parse_additive()?;
        self.comparison_tail(left)
    }

    fn comparison_tail(&mut self, mut left: Expression) -> ParseResult<Expression> {
        while let Some(op) = self
            .current_token
            .operator()
            .and_then(ComparisonOperator::from_symbol)
        {
            self.advance();
            let right = self.parse_additive()?;
            left = Expression::comparison(op, left, right);
        }
        Ok(left)
    }

    /// Parses additive expressions (+ and -).
    fn parse_additive(&mut self) -> ParseResult<Expression> {
        let left = self.parse_multiplicative()?;
        self.additive_tail(left)
    }

    fn additive_tail(&mut self, mut left: Expression) -> ParseResult<Expression> {
        while let Some(op) = self.arithmetic_operator_in(&["+", "-"]) {
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expression::operation(op, left, right);
        }
        Ok(left)
    }

    /// Parses multiplicative expressions (*, / and %).
    fn parse_multiplicative(&mut self) -> ParseResult<Expression> {
        let left = self.parse_unary()?;
        self.multiplicative_tail(left)
    }

    fn multiplicative_tail(&mut self, mut left: Expression) -> ParseResult<Expression> {
        while let Some(op) = self.arithmetic_operator_in(&["*", "/", "%"]) {
            self.advance();
            let right = self.parse_unary()?;
            left = Expression::operation(op, left, right);
        }
        Ok(left)
    }

    /// Parses unary sign prefixes.
    fn parse_unary(&mut self) -> ParseResult<Expression> {
        if let Some(op) = self
            .current_token
            .operator()
            .and_then(UnaryOperator::from_symbol)
        {
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(Expression::unary(op, operand));
        }

        self.parse_power()
    }

    /// Parses power/exponentiation expressions (^ and **).
    fn parse_power(&mut self) -> ParseResult<Expression> {
        let base = self.parse_primary()?;
        self.power_tail(base)
    }

    fn power_tail(&mut self, base: Expression) -> ParseResult<Expression> {
        if self.arithmetic_operator_in(&["^", "**"]).is_some() {
            self.advance();
            let exponent = self.parse_unary()?;
            return Ok(Expression::operation(ArithmeticOperator::Power, base, exponent));
        }
        Ok(base)
    }

    /// Resumes every binary level from an already parsed operand.
    /// Used when "IF (" turns out to open a parenthesized condition.
    fn continue_from_operand(&mut self, operand: Expression) -> ParseResult<Expression> {
        let operand = self.power_tail(operand)?;
        let operand = self.multiplicative_tail(operand)?;
        let operand = self.additive_tail(operand)?;
        let operand = self.comparison_tail(operand)?;
        let operand = self.logical_and_tail(operand)?;
        self.logical_or_tail(operand)
    }

    /// Parses primary expressions (literals, variables, calls, conditionals, parentheses).
    fn parse_primary(&mut self) -> ParseResult<Expression> {
        let token = self.current_token.clone();
        match token.kind {
            TokenKind::Number => {
                // Digit runs too long for f64 parse to infinity; reject them too.
                let value = token
                    .text
                    .parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite())
                    .ok_or_else(|| ParseError::at(format!("invalid number: {}", token.text), token.position))?;
                self.advance();
                Ok(Expression::literal(value))
            }

            TokenKind::Variable => {
                self.advance();
                Ok(Expression::variable(token.text))
            }

            TokenKind::Function => self.parse_function_call(token),

            TokenKind::If => self.parse_conditional(),

            TokenKind::ParenOpen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::ParenClose, "expected ')'")?;
                Ok(expr)
            }

            TokenKind::EndOfInput => Err(ParseError::at("unexpected end of expression", token.position)),

            TokenKind::Operator => Err(ParseError::at(
                format!("unexpected operator: {}", token.text),
                token.position,
            )),

            _ => Err(ParseError::at(
                format!("unexpected token: {}", token),
                token.position,
            )),
        }
    }

    /// Parses a function call like max(a, b, 10).
    fn parse_function_call(&mut self, name: Token) -> ParseResult<Expression> {
        // Consume the name
        self.advance();
        self.expect(TokenKind::ParenOpen, "expected '(' after function name")?;

        let mut args = Vec::new();

        // Handle empty argument list
        if self.current_token.kind == TokenKind::ParenClose {
            self.advance();
            return Ok(Expression::function(name.text, args));
        }

        args.push(self.parse_expression()?);

        while self.current_token.kind == TokenKind::Comma {
            self.advance();
            args.push(self.parse_expression()?);
        }

        self.expect(
            TokenKind::ParenClose,
            &format!("expected ')' to close call to {}", name.text),
        )?;

        Ok(Expression::function(name.text, args))
    }

    /// Parses both conditional forms. After the keyword, "(" followed by an
    /// expression and "," is the call form; "(" ... ")" is just the start of
    /// a statement-form condition.
    fn parse_conditional(&mut self) -> ParseResult<Expression> {
        // Consume IF / ЕСЛИ
        self.advance();

        if self.current_token.kind == TokenKind::ParenOpen {
            self.advance();
            let first = self
                .parse_logical_or()
                .map_err(|e| e.context("IF condition"))?;

            return match self.current_token.kind {
                TokenKind::Comma => self.finish_conditional_call(first),
                TokenKind::ParenClose => {
                    self.advance();
                    let condition = self
                        .continue_from_operand(first)
                        .map_err(|e| e.context("IF condition"))?;
                    self.finish_conditional_statement(condition)
                }
                _ => Err(self.error_here(format!(
                    "expected ',' or ')' after IF condition, found {}",
                    self.current_token
                ))),
            };
        }

        let condition = self
            .parse_logical_or()
            .map_err(|e| e.context("IF condition"))?;
        self.finish_conditional_statement(condition)
    }

    /// IF cond THEN a (ELSE b)?
    fn finish_conditional_statement(&mut self, condition: Expression) -> ParseResult<Expression> {
        self.expect(TokenKind::Then, "expected THEN/ТОГДА after IF condition")?;

        let then_branch = self
            .parse_logical_or()
            .map_err(|e| e.context("IF then branch"))?;

        let else_branch = if self.current_token.kind == TokenKind::Else {
            self.advance();
            Some(
                self.parse_logical_or()
                    .map_err(|e| e.context("IF else branch"))?,
            )
        } else {
            None
        };

        Ok(Expression::conditional(condition, then_branch, else_branch))
    }

    /// IF(cond, a (, b)?) with the current token on the first comma.
    fn finish_conditional_call(&mut self, condition: Expression) -> ParseResult<Expression> {
        // Consume ','
        self.advance();

        let then_branch = self
            .parse_logical_or()
            .map_err(|e| e.context("IF then branch"))?;

        let else_branch = if self.current_token.kind == TokenKind::Comma {
            self.advance();
            Some(
                self.parse_logical_or()
                    .map_err(|e| e.context("IF else branch"))?,
            )
        } else {
            None
        };

        self.expect(TokenKind::ParenClose, "expected ')' to close IF function")?;

        Ok(Expression::conditional(condition, then_branch, else_branch))
    }
}

/// Convenience function to parse a formula string directly.
/// Rejects trailing tokens after a complete expression.
pub fn parse(input: &str) -> ParseResult<Expression> {
    log::debug!(target: "PARSER", "parse {:?}", input);
    let result = Parser::new(input).parse();
    if let Err(err) = &result {
        log::debug!(target: "PARSER", "parse failed: {}", err);
    }
    result
}

/// Parses the leading complete expression and ignores whatever follows it.
pub fn parse_prefix(input: &str) -> ParseResult<Expression> {
    log::debug!(target: "PARSER", "parse_prefix {:?}", input);
    Parser::new(input).parse_prefix()
}
