//! Safe arithmetic calculator
//!
//! Expressions are tokenized against a fixed character set, parsed by a
//! recursive-descent parser and evaluated over `f64`. Nothing is ever handed to
//! an interpreter.
//!
//! - `token`: character whitelist and tokenizer
//! - `parser`: grammar, expression tree and evaluation

pub mod parser;
pub mod token;

pub use parser::{BinaryOp, Expr, MAX_DEPTH};
pub use token::Token;

use crate::error::AssistantResult;

/// Evaluate an arithmetic expression
///
/// Fails with `InvalidExpression` for anything outside the grammar and with
/// `DivisionByZero` when a divisor evaluates to zero.
pub fn evaluate(expression: &str) -> AssistantResult<f64> {
    let tokens = token::tokenize(expression)?;
    let expr = parser::parse(&tokens)?;
    let value = expr.eval()?;
    tracing::debug!(expression, value, "evaluated expression");
    Ok(value)
}

/// Format a result without a trailing `.0` for whole numbers
pub fn format_result(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
