//! Recursive-descent parser and evaluator
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := '-' unary | primary
//! primary := NUMBER | '(' expr ')'
//! ```

use super::token::Token;
use crate::error::{AssistantError, AssistantResult};

/// Deepest allowed nesting of parentheses and unary minus
pub const MAX_DEPTH: usize = 64;

/// Longest accepted token stream; bounds the depth of operator chains
pub const MAX_TOKENS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Parsed expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    pub fn eval(&self) -> AssistantResult<f64> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Neg(inner) => Ok(-inner.eval()?),
            Self::Binary { op, lhs, rhs } => {
                let lhs = lhs.eval()?;
                let rhs = rhs.eval()?;
                match op {
                    BinaryOp::Add => Ok(lhs + rhs),
                    BinaryOp::Sub => Ok(lhs - rhs),
                    BinaryOp::Mul => Ok(lhs * rhs),
                    BinaryOp::Div if rhs == 0.0 => Err(AssistantError::DivisionByZero),
                    BinaryOp::Div => Ok(lhs / rhs),
                }
            }
        }
    }
}

/// Parse a complete token stream into one expression
pub fn parse(tokens: &[Token]) -> AssistantResult<Expr> {
    if tokens.is_empty() {
        return Err(AssistantError::invalid_expression("empty expression"));
    }
    if tokens.len() > MAX_TOKENS {
        return Err(AssistantError::invalid_expression(format!(
            "expression too long (over {} tokens)",
            MAX_TOKENS
        )));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.expr()?;

    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(AssistantError::invalid_expression(format!(
            "unexpected '{}'",
            token
        ))),
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn descend(&mut self) -> AssistantResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(AssistantError::invalid_expression("expression nested too deeply"));
        }
        Ok(())
    }

    fn expr(&mut self) -> AssistantResult<Expr> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn term(&mut self) -> AssistantResult<Expr> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn unary(&mut self) -> AssistantResult<Expr> {
        if self.peek() == Some(Token::Minus) {
            self.pos += 1;
            self.descend()?;
            let inner = self.unary()?;
            self.depth -= 1;
            return Ok(Expr::Neg(Box::new(inner)));
        }
        self.primary()
    }

    fn primary(&mut self) -> AssistantResult<Expr> {
        match self.next() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::LParen) => {
                self.descend()?;
                let inner = self.expr()?;
                self.depth -= 1;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    Some(token) => Err(AssistantError::invalid_expression(format!(
                        "expected ')' but found '{}'",
                        token
                    ))),
                    None => Err(AssistantError::invalid_expression("missing ')'")),
                }
            }
            Some(token) => Err(AssistantError::invalid_expression(format!(
                "unexpected '{}'",
                token
            ))),
            None => Err(AssistantError::invalid_expression("unexpected end of expression")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::token::tokenize;

    fn parse_str(input: &str) -> AssistantResult<Expr> {
        parse(&tokenize(input)?)
    }

    #[test]
    fn test_precedence_builds_tree() {
        let expr = parse_str("1 + 2 * 3").unwrap();
        assert_eq!(
            expr,
            Expr::Binary {
                op: BinaryOp::Add,
                lhs: Box::new(Expr::Number(1.0)),
                rhs: Box::new(Expr::Binary {
                    op: BinaryOp::Mul,
                    lhs: Box::new(Expr::Number(2.0)),
                    rhs: Box::new(Expr::Number(3.0)),
                }),
            }
        );
    }

    #[test]
    fn test_structural_errors() {
        for input in ["", "()", "(1 + 2", "1 + 2)", "1 2", "* 3", "4 /", "2 ++ 2", "+2"] {
            assert!(
                matches!(parse_str(input), Err(AssistantError::InvalidExpression(_))),
                "{:?} should not parse",
                input
            );
        }
    }

    #[test]
    fn test_depth_limit() {
        let shallow = format!("{}1{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert!(parse_str(&shallow).is_ok());

        let deep = format!("{}1{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert!(matches!(
            parse_str(&deep),
            Err(AssistantError::InvalidExpression(_))
        ));

        let negations = format!("{}1", "-".repeat(10_000));
        assert!(parse_str(&negations).is_err());
    }

    #[test]
    fn test_token_limit() {
        // n terms take 2n - 1 tokens
        let longest = vec!["1"; (MAX_TOKENS + 1) / 2].join("+");
        assert!(parse_str(&longest).is_ok());

        let too_long = vec!["1"; MAX_TOKENS / 2 + 1].join("+");
        assert!(matches!(
            parse_str(&too_long),
            Err(AssistantError::InvalidExpression(_))
        ));
    }
}
