//! Tokenizer for arithmetic expressions

use std::fmt;

use crate::error::{AssistantError, AssistantResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Plus => f.write_str("+"),
            Self::Minus => f.write_str("-"),
            Self::Star => f.write_str("*"),
            Self::Slash => f.write_str("/"),
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
        }
    }
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | '*' | '/' | '(' | ')' | ' ')
}

/// Split an expression into tokens
///
/// Any character outside digits, `.`, `+ - * /`, parentheses and spaces is
/// rejected before tokenizing starts.
pub fn tokenize(input: &str) -> AssistantResult<Vec<Token>> {
    if let Some(bad) = input.chars().find(|&c| !is_allowed(c)) {
        return Err(AssistantError::invalid_expression(format!(
            "unsupported character '{}'",
            bad
        )));
    }

    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let token = match bytes[pos] {
            b' ' => {
                pos += 1;
                continue;
            }
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            b'*' => Token::Star,
            b'/' => Token::Slash,
            b'(' => Token::LParen,
            b')' => Token::RParen,
            _ => {
                let (number, len) = read_number(&input[pos..])?;
                pos += len;
                tokens.push(Token::Number(number));
                continue;
            }
        };
        tokens.push(token);
        pos += 1;
    }

    Ok(tokens)
}

/// Read a number literal at the start of `s`: `1`, `1.5`, `.5` or `1.`
fn read_number(s: &str) -> AssistantResult<(f64, usize)> {
    let len = s
        .bytes()
        .take_while(|b| b.is_ascii_digit() || *b == b'.')
        .count();
    let literal = &s[..len];

    let dots = literal.bytes().filter(|&b| b == b'.').count();
    if dots > 1 || literal == "." {
        return Err(AssistantError::invalid_expression(format!(
            "malformed number '{}'",
            literal
        )));
    }

    literal
        .parse::<f64>()
        .map(|n| (n, len))
        .map_err(|_| AssistantError::invalid_expression(format!("malformed number '{}'", literal)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        let tokens = tokenize("(1.5 + .5) * 2.").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::LParen,
                Token::Number(1.5),
                Token::Plus,
                Token::Number(0.5),
                Token::RParen,
                Token::Star,
                Token::Number(2.0),
            ]
        );
    }

    #[test]
    fn test_rejects_foreign_characters() {
        for input in ["2 & 2", "__import__('os')", "2 ** 2a", "1e5", "2\t+ 2"] {
            let err = tokenize(input).unwrap_err();
            assert!(
                matches!(err, AssistantError::InvalidExpression(_)),
                "{} should be rejected",
                input
            );
        }
    }

    #[test]
    fn test_malformed_numbers() {
        assert!(tokenize("1.2.3").is_err());
        assert!(tokenize(". + 1").is_err());
    }

    #[test]
    fn test_spaces_separate_numbers() {
        assert_eq!(
            tokenize("1 2").unwrap(),
            vec![Token::Number(1.0), Token::Number(2.0)]
        );
    }
}
