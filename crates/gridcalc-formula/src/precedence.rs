//! Operator binding strengths
//!
//! Higher binds tighter. All comparison operators share one level, and anything
//! unrecognized binds at [`NONE`], which never triggers a rotation in the parser.

use crate::ast::Operator;
use crate::lexer::{Token, TokenKind};

pub const PARENTHESIS: u8 = 10;
pub const FUNCTION: u8 = 9;
pub const RANGE: u8 = 8;
pub const UNARY: u8 = 7;
pub const PERCENT: u8 = 6;
pub const POWER: u8 = 5;
pub const MULTIPLICATIVE: u8 = 4;
pub const ADDITIVE: u8 = 3;
pub const CONCATENATION: u8 = 2;
pub const COMPARISON: u8 = 1;
pub const NONE: u8 = 0;

/// Binding strength of an operator
pub fn of_operator(op: Operator) -> u8 {
    match op {
        Operator::Range => RANGE,
        Operator::Identity | Operator::Negate => UNARY,
        Operator::Percent => PERCENT,
        Operator::Power => POWER,
        Operator::Multiply | Operator::Divide => MULTIPLICATIVE,
        Operator::Add | Operator::Subtract => ADDITIVE,
        Operator::Concat => CONCATENATION,
        Operator::Equal
        | Operator::NotEqual
        | Operator::LessThan
        | Operator::LessEqual
        | Operator::GreaterThan
        | Operator::GreaterEqual => COMPARISON,
    }
}

/// Binding strength of a token
///
/// `+` and `-` report their binary strength; whether they act as a prefix sign
/// depends on position and is decided by the parser (see [`UNARY`]).
pub fn of_token(token: &Token<'_>) -> u8 {
    match token.kind {
        TokenKind::Symbol if token.text == "(" => PARENTHESIS,
        TokenKind::Function => FUNCTION,
        TokenKind::Operator => Operator::from_symbol(token.text).map_or(NONE, of_operator),
        _ => NONE,
    }
}
