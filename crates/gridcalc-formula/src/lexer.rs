//! Formula tokenizer
//!
//! Splits formula text into typed tokens with a single left-to-right scan. At every
//! position the recognizers are tried in a fixed order and the first match wins:
//!
//! 1. whitespace (skipped)
//! 2. punctuation: `(` `)` `,`
//! 3. operators, two-character comparisons (`<=` `>=` `<>`) before their prefixes
//! 4. reserved function names (whole words only, so `SUM` is never a cell)
//! 5. cell names: optional `$`, letters, optional `$`, digits
//! 6. boolean literals
//! 7. quoted strings (up to the next `"`)
//! 8. scientific-notation floats, plain floats, integers

use crate::error::{FormulaError, FormulaResult};
use crate::functions::Builtin;
use crate::value::FormulaValue;
use lazy_regex::regex;
use regex::Regex;
use std::fmt;

/// Token categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `(`, `)` or `,`
    Symbol,
    /// Arithmetic, comparison, concatenation, range and percent operators
    Operator,
    /// Reserved built-in function name
    Function,
    /// Cell reference
    Variable,
    /// Number, string or boolean literal
    Constant,
}

/// A token borrowed from the formula text
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Source text of the token (string literals keep their quotes)
    pub text: &'a str,
    /// Literal value, present for [`TokenKind::Constant`] only
    pub value: Option<FormulaValue>,
    /// Byte offset of the token in the formula text
    pub position: usize,
}

impl<'a> Token<'a> {
    /// Whether this is the punctuation symbol `symbol`
    pub fn is_symbol(&self, symbol: &str) -> bool {
        self.kind == TokenKind::Symbol && self.text == symbol
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text)
    }
}

const PUNCTUATION: [&str; 3] = ["(", ")", ","];

// Two-character forms first
const OPERATORS: [&str; 14] = [
    "<=", ">=", "<>", "+", "-", "*", "/", "^", "%", "&", ":", "=", "<", ">",
];

/// Lazy token stream over a formula
///
/// Yields `Err` once for the first unrecognized run and then stops.
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    failed: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            failed: false,
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn take(&mut self, kind: TokenKind, len: usize, value: Option<FormulaValue>) -> Token<'a> {
        let input = self.input;
        let position = self.pos;
        let text = &input[position..position + len];
        self.pos += len;
        Token {
            kind,
            text,
            value,
            position,
        }
    }

    fn scan(&mut self) -> FormulaResult<Token<'a>> {
        let input = self.input;
        let rest = &input[self.pos..];

        if let Some(p) = PUNCTUATION.iter().find(|p| rest.starts_with(**p)) {
            return Ok(self.take(TokenKind::Symbol, p.len(), None));
        }

        if let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) {
            return Ok(self.take(TokenKind::Operator, op.len(), None));
        }

        if let Some(m) = regex!(r"^[A-Za-z][A-Za-z0-9]*").find(rest) {
            let anchored = rest[m.end()..].starts_with('$');
            if !anchored && Builtin::from_name(m.as_str()).is_some() {
                return Ok(self.take(TokenKind::Function, m.end(), None));
            }
        }

        if let Some(m) = regex!(r"^\$?[A-Za-z]+\$?[0-9]+").find(rest) {
            return Ok(self.take(TokenKind::Variable, m.end(), None));
        }

        if let Some(m) = regex!(r"^(?i)(TRUE|FALSE)\b").find(rest) {
            let value = m.as_str().eq_ignore_ascii_case("TRUE");
            return Ok(self.take(
                TokenKind::Constant,
                m.end(),
                Some(FormulaValue::Boolean(value)),
            ));
        }

        if let Some(m) = regex!(r#"^"[^"]*""#).find(rest) {
            let inner = &m.as_str()[1..m.end() - 1];
            return Ok(self.take(
                TokenKind::Constant,
                m.end(),
                Some(FormulaValue::Text(inner.to_string())),
            ));
        }

        let numbers: [&Regex; 3] = [
            regex!(r"^[0-9]+(\.[0-9]+)?[eE][+-]?[0-9]+"),
            regex!(r"^[0-9]*\.[0-9]+"),
            regex!(r"^[0-9]+"),
        ];
        for pattern in numbers {
            if let Some(m) = pattern.find(rest) {
                let number: f64 = m.as_str().parse().map_err(|_| self.error())?;
                return Ok(self.take(
                    TokenKind::Constant,
                    m.end(),
                    Some(FormulaValue::Number(number)),
                ));
            }
        }

        Err(self.error())
    }

    fn error(&self) -> FormulaError {
        let rest = &self.input[self.pos..];
        let fragment = rest
            .split(char::is_whitespace)
            .next()
            .unwrap_or(rest)
            .to_string();
        FormulaError::Lex {
            position: self.pos,
            fragment,
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = FormulaResult<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        self.skip_whitespace();
        if self.pos >= self.input.len() {
            return None;
        }

        let token = self.scan();
        match &token {
            Ok(t) => log::trace!("token {:?} '{}' at {}", t.kind, t.text, t.position),
            Err(_) => self.failed = true,
        }
        Some(token)
    }
}

/// Tokenize a whole formula, failing on the first unrecognized input
pub fn tokenize(input: &str) -> FormulaResult<Vec<Token<'_>>> {
    Tokenizer::new(input).collect()
}
