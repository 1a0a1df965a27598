//! # gridcalc-formula
//!
//! Formula tokenizer, parser and evaluator for gridcalc.
//!
//! This crate provides:
//! - Tokenizing (text → typed tokens)
//! - Precedence-correct parsing (tokens → AST)
//! - Evaluation against a host-supplied [`Environment`] (AST → value), with
//!   formula cells resolved on demand
//! - Built-in spreadsheet functions
//!
//! ## Example
//!
//! ```rust
//! use gridcalc_formula::{evaluate, CellContent, FormulaValue};
//! use std::collections::HashMap;
//!
//! let mut cells: HashMap<String, CellContent> = HashMap::new();
//! cells.insert("A1".into(), CellContent::from(4));
//!
//! let value = evaluate("=IF(A1 > 3, \"big\", \"small\")", &cells).unwrap();
//! assert_eq!(value, FormulaValue::from("big"));
//! ```

pub mod ast;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod group;
pub mod lexer;
pub mod parser;
pub mod precedence;
pub mod value;

pub use ast::{Call, Fixity, FormulaExpr, Operator};
pub use environment::{CellContent, Environment};
pub use error::{ErrorKind, FormulaError, FormulaResult};
pub use evaluator::{evaluate, evaluate_with_options, EvaluationOptions, Interpreter};
pub use functions::Builtin;
pub use lexer::{tokenize, Token, TokenKind, Tokenizer};
pub use parser::{parse_formula, parse_tokens, FormulaParser};
pub use value::FormulaValue;
