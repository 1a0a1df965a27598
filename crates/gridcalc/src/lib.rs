//! # gridcalc
//!
//! A spreadsheet formula engine.
//!
//! Formulas are tokenized, parsed into a precedence-correct tree and evaluated
//! against named cells. Cells holding formulas are evaluated on demand when
//! another formula references them.
//!
//! ## Features
//!
//! - Arithmetic, comparison, concatenation, percent and sign operators
//! - Two-dimensional ranges (`A1:B10`) feeding aggregate functions
//! - Built-in math, logical, aggregate and text functions
//! - Circular reference detection
//! - Sheet-wide calculation with statistics
//!
//! ## Example
//!
//! ```rust
//! use gridcalc::prelude::*;
//!
//! let mut sheet = Sheet::new();
//! sheet.set_value("A1", 10.0).unwrap();
//! sheet.set_value("A2", 32.0).unwrap();
//! sheet.set_formula("A3", "=SUM(A1:A2) / 2").unwrap();
//!
//! assert_eq!(sheet.evaluate_cell("A3").unwrap(), FormulaValue::Number(21.0));
//! assert_eq!(sheet.evaluate("A3 & \"!\"").unwrap(), FormulaValue::from("21!"));
//! ```

pub mod calculation;
pub mod error;
pub mod prelude;
pub mod sheet;

pub use calculation::{Calculation, CalculationOptions, CalculationStats, SheetCalculationExt};
pub use error::{Error, Result};
pub use sheet::Sheet;

// Re-export core types
pub use gridcalc_core::{canonical_name, expand_range, CellAddress, CellRange, MAX_COLS, MAX_ROWS};

// Re-export formula types
pub use gridcalc_formula::{
    evaluate, evaluate_with_options, parse_formula, tokenize, CellContent, Environment, ErrorKind,
    EvaluationOptions, FormulaError, FormulaExpr, FormulaResult, FormulaValue, Interpreter,
};
