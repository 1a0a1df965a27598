//! Prelude module - common imports for gridcalc users
//!
//! ```rust
//! use gridcalc::prelude::*;
//! ```

pub use crate::{
    // Calculation types
    CalculationOptions,
    CalculationStats,
    CellAddress,
    // Cell contents
    CellContent,
    CellRange,
    Environment,

    // Error types
    Error,
    ErrorKind,
    EvaluationOptions,
    FormulaError,
    FormulaValue,
    Result,

    // Main types
    Sheet,
    // Extension traits
    SheetCalculationExt,
};
