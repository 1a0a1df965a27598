//! Error types for the gridcalc facade

use gridcalc_formula::FormulaError;
use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by sheet operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A cell name that does not address a cell in the grid
    #[error(transparent)]
    Address(#[from] gridcalc_core::Error),

    /// Tokenizing, parsing or evaluating a formula failed
    #[error(transparent)]
    Formula(#[from] FormulaError),
}

impl Error {
    /// The formula error, if this is one
    pub fn as_formula_error(&self) -> Option<&FormulaError> {
        match self {
            Error::Formula(err) => Some(err),
            Error::Address(_) => None,
        }
    }
}
