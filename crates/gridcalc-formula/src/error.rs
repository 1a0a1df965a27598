//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur during formula tokenizing, parsing or evaluation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// No token pattern matches the input at `position`
    #[error("Lex error at position {position}: unrecognized input '{fragment}'")]
    Lex { position: usize, fragment: String },

    /// Formula parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Formula evaluation error
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// Unknown function or operator
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Wrong number of arguments
    #[error("Wrong number of arguments for {function}: expected {expected}, got {actual}")]
    ArgumentCount {
        function: String,
        expected: String,
        actual: usize,
    },

    /// Operand of the wrong type for an operator or function
    #[error("{operation} cannot accept {operand}")]
    TypeMismatch { operation: String, operand: String },

    /// Division by zero
    #[error("Division by zero in {0}")]
    DivisionByZero(String),

    /// Reference to an invalid cell or range
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// A formula cell was re-entered while it was still being resolved
    #[error("Circular reference detected involving cell {0}")]
    CircularReference(String),
}

/// Pipeline stage an error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Lex,
    Parse,
    Evaluation,
}

impl FormulaError {
    /// Classify the error by the stage that raised it
    pub fn kind(&self) -> ErrorKind {
        match self {
            FormulaError::Lex { .. } => ErrorKind::Lex,
            FormulaError::Parse(_) => ErrorKind::Parse,
            FormulaError::Evaluation(_)
            | FormulaError::UnknownFunction(_)
            | FormulaError::ArgumentCount { .. }
            | FormulaError::TypeMismatch { .. }
            | FormulaError::DivisionByZero(_)
            | FormulaError::InvalidReference(_)
            | FormulaError::CircularReference(_) => ErrorKind::Evaluation,
        }
    }

    pub(crate) fn type_mismatch(operation: impl Into<String>, operand: impl Into<String>) -> Self {
        FormulaError::TypeMismatch {
            operation: operation.into(),
            operand: operand.into(),
        }
    }
}

impl From<gridcalc_core::Error> for FormulaError {
    fn from(err: gridcalc_core::Error) -> Self {
        FormulaError::InvalidReference(err.to_string())
    }
}
