//! Sheet-wide calculation
//!
//! Evaluates every formula cell of a [`Sheet`] and reports per-cell results
//! together with summary statistics.
//!
//! # Example
//!
//! ```rust
//! use gridcalc::prelude::*;
//!
//! let mut sheet = Sheet::new();
//! sheet.set_value("A1", 10.0).unwrap();
//! sheet.set_value("A2", 20.0).unwrap();
//! sheet.set_formula("A3", "=A1+A2").unwrap();
//!
//! let calculation = sheet.calculate().unwrap();
//! assert_eq!(calculation.stats.cells_calculated, 1);
//! assert_eq!(calculation.value("A3"), Some(&FormulaValue::Number(30.0)));
//! ```

use crate::{Error, Result, Sheet};
use gridcalc_core::CellAddress;
use gridcalc_formula::{EvaluationOptions, FormulaError, FormulaResult, FormulaValue, Interpreter};

/// Options for sheet calculation
#[derive(Debug, Clone, Default)]
pub struct CalculationOptions {
    /// Limits applied to every formula evaluation
    pub evaluation: EvaluationOptions,
    /// Abort on the first failing cell instead of recording the error
    pub stop_on_error: bool,
}

/// Statistics from a calculation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalculationStats {
    /// Total number of formula cells
    pub formula_count: usize,
    /// Number of formula cells that produced a value
    pub cells_calculated: usize,
    /// Number of formula cells that failed
    pub errors: usize,
    /// Number of failures caused by a circular reference
    pub circular_references: usize,
}

/// Result of calculating a sheet
#[derive(Debug, Clone)]
pub struct Calculation {
    /// Every formula cell with its value or error, in address order
    pub results: Vec<(CellAddress, FormulaResult<FormulaValue>)>,
    pub stats: CalculationStats,
}

impl Calculation {
    /// Calculated value of a formula cell, `None` if it failed or holds no formula
    pub fn value(&self, cell: &str) -> Option<&FormulaValue> {
        self.result(cell)?.as_ref().ok()
    }

    /// Value or error of a formula cell
    pub fn result(&self, cell: &str) -> Option<&FormulaResult<FormulaValue>> {
        let addr = CellAddress::parse(cell).ok()?;
        self.results
            .iter()
            .find(|(a, _)| a.row == addr.row && a.col == addr.col)
            .map(|(_, result)| result)
    }
}

/// Extension trait for Sheet to add calculation methods
pub trait SheetCalculationExt {
    /// Calculate all formulas with default options
    fn calculate(&self) -> Result<Calculation>;

    /// Calculate all formulas with custom options
    fn calculate_with_options(&self, options: &CalculationOptions) -> Result<Calculation>;
}

impl SheetCalculationExt for Sheet {
    fn calculate(&self) -> Result<Calculation> {
        self.calculate_with_options(&CalculationOptions {
            evaluation: self.options().clone(),
            ..CalculationOptions::default()
        })
    }

    fn calculate_with_options(&self, options: &CalculationOptions) -> Result<Calculation> {
        let interpreter = Interpreter::new(self).with_options(options.evaluation.clone());
        let mut stats = CalculationStats::default();
        let mut results = Vec::new();

        for (addr, content) in self.iter() {
            if !content.is_formula() {
                continue;
            }
            stats.formula_count += 1;

            let result = interpreter.evaluate_cell(&addr.key());
            match &result {
                Ok(value) => {
                    log::trace!("{} = {}", addr, value);
                    stats.cells_calculated += 1;
                }
                Err(err) => {
                    if options.stop_on_error {
                        return Err(Error::Formula(err.clone()));
                    }
                    log::warn!("Failed to calculate {}: {}", addr, err);
                    stats.errors += 1;
                    if matches!(err, FormulaError::CircularReference(_)) {
                        stats.circular_references += 1;
                    }
                }
            }
            results.push((addr, result));
        }

        log::debug!(
            "calculated {} of {} formula cells ({} errors)",
            stats.cells_calculated,
            stats.formula_count,
            stats.errors
        );
        Ok(Calculation { results, stats })
    }
}
