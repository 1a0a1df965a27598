//! In-memory grid of cells

use crate::error::Result;
use gridcalc_core::CellAddress;
use gridcalc_formula::{
    evaluate_with_options, CellContent, Environment, EvaluationOptions, FormulaValue, Interpreter,
};
use std::collections::BTreeMap;

/// A single grid of cells that formulas evaluate against
///
/// Cells are stored in row-major address order (A1, B1, ..., A2, B2, ...).
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    cells: BTreeMap<(u32, u16), CellContent>,
    options: EvaluationOptions,
}

impl Sheet {
    /// Create an empty sheet
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the evaluation options used by [`Sheet::evaluate`] and [`Sheet::evaluate_cell`]
    pub fn with_options(mut self, options: EvaluationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &EvaluationOptions {
        &self.options
    }

    /// Set a literal value
    pub fn set_value(&mut self, cell: &str, value: impl Into<FormulaValue>) -> Result<()> {
        self.set(cell, CellContent::Value(value.into()))
    }

    /// Set a formula; the leading `=` is optional
    ///
    /// The text is stored as given and parsed when the cell is evaluated.
    pub fn set_formula(&mut self, cell: &str, formula: &str) -> Result<()> {
        self.set(cell, CellContent::formula(formula))
    }

    /// Set raw input, classified like typed cell input
    pub fn set_input(&mut self, cell: &str, input: &str) -> Result<()> {
        self.set(cell, CellContent::from_input(input))
    }

    /// Set cell content
    pub fn set(&mut self, cell: &str, content: CellContent) -> Result<()> {
        let addr = CellAddress::parse(cell)?;
        self.cells.insert((addr.row, addr.col), content);
        Ok(())
    }

    /// Content of a cell, `None` if empty
    pub fn get(&self, cell: &str) -> Result<Option<&CellContent>> {
        let addr = CellAddress::parse(cell)?;
        Ok(self.cells.get(&(addr.row, addr.col)))
    }

    /// Empty a cell, returning what it held
    pub fn clear(&mut self, cell: &str) -> Result<Option<CellContent>> {
        let addr = CellAddress::parse(cell)?;
        Ok(self.cells.remove(&(addr.row, addr.col)))
    }

    /// Number of non-empty cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Non-empty cells in address order
    pub fn iter(&self) -> impl Iterator<Item = (CellAddress, &CellContent)> + '_ {
        self.cells
            .iter()
            .map(|((row, col), content)| (CellAddress::new(*row, *col), content))
    }

    /// Evaluate a formula against this sheet
    pub fn evaluate(&self, formula: &str) -> Result<FormulaValue> {
        Ok(evaluate_with_options(formula, self, &self.options)?)
    }

    /// Value of a cell, evaluating it if it holds a formula
    pub fn evaluate_cell(&self, cell: &str) -> Result<FormulaValue> {
        let addr = CellAddress::parse(cell)?;
        let value = Interpreter::new(self)
            .with_options(self.options.clone())
            .evaluate_cell(&addr.key())?;
        Ok(value)
    }
}

impl Environment for Sheet {
    fn lookup(&self, name: &str) -> Option<CellContent> {
        let addr = CellAddress::parse(name).ok()?;
        self.cells.get(&(addr.row, addr.col)).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_and_get() {
        let mut sheet = Sheet::new();
        sheet.set_value("A1", 10.0).unwrap();
        sheet.set_formula("$b$2", "=A1 * 2").unwrap();
        sheet.set_input("C3", "hello").unwrap();

        assert_eq!(sheet.len(), 3);
        assert_eq!(sheet.get("A1").unwrap(), Some(&CellContent::from(10.0)));
        assert_eq!(
            sheet.get("B2").unwrap(),
            Some(&CellContent::Formula("A1 * 2".into()))
        );
        assert_eq!(sheet.get("D4").unwrap(), None);
        assert!(sheet.set_value("A0", 1).is_err());
        assert!(sheet.get("1A").is_err());
    }

    #[test]
    fn test_clear() {
        let mut sheet = Sheet::new();
        sheet.set_value("A1", true).unwrap();
        assert_eq!(sheet.clear("A1").unwrap(), Some(CellContent::from(true)));
        assert_eq!(sheet.clear("A1").unwrap(), None);
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_iter_in_address_order() {
        let mut sheet = Sheet::new();
        for name in ["B2", "A2", "B1", "A1"] {
            sheet.set_value(name, 0).unwrap();
        }
        let names: Vec<String> = sheet.iter().map(|(addr, _)| addr.to_string()).collect();
        assert_eq!(names, vec!["A1", "B1", "A2", "B2"]);
    }

    #[test]
    fn test_evaluate() {
        let mut sheet = Sheet::new();
        sheet.set_value("A1", 2).unwrap();
        sheet.set_formula("A2", "A1 ^ 3").unwrap();

        assert_eq!(sheet.evaluate("A2 + 1").unwrap(), FormulaValue::Number(9.0));
        assert_eq!(sheet.evaluate_cell("a2").unwrap(), FormulaValue::Number(8.0));
        assert_eq!(sheet.evaluate_cell("Z9").unwrap(), FormulaValue::empty());
        assert!(sheet.evaluate("1 +").is_err());
    }

    #[test]
    fn test_lookup_uses_canonical_names() {
        let mut sheet = Sheet::new();
        sheet.set_value("AB12", "x").unwrap();
        assert_eq!(sheet.lookup("AB12"), Some(CellContent::Value("x".into())));
        assert_eq!(sheet.lookup("not a cell"), None);
    }
}
