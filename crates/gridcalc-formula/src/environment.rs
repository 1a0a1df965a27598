//! Cell lookup capability supplied by the host

use crate::value::FormulaValue;
use ahash::AHashMap;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// What a cell holds: a literal value or formula text to evaluate on demand
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellContent {
    Value(FormulaValue),
    /// Formula text without the leading `=`
    Formula(String),
}

impl CellContent {
    /// Formula content, dropping a leading `=` if present
    pub fn formula(text: impl Into<String>) -> Self {
        let text = text.into();
        match text.strip_prefix('=') {
            Some(stripped) => CellContent::Formula(stripped.to_string()),
            None => CellContent::Formula(text),
        }
    }

    /// Classify raw input the way a user types it into a cell
    ///
    /// `=...` is a formula, `TRUE`/`FALSE` (any case) a boolean, anything that
    /// parses as a number a number, and everything else text.
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.starts_with('=') {
            return CellContent::formula(trimmed);
        }
        if trimmed.eq_ignore_ascii_case("TRUE") {
            return CellContent::Value(FormulaValue::Boolean(true));
        }
        if trimmed.eq_ignore_ascii_case("FALSE") {
            return CellContent::Value(FormulaValue::Boolean(false));
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => CellContent::Value(FormulaValue::Number(n)),
            _ => CellContent::Value(FormulaValue::Text(input.to_string())),
        }
    }

    pub fn is_formula(&self) -> bool {
        matches!(self, CellContent::Formula(_))
    }
}

impl From<FormulaValue> for CellContent {
    fn from(value: FormulaValue) -> Self {
        CellContent::Value(value)
    }
}

impl From<f64> for CellContent {
    fn from(n: f64) -> Self {
        CellContent::Value(FormulaValue::Number(n))
    }
}

impl From<i32> for CellContent {
    fn from(n: i32) -> Self {
        CellContent::Value(FormulaValue::from(n))
    }
}

impl From<bool> for CellContent {
    fn from(b: bool) -> Self {
        CellContent::Value(FormulaValue::Boolean(b))
    }
}

/// Read-only cell lookup
///
/// Names arrive in canonical form (`$` anchors removed, letters upper-cased),
/// so hosts should key their storage the same way. `None` means the cell is
/// empty, which evaluates to empty text rather than an error.
pub trait Environment {
    fn lookup(&self, name: &str) -> Option<CellContent>;
}

impl<S: BuildHasher> Environment for HashMap<String, CellContent, S> {
    fn lookup(&self, name: &str) -> Option<CellContent> {
        self.get(name).cloned()
    }
}

impl Environment for AHashMap<String, CellContent> {
    fn lookup(&self, name: &str) -> Option<CellContent> {
        self.get(name).cloned()
    }
}

impl Environment for BTreeMap<String, CellContent> {
    fn lookup(&self, name: &str) -> Option<CellContent> {
        self.get(name).cloned()
    }
}

impl<E: Environment + ?Sized> Environment for &E {
    fn lookup(&self, name: &str) -> Option<CellContent> {
        (**self).lookup(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_input() {
        assert_eq!(
            CellContent::from_input("=A1 + 1"),
            CellContent::Formula("A1 + 1".into())
        );
        assert_eq!(CellContent::from_input("42"), CellContent::from(42));
        assert_eq!(CellContent::from_input(" 2.5 "), CellContent::from(2.5));
        assert_eq!(CellContent::from_input("true"), CellContent::from(true));
        assert_eq!(
            CellContent::from_input("hello"),
            CellContent::Value("hello".into())
        );
        assert_eq!(CellContent::from_input(""), CellContent::Value(FormulaValue::empty()));
        assert_eq!(
            CellContent::from_input("inf"),
            CellContent::Value("inf".into())
        );
    }

    #[test]
    fn test_formula_strips_single_equals() {
        assert_eq!(CellContent::formula("=1"), CellContent::Formula("1".into()));
        assert_eq!(CellContent::formula("1"), CellContent::Formula("1".into()));
        assert!(CellContent::formula("==1").is_formula());
    }

    #[test]
    fn test_map_environments() {
        let mut std_map = HashMap::new();
        std_map.insert("A1".to_string(), CellContent::from(1));
        assert_eq!(std_map.lookup("A1"), Some(CellContent::from(1)));
        assert_eq!(std_map.lookup("A2"), None);

        let mut fast = AHashMap::new();
        fast.insert("B2".to_string(), CellContent::formula("A1"));
        assert_eq!((&fast).lookup("B2"), Some(CellContent::Formula("A1".into())));

        let ordered: BTreeMap<String, CellContent> =
            [("C3".to_string(), CellContent::from(true))].into_iter().collect();
        assert_eq!(ordered.lookup("C3"), Some(CellContent::from(true)));
    }
}
