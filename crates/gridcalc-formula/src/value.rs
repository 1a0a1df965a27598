//! Values produced and consumed during evaluation

use crate::error::{FormulaError, FormulaResult};
use std::cmp::Ordering;
use std::fmt;

/// Value types during formula evaluation
///
/// `List` only ever comes out of the range operator; aggregate functions flatten
/// it, every other operation rejects it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormulaValue {
    Number(f64),
    Text(String),
    Boolean(bool),
    List(Vec<FormulaValue>),
}

impl FormulaValue {
    /// The value of a cell nobody has written to
    pub fn empty() -> Self {
        FormulaValue::Text(String::new())
    }

    /// Whether this is the empty-cell value
    pub fn is_empty(&self) -> bool {
        matches!(self, FormulaValue::Text(s) if s.is_empty())
    }

    /// Convert to number, if possible
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FormulaValue::Number(n) => Some(*n),
            FormulaValue::Boolean(true) => Some(1.0),
            FormulaValue::Boolean(false) => Some(0.0),
            FormulaValue::Text(s) if s.trim().is_empty() => Some(0.0),
            FormulaValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            FormulaValue::List(_) => None,
        }
    }

    /// Force conversion to number on behalf of `operation`
    pub fn to_number(&self, operation: &str) -> FormulaResult<f64> {
        self.as_number()
            .ok_or_else(|| FormulaError::type_mismatch(operation, self.describe()))
    }

    /// Convert to boolean, if possible
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FormulaValue::Boolean(b) => Some(*b),
            FormulaValue::Number(n) => Some(*n != 0.0),
            FormulaValue::Text(s) => {
                let s = s.trim();
                if s.is_empty() || s.eq_ignore_ascii_case("FALSE") {
                    Some(false)
                } else if s.eq_ignore_ascii_case("TRUE") {
                    Some(true)
                } else {
                    None
                }
            }
            FormulaValue::List(_) => None,
        }
    }

    /// Force conversion to boolean on behalf of `operation`
    pub fn to_bool(&self, operation: &str) -> FormulaResult<bool> {
        self.as_bool()
            .ok_or_else(|| FormulaError::type_mismatch(operation, self.describe()))
    }

    /// Convert to text on behalf of `operation`; lists have no text form
    pub fn to_text(&self, operation: &str) -> FormulaResult<String> {
        match self {
            FormulaValue::List(_) => Err(FormulaError::type_mismatch(operation, self.describe())),
            other => Ok(other.to_string()),
        }
    }

    /// Short description used in error messages
    pub fn describe(&self) -> String {
        match self {
            FormulaValue::Number(_) => format!("number {}", self),
            FormulaValue::Text(s) if s.is_empty() => "an empty cell".to_string(),
            FormulaValue::Text(s) => format!("text \"{}\"", s),
            FormulaValue::Boolean(_) => format!("boolean {}", self),
            FormulaValue::List(items) => format!("a range of {} values", items.len()),
        }
    }

    /// Spreadsheet ordering of two scalars on behalf of `operation`
    ///
    /// Numbers compare numerically and texts case-insensitively. Across types the
    /// order is number < text < boolean, except that the empty value compares as
    /// 0 against numbers and as FALSE against booleans.
    pub fn compare(&self, other: &FormulaValue, operation: &str) -> FormulaResult<Ordering> {
        use FormulaValue::*;

        let (left, right) = match (self, other) {
            (List(_), _) => return Err(FormulaError::type_mismatch(operation, self.describe())),
            (_, List(_)) => return Err(FormulaError::type_mismatch(operation, other.describe())),
            (l, r) => (l.blank_as(r), r.blank_as(l)),
        };

        Ok(match (&left, &right) {
            (Number(l), Number(r)) => l.partial_cmp(r).unwrap_or(Ordering::Equal),
            (Text(l), Text(r)) => l.to_lowercase().cmp(&r.to_lowercase()),
            (Boolean(l), Boolean(r)) => l.cmp(r),
            (Number(_), _) => Ordering::Less,
            (_, Number(_)) => Ordering::Greater,
            (Text(_), _) => Ordering::Less,
            (_, Text(_)) => Ordering::Greater,
            _ => Ordering::Equal,
        })
    }

    /// Stand-in for the empty value when compared against `other`
    fn blank_as(&self, other: &FormulaValue) -> FormulaValue {
        match other {
            FormulaValue::Number(_) if self.is_empty() => FormulaValue::Number(0.0),
            FormulaValue::Boolean(_) if self.is_empty() => FormulaValue::Boolean(false),
            _ => self.clone(),
        }
    }
}

impl fmt::Display for FormulaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaValue::Number(n) => {
                // No trailing ".0" for integral values
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            FormulaValue::Text(s) => f.write_str(s),
            FormulaValue::Boolean(true) => f.write_str("TRUE"),
            FormulaValue::Boolean(false) => f.write_str("FALSE"),
            FormulaValue::List(items) => {
                f.write_str("{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<f64> for FormulaValue {
    fn from(n: f64) -> Self {
        FormulaValue::Number(n)
    }
}

impl From<i32> for FormulaValue {
    fn from(n: i32) -> Self {
        FormulaValue::Number(n as f64)
    }
}

impl From<bool> for FormulaValue {
    fn from(b: bool) -> Self {
        FormulaValue::Boolean(b)
    }
}

impl From<&str> for FormulaValue {
    fn from(s: &str) -> Self {
        FormulaValue::Text(s.to_string())
    }
}

impl From<String> for FormulaValue {
    fn from(s: String) -> Self {
        FormulaValue::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_coercion() {
        assert_eq!(FormulaValue::Number(2.5).as_number(), Some(2.5));
        assert_eq!(FormulaValue::Boolean(true).as_number(), Some(1.0));
        assert_eq!(FormulaValue::empty().as_number(), Some(0.0));
        assert_eq!(FormulaValue::from(" 42 ").as_number(), Some(42.0));
        assert_eq!(FormulaValue::from("abc").as_number(), None);
        assert_eq!(FormulaValue::from("inf").as_number(), None);

        let err = FormulaValue::from("abc").to_number("+").unwrap_err();
        assert_eq!(err.to_string(), "+ cannot accept text \"abc\"");
    }

    #[test]
    fn test_bool_coercion() {
        assert_eq!(FormulaValue::Number(0.0).as_bool(), Some(false));
        assert_eq!(FormulaValue::Number(-1.0).as_bool(), Some(true));
        assert_eq!(FormulaValue::from("true").as_bool(), Some(true));
        assert_eq!(FormulaValue::empty().as_bool(), Some(false));
        assert_eq!(FormulaValue::from("yes").as_bool(), None);
        assert!(FormulaValue::List(vec![]).to_bool("NOT").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(FormulaValue::Number(3.0).to_string(), "3");
        assert_eq!(FormulaValue::Number(-0.5).to_string(), "-0.5");
        assert_eq!(FormulaValue::Number(30.14).to_string(), "30.14");
        assert_eq!(FormulaValue::Boolean(false).to_string(), "FALSE");
        assert_eq!(
            FormulaValue::List(vec![1.into(), "a".into()]).to_string(),
            "{1, a}"
        );
    }

    #[test]
    fn test_compare() {
        let cmp = |a: FormulaValue, b: FormulaValue| a.compare(&b, "=").unwrap();

        assert_eq!(cmp(1.into(), 2.into()), Ordering::Less);
        assert_eq!(cmp("ABC".into(), "abc".into()), Ordering::Equal);
        assert_eq!(cmp(false.into(), true.into()), Ordering::Less);
        assert_eq!(cmp(100.into(), "a".into()), Ordering::Less);
        assert_eq!(cmp("a".into(), true.into()), Ordering::Less);
        assert_eq!(cmp(FormulaValue::empty(), 0.into()), Ordering::Equal);
        assert_eq!(cmp(FormulaValue::empty(), false.into()), Ordering::Equal);
        assert_eq!(cmp(FormulaValue::empty(), "".into()), Ordering::Equal);

        assert!(FormulaValue::List(vec![])
            .compare(&1.into(), "<")
            .is_err());
    }
}
