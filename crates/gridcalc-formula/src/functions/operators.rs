//! Operator implementations

use super::finite;
use crate::ast::{Fixity, Operator};
use crate::error::{FormulaError, FormulaResult};
use crate::value::FormulaValue;
use std::cmp::Ordering;

/// Apply `op` to evaluated operands
///
/// The range operator is resolved by the interpreter before operands are
/// evaluated and never reaches this function.
pub fn apply(op: Operator, args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let symbol = op.symbol();
    match (op, args) {
        (Operator::Identity, [operand]) => Ok(FormulaValue::Number(operand.to_number(symbol)?)),
        (Operator::Negate, [operand]) => Ok(FormulaValue::Number(-operand.to_number(symbol)?)),
        (Operator::Percent, [operand]) => {
            Ok(FormulaValue::Number(operand.to_number(symbol)? / 100.0))
        }
        (Operator::Concat, [left, right]) => {
            let mut text = left.to_text(symbol)?;
            text.push_str(&right.to_text(symbol)?);
            Ok(FormulaValue::Text(text))
        }
        (Operator::Range, _) => Err(FormulaError::Evaluation(format!(
            "{} must be applied to cell references",
            symbol
        ))),
        (_, [left, right]) if is_comparison(op) => {
            let ordering = left.compare(right, symbol)?;
            Ok(FormulaValue::Boolean(compare(op, ordering)))
        }
        (_, [left, right]) => {
            let l = left.to_number(symbol)?;
            let r = right.to_number(symbol)?;
            arithmetic(op, l, r)
        }
        _ => Err(FormulaError::ArgumentCount {
            function: symbol.to_string(),
            expected: match op.fixity() {
                Fixity::Infix => "2".to_string(),
                _ => "1".to_string(),
            },
            actual: args.len(),
        }),
    }
}

fn is_comparison(op: Operator) -> bool {
    matches!(
        op,
        Operator::Equal
            | Operator::NotEqual
            | Operator::LessThan
            | Operator::LessEqual
            | Operator::GreaterThan
            | Operator::GreaterEqual
    )
}

fn compare(op: Operator, ordering: Ordering) -> bool {
    match op {
        Operator::Equal => ordering == Ordering::Equal,
        Operator::NotEqual => ordering != Ordering::Equal,
        Operator::LessThan => ordering == Ordering::Less,
        Operator::LessEqual => ordering != Ordering::Greater,
        Operator::GreaterThan => ordering == Ordering::Greater,
        _ => ordering != Ordering::Less,
    }
}

fn arithmetic(op: Operator, l: f64, r: f64) -> FormulaResult<FormulaValue> {
    let symbol = op.symbol();
    match op {
        Operator::Add => finite(symbol, l + r),
        Operator::Subtract => finite(symbol, l - r),
        Operator::Multiply => finite(symbol, l * r),
        Operator::Divide if r == 0.0 => Err(FormulaError::DivisionByZero(symbol.to_string())),
        Operator::Divide => finite(symbol, l / r),
        Operator::Power => finite(symbol, l.powf(r)),
        _ => Err(FormulaError::UnknownFunction(symbol.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn binary(
        op: Operator,
        l: impl Into<FormulaValue>,
        r: impl Into<FormulaValue>,
    ) -> FormulaResult<FormulaValue> {
        apply(op, &[l.into(), r.into()])
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(binary(Operator::Add, 2, 3).unwrap(), 5.into());
        assert_eq!(binary(Operator::Subtract, 2, 3).unwrap(), (-1).into());
        assert_eq!(binary(Operator::Multiply, "4", true).unwrap(), 4.into());
        assert_eq!(binary(Operator::Divide, 8, 4).unwrap(), 2.into());
        assert_eq!(binary(Operator::Power, 2, 3).unwrap(), 8.into());
        assert_eq!(binary(Operator::Add, FormulaValue::empty(), 1).unwrap(), 1.into());
    }

    #[test]
    fn test_arithmetic_errors() {
        assert_eq!(
            binary(Operator::Divide, 1, 0).unwrap_err(),
            FormulaError::DivisionByZero("/".into())
        );
        assert_eq!(
            binary(Operator::Add, 1, "foo").unwrap_err().to_string(),
            "+ cannot accept text \"foo\""
        );
        assert!(binary(Operator::Power, -8, 0.5).is_err());
        assert!(apply(Operator::Add, &[FormulaValue::List(vec![]), 1.into()]).is_err());
    }

    #[test]
    fn test_unary() {
        assert_eq!(apply(Operator::Negate, &[3.into()]).unwrap(), (-3).into());
        assert_eq!(apply(Operator::Identity, &["3".into()]).unwrap(), 3.into());
        assert_eq!(apply(Operator::Percent, &[20.into()]).unwrap(), 0.2.into());
        assert_eq!(
            apply(Operator::Negate, &["x".into()]).unwrap_err().to_string(),
            "unary - cannot accept text \"x\""
        );
    }

    #[test]
    fn test_comparison() {
        assert_eq!(binary(Operator::LessEqual, 1, 1).unwrap(), true.into());
        assert_eq!(binary(Operator::NotEqual, "a", "A").unwrap(), false.into());
        assert_eq!(binary(Operator::GreaterThan, "b", 5).unwrap(), true.into());
        assert_eq!(binary(Operator::GreaterEqual, 1, 2).unwrap(), false.into());
        assert_eq!(binary(Operator::Equal, FormulaValue::empty(), 0).unwrap(), true.into());
    }

    #[test]
    fn test_concat() {
        assert_eq!(binary(Operator::Concat, "a", 1).unwrap(), "a1".into());
        assert_eq!(binary(Operator::Concat, 1.5, true).unwrap(), "1.5TRUE".into());
    }

    #[test]
    fn test_wrong_operand_count() {
        assert!(apply(Operator::Add, &[1.into()]).is_err());
        assert!(apply(Operator::Negate, &[1.into(), 2.into()]).is_err());
        assert!(apply(Operator::Range, &["A1".into(), "A2".into()]).is_err());
    }
}
