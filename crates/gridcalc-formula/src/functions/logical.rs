//! Logical functions
//!
//! Every argument has been evaluated by the time these run; IF, AND and OR do not
//! short-circuit.

use crate::error::FormulaResult;
use crate::value::FormulaValue;

/// Booleans from logical arguments; text members of ranges are skipped
fn collect_bools(args: &[FormulaValue], function: &str) -> FormulaResult<Vec<bool>> {
    let mut bools = Vec::with_capacity(args.len());
    for arg in args {
        match arg {
            FormulaValue::List(items) => {
                for item in items {
                    if !matches!(item, FormulaValue::Text(_)) {
                        bools.push(item.to_bool(function)?);
                    }
                }
            }
            scalar => bools.push(scalar.to_bool(function)?),
        }
    }
    Ok(bools)
}

/// IF(condition, value_if_true, [value_if_false])
pub fn fn_if(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    if args[0].to_bool("IF")? {
        Ok(args[1].clone())
    } else {
        Ok(args.get(2).cloned().unwrap_or(FormulaValue::Boolean(false)))
    }
}

/// AND(logical1, [logical2], ...)
pub fn fn_and(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let bools = collect_bools(args, "AND")?;
    Ok(FormulaValue::Boolean(bools.into_iter().all(|b| b)))
}

/// OR(logical1, [logical2], ...)
pub fn fn_or(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let bools = collect_bools(args, "OR")?;
    Ok(FormulaValue::Boolean(bools.into_iter().any(|b| b)))
}

/// XOR(logical1, [logical2], ...), true when an odd number of arguments are true
pub fn fn_xor(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let bools = collect_bools(args, "XOR")?;
    Ok(FormulaValue::Boolean(bools.into_iter().filter(|b| *b).count() % 2 == 1))
}

/// NOT(logical)
pub fn fn_not(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    Ok(FormulaValue::Boolean(!args[0].to_bool("NOT")?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_if() {
        assert_eq!(fn_if(&[true.into(), "foo".into(), "bar".into()]).unwrap(), "foo".into());
        assert_eq!(fn_if(&[0.into(), "foo".into(), "bar".into()]).unwrap(), "bar".into());
        assert_eq!(fn_if(&[false.into(), 1.into()]).unwrap(), false.into());
        assert_eq!(fn_if(&[FormulaValue::empty(), 1.into(), 2.into()]).unwrap(), 2.into());

        let err = fn_if(&["maybe".into(), 1.into(), 2.into()]).unwrap_err();
        assert_eq!(err.to_string(), "IF cannot accept text \"maybe\"");
    }

    #[test]
    fn test_and_or() {
        assert_eq!(fn_and(&[true.into(), 1.into()]).unwrap(), true.into());
        assert_eq!(fn_and(&[true.into(), 0.into()]).unwrap(), false.into());
        assert_eq!(fn_or(&[false.into(), 0.into()]).unwrap(), false.into());
        assert_eq!(fn_or(&[false.into(), "TRUE".into()]).unwrap(), true.into());

        let range = FormulaValue::List(vec![true.into(), "note".into(), 1.into()]);
        assert_eq!(fn_and(&[range]).unwrap(), true.into());
    }

    #[test]
    fn test_xor_not() {
        assert_eq!(fn_xor(&[true.into(), true.into()]).unwrap(), false.into());
        assert_eq!(fn_xor(&[true.into(), false.into(), true.into(), true.into()]).unwrap(), true.into());
        assert_eq!(fn_not(&[false.into()]).unwrap(), true.into());
        assert_eq!(fn_not(&[2.into()]).unwrap(), false.into());
        assert!(fn_not(&[FormulaValue::List(vec![])]).is_err());
    }
}
