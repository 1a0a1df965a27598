//! Text functions

use crate::error::FormulaResult;
use crate::value::FormulaValue;

/// LEN(text), counted in characters
pub fn fn_len(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let s = args[0].to_text("LEN")?;
    Ok(FormulaValue::Number(s.chars().count() as f64))
}

/// UPPER(text)
pub fn fn_upper(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    Ok(FormulaValue::Text(args[0].to_text("UPPER")?.to_uppercase()))
}

/// LOWER(text)
pub fn fn_lower(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    Ok(FormulaValue::Text(args[0].to_text("LOWER")?.to_lowercase()))
}

/// CONCAT(text1, [text2], ...)
///
/// Ranges contribute each member in order.
pub fn fn_concat(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let mut result = String::new();
    for arg in args {
        match arg {
            FormulaValue::List(items) => {
                for item in items {
                    result.push_str(&item.to_text("CONCAT")?);
                }
            }
            scalar => result.push_str(&scalar.to_text("CONCAT")?),
        }
    }
    Ok(FormulaValue::Text(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_len() {
        assert_eq!(fn_len(&["hello".into()]).unwrap(), 5.into());
        assert_eq!(fn_len(&["héllo".into()]).unwrap(), 5.into());
        assert_eq!(fn_len(&[12.5.into()]).unwrap(), 4.into());
        assert_eq!(fn_len(&[FormulaValue::empty()]).unwrap(), 0.into());
        assert!(fn_len(&[FormulaValue::List(vec![])]).is_err());
    }

    #[test]
    fn test_case() {
        assert_eq!(fn_upper(&["MiXed".into()]).unwrap(), "MIXED".into());
        assert_eq!(fn_lower(&["MiXed".into()]).unwrap(), "mixed".into());
        assert_eq!(fn_upper(&[true.into()]).unwrap(), "TRUE".into());
    }

    #[test]
    fn test_concat() {
        let range = FormulaValue::List(vec!["a".into(), 1.into(), FormulaValue::empty()]);
        assert_eq!(
            fn_concat(&[range, "-".into(), false.into()]).unwrap(),
            "a1-FALSE".into()
        );
    }
}
