//! Aggregate functions
//!
//! All of these accept scalars and ranges alike. Ranges are flattened and their
//! non-numeric members skipped.

use super::collect_numbers;
use crate::error::{FormulaError, FormulaResult};
use crate::value::FormulaValue;

/// SUM(number1, [number2], ...)
pub fn fn_sum(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let numbers = collect_numbers(args, "SUM")?;
    Ok(FormulaValue::Number(numbers.iter().sum()))
}

/// MIN(number1, [number2], ...), 0 when nothing numeric was given
pub fn fn_min(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let numbers = collect_numbers(args, "MIN")?;
    let min = numbers.into_iter().reduce(f64::min).unwrap_or(0.0);
    Ok(FormulaValue::Number(min))
}

/// MAX(number1, [number2], ...), 0 when nothing numeric was given
pub fn fn_max(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let numbers = collect_numbers(args, "MAX")?;
    let max = numbers.into_iter().reduce(f64::max).unwrap_or(0.0);
    Ok(FormulaValue::Number(max))
}

fn average(args: &[FormulaValue], function: &str) -> FormulaResult<FormulaValue> {
    let numbers = collect_numbers(args, function)?;
    if numbers.is_empty() {
        return Err(FormulaError::DivisionByZero(function.to_string()));
    }
    Ok(FormulaValue::Number(
        numbers.iter().sum::<f64>() / numbers.len() as f64,
    ))
}

/// AVERAGE(number1, [number2], ...)
pub fn fn_average(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    average(args, "AVERAGE")
}

/// MEAN, alias of AVERAGE
pub fn fn_mean(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    average(args, "MEAN")
}

/// COUNT(value1, [value2], ...)
///
/// Counts numbers: scalars that coerce to one, and numeric range members.
pub fn fn_count(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let count = args
        .iter()
        .map(|arg| match arg {
            FormulaValue::List(items) => items
                .iter()
                .filter(|item| matches!(item, FormulaValue::Number(_)))
                .count(),
            scalar if scalar.is_empty() => 0,
            scalar => usize::from(scalar.as_number().is_some()),
        })
        .sum::<usize>();
    Ok(FormulaValue::Number(count as f64))
}
