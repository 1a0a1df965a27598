//! Math functions

use super::{domain_error, finite};
use crate::error::{FormulaError, FormulaResult};
use crate::value::FormulaValue;

fn number(args: &[FormulaValue], index: usize, function: &str) -> FormulaResult<f64> {
    args[index].to_number(function)
}

fn unary(args: &[FormulaValue], function: &str, f: fn(f64) -> f64) -> FormulaResult<FormulaValue> {
    finite(function, f(number(args, 0, function)?))
}

/// ABS(number)
pub fn fn_abs(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    unary(args, "ABS", f64::abs)
}

/// COS(radians)
pub fn fn_cos(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    unary(args, "COS", f64::cos)
}

/// SIN(radians)
pub fn fn_sin(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    unary(args, "SIN", f64::sin)
}

/// TAN(radians)
pub fn fn_tan(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    unary(args, "TAN", f64::tan)
}

/// EXP(number)
pub fn fn_exp(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    unary(args, "EXP", f64::exp)
}

/// LOG(number, [base])
///
/// Natural logarithm unless a base is given.
pub fn fn_log(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let n = number(args, 0, "LOG")?;
    if n <= 0.0 {
        return Err(domain_error("LOG", &args[0]));
    }

    match args.get(1) {
        None => finite("LOG", n.ln()),
        Some(base_arg) => {
            let base = base_arg.to_number("LOG")?;
            if base <= 0.0 || base == 1.0 {
                return Err(domain_error("LOG", base_arg));
            }
            finite("LOG", n.ln() / base.ln())
        }
    }
}

/// LOG10(number)
pub fn fn_log10(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let n = number(args, 0, "LOG10")?;
    if n <= 0.0 {
        return Err(domain_error("LOG10", &args[0]));
    }
    finite("LOG10", n.log10())
}

/// PI()
pub fn fn_pi(_args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    Ok(FormulaValue::Number(std::f64::consts::PI))
}

/// CEIL(number)
pub fn fn_ceil(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    unary(args, "CEIL", f64::ceil)
}

/// FLOOR(number)
pub fn fn_floor(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    unary(args, "FLOOR", f64::floor)
}

/// SQRT(number)
pub fn fn_sqrt(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let n = number(args, 0, "SQRT")?;
    if n < 0.0 {
        return Err(domain_error("SQRT", &args[0]));
    }
    finite("SQRT", n.sqrt())
}

/// ROUND(number, [digits])
///
/// Halves round away from zero; negative digits round to the left of the point.
pub fn fn_round(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let n = number(args, 0, "ROUND")?;
    let digits = match args.get(1) {
        Some(arg) => arg.to_number("ROUND")?.trunc() as i32,
        None => 0,
    };

    // Beyond f64 range the scaled value has no digits left to round
    let factor = 10f64.powi(digits.saturating_abs());
    let rounded = if digits >= 0 {
        let scaled = n * factor;
        if scaled.is_finite() {
            scaled.round() / factor
        } else {
            n
        }
    } else if factor.is_finite() {
        (n / factor).round() * factor
    } else {
        0.0
    };
    finite("ROUND", rounded)
}

/// MOD(number, divisor)
///
/// The result takes the sign of the divisor.
pub fn fn_mod(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let n = number(args, 0, "MOD")?;
    let d = number(args, 1, "MOD")?;
    if d == 0.0 {
        return Err(FormulaError::DivisionByZero("MOD".into()));
    }
    finite("MOD", n - d * (n / d).floor())
}

/// INT(number), rounding down
pub fn fn_int(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    unary(args, "INT", f64::floor)
}

/// POWER(base, exponent)
pub fn fn_power(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let base = number(args, 0, "POWER")?;
    let exponent = number(args, 1, "POWER")?;
    finite("POWER", base.powf(exponent))
}
