//! Built-in functions and operator implementations

pub mod logical;
pub mod math;
pub mod operators;
pub mod statistical;
pub mod text;

use crate::ast::Call;
use crate::error::{FormulaError, FormulaResult};
use crate::value::FormulaValue;
use ahash::AHashMap;
use once_cell::sync::Lazy;
use std::fmt;

/// Function implementation signature
pub type FunctionImpl = fn(&[FormulaValue]) -> FormulaResult<FormulaValue>;

/// Function definition
pub struct FunctionDef {
    /// Function name (uppercase)
    pub name: &'static str,
    /// Minimum arguments
    pub min_args: usize,
    /// Maximum arguments (None = unlimited)
    pub max_args: Option<usize>,
    /// Implementation
    pub implementation: FunctionImpl,
}

/// Reserved built-in function names
///
/// The set is closed: the tokenizer only recognizes these names as functions, so
/// an unknown name never reaches evaluation as a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    // Math
    Abs,
    Cos,
    Sin,
    Tan,
    Exp,
    Log,
    Log10,
    Pi,
    Ceil,
    Floor,
    Sqrt,
    Round,
    Mod,
    Int,
    Power,

    // Aggregates
    Max,
    Min,
    Sum,
    Average,
    Mean,
    Count,

    // Logical
    And,
    Or,
    Not,
    Xor,
    If,

    // Text
    Len,
    Upper,
    Lower,
    Concat,
}

static BY_NAME: Lazy<AHashMap<&'static str, Builtin>> = Lazy::new(|| {
    Builtin::ALL
        .iter()
        .map(|builtin| (builtin.name(), *builtin))
        .collect()
});

impl Builtin {
    pub const ALL: [Builtin; 30] = [
        Builtin::Abs,
        Builtin::Cos,
        Builtin::Sin,
        Builtin::Tan,
        Builtin::Exp,
        Builtin::Log,
        Builtin::Log10,
        Builtin::Pi,
        Builtin::Ceil,
        Builtin::Floor,
        Builtin::Sqrt,
        Builtin::Round,
        Builtin::Mod,
        Builtin::Int,
        Builtin::Power,
        Builtin::Max,
        Builtin::Min,
        Builtin::Sum,
        Builtin::Average,
        Builtin::Mean,
        Builtin::Count,
        Builtin::And,
        Builtin::Or,
        Builtin::Not,
        Builtin::Xor,
        Builtin::If,
        Builtin::Len,
        Builtin::Upper,
        Builtin::Lower,
        Builtin::Concat,
    ];

    /// Look up a function by name, ignoring case
    pub fn from_name(name: &str) -> Option<Builtin> {
        BY_NAME.get(name.to_ascii_uppercase().as_str()).copied()
    }

    pub fn name(self) -> &'static str {
        self.def().name
    }

    /// Definition: name, arity and implementation
    pub fn def(self) -> FunctionDef {
        use Builtin::*;

        let (name, min_args, max_args, implementation): (_, _, _, FunctionImpl) = match self {
            Abs => ("ABS", 1, Some(1), math::fn_abs),
            Cos => ("COS", 1, Some(1), math::fn_cos),
            Sin => ("SIN", 1, Some(1), math::fn_sin),
            Tan => ("TAN", 1, Some(1), math::fn_tan),
            Exp => ("EXP", 1, Some(1), math::fn_exp),
            Log => ("LOG", 1, Some(2), math::fn_log),
            Log10 => ("LOG10", 1, Some(1), math::fn_log10),
            Pi => ("PI", 0, Some(0), math::fn_pi),
            Ceil => ("CEIL", 1, Some(1), math::fn_ceil),
            Floor => ("FLOOR", 1, Some(1), math::fn_floor),
            Sqrt => ("SQRT", 1, Some(1), math::fn_sqrt),
            Round => ("ROUND", 1, Some(2), math::fn_round),
            Mod => ("MOD", 2, Some(2), math::fn_mod),
            Int => ("INT", 1, Some(1), math::fn_int),
            Power => ("POWER", 2, Some(2), math::fn_power),
            Max => ("MAX", 1, None, statistical::fn_max),
            Min => ("MIN", 1, None, statistical::fn_min),
            Sum => ("SUM", 1, None, statistical::fn_sum),
            Average => ("AVERAGE", 1, None, statistical::fn_average),
            Mean => ("MEAN", 1, None, statistical::fn_mean),
            Count => ("COUNT", 1, None, statistical::fn_count),
            And => ("AND", 1, None, logical::fn_and),
            Or => ("OR", 1, None, logical::fn_or),
            Not => ("NOT", 1, Some(1), logical::fn_not),
            Xor => ("XOR", 1, None, logical::fn_xor),
            If => ("IF", 2, Some(3), logical::fn_if),
            Len => ("LEN", 1, Some(1), text::fn_len),
            Upper => ("UPPER", 1, Some(1), text::fn_upper),
            Lower => ("LOWER", 1, Some(1), text::fn_lower),
            Concat => ("CONCAT", 1, None, text::fn_concat),
        };

        FunctionDef {
            name,
            min_args,
            max_args,
            implementation,
        }
    }

    /// Check arity and apply the function to already evaluated arguments
    pub fn call(self, args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
        let def = self.def();
        let too_few = args.len() < def.min_args;
        let too_many = def.max_args.map_or(false, |max| args.len() > max);
        if too_few || too_many {
            return Err(FormulaError::ArgumentCount {
                function: def.name.to_string(),
                expected: expected_arity(def.min_args, def.max_args),
                actual: args.len(),
            });
        }
        (def.implementation)(args)
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Apply an operator or built-in function to evaluated operands
pub fn apply(call: Call, args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    match call {
        Call::Operator(op) => operators::apply(op, args),
        Call::Builtin(builtin) => builtin.call(args),
    }
}

fn expected_arity(min: usize, max: Option<usize>) -> String {
    match max {
        Some(max) if max == min => min.to_string(),
        Some(max) => format!("{} to {}", min, max),
        None => format!("at least {}", min),
    }
}

/// Numbers from aggregate arguments
///
/// Scalar arguments are coerced; list members that are not numbers are skipped.
pub(crate) fn collect_numbers(args: &[FormulaValue], function: &str) -> FormulaResult<Vec<f64>> {
    let mut numbers = Vec::with_capacity(args.len());
    for arg in args {
        match arg {
            FormulaValue::List(items) => numbers.extend(items.iter().filter_map(|item| {
                match item {
                    FormulaValue::Number(n) => Some(*n),
                    _ => None,
                }
            })),
            scalar => numbers.push(scalar.to_number(function)?),
        }
    }
    Ok(numbers)
}

/// Reject infinities and NaN produced by `function`
pub(crate) fn finite(function: &str, n: f64) -> FormulaResult<FormulaValue> {
    if n.is_finite() {
        Ok(FormulaValue::Number(n))
    } else {
        Err(FormulaError::Evaluation(format!(
            "{} produced a non-finite result",
            function
        )))
    }
}

/// Argument outside the domain of `function`
pub(crate) fn domain_error(function: &str, value: &FormulaValue) -> FormulaError {
    FormulaError::Evaluation(format!("{} is undefined for {}", function, value.describe()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case() {
        assert_eq!(Builtin::from_name("sum"), Some(Builtin::Sum));
        assert_eq!(Builtin::from_name("Log10"), Some(Builtin::Log10));
        assert_eq!(Builtin::from_name("VLOOKUP"), None);
        assert_eq!(Builtin::from_name("A1"), None);
    }

    #[test]
    fn test_names_round_trip() {
        for builtin in Builtin::ALL {
            assert_eq!(Builtin::from_name(builtin.name()), Some(builtin));
        }
    }

    #[test]
    fn test_arity_checked_before_dispatch() {
        let err = Builtin::Not.call(&[]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Wrong number of arguments for NOT: expected 1, got 0"
        );

        let err = Builtin::If.call(&[true.into()]).unwrap_err();
        assert!(err.to_string().contains("expected 2 to 3"), "{err}");

        let err = Builtin::Pi.call(&[1.into()]).unwrap_err();
        assert!(err.to_string().contains("expected 0"), "{err}");

        let err = Builtin::Sum.call(&[]).unwrap_err();
        assert!(err.to_string().contains("at least 1"), "{err}");
    }

    #[test]
    fn test_collect_numbers_flattens_lists() {
        let args = [
            FormulaValue::from("2"),
            FormulaValue::List(vec![
                1.into(),
                "x".into(),
                true.into(),
                FormulaValue::empty(),
                3.into(),
            ]),
        ];
        assert_eq!(collect_numbers(&args, "SUM").unwrap(), vec![2.0, 1.0, 3.0]);
        assert!(collect_numbers(&["x".into()], "SUM").is_err());
    }
}
