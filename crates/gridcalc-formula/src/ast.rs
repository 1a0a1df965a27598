//! Formula Abstract Syntax Tree types

use crate::functions::Builtin;
use crate::precedence;
use crate::value::FormulaValue;
use std::fmt;

/// Formula expression AST
///
/// Operators and built-in functions share the `Function` shape: an operation
/// applied to an ordered list of operands.
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaExpr {
    /// Literal value
    Constant(FormulaValue),
    /// Cell reference, as written (anchors included)
    Variable(String),
    /// Operator or built-in function applied to its operands
    Function { call: Call, args: Vec<FormulaExpr> },
    /// Parenthesized sub-expression
    Parentheses(Box<FormulaExpr>),
}

/// What a `Function` node applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Call {
    Operator(Operator),
    Builtin(Builtin),
}

/// Operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    // Reference
    Range,

    // Prefix sign
    Identity,
    Negate,

    // Postfix
    Percent,

    // Arithmetic
    Power,
    Multiply,
    Divide,
    Add,
    Subtract,

    // Text
    Concat,

    // Comparison
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
}

/// Where an operator sits relative to its operands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixity {
    Prefix,
    Infix,
    Postfix,
}

impl Operator {
    /// Operator for a symbol in infix or postfix position
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            ":" => Operator::Range,
            "%" => Operator::Percent,
            "^" => Operator::Power,
            "*" => Operator::Multiply,
            "/" => Operator::Divide,
            "+" => Operator::Add,
            "-" => Operator::Subtract,
            "&" => Operator::Concat,
            "=" => Operator::Equal,
            "<>" => Operator::NotEqual,
            "<" => Operator::LessThan,
            "<=" => Operator::LessEqual,
            ">" => Operator::GreaterThan,
            ">=" => Operator::GreaterEqual,
            _ => return None,
        })
    }

    /// Operator for a sign symbol in prefix position
    pub fn prefix_from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Operator::Identity),
            "-" => Some(Operator::Negate),
            _ => None,
        }
    }

    /// Tag used in node labels and error messages
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Range => ":",
            Operator::Identity => "unary +",
            Operator::Negate => "unary -",
            Operator::Percent => "%",
            Operator::Power => "^",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Concat => "&",
            Operator::Equal => "=",
            Operator::NotEqual => "<>",
            Operator::LessThan => "<",
            Operator::LessEqual => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterEqual => ">=",
        }
    }

    /// Symbol as written in a formula
    pub fn source_text(self) -> &'static str {
        match self {
            Operator::Identity => "+",
            Operator::Negate => "-",
            other => other.symbol(),
        }
    }

    pub fn fixity(self) -> Fixity {
        match self {
            Operator::Identity | Operator::Negate => Fixity::Prefix,
            Operator::Percent => Fixity::Postfix,
            _ => Fixity::Infix,
        }
    }

    pub fn precedence(self) -> u8 {
        precedence::of_operator(self)
    }
}

impl Call {
    /// Display name of the operation
    pub fn name(self) -> &'static str {
        match self {
            Call::Operator(op) => op.symbol(),
            Call::Builtin(builtin) => builtin.name(),
        }
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FormulaExpr {
    /// Build an operator node
    pub fn operator(op: Operator, args: Vec<FormulaExpr>) -> Self {
        FormulaExpr::Function {
            call: Call::Operator(op),
            args,
        }
    }

    /// Build a built-in function call node
    pub fn builtin(builtin: Builtin, args: Vec<FormulaExpr>) -> Self {
        FormulaExpr::Function {
            call: Call::Builtin(builtin),
            args,
        }
    }

    /// Child nodes in order
    pub fn children(&self) -> &[FormulaExpr] {
        match self {
            FormulaExpr::Constant(_) | FormulaExpr::Variable(_) => &[],
            FormulaExpr::Function { args, .. } => args,
            FormulaExpr::Parentheses(inner) => std::slice::from_ref(inner.as_ref()),
        }
    }

    /// Whether every child is already a constant
    pub fn is_terminal(&self) -> bool {
        self.children()
            .iter()
            .all(|child| matches!(child, FormulaExpr::Constant(_)))
    }

    /// Node label: the operator tag, function name, cell name, `(` or the literal
    pub fn label(&self) -> String {
        match self {
            FormulaExpr::Constant(value) => value.to_string(),
            FormulaExpr::Variable(name) => name.clone(),
            FormulaExpr::Function { call, .. } => call.name().to_string(),
            FormulaExpr::Parentheses(_) => "(".to_string(),
        }
    }
}

impl fmt::Display for FormulaExpr {
    /// Fully delimited rendering: operator applications in `[...]`, groups in `(...)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaExpr::Constant(FormulaValue::Text(s)) => write!(f, "\"{}\"", s),
            FormulaExpr::Constant(value) => write!(f, "{}", value),
            FormulaExpr::Variable(name) => f.write_str(name),
            FormulaExpr::Parentheses(inner) => write!(f, "({})", inner),
            FormulaExpr::Function {
                call: Call::Operator(op),
                args,
            } => match (op.fixity(), args.as_slice()) {
                (Fixity::Prefix, [operand]) => {
                    write!(f, "[{}{}]", op.source_text(), operand)
                }
                (Fixity::Postfix, [operand]) => write!(f, "[{}{}]", operand, op.symbol()),
                (Fixity::Infix, [left, right]) => {
                    write!(f, "[{} {} {}]", left, op.symbol(), right)
                }
                _ => write_call(f, op.symbol(), args),
            },
            FormulaExpr::Function {
                call: Call::Builtin(builtin),
                args,
            } => write_call(f, builtin.name(), args),
        }
    }
}

fn write_call(f: &mut fmt::Formatter<'_>, name: &str, args: &[FormulaExpr]) -> fmt::Result {
    write!(f, "{}(", name)?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", arg)?;
    }
    f.write_str(")")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> FormulaExpr {
        FormulaExpr::Constant(FormulaValue::Number(n))
    }

    #[test]
    fn test_terminal_nodes() {
        let sum = FormulaExpr::operator(Operator::Add, vec![num(1.0), num(2.0)]);
        assert!(sum.is_terminal());

        let nested = FormulaExpr::operator(Operator::Multiply, vec![sum.clone(), num(3.0)]);
        assert!(!nested.is_terminal());

        let cell = FormulaExpr::operator(
            Operator::Negate,
            vec![FormulaExpr::Variable("A1".into())],
        );
        assert!(!cell.is_terminal());
        assert!(num(4.0).is_terminal());
    }

    #[test]
    fn test_display() {
        let expr = FormulaExpr::operator(
            Operator::Add,
            vec![
                FormulaExpr::operator(Operator::Negate, vec![num(1.0)]),
                FormulaExpr::Parentheses(Box::new(FormulaExpr::operator(
                    Operator::Percent,
                    vec![FormulaExpr::Variable("$A$1".into())],
                ))),
            ],
        );
        assert_eq!(expr.to_string(), "[[-1] + ([$A$1%])]");

        let call = FormulaExpr::builtin(
            Builtin::If,
            vec![
                FormulaExpr::Constant(FormulaValue::Boolean(true)),
                FormulaExpr::Constant("yes".into()),
                num(0.5),
            ],
        );
        assert_eq!(call.to_string(), "IF(TRUE, \"yes\", 0.5)");
    }

    #[test]
    fn test_labels() {
        assert_eq!(FormulaExpr::operator(Operator::Negate, vec![num(1.0)]).label(), "unary -");
        assert_eq!(FormulaExpr::Parentheses(Box::new(num(1.0))).label(), "(");
        assert_eq!(num(4.0).label(), "4");
    }
}
