//! Formula parser
//!
//! Consumes the token sequence left to right in a single pass. Operands and the
//! binary operators between them are collected as they appear; the chain is then
//! folded from the right, and each fold step restores precedence by grafting the
//! new node into the leftmost spine of the subtree already built to its right:
//!
//! ```text
//! 1 ^ 2 * 3 + 4      fold  3 + 4        ->  [3 + 4]
//!                    fold  2 * [3 + 4]  ->  [[2 * 3] + 4]
//!                    fold  1 ^ [...]    ->  [[[1 ^ 2] * 3] + 4]
//! ```
//!
//! Descending into an operator node on that spine happens while the new operator
//! binds at least as tightly, which also makes equal-precedence operators
//! associate to the left. Subtraction becomes addition of the negated right
//! operand, so `-` and `+` share one precedence class.

use crate::ast::{Call, Fixity, FormulaExpr, Operator};
use crate::error::{FormulaError, FormulaResult};
use crate::functions::Builtin;
use crate::group::{enclosed_run, split_arguments};
use crate::lexer::{tokenize, Token, TokenKind};
use crate::precedence;

/// Default limit on nested parentheses and function calls
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 256;

/// Parse formula text into an AST
///
/// A single leading `=` is accepted and ignored.
///
/// # Example
/// ```rust
/// use gridcalc_formula::parse_formula;
///
/// let ast = parse_formula("1 + 2 * 3").unwrap();
/// assert_eq!(ast.to_string(), "[1 + [2 * 3]]");
///
/// let ast = parse_formula("=SUM(A1:A10)").unwrap();
/// assert_eq!(ast.to_string(), "SUM([A1 : A10])");
/// ```
pub fn parse_formula(formula: &str) -> FormulaResult<FormulaExpr> {
    parse_formula_with_depth(formula, DEFAULT_MAX_NESTING_DEPTH)
}

pub(crate) fn parse_formula_with_depth(
    formula: &str,
    max_depth: usize,
) -> FormulaResult<FormulaExpr> {
    let formula = formula.trim();
    let formula = formula.strip_prefix('=').unwrap_or(formula);
    let tokens = tokenize(formula)?;
    FormulaParser::new(&tokens).with_max_depth(max_depth).parse()
}

/// Parse an already tokenized formula
pub fn parse_tokens(tokens: &[Token<'_>]) -> FormulaResult<FormulaExpr> {
    FormulaParser::new(tokens).parse()
}

/// Parser over a complete token sequence
pub struct FormulaParser<'t, 'a> {
    tokens: &'t [Token<'a>],
    max_depth: usize,
}

impl<'t, 'a> FormulaParser<'t, 'a> {
    pub fn new(tokens: &'t [Token<'a>]) -> Self {
        Self {
            tokens,
            max_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }

    /// Limit how deeply parentheses and function calls may nest
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse the whole token sequence into one expression
    pub fn parse(&self) -> FormulaResult<FormulaExpr> {
        if self.tokens.is_empty() {
            return Err(FormulaError::Parse("empty formula".into()));
        }
        let expr = self.parse_run(self.tokens, 0)?;
        log::trace!("parsed {} tokens into {}", self.tokens.len(), expr);
        Ok(expr)
    }

    // === Runs ===

    fn parse_run(&self, run: &[Token<'a>], depth: usize) -> FormulaResult<FormulaExpr> {
        let mut pending: Vec<(FormulaExpr, Operator, u8)> = Vec::new();
        let mut acc: Option<FormulaExpr> = None;
        let mut index = 0;

        while index < run.len() {
            let token = &run[index];

            if let Some((operand, next)) = self.primary(run, index, depth)? {
                if acc.is_some() {
                    return Err(unexpected(token));
                }
                acc = Some(operand);
                index = next;
                continue;
            }

            if token.kind != TokenKind::Operator {
                return Err(unexpected(token));
            }

            match acc.take() {
                None => {
                    let (operand, next) = self.prefixed(run, index, depth)?;
                    acc = Some(operand);
                    index = next;
                }
                Some(left) if token.text == "%" => {
                    acc = Some(FormulaExpr::operator(Operator::Percent, vec![left]));
                    index += 1;
                }
                Some(left) => {
                    let op = Operator::from_symbol(token.text).ok_or_else(|| unexpected(token))?;
                    pending.push((left, op, precedence::of_token(token)));
                    index += 1;
                }
            }
        }

        let mut right = match (acc, pending.last()) {
            (Some(expr), _) => expr,
            (None, Some((_, op, _))) => {
                return Err(FormulaError::Parse(format!(
                    "operator '{}' is missing its right operand",
                    op.source_text()
                )))
            }
            (None, None) => return Err(FormulaError::Parse("empty expression".into())),
        };

        while let Some((left, op, strength)) = pending.pop() {
            right = combine(left, op, strength, right);
        }
        Ok(right)
    }

    /// Operand starting at `index`: literal, cell, function call or group
    ///
    /// Returns `None` when the token there cannot start an operand.
    fn primary(
        &self,
        run: &[Token<'a>],
        index: usize,
        depth: usize,
    ) -> FormulaResult<Option<(FormulaExpr, usize)>> {
        let token = &run[index];
        let parsed = match token.kind {
            TokenKind::Constant => {
                let value = token.value.clone().ok_or_else(|| unexpected(token))?;
                (FormulaExpr::Constant(value), index + 1)
            }
            TokenKind::Variable => (FormulaExpr::Variable(token.text.to_string()), index + 1),
            TokenKind::Function => self.call(run, index, depth)?,
            TokenKind::Symbol if token.text == "(" => {
                let depth = self.nested(depth, token)?;
                let (inner, next) = enclosed_run(run, index)?;
                if inner.is_empty() {
                    return Err(FormulaError::Parse(format!(
                        "empty parentheses at position {}",
                        token.position
                    )));
                }
                let expr = self.parse_run(inner, depth)?;
                (FormulaExpr::Parentheses(Box::new(expr)), next)
            }
            _ => return Ok(None),
        };
        Ok(Some(parsed))
    }

    /// Function call at `index`: the name, then a parenthesized argument list
    fn call(
        &self,
        run: &[Token<'a>],
        index: usize,
        depth: usize,
    ) -> FormulaResult<(FormulaExpr, usize)> {
        let name = &run[index];
        let builtin = Builtin::from_name(name.text)
            .ok_or_else(|| FormulaError::UnknownFunction(name.text.to_string()))?;

        if !run.get(index + 1).map_or(false, |t| t.is_symbol("(")) {
            return Err(FormulaError::Parse(format!(
                "function {} at position {} must be followed by '('",
                builtin, name.position
            )));
        }

        let depth = self.nested(depth, name)?;
        let (inner, next) = enclosed_run(run, index + 1)?;
        let args = split_arguments(inner)?
            .into_iter()
            .map(|arg| self.parse_run(arg, depth))
            .collect::<FormulaResult<Vec<_>>>()?;

        Ok((FormulaExpr::builtin(builtin, args), next))
    }

    /// Prefix sign at `index` applied to the operand right after it
    fn prefixed(
        &self,
        run: &[Token<'a>],
        index: usize,
        depth: usize,
    ) -> FormulaResult<(FormulaExpr, usize)> {
        let sign = &run[index];
        let op = Operator::prefix_from_symbol(sign.text).ok_or_else(|| {
            FormulaError::Parse(format!(
                "operator '{}' at position {} is missing its left operand",
                sign.text, sign.position
            ))
        })?;

        let operand = match run.get(index + 1) {
            Some(_) => self.primary(run, index + 1, depth)?,
            None => None,
        };
        let (operand, next) = operand.ok_or_else(|| {
            FormulaError::Parse(format!(
                "{} at position {} must be followed by a value",
                op.symbol(),
                sign.position
            ))
        })?;

        Ok((FormulaExpr::operator(op, vec![operand]), next))
    }

    fn nested(&self, depth: usize, token: &Token<'a>) -> FormulaResult<usize> {
        if depth >= self.max_depth {
            return Err(FormulaError::Parse(format!(
                "'{}' at position {} nests deeper than {} levels",
                token.text, token.position, self.max_depth
            )));
        }
        Ok(depth + 1)
    }
}

fn unexpected(token: &Token<'_>) -> FormulaError {
    FormulaError::Parse(format!(
        "unexpected '{}' at position {}",
        token.text, token.position
    ))
}

/// Whether an operator binding at `strength` takes over the left operand of `inner`
fn descends(strength: u8, inner: Operator) -> bool {
    match inner.fixity() {
        Fixity::Infix => strength >= inner.precedence(),
        Fixity::Postfix => strength > inner.precedence(),
        Fixity::Prefix => false,
    }
}

/// Join `left op right`, rotating `op` down the leftmost spine of `right`
///
/// `strength` is the binding strength of the operator token.
fn combine(left: FormulaExpr, op: Operator, strength: u8, right: FormulaExpr) -> FormulaExpr {
    let mut spine: Vec<(Operator, Vec<FormulaExpr>)> = Vec::new();
    let mut operand = right;

    loop {
        match operand {
            FormulaExpr::Function {
                call: Call::Operator(inner),
                mut args,
            } if !args.is_empty() && descends(strength, inner) => {
                operand = args.remove(0);
                spine.push((inner, args));
            }
            other => {
                operand = other;
                break;
            }
        }
    }

    let mut node = join(left, op, strength, operand);
    while let Some((inner, mut args)) = spine.pop() {
        args.insert(0, node);
        node = FormulaExpr::operator(inner, args);
    }
    node
}

/// Build the binary node once its right operand is located
fn join(left: FormulaExpr, op: Operator, strength: u8, right: FormulaExpr) -> FormulaExpr {
    let right = if op == Operator::Subtract {
        FormulaExpr::operator(Operator::Negate, vec![right])
    } else {
        right
    };
    let op = if op == Operator::Subtract {
        Operator::Add
    } else {
        op
    };

    match left {
        // `-A1:A3` negates the whole range
        FormulaExpr::Function {
            call: Call::Operator(sign),
            mut args,
        } if sign.fixity() == Fixity::Prefix
            && args.len() == 1
            && strength > precedence::UNARY =>
        {
            let operand = args.remove(0);
            FormulaExpr::operator(sign, vec![join(operand, op, strength, right)])
        }
        left => FormulaExpr::operator(op, vec![left, right]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::value::FormulaValue;
    use pretty_assertions::assert_eq;

    fn parse(input: &str) -> FormulaExpr {
        parse_formula(input).unwrap_or_else(|e| panic!("{input}: {e}"))
    }

    fn tree(input: &str) -> String {
        parse(input).to_string()
    }

    fn labels(expr: &FormulaExpr) -> Vec<String> {
        expr.children().iter().map(FormulaExpr::label).collect()
    }

    fn assert_parse_error(input: &str) {
        let err = parse_formula(input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse, "{input}: {err}");
    }

    #[test]
    fn test_operator_precedence() {
        let ast = parse("1 * 2 + 3");
        assert_eq!(ast.label(), "+");
        assert_eq!(ast.children()[0].label(), "*");

        let ast = parse("1 * (2 + 3)");
        assert_eq!(ast.label(), "*");
        assert_eq!(ast.children()[1].children()[0].label(), "+");

        let ast = parse("1 * (2 + 3) + 4");
        assert_eq!(ast.label(), "+");
        assert_eq!(ast.children()[1].label(), "4");
    }

    #[test]
    fn test_multi_operator_precedence() {
        let ast = parse("1 : 2 & 3 + 4");
        assert_eq!(ast.label(), "&");
        assert_eq!(labels(&ast), vec![":", "+"]);

        let ast = parse("4 + 3 * 1 ^ 2");
        assert_eq!(ast.label(), "+");
        assert_eq!(ast.children()[1].label(), "*");

        let ast = parse("1 ^ 2 * 3 + 4");
        assert_eq!(ast.label(), "+");
        assert_eq!(ast.children()[0].label(), "*");

        assert_eq!(tree("1 ^ 2 * 3 + 4"), "[[[1 ^ 2] * 3] + 4]");
        assert_eq!(tree("4 + 3 * 1 ^ 2"), "[4 + [3 * [1 ^ 2]]]");
        assert_eq!(tree("1 = 2 & 3 + 4 * 5 ^ 6"), "[1 = [2 & [3 + [4 * [5 ^ 6]]]]]");
        assert_eq!(tree("1 ^ 2 * 3 + 4 & 5 = 6"), "[[[[[1 ^ 2] * 3] + 4] & 5] = 6]");
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(tree("8 / 4 / 2"), "[[8 / 4] / 2]");
        assert_eq!(tree("2 ^ 3 ^ 2"), "[[2 ^ 3] ^ 2]");
        assert_eq!(tree("1 - 2 + 3"), "[[1 + [-2]] + 3]");
        assert_eq!(tree("1 * 2 / 3 * 4"), "[[[1 * 2] / 3] * 4]");
    }

    #[test]
    fn test_comparison_binds_loosest() {
        assert_eq!(tree("1 <> 2 & 3"), "[1 <> [2 & 3]]");
        assert_eq!(tree("1 & 2 <> 3"), "[[1 & 2] <> 3]");
        assert_eq!(tree("1 >= 2 + 3 = 4"), "[[1 >= [2 + 3]] = 4]");
    }

    #[test]
    fn test_subtraction_becomes_negated_addition() {
        assert_eq!(tree("7 - 8 / 4"), "[7 + [-[8 / 4]]]");
        assert_eq!(tree("A1 - B2"), "[A1 + [-B2]]");
    }

    #[test]
    fn test_function_parameter() {
        let ast = parse("1 + IF(A1, A2, A3)");
        assert_eq!(ast.children()[1].label(), "IF");
        assert_eq!(ast.children()[1].children().len(), 3);

        let ast = parse("1 + IF(A1 * (B2 + C3) , ABS(D4), IF(E5, \"YES\", \"NO\"))");
        assert_eq!(ast.children()[1].label(), "IF");
        assert_eq!(ast.children()[1].children().len(), 3);

        assert_eq!(tree("pi()"), "PI()");
        assert_eq!(tree("SUM(A1:B2, 3)"), "SUM([A1 : B2], 3)");
    }

    #[test]
    fn test_parenthesis_expr() {
        let ast = parse("(1)");
        assert_eq!(ast.label(), "(");
        assert_eq!(ast.children()[0].label(), "1");

        let ast = parse("((((1) + 2) + 3) + 4) + 5");
        assert_eq!(ast.children()[1].label(), "5");

        assert_eq!(parse("(1 + 2) + (3 + 4 + 5)").label(), "+");

        for input in [")(", "((1 + 2) + (3 + 4) + 5", "(1 + 2", "()", "1 + ()"] {
            assert_parse_error(input);
        }
    }

    #[test]
    fn test_unary_operators() {
        let ast = parse("-1");
        assert_eq!(ast.label(), "unary -");
        assert_eq!(ast.children()[0].label(), "1");

        let ast = parse("1 + + 2");
        assert_eq!(ast.label(), "+");
        assert_eq!(ast.children()[1].label(), "unary +");

        let ast = parse("1 - - 2");
        assert_eq!(ast.label(), "+");
        assert_eq!(ast.children()[0].label(), "1");
        assert_eq!(ast.children()[1].label(), "unary -");

        let ast = parse("- 2 + 3");
        assert_eq!(ast.label(), "+");
        assert_eq!(ast.children()[0].label(), "unary -");

        let ast = parse("- 2 + - 3");
        assert_eq!(labels(&ast), vec!["unary -", "unary -"]);

        assert_eq!(parse("- (1 + 2)").label(), "unary -");
        assert_eq!(tree("-ABS(A1)"), "[-ABS(A1)]");
    }

    #[test]
    fn test_unary_binding() {
        assert_eq!(tree("-2 ^ 2"), "[[-2] ^ 2]");
        assert_eq!(tree("-A1:A3"), "[-[A1 : A3]]");
        assert_eq!(tree("1 + -A1:A3"), "[1 + [-[A1 : A3]]]");
        assert_eq!(tree("2 * -3 + 1"), "[[2 * [-3]] + 1]");
    }

    #[test]
    fn test_operators_errors() {
        for input in ["1 * * 2", "1 -", "*", "1 2", "A1 (2)", "- - 1", "SUM", "SUM 1", "1,2", "1)"] {
            assert_parse_error(input);
        }
        assert!(parse_formula("").is_err());
        assert!(parse_formula("=").is_err());
    }

    #[test]
    fn test_percent_operator() {
        assert!(matches!(parse("10%"), FormulaExpr::Function { .. }));
        assert_parse_error("%10");

        let ast = parse("20% * 10");
        assert_eq!(ast.label(), "*");
        assert_eq!(ast.children()[0].label(), "%");

        let ast = parse("10 * 20%");
        assert_eq!(ast.label(), "*");
        assert_eq!(ast.children()[1].label(), "%");

        let ast = parse("-20%");
        assert_eq!(ast.label(), "%");
        assert_eq!(ast.children()[0].label(), "unary -");

        let ast = parse("1:20%");
        assert_eq!(ast.label(), "%");
        assert_eq!(ast.children()[0].label(), ":");

        assert_eq!(tree("50%%"), "[[50%]%]");
    }

    #[test]
    fn test_empty_arguments() {
        assert_parse_error("SUM(1,,2)");
        assert_parse_error("SUM(1,)");
        assert_parse_error("SUM(,1)");
    }

    #[test]
    fn test_leading_equals() {
        assert_eq!(parse("=1+2"), parse("1 + 2"));
        assert_eq!(
            parse("=TRUE"),
            FormulaExpr::Constant(FormulaValue::Boolean(true))
        );
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}1{}", "(".repeat(10), ")".repeat(10));
        assert!(parse_formula_with_depth(&deep, 10).is_ok());
        let err = parse_formula_with_depth(&deep, 9).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);

        let calls = format!("{}1{}", "ABS(".repeat(5), ")".repeat(5));
        assert!(parse_formula_with_depth(&calls, 4).is_err());
    }

    #[test]
    fn test_parse_tokens() {
        let tokens = tokenize("A1 & \"x\"").unwrap();
        assert_eq!(parse_tokens(&tokens).unwrap().to_string(), "[A1 & \"x\"]");
    }
}
