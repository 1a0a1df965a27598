//! Parenthesis matching and argument splitting over token runs

use crate::error::{FormulaError, FormulaResult};
use crate::lexer::Token;

/// Locate the run enclosed by the `(` at `open` and its matching `)`
///
/// Returns the tokens strictly between the two parentheses and the index just
/// past the closing one.
pub fn enclosed_run<'t, 'a>(
    tokens: &'t [Token<'a>],
    open: usize,
) -> FormulaResult<(&'t [Token<'a>], usize)> {
    match tokens.get(open) {
        Some(token) if token.is_symbol("(") => {}
        Some(token) => {
            return Err(FormulaError::Parse(format!(
                "expected '(' at position {}, found '{}'",
                token.position, token.text
            )))
        }
        None => return Err(FormulaError::Parse("expected '(' at end of formula".into())),
    }

    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate().skip(open) {
        if token.is_symbol("(") {
            depth += 1;
        } else if token.is_symbol(")") {
            depth -= 1;
            if depth == 0 {
                return Ok((&tokens[open + 1..index], index + 1));
            }
        }
    }

    Err(FormulaError::Parse(format!(
        "unmatched '(' at position {}",
        tokens[open].position
    )))
}

/// Split a run into its top-level comma-separated arguments
///
/// Commas nested inside parentheses do not split. An empty run has no
/// arguments; an empty argument between commas is an error.
pub fn split_arguments<'t, 'a>(run: &'t [Token<'a>]) -> FormulaResult<Vec<&'t [Token<'a>]>> {
    if run.is_empty() {
        return Ok(Vec::new());
    }

    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (index, token) in run.iter().enumerate() {
        if token.is_symbol("(") {
            depth += 1;
        } else if token.is_symbol(")") {
            depth = depth.checked_sub(1).ok_or_else(|| {
                FormulaError::Parse(format!("unmatched ')' at position {}", token.position))
            })?;
        } else if token.is_symbol(",") && depth == 0 {
            args.push(non_empty(&run[start..index], token)?);
            start = index + 1;
        }
    }

    if depth > 0 {
        return Err(FormulaError::Parse("unmatched '(' in argument list".into()));
    }

    match run.last() {
        Some(last) if start == run.len() => Err(FormulaError::Parse(format!(
            "empty argument after ',' at position {}",
            last.position
        ))),
        _ => {
            args.push(&run[start..]);
            Ok(args)
        }
    }
}

fn non_empty<'t, 'a>(arg: &'t [Token<'a>], comma: &Token<'a>) -> FormulaResult<&'t [Token<'a>]> {
    if arg.is_empty() {
        Err(FormulaError::Parse(format!(
            "empty argument before ',' at position {}",
            comma.position
        )))
    } else {
        Ok(arg)
    }
}
