//! Formula evaluator
//!
//! Evaluates formula ASTs against an [`Environment`]. Expressions are first
//! flattened into post-order steps; cell references to formula cells push a
//! new frame of steps instead of recursing, so neither deep expressions nor
//! long reference chains grow the native stack.

use crate::ast::{Call, FormulaExpr, Operator};
use crate::environment::{CellContent, Environment};
use crate::error::{FormulaError, FormulaResult};
use crate::functions;
use crate::parser::{parse_formula_with_depth, DEFAULT_MAX_NESTING_DEPTH};
use crate::value::FormulaValue;
use ahash::{AHashMap, AHashSet};
use gridcalc_core::{canonical_name, CellRange, CellRangeIterator};

/// Evaluation limits and checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationOptions {
    /// Nesting of parentheses and calls the parser accepts
    pub max_nesting_depth: usize,
    /// Formula cells that may be resolving at once along one reference chain
    pub max_reference_depth: usize,
    /// Cells a single range may span
    pub max_range_cells: u64,
    /// Report a cell that is re-entered while it is still being resolved
    pub detect_cycles: bool,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            max_reference_depth: 1024,
            max_range_cells: 1 << 20,
            detect_cycles: true,
        }
    }
}

impl EvaluationOptions {
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    pub fn with_max_reference_depth(mut self, depth: usize) -> Self {
        self.max_reference_depth = depth;
        self
    }

    pub fn with_max_range_cells(mut self, cells: u64) -> Self {
        self.max_range_cells = cells;
        self
    }

    pub fn with_cycle_detection(mut self, enabled: bool) -> Self {
        self.detect_cycles = enabled;
        self
    }
}

/// Tokenize, parse and evaluate `formula` against `env`
///
/// # Example
/// ```rust
/// use gridcalc_formula::{evaluate, CellContent, FormulaValue};
/// use std::collections::HashMap;
///
/// let mut cells = HashMap::new();
/// cells.insert("A1".to_string(), CellContent::from(10));
/// cells.insert("A2".to_string(), CellContent::formula("=A1 * 2"));
///
/// assert_eq!(evaluate("SUM(A1:A2) + 1", &cells).unwrap(), FormulaValue::Number(31.0));
/// ```
pub fn evaluate<E: Environment + ?Sized>(formula: &str, env: &E) -> FormulaResult<FormulaValue> {
    evaluate_with_options(formula, env, &EvaluationOptions::default())
}

/// [`evaluate`] with explicit limits
pub fn evaluate_with_options<E: Environment + ?Sized>(
    formula: &str,
    env: &E,
    options: &EvaluationOptions,
) -> FormulaResult<FormulaValue> {
    let ast = parse_formula_with_depth(formula, options.max_nesting_depth)?;
    let value = Interpreter::new(env)
        .with_options(options.clone())
        .evaluate(&ast)?;
    log::debug!("evaluated '{}' = {}", formula, value);
    Ok(value)
}

/// One post-order instruction
#[derive(Debug, Clone)]
enum Step {
    Push(FormulaValue),
    /// Resolve a cell by canonical name
    Load(String),
    /// Expand the range between two corner cells into a list
    Range(String, String),
    /// Apply an operation to the top `n` values
    Apply(Call, usize),
    /// Gather the top `n` values into a list
    Collect(usize),
}

enum Frame {
    /// Steps being executed, and the formula cell they resolve (if any)
    Steps {
        steps: Vec<Step>,
        next: usize,
        cell: Option<String>,
    },
    /// Cells of a range still to be loaded; collected into a list once exhausted
    Range {
        cells: CellRangeIterator,
        count: usize,
    },
}

impl Frame {
    fn steps(steps: Vec<Step>, cell: Option<String>) -> Self {
        Frame::Steps {
            steps,
            next: 0,
            cell,
        }
    }
}

enum Visit<'x> {
    Enter(&'x FormulaExpr),
    Exit(Call, usize),
}

/// Flatten an expression into post-order steps
fn compile(expr: &FormulaExpr) -> FormulaResult<Vec<Step>> {
    let mut steps = Vec::new();
    let mut work = vec![Visit::Enter(expr)];

    while let Some(visit) = work.pop() {
        match visit {
            Visit::Exit(call, argc) => steps.push(Step::Apply(call, argc)),
            Visit::Enter(FormulaExpr::Constant(value)) => steps.push(Step::Push(value.clone())),
            Visit::Enter(FormulaExpr::Variable(name)) => {
                steps.push(Step::Load(canonical_name(name)))
            }
            Visit::Enter(FormulaExpr::Parentheses(inner)) => work.push(Visit::Enter(&**inner)),
            Visit::Enter(FormulaExpr::Function {
                call: Call::Operator(Operator::Range),
                args,
            }) => {
                let (start, end) = range_corners(args)?;
                steps.push(Step::Range(start, end));
            }
            Visit::Enter(FormulaExpr::Function { call, args }) => {
                work.push(Visit::Exit(*call, args.len()));
                work.extend(args.iter().rev().map(Visit::Enter));
            }
        }
    }

    Ok(steps)
}

/// Corner cell names of a range node; both operands must be cell references
fn range_corners(args: &[FormulaExpr]) -> FormulaResult<(String, String)> {
    let corner = |expr: &FormulaExpr| -> FormulaResult<String> {
        let mut node = expr;
        while let FormulaExpr::Parentheses(inner) = node {
            node = &**inner;
        }
        match node {
            FormulaExpr::Variable(name) => Ok(canonical_name(name)),
            FormulaExpr::Constant(value) => {
                Err(FormulaError::type_mismatch(Operator::Range.symbol(), value.describe()))
            }
            other => Err(FormulaError::type_mismatch(
                Operator::Range.symbol(),
                format!("expression {}", other),
            )),
        }
    };

    match args {
        [start, end] => Ok((corner(start)?, corner(end)?)),
        _ => Err(FormulaError::ArgumentCount {
            function: Operator::Range.symbol().to_string(),
            expected: "2".to_string(),
            actual: args.len(),
        }),
    }
}

/// Evaluates ASTs against an environment
///
/// Each call to [`Interpreter::evaluate`] memoizes the cells it resolves, so a
/// cell referenced many times is evaluated once per call.
pub struct Interpreter<'e, E: ?Sized> {
    env: &'e E,
    options: EvaluationOptions,
}

impl<'e, E: Environment + ?Sized> Interpreter<'e, E> {
    pub fn new(env: &'e E) -> Self {
        Self {
            env,
            options: EvaluationOptions::default(),
        }
    }

    pub fn with_options(mut self, options: EvaluationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &EvaluationOptions {
        &self.options
    }

    /// Evaluate an expression to a single value
    pub fn evaluate(&self, expr: &FormulaExpr) -> FormulaResult<FormulaValue> {
        self.run(compile(expr)?)
    }

    /// Resolve one cell the way a reference to it inside a formula would
    pub fn evaluate_cell(&self, name: &str) -> FormulaResult<FormulaValue> {
        self.run(vec![Step::Load(canonical_name(name))])
    }

    fn run(&self, steps: Vec<Step>) -> FormulaResult<FormulaValue> {
        let mut frames = vec![Frame::steps(steps, None)];
        let mut values: Vec<FormulaValue> = Vec::new();
        let mut resolved: AHashMap<String, FormulaValue> = AHashMap::new();
        let mut resolving: AHashSet<String> = AHashSet::new();
        let mut depth = 0usize;

        loop {
            let step = match frames.last_mut() {
                None => break,
                Some(Frame::Steps { steps, next, cell }) => {
                    if *next < steps.len() {
                        *next += 1;
                        steps[*next - 1].clone()
                    } else {
                        let cell = cell.take();
                        frames.pop();
                        if let Some(cell) = cell {
                            let value = values.last().cloned().unwrap_or_else(FormulaValue::empty);
                            log::trace!("resolved {} = {}", cell, value);
                            resolving.remove(&cell);
                            resolved.insert(cell, value);
                            depth -= 1;
                        }
                        continue;
                    }
                }
                Some(Frame::Range { cells, count }) => match cells.next() {
                    Some(addr) => {
                        *count += 1;
                        Step::Load(addr.key())
                    }
                    None => {
                        let count = *count;
                        frames.pop();
                        Step::Collect(count)
                    }
                },
            };

            match step {
                Step::Push(value) => values.push(value),
                Step::Apply(call, argc) => {
                    let args = pop_values(&mut values, argc)?;
                    values.push(functions::apply(call, &args)?);
                }
                Step::Collect(count) => {
                    let items = pop_values(&mut values, count)?;
                    values.push(FormulaValue::List(items));
                }
                Step::Range(start, end) => {
                    let range = CellRange::from_corners(&start, &end)?;
                    let cell_count = range.cell_count();
                    if cell_count > self.options.max_range_cells {
                        return Err(FormulaError::Evaluation(format!(
                            "range {}:{} spans {} cells, more than the limit of {}",
                            start, end, cell_count, self.options.max_range_cells
                        )));
                    }
                    log::trace!("expanding {}:{} into {} cells", start, end, cell_count);
                    frames.push(Frame::Range {
                        cells: range.cells(),
                        count: 0,
                    });
                }
                Step::Load(name) => {
                    if let Some(value) = resolved.get(&name) {
                        values.push(value.clone());
                        continue;
                    }
                    if self.options.detect_cycles && resolving.contains(&name) {
                        return Err(FormulaError::CircularReference(name));
                    }

                    match self.env.lookup(&name) {
                        None => values.push(FormulaValue::empty()),
                        Some(CellContent::Value(value)) => values.push(value),
                        Some(CellContent::Formula(text)) => {
                            if depth >= self.options.max_reference_depth {
                                return Err(FormulaError::Evaluation(format!(
                                    "reference chain at {} is deeper than {} formula cells",
                                    name, self.options.max_reference_depth
                                )));
                            }
                            log::trace!("loading formula cell {} = {}", name, text);
                            let ast = parse_formula_with_depth(&text, self.options.max_nesting_depth)?;
                            let steps = compile(&ast)?;
                            if self.options.detect_cycles {
                                resolving.insert(name.clone());
                            }
                            depth += 1;
                            frames.push(Frame::steps(steps, Some(name)));
                        }
                    }
                }
            }
        }

        let value = values
            .pop()
            .ok_or_else(|| FormulaError::Evaluation("formula produced no value".into()))?;
        Ok(value)
    }
}

fn pop_values(values: &mut Vec<FormulaValue>, count: usize) -> FormulaResult<Vec<FormulaValue>> {
    let start = values
        .len()
        .checked_sub(count)
        .ok_or_else(|| FormulaError::Evaluation("operand stack underflow".into()))?;
    Ok(values.split_off(start))
}
