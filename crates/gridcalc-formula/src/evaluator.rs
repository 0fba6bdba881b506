//! Formula evaluator
//!
//! Evaluates formula ASTs to numbers. Every failure is a spreadsheet error
//! value: an operand error propagates unchanged, with the left operand
//! taking precedence over the right one.

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use gridcalc_core::{CellError, Position, Value};

/// Read access to cell values during evaluation
///
/// Implemented by the sheet. `None` means no cell exists at `pos`, which
/// evaluates the same as an empty cell.
pub trait CellLookup {
    fn cell_value(&self, pos: Position) -> Option<Value>;
}

/// Evaluate a formula expression
pub fn evaluate(expr: &FormulaExpr, ctx: &dyn CellLookup) -> Result<f64, CellError> {
    match expr {
        FormulaExpr::Number(n) => Ok(*n),

        FormulaExpr::CellRef(pos) => evaluate_cell_ref(*pos, ctx),

        FormulaExpr::UnaryOp { op, operand } => {
            let n = evaluate(operand, ctx)?;
            Ok(match op {
                UnaryOperator::Plus => n,
                UnaryOperator::Negate => -n,
            })
        }

        FormulaExpr::BinaryOp { op, left, right } => evaluate_binary_op(*op, left, right, ctx),
    }
}

fn evaluate_cell_ref(pos: Position, ctx: &dyn CellLookup) -> Result<f64, CellError> {
    if !pos.is_valid() {
        return Err(CellError::Ref);
    }

    match ctx.cell_value(pos) {
        None => Ok(0.0),
        Some(Value::Number(n)) => Ok(n),
        Some(Value::Text(text)) => text_to_number(&text),
        Some(Value::Error(e)) => Err(e),
    }
}

/// Coerce the rendered text of a cell to a number.
///
/// Empty text counts as zero. Anything else must parse in full as a finite
/// number.
pub fn text_to_number(text: &str) -> Result<f64, CellError> {
    if text.is_empty() {
        return Ok(0.0);
    }
    match text.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(CellError::Value),
    }
}

/// Evaluate a binary operation
fn evaluate_binary_op(
    op: BinaryOperator,
    left: &FormulaExpr,
    right: &FormulaExpr,
    ctx: &dyn CellLookup,
) -> Result<f64, CellError> {
    // Both sides are evaluated before either error is looked at
    let left_val = evaluate(left, ctx);
    let right_val = evaluate(right, ctx);
    let (l, r) = (left_val?, right_val?);

    let result = match op {
        BinaryOperator::Add => l + r,
        BinaryOperator::Subtract => l - r,
        BinaryOperator::Multiply => l * r,
        BinaryOperator::Divide => {
            if r == 0.0 {
                return Err(CellError::Div0);
            }
            l / r
        }
    };

    // Overflow to infinity is reported like a division by zero
    if result.is_finite() {
        Ok(result)
    } else {
        Err(CellError::Div0)
    }
}
