//! Compiled formulas
//!
//! [`Formula`] is what a cell stores for `=...` content: the parsed AST plus
//! the operations a sheet needs from it.

use std::fmt;

use gridcalc_core::{Position, Value};

use crate::ast::FormulaAst;
use crate::error::FormulaResult;
use crate::evaluator::CellLookup;
use crate::parser::parse_formula_ast;

/// A parsed, immutable formula
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    ast: FormulaAst,
}

impl Formula {
    /// Evaluate the formula; spreadsheet errors come back as [`Value::Error`]
    pub fn evaluate(&self, lookup: &dyn CellLookup) -> Value {
        self.ast.execute(lookup).into()
    }

    /// Canonical text of the expression, without the leading `=`
    pub fn expression(&self) -> String {
        self.ast.print_formula()
    }

    /// Distinct, ascending positions the formula reads
    pub fn referenced_cells(&self) -> &[Position] {
        self.ast.cells()
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ast)
    }
}

/// Parse expression text (without the leading `=`) into a [`Formula`]
///
/// # Example
/// ```rust
/// use gridcalc_formula::parse_formula;
///
/// let formula = parse_formula("(1 + 2) * A1").unwrap();
/// assert_eq!(formula.expression(), "(1+2)*A1");
/// ```
pub fn parse_formula(expression: &str) -> FormulaResult<Formula> {
    Ok(Formula {
        ast: parse_formula_ast(expression)?,
    })
}
