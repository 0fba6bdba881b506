//! # gridcalc-formula
//!
//! Formula parser and evaluator for gridcalc.
//!
//! This crate provides:
//! - Formula parsing (text → AST) for numbers, cell references, unary `+`/`-`
//!   and binary `+ - * /`
//! - Canonical re-rendering of a parsed formula
//! - Formula evaluation (AST → number or spreadsheet error)
//!
//! ## Example
//!
//! ```rust
//! use gridcalc_core::{Position, Value};
//! use gridcalc_formula::{parse_formula, CellLookup};
//!
//! struct Fixed;
//!
//! impl CellLookup for Fixed {
//!     fn cell_value(&self, _pos: Position) -> Option<Value> {
//!         Some(Value::Number(4.0))
//!     }
//! }
//!
//! let formula = parse_formula("A1 * (1 + 1)").unwrap();
//! assert_eq!(formula.evaluate(&Fixed), Value::Number(8.0));
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod formula;
pub mod parser;

pub use ast::{BinaryOperator, FormulaAst, FormulaExpr, UnaryOperator};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{evaluate, CellLookup};
pub use formula::{parse_formula, Formula};
pub use parser::parse_formula_ast;
