//! # gridcalc
//!
//! A spreadsheet computation engine: a sparse grid of cells holding text or
//! arithmetic formulas, kept consistent as cells change.
//!
//! ## Features
//!
//! - Formulas with `+ - * /`, unary signs, parentheses and A1 references
//! - Live dependency tracking with circular reference rejection
//! - Lazy evaluation with cached results, invalidated only downstream of a change
//! - Spreadsheet error values (`#REF!`, `#VALUE!`, `#DIV/0!`) that propagate
//!   through formulas
//! - Tab-separated printing of values or texts over the printable area
//!
//! ## Example
//!
//! ```rust
//! use gridcalc::prelude::*;
//!
//! let mut sheet = Sheet::new();
//! sheet.set_cell(Position::from_a1("A1"), "10").unwrap();
//! sheet.set_cell(Position::from_a1("A2"), "=A1/4").unwrap();
//!
//! let a2 = sheet.cell(Position::from_a1("A2")).unwrap().unwrap();
//! assert_eq!(a2.value(), Value::Number(2.5));
//!
//! // Circular references are refused and leave the sheet unchanged
//! let err = sheet.set_cell(Position::from_a1("A1"), "=A2").unwrap_err();
//! assert_eq!(err, Error::CircularDependency(Position::from_a1("A1")));
//! ```

pub mod cell;
pub mod graph;
mod invalidate;
pub mod prelude;
pub mod sheet;
pub mod storage;

pub use cell::{Cell, CellContent};
pub use graph::DependencyGraph;
pub use sheet::{CellView, Sheet, SheetOptions};

// Re-export core types
pub use gridcalc_core::{
    CellError, Error, Position, Result, Size, Value, ESCAPE_SIGN, FORMULA_SIGN,
};

// Re-export formula types
pub use gridcalc_formula::{
    parse_formula, CellLookup, Formula, FormulaAst, FormulaError, FormulaExpr, FormulaResult,
};
