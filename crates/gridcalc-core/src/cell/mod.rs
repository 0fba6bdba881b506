//! Cell-related types
//!
//! This module contains:
//! - [`Position`] - A cell's location and its A1-style codec
//! - [`Size`] - The printable extent of a sheet
//! - [`Value`] - The value a cell evaluates to
//! - [`CellError`] - Spreadsheet error values

mod position;
mod value;

pub use position::{Position, Size};
pub use value::{CellError, Value};
