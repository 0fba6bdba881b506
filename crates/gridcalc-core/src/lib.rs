//! # gridcalc-core
//!
//! Core data types for the gridcalc spreadsheet engine.
//!
//! This crate provides the fundamental types used throughout gridcalc:
//! - [`Position`] and [`Size`] - Cell addressing and the printable extent
//! - [`Value`] and [`CellError`] - What cells evaluate to
//! - [`Error`] - Structural errors raised by sheet operations
//!
//! ## Example
//!
//! ```rust
//! use gridcalc_core::{CellError, Position, Value};
//!
//! let pos: Position = "B3".parse().unwrap();
//! assert_eq!(pos, Position::new(2, 1));
//! assert_eq!(Value::Error(CellError::Div0).to_string(), "#DIV/0!");
//! ```

pub mod cell;
pub mod error;

// Re-exports for convenience
pub use cell::{CellError, Position, Size, Value};
pub use error::{Error, Result};

/// Leading character that marks cell text as a formula
pub const FORMULA_SIGN: char = '=';

/// Leading character that forces cell text to stay literal text
pub const ESCAPE_SIGN: char = '\'';
