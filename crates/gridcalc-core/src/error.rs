//! Error types for gridcalc-core

use thiserror::Error;

use crate::cell::Position;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Structural errors raised by sheet operations.
///
/// These abort the triggering call before anything is mutated. Spreadsheet
/// error *values* (`#REF!` and friends) are [`crate::CellError`] instead and
/// never travel through this type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Position outside the addressable grid
    #[error("Invalid position: ({}, {})", .0.row, .0.col)]
    InvalidPosition(Position),

    /// Malformed A1-style address text
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Setting the cell would make it depend on itself
    #[error("Circular dependency detected involving cell {0}")]
    CircularDependency(Position),

    /// Formula parse error
    #[error("Formula parse error: {0}")]
    FormulaParse(String),
}
