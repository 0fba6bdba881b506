//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur while turning formula text into an AST
///
/// Evaluation never fails with this type: spreadsheet errors such as
/// `#DIV/0!` are values (see [`gridcalc_core::CellError`]).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// Formula parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// A token the grammar does not allow at this point
    #[error("Expected {expected}, got {found}")]
    UnexpectedToken { expected: String, found: String },

    /// Nesting or operator chains beyond the supported depth
    #[error("Formula nested deeper than {0} levels")]
    TooDeep(usize),
}

impl From<FormulaError> for gridcalc_core::Error {
    fn from(err: FormulaError) -> Self {
        gridcalc_core::Error::FormulaParse(err.to_string())
    }
}
