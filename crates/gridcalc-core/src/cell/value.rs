//! Cell value types

use std::fmt;

/// The observable value of a cell
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Text (also the value of an empty cell, as `""`)
    Text(String),

    /// Numeric value
    Number(f64),

    /// Error value (#REF!, #VALUE!, #DIV/0!)
    Error(CellError),
}

impl Value {
    /// Create a new text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        Value::Text(s.into())
    }

    /// The value of an empty cell
    pub fn empty() -> Self {
        Value::Text(String::new())
    }

    /// Try to get the value as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get the value as text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::empty()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Number(n) => write!(f, "{}", n),
            Value::Error(e) => write!(f, "{}", e),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::text(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<CellError> for Value {
    fn from(e: CellError) -> Self {
        Value::Error(e)
    }
}

impl From<Result<f64, CellError>> for Value {
    fn from(result: Result<f64, CellError>) -> Self {
        match result {
            Ok(n) => Value::Number(n),
            Err(e) => Value::Error(e),
        }
    }
}

/// Spreadsheet error values produced by formula evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellError {
    /// #REF! - Invalid cell reference
    Ref,
    /// #VALUE! - Operand cannot be read as a number
    Value,
    /// #DIV/0! - Division by zero
    Div0,
}

impl CellError {
    /// Get the display string for this error
    pub fn as_str(&self) -> &'static str {
        match self {
            CellError::Ref => "#REF!",
            CellError::Value => "#VALUE!",
            CellError::Div0 => "#DIV/0!",
        }
    }

    /// Parse an error token
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "#REF!" => Some(CellError::Ref),
            "#VALUE!" => Some(CellError::Value),
            "#DIV/0!" => Some(CellError::Div0),
            _ => None,
        }
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::from(42), Value::Number(42.0));
        assert_eq!(Value::from(3.5), Value::Number(3.5));
        assert_eq!(Value::from(3.5).as_number(), Some(3.5));
        assert_eq!(Value::text("3.5").as_number(), None);
        assert_eq!(Value::from("hello").as_text(), Some("hello"));
        assert_eq!(Value::from(Err(CellError::Div0)), Value::Error(CellError::Div0));
        assert_eq!(Value::default(), Value::empty());
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Number(1.0).to_string(), "1");
        assert_eq!(Value::Number(0.5).to_string(), "0.5");
        assert_eq!(Value::Number(-3.0).to_string(), "-3");
        assert_eq!(Value::text("abc").to_string(), "abc");
        assert_eq!(Value::Error(CellError::Ref).to_string(), "#REF!");
    }

    #[test]
    fn test_cell_error_display() {
        assert_eq!(CellError::Div0.to_string(), "#DIV/0!");
        assert_eq!(CellError::Value.to_string(), "#VALUE!");
        assert_eq!(CellError::Ref.to_string(), "#REF!");
    }

    #[test]
    fn test_cell_error_parse() {
        assert_eq!(CellError::parse("#DIV/0!"), Some(CellError::Div0));
        assert_eq!(CellError::parse("#VALUE!"), Some(CellError::Value));
        assert_eq!(CellError::parse("#N/A"), None);
    }
}
