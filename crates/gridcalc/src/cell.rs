//! Cell content and its cached value
//!
//! A [`Cell`] owns what the user typed (classified into [`CellContent`]) and
//! a lazily computed value. Dependency edges are not stored here; they live
//! in the sheet's [`DependencyGraph`](crate::graph::DependencyGraph), keyed
//! by position.

use std::cell::OnceCell;

use gridcalc_core::{Position, Result, Value, ESCAPE_SIGN, FORMULA_SIGN};
use gridcalc_formula::{parse_formula, CellLookup, Formula};

/// Classified cell content
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellContent {
    /// Nothing typed, or the empty string
    #[default]
    Empty,
    /// Literal text, stored exactly as typed (escape sign included)
    Text(String),
    /// A parsed formula
    Formula(Formula),
}

impl CellContent {
    /// Classify raw cell text.
    ///
    /// `""` is empty. Text starting with `=` and longer than one character is
    /// parsed as a formula; a lone `=` is plain text. Everything else,
    /// including text starting with `'`, is kept as text.
    pub fn parse(text: &str) -> Result<Self> {
        if text.is_empty() {
            return Ok(CellContent::Empty);
        }

        match text.strip_prefix(FORMULA_SIGN) {
            Some(expression) if !expression.is_empty() => {
                Ok(CellContent::Formula(parse_formula(expression)?))
            }
            _ => Ok(CellContent::Text(text.to_string())),
        }
    }

    /// Positions this content reads; only formulas read anything
    pub fn referenced_cells(&self) -> &[Position] {
        match self {
            CellContent::Formula(formula) => formula.referenced_cells(),
            _ => &[],
        }
    }

    pub fn is_formula(&self) -> bool {
        matches!(self, CellContent::Formula(_))
    }

    /// The text a user would see when editing the cell
    pub fn text(&self) -> String {
        match self {
            CellContent::Empty => String::new(),
            CellContent::Text(text) => text.clone(),
            CellContent::Formula(formula) => format!("{}{}", FORMULA_SIGN, formula.expression()),
        }
    }
}

/// A single occupied slot of the sheet
#[derive(Debug, Default)]
pub struct Cell {
    content: CellContent,
    cache: OnceCell<Value>,
}

impl Cell {
    /// Create an empty cell
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &CellContent {
        &self.content
    }

    /// Replace the content and drop the cached value
    pub fn set_content(&mut self, content: CellContent) {
        self.content = content;
        self.cache.take();
    }

    /// Reset to empty content
    pub fn clear(&mut self) {
        self.set_content(CellContent::Empty);
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.content, CellContent::Empty)
    }

    /// The cell's value, evaluating a formula on first access.
    ///
    /// Text values have a leading escape sign removed. Formula results are
    /// cached until [`Cell::invalidate_cache`] is called.
    pub fn value(&self, lookup: &dyn CellLookup) -> Value {
        match &self.content {
            CellContent::Empty => Value::empty(),
            CellContent::Text(text) => {
                Value::text(text.strip_prefix(ESCAPE_SIGN).unwrap_or(text))
            }
            CellContent::Formula(formula) => {
                self.cache.get_or_init(|| formula.evaluate(lookup)).clone()
            }
        }
    }

    /// Cached formula value, if one has been computed
    pub fn cached_value(&self) -> Option<&Value> {
        self.cache.get()
    }

    /// A formula whose value would have to be computed on the next read
    pub fn is_stale(&self) -> bool {
        self.content.is_formula() && self.cache.get().is_none()
    }

    /// Forget the cached value. Returns whether there was one.
    pub fn invalidate_cache(&mut self) -> bool {
        self.cache.take().is_some()
    }

    pub fn text(&self) -> String {
        self.content.text()
    }

    pub fn referenced_cells(&self) -> &[Position] {
        self.content.referenced_cells()
    }
}
