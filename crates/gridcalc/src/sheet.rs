//! The sheet: cell storage, dependency edges and the operations tying them
//! together.
//!
//! Every mutating operation either completes or leaves the sheet untouched.
//! Validation, parsing and the cycle check all run before the first write.

use std::io::{self, Write};

use gridcalc_core::{CellError, Error, Position, Result, Size, Value};
use gridcalc_formula::CellLookup;
use tracing::debug;

use crate::cell::{Cell, CellContent};
use crate::graph::DependencyGraph;
use crate::invalidate::invalidate_dependents;
use crate::storage::CellStorage;

/// Sheet limits
///
/// Positions at or beyond the limits are rejected by every sheet operation.
/// Formulas may still mention them; such references evaluate to `#REF!`.
/// Limits always lie within `1..=Position::MAX_ROWS` and
/// `1..=Position::MAX_COLS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetOptions {
    max_rows: i32,
    max_cols: i32,
}

impl SheetOptions {
    /// Limits clamped to `1..=Position::MAX_ROWS` and `1..=Position::MAX_COLS`
    pub fn new(max_rows: i32, max_cols: i32) -> Self {
        Self {
            max_rows: max_rows.clamp(1, Position::MAX_ROWS),
            max_cols: max_cols.clamp(1, Position::MAX_COLS),
        }
    }

    /// Number of usable rows (default: 16384)
    pub fn max_rows(&self) -> i32 {
        self.max_rows
    }

    /// Number of usable columns (default: 16384)
    pub fn max_cols(&self) -> i32 {
        self.max_cols
    }

    /// Whether `pos` is usable under these limits
    pub fn contains(&self, pos: Position) -> bool {
        pos.is_valid() && pos.row < self.max_rows && pos.col < self.max_cols
    }
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            max_rows: Position::MAX_ROWS,
            max_cols: Position::MAX_COLS,
        }
    }
}

/// A spreadsheet with live formula dependencies
///
/// # Example
///
/// ```rust
/// use gridcalc::{Position, Sheet, Value};
///
/// let mut sheet = Sheet::new();
/// sheet.set_cell(Position::from_a1("A1"), "2").unwrap();
/// sheet.set_cell(Position::from_a1("B1"), "=A1*21").unwrap();
///
/// let b1 = sheet.cell(Position::from_a1("B1")).unwrap().unwrap();
/// assert_eq!(b1.value(), Value::Number(42.0));
/// assert_eq!(b1.text(), "=A1*21");
/// ```
#[derive(Debug, Default)]
pub struct Sheet {
    options: SheetOptions,
    storage: CellStorage,
    graph: DependencyGraph,
}

impl Sheet {
    /// Create an empty sheet with default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty sheet with the given limits
    pub fn with_options(options: SheetOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &SheetOptions {
        &self.options
    }

    fn check_position(&self, pos: Position) -> Result<()> {
        if self.options.contains(pos) {
            Ok(())
        } else {
            Err(Error::InvalidPosition(pos))
        }
    }

    /// Set the text of a cell.
    ///
    /// Text starting with `=` (and longer than that) is parsed as a formula.
    /// Setting the text a cell already has is a no-op. Cells the formula
    /// references are created empty if they do not exist yet.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidPosition`] if `pos` is outside the sheet
    /// - [`Error::FormulaParse`] if the formula does not parse
    /// - [`Error::CircularDependency`] if the formula would depend on `pos`
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<()> {
        self.check_position(pos)?;

        if self.storage.get(pos).is_some_and(|cell| cell.text() == text) {
            return Ok(());
        }

        let content = CellContent::parse(text)?;
        let references: Vec<Position> = content
            .referenced_cells()
            .iter()
            .copied()
            .filter(|&r| self.options.contains(r))
            .collect();

        if self.graph.would_create_cycle(pos, &references) {
            debug!(cell = %pos, text, "rejected circular reference");
            return Err(Error::CircularDependency(pos));
        }

        debug!(cell = %pos, text, "set cell");
        self.storage.occupy(pos).set_content(content);
        self.graph.replace_precedents(pos, &references);
        for &reference in &references {
            self.storage.occupy(reference);
        }
        invalidate_dependents(&self.graph, &mut self.storage, pos);

        Ok(())
    }

    /// Look up a cell. `Ok(None)` means the slot is free.
    pub fn cell(&self, pos: Position) -> Result<Option<CellView<'_>>> {
        self.check_position(pos)?;
        Ok(self.view(pos))
    }

    /// Look up a cell, creating an empty one if the slot is free
    pub fn obtain_cell(&mut self, pos: Position) -> Result<CellView<'_>> {
        self.check_position(pos)?;
        self.storage.occupy(pos);
        self.view(pos).ok_or(Error::InvalidPosition(pos))
    }

    fn view(&self, pos: Position) -> Option<CellView<'_>> {
        self.storage.get(pos).map(|cell| CellView {
            sheet: self,
            pos,
            cell,
        })
    }

    /// Remove a cell.
    ///
    /// Formulas that referenced it keep their references and now read an
    /// empty value. Clearing a free slot does nothing.
    pub fn clear_cell(&mut self, pos: Position) -> Result<()> {
        self.check_position(pos)?;

        let Some(cell) = self.storage.get_mut(pos) else {
            return Ok(());
        };

        debug!(cell = %pos, "clear cell");
        cell.clear();
        self.graph.remove_precedents(pos);
        invalidate_dependents(&self.graph, &mut self.storage, pos);
        self.storage.release(pos);

        Ok(())
    }

    /// Smallest box holding every existing cell
    pub fn printable_size(&self) -> Size {
        self.storage.size()
    }

    /// Number of existing cells
    pub fn cell_count(&self) -> usize {
        self.storage.cell_count()
    }

    pub fn dependency_graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Write the value of every cell in the printable area.
    ///
    /// Cells are separated by tabs and rows end with `\n`; free slots print
    /// as nothing.
    pub fn print_values<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.print_cells(out, |view| view.value().to_string())
    }

    /// Write the text of every cell in the printable area, laid out like
    /// [`Sheet::print_values`]
    pub fn print_texts<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.print_cells(out, |view| view.text())
    }

    fn print_cells<W, F>(&self, out: &mut W, render: F) -> io::Result<()>
    where
        W: Write,
        F: Fn(&CellView<'_>) -> String,
    {
        let size = self.printable_size();
        for row in 0..size.rows {
            for col in 0..size.cols {
                if col > 0 {
                    out.write_all(b"\t")?;
                }
                if let Some(view) = self.view(Position::new(row, col)) {
                    out.write_all(render(&view).as_bytes())?;
                }
            }
            out.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Value of the cell at `pos`, computing stale precedents first so
    /// evaluation never recurses through a long chain.
    fn computed_value(&self, pos: Position, cell: &Cell) -> Value {
        let order = self.graph.evaluation_order(pos, |p| {
            self.storage.get(p).is_some_and(Cell::is_stale)
        });
        for p in order {
            if let Some(precedent) = self.storage.get(p) {
                precedent.value(self);
            }
        }
        cell.value(self)
    }
}

impl CellLookup for Sheet {
    fn cell_value(&self, pos: Position) -> Option<Value> {
        if !self.options.contains(pos) {
            return Some(Value::Error(CellError::Ref));
        }
        self.storage.get(pos).map(|cell| cell.value(self))
    }
}

/// Read-only view of an existing cell
#[derive(Debug, Clone, Copy)]
pub struct CellView<'a> {
    sheet: &'a Sheet,
    pos: Position,
    cell: &'a Cell,
}

impl<'a> CellView<'a> {
    pub fn position(&self) -> Position {
        self.pos
    }

    /// The cell's value: text with any escape sign removed, or the formula
    /// result
    pub fn value(&self) -> Value {
        self.sheet.computed_value(self.pos, self.cell)
    }

    /// The text as the user would edit it; formulas are shown canonically
    pub fn text(&self) -> String {
        self.cell.text()
    }

    pub fn content(&self) -> &'a CellContent {
        self.cell.content()
    }

    /// Distinct positions read by the cell's formula, ascending
    pub fn referenced_cells(&self) -> &'a [Position] {
        self.cell.referenced_cells()
    }

    /// Whether any formula reads this cell
    pub fn is_referenced(&self) -> bool {
        self.sheet.graph.is_referenced(self.pos)
    }

    pub fn is_empty(&self) -> bool {
        self.cell.is_empty()
    }
}
