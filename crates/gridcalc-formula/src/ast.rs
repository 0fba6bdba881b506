//! Formula Abstract Syntax Tree types

use std::fmt;

use gridcalc_core::{CellError, Position};

use crate::evaluator::{evaluate, CellLookup};

/// Formula expression AST
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaExpr {
    /// Numeric literal (always non-negative; signs are unary operators)
    Number(f64),

    /// Single cell reference; [`Position::NONE`] when the address was out of range
    CellRef(Position),

    /// Unary operation
    UnaryOp {
        op: UnaryOperator,
        operand: Box<FormulaExpr>,
    },

    /// Binary operation
    BinaryOp {
        op: BinaryOperator,
        left: Box<FormulaExpr>,
        right: Box<FormulaExpr>,
    },
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOperator {
    pub fn symbol(&self) -> char {
        match self {
            BinaryOperator::Add => '+',
            BinaryOperator::Subtract => '-',
            BinaryOperator::Multiply => '*',
            BinaryOperator::Divide => '/',
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Plus,
    Negate,
}

impl UnaryOperator {
    pub fn symbol(&self) -> char {
        match self {
            UnaryOperator::Plus => '+',
            UnaryOperator::Negate => '-',
        }
    }
}

/// Printing precedence classes, loosest first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Precedence {
    Add,
    Sub,
    Mul,
    Div,
    Unary,
    Atom,
}

/// Which side of a parent a child expression sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl Precedence {
    /// Whether `child`, printed as the `side` operand of `self`, needs parentheses.
    ///
    /// Unary operands are checked as `Side::Left`.
    fn needs_parens(self, child: Precedence, side: Side) -> bool {
        use Precedence::*;
        let child_is_additive = matches!(child, Add | Sub);
        match self {
            Add | Atom => false,
            Sub => side == Side::Right && child_is_additive,
            Mul | Unary => child_is_additive,
            Div => child_is_additive || (side == Side::Right && matches!(child, Mul | Div)),
        }
    }
}

impl FormulaExpr {
    fn precedence(&self) -> Precedence {
        match self {
            FormulaExpr::Number(_) | FormulaExpr::CellRef(_) => Precedence::Atom,
            FormulaExpr::UnaryOp { .. } => Precedence::Unary,
            FormulaExpr::BinaryOp { op, .. } => match op {
                BinaryOperator::Add => Precedence::Add,
                BinaryOperator::Subtract => Precedence::Sub,
                BinaryOperator::Multiply => Precedence::Mul,
                BinaryOperator::Divide => Precedence::Div,
            },
        }
    }

    fn fmt_child(&self, child: &FormulaExpr, side: Side, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.precedence().needs_parens(child.precedence(), side) {
            write!(f, "({})", child)
        } else {
            write!(f, "{}", child)
        }
    }
}

impl fmt::Display for FormulaExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaExpr::Number(n) => write!(f, "{}", n),
            FormulaExpr::CellRef(pos) if pos.is_valid() => write!(f, "{}", pos),
            FormulaExpr::CellRef(_) => write!(f, "{}", CellError::Ref),
            FormulaExpr::UnaryOp { op, operand } => {
                write!(f, "{}", op.symbol())?;
                self.fmt_child(operand, Side::Left, f)
            }
            FormulaExpr::BinaryOp { op, left, right } => {
                self.fmt_child(left, Side::Left, f)?;
                write!(f, "{}", op.symbol())?;
                self.fmt_child(right, Side::Right, f)
            }
        }
    }
}

/// A parsed formula: the expression tree plus the cells it references.
#[derive(Debug, Clone, PartialEq)]
pub struct FormulaAst {
    root: FormulaExpr,
    cells: Vec<Position>,
}

impl FormulaAst {
    /// Build an AST from its root and the references found while parsing.
    ///
    /// `cells` is expected to be sorted already; only adjacent duplicates
    /// are collapsed here. Invalid positions are dropped since they can
    /// never name a cell.
    pub fn new(root: FormulaExpr, mut cells: Vec<Position>) -> Self {
        cells.retain(Position::is_valid);
        cells.dedup();
        Self { root, cells }
    }

    pub fn root(&self) -> &FormulaExpr {
        &self.root
    }

    /// Distinct, ascending positions referenced by the formula
    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    /// Evaluate against `lookup`, yielding a number or a spreadsheet error
    pub fn execute(&self, lookup: &dyn CellLookup) -> Result<f64, CellError> {
        evaluate(&self.root, lookup)
    }

    /// Canonical re-rendering of the expression with minimal parentheses
    pub fn print_formula(&self) -> String {
        self.root.to_string()
    }

    /// Referenced cells in A1 form, space separated
    pub fn print_cells(&self) -> String {
        self.cells
            .iter()
            .map(Position::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for FormulaAst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn num(n: f64) -> FormulaExpr {
        FormulaExpr::Number(n)
    }

    fn bin(op: BinaryOperator, left: FormulaExpr, right: FormulaExpr) -> FormulaExpr {
        FormulaExpr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[test]
    fn test_print_minimal_parens() {
        use BinaryOperator::*;

        // (1+2)*3 keeps its parentheses
        let expr = bin(Multiply, bin(Add, num(1.0), num(2.0)), num(3.0));
        assert_eq!(expr.to_string(), "(1+2)*3");

        // 1+(2*3) drops them
        let expr = bin(Add, num(1.0), bin(Multiply, num(2.0), num(3.0)));
        assert_eq!(expr.to_string(), "1+2*3");

        // 1-(2-3) is not associative
        let expr = bin(Subtract, num(1.0), bin(Subtract, num(2.0), num(3.0)));
        assert_eq!(expr.to_string(), "1-(2-3)");

        // (1-2)-3 is the natural reading
        let expr = bin(Subtract, bin(Subtract, num(1.0), num(2.0)), num(3.0));
        assert_eq!(expr.to_string(), "1-2-3");

        // 1/(2*3) needs parens on the right of a division
        let expr = bin(Divide, num(1.0), bin(Multiply, num(2.0), num(3.0)));
        assert_eq!(expr.to_string(), "1/(2*3)");

        // 1*(2/3) does not
        let expr = bin(Multiply, num(1.0), bin(Divide, num(2.0), num(3.0)));
        assert_eq!(expr.to_string(), "1*2/3");
    }

    #[test]
    fn test_print_unary() {
        let expr = FormulaExpr::UnaryOp {
            op: UnaryOperator::Negate,
            operand: Box::new(bin(BinaryOperator::Add, num(1.0), num(2.0))),
        };
        assert_eq!(expr.to_string(), "-(1+2)");

        let expr = FormulaExpr::UnaryOp {
            op: UnaryOperator::Plus,
            operand: Box::new(FormulaExpr::CellRef(Position::new(0, 1))),
        };
        assert_eq!(expr.to_string(), "+B1");
    }

    #[test]
    fn test_print_invalid_reference() {
        assert_eq!(FormulaExpr::CellRef(Position::NONE).to_string(), "#REF!");
    }

    #[test]
    fn test_cells_collapse_adjacent_duplicates_only() {
        let a1 = Position::new(0, 0);
        let b1 = Position::new(0, 1);

        let ast = FormulaAst::new(num(0.0), vec![Position::NONE, a1, a1, b1]);
        assert_eq!(ast.cells(), &[a1, b1]);
        assert_eq!(ast.print_cells(), "A1 B1");

        // Unsorted input is taken as given
        let ast = FormulaAst::new(num(0.0), vec![a1, b1, a1]);
        assert_eq!(ast.cells(), &[a1, b1, a1]);
    }
}
