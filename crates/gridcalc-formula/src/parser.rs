//! Formula parser
//!
//! A recursive descent parser for arithmetic formulas with proper operator
//! precedence. The input is the expression text after the leading `=`.
//!
//! Grammar:
//! ```text
//! expression := additive
//! additive   := multiplicative (('+' | '-') multiplicative)*
//! multiplicative := unary (('*' | '/') unary)*
//! unary      := ('+' | '-') unary | primary
//! primary    := NUMBER | CELL | '(' expression ')'
//! ```

use crate::ast::{BinaryOperator, FormulaAst, FormulaExpr, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use gridcalc_core::Position;

/// Deepest nesting of parentheses and unary operators the parser accepts
pub const MAX_NESTING_DEPTH: usize = 128;

/// Tallest expression tree the parser builds.
///
/// Every operator node adds a level, so a flat chain such as `1+1+...+1`
/// counts one level per operator. Evaluating, printing and dropping a tree
/// recurse once per level.
pub const MAX_TREE_HEIGHT: usize = 512;

/// Parse formula expression text into an AST
///
/// # Example
/// ```rust
/// use gridcalc_formula::parse_formula_ast;
///
/// let ast = parse_formula_ast("1+2").unwrap();
/// let ast = parse_formula_ast("(A1+B2)*-C3").unwrap();
/// assert_eq!(ast.cells().len(), 3);
/// ```
pub fn parse_formula_ast(expression: &str) -> FormulaResult<FormulaAst> {
    let mut parser = FormulaParser::new(expression)?;
    let root = parser.parse_expression()?.expr;

    // Make sure we consumed all input
    if parser.current_token() != &Token::Eof {
        return Err(FormulaError::Parse(format!(
            "Unexpected characters after expression: '{}'",
            &parser.input[parser.token_start..]
        )));
    }

    let mut cells = parser.cells;
    cells.sort();
    Ok(FormulaAst::new(root, cells))
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    CellRef(String),

    Plus,
    Minus,
    Star,
    Slash,

    LeftParen,
    RightParen,

    Eof,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {}", n),
            Token::CellRef(s) => format!("cell reference {}", s),
            Token::Plus => "'+'".into(),
            Token::Minus => "'-'".into(),
            Token::Star => "'*'".into(),
            Token::Slash => "'/'".into(),
            Token::LeftParen => "'('".into(),
            Token::RightParen => "')'".into(),
            Token::Eof => "end of formula".into(),
        }
    }
}

/// Formula parser
struct FormulaParser<'a> {
    input: &'a str,
    pos: usize,
    token_start: usize,
    current_token: Token,
    depth: usize,
    /// Every cell reference in source order, including out-of-range ones
    cells: Vec<Position>,
}

impl<'a> FormulaParser<'a> {
    fn new(input: &'a str) -> FormulaResult<Self> {
        let mut parser = Self {
            input,
            pos: 0,
            token_start: 0,
            current_token: Token::Eof,
            depth: 0,
            cells: Vec::new(),
        };
        parser.advance_token()?;
        Ok(parser)
    }

    // === Token scanning ===

    fn advance_token(&mut self) -> FormulaResult<()> {
        self.skip_whitespace();
        self.token_start = self.pos;
        self.current_token = self.scan_token()?;
        Ok(())
    }

    fn scan_token(&mut self) -> FormulaResult<Token> {
        let c = match self.peek_char() {
            Some(c) => c,
            None => return Ok(Token::Eof),
        };

        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            _ => None,
        };
        if let Some(token) = single {
            self.advance();
            return Ok(token);
        }

        if c.is_ascii_digit()
            || (c == '.' && self.peek_char_at(1).map_or(false, |c| c.is_ascii_digit()))
        {
            return self.scan_number();
        }

        if c.is_ascii_uppercase() {
            return self.scan_cell_ref();
        }

        Err(FormulaError::Parse(format!(
            "Unexpected character '{}' at offset {}",
            c, self.pos
        )))
    }

    fn scan_number(&mut self) -> FormulaResult<Token> {
        let start = self.pos;

        self.skip_digits();

        if self.peek_char() == Some('.') {
            self.advance();
            self.skip_digits();
        }

        if self.peek_char().map_or(false, |c| c == 'e' || c == 'E') {
            self.advance();
            if self.peek_char().map_or(false, |c| c == '+' || c == '-') {
                self.advance();
            }
            if !self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                return Err(FormulaError::Parse(format!(
                    "Malformed exponent in '{}'",
                    &self.input[start..self.pos]
                )));
            }
            self.skip_digits();
        }

        let num_str = &self.input[start..self.pos];
        match num_str.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Token::Number(n)),
            Ok(_) => Err(FormulaError::Parse(format!(
                "Number out of range '{}'",
                num_str
            ))),
            Err(_) => Err(FormulaError::Parse(format!("Invalid number '{}'", num_str))),
        }
    }

    fn scan_cell_ref(&mut self) -> FormulaResult<Token> {
        let start = self.pos;

        while self.peek_char().map_or(false, |c| c.is_ascii_uppercase()) {
            self.advance();
        }
        let letters_end = self.pos;
        self.skip_digits();

        if self.pos == letters_end {
            return Err(FormulaError::Parse(format!(
                "Expected row number after '{}'",
                &self.input[start..self.pos]
            )));
        }

        if self.peek_char().map_or(false, |c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(FormulaError::Parse(format!(
                "Invalid cell reference starting at '{}'",
                &self.input[start..]
            )));
        }

        Ok(Token::CellRef(self.input[start..self.pos].to_string()))
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_digits(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn current_token(&self) -> &Token {
        &self.current_token
    }

    fn consume(&mut self) -> FormulaResult<Token> {
        let token = std::mem::replace(&mut self.current_token, Token::Eof);
        self.advance_token()?;
        Ok(token)
    }

    fn expect(&mut self, expected: &Token) -> FormulaResult<()> {
        if self.current_token() == expected {
            self.consume()?;
            Ok(())
        } else {
            Err(FormulaError::UnexpectedToken {
                expected: expected.describe(),
                found: self.current_token().describe(),
            })
        }
    }

    fn enter(&mut self) -> FormulaResult<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(FormulaError::TooDeep(MAX_NESTING_DEPTH));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    // === Expression parsing with precedence ===
    // Precedence (lowest to highest):
    // 1. Addition/Subtraction: +, -
    // 2. Multiplication/Division: *, /
    // 3. Unary: +, -
    // 4. Primary: numbers, cell references, parentheses

    fn parse_expression(&mut self) -> FormulaResult<Node> {
        self.parse_additive()
    }

    fn parse_additive(&mut self) -> FormulaResult<Node> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current_token() {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Subtract,
                _ => break,
            };

            self.consume()?;
            let right = self.parse_multiplicative()?;
            left = Node::binary(op, left, right)?;
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> FormulaResult<Node> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.current_token() {
                Token::Star => BinaryOperator::Multiply,
                Token::Slash => BinaryOperator::Divide,
                _ => break,
            };

            self.consume()?;
            let right = self.parse_unary()?;
            left = Node::binary(op, left, right)?;
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> FormulaResult<Node> {
        let op = match self.current_token() {
            Token::Minus => UnaryOperator::Negate,
            Token::Plus => UnaryOperator::Plus,
            _ => return self.parse_primary(),
        };

        self.consume()?;
        self.enter()?;
        let operand = self.parse_unary()?;
        self.leave();

        Node::unary(op, operand)
    }

    fn parse_primary(&mut self) -> FormulaResult<Node> {
        match self.current_token().clone() {
            Token::Number(n) => {
                self.consume()?;
                Ok(Node::leaf(FormulaExpr::Number(n)))
            }

            Token::CellRef(ref_str) => {
                self.consume()?;
                let pos = Position::from_a1(&ref_str);
                self.cells.push(pos);
                Ok(Node::leaf(FormulaExpr::CellRef(pos)))
            }

            Token::LeftParen => {
                self.consume()?;
                self.enter()?;
                let node = self.parse_expression()?;
                self.leave();
                self.expect(&Token::RightParen)?;
                Ok(node)
            }

            other => Err(FormulaError::UnexpectedToken {
                expected: "number, cell reference or '('".into(),
                found: other.describe(),
            }),
        }
    }
}

/// A parsed subtree together with its height
struct Node {
    expr: FormulaExpr,
    height: usize,
}

impl Node {
    fn leaf(expr: FormulaExpr) -> Self {
        Self { expr, height: 0 }
    }

    fn unary(op: UnaryOperator, operand: Node) -> FormulaResult<Self> {
        let height = Self::checked_height(operand.height)?;
        Ok(Self {
            expr: FormulaExpr::UnaryOp {
                op,
                operand: Box::new(operand.expr),
            },
            height,
        })
    }

    fn binary(op: BinaryOperator, left: Node, right: Node) -> FormulaResult<Self> {
        let height = Self::checked_height(left.height.max(right.height))?;
        Ok(Self {
            expr: FormulaExpr::BinaryOp {
                op,
                left: Box::new(left.expr),
                right: Box::new(right.expr),
            },
            height,
        })
    }

    fn checked_height(child: usize) -> FormulaResult<usize> {
        let height = child + 1;
        if height > MAX_TREE_HEIGHT {
            return Err(FormulaError::TooDeep(MAX_TREE_HEIGHT));
        }
        Ok(height)
    }
}
