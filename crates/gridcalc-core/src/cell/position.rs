//! Cell position and printable size types

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A zero-based cell position (row, column).
///
/// Positions are plain values. Anything outside
/// `0..MAX_ROWS` x `0..MAX_COLS` is invalid, and [`Position::NONE`] is the
/// canonical invalid position used for "absent" references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Row index (0-based internally, 1-based in display)
    pub row: i32,
    /// Column index (0-based, A=0, B=1, ..., XFD=16383)
    pub col: i32,
}

impl Position {
    /// Number of addressable rows
    pub const MAX_ROWS: i32 = 16_384;

    /// Number of addressable columns
    pub const MAX_COLS: i32 = 16_384;

    /// Sentinel for an invalid or absent position
    pub const NONE: Position = Position { row: -1, col: -1 };

    const MAX_LETTERS: usize = 3;

    /// Create a new position
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Check that both coordinates lie inside the grid
    pub fn is_valid(&self) -> bool {
        (0..Self::MAX_ROWS).contains(&self.row) && (0..Self::MAX_COLS).contains(&self.col)
    }

    /// Parse a position from A1-style notation
    ///
    /// # Examples
    /// ```
    /// use gridcalc_core::Position;
    ///
    /// let pos = Position::parse("A1").unwrap();
    /// assert_eq!(pos, Position::new(0, 0));
    ///
    /// let pos = Position::parse("AB12").unwrap();
    /// assert_eq!(pos, Position::new(11, 27));
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        let letters = bytes.iter().take_while(|b| b.is_ascii_uppercase()).count();

        if letters == 0 {
            return Err(Error::InvalidAddress(format!("no column letters in '{}'", s)));
        }
        if letters > Self::MAX_LETTERS {
            return Err(Error::InvalidAddress(format!(
                "too many column letters in '{}'",
                s
            )));
        }

        let col = Self::letters_to_column(&s[..letters])?;

        let row_str = &s[letters..];
        if row_str.is_empty() || !row_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAddress(format!("invalid row number in '{}'", s)));
        }

        let row: i32 = row_str
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("row number too large in '{}'", s)))?;

        // Rows are 1-based in A1 notation
        if row == 0 {
            return Err(Error::InvalidAddress(format!(
                "row number must be >= 1 in '{}'",
                s
            )));
        }

        let pos = Self::new(row - 1, col);
        if !pos.is_valid() {
            return Err(Error::InvalidPosition(pos));
        }
        Ok(pos)
    }

    /// Lenient decoding: any malformed or out-of-range address becomes
    /// [`Position::NONE`].
    pub fn from_a1(s: &str) -> Self {
        Self::parse(s).unwrap_or(Self::NONE)
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: i32) -> String {
        let mut result = String::new();
        let mut n = col as i64 + 1;

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Convert column letters to index (A = 0, Z = 25, AA = 26, etc.)
    pub fn letters_to_column(letters: &str) -> Result<i32> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }

        let mut col: i64 = 0;
        for c in letters.chars() {
            if !c.is_ascii_uppercase() {
                return Err(Error::InvalidAddress(format!(
                    "invalid column letter '{}'",
                    c
                )));
            }
            col = col * 26 + (c as i64 - 'A' as i64 + 1);
            if col > Self::MAX_COLS as i64 {
                return Err(Error::InvalidAddress(format!(
                    "column '{}' out of bounds",
                    letters
                )));
            }
        }

        Ok((col - 1) as i32)
    }

    /// Format as A1-style string; invalid positions render as an empty string
    pub fn to_a1_string(&self) -> String {
        if !self.is_valid() {
            return String::new();
        }
        format!("{}{}", Self::column_to_letters(self.col), self.row + 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1_string())
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Extent of the printable area: the smallest box holding every occupied cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub rows: i32,
    pub cols: i32,
}

impl Size {
    pub const fn new(rows: i32, cols: i32) -> Self {
        Self { rows, cols }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_column_to_letters() {
        assert_eq!(Position::column_to_letters(0), "A");
        assert_eq!(Position::column_to_letters(25), "Z");
        assert_eq!(Position::column_to_letters(26), "AA");
        assert_eq!(Position::column_to_letters(701), "ZZ");
        assert_eq!(Position::column_to_letters(702), "AAA");
        assert_eq!(Position::column_to_letters(16383), "XFD");
    }

    #[test]
    fn test_letters_to_column() {
        assert_eq!(Position::letters_to_column("A").unwrap(), 0);
        assert_eq!(Position::letters_to_column("AB").unwrap(), 27);
        assert_eq!(Position::letters_to_column("XFD").unwrap(), 16383);
        assert!(Position::letters_to_column("XFE").is_err());
        assert!(Position::letters_to_column("a").is_err());
    }

    #[test]
    fn test_parse() {
        assert_eq!(Position::parse("A1").unwrap(), Position::new(0, 0));
        assert_eq!(Position::parse("C100").unwrap(), Position::new(99, 2));
        assert_eq!(
            Position::parse("XFD16384").unwrap(),
            Position::new(16383, 16383)
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(Position::parse("").is_err());
        assert!(Position::parse("A").is_err());
        assert!(Position::parse("1").is_err());
        assert!(Position::parse("A0").is_err());
        assert!(Position::parse("a1").is_err());
        assert!(Position::parse("A1B").is_err());
        assert!(Position::parse("A16385").is_err());
        assert!(Position::parse("ABCD1").is_err());
        assert!(Position::parse("A99999999999").is_err());
    }

    #[test]
    fn test_from_a1_falls_back_to_none() {
        assert_eq!(Position::from_a1("B2"), Position::new(1, 1));
        assert_eq!(Position::from_a1("ZZZZ1"), Position::NONE);
        assert_eq!(Position::from_a1("A0"), Position::NONE);
    }

    #[test]
    fn test_display() {
        assert_eq!(Position::new(0, 0).to_string(), "A1");
        assert_eq!(Position::new(11, 27).to_string(), "AB12");
        assert_eq!(Position::NONE.to_string(), "");
        assert_eq!(Position::new(-3, 4).to_string(), "");
    }

    #[test]
    fn test_validity_and_ordering() {
        assert!(Position::new(0, 0).is_valid());
        assert!(!Position::NONE.is_valid());
        assert!(!Position::new(Position::MAX_ROWS, 0).is_valid());
        assert!(!Position::new(0, Position::MAX_COLS).is_valid());

        assert!(Position::new(0, 5) < Position::new(1, 0));
        assert!(Position::new(1, 0) < Position::new(1, 1));
    }
}
