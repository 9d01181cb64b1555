//! Cell address and range types

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A cell address (e.g., "A1", "XFD1048576")
///
/// Rows and columns are both 1-based, matching the A1 notation used in the
/// worksheet XML. Addresses order row-major: every cell of row 1 sorts before
/// any cell of row 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellAddress {
    /// Row number (1..=1,048,576)
    pub row: u32,
    /// Column number (1..=16,384, A=1, XFD=16384)
    pub col: u32,
}

impl CellAddress {
    /// Create a new cell address, validating both coordinates
    pub fn new(row: u32, col: u32) -> Result<Self> {
        if row == 0 || row > MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS));
        }
        if col == 0 || col > MAX_COLS {
            return Err(Error::ColumnOutOfBounds(col, MAX_COLS));
        }
        Ok(Self { row, col })
    }

    /// Parse a cell address from A1-style notation
    ///
    /// `$` markers are accepted and discarded.
    ///
    /// # Examples
    /// ```
    /// use sheetstream_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("A1").unwrap();
    /// assert_eq!((addr.row, addr.col), (1, 1));
    ///
    /// let addr = CellAddress::parse("$AB$12").unwrap();
    /// assert_eq!((addr.row, addr.col), (12, 28));
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidAddress("empty address".into()));
        }

        let bytes = s.as_bytes();
        let mut pos = 0;

        if bytes.get(pos) == Some(&b'$') {
            pos += 1;
        }

        let col_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            pos += 1;
        }
        if pos == col_start {
            return Err(Error::InvalidAddress(format!(
                "no column letters in '{}'",
                s
            )));
        }
        let col = Self::letters_to_column(&s[col_start..pos])?;

        if bytes.get(pos) == Some(&b'$') {
            pos += 1;
        }

        let row_str = &s[pos..];
        if row_str.is_empty() {
            return Err(Error::InvalidAddress(format!("no row number in '{}'", s)));
        }
        if !row_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAddress(format!(
                "invalid row number in '{}'",
                s
            )));
        }

        let row: u32 = row_str
            .parse()
            .map_err(|_| Error::RowOutOfBounds(u32::MAX, MAX_ROWS))?;
        if row == 0 {
            return Err(Error::InvalidAddress(format!(
                "row number must be >= 1 in '{}'",
                s
            )));
        }

        Self::new(row, col)
    }

    /// Convert a column number to letters (1 = A, 26 = Z, 27 = AA, etc.)
    pub fn column_to_letters(col: u32) -> String {
        let mut result = String::new();
        let mut n = col;

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Convert column letters to a column number (A = 1, Z = 26, AA = 27, etc.)
    pub fn letters_to_column(letters: &str) -> Result<u32> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }
        // XFD is three letters; anything longer is out of range and could overflow
        if letters.len() > 3 {
            return Err(Error::ColumnOutOfBounds(u32::MAX, MAX_COLS));
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidAddress(format!(
                    "invalid column letter '{}'",
                    c
                )));
            }
            col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
        }

        if col > MAX_COLS {
            return Err(Error::ColumnOutOfBounds(col, MAX_COLS));
        }

        Ok(col)
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        let mut result = Self::column_to_letters(self.col);
        result.push_str(&self.row.to_string());
        result
    }

    /// The address one column to the right, if still on the sheet
    pub fn next_in_row(&self) -> Option<CellAddress> {
        Self::new(self.row, self.col + 1).ok()
    }

    /// Create a range from this address to another
    pub fn to(&self, other: CellAddress) -> CellRange {
        CellRange::new(*self, other)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::column_to_letters(self.col), self.row)
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for CellAddress {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A range of cells (e.g., "A1:B10")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRange {
    /// Start address (top-left)
    pub start: CellAddress,
    /// End address (bottom-right)
    pub end: CellAddress,
}

impl CellRange {
    /// Create a new cell range, normalized so `start` is top-left
    pub fn new(start: CellAddress, end: CellAddress) -> Self {
        Self {
            start: CellAddress {
                row: start.row.min(end.row),
                col: start.col.min(end.col),
            },
            end: CellAddress {
                row: start.row.max(end.row),
                col: start.col.max(end.col),
            },
        }
    }

    /// Create a single-cell range
    pub fn single(addr: CellAddress) -> Self {
        Self {
            start: addr,
            end: addr,
        }
    }

    /// Parse a range from A1:B10 notation
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        match s.split_once(':') {
            Some((start, end)) => {
                let start = CellAddress::parse(start)
                    .map_err(|_| Error::InvalidRange(s.to_string()))?;
                let end =
                    CellAddress::parse(end).map_err(|_| Error::InvalidRange(s.to_string()))?;
                Ok(Self::new(start, end))
            }
            None => Ok(Self::single(CellAddress::parse(s)?)),
        }
    }

    /// Check if a cell is within this range
    pub fn contains(&self, addr: &CellAddress) -> bool {
        addr.row >= self.start.row
            && addr.row <= self.end.row
            && addr.col >= self.start.col
            && addr.col <= self.end.col
    }

    /// Extend the range so it covers `addr`
    pub fn expand_to(&mut self, addr: CellAddress) {
        *self = CellRange::new(
            CellAddress {
                row: self.start.row.min(addr.row),
                col: self.start.col.min(addr.col),
            },
            CellAddress {
                row: self.end.row.max(addr.row),
                col: self.end.col.max(addr.col),
            },
        );
    }

    /// Get the number of rows in the range
    pub fn row_count(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    /// Get the number of columns in the range
    pub fn col_count(&self) -> u32 {
        self.end.col - self.start.col + 1
    }

    /// Get the total number of cells in the range
    pub fn cell_count(&self) -> u64 {
        self.row_count() as u64 * self.col_count() as u64
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}:{}", self.start, self.end)
        }
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn addr(s: &str) -> CellAddress {
        CellAddress::parse(s).unwrap()
    }

    #[test]
    fn test_column_to_letters() {
        assert_eq!(CellAddress::column_to_letters(1), "A");
        assert_eq!(CellAddress::column_to_letters(2), "B");
        assert_eq!(CellAddress::column_to_letters(26), "Z");
        assert_eq!(CellAddress::column_to_letters(27), "AA");
        assert_eq!(CellAddress::column_to_letters(28), "AB");
        assert_eq!(CellAddress::column_to_letters(702), "ZZ");
        assert_eq!(CellAddress::column_to_letters(703), "AAA");
        assert_eq!(CellAddress::column_to_letters(16384), "XFD");
    }

    #[test]
    fn test_letters_to_column() {
        assert_eq!(CellAddress::letters_to_column("A").unwrap(), 1);
        assert_eq!(CellAddress::letters_to_column("Z").unwrap(), 26);
        assert_eq!(CellAddress::letters_to_column("AA").unwrap(), 27);
        assert_eq!(CellAddress::letters_to_column("ZZ").unwrap(), 702);
        assert_eq!(CellAddress::letters_to_column("XFD").unwrap(), 16384);
        assert_eq!(CellAddress::letters_to_column("aa").unwrap(), 27);
        assert!(CellAddress::letters_to_column("XFE").is_err());
        assert!(CellAddress::letters_to_column("ABCD").is_err());
    }

    #[test]
    fn test_cell_address_parse() {
        assert_eq!(addr("A1"), CellAddress { row: 1, col: 1 });
        assert_eq!(addr("B2"), CellAddress { row: 2, col: 2 });
        assert_eq!(addr("$C$7"), CellAddress { row: 7, col: 3 });
        assert_eq!(addr("XFD1048576"), CellAddress { row: 1_048_576, col: 16_384 });
    }

    #[test]
    fn test_cell_address_parse_errors() {
        assert!(CellAddress::parse("").is_err());
        assert!(CellAddress::parse("A").is_err());
        assert!(CellAddress::parse("1").is_err());
        assert!(CellAddress::parse("A0").is_err());
        assert!(CellAddress::parse("A-1").is_err());
        assert!(CellAddress::parse("A1048577").is_err());
        assert!(CellAddress::parse("A99999999999").is_err());
        assert!(CellAddress::parse("XFE1").is_err());
    }

    #[test]
    fn test_new_validates_bounds() {
        assert!(CellAddress::new(0, 1).is_err());
        assert!(CellAddress::new(1, 0).is_err());
        assert!(CellAddress::new(1_048_577, 1).is_err());
        assert!(CellAddress::new(1, 16_385).is_err());
        assert!(CellAddress::new(1_048_576, 16_384).is_ok());
    }

    #[test]
    fn test_row_major_ordering() {
        assert!(addr("B1") < addr("A2"));
        assert!(addr("A1") < addr("B1"));
        assert!(addr("Z9") < addr("A10"));
        assert_eq!(addr("C3").cmp(&addr("C3")), std::cmp::Ordering::Equal);
    }

    #[test]
    fn test_cell_address_display() {
        assert_eq!(CellAddress::new(1, 1).unwrap().to_string(), "A1");
        assert_eq!(CellAddress::new(100, 3).unwrap().to_string(), "C100");
        assert_eq!(CellAddress::new(1, 28).unwrap().to_a1_string(), "AB1");
    }

    #[test]
    fn test_cell_range_parse_and_display() {
        let range = CellRange::parse("A1:B2").unwrap();
        assert_eq!(range.start, addr("A1"));
        assert_eq!(range.end, addr("B2"));
        assert_eq!(range.to_string(), "A1:B2");

        let range = CellRange::parse("C3").unwrap();
        assert_eq!(range.start, range.end);
        assert_eq!(range.to_string(), "C3");

        // Reversed corners normalize
        let range = CellRange::parse("D4:B2").unwrap();
        assert_eq!(range.to_string(), "B2:D4");
        assert_eq!(range.cell_count(), 9);
    }

    #[test]
    fn test_cell_range_contains_and_expand() {
        let mut range = CellRange::single(addr("B2"));
        range.expand_to(addr("D4"));
        range.expand_to(addr("A3"));
        assert_eq!(range.to_string(), "A2:D4");
        assert!(range.contains(&addr("C3")));
        assert!(!range.contains(&addr("C1")));
    }

    proptest! {
        #[test]
        fn prop_column_letters_bijective(col in 1u32..=16_384) {
            let letters = CellAddress::column_to_letters(col);
            prop_assert_eq!(CellAddress::letters_to_column(&letters).unwrap(), col);
        }

        #[test]
        fn prop_display_parses_back(row in 1u32..=1_048_576, col in 1u32..=16_384) {
            let a = CellAddress::new(row, col).unwrap();
            prop_assert_eq!(CellAddress::parse(&a.to_string()).unwrap(), a);
        }
    }
}
