//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellValue`] - The value stored in a cell
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`CellRange`] - A range of cells (e.g., "A1:B10")
//! - [`Cell`] - A positioned value with its format ID and formula text

mod address;
mod value;

pub use address::{CellAddress, CellRange};
pub use value::{CellError, CellValue, DateSystem, DateValue};

/// A single cell as it travels through the streaming reader and writer
///
/// Cells are plain values: they borrow nothing from the workbook, and
/// `format_id` / shared string indices are resolved through the workbook's
/// tables.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    /// Where the cell sits
    pub address: CellAddress,
    /// The typed value
    pub value: CellValue,
    /// Index into the format table's cell records (0 = default)
    pub format_id: u32,
    /// Formula text without the leading `=`, carried through unevaluated
    pub formula: Option<String>,
}

impl Cell {
    /// Create an unformatted cell
    pub fn new(address: CellAddress, value: impl Into<CellValue>) -> Self {
        Self {
            address,
            value: value.into(),
            format_id: 0,
            formula: None,
        }
    }

    /// Set the format ID
    pub fn with_format(mut self, format_id: u32) -> Self {
        self.format_id = format_id;
        self
    }

    /// Attach formula text
    pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
        self.formula = Some(formula.into());
        self
    }
}
