//! # sheetstream-core
//!
//! Core data structures for the sheetstream spreadsheet library.
//!
//! This crate provides the fundamental types used throughout sheetstream:
//! - [`CellValue`] and [`Cell`] - Typed cell values and positioned cells
//! - [`CellAddress`] and [`CellRange`] - Cell addressing and ranges
//! - [`SharedStringTable`] - The workbook-wide string interner
//! - [`FormatTable`] - The workbook-wide formatting record dictionary
//! - [`Style`] - The attribute bundle a formatting record resolves to
//! - [`Workbook`], [`Worksheet`] - The in-memory document structures
//!
//! ## Example
//!
//! ```rust
//! use sheetstream_core::{CellValue, SharedStringTable, Style, Workbook, FormatTable};
//!
//! let mut strings = SharedStringTable::new();
//! let total = strings.intern("Total");
//! assert_eq!(strings.intern("Total"), total);
//!
//! let mut formats = FormatTable::new();
//! let bold = formats.intern_style(&Style::new().bold(true)).unwrap();
//! assert_eq!(formats.intern_style(&Style::new().bold(true)).unwrap(), bold);
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.worksheet_mut(0).unwrap();
//! sheet.set_cell_value("A1", 42.0).unwrap();
//! assert_eq!(sheet.get_value("A1").unwrap(), CellValue::Number(42.0));
//! ```

pub mod cell;
pub mod error;
pub mod shared_strings;
pub mod style;
pub mod workbook;
pub mod worksheet;

// Re-exports for convenience
pub use cell::{Cell, CellAddress, CellError, CellRange, CellValue, DateSystem, DateValue};
pub use error::{Error, Result};
pub use shared_strings::{RichText, SharedStringTable, TextRun};
pub use workbook::{validate_sheet_name, Workbook, WorkbookSettings};
pub use worksheet::Worksheet;

// Re-export all style types for convenience
pub use style::{
    Alignment, ApplyFlags, BorderEdge, BorderLineStyle, BorderStyle, Color, FillStyle,
    FontStyle, FontVerticalAlign, FormatRecord, FormatTable, HorizontalAlignment, NamedStyle,
    NumberFormat, PatternType, Protection, Style, Underline, VerticalAlignment,
};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u32 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
