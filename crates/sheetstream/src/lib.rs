//! # sheetstream
//!
//! Streaming XLSX reading and writing.
//!
//! Cells move through a worksheet one at a time in row-major order, so a
//! sheet of any size is read or written with memory bounded by a single row.
//! Strings are deduplicated through a workbook-wide shared string table and
//! formatting through a workbook-wide format table.
//!
//! ## Features
//!
//! - Forward-only worksheet reader and writer with order enforcement
//! - Shared strings, including rich text runs
//! - Fonts, fills, borders, alignment, protection and number formats
//! - Both date systems (1900 and 1904)
//! - An in-memory [`Workbook`] built on the streaming components
//!
//! ## Example
//!
//! ```rust
//! use sheetstream::prelude::*;
//! use std::io::Cursor;
//!
//! let mut workbook = Workbook::new();
//! workbook.set_string(0, "A1", "Total").unwrap();
//! let sheet = workbook.worksheet_mut(0).unwrap();
//! sheet.set_cell_value("B1", 42.0).unwrap();
//! sheet.set_cell_formula("C1", "=B1*2").unwrap();
//!
//! let buf = XlsxWriter::write(&workbook, Cursor::new(Vec::new())).unwrap();
//! let back = XlsxReader::read(Cursor::new(buf.into_inner())).unwrap();
//! let b1 = back.worksheet(0).unwrap().get_value("B1").unwrap();
//! assert_eq!(b1.as_number(), Some(42.0));
//! ```

pub mod prelude;

// Re-export core types
pub use sheetstream_core::{
    validate_sheet_name,
    Alignment,
    ApplyFlags,
    BorderEdge,
    BorderLineStyle,
    BorderStyle,
    // Cell types
    Cell,
    CellAddress,
    CellError,
    CellRange,
    CellValue,
    Color,
    DateSystem,
    DateValue,
    // Error types
    Error,
    FillStyle,
    FontStyle,
    FontVerticalAlign,
    FormatRecord,
    FormatTable,
    HorizontalAlignment,
    NamedStyle,
    NumberFormat,
    PatternType,
    Protection,
    Result,
    RichText,
    SharedStringTable,
    // Style types
    Style,
    TextRun,
    Underline,
    VerticalAlignment,
    // Main types
    Workbook,
    WorkbookSettings,
    Worksheet,
    MAX_COLS,
    // Constants
    MAX_ROWS,
    MAX_SHEET_NAME_LEN,
};

// Re-export I/O types
pub use sheetstream_xlsx::{
    DocumentProperties, StreamPosition, WorksheetReader, WorksheetWriter, WriterOptions, XlsxError, XlsxReader,
    XlsxResult, XlsxStreamReader, XlsxStreamWriter, XlsxWriter,
};

use std::path::Path;

/// Extension trait for Workbook to add file I/O
pub trait WorkbookExt {
    /// Open a workbook from an `.xlsx` file
    fn open<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook>;

    /// Save the workbook to an `.xlsx` file
    fn save<P: AsRef<Path>>(&self, path: P) -> XlsxResult<()>;
}

impl WorkbookExt for Workbook {
    fn open<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        let path = path.as_ref();
        check_extension(path)?;
        XlsxReader::read_file(path)
    }

    fn save<P: AsRef<Path>>(&self, path: P) -> XlsxResult<()> {
        let path = path.as_ref();
        check_extension(path)?;
        XlsxWriter::write_file(self, path)
    }
}

fn check_extension(path: &Path) -> XlsxResult<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        Some("xlsx") | Some("xlsm") => Ok(()),
        _ => Err(XlsxError::InvalidFile(format!(
            "Unsupported file format: {}",
            path.display()
        ))),
    }
}
