//! # sheetstream-xlsx
//!
//! Streaming XLSX (Office Open XML) reader and writer for sheetstream.
//!
//! Worksheets are read and written one cell at a time through
//! [`WorksheetReader`] and [`WorksheetWriter`], which never hold more than a
//! row. The workbook-scoped shared string and format tables are loaded
//! before the first sheet is read and written after the last one.
//!
//! ## Example
//!
//! ```rust
//! use std::io::Cursor;
//! use sheetstream_core::{CellAddress, CellValue, Style};
//! use sheetstream_xlsx::{WriterOptions, XlsxStreamReader, XlsxStreamWriter};
//!
//! let mut writer = XlsxStreamWriter::new(Cursor::new(Vec::new()), WriterOptions::default());
//! let mut sheet = writer.begin_worksheet("Report").unwrap();
//! sheet.begin_row(1).unwrap();
//! sheet.write_string(CellAddress::parse("A1").unwrap(), "Total", 0).unwrap();
//! sheet
//!     .write_styled(CellAddress::parse("B1").unwrap(), &CellValue::Number(12.5), &Style::new().bold(true))
//!     .unwrap();
//! sheet.close().unwrap();
//! let bytes = writer.finish().unwrap().into_inner();
//!
//! let mut reader = XlsxStreamReader::open(Cursor::new(bytes)).unwrap();
//! let mut cells = reader.worksheet_by_name("Report").unwrap();
//! let first = cells.next_cell().unwrap().unwrap();
//! assert_eq!(first.address, CellAddress::parse("A1").unwrap());
//! ```

pub mod codec;
pub mod error;
pub mod package;
pub mod properties;
pub mod reader;
pub mod stream;
pub mod writer;

mod escape;
mod shared_strings;
mod styles;
mod workbook;
mod xml;

pub use codec::{CellCodec, CellElement, CellType};
pub use error::{XlsxError, XlsxResult};
pub use package::{PackageReader, PackageWriter};
pub use properties::DocumentProperties;
pub use reader::{XlsxReader, XlsxStreamReader};
pub use stream::{StreamPosition, WorksheetReader, WorksheetWriter};
pub use writer::{WriterOptions, XlsxStreamWriter, XlsxWriter};
