//! Prelude module - common imports for sheetstream users
//!
//! ```rust
//! use sheetstream::prelude::*;
//! ```

pub use crate::{
    // Style types
    Alignment,
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
    DocumentProperties,
    // Error types
    Error,
    FillStyle,
    FontStyle,
    FormatTable,
    HorizontalAlignment,
    NumberFormat,
    Result,
    RichText,
    SharedStringTable,
    Style,
    VerticalAlignment,
    // Main types
    Workbook,
    // Extension traits
    WorkbookExt,
    Worksheet,
    // I/O types
    WorksheetReader,
    WorksheetWriter,
    WriterOptions,
    XlsxError,
    XlsxReader,
    XlsxResult,
    XlsxStreamReader,
    XlsxStreamWriter,
    XlsxWriter,
};
