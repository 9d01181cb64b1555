//! XLSX error types

use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur during XLSX reading/writing
#[derive(Debug, Error)]
pub enum XlsxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed XML attribute
    #[error("XML attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    /// A `<c>` element whose payload does not match its type
    #[error("Malformed cell: {0}")]
    MalformedCell(String),

    /// Cells or rows out of row-major order, or a cursor used in the wrong state
    #[error("Sequence error: {0}")]
    Sequence(String),

    /// An index into the shared string or format table that does not exist
    #[error("Index out of range: {0}")]
    OutOfRange(String),

    /// The package is not a usable workbook (missing or unreadable part)
    #[error("Invalid XLSX file: {0}")]
    InvalidFile(String),

    /// Core error
    #[error("Core error: {0}")]
    Core(sheetstream_core::Error),
}

impl From<sheetstream_core::Error> for XlsxError {
    fn from(err: sheetstream_core::Error) -> Self {
        match err {
            e @ sheetstream_core::Error::OutOfRange { .. } => XlsxError::OutOfRange(e.to_string()),
            e => XlsxError::Core(e),
        }
    }
}
