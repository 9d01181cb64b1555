//! Streaming cursors over worksheet parts
//!
//! [`WorksheetReader`] pulls cells out of a worksheet part one at a time and
//! [`WorksheetWriter`] pushes them in. Both only move forward in row-major
//! order; neither holds more than one row of cells.

mod reader;
mod writer;

pub use reader::WorksheetReader;
pub use writer::WorksheetWriter;

/// Where a worksheet cursor stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamPosition {
    /// Row of the last cell or row seen (0 before the first)
    pub row: u32,
    /// Column of the last cell seen in `row` (0 before the first)
    pub col: u32,
    /// No more cells will be produced or accepted
    pub end_of_data: bool,
}
