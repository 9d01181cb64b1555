//! Push cursor producing a worksheet part

use std::io::Write;

use sheetstream_core::{
    Cell, CellAddress, CellValue, DateSystem, FormatTable, NumberFormat, RichText,
    SharedStringTable, Style, MAX_ROWS,
};

use super::StreamPosition;
use crate::codec::{CellCodec, CellElement};
use crate::error::{XlsxError, XlsxResult};
use crate::xml::{self, XML_DECLARATION};

/// Streaming writer for one worksheet part
///
/// Rows are opened and closed explicitly and cells must arrive in strictly
/// increasing row-major order; anything else is a [`XlsxError::Sequence`].
/// Each row is buffered until [`end_row`](Self::end_row) and then written
/// through, so memory use is bounded by the widest row.
///
/// The writer holds exclusive borrows of the workbook's string and format
/// tables and interns into them as a side effect. It never writes those
/// tables out; that happens once for the whole workbook.
pub struct WorksheetWriter<'a, W: Write> {
    out: W,
    strings: &'a mut SharedStringTable,
    formats: &'a mut FormatTable,
    date_system: DateSystem,
    row_xml: String,
    open_row: Option<u32>,
    last_row: u32,
    last_cell: Option<CellAddress>,
    cells_written: u64,
    finished: Option<&'a mut bool>,
}

impl<'a, W: Write> WorksheetWriter<'a, W> {
    /// Start a worksheet part, writing everything up to `<sheetData>`
    pub fn new(
        mut out: W,
        strings: &'a mut SharedStringTable,
        formats: &'a mut FormatTable,
        date_system: DateSystem,
    ) -> XlsxResult<Self> {
        let header = format!(
            "{}\n<worksheet xmlns=\"{}\" xmlns:r=\"{}\"><sheetData>",
            XML_DECLARATION,
            xml::NS_MAIN,
            xml::NS_RELATIONSHIPS
        );
        out.write_all(header.as_bytes())?;

        Ok(Self {
            out,
            strings,
            formats,
            date_system,
            row_xml: String::new(),
            open_row: None,
            last_row: 0,
            last_cell: None,
            cells_written: 0,
            finished: None,
        })
    }

    /// Flag to raise once the part has been closed properly
    pub(crate) fn with_finished_flag(mut self, flag: &'a mut bool) -> Self {
        self.finished = Some(flag);
        self
    }

    /// Position of the last row or cell written
    pub fn position(&self) -> StreamPosition {
        StreamPosition {
            row: self.last_row,
            col: self
                .last_cell
                .filter(|c| c.row == self.last_row)
                .map_or(0, |c| c.col),
            end_of_data: false,
        }
    }

    /// Number of cells written so far
    pub fn cells_written(&self) -> u64 {
        self.cells_written
    }

    /// The string table cells are interned into
    pub fn shared_strings(&self) -> &SharedStringTable {
        self.strings
    }

    /// The format table styles are interned into
    pub fn formats(&self) -> &FormatTable {
        self.formats
    }

    /// Open row `row` (1-based)
    ///
    /// Fails while another row is open or if `row` does not come after the
    /// previous row.
    pub fn begin_row(&mut self, row: u32) -> XlsxResult<()> {
        if let Some(open) = self.open_row {
            return Err(XlsxError::Sequence(format!(
                "cannot begin row {} while row {} is open",
                row, open
            )));
        }
        if row == 0 || row > MAX_ROWS {
            return Err(sheetstream_core::Error::RowOutOfBounds(row, MAX_ROWS).into());
        }
        if row <= self.last_row {
            return Err(XlsxError::Sequence(format!(
                "row {} does not follow row {}",
                row, self.last_row
            )));
        }

        self.row_xml.push_str(&format!("<row r=\"{}\">", row));
        self.open_row = Some(row);
        self.last_row = row;
        Ok(())
    }

    /// Close the open row and write it through
    pub fn end_row(&mut self) -> XlsxResult<()> {
        if self.open_row.take().is_none() {
            return Err(XlsxError::Sequence("no row is open".into()));
        }
        self.row_xml.push_str("</row>");
        self.out.write_all(self.row_xml.as_bytes())?;
        self.row_xml.clear();
        Ok(())
    }

    /// Write a value with a format ID
    ///
    /// A `SharedString` index must already be in this writer's table and is
    /// not counted as a new reference; use [`write_string`](Self::write_string)
    /// for text.
    pub fn write_cell(
        &mut self,
        address: CellAddress,
        value: &CellValue,
        format_id: u32,
    ) -> XlsxResult<()> {
        self.emit(address, value, format_id, None)
    }

    /// Write a cell with formula text and its cached result
    pub fn write_formula(
        &mut self,
        address: CellAddress,
        formula: &str,
        cached: &CellValue,
        format_id: u32,
    ) -> XlsxResult<()> {
        let formula = formula.strip_prefix('=').unwrap_or(formula);
        self.emit(address, cached, format_id, Some(formula))
    }

    /// Write a whole cell: value, format and formula
    pub fn write(&mut self, cell: &Cell) -> XlsxResult<()> {
        self.emit(
            cell.address,
            &cell.value,
            cell.format_id,
            cell.formula.as_deref(),
        )
    }

    /// Intern `text` and write it as a shared string
    ///
    /// Nothing is interned when the cell is rejected.
    pub fn write_string(
        &mut self,
        address: CellAddress,
        text: &str,
        format_id: u32,
    ) -> XlsxResult<u32> {
        self.check_position(address)?;
        self.formats.is_date_format(format_id)?;
        let index = self.strings.intern(text);
        self.emit(address, &CellValue::SharedString(index), format_id, None)?;
        Ok(index)
    }

    /// Intern a rich-text entry and write it as a shared string
    pub fn write_rich_string(
        &mut self,
        address: CellAddress,
        text: RichText,
        format_id: u32,
    ) -> XlsxResult<u32> {
        self.check_position(address)?;
        self.formats.is_date_format(format_id)?;
        let index = self.strings.intern_rich(text);
        self.emit(address, &CellValue::SharedString(index), format_id, None)?;
        Ok(index)
    }

    /// Intern `style` and write the value with the resulting format ID
    ///
    /// The value is checked against the style first, so a rejected cell
    /// leaves the format table as it was.
    pub fn write_styled(
        &mut self,
        address: CellAddress,
        value: &CellValue,
        style: &Style,
    ) -> XlsxResult<u32> {
        self.check_position(address)?;
        let number_format = match &style.number_format {
            NumberFormat::BuiltIn(id) => self.formats.number_format(*id)?,
            other => other.clone(),
        };
        CellCodec::new(self.strings, self.formats, self.date_system)
            .check_value(value, number_format.is_date_format())?;
        let format_id = self.formats.intern_style(style)?;
        self.emit(address, value, format_id, None)?;
        Ok(format_id)
    }

    /// Intern an entry without writing a cell, for callers remapping
    /// indices from another table
    pub(crate) fn intern_rich(&mut self, text: RichText) -> u32 {
        self.strings.intern_rich(text)
    }

    /// Finish the part, ending any open row, and return the output
    pub fn close(mut self) -> XlsxResult<W> {
        if self.open_row.is_some() {
            self.end_row()?;
        }
        self.out.write_all(b"</sheetData></worksheet>")?;
        self.out.flush()?;
        if let Some(flag) = self.finished.take() {
            *flag = true;
        }
        log::debug!("closed worksheet writer after {} cells", self.cells_written);
        Ok(self.out)
    }

    fn check_position(&self, address: CellAddress) -> XlsxResult<()> {
        let Some(row) = self.open_row else {
            return Err(XlsxError::Sequence(format!(
                "cell {} written while no row is open",
                address
            )));
        };
        if address.row != row {
            return Err(XlsxError::Sequence(format!(
                "cell {} written into row {}",
                address, row
            )));
        }
        if let Some(last) = self.last_cell {
            if address <= last {
                return Err(XlsxError::Sequence(format!(
                    "cell {} written after cell {}",
                    address, last
                )));
            }
        }
        Ok(())
    }

    fn emit(
        &mut self,
        address: CellAddress,
        value: &CellValue,
        format_id: u32,
        formula: Option<&str>,
    ) -> XlsxResult<()> {
        self.check_position(address)?;
        let codec = CellCodec::new(self.strings, self.formats, self.date_system);
        let element = codec.encode(value, format_id)?;

        push_cell(&mut self.row_xml, address, &element, formula);
        self.last_cell = Some(address);
        self.cells_written += 1;
        Ok(())
    }
}

fn push_cell(xml: &mut String, address: CellAddress, element: &CellElement, formula: Option<&str>) {
    xml.push_str(&format!("<c r=\"{}\"", address));
    if let Some(style) = element.style {
        xml.push_str(&format!(" s=\"{}\"", style));
    }
    if let Some(cell_type) = element.cell_type {
        xml.push_str(&format!(" t=\"{}\"", cell_type));
    }

    if formula.is_none() && element.value.is_none() && element.inline_text.is_none() {
        xml.push_str("/>");
        return;
    }
    xml.push('>');

    if let Some(f) = formula {
        xml.push_str(&format!("<f>{}</f>", xml::escape_text(f)));
    }
    if let Some(v) = &element.value {
        xml.push_str(&format!("<v>{}</v>", xml::escape_text(v)));
    }
    if let Some(text) = &element.inline_text {
        if xml::needs_preserve(text) {
            xml.push_str(&format!(
                "<is><t xml:space=\"preserve\">{}</t></is>",
                xml::escape_text(text)
            ));
        } else {
            xml.push_str(&format!("<is><t>{}</t></is>", xml::escape_text(text)));
        }
    }
    xml.push_str("</c>");
}
