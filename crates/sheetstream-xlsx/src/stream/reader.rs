//! Pull cursor over a worksheet part

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use sheetstream_core::{Cell, CellAddress, CellRange};

use super::StreamPosition;
use crate::codec::{CellCodec, CellElement, CellType};
use crate::error::{XlsxError, XlsxResult};
use crate::xml;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Inside `<sheetData>`, between rows
    SheetData,
    /// Inside `<row>`
    Row(u32),
    /// `<sheetData>` closed, or a previous read failed
    Done,
}

/// What the next sheetData-level event means
enum Step {
    Row { row: Option<u32>, empty: bool },
    RowEnd,
    Cell { element: CellElement, empty: bool },
    SheetDataEnd,
    Eof,
    Other,
}

/// What the next event inside a `<c>` means
enum Body {
    Value,
    EmptyValue,
    Formula,
    Inline,
    Skip(Vec<u8>),
    End,
    Eof,
    Other,
}

/// Streaming reader over one worksheet part
///
/// Cells come out in document order, which must be strictly row-major:
/// a cell at or before the previous one, or outside its enclosing
/// `<row r>`, is a [`XlsxError::Sequence`]. Only cells present in the XML
/// are produced. Cells without `r` take the next column of the current row,
/// rows without `r` the next row.
///
/// At most one decoded cell is buffered (for [`has_next_cell`](Self::has_next_cell));
/// the XML itself is pulled incrementally.
pub struct WorksheetReader<'a, B: BufRead> {
    xml: Reader<B>,
    buf: Vec<u8>,
    codec: CellCodec<'a>,
    dimension: Option<CellRange>,
    state: State,
    last_row: u32,
    last_cell: Option<CellAddress>,
    peeked: Option<Cell>,
    position: StreamPosition,
    cells_read: u64,
}

impl<'a, B: BufRead> WorksheetReader<'a, B> {
    /// Start reading a worksheet part, consuming everything up to `<sheetData>`
    pub fn open(source: B, codec: CellCodec<'a>) -> XlsxResult<Self> {
        let mut xml = xml::reader(source);
        let mut buf = Vec::new();
        let mut dimension = None;

        let state = loop {
            let next = match xml.read_event_into(&mut buf)? {
                Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"dimension" => {
                    if let Some(r) = xml::attr(&e, b"ref")? {
                        match CellRange::parse(&r) {
                            Ok(range) => dimension = Some(range),
                            Err(_) => log::warn!("ignoring unusable dimension '{}'", r),
                        }
                    }
                    None
                }
                Event::Start(e) if e.local_name().as_ref() == b"sheetData" => Some(State::SheetData),
                Event::Empty(e) if e.local_name().as_ref() == b"sheetData" => Some(State::Done),
                Event::Eof => {
                    return Err(XlsxError::InvalidFile(
                        "worksheet part has no <sheetData>".into(),
                    ))
                }
                _ => None,
            };
            buf.clear();
            if let Some(state) = next {
                break state;
            }
        };

        Ok(Self {
            xml,
            buf,
            codec,
            dimension,
            state,
            last_row: 0,
            last_cell: None,
            peeked: None,
            position: StreamPosition {
                end_of_data: state == State::Done,
                ..StreamPosition::default()
            },
            cells_read: 0,
        })
    }

    /// The `<dimension ref>` declared by the part, if any
    ///
    /// Only a hint; nothing checks that cells fall inside it.
    pub fn dimension(&self) -> Option<CellRange> {
        self.dimension
    }

    /// Position of the last cell handed out
    pub fn position(&self) -> StreamPosition {
        self.position
    }

    /// Number of cells handed out so far
    pub fn cells_read(&self) -> u64 {
        self.cells_read
    }

    /// Check whether another cell follows, reading ahead by one cell
    pub fn has_next_cell(&mut self) -> XlsxResult<bool> {
        Ok(self.peek_cell()?.is_some())
    }

    /// Look at the next cell without consuming it
    pub fn peek_cell(&mut self) -> XlsxResult<Option<&Cell>> {
        if self.peeked.is_none() {
            self.peeked = self.advance()?;
        }
        Ok(self.peeked.as_ref())
    }

    /// Read the next cell, failing if there is none
    pub fn read_cell(&mut self) -> XlsxResult<Cell> {
        self.next_cell()?
            .ok_or_else(|| XlsxError::Sequence("no cell left to read".into()))
    }

    /// Read the next cell, `None` at the end of the sheet data
    pub fn next_cell(&mut self) -> XlsxResult<Option<Cell>> {
        let next = match self.peeked.take() {
            Some(cell) => Some(cell),
            None => self.advance()?,
        };
        match &next {
            Some(cell) => {
                self.position.row = cell.address.row;
                self.position.col = cell.address.col;
                self.cells_read += 1;
            }
            None => self.position.end_of_data = true,
        }
        Ok(next)
    }

    /// Read every cell of the next non-empty row
    pub fn next_row(&mut self) -> XlsxResult<Option<Vec<Cell>>> {
        let Some(first) = self.next_cell()? else {
            return Ok(None);
        };
        let row = first.address.row;
        let mut cells = vec![first];
        while let Some(next) = self.peek_cell()? {
            if next.address.row != row {
                break;
            }
            cells.push(self.read_cell()?);
        }
        Ok(Some(cells))
    }

    /// Release the part stream
    pub fn close(self) {
        log::debug!("closed worksheet reader after {} cells", self.cells_read);
    }

    fn advance(&mut self) -> XlsxResult<Option<Cell>> {
        loop {
            if self.state == State::Done {
                return Ok(None);
            }

            let step = match self.xml.read_event_into(&mut self.buf)? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"row" => Step::Row {
                        row: row_number(&e)?,
                        empty: false,
                    },
                    b"c" => Step::Cell {
                        element: cell_header(&e)?,
                        empty: false,
                    },
                    _ => Step::Other,
                },
                Event::Empty(e) => match e.local_name().as_ref() {
                    b"row" => Step::Row {
                        row: row_number(&e)?,
                        empty: true,
                    },
                    b"c" => Step::Cell {
                        element: cell_header(&e)?,
                        empty: true,
                    },
                    _ => Step::Other,
                },
                Event::End(e) => match e.local_name().as_ref() {
                    b"row" => Step::RowEnd,
                    b"sheetData" => Step::SheetDataEnd,
                    _ => Step::Other,
                },
                Event::Eof => Step::Eof,
                _ => Step::Other,
            };
            self.buf.clear();

            match step {
                Step::Row { row, empty } => self.begin_row(row, empty)?,
                Step::RowEnd => self.state = State::SheetData,
                Step::Cell { mut element, empty } => {
                    if !empty {
                        self.read_cell_body(&mut element)?;
                    }
                    return self.finish_cell(element).map(Some);
                }
                Step::SheetDataEnd => {
                    self.state = State::Done;
                    return Ok(None);
                }
                Step::Eof => {
                    return Err(XlsxError::InvalidFile(
                        "worksheet part ended inside <sheetData>".into(),
                    ))
                }
                Step::Other => {}
            }
        }
    }

    fn begin_row(&mut self, row: Option<u32>, empty: bool) -> XlsxResult<()> {
        if let State::Row(open) = self.state {
            return Err(XlsxError::Sequence(format!("row nested inside row {}", open)));
        }
        let row = row.unwrap_or(self.last_row + 1);
        if row <= self.last_row {
            return Err(XlsxError::Sequence(format!(
                "row {} follows row {}",
                row, self.last_row
            )));
        }
        self.last_row = row;
        if !empty {
            self.state = State::Row(row);
        }
        Ok(())
    }

    fn finish_cell(&mut self, element: CellElement) -> XlsxResult<Cell> {
        let State::Row(row) = self.state else {
            return Err(XlsxError::Sequence("cell outside of a <row>".into()));
        };

        let address = match element.reference {
            Some(address) => address,
            None => {
                let col = match self.last_cell {
                    Some(last) if last.row == row => last.col + 1,
                    _ => 1,
                };
                CellAddress::new(row, col)?
            }
        };

        if address.row != row {
            return Err(XlsxError::Sequence(format!(
                "cell {} inside row {}",
                address, row
            )));
        }
        if let Some(last) = self.last_cell {
            if address <= last {
                return Err(XlsxError::Sequence(format!(
                    "cell {} follows cell {}",
                    address, last
                )));
            }
        }
        self.last_cell = Some(address);

        let value = self.codec.decode(&element)?;
        Ok(Cell {
            address,
            value,
            format_id: element.format_id(),
            formula: element.formula,
        })
    }

    fn read_cell_body(&mut self, element: &mut CellElement) -> XlsxResult<()> {
        loop {
            let body = match self.xml.read_event_into(&mut self.buf)? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"v" => Body::Value,
                    b"f" => Body::Formula,
                    b"is" => Body::Inline,
                    other => Body::Skip(other.to_vec()),
                },
                Event::Empty(e) if e.local_name().as_ref() == b"v" => Body::EmptyValue,
                Event::End(e) if e.local_name().as_ref() == b"c" => Body::End,
                Event::Eof => Body::Eof,
                _ => Body::Other,
            };
            self.buf.clear();

            match body {
                Body::Value => {
                    element.value = Some(xml::read_text(&mut self.xml, &mut self.buf, b"v")?)
                }
                Body::EmptyValue => element.value = Some(String::new()),
                Body::Formula => {
                    element.formula = Some(xml::read_text(&mut self.xml, &mut self.buf, b"f")?)
                }
                Body::Inline => {
                    element.inline_text = Some(read_inline(&mut self.xml, &mut self.buf)?)
                }
                Body::Skip(name) => xml::skip_element(&mut self.xml, &mut self.buf, &name)?,
                Body::End => return Ok(()),
                Body::Eof => {
                    return Err(XlsxError::InvalidFile(
                        "worksheet part ended inside <c>".into(),
                    ))
                }
                Body::Other => {}
            }
        }
    }
}

impl<'a, B: BufRead> Iterator for WorksheetReader<'a, B> {
    type Item = XlsxResult<Cell>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_cell() {
            Ok(cell) => cell.map(Ok),
            Err(e) => {
                self.state = State::Done;
                self.peeked = None;
                Some(Err(e))
            }
        }
    }
}

fn row_number(e: &BytesStart<'_>) -> XlsxResult<Option<u32>> {
    match xml::attr(e, b"r")? {
        None => Ok(None),
        Some(r) => r
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|&n| n >= 1)
            .map(Some)
            .ok_or_else(|| XlsxError::InvalidFile(format!("invalid row number '{}'", r))),
    }
}

fn cell_header(e: &BytesStart<'_>) -> XlsxResult<CellElement> {
    let mut element = CellElement::default();
    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?;
        match attr.key.local_name().as_ref() {
            b"r" => {
                element.reference = Some(CellAddress::parse(&value).map_err(|_| {
                    XlsxError::MalformedCell(format!("invalid cell reference '{}'", value))
                })?)
            }
            b"t" => element.cell_type = Some(CellType::parse(&value)?),
            b"s" => {
                element.style = Some(value.trim().parse().map_err(|_| {
                    XlsxError::MalformedCell(format!("invalid style index '{}'", value))
                })?)
            }
            _ => {}
        }
    }
    Ok(element)
}

/// Concatenated `<t>` text of an `<is>` element, without phonetic runs
fn read_inline<B: BufRead>(xml: &mut Reader<B>, buf: &mut Vec<u8>) -> XlsxResult<String> {
    enum Inline {
        Text,
        Phonetic,
        End,
        Eof,
        Other,
    }

    let mut text = String::new();
    loop {
        let step = match xml.read_event_into(buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"t" => Inline::Text,
                b"rPh" => Inline::Phonetic,
                _ => Inline::Other,
            },
            Event::End(e) if e.local_name().as_ref() == b"is" => Inline::End,
            Event::Eof => Inline::Eof,
            _ => Inline::Other,
        };
        buf.clear();

        match step {
            Inline::Text => text.push_str(&xml::read_text(xml, buf, b"t")?),
            Inline::Phonetic => xml::skip_element(xml, buf, b"rPh")?,
            Inline::End => return Ok(text),
            Inline::Eof => {
                return Err(XlsxError::InvalidFile(
                    "worksheet part ended inside <is>".into(),
                ))
            }
            Inline::Other => {}
        }
    }
}
