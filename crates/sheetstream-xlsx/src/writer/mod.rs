//! XLSX writer

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use zip::CompressionMethod;

use crate::error::{XlsxError, XlsxResult};
use crate::package::PackageWriter;
use crate::properties::{
    write_app_properties, write_core_properties, DocumentProperties, APP_PROPERTIES_PART,
    CORE_PROPERTIES_PART,
};
use crate::shared_strings::write_shared_strings;
use crate::stream::WorksheetWriter;
use crate::styles::write_styles;
use crate::workbook::{
    worksheet_part, write_content_types, write_root_rels, write_workbook, write_workbook_rels,
    SheetEntry, CONTENT_TYPES_PART, ROOT_RELS_PART, SHARED_STRINGS_PART, STYLES_PART,
    WORKBOOK_PART, WORKBOOK_RELS_PART,
};
use sheetstream_core::{
    validate_sheet_name, Cell, CellValue, DateSystem, FormatTable, SharedStringTable, Workbook,
};

/// Application name recorded in `docProps/app.xml` unless replaced
pub const APPLICATION_NAME: &str = "sheetstream";

/// Options for [`XlsxStreamWriter`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WriterOptions {
    /// Date system written to the workbook part and used to encode dates
    pub date_system: DateSystem,
    /// Compression for every part
    pub compression: CompressionMethod,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            date_system: DateSystem::Windows1900,
            compression: CompressionMethod::Deflated,
        }
    }
}

/// Streaming XLSX writer
///
/// Worksheets are written one after another through [`WorksheetWriter`]s
/// that intern into this writer's string and format tables. The tables, the
/// workbook part and the package manifest are written by
/// [`finish`](Self::finish), after the last sheet.
pub struct XlsxStreamWriter<W: Write + Seek> {
    package: PackageWriter<W>,
    options: WriterOptions,
    strings: SharedStringTable,
    formats: FormatTable,
    sheets: Vec<SheetEntry>,
    closed: Vec<bool>,
    properties: DocumentProperties,
}

impl XlsxStreamWriter<BufWriter<File>> {
    /// Create a package at a file path
    pub fn create_file<P: AsRef<Path>>(path: P, options: WriterOptions) -> XlsxResult<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file), options))
    }
}

impl<W: Write + Seek> XlsxStreamWriter<W> {
    /// Start a package with an empty string table and the default formats
    pub fn new(writer: W, options: WriterOptions) -> Self {
        Self::with_formats(writer, options, FormatTable::new())
    }

    /// Start a package whose format IDs come from an existing table
    pub fn with_formats(writer: W, options: WriterOptions, formats: FormatTable) -> Self {
        Self {
            package: PackageWriter::new(writer, options.compression),
            options,
            strings: SharedStringTable::new(),
            formats,
            sheets: Vec::new(),
            closed: Vec::new(),
            properties: DocumentProperties::new().with_application(APPLICATION_NAME),
        }
    }

    /// Document properties written by [`finish`](Self::finish)
    pub fn properties(&self) -> &DocumentProperties {
        &self.properties
    }

    /// Replace the document properties
    pub fn set_properties(&mut self, properties: DocumentProperties) {
        self.properties = properties;
    }

    pub fn properties_mut(&mut self) -> &mut DocumentProperties {
        &mut self.properties
    }

    /// The string table built so far
    pub fn shared_strings(&self) -> &SharedStringTable {
        &self.strings
    }

    /// The format table built so far
    pub fn formats(&self) -> &FormatTable {
        &self.formats
    }

    /// Mutable format table, e.g. to register named styles up front
    pub fn formats_mut(&mut self) -> &mut FormatTable {
        &mut self.formats
    }

    /// Number of worksheets begun
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Start the next worksheet
    ///
    /// Fails with [`XlsxError::Sequence`] while the previous sheet's writer
    /// has not been closed (including when it was dropped without closing).
    pub fn begin_worksheet(
        &mut self,
        name: &str,
    ) -> XlsxResult<WorksheetWriter<'_, impl Write + '_>> {
        self.check_all_closed()?;
        validate_sheet_name(name)?;
        let lower = name.to_lowercase();
        if self.sheets.iter().any(|s| s.name.to_lowercase() == lower) {
            return Err(sheetstream_core::Error::DuplicateSheetName(name.to_string()).into());
        }

        let index = self.sheets.len();
        self.sheets.push(SheetEntry {
            name: name.to_string(),
            sheet_id: index as u32 + 1,
            rel_id: format!("rId{}", index + 1),
            visible: true,
        });
        self.closed.push(false);
        log::debug!("writing worksheet '{}'", name);

        let part = self.package.create_part(&worksheet_part(index))?;
        let writer = WorksheetWriter::new(
            part,
            &mut self.strings,
            &mut self.formats,
            self.options.date_system,
        )?;
        Ok(writer.with_finished_flag(&mut self.closed[index]))
    }

    /// Hide or show a worksheet already begun
    pub fn set_visible(&mut self, index: usize, visible: bool) -> XlsxResult<()> {
        let count = self.sheets.len();
        let sheet = self
            .sheets
            .get_mut(index)
            .ok_or(sheetstream_core::Error::SheetOutOfBounds(index, count))?;
        sheet.visible = visible;
        Ok(())
    }

    /// Write the workbook-level parts and finalize the package
    ///
    /// Fails with [`XlsxError::Sequence`] if any worksheet was not closed or
    /// no worksheet was written.
    pub fn finish(mut self) -> XlsxResult<W> {
        self.check_all_closed()?;
        if self.sheets.is_empty() {
            return Err(XlsxError::Sequence("a workbook needs at least one worksheet".into()));
        }

        write_shared_strings(self.package.create_part(SHARED_STRINGS_PART)?, &self.strings)?;
        write_styles(self.package.create_part(STYLES_PART)?, &self.formats)?;
        write_workbook(
            self.package.create_part(WORKBOOK_PART)?,
            &self.sheets,
            self.options.date_system,
        )?;
        write_workbook_rels(
            self.package.create_part(WORKBOOK_RELS_PART)?,
            self.sheets.len(),
        )?;
        write_core_properties(
            self.package.create_part(CORE_PROPERTIES_PART)?,
            &self.properties,
        )?;
        write_app_properties(
            self.package.create_part(APP_PROPERTIES_PART)?,
            &self.properties,
        )?;
        write_root_rels(self.package.create_part(ROOT_RELS_PART)?)?;
        // The manifest goes last: a package cut short without it is not a workbook
        write_content_types(
            self.package.create_part(CONTENT_TYPES_PART)?,
            self.sheets.len(),
        )?;

        log::debug!(
            "finished workbook: {} sheets, {} shared strings, {} cell formats",
            self.sheets.len(),
            self.strings.len(),
            self.formats.len()
        );
        self.package.finish()
    }

    fn check_all_closed(&self) -> XlsxResult<()> {
        match self.closed.iter().position(|closed| !closed) {
            Some(i) => Err(XlsxError::Sequence(format!(
                "worksheet '{}' was not closed",
                self.sheets[i].name
            ))),
            None => Ok(()),
        }
    }
}

/// XLSX file writer
///
/// Saves an in-memory [`Workbook`] by streaming each sheet through
/// [`XlsxStreamWriter`]. Strings are re-interned into a fresh table so the
/// written counts reflect exactly the cells saved; format IDs are kept.
pub struct XlsxWriter;

impl XlsxWriter {
    /// Write a workbook to a file path
    pub fn write_file<P: AsRef<Path>>(workbook: &Workbook, path: P) -> XlsxResult<()> {
        let file = File::create(path)?;
        let mut out = Self::write(workbook, BufWriter::new(file))?;
        out.flush()?;
        Ok(())
    }

    /// Write a workbook to a writer, returning the writer
    pub fn write<W: Write + Seek>(workbook: &Workbook, writer: W) -> XlsxResult<W> {
        let options = WriterOptions {
            date_system: workbook.date_system(),
            ..WriterOptions::default()
        };
        let mut stream = XlsxStreamWriter::with_formats(writer, options, workbook.formats().clone());

        for (index, sheet) in workbook.worksheets().enumerate() {
            let mut ws = stream.begin_worksheet(sheet.name())?;
            let mut open_row = None;
            for cell in sheet.iter_cells() {
                if open_row != Some(cell.address.row) {
                    if open_row.is_some() {
                        ws.end_row()?;
                    }
                    ws.begin_row(cell.address.row)?;
                    open_row = Some(cell.address.row);
                }
                match &cell.value {
                    CellValue::SharedString(i) => {
                        let entry = workbook.shared_strings().resolve(*i)?.clone();
                        let remapped = Cell {
                            value: CellValue::SharedString(ws.intern_rich(entry)),
                            ..cell.clone()
                        };
                        ws.write(&remapped)?;
                    }
                    _ => ws.write(cell)?,
                }
            }
            ws.close()?;
            stream.set_visible(index, sheet.is_visible())?;
        }

        stream.finish()
    }
}
