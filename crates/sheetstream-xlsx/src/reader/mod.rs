//! XLSX reader

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek};
use std::path::Path;

use crate::codec::CellCodec;
use crate::error::{XlsxError, XlsxResult};
use crate::package::PackageReader;
use crate::properties::{read_properties, DocumentProperties};
use crate::shared_strings::read_shared_strings;
use crate::stream::WorksheetReader;
use crate::styles::read_styles;
use crate::workbook::{
    read_relationships, read_workbook, rels_part_for, RelKind, CONTENT_TYPES_PART,
    ROOT_RELS_PART, SHARED_STRINGS_PART, STYLES_PART, WORKBOOK_PART,
};
use sheetstream_core::{
    DateSystem, FormatTable, SharedStringTable, Workbook, WorkbookSettings, Worksheet,
};

/// A worksheet listed in the workbook part, with its resolved part name
#[derive(Debug, Clone)]
struct SheetInfo {
    name: String,
    part: String,
    visible: bool,
}

/// Streaming access to an XLSX package
///
/// Opening reads the workbook-level parts (sheet list, shared strings,
/// styles) in full. Worksheets are then read one at a time through
/// [`WorksheetReader`] without materializing their cells.
pub struct XlsxStreamReader<R: Read + Seek> {
    package: PackageReader<R>,
    sheets: Vec<SheetInfo>,
    date_system: DateSystem,
    strings: SharedStringTable,
    formats: FormatTable,
    properties: DocumentProperties,
}

impl XlsxStreamReader<BufReader<File>> {
    /// Open a package from a file path
    pub fn open_file<P: AsRef<Path>>(path: P) -> XlsxResult<Self> {
        let file = File::open(path)?;
        Self::open(BufReader::new(file))
    }
}

impl<R: Read + Seek> XlsxStreamReader<R> {
    /// Open a package and load its workbook-level parts
    ///
    /// Fails with [`XlsxError::InvalidFile`] when the content-types manifest,
    /// the workbook part or a worksheet part it lists is missing.
    pub fn open(reader: R) -> XlsxResult<Self> {
        let mut package = PackageReader::new(reader)?;

        if !package.has_part(CONTENT_TYPES_PART) {
            return Err(XlsxError::InvalidFile(format!(
                "missing {}",
                CONTENT_TYPES_PART
            )));
        }

        let root_rels = match package.open_optional_part(ROOT_RELS_PART)? {
            Some(source) => read_relationships(source, "")?,
            None => Vec::new(),
        };
        let workbook_part = root_rels
            .iter()
            .find(|r| r.kind == RelKind::OfficeDocument)
            .map_or_else(|| WORKBOOK_PART.to_string(), |r| r.target.clone());

        let mut properties = DocumentProperties::new();
        for rel in root_rels.iter().filter(|r| {
            matches!(r.kind, RelKind::CoreProperties | RelKind::ExtendedProperties)
        }) {
            match package.open_optional_part(&rel.target)? {
                Some(source) => read_properties(source, &mut properties)?,
                None => log::warn!("document properties part '{}' is missing", rel.target),
            }
        }

        let workbook = read_workbook(package.open_part(&workbook_part)?)?;
        let rels = match package.open_optional_part(&rels_part_for(&workbook_part))? {
            Some(source) => read_relationships(source, &workbook_part)?,
            None => Vec::new(),
        };
        let target_of = |kind: RelKind, fallback: &str| {
            rels.iter()
                .find(|r| r.kind == kind)
                .map_or_else(|| fallback.to_string(), |r| r.target.clone())
        };

        let mut sheets = Vec::with_capacity(workbook.sheets.len());
        for entry in workbook.sheets {
            let rel = rels
                .iter()
                .find(|r| r.id == entry.rel_id && r.kind == RelKind::Worksheet)
                .ok_or_else(|| {
                    XlsxError::InvalidFile(format!(
                        "sheet '{}' has no worksheet relationship '{}'",
                        entry.name, entry.rel_id
                    ))
                })?;
            if !package.has_part(&rel.target) {
                return Err(XlsxError::InvalidFile(format!(
                    "missing worksheet part '{}' for sheet '{}'",
                    rel.target, entry.name
                )));
            }
            sheets.push(SheetInfo {
                name: entry.name,
                part: rel.target.clone(),
                visible: entry.visible,
            });
        }

        let strings_part = target_of(RelKind::SharedStrings, SHARED_STRINGS_PART);
        let strings = match package.open_optional_part(&strings_part)? {
            Some(source) => read_shared_strings(source)?,
            None => SharedStringTable::new(),
        };
        let styles_part = target_of(RelKind::Styles, STYLES_PART);
        let formats = match package.open_optional_part(&styles_part)? {
            Some(source) => read_styles(source)?,
            None => FormatTable::new(),
        };

        log::debug!(
            "opened workbook with {} sheets, {} shared strings, {} cell formats",
            sheets.len(),
            strings.len(),
            formats.len()
        );

        Ok(Self {
            package,
            sheets,
            date_system: workbook.date_system,
            strings,
            formats,
            properties,
        })
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|s| s.name.as_str())
    }

    /// Number of worksheets
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Whether the sheet at `index` is visible (`None` if out of bounds)
    pub fn is_sheet_visible(&self, index: usize) -> Option<bool> {
        self.sheets.get(index).map(|s| s.visible)
    }

    /// The workbook's date system
    pub fn date_system(&self) -> DateSystem {
        self.date_system
    }

    /// Document properties from `docProps/core.xml` and `docProps/app.xml`
    ///
    /// Fields the package does not carry are `None`.
    pub fn properties(&self) -> &DocumentProperties {
        &self.properties
    }

    /// The shared string table, replayed positionally
    pub fn shared_strings(&self) -> &SharedStringTable {
        &self.strings
    }

    /// The format table, replayed positionally
    pub fn formats(&self) -> &FormatTable {
        &self.formats
    }

    /// Start reading the worksheet at `index`
    ///
    /// The returned reader borrows this one until it is dropped, so only one
    /// worksheet can be open at a time.
    pub fn worksheet(
        &mut self,
        index: usize,
    ) -> XlsxResult<WorksheetReader<'_, impl BufRead + '_>> {
        let info = self.sheets.get(index).ok_or(sheetstream_core::Error::SheetOutOfBounds(
            index,
            self.sheets.len(),
        ))?;
        log::debug!("reading worksheet '{}' from {}", info.name, info.part);

        let source = self.package.open_part(&info.part)?;
        let codec = CellCodec::new(&self.strings, &self.formats, self.date_system);
        WorksheetReader::open(source, codec)
    }

    /// Start reading the worksheet named `name`
    pub fn worksheet_by_name(
        &mut self,
        name: &str,
    ) -> XlsxResult<WorksheetReader<'_, impl BufRead + '_>> {
        let index = self
            .sheets
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| sheetstream_core::Error::SheetNotFound(name.to_string()))?;
        self.worksheet(index)
    }

    /// Give up the package and keep the workbook tables
    pub fn into_tables(self) -> (SharedStringTable, FormatTable) {
        (self.strings, self.formats)
    }
}

/// XLSX file reader
///
/// Loads a whole workbook into memory by driving [`XlsxStreamReader`] over
/// every sheet.
pub struct XlsxReader;

impl XlsxReader {
    /// Read a workbook from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    /// Read a workbook from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Workbook> {
        let mut stream = XlsxStreamReader::open(reader)?;

        let mut worksheets = Vec::with_capacity(stream.sheet_count());
        for index in 0..stream.sheet_count() {
            let info = stream.sheets[index].clone();
            let mut sheet = Worksheet::new(info.name);
            sheet.set_visible(info.visible);
            for cell in stream.worksheet(index)? {
                sheet.insert_cell(cell?);
            }
            worksheets.push(sheet);
        }

        let settings = WorkbookSettings {
            date_system: stream.date_system(),
        };
        let (strings, formats) = stream.into_tables();
        Ok(Workbook::from_parts(worksheets, settings, strings, formats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetstream_core::{CellValue, DateValue};
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    const CONTENT_TYPES: &str = r#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/></Types>"#;
    const ROOT_RELS: &str = r#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;
    const WORKBOOK: &str = r#"<?xml version="1.0"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><workbookPr date1904="1"/><sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/><sheet name="Hidden" sheetId="2" state="hidden" r:id="rId2"/></sheets></workbook>"#;
    const WORKBOOK_RELS: &str = r#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/></Relationships>"#;
    const SHEET1: &str = r#"<?xml version="1.0"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><dimension ref="A1:B2"/><sheetData><row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1"><v>42</v></c></row><row r="2"><c r="B2" s="0"><v>1.5</v></c></row></sheetData></worksheet>"#;
    const SHEET2: &str = r#"<?xml version="1.0"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData/></worksheet>"#;
    const SST: &str = r#"<?xml version="1.0"?><sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="1" uniqueCount="1"><si><t>Total</t></si></sst>"#;

    fn package(parts: &[(&str, &str)]) -> Cursor<Vec<u8>> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in parts {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        let mut cursor = zip.finish().unwrap();
        cursor.set_position(0);
        cursor
    }

    fn full_package() -> Vec<(&'static str, &'static str)> {
        vec![
            ("[Content_Types].xml", CONTENT_TYPES),
            ("_rels/.rels", ROOT_RELS),
            ("xl/workbook.xml", WORKBOOK),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
            ("xl/worksheets/sheet1.xml", SHEET1),
            ("xl/worksheets/sheet2.xml", SHEET2),
            ("xl/sharedStrings.xml", SST),
        ]
    }

    #[test]
    fn test_stream_reader() {
        let mut reader = XlsxStreamReader::open(package(&full_package())).unwrap();
        assert_eq!(reader.sheet_names().collect::<Vec<_>>(), vec!["Sheet1", "Hidden"]);
        assert_eq!(reader.date_system(), DateSystem::Mac1904);
        assert_eq!(reader.is_sheet_visible(1), Some(false));
        // No styles part: the default table
        assert_eq!(reader.formats().len(), 1);

        {
            let mut sheet = reader.worksheet_by_name("Sheet1").unwrap();
            assert_eq!(sheet.dimension().map(|d| d.to_string()), Some("A1:B2".to_string()));
            let row = sheet.next_row().unwrap().unwrap();
            assert_eq!(row.len(), 2);
            assert_eq!(row[0].value, CellValue::SharedString(0));
            let last = sheet.next_cell().unwrap().unwrap();
            assert_eq!(last.value, CellValue::Number(1.5));
            assert!(sheet.next_cell().unwrap().is_none());
        }
        // The first sheet reader is gone, so the package can be reopened
        let mut again = reader.worksheet(0).unwrap();
        assert!(again.next_cell().unwrap().is_some());
        drop(again);

        assert!(reader.worksheet(1).unwrap().next_cell().unwrap().is_none());
        assert!(matches!(reader.worksheet(2).err(), Some(XlsxError::Core(_))));
        assert!(matches!(
            reader.worksheet_by_name("Nope").err(),
            Some(XlsxError::Core(_))
        ));
    }

    #[test]
    fn test_read_workbook() {
        let workbook = XlsxReader::read(package(&full_package())).unwrap();
        assert_eq!(workbook.sheet_count(), 2);
        assert_eq!(workbook.date_system(), DateSystem::Mac1904);
        assert!(!workbook.worksheet(1).unwrap().is_visible());

        let sheet = workbook.worksheet(0).unwrap();
        let a1 = sheet.get_value("A1").unwrap();
        assert_eq!(workbook.value_text(&a1).unwrap().as_deref(), Some("Total"));
        assert_eq!(sheet.get_value("B1").unwrap(), CellValue::Number(42.0));
        assert_eq!(sheet.get_value("A2").unwrap(), CellValue::Empty);
        assert_eq!(sheet.cell_count(), 3);
    }

    #[test]
    fn test_missing_parts_are_invalid() {
        let without = |skip: &str| {
            let parts: Vec<_> = full_package()
                .into_iter()
                .filter(|(name, _)| *name != skip)
                .collect();
            XlsxStreamReader::open(package(&parts))
        };

        for required in ["[Content_Types].xml", "xl/workbook.xml", "xl/worksheets/sheet2.xml"] {
            assert!(
                matches!(without(required).err(), Some(XlsxError::InvalidFile(_))),
                "{} should be required",
                required
            );
        }
        assert!(without("xl/sharedStrings.xml").is_ok());
        // Without root rels the conventional workbook location is used
        assert!(without("_rels/.rels").is_ok());
    }

    #[test]
    fn test_not_a_zip() {
        let err = XlsxReader::read(Cursor::new(b"plain text".to_vec())).unwrap_err();
        assert!(matches!(err, XlsxError::Zip(_)));
    }

    #[test]
    fn test_shared_index_past_table_is_malformed() {
        let mut parts = full_package();
        parts.retain(|(name, _)| *name != "xl/sharedStrings.xml");
        let err = XlsxReader::read(package(&parts)).unwrap_err();
        assert!(matches!(err, XlsxError::MalformedCell(_)));
    }

    #[test]
    fn test_dates_use_workbook_date_system() {
        let styles = r#"<styleSheet><cellXfs count="2"><xf numFmtId="0"/><xf numFmtId="14" applyNumberFormat="1"/></cellXfs></styleSheet>"#;
        let sheet = r#"<worksheet><sheetData><row r="1"><c r="A1" s="1"><v>0</v></c></row></sheetData></worksheet>"#;
        let mut parts = full_package();
        parts.retain(|(name, _)| *name != "xl/worksheets/sheet1.xml");
        parts.push(("xl/worksheets/sheet1.xml", sheet));
        parts.push(("xl/styles.xml", styles));

        let workbook = XlsxReader::read(package(&parts)).unwrap();
        let value = workbook.worksheet(0).unwrap().get_value("A1").unwrap();
        assert_eq!(
            value,
            CellValue::Date(DateValue::new(0.0, DateSystem::Mac1904))
        );
    }
}
