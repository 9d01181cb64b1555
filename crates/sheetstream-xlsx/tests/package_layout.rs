//! Reading packages whose parts are not where this crate would put them

use pretty_assertions::assert_eq;
use sheetstream_core::{CellAddress, CellRange, CellValue};
use sheetstream_xlsx::{
    DocumentProperties, PackageWriter, XlsxError, XlsxReader, XlsxStreamReader,
};
use std::io::Cursor;
use zip::CompressionMethod;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="book/main.xml"/>
</Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<x:workbook xmlns:x="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <x:fileVersion appName="xl"/>
  <x:sheets>
    <x:sheet name="Summary" sheetId="7" r:id="rIdA"/>
    <x:sheet name="Archive" sheetId="3" state="veryHidden" r:id="rIdB"/>
  </x:sheets>
  <x:definedNames><x:definedName name="Total">Summary!$B$1</x:definedName></x:definedNames>
</x:workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rIdB" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="/sheets/archive.xml"/>
  <Relationship Id="rIdA" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="../sheets/summary.xml"/>
  <Relationship Id="rIdS" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="strings.xml"/>
  <Relationship Id="rIdL" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com" TargetMode="External"/>
</Relationships>"#;

const SUMMARY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<x:worksheet xmlns:x="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <x:sheetPr><x:tabColor rgb="FF00B050"/></x:sheetPr>
  <x:dimension ref="A1:B2"/>
  <x:sheetViews><x:sheetView workbookViewId="0"/></x:sheetViews>
  <x:sheetData>
    <x:row r="1" spans="1:2"><x:c r="A1" t="s"><x:v>0</x:v></x:c><x:c r="B1"><x:f>SUM(B2:B2)</x:f><x:v>5</x:v></x:c></x:row>
    <x:row r="2"><x:c r="B2"><x:v>5</x:v></x:c></x:row>
  </x:sheetData>
  <x:pageMargins left="0.7" right="0.7" top="0.75" bottom="0.75" header="0.3" footer="0.3"/>
</x:worksheet>"#;

const ARCHIVE: &str = r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="4"><c r="D4" t="b"><v>1</v></c></row></sheetData></worksheet>"#;

const STRINGS: &str = r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="1" uniqueCount="1"><si><t>Grand total</t></si></sst>"#;

fn package(parts: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = PackageWriter::new(Cursor::new(Vec::new()), CompressionMethod::Deflated);
    for (name, content) in parts {
        writer.write_part(name, content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn full_package() -> Vec<u8> {
    package(&[
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", ROOT_RELS),
        ("book/main.xml", WORKBOOK),
        ("book/_rels/main.xml.rels", WORKBOOK_RELS),
        ("sheets/summary.xml", SUMMARY),
        ("sheets/archive.xml", ARCHIVE),
        ("book/strings.xml", STRINGS),
    ])
}

#[test]
fn test_relationships_locate_every_part() {
    let mut reader = XlsxStreamReader::open(Cursor::new(full_package())).unwrap();

    assert_eq!(reader.sheet_names().collect::<Vec<_>>(), vec!["Summary", "Archive"]);
    assert_eq!(reader.is_sheet_visible(0), Some(true));
    assert_eq!(reader.is_sheet_visible(1), Some(false));
    assert_eq!(reader.shared_strings().text(0).unwrap(), "Grand total");
    // No styles part: the defaults stand in
    assert_eq!(reader.formats().len(), 1);
    // The core properties relationship dangles; nothing is read from it
    assert_eq!(reader.properties(), &DocumentProperties::default());

    {
        let mut summary = reader.worksheet_by_name("Summary").unwrap();
        assert_eq!(summary.dimension(), Some(CellRange::parse("A1:B2").unwrap()));
        let row = summary.next_row().unwrap().unwrap();
        assert_eq!(row[0].value, CellValue::SharedString(0));
        assert_eq!(row[1].formula.as_deref(), Some("SUM(B2:B2)"));
        assert_eq!(row[1].value, CellValue::Number(5.0));
        let row = summary.next_row().unwrap().unwrap();
        assert_eq!(row[0].address, CellAddress::parse("B2").unwrap());
        assert!(summary.next_row().unwrap().is_none());
    }

    let archive: Vec<_> = reader
        .worksheet(1)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(archive.len(), 1);
    assert_eq!(archive[0].value, CellValue::Boolean(true));
}

#[test]
fn test_in_memory_load_keeps_visibility() {
    let workbook = XlsxReader::read(Cursor::new(full_package())).unwrap();
    assert_eq!(workbook.sheet_count(), 2);
    assert!(!workbook.worksheet(1).unwrap().is_visible());
    let value = workbook.worksheet(0).unwrap().get_value("A1").unwrap();
    assert_eq!(
        workbook.value_text(&value).unwrap().as_deref(),
        Some("Grand total")
    );
}

#[test]
fn test_dangling_sheet_relationship_is_invalid() {
    let bytes = package(&[
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", ROOT_RELS),
        ("book/main.xml", WORKBOOK),
        ("book/_rels/main.xml.rels", WORKBOOK_RELS),
        ("sheets/summary.xml", SUMMARY),
    ]);
    match XlsxStreamReader::open(Cursor::new(bytes)) {
        Err(XlsxError::InvalidFile(msg)) => assert!(msg.contains("Archive"), "{}", msg),
        Err(other) => panic!("expected InvalidFile, got {:?}", other),
        Ok(_) => panic!("expected InvalidFile"),
    }
}

#[test]
fn test_unknown_sheet_name() {
    let mut reader = XlsxStreamReader::open(Cursor::new(full_package())).unwrap();
    assert!(matches!(
        reader.worksheet_by_name("summary").err(),
        Some(XlsxError::Core(sheetstream_core::Error::SheetNotFound(_)))
    ));
    assert!(matches!(
        reader.worksheet(2).err(),
        Some(XlsxError::Core(sheetstream_core::Error::SheetOutOfBounds(2, 2)))
    ));
}
