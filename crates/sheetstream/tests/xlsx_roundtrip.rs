//! End-to-end tests for XLSX roundtrip (create -> save -> read -> verify)

use pretty_assertions::assert_eq;
use sheetstream::prelude::*;
use std::io::{Cursor, Read};

fn addr(s: &str) -> CellAddress {
    CellAddress::parse(s).unwrap()
}

fn roundtrip(wb: &Workbook) -> Workbook {
    let buf = XlsxWriter::write(wb, Cursor::new(Vec::new())).unwrap();
    XlsxReader::read(Cursor::new(buf.into_inner())).unwrap()
}

fn part_text(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut text = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut text)
        .unwrap();
    text
}

/// Test basic roundtrip with numeric values
#[test]
fn test_roundtrip_numbers() {
    let mut wb = Workbook::new();
    let sheet = wb.worksheet_mut(0).unwrap();

    sheet.set_cell_value("A1", 42.0).unwrap();
    sheet.set_cell_value("B1", 3.14159).unwrap();
    sheet.set_cell_value("C1", -100.5).unwrap();
    sheet.set_cell_value("A2", 0.0).unwrap();
    sheet.set_cell_value("B2", 1e10).unwrap();
    sheet.set_cell_value("C2", 7).unwrap();

    let wb2 = roundtrip(&wb);
    let sheet2 = wb2.worksheet(0).unwrap();

    assert_eq!(sheet2.get_value("A1").unwrap(), CellValue::Number(42.0));
    assert_eq!(sheet2.get_value("B1").unwrap(), CellValue::Number(3.14159));
    assert_eq!(sheet2.get_value("C1").unwrap(), CellValue::Number(-100.5));
    assert_eq!(sheet2.get_value("A2").unwrap(), CellValue::Number(0.0));
    assert_eq!(sheet2.get_value("B2").unwrap(), CellValue::Number(1e10));
    assert_eq!(sheet2.get_value("C2").unwrap(), CellValue::Number(7.0));
}

/// Shared and inline strings both come back with their text intact
#[test]
fn test_roundtrip_strings() {
    let mut wb = Workbook::new();
    wb.set_string(0, "A1", "Hello, World!").unwrap();
    wb.set_string(0, "B1", "Special: <>&\"'").unwrap();
    wb.set_string(0, "C1", "  padded  ").unwrap();
    wb.set_string(0, "A2", "Multi\nLine").unwrap();
    wb.set_string(0, "B2", "Unicode: \u{1F600}").unwrap();
    let sheet = wb.worksheet_mut(0).unwrap();
    sheet.set_cell_value("C2", CellValue::inline("inline _x0041_ text")).unwrap();

    let wb2 = roundtrip(&wb);
    let sheet2 = wb2.worksheet(0).unwrap();
    let text = |a: &str| {
        let value = sheet2.get_value(a).unwrap();
        wb2.value_text(&value).unwrap().map(|t| t.into_owned())
    };

    assert_eq!(text("A1").as_deref(), Some("Hello, World!"));
    assert_eq!(text("B1").as_deref(), Some("Special: <>&\"'"));
    assert_eq!(text("C1").as_deref(), Some("  padded  "));
    assert_eq!(text("A2").as_deref(), Some("Multi\nLine"));
    assert_eq!(text("B2").as_deref(), Some("Unicode: \u{1F600}"));
    assert_eq!(
        sheet2.get_value("C2").unwrap(),
        CellValue::inline("inline _x0041_ text")
    );
}

/// Test roundtrip with boolean and error values
#[test]
fn test_roundtrip_booleans_and_errors() {
    let mut wb = Workbook::new();
    let sheet = wb.worksheet_mut(0).unwrap();
    sheet.set_cell_value("A1", true).unwrap();
    sheet.set_cell_value("B1", false).unwrap();
    sheet.set_cell_value("C1", CellError::Div0).unwrap();
    sheet.set_cell_value("D1", CellError::Na).unwrap();

    let wb2 = roundtrip(&wb);
    let sheet2 = wb2.worksheet(0).unwrap();
    assert_eq!(sheet2.get_value("A1").unwrap(), CellValue::Boolean(true));
    assert_eq!(sheet2.get_value("B1").unwrap(), CellValue::Boolean(false));
    assert_eq!(sheet2.get_value("C1").unwrap(), CellValue::Error(CellError::Div0));
    assert_eq!(sheet2.get_value("D1").unwrap(), CellValue::Error(CellError::Na));
}

/// Formulas are carried as text alongside their cached values
#[test]
fn test_roundtrip_formulas() {
    let mut wb = Workbook::new();
    let sheet = wb.worksheet_mut(0).unwrap();
    sheet.set_cell_value("A1", 10.0).unwrap();
    sheet.set_cell_value("A2", 20.0).unwrap();
    sheet.set_cell_formula("A3", "=SUM(A1:A2)").unwrap();
    sheet.set_cell_value("B3", 30.0).unwrap();
    sheet.set_cell_formula("B3", "A1+A2").unwrap();
    sheet
        .set_cell_value("C3", CellValue::FormulaString("yes".into()))
        .unwrap();
    sheet.set_cell_formula("C3", "IF(A1<A2,\"yes\",\"no\")").unwrap();

    let wb2 = roundtrip(&wb);
    let sheet2 = wb2.worksheet(0).unwrap();

    let a3 = sheet2.cell("A3").unwrap().unwrap();
    assert_eq!(a3.formula.as_deref(), Some("SUM(A1:A2)"));
    assert_eq!(a3.value, CellValue::Empty);

    let b3 = sheet2.cell("B3").unwrap().unwrap();
    assert_eq!(b3.formula.as_deref(), Some("A1+A2"));
    assert_eq!(b3.value, CellValue::Number(30.0));

    let c3 = sheet2.cell("C3").unwrap().unwrap();
    assert_eq!(c3.formula.as_deref(), Some("IF(A1<A2,\"yes\",\"no\")"));
    assert_eq!(c3.value, CellValue::FormulaString("yes".into()));
}

/// Test roundtrip with multiple sheets, including a hidden one
#[test]
fn test_roundtrip_multiple_sheets() {
    let mut wb = Workbook::new();
    wb.add_worksheet_with_name("Second").unwrap();
    wb.add_worksheet_with_name("Hidden").unwrap();
    wb.worksheet_mut(2).unwrap().set_visible(false);

    wb.worksheet_mut(0)
        .unwrap()
        .set_cell_value("A1", 1.0)
        .unwrap();
    wb.worksheet_mut(1)
        .unwrap()
        .set_cell_value("B2", 2.0)
        .unwrap();
    wb.worksheet_mut(2)
        .unwrap()
        .set_cell_value("C3", 3.0)
        .unwrap();

    let wb2 = roundtrip(&wb);
    assert_eq!(wb2.sheet_count(), 3);
    let names: Vec<&str> = wb2.worksheets().map(|s| s.name()).collect();
    assert_eq!(names, vec!["Sheet1", "Second", "Hidden"]);
    assert!(wb2.worksheet(1).unwrap().is_visible());
    assert!(!wb2.worksheet(2).unwrap().is_visible());

    assert_eq!(
        wb2.worksheet_by_name("Second").unwrap().get_value("B2").unwrap(),
        CellValue::Number(2.0)
    );
    assert_eq!(
        wb2.worksheet(2).unwrap().get_value("C3").unwrap(),
        CellValue::Number(3.0)
    );
}

/// Sparse cells come back exactly as written, with no gaps filled in
#[test]
fn test_roundtrip_sparse_data() {
    let mut wb = Workbook::new();
    let sheet = wb.worksheet_mut(0).unwrap();
    sheet.set_cell_value("A1", 1.0).unwrap();
    sheet.set_cell_value("C1", 2.0).unwrap();
    sheet.set_cell_value("A3", 3.0).unwrap();

    let buf = XlsxWriter::write(&wb, Cursor::new(Vec::new()))
        .unwrap()
        .into_inner();

    let mut reader = XlsxStreamReader::open(Cursor::new(buf)).unwrap();
    let mut cells = reader.worksheet(0).unwrap();
    let row1 = cells.next_row().unwrap().unwrap();
    assert_eq!(
        row1.iter().map(|c| c.address).collect::<Vec<_>>(),
        vec![addr("A1"), addr("C1")]
    );
    let row3 = cells.next_row().unwrap().unwrap();
    assert_eq!(
        row3.iter().map(|c| c.address).collect::<Vec<_>>(),
        vec![addr("A3")]
    );
    assert!(cells.next_row().unwrap().is_none());
}

/// Test roundtrip at the far corner of the grid
#[test]
fn test_roundtrip_large_indices() {
    let mut wb = Workbook::new();
    let sheet = wb.worksheet_mut(0).unwrap();
    sheet.set_cell_value("XFD1048576", 99.0).unwrap();
    sheet.set_cell_value("AA100", 1.0).unwrap();

    let wb2 = roundtrip(&wb);
    let sheet2 = wb2.worksheet(0).unwrap();
    assert_eq!(sheet2.get_value("XFD1048576").unwrap(), CellValue::Number(99.0));
    assert_eq!(sheet2.get_value("AA100").unwrap(), CellValue::Number(1.0));
    assert_eq!(sheet2.cell_count(), 2);
}

/// A workbook with no sheets cannot be saved
#[test]
fn test_roundtrip_empty_workbook() {
    let wb = Workbook::empty();
    let result = XlsxWriter::write(&wb, Cursor::new(Vec::new()));
    assert!(matches!(result, Err(XlsxError::Sequence(_))));

    let wb = Workbook::new();
    let wb2 = roundtrip(&wb);
    assert_eq!(wb2.sheet_count(), 1);
    assert!(wb2.worksheet(0).unwrap().is_empty());
}

/// Sheet names with XML-special characters survive the workbook part
#[test]
fn test_roundtrip_special_sheet_names() {
    let mut wb = Workbook::new();
    wb.rename_worksheet(0, "Q&A <draft>").unwrap();
    wb.add_worksheet_with_name("it's \"quoted\"").unwrap();

    let wb2 = roundtrip(&wb);
    assert!(wb2.worksheet_by_name("Q&A <draft>").is_some());
    assert!(wb2.worksheet_by_name("it's \"quoted\"").is_some());
}

/// Dates round-trip in both date systems
#[test]
fn test_roundtrip_dates() {
    for system in [DateSystem::Windows1900, DateSystem::Mac1904] {
        let mut wb = Workbook::new();
        wb.settings_mut().date_system = system;
        let date = DateValue::from_date(
            chrono::NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            system,
        )
        .unwrap();
        wb.worksheet_mut(0)
            .unwrap()
            .set_cell_value("A1", date)
            .unwrap();
        wb.set_style(0, "A1", &Style::new().with_number_format(NumberFormat::date_short()))
            .unwrap();

        let wb2 = roundtrip(&wb);
        assert_eq!(wb2.date_system(), system);
        match wb2.worksheet(0).unwrap().get_value("A1").unwrap() {
            CellValue::Date(d) => {
                assert_eq!(d.system, system);
                assert_eq!(d.serial, date.serial);
                assert_eq!(d.to_datetime(), date.to_datetime());
            }
            other => panic!("expected a date, got {:?}", other),
        }
    }
}

/// Two sheets sharing one string and one number format store each once
#[test]
fn test_shared_tables_across_sheets() {
    let mut writer = XlsxStreamWriter::new(Cursor::new(Vec::new()), WriterOptions::default());
    let amount = Style::new().number_format("0.00");

    for (name, value) in [("Jan", 10.5), ("Feb", 20.25)] {
        let mut sheet = writer.begin_worksheet(name).unwrap();
        sheet.begin_row(1).unwrap();
        sheet.write_string(addr("A1"), "Total", 0).unwrap();
        sheet
            .write_styled(addr("B1"), &CellValue::Number(value), &amount)
            .unwrap();
        sheet.end_row().unwrap();
        sheet.begin_row(2).unwrap();
        sheet
            .write_styled(addr("B2"), &CellValue::Number(value * 2.0), &amount)
            .unwrap();
        sheet.close().unwrap();
    }
    let bytes = writer.finish().unwrap().into_inner();

    let sst = part_text(&bytes, "xl/sharedStrings.xml");
    assert_eq!(sst.matches("<si>").count(), 1);
    assert!(sst.contains(r#"count="2" uniqueCount="1""#));

    let styles = part_text(&bytes, "xl/styles.xml");
    assert!(styles.contains(r#"<cellXfs count="2">"#));

    let mut reader = XlsxStreamReader::open(Cursor::new(bytes)).unwrap();
    let mut format_ids = Vec::new();
    for index in 0..reader.sheet_count() {
        let cells: Vec<Cell> = reader
            .worksheet(index)
            .unwrap()
            .collect::<XlsxResult<_>>()
            .unwrap();
        assert_eq!(cells[0].value, CellValue::SharedString(0));
        format_ids.extend(cells[1..].iter().map(|c| c.format_id));
    }
    assert_eq!(format_ids, vec![1, 1, 1, 1]);
    assert_eq!(
        reader.formats().resolve(1).unwrap().number_format,
        NumberFormat::custom("0.00")
    );
}

/// Out-of-order writes are refused and leave the sheet writable
#[test]
fn test_write_order_enforced() {
    let mut writer = XlsxStreamWriter::new(Cursor::new(Vec::new()), WriterOptions::default());
    let mut sheet = writer.begin_worksheet("Data").unwrap();

    sheet.begin_row(2).unwrap();
    sheet
        .write_cell(addr("B2"), &CellValue::Number(1.0), 0)
        .unwrap();
    let back = sheet.write_cell(addr("A2"), &CellValue::Number(2.0), 0);
    assert!(matches!(back, Err(XlsxError::Sequence(_))));
    let other_row = sheet.write_cell(addr("C3"), &CellValue::Number(3.0), 0);
    assert!(matches!(other_row, Err(XlsxError::Sequence(_))));
    assert!(matches!(sheet.begin_row(3), Err(XlsxError::Sequence(_))));

    sheet.end_row().unwrap();
    assert!(matches!(sheet.begin_row(1), Err(XlsxError::Sequence(_))));
    sheet.begin_row(3).unwrap();
    sheet
        .write_cell(addr("C3"), &CellValue::Number(3.0), 0)
        .unwrap();
    sheet.close().unwrap();

    let bytes = writer.finish().unwrap().into_inner();
    let wb = XlsxReader::read(Cursor::new(bytes)).unwrap();
    assert_eq!(wb.worksheet(0).unwrap().cell_count(), 2);
}

/// Save and open through the file system
#[test]
fn test_roundtrip_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.xlsx");

    let mut wb = Workbook::new();
    wb.set_string(0, "A1", "on disk").unwrap();
    wb.save(&path).unwrap();

    let wb2 = Workbook::open(&path).unwrap();
    let value = wb2.worksheet(0).unwrap().get_value("A1").unwrap();
    assert_eq!(wb2.value_text(&value).unwrap().as_deref(), Some("on disk"));

    let wrong = dir.path().join("book.csv");
    assert!(matches!(wb.save(&wrong), Err(XlsxError::InvalidFile(_))));
}
