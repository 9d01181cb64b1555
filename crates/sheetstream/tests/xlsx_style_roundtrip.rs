//! End-to-end tests for XLSX style roundtrip (create -> save -> read -> verify styles)

use pretty_assertions::assert_eq;
use sheetstream::prelude::*;
use sheetstream::{PatternType, Protection};
use std::io::Cursor;

fn roundtrip(wb: &Workbook) -> Workbook {
    let buf = XlsxWriter::write(wb, Cursor::new(Vec::new())).unwrap();
    XlsxReader::read(Cursor::new(buf.into_inner())).unwrap()
}

/// Test basic font styling roundtrip
#[test]
fn test_roundtrip_font_styles() {
    let mut wb = Workbook::new();
    let sheet = wb.worksheet_mut(0).unwrap();
    sheet.set_cell_value("A1", 1.0).unwrap();
    sheet.set_cell_value("B1", 2.0).unwrap();

    let style_a1 = Style::new().bold(true).font_color(Color::rgb(255, 0, 0));
    let style_b1 = Style::new().italic(true).font_size(14.0).font_name("Arial");
    wb.set_style(0, "A1", &style_a1).unwrap();
    wb.set_style(0, "B1", &style_b1).unwrap();

    let wb2 = roundtrip(&wb);
    let read_a1 = wb2.cell_style(0, "A1").unwrap();
    assert!(read_a1.font.bold, "A1 should be bold");
    assert_eq!(read_a1.font.color, Color::rgb(255, 0, 0));
    assert_eq!(read_a1, style_a1);

    let read_b1 = wb2.cell_style(0, "B1").unwrap();
    assert!(read_b1.font.italic, "B1 should be italic");
    assert_eq!(read_b1.font.size, 14.0);
    assert_eq!(read_b1.font.name, "Arial");
}

/// Test border styling roundtrip
#[test]
fn test_roundtrip_border_styles() {
    let mut wb = Workbook::new();
    wb.worksheet_mut(0)
        .unwrap()
        .set_cell_value("A1", 1.0)
        .unwrap();

    let border = BorderStyle::all(BorderLineStyle::Thin, Color::BLACK)
        .with_bottom(BorderLineStyle::Double, Color::rgb(0, 0, 255));
    wb.set_style(0, "A1", &Style::new().border(border.clone()))
        .unwrap();

    let wb2 = roundtrip(&wb);
    let read = wb2.cell_style(0, "A1").unwrap();
    assert_eq!(read.border, border);
    assert_eq!(
        read.border.bottom,
        Some(BorderEdge::new(BorderLineStyle::Double, Color::rgb(0, 0, 255)))
    );
}

/// Solid and patterned fills come back as they were written
#[test]
fn test_roundtrip_fill_styles() {
    let mut wb = Workbook::new();
    let sheet = wb.worksheet_mut(0).unwrap();
    sheet.set_cell_value("A1", 1.0).unwrap();
    sheet.set_cell_value("A2", 2.0).unwrap();

    wb.set_style(0, "A1", &Style::new().fill_color(Color::YELLOW))
        .unwrap();
    let mut striped = Style::new();
    striped.fill = FillStyle::Pattern {
        pattern: PatternType::LightGray,
        foreground: Color::rgb(200, 200, 200),
        background: Color::WHITE,
    };
    wb.set_style(0, "A2", &striped).unwrap();

    let wb2 = roundtrip(&wb);
    assert_eq!(
        wb2.cell_style(0, "A1").unwrap().fill,
        FillStyle::Solid {
            color: Color::YELLOW
        }
    );
    assert_eq!(wb2.cell_style(0, "A2").unwrap().fill, striped.fill);
}

/// Test alignment and protection roundtrip
#[test]
fn test_roundtrip_alignment_styles() {
    let mut wb = Workbook::new();
    wb.worksheet_mut(0)
        .unwrap()
        .set_cell_value("A1", 1.0)
        .unwrap();

    let style = Style::new()
        .horizontal_alignment(HorizontalAlignment::Center)
        .vertical_alignment(VerticalAlignment::Top)
        .wrap_text(true)
        .protection(Protection::unlocked());
    wb.set_style(0, "A1", &style).unwrap();

    let wb2 = roundtrip(&wb);
    let read = wb2.cell_style(0, "A1").unwrap();
    assert_eq!(read.alignment.horizontal, HorizontalAlignment::Center);
    assert_eq!(read.alignment.vertical, VerticalAlignment::Top);
    assert!(read.alignment.wrap_text);
    assert!(!read.protection.locked);
}

/// Builtin and custom number formats keep their IDs and codes
#[test]
fn test_roundtrip_number_format_styles() {
    let mut wb = Workbook::new();
    let sheet = wb.worksheet_mut(0).unwrap();
    sheet.set_cell_value("A1", 0.25).unwrap();
    sheet.set_cell_value("A2", 1234.5).unwrap();
    sheet.set_cell_value("A3", 9.0).unwrap();

    wb.set_style(0, "A1", &Style::new().with_number_format(NumberFormat::percent()))
        .unwrap();
    wb.set_style(0, "A2", &Style::new().number_format("#,##0.00 \"EUR\""))
        .unwrap();
    wb.set_style(0, "A3", &Style::new().number_format("[Red]0;[Blue]-0"))
        .unwrap();

    let wb2 = roundtrip(&wb);
    assert_eq!(
        wb2.cell_style(0, "A1").unwrap().number_format,
        NumberFormat::percent()
    );
    assert_eq!(
        wb2.cell_style(0, "A2").unwrap().number_format,
        NumberFormat::custom("#,##0.00 \"EUR\"")
    );
    assert_eq!(
        wb2.cell_style(0, "A3").unwrap().number_format,
        NumberFormat::custom("[Red]0;[Blue]-0")
    );
    // Neither custom code looks like a date, so the values stay numbers
    assert_eq!(
        wb2.worksheet(0).unwrap().get_value("A2").unwrap(),
        CellValue::Number(1234.5)
    );
}

/// Styled cells without a value are kept
#[test]
fn test_roundtrip_style_only_cells() {
    let mut wb = Workbook::new();
    wb.set_style(0, "B2", &Style::new().fill_color(Color::GREEN))
        .unwrap();

    let wb2 = roundtrip(&wb);
    let sheet2 = wb2.worksheet(0).unwrap();
    assert_eq!(sheet2.cell_count(), 1);
    assert_eq!(sheet2.get_value("B2").unwrap(), CellValue::Empty);
    assert_eq!(
        wb2.cell_style(0, "B2").unwrap().fill,
        FillStyle::Solid {
            color: Color::GREEN
        }
    );
}

/// Identical styles on different sheets share one record after saving
#[test]
fn test_roundtrip_styles_multiple_sheets() {
    let mut wb = Workbook::new();
    wb.add_worksheet_with_name("Other").unwrap();
    let heading = Style::new().bold(true).font_size(16.0);

    for sheet in 0..2 {
        wb.worksheet_mut(sheet)
            .unwrap()
            .set_cell_value("A1", 1.0)
            .unwrap();
        wb.set_style(sheet, "A1", &heading).unwrap();
    }

    let wb2 = roundtrip(&wb);
    let id0 = wb2.worksheet(0).unwrap().format_id("A1").unwrap();
    let id1 = wb2.worksheet(1).unwrap().format_id("A1").unwrap();
    assert_eq!(id0, id1);
    assert_ne!(id0, 0);
    assert_eq!(wb2.formats().len(), 2);
    assert_eq!(wb2.cell_style(1, "A1").unwrap(), heading);
}

/// Named styles and the records that inherit from them survive a save
#[test]
fn test_roundtrip_named_styles() {
    let mut wb = Workbook::new();
    wb.worksheet_mut(0)
        .unwrap()
        .set_cell_value("A1", 1.0)
        .unwrap();
    let accent = Style::new().font_color(Color::theme(4, 0));
    wb.formats_mut().add_named_style("Accent", &accent, None).unwrap();
    let format_id = wb
        .formats_mut()
        .intern_style_with_parent(&accent.clone().bold(true), "Accent")
        .unwrap();
    wb.worksheet_mut(0)
        .unwrap()
        .set_cell_format("A1", format_id)
        .unwrap();

    let wb2 = roundtrip(&wb);
    let named = wb2.formats().named_style("Accent").unwrap();
    assert_eq!(wb2.formats().resolve_style_record(named.record_id).unwrap(), accent);

    let record = wb2
        .formats()
        .resolve_record(wb2.worksheet(0).unwrap().format_id("A1").unwrap())
        .unwrap();
    assert_eq!(record.style_id, named.record_id);
    assert_eq!(wb2.cell_style(0, "A1").unwrap().font.color, Color::theme(4, 0));
}
