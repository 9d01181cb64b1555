//! Property tests: whatever the streaming writer accepts, the reader returns

use proptest::prelude::*;
use sheetstream_core::{CellAddress, CellValue};
use sheetstream_xlsx::{WriterOptions, XlsxResult, XlsxStreamReader, XlsxStreamWriter};
use std::io::Cursor;

#[derive(Debug, Clone)]
enum Input {
    Text(String),
    Inline(String),
    Number(f64),
    Flag(bool),
}

fn input() -> impl Strategy<Value = Input> {
    prop_oneof![
        "[a-zA-Z0-9 _<>&\"'\t]{0,16}".prop_map(Input::Text),
        "[a-z _x0-9A-F]{0,12}".prop_map(Input::Inline),
        (-1.0e12f64..1.0e12).prop_map(Input::Number),
        any::<bool>().prop_map(Input::Flag),
    ]
}

/// Rows of (column gap, value) pairs; gaps keep addresses strictly ascending
fn sheet() -> impl Strategy<Value = Vec<(u32, Vec<(u32, Input)>)>> {
    prop::collection::vec(
        (1u32..4, prop::collection::vec((1u32..5, input()), 0..6)),
        0..8,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_streamed_cells_read_back(rows in sheet()) {
        let mut writer = XlsxStreamWriter::new(Cursor::new(Vec::new()), WriterOptions::default());
        let mut expected: Vec<(CellAddress, Input)> = Vec::new();
        {
            let mut ws = writer.begin_worksheet("P").unwrap();
            let mut row = 0;
            for (row_gap, cells) in &rows {
                row += row_gap;
                ws.begin_row(row).unwrap();
                let mut col = 0;
                for (col_gap, value) in cells {
                    col += col_gap;
                    let addr = CellAddress::new(row, col).unwrap();
                    match value {
                        Input::Text(s) => {
                            ws.write_string(addr, s, 0).unwrap();
                        }
                        Input::Inline(s) => ws.write_cell(addr, &CellValue::inline(s.as_str()), 0).unwrap(),
                        Input::Number(n) => ws.write_cell(addr, &CellValue::Number(*n), 0).unwrap(),
                        Input::Flag(b) => ws.write_cell(addr, &CellValue::Boolean(*b), 0).unwrap(),
                    }
                    expected.push((addr, value.clone()));
                }
                ws.end_row().unwrap();
            }
            ws.close().unwrap();
        }
        let bytes = writer.finish().unwrap().into_inner();

        let mut reader = XlsxStreamReader::open(Cursor::new(bytes)).unwrap();
        let strings = reader.shared_strings().clone();
        let cells = reader
            .worksheet(0)
            .unwrap()
            .collect::<XlsxResult<Vec<_>>>()
            .unwrap();

        prop_assert_eq!(cells.len(), expected.len());
        for (cell, (addr, value)) in cells.iter().zip(&expected) {
            prop_assert_eq!(cell.address, *addr);
            match (value, &cell.value) {
                (Input::Text(s), CellValue::SharedString(i)) => {
                    prop_assert_eq!(strings.text(*i).unwrap(), s.as_str());
                }
                (Input::Inline(s), CellValue::InlineString(t)) => prop_assert_eq!(s, t),
                (Input::Number(n), CellValue::Number(m)) => prop_assert_eq!(n, m),
                (Input::Flag(b), CellValue::Boolean(c)) => prop_assert_eq!(b, c),
                (value, read) => prop_assert!(false, "{:?} read back as {:?}", value, read),
            }
        }
    }
}
