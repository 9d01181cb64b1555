//! Example: stream a large sheet to an xlsx file, then read it back row by row

use sheetstream::prelude::*;
use std::io::Write;

fn main() -> XlsxResult<()> {
    let path = std::env::temp_dir().join("sheetstream-demo.xlsx");

    let mut writer = XlsxStreamWriter::create_file(&path, WriterOptions::default())?;
    let header = Style::new().bold(true).fill_color(Color::rgb(221, 235, 247));
    let money = Style::new().number_format("#,##0.00");
    {
        let mut sheet = writer.begin_worksheet("Orders")?;

        sheet.begin_row(1)?;
        for (col, title) in ["Region", "Amount", "Doubled"].into_iter().enumerate() {
            let addr = CellAddress::new(1, col as u32 + 1)?;
            sheet.write_styled(addr, &CellValue::inline(title), &header)?;
        }
        sheet.end_row()?;

        let regions = ["North", "South", "East", "West"];
        for row in 2..=10_000u32 {
            sheet.begin_row(row)?;
            // Repeated region names land in the shared string table once each
            sheet.write_string(CellAddress::new(row, 1)?, regions[row as usize % 4], 0)?;
            let amount = CellValue::Number(row as f64 * 1.5);
            sheet.write_styled(CellAddress::new(row, 2)?, &amount, &money)?;
            let formula = format!("=B{}*2", row);
            sheet.write_formula(CellAddress::new(row, 3)?, &formula, &CellValue::Empty, 0)?;
            sheet.end_row()?;
        }
        sheet.close()?;
    }
    let unique = writer.shared_strings().len();
    writer.finish()?.flush()?;
    println!("Wrote {} ({} unique strings)", path.display(), unique);

    let mut reader = XlsxStreamReader::open_file(&path)?;
    let strings = reader.shared_strings().clone();
    let mut sheet = reader.worksheet_by_name("Orders")?;
    let mut rows = 0;
    while let Some(cells) = sheet.next_row()? {
        rows += 1;
        if rows <= 3 {
            let texts: Vec<String> = cells
                .iter()
                .map(|cell| match &cell.value {
                    CellValue::SharedString(i) => strings.text(*i).map(|t| t.into_owned()),
                    other => Ok(other.to_string()),
                })
                .collect::<Result<_>>()?;
            println!("row {}: {}", cells[0].address.row, texts.join(" | "));
        }
    }
    println!("Read {} rows", rows);

    Ok(())
}
