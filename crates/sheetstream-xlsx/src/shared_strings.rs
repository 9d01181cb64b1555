//! Shared strings part (`xl/sharedStrings.xml`) read/write

use std::io::{BufRead, Write};

use quick_xml::events::Event;

use crate::error::XlsxResult;
use crate::escape::{decode_excel_escapes, encode_excel_escapes};
use crate::styles::{apply_font_property, push_font_properties};
use crate::xml::{self, XML_DECLARATION};
use sheetstream_core::{FontStyle, RichText, SharedStringTable, TextRun};

/// Parse a shared strings part, keeping every entry at its position
///
/// Phonetic runs (`<rPh>`) and phonetic properties are skipped. The `count`
/// attribute becomes the table's reference count.
pub(crate) fn read_shared_strings<B: BufRead>(source: B) -> XlsxResult<SharedStringTable> {
    let mut xml = xml::reader(source);
    let mut buf = Vec::new();

    let mut entries: Vec<RichText> = Vec::new();
    let mut count: Option<u64> = None;
    let mut runs: Option<Vec<TextRun>> = None;
    let mut run: Option<TextRun> = None;
    let mut in_rpr = false;

    enum Step {
        Continue,
        Text,
        EmptyText,
        Skip(Vec<u8>),
        Done,
    }

    loop {
        let step = match xml.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"sst" => {
                    count = xml::attr(&e, b"count")?.and_then(|c| c.trim().parse().ok());
                    Step::Continue
                }
                b"si" => {
                    runs = Some(Vec::new());
                    Step::Continue
                }
                b"r" if runs.is_some() => {
                    run = Some(TextRun::plain(""));
                    Step::Continue
                }
                b"rPr" => {
                    if let Some(run) = run.as_mut() {
                        run.font = Some(FontStyle::default());
                        in_rpr = true;
                    }
                    Step::Continue
                }
                b"t" if runs.is_some() => Step::Text,
                b"rPh" | b"phoneticPr" | b"extLst" => Step::Skip(e.local_name().as_ref().to_vec()),
                other => {
                    apply_run_property(run.as_mut(), in_rpr, other, &e)?;
                    Step::Continue
                }
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"t" if runs.is_some() => Step::EmptyText,
                b"si" => {
                    entries.push(RichText::plain(""));
                    Step::Continue
                }
                other => {
                    apply_run_property(run.as_mut(), in_rpr, other, &e)?;
                    Step::Continue
                }
            },
            Event::End(e) => {
                match e.local_name().as_ref() {
                    b"rPr" => in_rpr = false,
                    b"r" => {
                        if let (Some(runs), Some(run)) = (runs.as_mut(), run.take()) {
                            runs.push(run);
                        }
                    }
                    b"si" => {
                        let runs = runs.take().unwrap_or_default();
                        entries.push(if runs.is_empty() {
                            RichText::plain("")
                        } else {
                            RichText::from_runs(runs)
                        });
                    }
                    _ => {}
                }
                Step::Continue
            }
            Event::Eof => Step::Done,
            _ => Step::Continue,
        };
        buf.clear();

        let text = match step {
            Step::Continue => continue,
            Step::Done => break,
            Step::Skip(name) => {
                xml::skip_element(&mut xml, &mut buf, &name)?;
                continue;
            }
            Step::Text => decode_excel_escapes(&xml::read_text(&mut xml, &mut buf, b"t")?)
                .into_owned(),
            Step::EmptyText => String::new(),
        };
        match (run.as_mut(), runs.as_mut()) {
            (Some(run), _) => run.text.push_str(&text),
            (None, Some(runs)) => runs.push(TextRun::plain(text)),
            (None, None) => {}
        }
    }

    let total = count.unwrap_or(entries.len() as u64);
    log::debug!("read {} shared strings ({} references)", entries.len(), total);
    let mut table = SharedStringTable::from_entries(entries);
    table.set_total_references(total);
    Ok(table)
}

fn apply_run_property(
    run: Option<&mut TextRun>,
    in_rpr: bool,
    name: &[u8],
    e: &quick_xml::events::BytesStart<'_>,
) -> XlsxResult<()> {
    match run.and_then(|r| r.font.as_mut()) {
        Some(font) if in_rpr => apply_font_property(font, name, e),
        _ => Ok(()),
    }
}

/// Serialize the table, one `<si>` per entry in index order
pub(crate) fn write_shared_strings<W: Write>(
    mut out: W,
    table: &SharedStringTable,
) -> XlsxResult<()> {
    let header = format!(
        "{}\n<sst xmlns=\"{}\" count=\"{}\" uniqueCount=\"{}\">",
        XML_DECLARATION,
        xml::NS_MAIN,
        table.total_references(),
        table.len()
    );
    out.write_all(header.as_bytes())?;

    let mut si = String::new();
    for entry in table.iter() {
        si.clear();
        si.push_str("<si>");
        if entry.is_plain() {
            push_text(&mut si, &entry.plain_text());
        } else {
            for run in &entry.runs {
                si.push_str("<r>");
                if let Some(font) = &run.font {
                    si.push_str("<rPr>");
                    push_font_properties(&mut si, font, "rFont");
                    si.push_str("</rPr>");
                }
                push_text(&mut si, &run.text);
                si.push_str("</r>");
            }
        }
        si.push_str("</si>");
        out.write_all(si.as_bytes())?;
    }

    out.write_all(b"</sst>")?;
    Ok(())
}

fn push_text(xml: &mut String, text: &str) {
    let encoded = encode_excel_escapes(text);
    if xml::needs_preserve(text) {
        xml.push_str("<t xml:space=\"preserve\">");
    } else {
        xml.push_str("<t>");
    }
    xml.push_str(&xml::escape_text(&encoded));
    xml.push_str("</t>");
}
