//! Conversion between typed cell values and `<c>` elements

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use sheetstream_core::{
    CellAddress, CellError, CellValue, DateSystem, DateValue, FormatTable, SharedStringTable,
};

use crate::escape::{decode_excel_escapes, encode_excel_escapes};
use crate::error::{XlsxError, XlsxResult};

/// The `t` attribute of a `<c>` element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellType {
    /// `n` (also the meaning of an absent `t`)
    Number,
    /// `s`: index into the shared string table
    SharedString,
    /// `str`: cached formula text
    FormulaString,
    /// `inlineStr`: text in `<is>`
    InlineString,
    /// `b`
    Boolean,
    /// `e`
    Error,
    /// `d`: ISO 8601 date, read only
    IsoDate,
}

impl CellType {
    /// The attribute value
    pub fn as_ooxml(self) -> &'static str {
        match self {
            CellType::Number => "n",
            CellType::SharedString => "s",
            CellType::FormulaString => "str",
            CellType::InlineString => "inlineStr",
            CellType::Boolean => "b",
            CellType::Error => "e",
            CellType::IsoDate => "d",
        }
    }

    /// Parse the attribute value; unknown types are malformed cells
    pub fn parse(s: &str) -> XlsxResult<Self> {
        Ok(match s {
            "n" => CellType::Number,
            "s" => CellType::SharedString,
            "str" => CellType::FormulaString,
            "inlineStr" => CellType::InlineString,
            "b" => CellType::Boolean,
            "e" => CellType::Error,
            "d" => CellType::IsoDate,
            other => {
                return Err(XlsxError::MalformedCell(format!(
                    "unknown cell type '{}'",
                    other
                )))
            }
        })
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ooxml())
    }
}

/// Wire form of one cell, independent of any XML library
///
/// Text fields hold the content after XML unescaping and before Excel
/// `_xHHHH_` decoding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellElement {
    /// `r`, absent when the cell's position is implied
    pub reference: Option<CellAddress>,
    /// `t`, absent for numeric cells
    pub cell_type: Option<CellType>,
    /// `s`, absent for format 0
    pub style: Option<u32>,
    /// Text of `<v>`
    pub value: Option<String>,
    /// Concatenated `<t>` text of `<is>`
    pub inline_text: Option<String>,
    /// Text of `<f>`
    pub formula: Option<String>,
}

impl CellElement {
    /// The format ID this element refers to
    pub fn format_id(&self) -> u32 {
        self.style.unwrap_or(0)
    }
}

/// Encodes and decodes cells against a workbook's tables
#[derive(Debug, Clone, Copy)]
pub struct CellCodec<'a> {
    strings: &'a SharedStringTable,
    formats: &'a FormatTable,
    date_system: DateSystem,
}

impl<'a> CellCodec<'a> {
    /// Create a codec over the given tables
    pub fn new(
        strings: &'a SharedStringTable,
        formats: &'a FormatTable,
        date_system: DateSystem,
    ) -> Self {
        Self {
            strings,
            formats,
            date_system,
        }
    }

    /// The date system dates are encoded in
    pub fn date_system(&self) -> DateSystem {
        self.date_system
    }

    /// Encode a value with the given format ID
    ///
    /// The element has no reference; the caller positions it.
    pub fn encode(&self, value: &CellValue, format_id: u32) -> XlsxResult<CellElement> {
        let is_date_format = self.formats.is_date_format(format_id)?;
        self.check_value(value, is_date_format)?;
        let mut element = CellElement {
            style: (format_id != 0).then_some(format_id),
            ..CellElement::default()
        };

        match value {
            CellValue::Empty => {}
            CellValue::Number(n) => element.value = Some(format_number(*n)),
            CellValue::Date(date) => element.value = Some(format_number(date.serial)),
            CellValue::Boolean(b) => {
                element.cell_type = Some(CellType::Boolean);
                element.value = Some(if *b { "1" } else { "0" }.to_string());
            }
            CellValue::Error(e) => {
                element.cell_type = Some(CellType::Error);
                element.value = Some(e.as_str().to_string());
            }
            CellValue::SharedString(index) => {
                element.cell_type = Some(CellType::SharedString);
                element.value = Some(index.to_string());
            }
            CellValue::InlineString(text) => {
                element.cell_type = Some(CellType::InlineString);
                element.inline_text = Some(encode_excel_escapes(text).into_owned());
            }
            CellValue::FormulaString(text) => {
                element.cell_type = Some(CellType::FormulaString);
                element.value = Some(encode_excel_escapes(text).into_owned());
            }
        }

        Ok(element)
    }

    /// Check that `value` can be stored under a format that is (or is not)
    /// a date format, without encoding it
    pub fn check_value(&self, value: &CellValue, is_date_format: bool) -> XlsxResult<()> {
        match value {
            CellValue::Number(n) => {
                if !n.is_finite() {
                    return Err(XlsxError::MalformedCell(format!(
                        "cannot store non-finite number {}",
                        n
                    )));
                }
                if is_date_format {
                    return Err(XlsxError::MalformedCell(format!(
                        "number {} under a date format; store it as a date",
                        n
                    )));
                }
            }
            CellValue::Date(date) => {
                if !is_date_format {
                    return Err(XlsxError::MalformedCell(format!(
                        "date {} needs a date format",
                        date.serial
                    )));
                }
                if date.system != self.date_system {
                    return Err(XlsxError::MalformedCell(format!(
                        "date in {:?} system written to a {:?} workbook",
                        date.system, self.date_system
                    )));
                }
                if !date.serial.is_finite() {
                    return Err(XlsxError::MalformedCell(
                        "cannot store non-finite date serial".into(),
                    ));
                }
            }
            CellValue::SharedString(index) => {
                self.strings.resolve(*index)?;
            }
            CellValue::Empty
            | CellValue::Boolean(_)
            | CellValue::Error(_)
            | CellValue::InlineString(_)
            | CellValue::FormulaString(_) => {}
        }
        Ok(())
    }

    /// Decode an element to its value
    pub fn decode(&self, element: &CellElement) -> XlsxResult<CellValue> {
        let cell_type = element.cell_type.unwrap_or(CellType::Number);
        let is_date_format = self.formats.is_date_format(element.format_id())?;

        let raw = match (cell_type, element.value.as_deref()) {
            (CellType::InlineString, value) => {
                let text = element.inline_text.as_deref().or(value);
                return Ok(match text {
                    Some(text) => CellValue::InlineString(decode_excel_escapes(text).into_owned()),
                    None => CellValue::Empty,
                });
            }
            (_, None) => return Ok(CellValue::Empty),
            (_, Some(raw)) => raw,
        };

        match cell_type {
            CellType::Number => {
                let n = parse_number(raw)?;
                if is_date_format {
                    Ok(CellValue::Date(DateValue::new(n, self.date_system)))
                } else {
                    Ok(CellValue::Number(n))
                }
            }
            CellType::SharedString => {
                let index: u32 = raw.trim().parse().map_err(|_| {
                    XlsxError::MalformedCell(format!("invalid shared string index '{}'", raw))
                })?;
                if self.strings.resolve(index).is_err() {
                    return Err(XlsxError::MalformedCell(format!(
                        "shared string index {} outside table of {}",
                        index,
                        self.strings.len()
                    )));
                }
                Ok(CellValue::SharedString(index))
            }
            CellType::FormulaString => Ok(CellValue::FormulaString(
                decode_excel_escapes(raw).into_owned(),
            )),
            CellType::Boolean => match raw.trim() {
                "1" | "true" => Ok(CellValue::Boolean(true)),
                "0" | "false" => Ok(CellValue::Boolean(false)),
                other => Err(XlsxError::MalformedCell(format!(
                    "invalid boolean '{}'",
                    other
                ))),
            },
            CellType::Error => CellError::parse(raw.trim())
                .map(CellValue::Error)
                .ok_or_else(|| XlsxError::MalformedCell(format!("unknown error code '{}'", raw))),
            CellType::IsoDate => {
                let dt = parse_iso_datetime(raw.trim()).ok_or_else(|| {
                    XlsxError::MalformedCell(format!("invalid ISO 8601 date '{}'", raw))
                })?;
                DateValue::from_datetime(dt, self.date_system)
                    .map(CellValue::Date)
                    .ok_or_else(|| {
                        XlsxError::MalformedCell(format!("date '{}' outside date system", raw))
                    })
            }
            CellType::InlineString => Ok(CellValue::InlineString(
                decode_excel_escapes(raw).into_owned(),
            )),
        }
    }
}

/// Shortest text that parses back to the same number
fn format_number(n: f64) -> String {
    if n == 0.0 {
        // Keeps -0 from being written as "-0"
        return "0".to_string();
    }
    n.to_string()
}

fn parse_number(raw: &str) -> XlsxResult<f64> {
    match raw.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(XlsxError::MalformedCell(format!("invalid number '{}'", raw))),
    }
}

fn parse_iso_datetime(raw: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];
    let raw = raw.trim_end_matches('Z');
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
