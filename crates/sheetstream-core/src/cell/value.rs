//! Cell value types

use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::fmt;
use std::str::FromStr;

/// Represents the value stored in a cell
///
/// Exactly one variant is active. A [`CellValue::SharedString`] holds an
/// index into the workbook's [`SharedStringTable`](crate::SharedStringTable)
/// and is only meaningful next to that table.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellValue {
    /// Empty cell (no value)
    #[default]
    Empty,

    /// Boolean value (TRUE/FALSE)
    Boolean(bool),

    /// Numeric value
    Number(f64),

    /// Date/time stored as a serial number in a given date system
    Date(DateValue),

    /// Error value (#VALUE!, #REF!, etc.)
    Error(CellError),

    /// Text stored in the cell itself, not deduplicated
    InlineString(String),

    /// Index into the shared string table
    SharedString(u32),

    /// Cached text result of a formula
    FormulaString(String),
}

impl CellValue {
    /// Create an inline string value
    pub fn inline<S: Into<String>>(s: S) -> Self {
        CellValue::InlineString(s.into())
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Check if the cell contains an error
    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Error(_))
    }

    /// Try to get the value as a number
    ///
    /// Dates yield their serial number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Date(d) => Some(d.serial),
            _ => None,
        }
    }

    /// Try to get the value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Text carried directly by the value
    ///
    /// Shared strings return `None`; resolve them through the string table.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::InlineString(s) | CellValue::FormulaString(s) => Some(s),
            _ => None,
        }
    }

    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Empty => "empty",
            CellValue::Boolean(_) => "boolean",
            CellValue::Number(_) => "number",
            CellValue::Date(_) => "date",
            CellValue::Error(_) => "error",
            CellValue::InlineString(_) => "inline string",
            CellValue::SharedString(_) => "shared string",
            CellValue::FormulaString(_) => "formula string",
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Date(d) => match d.to_datetime() {
                Some(dt) => write!(f, "{}", dt),
                None => write!(f, "{}", d.serial),
            },
            CellValue::Error(e) => write!(f, "{}", e),
            CellValue::InlineString(s) | CellValue::FormulaString(s) => write!(f, "{}", s),
            CellValue::SharedString(i) => write!(f, "<shared string #{}>", i),
        }
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<DateValue> for CellValue {
    fn from(d: DateValue) -> Self {
        CellValue::Date(d)
    }
}

impl From<CellError> for CellValue {
    fn from(e: CellError) -> Self {
        CellValue::Error(e)
    }
}

/// Excel error values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellError {
    /// #NULL! - Incorrect range operator
    Null,
    /// #DIV/0! - Division by zero
    Div0,
    /// #VALUE! - Wrong type of argument or operand
    Value,
    /// #REF! - Invalid cell reference
    Ref,
    /// #NAME? - Unrecognized formula name
    Name,
    /// #NUM! - Invalid numeric value
    Num,
    /// #N/A - Value not available
    Na,
    /// #GETTING_DATA - External data is loading
    GettingData,
    /// #SPILL! - Dynamic array cannot spill
    Spill,
    /// #CALC! - Calculation error
    Calc,
}

impl CellError {
    /// All error codes, in the order Excel numbers them
    pub const ALL: [CellError; 10] = [
        CellError::Null,
        CellError::Div0,
        CellError::Value,
        CellError::Ref,
        CellError::Name,
        CellError::Num,
        CellError::Na,
        CellError::GettingData,
        CellError::Spill,
        CellError::Calc,
    ];

    /// Get the display string for this error
    pub fn as_str(&self) -> &'static str {
        match self {
            CellError::Null => "#NULL!",
            CellError::Div0 => "#DIV/0!",
            CellError::Value => "#VALUE!",
            CellError::Ref => "#REF!",
            CellError::Name => "#NAME?",
            CellError::Num => "#NUM!",
            CellError::Na => "#N/A",
            CellError::GettingData => "#GETTING_DATA",
            CellError::Spill => "#SPILL!",
            CellError::Calc => "#CALC!",
        }
    }

    /// Parse an error string exactly as it appears in a worksheet
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.as_str() == s)
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CellError {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::parse(s).ok_or(crate::Error::InvalidValueType {
            expected: "error code",
            actual: "unknown text",
        })
    }
}

/// The epoch a workbook counts date serials from
///
/// Stored in the workbook part as `<workbookPr date1904="1"/>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DateSystem {
    /// Serial 1 = 1900-01-01, including the phantom 1900-02-29 (serial 60)
    #[default]
    Windows1900,
    /// Serial 0 = 1904-01-01
    Mac1904,
}

impl DateSystem {
    /// Whether this is the 1904 system
    pub fn is_1904(self) -> bool {
        matches!(self, DateSystem::Mac1904)
    }

    fn epoch(self) -> Option<NaiveDateTime> {
        let date = match self {
            DateSystem::Windows1900 => NaiveDate::from_ymd_opt(1899, 12, 30),
            DateSystem::Mac1904 => NaiveDate::from_ymd_opt(1904, 1, 1),
        };
        date.and_then(|d| d.and_hms_opt(0, 0, 0))
    }
}

const MS_PER_DAY: f64 = 86_400_000.0;

// Serial of 9999-12-31 in the 1900 system; later serials cannot be formatted
const MAX_SERIAL: f64 = 2_958_466.0;

/// A date/time value as stored in a worksheet
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DateValue {
    /// Days since the epoch of `system`, fractional part is the time of day
    pub serial: f64,
    /// The date system the serial counts in
    pub system: DateSystem,
}

impl DateValue {
    /// Create a date value from a raw serial
    pub fn new(serial: f64, system: DateSystem) -> Self {
        Self { serial, system }
    }

    /// Convert a calendar date/time to a serial in `system`
    ///
    /// Returns `None` for instants before the system's epoch.
    pub fn from_datetime(dt: NaiveDateTime, system: DateSystem) -> Option<Self> {
        let epoch = system.epoch()?;
        let mut serial = (dt - epoch).num_milliseconds() as f64 / MS_PER_DAY;
        if system == DateSystem::Windows1900 && serial < 61.0 {
            // Dates before 1900-03-01 sit one day lower than the continuous count
            serial -= 1.0;
        }
        if serial < 0.0 || serial >= MAX_SERIAL {
            return None;
        }
        Some(Self { serial, system })
    }

    /// Convert a calendar date to a serial in `system`
    pub fn from_date(date: NaiveDate, system: DateSystem) -> Option<Self> {
        Self::from_datetime(date.and_hms_opt(0, 0, 0)?, system)
    }

    /// Convert to a calendar date/time
    ///
    /// Returns `None` for negative or non-finite serials and for serial 60 in
    /// the 1900 system, which names a day that does not exist.
    pub fn to_datetime(&self) -> Option<NaiveDateTime> {
        if !self.serial.is_finite() || self.serial < 0.0 || self.serial >= MAX_SERIAL {
            return None;
        }
        let mut serial = self.serial;
        if self.system == DateSystem::Windows1900 {
            if (60.0..61.0).contains(&serial) {
                return None;
            }
            if serial < 60.0 {
                serial += 1.0;
            }
        }
        let ms = (serial * MS_PER_DAY).round() as i64;
        Some(self.system.epoch()? + Duration::milliseconds(ms))
    }

    /// The same instant expressed in another date system
    pub fn convert(&self, system: DateSystem) -> Option<Self> {
        if system == self.system {
            return Some(*self);
        }
        Self::from_datetime(self.to_datetime()?, system)
    }
}
