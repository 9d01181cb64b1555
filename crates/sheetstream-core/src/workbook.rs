//! Workbook type - the in-memory document structure

use std::borrow::Cow;

use crate::cell::{CellAddress, CellValue, DateSystem};
use crate::error::{Error, Result};
use crate::shared_strings::SharedStringTable;
use crate::style::{FormatTable, Style};
use crate::worksheet::Worksheet;
use crate::MAX_SHEET_NAME_LEN;

/// A workbook (spreadsheet document)
///
/// An arena of worksheets plus the two workbook-scoped tables every cell
/// refers into: the shared string table and the format table.
#[derive(Debug, Clone)]
pub struct Workbook {
    worksheets: Vec<Worksheet>,
    settings: WorkbookSettings,
    shared_strings: SharedStringTable,
    formats: FormatTable,
}

impl Workbook {
    /// Create a new workbook with one worksheet named "Sheet1"
    pub fn new() -> Self {
        let mut wb = Self::empty();
        wb.worksheets.push(Worksheet::new("Sheet1"));
        wb
    }

    /// Create an empty workbook with no worksheets
    pub fn empty() -> Self {
        Self {
            worksheets: Vec::new(),
            settings: WorkbookSettings::default(),
            shared_strings: SharedStringTable::new(),
            formats: FormatTable::new(),
        }
    }

    /// Assemble a workbook from parts that were loaded separately
    pub fn from_parts(
        worksheets: Vec<Worksheet>,
        settings: WorkbookSettings,
        shared_strings: SharedStringTable,
        formats: FormatTable,
    ) -> Self {
        Self {
            worksheets,
            settings,
            shared_strings,
            formats,
        }
    }

    // === Worksheets ===

    /// Get the number of worksheets
    pub fn sheet_count(&self) -> usize {
        self.worksheets.len()
    }

    /// Check if the workbook has no worksheets
    pub fn is_empty(&self) -> bool {
        self.worksheets.is_empty()
    }

    /// Get a worksheet by index
    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.worksheets.get(index)
    }

    /// Get a mutable worksheet by index
    pub fn worksheet_mut(&mut self, index: usize) -> Option<&mut Worksheet> {
        self.worksheets.get_mut(index)
    }

    /// Get a worksheet by name
    pub fn worksheet_by_name(&self, name: &str) -> Option<&Worksheet> {
        self.worksheets.iter().find(|ws| ws.name() == name)
    }

    /// Get the index of a worksheet by name
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        self.worksheets.iter().position(|ws| ws.name() == name)
    }

    /// Iterate over all worksheets
    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.worksheets.iter()
    }

    /// Add a new worksheet with a generated name
    pub fn add_worksheet(&mut self) -> Result<usize> {
        let name = self.generate_sheet_name();
        self.add_worksheet_with_name(&name)
    }

    /// Add a new worksheet with specified name
    pub fn add_worksheet_with_name(&mut self, name: &str) -> Result<usize> {
        self.validate_sheet_name(name, None)?;
        self.worksheets.push(Worksheet::new(name));
        Ok(self.worksheets.len() - 1)
    }

    /// Remove a worksheet by index
    pub fn remove_worksheet(&mut self, index: usize) -> Result<Worksheet> {
        if index >= self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.worksheets.len()));
        }
        Ok(self.worksheets.remove(index))
    }

    /// Rename a worksheet
    pub fn rename_worksheet(&mut self, index: usize, new_name: &str) -> Result<()> {
        if index >= self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.worksheets.len()));
        }
        self.validate_sheet_name(new_name, Some(index))?;
        self.worksheets[index].set_name(new_name);
        Ok(())
    }

    // === Workbook tables ===

    /// Get workbook settings
    pub fn settings(&self) -> &WorkbookSettings {
        &self.settings
    }

    /// Get mutable workbook settings
    pub fn settings_mut(&mut self) -> &mut WorkbookSettings {
        &mut self.settings
    }

    /// The date system cell dates are stored in
    pub fn date_system(&self) -> DateSystem {
        self.settings.date_system
    }

    /// The shared string table
    pub fn shared_strings(&self) -> &SharedStringTable {
        &self.shared_strings
    }

    /// The format table
    pub fn formats(&self) -> &FormatTable {
        &self.formats
    }

    /// Mutable access to the format table
    pub fn formats_mut(&mut self) -> &mut FormatTable {
        &mut self.formats
    }

    /// Borrow one worksheet together with both workbook tables
    pub fn sheet_and_tables_mut(
        &mut self,
        index: usize,
    ) -> Option<(&mut Worksheet, &mut SharedStringTable, &mut FormatTable)> {
        let sheet = self.worksheets.get_mut(index)?;
        Some((sheet, &mut self.shared_strings, &mut self.formats))
    }

    /// Store `text` in a cell as a shared string
    pub fn set_string(&mut self, sheet: usize, address: &str, text: &str) -> Result<()> {
        let count = self.worksheets.len();
        let (ws, strings, _) = self
            .sheet_and_tables_mut(sheet)
            .ok_or(Error::SheetOutOfBounds(sheet, count))?;
        let addr = CellAddress::parse(address)?;
        ws.set_value_at(addr, CellValue::SharedString(strings.intern(text)));
        Ok(())
    }

    /// Format a cell with `style`, interning it into the format table
    pub fn set_style(&mut self, sheet: usize, address: &str, style: &Style) -> Result<u32> {
        let count = self.worksheets.len();
        let (ws, _, formats) = self
            .sheet_and_tables_mut(sheet)
            .ok_or(Error::SheetOutOfBounds(sheet, count))?;
        let addr = CellAddress::parse(address)?;
        let format_id = formats.intern_style(style)?;
        ws.set_format_at(addr, format_id);
        Ok(format_id)
    }

    /// The text of a string value, resolving shared strings
    ///
    /// Returns `Ok(None)` for values that carry no text.
    pub fn value_text<'a>(&'a self, value: &'a CellValue) -> Result<Option<Cow<'a, str>>> {
        match value {
            CellValue::SharedString(index) => self.shared_strings.text(*index).map(Some),
            CellValue::InlineString(s) | CellValue::FormulaString(s) => {
                Ok(Some(Cow::Borrowed(s.as_str())))
            }
            CellValue::Empty
            | CellValue::Boolean(_)
            | CellValue::Number(_)
            | CellValue::Date(_)
            | CellValue::Error(_) => Ok(None),
        }
    }

    /// The resolved style of a cell (the default style if the cell is absent)
    pub fn cell_style(&self, sheet: usize, address: &str) -> Result<Style> {
        let ws = self
            .worksheet(sheet)
            .ok_or(Error::SheetOutOfBounds(sheet, self.worksheets.len()))?;
        self.formats.resolve(ws.format_id(address)?)
    }

    // === Validation ===

    fn validate_sheet_name(&self, name: &str, exclude_index: Option<usize>) -> Result<()> {
        validate_sheet_name(name)?;

        // Duplicate check is case-insensitive
        let name_lower = name.to_lowercase();
        let taken = self
            .worksheets
            .iter()
            .enumerate()
            .any(|(i, ws)| Some(i) != exclude_index && ws.name().to_lowercase() == name_lower);
        if taken {
            return Err(Error::DuplicateSheetName(name.into()));
        }

        Ok(())
    }

    fn generate_sheet_name(&self) -> String {
        let mut n = self.worksheets.len() + 1;
        loop {
            let name = format!("Sheet{}", n);
            if self.validate_sheet_name(&name, None).is_ok() {
                return name;
            }
            n += 1;
        }
    }
}

/// Check a sheet name against the characters and length Excel accepts
///
/// Uniqueness is the caller's concern.
pub fn validate_sheet_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidSheetName("Sheet name cannot be empty".into()));
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(Error::InvalidSheetName(format!(
            "Sheet name too long (max {} characters)",
            MAX_SHEET_NAME_LEN
        )));
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(Error::InvalidSheetName(
            "Sheet name cannot start or end with an apostrophe".into(),
        ));
    }

    const INVALID_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];
    if let Some(c) = name.chars().find(|c| INVALID_CHARS.contains(c)) {
        return Err(Error::InvalidSheetName(format!(
            "Sheet name cannot contain '{}'",
            c
        )));
    }
    Ok(())
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}

/// Workbook-level settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorkbookSettings {
    /// Date system (`workbookPr date1904`)
    pub date_system: DateSystem,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::NumberFormat;

    #[test]
    fn test_new_workbook() {
        let wb = Workbook::new();
        assert_eq!(wb.sheet_count(), 1);
        assert_eq!(wb.worksheet(0).unwrap().name(), "Sheet1");
        assert_eq!(wb.date_system(), DateSystem::Windows1900);
        assert_eq!(wb.formats().len(), 1);
    }

    #[test]
    fn test_add_worksheets() {
        let mut wb = Workbook::new();
        assert_eq!(wb.add_worksheet().unwrap(), 1);
        assert_eq!(wb.worksheet(1).unwrap().name(), "Sheet2");
        assert_eq!(wb.add_worksheet_with_name("Data").unwrap(), 2);
        assert_eq!(wb.sheet_index("Data"), Some(2));
    }

    #[test]
    fn test_duplicate_name() {
        let mut wb = Workbook::new();
        assert!(wb.add_worksheet_with_name("SHEET1").is_err());
        assert!(wb.add_worksheet_with_name("sheet1").is_err());
        wb.add_worksheet_with_name("Other").unwrap();
        assert!(wb.rename_worksheet(1, "Sheet1").is_err());
        assert!(wb.rename_worksheet(1, "other").is_ok());
    }

    #[test]
    fn test_invalid_sheet_name() {
        let mut wb = Workbook::new();
        assert!(wb.add_worksheet_with_name("").is_err());
        assert!(wb.add_worksheet_with_name("Sheet/1").is_err());
        assert!(wb.add_worksheet_with_name("Sheet[1]").is_err());
        assert!(wb.add_worksheet_with_name("'quoted").is_err());
        assert!(validate_sheet_name("it's fine").is_ok());
        let long_name = "A".repeat(MAX_SHEET_NAME_LEN + 1);
        assert!(wb.add_worksheet_with_name(&long_name).is_err());
    }

    #[test]
    fn test_shared_strings_through_workbook() {
        let mut wb = Workbook::new();
        wb.add_worksheet_with_name("Second").unwrap();
        wb.set_string(0, "A1", "Total").unwrap();
        wb.set_string(1, "B7", "Total").unwrap();

        assert_eq!(wb.shared_strings().len(), 1);
        let value = wb.worksheet(1).unwrap().get_value("B7").unwrap();
        assert_eq!(value, CellValue::SharedString(0));
        assert_eq!(wb.value_text(&value).unwrap().as_deref(), Some("Total"));
        assert!(wb.set_string(5, "A1", "x").is_err());
    }

    #[test]
    fn test_styles_through_workbook() {
        let mut wb = Workbook::new();
        let money = Style::new().number_format("#,##0.00");
        let a = wb.set_style(0, "A1", &money).unwrap();
        let b = wb.set_style(0, "A2", &money).unwrap();
        assert_eq!(a, b);
        assert_eq!(wb.cell_style(0, "A2").unwrap().number_format, NumberFormat::custom("#,##0.00"));
        assert_eq!(wb.cell_style(0, "Q9").unwrap(), Style::default());
    }

    #[test]
    fn test_rejected_style_leaves_sheet_untouched() {
        let mut wb = Workbook::new();
        let unknown = Style::new().with_number_format(NumberFormat::BuiltIn(200));
        assert!(wb.set_style(0, "A1", &unknown).is_err());
        assert!(wb.set_style(0, "not a cell", &Style::new().bold(true)).is_err());
        assert_eq!(wb.formats().len(), 1);
        assert!(wb.worksheet(0).unwrap().is_empty());
    }
}
