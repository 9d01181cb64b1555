//! Format table: deduplication of formatting attributes into numeric IDs

use super::{Alignment, BorderStyle, FillStyle, FontStyle, NumberFormat, Protection, Style};
use crate::error::{Error, Result};
use ahash::AHashMap;
use std::hash::Hash;

/// Which parts of a formatting record override its parent style record
///
/// Mirrors the `applyNumberFormat`, `applyFont`, ... attributes of `<xf>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApplyFlags {
    pub number_format: bool,
    pub font: bool,
    pub fill: bool,
    pub border: bool,
    pub alignment: bool,
    pub protection: bool,
}

/// One `<xf>` entry: sub-table IDs plus inline alignment and protection
///
/// Format IDs written on cells (`s="N"`) index the cell records
/// (`cellXfs`); named styles index the style records (`cellStyleXfs`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormatRecord {
    pub number_format_id: u32,
    pub font_id: u32,
    pub fill_id: u32,
    pub border_id: u32,
    pub alignment: Alignment,
    pub protection: Protection,
    pub apply: ApplyFlags,
    /// Parent style record (`xfId`)
    pub style_id: u32,
}

/// A named cell style (`<cellStyle>`)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NamedStyle {
    pub name: String,
    /// Index into the style records
    pub record_id: u32,
    /// Builtin style number, e.g. 0 for "Normal"
    pub builtin_id: Option<u32>,
    pub hidden: bool,
}

/// Append-only vector with a reverse lookup keeping the first-seen index
#[derive(Debug, Clone)]
struct Interned<T> {
    items: Vec<T>,
    lookup: AHashMap<T, u32>,
}

impl<T: Clone + Eq + Hash> Interned<T> {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            lookup: AHashMap::new(),
        }
    }

    fn intern(&mut self, item: &T) -> u32 {
        if let Some(&id) = self.lookup.get(item) {
            return id;
        }
        self.push(item.clone())
    }

    fn push(&mut self, item: T) -> u32 {
        let id = self.items.len() as u32;
        self.lookup.entry(item.clone()).or_insert(id);
        self.items.push(item);
        id
    }

    fn get(&self, id: u32, table: &'static str) -> Result<&T> {
        self.items
            .get(id as usize)
            .ok_or_else(|| Error::out_of_range(table, id as usize, self.items.len()))
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// Workbook-wide format dictionary
///
/// Holds the sub-tables of `styles.xml` (number formats, fonts, fills,
/// borders), the cell and style records built on them, and the named
/// styles. Structurally equal inputs always intern to the same ID, and IDs
/// are positions, so the table serializes to `styles.xml` as-is.
///
/// A fresh table carries the defaults every package needs: font 0, fills 0
/// (`none`) and 1 (`gray125`), border 0, cell record 0, style record 0 and
/// the `Normal` named style.
#[derive(Debug, Clone)]
pub struct FormatTable {
    fonts: Interned<FontStyle>,
    fills: Interned<FillStyle>,
    borders: Interned<BorderStyle>,
    /// Custom number formats as (id, code), in insertion order
    number_formats: Vec<(u32, String)>,
    number_format_lookup: AHashMap<String, u32>,
    next_number_format_id: u32,
    records: Interned<FormatRecord>,
    style_records: Interned<FormatRecord>,
    named_styles: Vec<NamedStyle>,
}

impl FormatTable {
    /// Create a table holding only the defaults
    pub fn new() -> Self {
        let mut table = Self::empty();
        table.ensure_defaults();
        table
    }

    /// Create a table with no entries at all, for replaying a styles part
    ///
    /// Call [`ensure_defaults`](Self::ensure_defaults) once replay is done.
    pub fn empty() -> Self {
        Self {
            fonts: Interned::new(),
            fills: Interned::new(),
            borders: Interned::new(),
            number_formats: Vec::new(),
            number_format_lookup: AHashMap::new(),
            next_number_format_id: NumberFormat::FIRST_CUSTOM_ID,
            records: Interned::new(),
            style_records: Interned::new(),
            named_styles: Vec::new(),
        }
    }

    /// Fill in whichever default entries a replayed part left out
    pub fn ensure_defaults(&mut self) {
        if self.fonts.len() == 0 {
            self.fonts.push(FontStyle::default());
        }
        if self.fills.len() == 0 {
            self.fills.push(FillStyle::None);
        }
        if self.fills.len() == 1 {
            self.fills.push(FillStyle::gray125());
        }
        if self.borders.len() == 0 {
            self.borders.push(BorderStyle::default());
        }
        if self.style_records.len() == 0 {
            self.style_records.push(FormatRecord::default());
        }
        if self.records.len() == 0 {
            self.records.push(FormatRecord::default());
        }
        if self.named_styles.is_empty() {
            self.named_styles.push(NamedStyle {
                name: "Normal".to_string(),
                record_id: 0,
                builtin_id: Some(0),
                hidden: false,
            });
        }
    }

    // === Interning ===

    /// Get or add a font, returning its ID
    pub fn intern_font(&mut self, font: &FontStyle) -> u32 {
        self.fonts.intern(font)
    }

    /// Get or add a fill, returning its ID
    pub fn intern_fill(&mut self, fill: &FillStyle) -> u32 {
        self.fills.intern(fill)
    }

    /// Get or add a border, returning its ID
    pub fn intern_border(&mut self, border: &BorderStyle) -> u32 {
        self.borders.intern(border)
    }

    /// Get or add a number format, returning its ID
    ///
    /// Builtin formats keep their fixed ID and are not stored; custom codes
    /// get IDs from 164 upwards.
    pub fn intern_number_format(&mut self, format: &NumberFormat) -> u32 {
        match format {
            NumberFormat::General => 0,
            NumberFormat::BuiltIn(id) => *id,
            NumberFormat::Custom(code) => {
                if let Some(&id) = self.number_format_lookup.get(code) {
                    return id;
                }
                let id = self.next_number_format_id;
                self.push_number_format(id, code.clone());
                id
            }
        }
    }

    /// Get or add a cell record, returning its format ID
    ///
    /// Fails with `OutOfRange` when the record references a sub-table entry
    /// that does not exist.
    pub fn intern_record(&mut self, record: FormatRecord) -> Result<u32> {
        self.check_record(&record)?;
        Ok(self.records.intern(&record))
    }

    /// Intern every part of `style` and return the format ID of the result
    ///
    /// Fails with `OutOfRange`, leaving the table untouched, when the style
    /// names a builtin number format ID that has no code.
    pub fn intern_style(&mut self, style: &Style) -> Result<u32> {
        let record = self.record_for(style, 0)?;
        Ok(self.records.intern(&record))
    }

    /// Intern `style` as a record whose parent is the named style `name`
    pub fn intern_style_with_parent(&mut self, style: &Style, name: &str) -> Result<u32> {
        let parent = self
            .named_style(name)
            .map(|n| n.record_id)
            .ok_or_else(|| Error::InvalidValueType {
                expected: "named style",
                actual: "unknown name",
            })?;
        let record = self.record_for(style, parent)?;
        Ok(self.records.intern(&record))
    }

    /// Add a named style built from `style`, returning its style record ID
    ///
    /// Re-adding an existing name points it at the new record.
    pub fn add_named_style(
        &mut self,
        name: impl Into<String>,
        style: &Style,
        builtin_id: Option<u32>,
    ) -> Result<u32> {
        let name = name.into();
        let record = self.record_for(style, 0)?;
        let record_id = self.style_records.intern(&record);

        match self.named_styles.iter_mut().find(|n| n.name == name) {
            Some(existing) => {
                existing.record_id = record_id;
                existing.builtin_id = builtin_id;
            }
            None => self.named_styles.push(NamedStyle {
                name,
                record_id,
                builtin_id,
                hidden: false,
            }),
        }
        Ok(record_id)
    }

    fn record_for(&mut self, style: &Style, style_id: u32) -> Result<FormatRecord> {
        if let NumberFormat::BuiltIn(id) = &style.number_format {
            self.number_format(*id)?;
        }
        let number_format_id = self.intern_number_format(&style.number_format);
        Ok(FormatRecord {
            number_format_id,
            font_id: self.intern_font(&style.font),
            fill_id: self.intern_fill(&style.fill),
            border_id: self.intern_border(&style.border),
            alignment: style.alignment.clone(),
            protection: style.protection,
            apply: ApplyFlags {
                number_format: number_format_id != 0,
                font: style.font != FontStyle::default(),
                fill: !style.fill.is_none(),
                border: style.border != BorderStyle::default(),
                alignment: !style.alignment.is_default(),
                protection: style.protection != Protection::default(),
            },
            style_id,
        })
    }

    fn check_record(&self, record: &FormatRecord) -> Result<()> {
        self.fonts.get(record.font_id, "font")?;
        self.fills.get(record.fill_id, "fill")?;
        self.borders.get(record.border_id, "border")?;
        self.style_records.get(record.style_id, "style record")?;
        self.number_format(record.number_format_id)?;
        Ok(())
    }

    // === Resolution ===

    /// Look up a cell record by format ID
    pub fn resolve_record(&self, format_id: u32) -> Result<&FormatRecord> {
        self.records.get(format_id, "format")
    }

    /// Resolve a format ID to its full attribute bundle
    pub fn resolve(&self, format_id: u32) -> Result<Style> {
        self.style_from_record(self.resolve_record(format_id)?)
    }

    /// Resolve a style record ID (as referenced by named styles)
    pub fn resolve_style_record(&self, record_id: u32) -> Result<Style> {
        self.style_from_record(self.style_records.get(record_id, "style record")?)
    }

    fn style_from_record(&self, record: &FormatRecord) -> Result<Style> {
        Ok(Style {
            font: self.font(record.font_id)?.clone(),
            fill: self.fill(record.fill_id)?.clone(),
            border: self.border(record.border_id)?.clone(),
            alignment: record.alignment.clone(),
            number_format: self.number_format(record.number_format_id)?,
            protection: record.protection,
        })
    }

    /// Whether the format ID renders its number as a date or time
    pub fn is_date_format(&self, format_id: u32) -> Result<bool> {
        let record = self.resolve_record(format_id)?;
        Ok(self.number_format(record.number_format_id)?.is_date_format())
    }

    /// Get a font by ID
    pub fn font(&self, id: u32) -> Result<&FontStyle> {
        self.fonts.get(id, "font")
    }

    /// Get a fill by ID
    pub fn fill(&self, id: u32) -> Result<&FillStyle> {
        self.fills.get(id, "fill")
    }

    /// Get a border by ID
    pub fn border(&self, id: u32) -> Result<&BorderStyle> {
        self.borders.get(id, "border")
    }

    /// Get a number format by ID
    ///
    /// IDs below 164 without a stored code are builtin; anything else must
    /// have been interned or replayed.
    pub fn number_format(&self, id: u32) -> Result<NumberFormat> {
        if let Some((_, code)) = self.number_formats.iter().find(|(i, _)| *i == id) {
            return Ok(NumberFormat::Custom(code.clone()));
        }
        if id < NumberFormat::FIRST_CUSTOM_ID {
            return Ok(NumberFormat::from_id(id));
        }
        Err(Error::out_of_range(
            "number format",
            id as usize,
            self.number_formats.len(),
        ))
    }

    /// Look up a named style by name
    pub fn named_style(&self, name: &str) -> Option<&NamedStyle> {
        self.named_styles.iter().find(|n| n.name == name)
    }

    // === Positional replay (read path) ===

    /// Append a font without deduplication
    pub fn push_font(&mut self, font: FontStyle) -> u32 {
        self.fonts.push(font)
    }

    /// Append a fill without deduplication
    pub fn push_fill(&mut self, fill: FillStyle) -> u32 {
        self.fills.push(fill)
    }

    /// Append a border without deduplication
    pub fn push_border(&mut self, border: BorderStyle) -> u32 {
        self.borders.push(border)
    }

    /// Register a custom number format under a fixed ID
    pub fn push_number_format(&mut self, id: u32, code: String) {
        self.number_format_lookup.entry(code.clone()).or_insert(id);
        self.number_formats.push((id, code));
        self.next_number_format_id = self.next_number_format_id.max(id + 1);
    }

    /// Append a cell record without deduplication
    pub fn push_record(&mut self, record: FormatRecord) -> u32 {
        self.records.push(record)
    }

    /// Append a style record without deduplication
    pub fn push_style_record(&mut self, record: FormatRecord) -> u32 {
        self.style_records.push(record)
    }

    /// Append a named style
    pub fn push_named_style(&mut self, named: NamedStyle) {
        self.named_styles.push(named);
    }

    // === Iteration (write path) ===

    /// Number of cell records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no cell records exist (only for a table from [`empty`](Self::empty))
    pub fn is_empty(&self) -> bool {
        self.records.len() == 0
    }

    pub fn fonts(&self) -> &[FontStyle] {
        &self.fonts.items
    }

    pub fn fills(&self) -> &[FillStyle] {
        &self.fills.items
    }

    pub fn borders(&self) -> &[BorderStyle] {
        &self.borders.items
    }

    /// Custom number formats as (id, code)
    pub fn number_formats(&self) -> &[(u32, String)] {
        &self.number_formats
    }

    /// Cell records (`cellXfs`), position = format ID
    pub fn records(&self) -> &[FormatRecord] {
        &self.records.items
    }

    /// Style records (`cellStyleXfs`)
    pub fn style_records(&self) -> &[FormatRecord] {
        &self.style_records.items
    }

    pub fn named_styles(&self) -> &[NamedStyle] {
        &self.named_styles
    }
}

impl Default for FormatTable {
    fn default() -> Self {
        Self::new()
    }
}
