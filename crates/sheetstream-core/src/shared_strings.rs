//! Shared string table
//!
//! Every distinct piece of cell text is stored once per workbook and cells
//! refer to it by index. The table is built while writing and replayed
//! from `xl/sharedStrings.xml` while reading.

use crate::error::{Error, Result};
use crate::style::FontStyle;
use ahash::AHashMap;
use std::borrow::Cow;

/// A run of text with optional run-level font properties
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextRun {
    pub text: String,
    /// `None` for a plain `<t>` entry or a run without `<rPr>`
    pub font: Option<FontStyle>,
}

impl TextRun {
    /// Create a run without formatting
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: None,
        }
    }

    /// Create a formatted run
    pub fn styled(text: impl Into<String>, font: FontStyle) -> Self {
        Self {
            text: text.into(),
            font: Some(font),
        }
    }
}

/// One shared string entry: plain text or a sequence of formatted runs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RichText {
    pub runs: Vec<TextRun>,
}

impl RichText {
    /// Create an entry holding plain text
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            runs: vec![TextRun::plain(text)],
        }
    }

    /// Create an entry from runs
    pub fn from_runs(runs: Vec<TextRun>) -> Self {
        Self { runs }
    }

    /// Whether this is a single unformatted run (serialized as a bare `<t>`)
    pub fn is_plain(&self) -> bool {
        match self.runs.as_slice() {
            [] => true,
            [run] => run.font.is_none(),
            _ => false,
        }
    }

    /// The concatenated text of all runs
    pub fn plain_text(&self) -> Cow<'_, str> {
        match self.runs.as_slice() {
            [] => Cow::Borrowed(""),
            [run] => Cow::Borrowed(&run.text),
            runs => Cow::Owned(runs.iter().map(|r| r.text.as_str()).collect()),
        }
    }
}

impl From<&str> for RichText {
    fn from(s: &str) -> Self {
        RichText::plain(s)
    }
}

impl From<String> for RichText {
    fn from(s: String) -> Self {
        RichText::plain(s)
    }
}

/// Workbook-wide string interner
///
/// Indices are append-only and stable: the first time a text is seen it gets
/// the next index, and every later occurrence gets the same one. Rich-text
/// entries deduplicate on their plain text; the runs of the first-seen entry
/// are kept.
#[derive(Debug, Clone, Default)]
pub struct SharedStringTable {
    entries: Vec<RichText>,
    lookup: AHashMap<String, u32>,
    total_references: u64,
}

impl SharedStringTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Replay entries read from a shared strings part, keeping positions
    ///
    /// Duplicate entries are kept as separate indices; the reverse lookup
    /// points at the first one.
    pub fn from_entries(entries: Vec<RichText>) -> Self {
        let mut lookup = AHashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            lookup
                .entry(entry.plain_text().into_owned())
                .or_insert(i as u32);
        }
        Self {
            entries,
            lookup,
            total_references: 0,
        }
    }

    /// Return the index for `text`, appending it if unseen
    ///
    /// Every call counts as one reference.
    pub fn intern(&mut self, text: &str) -> u32 {
        self.total_references += 1;
        if let Some(&index) = self.lookup.get(text) {
            return index;
        }
        self.append(text.to_string(), RichText::plain(text))
    }

    /// Return the index for a rich-text entry, appending it if its plain
    /// text is unseen
    pub fn intern_rich(&mut self, text: RichText) -> u32 {
        self.total_references += 1;
        let key = text.plain_text().into_owned();
        if let Some(&index) = self.lookup.get(&key) {
            return index;
        }
        self.append(key, text)
    }

    fn append(&mut self, key: String, entry: RichText) -> u32 {
        let index = self.entries.len() as u32;
        self.lookup.insert(key, index);
        self.entries.push(entry);
        index
    }

    /// Look up an entry by index
    pub fn resolve(&self, index: u32) -> Result<&RichText> {
        self.entries
            .get(index as usize)
            .ok_or_else(|| Error::out_of_range("shared string", index as usize, self.entries.len()))
    }

    /// Look up the plain text of an entry by index
    pub fn text(&self, index: u32) -> Result<Cow<'_, str>> {
        self.resolve(index).map(RichText::plain_text)
    }

    /// Index of `text`, if interned
    pub fn find(&self, text: &str) -> Option<u32> {
        self.lookup.get(text).copied()
    }

    /// Number of unique entries (`uniqueCount`)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of cell references recorded (`count`)
    pub fn total_references(&self) -> u64 {
        self.total_references
    }

    /// Override the reference count, e.g. with the `count` read from a part
    pub fn set_total_references(&mut self, count: u64) {
        self.total_references = count;
    }

    /// Iterate over entries in index order
    pub fn iter(&self) -> impl Iterator<Item = &RichText> {
        self.entries.iter()
    }
}
