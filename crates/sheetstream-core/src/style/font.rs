//! Font style types

use super::Color;

/// Font settings, shared by the fonts sub-table and rich-text run properties
///
/// Sizes compare by value with `0.0 == -0.0`, and any NaN equals any other,
/// so fonts can key a hash map.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FontStyle {
    /// Font family name (e.g., "Calibri", "Arial")
    pub name: String,
    /// Font size in points
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
    pub underline: Underline,
    pub strikethrough: bool,
    pub color: Color,
    /// Superscript/subscript
    pub vertical_align: FontVerticalAlign,
}

impl Default for FontStyle {
    fn default() -> Self {
        Self {
            name: "Calibri".to_string(),
            size: 11.0,
            bold: false,
            italic: false,
            underline: Underline::None,
            strikethrough: false,
            color: Color::Auto,
            vertical_align: FontVerticalAlign::Baseline,
        }
    }
}

impl FontStyle {
    /// Create a new default font
    pub fn new() -> Self {
        Self::default()
    }

    /// Set font name
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Set font size
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    /// Set bold
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Set italic
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Set underline
    pub fn with_underline(mut self, underline: Underline) -> Self {
        self.underline = underline;
        self
    }

    /// Set color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set superscript/subscript
    pub fn with_vertical_align(mut self, align: FontVerticalAlign) -> Self {
        self.vertical_align = align;
        self
    }
}

/// Size as hashed and compared: signed zeros and NaN payloads collapse
fn size_key(size: f64) -> u64 {
    if size == 0.0 {
        0
    } else if size.is_nan() {
        f64::NAN.to_bits()
    } else {
        size.to_bits()
    }
}

impl PartialEq for FontStyle {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && size_key(self.size) == size_key(other.size)
            && self.bold == other.bold
            && self.italic == other.italic
            && self.underline == other.underline
            && self.strikethrough == other.strikethrough
            && self.color == other.color
            && self.vertical_align == other.vertical_align
    }
}

impl std::hash::Hash for FontStyle {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        size_key(self.size).hash(state);
        self.bold.hash(state);
        self.italic.hash(state);
        self.underline.hash(state);
        self.strikethrough.hash(state);
        self.color.hash(state);
        self.vertical_align.hash(state);
    }
}

impl Eq for FontStyle {}

/// Underline style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Underline {
    #[default]
    None,
    Single,
    Double,
    /// Single accounting underline (extends to cell width)
    SingleAccounting,
    DoubleAccounting,
}

impl Underline {
    /// The `<u val>` token; `None` for no underline
    pub fn as_ooxml(self) -> Option<&'static str> {
        match self {
            Underline::None => None,
            Underline::Single => Some("single"),
            Underline::Double => Some("double"),
            Underline::SingleAccounting => Some("singleAccounting"),
            Underline::DoubleAccounting => Some("doubleAccounting"),
        }
    }

    /// Parse a `<u val>` token; a bare `<u/>` means single
    pub fn from_ooxml(s: &str) -> Self {
        match s {
            "none" => Underline::None,
            "double" => Underline::Double,
            "singleAccounting" => Underline::SingleAccounting,
            "doubleAccounting" => Underline::DoubleAccounting,
            _ => Underline::Single,
        }
    }
}

/// Font vertical alignment (superscript/subscript)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FontVerticalAlign {
    #[default]
    Baseline,
    Superscript,
    Subscript,
}

impl FontVerticalAlign {
    /// The `<vertAlign val>` token
    pub fn as_ooxml(self) -> &'static str {
        match self {
            FontVerticalAlign::Baseline => "baseline",
            FontVerticalAlign::Superscript => "superscript",
            FontVerticalAlign::Subscript => "subscript",
        }
    }

    /// Parse a `<vertAlign val>` token
    pub fn from_ooxml(s: &str) -> Option<Self> {
        Some(match s {
            "baseline" => FontVerticalAlign::Baseline,
            "superscript" => FontVerticalAlign::Superscript,
            "subscript" => FontVerticalAlign::Subscript,
            _ => return None,
        })
    }
}
