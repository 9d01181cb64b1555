//! Styles part (`xl/styles.xml`) read/write
//!
//! The part is the serialized form of a [`FormatTable`]. Reading replays
//! every sub-table positionally, so the format IDs cells carry in the file
//! stay valid; writing emits the table exactly as it stands.

use std::io::{BufRead, Write};

use quick_xml::events::{BytesStart, Event};

use crate::error::XlsxResult;
use crate::xml::{self, attr, attr_bool, attr_u32, XML_DECLARATION};
use sheetstream_core::style::{
    Alignment, ApplyFlags, BorderEdge, BorderLineStyle, BorderStyle, Color, FillStyle,
    FontStyle, FontVerticalAlign, FormatRecord, FormatTable, HorizontalAlignment, NamedStyle,
    PatternType, Protection, Underline, VerticalAlignment,
};

// === Writing ===

/// Serialize the whole format table
pub(crate) fn write_styles<W: Write>(mut out: W, table: &FormatTable) -> XlsxResult<()> {
    let mut xml = String::new();
    xml.push_str(XML_DECLARATION);
    xml.push_str(&format!("\n<styleSheet xmlns=\"{}\">", xml::NS_MAIN));

    let numfmts = table.number_formats();
    if !numfmts.is_empty() {
        xml.push_str(&format!("<numFmts count=\"{}\">", numfmts.len()));
        for (id, code) in numfmts {
            xml.push_str(&format!(
                "<numFmt numFmtId=\"{}\" formatCode=\"{}\"/>",
                id,
                xml::escape_attr(code)
            ));
        }
        xml.push_str("</numFmts>");
    }

    xml.push_str(&format!("<fonts count=\"{}\">", table.fonts().len()));
    for font in table.fonts() {
        xml.push_str("<font>");
        push_font_properties(&mut xml, font, "name");
        xml.push_str("</font>");
    }
    xml.push_str("</fonts>");

    xml.push_str(&format!("<fills count=\"{}\">", table.fills().len()));
    for fill in table.fills() {
        xml.push_str(&write_fill(fill));
    }
    xml.push_str("</fills>");

    xml.push_str(&format!("<borders count=\"{}\">", table.borders().len()));
    for border in table.borders() {
        xml.push_str(&write_border(border));
    }
    xml.push_str("</borders>");

    xml.push_str(&format!(
        "<cellStyleXfs count=\"{}\">",
        table.style_records().len()
    ));
    for record in table.style_records() {
        xml.push_str(&write_xf(record, false));
    }
    xml.push_str("</cellStyleXfs>");

    xml.push_str(&format!("<cellXfs count=\"{}\">", table.records().len()));
    for record in table.records() {
        xml.push_str(&write_xf(record, true));
    }
    xml.push_str("</cellXfs>");

    xml.push_str(&format!(
        "<cellStyles count=\"{}\">",
        table.named_styles().len()
    ));
    for named in table.named_styles() {
        xml.push_str(&format!(
            "<cellStyle name=\"{}\" xfId=\"{}\"",
            xml::escape_attr(&named.name),
            named.record_id
        ));
        if let Some(builtin) = named.builtin_id {
            xml.push_str(&format!(" builtinId=\"{}\"", builtin));
        }
        if named.hidden {
            xml.push_str(" hidden=\"1\"");
        }
        xml.push_str("/>");
    }
    xml.push_str("</cellStyles>");

    xml.push_str("<dxfs count=\"0\"/>");
    xml.push_str(
        r#"<tableStyles count="0" defaultTableStyle="TableStyleMedium9" defaultPivotStyle="PivotStyleLight16"/>"#,
    );
    xml.push_str("</styleSheet>");

    out.write_all(xml.as_bytes())?;
    Ok(())
}

fn write_color(tag: &str, color: &Color) -> String {
    match color {
        Color::Auto => format!("<{tag} auto=\"1\"/>"),
        Color::Rgb { .. } | Color::Argb { .. } => match color.to_argb_hex() {
            Some(hex) => format!("<{tag} rgb=\"{hex}\"/>"),
            None => format!("<{tag} auto=\"1\"/>"),
        },
        Color::Indexed(i) => format!("<{tag} indexed=\"{}\"/>", i),
        Color::Theme { index, tint } => {
            if *tint == 0 {
                format!("<{tag} theme=\"{}\"/>", index)
            } else {
                format!(
                    "<{tag} theme=\"{}\" tint=\"{}\"/>",
                    index,
                    (*tint as f64) / 100.0
                )
            }
        }
    }
}

/// Font properties as the children of `<font>` or `<rPr>`
///
/// `name_tag` is `name` in the styles part and `rFont` in run properties.
pub(crate) fn push_font_properties(xml: &mut String, font: &FontStyle, name_tag: &str) {
    if font.bold {
        xml.push_str("<b/>");
    }
    if font.italic {
        xml.push_str("<i/>");
    }
    if font.strikethrough {
        xml.push_str("<strike/>");
    }
    match font.underline.as_ooxml() {
        None => {}
        Some("single") => xml.push_str("<u/>"),
        Some(val) => xml.push_str(&format!("<u val=\"{}\"/>", val)),
    }
    if font.vertical_align != FontVerticalAlign::Baseline {
        xml.push_str(&format!(
            "<vertAlign val=\"{}\"/>",
            font.vertical_align.as_ooxml()
        ));
    }
    xml.push_str(&format!("<sz val=\"{}\"/>", font.size));
    if !font.color.is_auto() {
        xml.push_str(&write_color("color", &font.color));
    }
    xml.push_str(&format!(
        "<{} val=\"{}\"/>",
        name_tag,
        xml::escape_attr(&font.name)
    ));
}

fn write_fill(fill: &FillStyle) -> String {
    match fill {
        FillStyle::None => "<fill><patternFill patternType=\"none\"/></fill>".to_string(),
        FillStyle::Solid { color } => format!(
            "<fill><patternFill patternType=\"solid\">{}</patternFill></fill>",
            write_color("fgColor", color)
        ),
        FillStyle::Pattern {
            pattern,
            foreground,
            background,
        } => {
            let mut colors = String::new();
            if !foreground.is_auto() {
                colors.push_str(&write_color("fgColor", foreground));
            }
            if !background.is_auto() {
                colors.push_str(&write_color("bgColor", background));
            }
            if colors.is_empty() {
                format!(
                    "<fill><patternFill patternType=\"{}\"/></fill>",
                    pattern.as_ooxml()
                )
            } else {
                format!(
                    "<fill><patternFill patternType=\"{}\">{}</patternFill></fill>",
                    pattern.as_ooxml(),
                    colors
                )
            }
        }
    }
}

fn write_border(border: &BorderStyle) -> String {
    let mut s = String::from("<border");
    if border.diagonal_up {
        s.push_str(" diagonalUp=\"1\"");
    }
    if border.diagonal_down {
        s.push_str(" diagonalDown=\"1\"");
    }
    s.push('>');
    for (tag, edge) in border.edges() {
        match edge {
            None => s.push_str(&format!("<{tag}/>")),
            Some(BorderEdge { style, color }) if color.is_auto() => {
                s.push_str(&format!("<{tag} style=\"{}\"/>", style.as_ooxml()));
            }
            Some(BorderEdge { style, color }) => {
                s.push_str(&format!(
                    "<{tag} style=\"{}\">{}</{tag}>",
                    style.as_ooxml(),
                    write_color("color", color)
                ));
            }
        }
    }
    s.push_str("</border>");
    s
}

fn write_alignment(al: &Alignment) -> String {
    if al.is_default() {
        return String::new();
    }
    let default = Alignment::default();

    let mut s = String::from("<alignment");
    if al.horizontal != default.horizontal {
        s.push_str(&format!(" horizontal=\"{}\"", al.horizontal.as_ooxml()));
    }
    if al.vertical != default.vertical {
        s.push_str(&format!(" vertical=\"{}\"", al.vertical.as_ooxml()));
    }
    if al.wrap_text {
        s.push_str(" wrapText=\"1\"");
    }
    if al.shrink_to_fit {
        s.push_str(" shrinkToFit=\"1\"");
    }
    if al.indent != 0 {
        s.push_str(&format!(" indent=\"{}\"", al.indent));
    }
    if al.rotation != 0 {
        s.push_str(&format!(" textRotation=\"{}\"", al.rotation));
    }
    s.push_str("/>");
    s
}

fn write_protection(p: &Protection) -> String {
    let default = Protection::default();
    if *p == default {
        return String::new();
    }
    let mut s = String::from("<protection");
    if p.locked != default.locked {
        s.push_str(&format!(" locked=\"{}\"", p.locked as u8));
    }
    if p.hidden != default.hidden {
        s.push_str(&format!(" hidden=\"{}\"", p.hidden as u8));
    }
    s.push_str("/>");
    s
}

fn write_xf(record: &FormatRecord, with_parent: bool) -> String {
    let mut s = format!(
        "<xf numFmtId=\"{}\" fontId=\"{}\" fillId=\"{}\" borderId=\"{}\"",
        record.number_format_id, record.font_id, record.fill_id, record.border_id
    );
    if with_parent {
        s.push_str(&format!(" xfId=\"{}\"", record.style_id));
    }

    let apply = &record.apply;
    for (flag, name) in [
        (apply.number_format, "applyNumberFormat"),
        (apply.font, "applyFont"),
        (apply.fill, "applyFill"),
        (apply.border, "applyBorder"),
        (apply.alignment, "applyAlignment"),
        (apply.protection, "applyProtection"),
    ] {
        if flag {
            s.push_str(&format!(" {}=\"1\"", name));
        }
    }

    let alignment_xml = write_alignment(&record.alignment);
    let protection_xml = write_protection(&record.protection);
    if alignment_xml.is_empty() && protection_xml.is_empty() {
        s.push_str("/>");
        return s;
    }
    s.push('>');
    s.push_str(&alignment_xml);
    s.push_str(&protection_xml);
    s.push_str("</xf>");
    s
}

// === Reading ===

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Other,
    NumFmts,
    Fonts,
    Fills,
    Borders,
    CellStyleXfs,
    CellXfs,
    CellStyles,
}

/// Positional replay state for one styles part
struct Replay {
    table: FormatTable,
    section: Section,
    font: Option<FontStyle>,
    fill: Option<(PatternType, Color, Color)>,
    border: Option<BorderStyle>,
    edge: Option<&'static str>,
    record: Option<FormatRecord>,
}

/// Parse a styles part into a format table
///
/// Entries are appended in document order without deduplication. Defaults
/// the part leaves out (fonts, the two reserved fills, record 0, `Normal`)
/// are filled in afterwards.
pub(crate) fn read_styles<B: BufRead>(source: B) -> XlsxResult<FormatTable> {
    let mut xml = xml::reader(source);
    let mut buf = Vec::new();
    let mut replay = Replay {
        table: FormatTable::empty(),
        section: Section::Other,
        font: None,
        fill: None,
        border: None,
        edge: None,
        record: None,
    };

    enum Step {
        Continue,
        Skip(Vec<u8>),
        Done,
    }

    loop {
        let step = match xml.read_event_into(&mut buf)? {
            Event::Start(e) => {
                if replay.open(&e)? {
                    Step::Skip(e.local_name().as_ref().to_vec())
                } else {
                    Step::Continue
                }
            }
            Event::Empty(e) => {
                replay.open(&e)?;
                replay.close(e.local_name().as_ref());
                Step::Continue
            }
            Event::End(e) => {
                replay.close(e.local_name().as_ref());
                Step::Continue
            }
            Event::Eof => Step::Done,
            _ => Step::Continue,
        };
        buf.clear();

        match step {
            Step::Continue => {}
            Step::Skip(name) => xml::skip_element(&mut xml, &mut buf, &name)?,
            Step::Done => break,
        }
    }

    let mut table = replay.table;
    table.ensure_defaults();
    log::debug!(
        "read styles: {} fonts, {} fills, {} borders, {} cell records",
        table.fonts().len(),
        table.fills().len(),
        table.borders().len(),
        table.len()
    );
    Ok(table)
}

impl Replay {
    /// Handle a start (or empty) tag; `true` means skip its content
    fn open(&mut self, e: &BytesStart<'_>) -> XlsxResult<bool> {
        let name = e.local_name();
        match name.as_ref() {
            b"numFmts" => self.section = Section::NumFmts,
            b"fonts" => self.section = Section::Fonts,
            b"fills" => self.section = Section::Fills,
            b"borders" => self.section = Section::Borders,
            b"cellStyleXfs" => self.section = Section::CellStyleXfs,
            b"cellXfs" => self.section = Section::CellXfs,
            b"cellStyles" => self.section = Section::CellStyles,

            b"dxfs" | b"tableStyles" | b"colors" | b"extLst" => return Ok(true),

            b"numFmt" if self.section == Section::NumFmts => {
                if let (Some(id), Some(code)) = (attr_u32(e, b"numFmtId")?, attr(e, b"formatCode")?)
                {
                    self.table.push_number_format(id, code);
                }
            }

            b"font" if self.section == Section::Fonts => self.font = Some(FontStyle::default()),

            b"fill" if self.section == Section::Fills => {
                self.fill = Some((PatternType::None, Color::Auto, Color::Auto))
            }
            b"patternFill" => {
                if let Some(fill) = self.fill.as_mut() {
                    fill.0 = attr(e, b"patternType")?
                        .and_then(|p| PatternType::from_ooxml(&p))
                        .unwrap_or(PatternType::None);
                }
            }
            b"gradientFill" => {
                log::debug!("gradient fill read as no fill");
                return Ok(true);
            }
            b"fgColor" => {
                if let Some(fill) = self.fill.as_mut() {
                    fill.1 = parse_color_attrs(e)?;
                }
            }
            b"bgColor" => {
                if let Some(fill) = self.fill.as_mut() {
                    fill.2 = parse_color_attrs(e)?;
                }
            }

            b"border" if self.section == Section::Borders => {
                self.border = Some(BorderStyle {
                    diagonal_up: attr_bool(e, b"diagonalUp", false)?,
                    diagonal_down: attr_bool(e, b"diagonalDown", false)?,
                    ..BorderStyle::default()
                });
            }
            b"left" | b"right" | b"top" | b"bottom" | b"diagonal" | b"start" | b"end" => {
                if let Some(border) = self.border.as_mut() {
                    let tag = edge_tag(name.as_ref());
                    self.edge = Some(tag);
                    let style = attr(e, b"style")?.and_then(|s| BorderLineStyle::from_ooxml(&s));
                    if let (Some(style), Some(slot)) = (style, border.edge_mut(tag)) {
                        *slot = Some(BorderEdge::new(style, Color::Auto));
                    }
                }
            }

            b"xf" if matches!(self.section, Section::CellStyleXfs | Section::CellXfs) => {
                self.record = Some(parse_xf(e)?);
            }
            b"alignment" => {
                if let Some(record) = self.record.as_mut() {
                    record.alignment = parse_alignment(e)?;
                }
            }
            b"protection" => {
                if let Some(record) = self.record.as_mut() {
                    record.protection = Protection {
                        locked: attr_bool(e, b"locked", true)?,
                        hidden: attr_bool(e, b"hidden", false)?,
                    };
                }
            }

            b"cellStyle" if self.section == Section::CellStyles => {
                let name = attr(e, b"name")?.unwrap_or_default();
                self.table.push_named_style(NamedStyle {
                    name,
                    record_id: attr_u32(e, b"xfId")?.unwrap_or(0),
                    builtin_id: attr_u32(e, b"builtinId")?,
                    hidden: attr_bool(e, b"hidden", false)?,
                });
            }

            b"color" => {
                if let Some(font) = self.font.as_mut() {
                    font.color = parse_color_attrs(e)?;
                } else if let (Some(border), Some(tag)) = (self.border.as_mut(), self.edge) {
                    if let Some(Some(edge)) = border.edge_mut(tag) {
                        edge.color = parse_color_attrs(e)?;
                    }
                }
            }

            other => {
                if let Some(font) = self.font.as_mut() {
                    apply_font_property(font, other, e)?;
                }
            }
        }
        Ok(false)
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"font" => {
                if let Some(font) = self.font.take() {
                    self.table.push_font(font);
                }
            }
            b"fill" => {
                if let Some((pattern, fg, bg)) = self.fill.take() {
                    self.table.push_fill(FillStyle::from_parts(pattern, fg, bg));
                }
            }
            b"border" => {
                if let Some(border) = self.border.take() {
                    self.table.push_border(border);
                }
                self.edge = None;
            }
            b"left" | b"right" | b"top" | b"bottom" | b"diagonal" | b"start" | b"end" => {
                self.edge = None;
            }
            b"xf" => match (self.record.take(), self.section) {
                (Some(record), Section::CellStyleXfs) => {
                    self.table.push_style_record(record);
                }
                (Some(record), Section::CellXfs) => {
                    self.table.push_record(record);
                }
                _ => {}
            },
            b"numFmts" | b"fonts" | b"fills" | b"borders" | b"cellStyleXfs" | b"cellXfs"
            | b"cellStyles" => self.section = Section::Other,
            _ => {}
        }
    }
}

fn edge_tag(name: &[u8]) -> &'static str {
    match name {
        b"left" | b"start" => "left",
        b"right" | b"end" => "right",
        b"top" => "top",
        b"bottom" => "bottom",
        _ => "diagonal",
    }
}

fn parse_xf(e: &BytesStart<'_>) -> XlsxResult<FormatRecord> {
    Ok(FormatRecord {
        number_format_id: attr_u32(e, b"numFmtId")?.unwrap_or(0),
        font_id: attr_u32(e, b"fontId")?.unwrap_or(0),
        fill_id: attr_u32(e, b"fillId")?.unwrap_or(0),
        border_id: attr_u32(e, b"borderId")?.unwrap_or(0),
        alignment: Alignment::default(),
        protection: Protection::default(),
        apply: ApplyFlags {
            number_format: attr_bool(e, b"applyNumberFormat", false)?,
            font: attr_bool(e, b"applyFont", false)?,
            fill: attr_bool(e, b"applyFill", false)?,
            border: attr_bool(e, b"applyBorder", false)?,
            alignment: attr_bool(e, b"applyAlignment", false)?,
            protection: attr_bool(e, b"applyProtection", false)?,
        },
        style_id: attr_u32(e, b"xfId")?.unwrap_or(0),
    })
}

fn parse_alignment(e: &BytesStart<'_>) -> XlsxResult<Alignment> {
    let mut al = Alignment::default();
    if let Some(h) = attr(e, b"horizontal")?.and_then(|v| HorizontalAlignment::from_ooxml(&v)) {
        al.horizontal = h;
    }
    if let Some(v) = attr(e, b"vertical")?.and_then(|v| VerticalAlignment::from_ooxml(&v)) {
        al.vertical = v;
    }
    al.wrap_text = attr_bool(e, b"wrapText", false)?;
    al.shrink_to_fit = attr_bool(e, b"shrinkToFit", false)?;
    al.indent = attr_u32(e, b"indent")?
        .and_then(|i| u8::try_from(i).ok())
        .unwrap_or(0);
    al.rotation = attr_u32(e, b"textRotation")?
        .and_then(|r| u8::try_from(r).ok())
        .unwrap_or(0);
    Ok(al)
}

/// Apply one child of `<font>` or `<rPr>` to `font`
///
/// Children with no counterpart in [`FontStyle`] (`family`, `scheme`, ...)
/// are ignored.
pub(crate) fn apply_font_property(
    font: &mut FontStyle,
    name: &[u8],
    e: &BytesStart<'_>,
) -> XlsxResult<()> {
    match name {
        b"b" => font.bold = attr_bool(e, b"val", true)?,
        b"i" => font.italic = attr_bool(e, b"val", true)?,
        b"strike" => font.strikethrough = attr_bool(e, b"val", true)?,
        b"u" => {
            font.underline = match attr(e, b"val")? {
                Some(v) => Underline::from_ooxml(&v),
                None => Underline::Single,
            }
        }
        b"sz" => {
            if let Some(size) = attr(e, b"val")?.and_then(|v| v.trim().parse::<f64>().ok()) {
                font.size = size;
            }
        }
        b"color" => font.color = parse_color_attrs(e)?,
        b"name" | b"rFont" => {
            if let Some(v) = attr(e, b"val")? {
                font.name = v;
            }
        }
        b"vertAlign" => {
            if let Some(v) = attr(e, b"val")?.and_then(|v| FontVerticalAlign::from_ooxml(&v)) {
                font.vertical_align = v;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Color from `rgb`, `theme`/`tint`, `indexed` or `auto`, in that priority
pub(crate) fn parse_color_attrs(e: &BytesStart<'_>) -> XlsxResult<Color> {
    if let Some(color) = attr(e, b"rgb")?.and_then(|hex| Color::from_hex(&hex)) {
        return Ok(color);
    }
    if let Some(index) = attr_u32(e, b"theme")?.and_then(|t| u8::try_from(t).ok()) {
        let tint = attr(e, b"tint")?
            .and_then(|t| t.trim().parse::<f64>().ok())
            .map(|t| (t * 100.0).round().clamp(-100.0, 100.0) as i8)
            .unwrap_or(0);
        return Ok(Color::Theme { index, tint });
    }
    if let Some(i) = attr_u32(e, b"indexed")?.and_then(|i| u8::try_from(i).ok()) {
        return Ok(Color::Indexed(i));
    }
    Ok(Color::Auto)
}
