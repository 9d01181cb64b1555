//! Workbook part, relationships and the content-types manifest

use std::io::{BufRead, Write};

use quick_xml::events::Event;

use crate::error::XlsxResult;
use crate::properties::{APP_PROPERTIES_PART, CORE_PROPERTIES_PART};
use crate::xml::{self, attr, attr_bool, attr_u32, XML_DECLARATION};
use sheetstream_core::DateSystem;

pub(crate) const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
pub(crate) const ROOT_RELS_PART: &str = "_rels/.rels";
pub(crate) const WORKBOOK_PART: &str = "xl/workbook.xml";
pub(crate) const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
pub(crate) const STYLES_PART: &str = "xl/styles.xml";
pub(crate) const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";

const NS_PACKAGE_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const REL_CORE_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";

/// What a relationship points at, by the last segment of its type URI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RelKind {
    OfficeDocument,
    Worksheet,
    Styles,
    SharedStrings,
    CoreProperties,
    ExtendedProperties,
    Other,
}

impl RelKind {
    fn from_type(rel_type: &str) -> Self {
        match rel_type.rsplit('/').next() {
            Some("officeDocument") => RelKind::OfficeDocument,
            Some("worksheet") => RelKind::Worksheet,
            Some("styles") => RelKind::Styles,
            Some("sharedStrings") => RelKind::SharedStrings,
            Some("core-properties") => RelKind::CoreProperties,
            Some("extended-properties") => RelKind::ExtendedProperties,
            _ => RelKind::Other,
        }
    }
}

/// One `<Relationship>` with its target already resolved to a part name
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Relationship {
    pub id: String,
    pub kind: RelKind,
    pub target: String,
}

/// One `<sheet>` of the workbook part
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SheetEntry {
    pub name: String,
    pub sheet_id: u32,
    pub rel_id: String,
    pub visible: bool,
}

/// Sheet list and settings of the workbook part
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct WorkbookPart {
    pub sheets: Vec<SheetEntry>,
    pub date_system: DateSystem,
}

pub(crate) fn read_workbook<B: BufRead>(source: B) -> XlsxResult<WorkbookPart> {
    let mut xml = xml::reader(source);
    let mut buf = Vec::new();
    let mut part = WorkbookPart::default();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"workbookPr" => {
                    if attr_bool(&e, b"date1904", false)? {
                        part.date_system = DateSystem::Mac1904;
                    }
                }
                b"sheet" => {
                    if let (Some(name), Some(rel_id)) = (attr(&e, b"name")?, attr(&e, b"id")?) {
                        let state = attr(&e, b"state")?;
                        part.sheets.push(SheetEntry {
                            name,
                            sheet_id: attr_u32(&e, b"sheetId")?.unwrap_or(0),
                            rel_id,
                            visible: !matches!(state.as_deref(), Some("hidden" | "veryHidden")),
                        });
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    log::debug!(
        "workbook part: {} sheets, {:?}",
        part.sheets.len(),
        part.date_system
    );
    Ok(part)
}

/// Read a relationships part; `source_part` is the part it belongs to
///
/// External targets are dropped.
pub(crate) fn read_relationships<B: BufRead>(
    source: B,
    source_part: &str,
) -> XlsxResult<Vec<Relationship>> {
    let mut xml = xml::reader(source);
    let mut buf = Vec::new();
    let mut rels = Vec::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let external = attr(&e, b"TargetMode")?.as_deref() == Some("External");
                if let (false, Some(id), Some(rel_type), Some(target)) = (
                    external,
                    attr(&e, b"Id")?,
                    attr(&e, b"Type")?,
                    attr(&e, b"Target")?,
                ) {
                    rels.push(Relationship {
                        id,
                        kind: RelKind::from_type(&rel_type),
                        target: resolve_target(source_part, &target),
                    });
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(rels)
}

/// Resolve a relationship target against the directory of `source_part`
///
/// `source_part` is `""` for the package root. Absolute targets start with
/// `/`; `..` segments climb out of the source directory.
pub(crate) fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = match source_part.rfind('/') {
        Some(slash) => source_part[..slash].split('/').collect(),
        None => Vec::new(),
    };
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

/// Part name of the relationships part belonging to `part`
pub(crate) fn rels_part_for(part: &str) -> String {
    match part.rfind('/') {
        Some(slash) => format!("{}/_rels/{}.rels", &part[..slash], &part[slash + 1..]),
        None => format!("_rels/{}.rels", part),
    }
}

/// Part name of the `index`-th (0-based) worksheet
pub(crate) fn worksheet_part(index: usize) -> String {
    format!("xl/worksheets/sheet{}.xml", index + 1)
}

// === Writing ===

pub(crate) fn write_workbook<W: Write>(
    mut out: W,
    sheets: &[SheetEntry],
    date_system: DateSystem,
) -> XlsxResult<()> {
    let mut content = format!(
        "{}\n<workbook xmlns=\"{}\" xmlns:r=\"{}\">",
        XML_DECLARATION,
        xml::NS_MAIN,
        xml::NS_RELATIONSHIPS
    );
    if date_system.is_1904() {
        content.push_str("<workbookPr date1904=\"1\"/>");
    }
    content.push_str("<sheets>");
    for sheet in sheets {
        content.push_str(&format!(
            "<sheet name=\"{}\" sheetId=\"{}\"",
            xml::escape_attr(&sheet.name),
            sheet.sheet_id
        ));
        if !sheet.visible {
            content.push_str(" state=\"hidden\"");
        }
        content.push_str(&format!(" r:id=\"{}\"/>", xml::escape_attr(&sheet.rel_id)));
    }
    content.push_str("</sheets></workbook>");

    out.write_all(content.as_bytes())?;
    Ok(())
}

/// Workbook relationships: sheets as `rId1..rIdN`, then styles and shared strings
pub(crate) fn write_workbook_rels<W: Write>(mut out: W, sheet_count: usize) -> XlsxResult<()> {
    let mut content = format!(
        "{}\n<Relationships xmlns=\"{}\">",
        XML_DECLARATION, NS_PACKAGE_RELS
    );
    for i in 0..sheet_count {
        content.push_str(&format!(
            "<Relationship Id=\"rId{}\" Type=\"{}/worksheet\" Target=\"worksheets/sheet{}.xml\"/>",
            i + 1,
            REL_BASE,
            i + 1
        ));
    }
    content.push_str(&format!(
        "<Relationship Id=\"rId{}\" Type=\"{}/styles\" Target=\"styles.xml\"/>",
        sheet_count + 1,
        REL_BASE
    ));
    content.push_str(&format!(
        "<Relationship Id=\"rId{}\" Type=\"{}/sharedStrings\" Target=\"sharedStrings.xml\"/>",
        sheet_count + 2,
        REL_BASE
    ));
    content.push_str("</Relationships>");

    out.write_all(content.as_bytes())?;
    Ok(())
}

/// Package relationships: the workbook, then the core and extended properties
pub(crate) fn write_root_rels<W: Write>(mut out: W) -> XlsxResult<()> {
    let content = format!(
        "{0}\n<Relationships xmlns=\"{1}\"><Relationship Id=\"rId1\" Type=\"{2}/officeDocument\" Target=\"{3}\"/><Relationship Id=\"rId2\" Type=\"{4}\" Target=\"{5}\"/><Relationship Id=\"rId3\" Type=\"{2}/extended-properties\" Target=\"{6}\"/></Relationships>",
        XML_DECLARATION,
        NS_PACKAGE_RELS,
        REL_BASE,
        WORKBOOK_PART,
        REL_CORE_PROPERTIES,
        CORE_PROPERTIES_PART,
        APP_PROPERTIES_PART
    );
    out.write_all(content.as_bytes())?;
    Ok(())
}

pub(crate) fn write_content_types<W: Write>(mut out: W, sheet_count: usize) -> XlsxResult<()> {
    let mut content = format!(
        r#"{}
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/><Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/><Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#,
        XML_DECLARATION
    );
    for i in 0..sheet_count {
        content.push_str(&format!(
            r#"<Override PartName="/{}" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            worksheet_part(i)
        ));
    }
    content.push_str("</Types>");

    out.write_all(content.as_bytes())?;
    Ok(())
}
