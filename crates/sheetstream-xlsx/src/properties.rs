//! Document properties: `docProps/core.xml` and `docProps/app.xml`

use std::io::{BufRead, Write};

use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::events::Event;

use crate::error::XlsxResult;
use crate::xml::{self, XML_DECLARATION};

pub(crate) const CORE_PROPERTIES_PART: &str = "docProps/core.xml";
pub(crate) const APP_PROPERTIES_PART: &str = "docProps/app.xml";

const NS_CORE: &str = "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";
const NS_EXTENDED: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties";

/// Package metadata kept outside the workbook part
///
/// Every field is optional; absent fields are not written. Dates are kept in
/// UTC and written in the W3C date-time form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentProperties {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub keywords: Option<String>,
    pub description: Option<String>,
    pub last_modified_by: Option<String>,
    pub category: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
    /// Producing application (`app.xml`)
    pub application: Option<String>,
    pub app_version: Option<String>,
    pub company: Option<String>,
}

impl DocumentProperties {
    /// Empty properties
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    pub fn with_application(mut self, application: impl Into<String>) -> Self {
        self.application = Some(application.into());
        self
    }

    /// Set both the creation and modification time
    pub fn with_created(mut self, at: DateTime<Utc>) -> Self {
        self.created = Some(at);
        self.modified = Some(at);
        self
    }
}

/// Which field an element of either part fills
#[derive(Debug, Clone, Copy)]
enum Field {
    Title,
    Subject,
    Creator,
    Keywords,
    Description,
    LastModifiedBy,
    Category,
    Created,
    Modified,
    Application,
    AppVersion,
    Company,
}

impl Field {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        Some(match name {
            b"title" => Field::Title,
            b"subject" => Field::Subject,
            b"creator" => Field::Creator,
            b"keywords" => Field::Keywords,
            b"description" => Field::Description,
            b"lastModifiedBy" => Field::LastModifiedBy,
            b"category" => Field::Category,
            b"created" => Field::Created,
            b"modified" => Field::Modified,
            b"Application" => Field::Application,
            b"AppVersion" => Field::AppVersion,
            b"Company" => Field::Company,
            _ => return None,
        })
    }

    fn end_tag(self) -> &'static [u8] {
        match self {
            Field::Title => b"title",
            Field::Subject => b"subject",
            Field::Creator => b"creator",
            Field::Keywords => b"keywords",
            Field::Description => b"description",
            Field::LastModifiedBy => b"lastModifiedBy",
            Field::Category => b"category",
            Field::Created => b"created",
            Field::Modified => b"modified",
            Field::Application => b"Application",
            Field::AppVersion => b"AppVersion",
            Field::Company => b"Company",
        }
    }

    fn store(self, props: &mut DocumentProperties, text: String) {
        match self {
            Field::Title => props.title = Some(text),
            Field::Subject => props.subject = Some(text),
            Field::Creator => props.creator = Some(text),
            Field::Keywords => props.keywords = Some(text),
            Field::Description => props.description = Some(text),
            Field::LastModifiedBy => props.last_modified_by = Some(text),
            Field::Category => props.category = Some(text),
            Field::Created => props.created = parse_date(&text),
            Field::Modified => props.modified = parse_date(&text),
            Field::Application => props.application = Some(text),
            Field::AppVersion => props.app_version = Some(text),
            Field::Company => props.company = Some(text),
        }
    }
}

fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(text.trim()) {
        Ok(at) => Some(at.with_timezone(&Utc)),
        Err(e) => {
            log::warn!("ignoring document date '{}': {}", text, e);
            None
        }
    }
}

/// Read either properties part into `props`
///
/// Unknown elements are skipped, so core and extended parts can be fed
/// through the same reader.
pub(crate) fn read_properties<B: BufRead>(
    source: B,
    props: &mut DocumentProperties,
) -> XlsxResult<()> {
    let mut xml = xml::reader(source);
    let mut buf = Vec::new();

    loop {
        let field = match xml.read_event_into(&mut buf)? {
            Event::Start(e) => Field::from_local_name(e.local_name().as_ref()),
            Event::Eof => break,
            _ => None,
        };
        buf.clear();
        if let Some(field) = field {
            let text = xml::read_text(&mut xml, &mut buf, field.end_tag())?;
            field.store(props, text);
        }
    }
    Ok(())
}

fn push_element(content: &mut String, tag: &str, value: Option<&str>) {
    if let Some(value) = value {
        content.push_str(&format!("<{0}>{1}</{0}>", tag, xml::escape_text(value)));
    }
}

fn push_date(content: &mut String, tag: &str, value: Option<&DateTime<Utc>>) {
    if let Some(at) = value {
        content.push_str(&format!(
            "<{0} xsi:type=\"dcterms:W3CDTF\">{1}</{0}>",
            tag,
            at.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
    }
}

pub(crate) fn write_core_properties<W: Write>(
    mut out: W,
    props: &DocumentProperties,
) -> XlsxResult<()> {
    let mut content = format!(
        "{}\n<cp:coreProperties xmlns:cp=\"{}\" xmlns:dc=\"http://purl.org/dc/elements/1.1/\" xmlns:dcterms=\"http://purl.org/dc/terms/\" xmlns:dcmitype=\"http://purl.org/dc/dcmitype/\" xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">",
        XML_DECLARATION, NS_CORE
    );
    push_element(&mut content, "dc:title", props.title.as_deref());
    push_element(&mut content, "dc:subject", props.subject.as_deref());
    push_element(&mut content, "dc:creator", props.creator.as_deref());
    push_element(&mut content, "cp:keywords", props.keywords.as_deref());
    push_element(&mut content, "dc:description", props.description.as_deref());
    push_element(&mut content, "cp:lastModifiedBy", props.last_modified_by.as_deref());
    push_element(&mut content, "cp:category", props.category.as_deref());
    push_date(&mut content, "dcterms:created", props.created.as_ref());
    push_date(&mut content, "dcterms:modified", props.modified.as_ref());
    content.push_str("</cp:coreProperties>");

    out.write_all(content.as_bytes())?;
    Ok(())
}

pub(crate) fn write_app_properties<W: Write>(
    mut out: W,
    props: &DocumentProperties,
) -> XlsxResult<()> {
    let mut content = format!(
        "{}\n<Properties xmlns=\"{}\">",
        XML_DECLARATION, NS_EXTENDED
    );
    push_element(&mut content, "Application", props.application.as_deref());
    content.push_str("<DocSecurity>0</DocSecurity><ScaleCrop>false</ScaleCrop>");
    push_element(&mut content, "Company", props.company.as_deref());
    push_element(&mut content, "AppVersion", props.app_version.as_deref());
    content.push_str("</Properties>");

    out.write_all(content.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_properties_roundtrip() {
        let props = DocumentProperties {
            title: Some("Q3 <draft> & notes".into()),
            keywords: Some("sales, 2024".into()),
            last_modified_by: Some("Ops".into()),
            company: Some("Acme".into()),
            app_version: Some("1.0".into()),
            ..DocumentProperties::new()
                .with_creator("Finance")
                .with_application("sheetstream")
                .with_created(Utc.with_ymd_and_hms(2024, 7, 1, 9, 30, 0).unwrap())
        };

        let mut core = Vec::new();
        write_core_properties(&mut core, &props).unwrap();
        let mut app = Vec::new();
        write_app_properties(&mut app, &props).unwrap();

        let text = String::from_utf8(core.clone()).unwrap();
        assert!(text.contains(
            r#"<dcterms:created xsi:type="dcterms:W3CDTF">2024-07-01T09:30:00Z</dcterms:created>"#
        ));
        assert!(text.contains("<dc:title>Q3 &lt;draft&gt; &amp; notes</dc:title>"));
        assert!(!text.contains("dc:subject"));

        let mut back = DocumentProperties::new();
        read_properties(&core[..], &mut back).unwrap();
        read_properties(&app[..], &mut back).unwrap();
        assert_eq!(back, props);
    }

    #[test]
    fn test_read_excel_core_properties() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <dc:creator>Microsoft Office User</dc:creator>
  <cp:lastModifiedBy/>
  <dcterms:created xsi:type="dcterms:W3CDTF">2016-08-12T03:16:56+02:00</dcterms:created>
  <dcterms:modified xsi:type="dcterms:W3CDTF">yesterday</dcterms:modified>
</cp:coreProperties>"#;
        let mut props = DocumentProperties::new();
        read_properties(xml.as_bytes(), &mut props).unwrap();

        assert_eq!(props.creator.as_deref(), Some("Microsoft Office User"));
        assert_eq!(props.last_modified_by, None);
        assert_eq!(
            props.created,
            Some(Utc.with_ymd_and_hms(2016, 8, 12, 1, 16, 56).unwrap())
        );
        assert_eq!(props.modified, None);
    }
}
