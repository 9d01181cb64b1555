//! Small helpers over quick-xml shared by the part readers and writers

use std::borrow::Cow;
use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{XlsxError, XlsxResult};

pub(crate) const XML_DECLARATION: &str =
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

pub(crate) const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
pub(crate) const NS_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Create a pull parser that keeps whitespace (it is significant in `<t>`)
pub(crate) fn reader<B: BufRead>(source: B) -> Reader<B> {
    let mut reader = Reader::from_reader(source);
    reader.trim_text(false);
    reader
}

/// Value of the attribute with local name `key`
pub(crate) fn attr(e: &BytesStart<'_>, key: &[u8]) -> XlsxResult<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Attribute parsed as a number; unparseable values count as absent
pub(crate) fn attr_u32(e: &BytesStart<'_>, key: &[u8]) -> XlsxResult<Option<u32>> {
    Ok(attr(e, key)?.and_then(|v| v.trim().parse().ok()))
}

/// OOXML boolean attribute (`1`/`true`); absent means `default`
pub(crate) fn attr_bool(e: &BytesStart<'_>, key: &[u8], default: bool) -> XlsxResult<bool> {
    Ok(match attr(e, key)?.as_deref() {
        Some("1") | Some("true") => true,
        Some("0") | Some("false") => false,
        _ => default,
    })
}

/// Collect the text content up to the end tag `end`
///
/// Nested elements are skipped but their text is kept.
pub(crate) fn read_text<B: BufRead>(
    xml: &mut Reader<B>,
    buf: &mut Vec<u8>,
    end: &[u8],
) -> XlsxResult<String> {
    let mut text = String::new();
    loop {
        let done = match xml.read_event_into(buf)? {
            Event::Text(t) => {
                text.push_str(&t.unescape()?);
                false
            }
            Event::CData(c) => {
                text.push_str(&String::from_utf8_lossy(&c));
                false
            }
            Event::End(e) => e.local_name().as_ref() == end,
            Event::Eof => {
                return Err(XlsxError::InvalidFile(format!(
                    "unexpected end of part inside <{}>",
                    String::from_utf8_lossy(end)
                )))
            }
            _ => false,
        };
        buf.clear();
        if done {
            return Ok(text);
        }
    }
}

/// Skip everything up to the end tag matching an already-read start tag
pub(crate) fn skip_element<B: BufRead>(
    xml: &mut Reader<B>,
    buf: &mut Vec<u8>,
    name: &[u8],
) -> XlsxResult<()> {
    let mut depth = 0usize;
    loop {
        let step = match xml.read_event_into(buf)? {
            Event::Start(e) if e.local_name().as_ref() == name => Some(true),
            Event::End(e) if e.local_name().as_ref() == name => Some(false),
            Event::Eof => {
                return Err(XlsxError::InvalidFile(format!(
                    "unexpected end of part inside <{}>",
                    String::from_utf8_lossy(name)
                )))
            }
            _ => None,
        };
        buf.clear();
        match step {
            Some(true) => depth += 1,
            Some(false) if depth == 0 => return Ok(()),
            Some(false) => depth -= 1,
            None => {}
        }
    }
}

/// Escape text for an attribute value
pub(crate) fn escape_attr(s: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(s)
}

/// Escape text for element content
pub(crate) fn escape_text(s: &str) -> Cow<'_, str> {
    quick_xml::escape::partial_escape(s)
}

/// Whether `<t>` needs `xml:space="preserve"` to keep `s` intact
pub(crate) fn needs_preserve(s: &str) -> bool {
    s.starts_with(char::is_whitespace) || s.ends_with(char::is_whitespace)
}
