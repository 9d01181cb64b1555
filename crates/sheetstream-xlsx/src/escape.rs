//! Excel's `_xHHHH_` escapes for cell text
//!
//! XML 1.0 cannot carry most control characters, so Excel writes them as
//! `_x` + four hex digits + `_`. A literal `_xHHHH_` in user text is protected
//! by escaping its leading underscore (`_x005F_`).

use std::borrow::Cow;

/// Length of one `_xHHHH_` sequence
const ESCAPE_LEN: usize = 7;

/// Whether `s` starts with a well-formed `_xHHHH_` sequence
fn escape_at(s: &str) -> Option<u32> {
    let bytes = s.as_bytes();
    if bytes.len() < ESCAPE_LEN
        || bytes[0] != b'_'
        || bytes[1] != b'x'
        || bytes[ESCAPE_LEN - 1] != b'_'
    {
        return None;
    }
    let hex = s.get(2..6)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

/// Decode `_xHHHH_` sequences
///
/// Incomplete sequences and code points that are not valid chars are kept
/// as-is.
pub(crate) fn decode_excel_escapes(s: &str) -> Cow<'_, str> {
    if !s.contains("_x") {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('_') {
        result.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match escape_at(rest).and_then(char::from_u32) {
            Some(decoded) => {
                result.push(decoded);
                rest = &rest[ESCAPE_LEN..];
            }
            None => {
                result.push('_');
                rest = &rest[1..];
            }
        }
    }
    result.push_str(rest);
    Cow::Owned(result)
}

fn needs_escape(c: char) -> bool {
    match c {
        '\t' | '\n' => false,
        '\r' => true,
        c => c < '\u{20}' || c == '\u{FFFE}' || c == '\u{FFFF}',
    }
}

/// Encode text so that [`decode_excel_escapes`] gives it back unchanged
pub(crate) fn encode_excel_escapes(s: &str) -> Cow<'_, str> {
    let clean =
        !s.chars().any(needs_escape) && !s.match_indices('_').any(|(i, _)| protect(&s[i..]));
    if clean {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for (i, c) in s.char_indices() {
        if needs_escape(c) {
            result.push_str(&format!("_x{:04X}_", c as u32));
        } else if c == '_' && protect(&s[i..]) {
            result.push_str("_x005F_");
        } else {
            result.push(c);
        }
    }
    Cow::Owned(result)
}

/// Whether the underscore starting `s` would decode as an escape once written
///
/// That is the case for a literal `_xHHHH_`, and also for `_xHHHH` directly
/// followed by a character that is itself about to be escaped.
fn protect(s: &str) -> bool {
    let Some(head) = s.get(..ESCAPE_LEN - 1) else {
        return false;
    };
    let bytes = head.as_bytes();
    if bytes[0] != b'_' || bytes[1] != b'x' || !bytes[2..].iter().all(u8::is_ascii_hexdigit) {
        return false;
    }
    s[ESCAPE_LEN - 1..]
        .chars()
        .next()
        .is_some_and(|next| next == '_' || needs_escape(next))
}
