//! Content sniffing for responses with a missing or unhelpful content type.
//!
//! Follows the HTML part of the WHATWG MIME sniffing algorithm: leading
//! whitespace is skipped and the first bytes are compared case-insensitively
//! against known HTML tag prefixes, which must be followed by a space or `>`.

/// Number of leading bytes examined.
const SNIFF_LEN: usize = 512;

/// Tag prefixes that identify an HTML document.
const HTML_SIGNATURES: &[&[u8]] = &[
    b"<!DOCTYPE HTML",
    b"<HTML",
    b"<HEAD",
    b"<SCRIPT",
    b"<IFRAME",
    b"<H1",
    b"<DIV",
    b"<FONT",
    b"<TABLE",
    b"<A",
    b"<STYLE",
    b"<TITLE",
    b"<B",
    b"<BODY",
    b"<BR",
    b"<P",
    b"<!--",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Derives a content type from the leading bytes of a document.
///
/// Returns `text/html; charset=utf-8` for HTML, `text/plain; charset=utf-8`
/// for other UTF-8 text and `application/octet-stream` otherwise.
pub fn sniff_content_type(bytes: &[u8]) -> &'static str {
    let head = &bytes[..bytes.len().min(SNIFF_LEN)];
    let head = head.strip_prefix(UTF8_BOM).unwrap_or(head);
    let trimmed = trim_leading_whitespace(head);

    if HTML_SIGNATURES
        .iter()
        .any(|sig| matches_html_signature(trimmed, sig))
    {
        return "text/html; charset=utf-8";
    }

    if is_text(head) {
        "text/plain; charset=utf-8"
    } else {
        "application/octet-stream"
    }
}

fn trim_leading_whitespace(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !matches!(b, b'\t' | b'\n' | b'\x0C' | b'\r' | b' '))
        .unwrap_or(bytes.len());
    &bytes[start..]
}

fn matches_html_signature(data: &[u8], sig: &[u8]) -> bool {
    if data.len() <= sig.len() {
        return false;
    }
    if !data[..sig.len()].eq_ignore_ascii_case(sig) {
        return false;
    }
    matches!(data[sig.len()], b' ' | b'>')
}

/// Text means no binary control bytes and valid UTF-8, allowing a multi-byte
/// sequence to be cut at the sniffing boundary.
fn is_text(bytes: &[u8]) -> bool {
    let binary = bytes
        .iter()
        .any(|b| matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F));
    if binary {
        return false;
    }
    match std::str::from_utf8(bytes) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none(),
    }
}
