//! Text decoding by the declared charset.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8};

use crate::ConversionError;

/// Returns the `charset` parameter of a content type, if any.
pub fn charset_label(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let label = value.trim().trim_matches('"').trim_matches('\'');
        (!label.is_empty()).then_some(label)
    })
}

/// Decodes fetched bytes to text.
///
/// Without a `charset` parameter, or with a UTF-8 one, the bytes must be
/// strict UTF-8 (a leading BOM is dropped). Any other label known to the
/// WHATWG encoding registry is decoded with that encoding; malformed input
/// is an error rather than being replaced.
pub fn decode_text<'a>(bytes: &'a [u8], content_type: &str) -> Result<Cow<'a, str>, ConversionError> {
    let encoding = match charset_label(content_type) {
        Some(label) => Encoding::for_label(label.as_bytes())
            .ok_or_else(|| ConversionError::UnsupportedCharset(label.to_string()))?,
        None => UTF_8,
    };

    if encoding == UTF_8 {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        return Ok(Cow::Borrowed(std::str::from_utf8(bytes)?));
    }

    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .ok_or(ConversionError::Undecodable {
            charset: encoding.name(),
        })
}
