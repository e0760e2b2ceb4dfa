//! Content-type dispatch from raw bytes to sanitized HTML.

use tracing::debug;

use crate::charset::decode_text;
use crate::markdown::markdown_to_html;
use crate::sanitize::Sanitizer;
use crate::sniff::sniff_content_type;
use crate::ConversionError;

/// Source formats the normalizer can convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// HTML, used directly.
    Html,
    /// Markdown, compiled to HTML.
    Markdown,
}

impl ContentKind {
    /// Maps a content type to a supported kind.
    ///
    /// Only the media type is compared (ASCII case-insensitive); parameters
    /// such as `charset` are ignored.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type.split(';').next().unwrap_or_default().trim();
        if essence.eq_ignore_ascii_case("text/html") {
            Some(Self::Html)
        } else if essence.eq_ignore_ascii_case("text/markdown") {
            Some(Self::Markdown)
        } else {
            None
        }
    }
}

/// Converts fetched bytes into sanitized HTML.
///
/// Dispatch order, first match wins:
/// 1. declared `text/html` is used as HTML
/// 2. declared `text/markdown` is compiled from Markdown
/// 3. otherwise the bytes are sniffed and 1-2 are applied to the sniffed type
/// 4. anything else is [`ConversionError::UnknownContentType`]
///
/// Text is decoded by the declared `charset` and defaults to UTF-8. The
/// resulting HTML always goes through the sanitizer, including HTML that was
/// served directly.
#[derive(Debug, Default)]
pub struct Normalizer {
    sanitizer: Sanitizer,
}

impl Normalizer {
    /// Creates a normalizer with the default sanitization policy.
    pub fn new() -> Self {
        Self::with_sanitizer(Sanitizer::ugc())
    }

    /// Creates a normalizer with a custom sanitizer.
    pub fn with_sanitizer(sanitizer: Sanitizer) -> Self {
        Self { sanitizer }
    }

    /// Resolves the content kind, sniffing when the declared type is unknown.
    pub fn detect(&self, bytes: &[u8], declared: &str) -> Result<ContentKind, ConversionError> {
        if let Some(kind) = ContentKind::from_content_type(declared) {
            return Ok(kind);
        }

        let sniffed = sniff_content_type(bytes);
        debug!("Declared content type `{}` unknown, sniffed `{}`", declared, sniffed);
        ContentKind::from_content_type(sniffed)
            .ok_or_else(|| ConversionError::unknown_content_type(declared, sniffed))
    }

    /// Produces sanitized HTML from raw bytes.
    pub fn normalize(&self, bytes: &[u8], declared: &str) -> Result<String, ConversionError> {
        let kind = self.detect(bytes, declared)?;
        let text = decode_text(bytes, declared)?;

        let html = match kind {
            ContentKind::Html => self.sanitizer.clean(&text),
            ContentKind::Markdown => self.sanitizer.clean(&markdown_to_html(&text)?),
        };
        Ok(html)
    }
}
