//! Conversion error types.

use thiserror::Error;

/// Errors that can occur while turning raw bytes into sanitized HTML.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// Neither the declared nor the sniffed content type is supported.
    #[error("Unknown content type: {declared} (sniffed as {sniffed})")]
    UnknownContentType {
        /// Content type declared by the transport.
        declared: String,
        /// Content type derived from the bytes.
        sniffed: String,
    },

    /// The bytes are not valid UTF-8 text.
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(#[from] std::str::Utf8Error),

    /// The declared charset is not a known encoding label.
    #[error("Unsupported charset: {0}")]
    UnsupportedCharset(String),

    /// The bytes are malformed for the declared charset.
    #[error("Content is not valid {charset}")]
    Undecodable {
        /// Canonical name of the declared encoding.
        charset: &'static str,
    },

    /// The Markdown compiler rejected the document.
    #[error("Markdown conversion failed: {0}")]
    Markdown(String),
}

impl ConversionError {
    /// Creates an unknown content type error.
    pub fn unknown_content_type(declared: impl Into<String>, sniffed: impl Into<String>) -> Self {
        Self::UnknownContentType {
            declared: declared.into(),
            sniffed: sniffed.into(),
        }
    }

    /// Creates a Markdown conversion error.
    pub fn markdown(message: impl Into<String>) -> Self {
        Self::Markdown(message.into())
    }
}
