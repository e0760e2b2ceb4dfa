//! Content source abstraction.

use async_trait::async_trait;

use crate::error::FetchError;

/// Raw response for one address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedContent {
    /// Full response body.
    pub bytes: Vec<u8>,
    /// Content type declared by the transport. May be empty or generic.
    pub content_type: String,
}

impl FetchedContent {
    /// Creates a new fetched content value.
    pub fn new(bytes: impl Into<Vec<u8>>, content_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: content_type.into(),
        }
    }
}

/// Something that can fetch the bytes behind a slide address.
///
/// Implementations must be safe to call from many tasks at once. They must not
/// retry on their own.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetches the full body for `address`.
    async fn fetch(&self, address: &str) -> Result<FetchedContent, FetchError>;
}

/// Guesses a content type from the address extension.
///
/// Used when the transport declared no type or a generic one. Returns an empty
/// string when the extension is not one the normalizer understands.
pub fn content_type_hint(address: &str) -> &'static str {
    let path = address
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    if path.ends_with(".md") || path.ends_with(".markdown") {
        "text/markdown"
    } else if path.ends_with(".html") || path.ends_with(".htm") {
        "text/html"
    } else {
        ""
    }
}
