//! # deckview_render
//!
//! Turns fetched slide bytes into HTML that is safe to display.
//!
//! This crate provides:
//! - Content-type dispatch with a sniffing fallback ([`ContentKind`], [`sniff_content_type`])
//! - Charset-aware text decoding ([`decode_text`]), UTF-8 by default
//! - Markdown to HTML conversion using `markdown-rs`
//! - An unconditional sanitization pass using `ammonia`
//! - Hyperlink extraction for manifest discovery ([`extract_links`])
//!
//! ## Example
//!
//! ```rust
//! use deckview_render::Normalizer;
//!
//! let normalizer = Normalizer::new();
//! let html = normalizer
//!     .normalize(b"# Intro\n\nHello", "text/markdown; charset=utf-8")
//!     .unwrap();
//! assert!(html.contains("<h1>Intro</h1>"));
//! ```

mod charset;
mod error;
mod links;
mod markdown;
mod normalizer;
mod sanitize;
mod sniff;

pub use charset::{charset_label, decode_text};
pub use error::ConversionError;
pub use links::{Link, extract_links};
pub use markdown::markdown_to_html;
pub use normalizer::{ContentKind, Normalizer};
pub use sanitize::{Sanitizer, escape_text};
pub use sniff::sniff_content_type;
