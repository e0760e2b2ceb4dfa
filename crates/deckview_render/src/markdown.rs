//! Markdown to HTML using markdown-rs (wooorm/markdown-rs).

use markdown::{CompileOptions, Options, ParseOptions};

use crate::ConversionError;

/// Compiles Markdown to HTML.
///
/// Uses GFM (tables, strikethrough, autolink literals, task lists). Raw HTML
/// embedded in the document is passed through untouched: the result is not
/// safe to display until it has been sanitized.
pub fn markdown_to_html(source: &str) -> Result<String, ConversionError> {
    markdown::to_html_with_options(source, &default_options())
        .map_err(|e| ConversionError::markdown(e.to_string()))
}

/// Gets default options (GFM, raw HTML left for the sanitizer).
fn default_options() -> Options {
    Options {
        parse: ParseOptions::gfm(),
        compile: CompileOptions {
            allow_dangerous_html: true,
            allow_dangerous_protocol: true,
            ..CompileOptions::gfm()
        },
    }
}
