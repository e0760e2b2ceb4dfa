//! Hyperlink extraction from normalized HTML.

use std::sync::OnceLock;

use scraper::{Html, Selector};

static ANCHOR_SELECTOR: OnceLock<Selector> = OnceLock::new();

/// A hyperlink found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Raw `href` value.
    pub href: String,
    /// Whitespace-collapsed link text. Empty when the link has no text.
    pub text: String,
}

/// Returns every `<a href>` in document order.
///
/// Links without text are kept with an empty `text`; it is up to the caller to
/// decide whether such an entry is useful.
pub fn extract_links(html: &str) -> Vec<Link> {
    let selector = ANCHOR_SELECTOR.get_or_init(|| {
        Selector::parse("a[href]").expect("static anchor selector is valid")
    });

    let document = Html::parse_fragment(html);
    document
        .select(selector)
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            let text = element
                .text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" ");
            Some(Link {
                href: href.to_string(),
                text,
            })
        })
        .collect()
}
