//! HTML sanitization.

use ammonia::Builder;

/// Tags allowed on top of ammonia's default whitelist.
const EXTRA_TAGS: &[&str] = &["section", "main"];

/// Tags whose `class` attribute survives, for syntax-highlighting hooks.
const CLASS_TAGS: &[&str] = &["code", "pre", "span"];

/// Tags removed together with everything inside them.
const CLEAN_CONTENT_TAGS: &[&str] = &[
    "title", "noscript", "iframe", "noembed", "noframes", "nav", "object", "script", "style",
];

/// Relationship forced onto every link.
const LINK_REL: &str = "nofollow noopener noreferrer";

/// Strips unsafe markup from HTML fragments.
///
/// The policy is the permissive "user-generated content" one: common
/// structure and formatting tags stay, while scripts, styles, event handler
/// attributes and unsafe URL schemes are removed. Relative URLs pass through.
/// Document chrome such as `<title>` and `<nav>` is dropped along with its
/// text, so a full HTML page reduces to its body content.
#[derive(Debug)]
pub struct Sanitizer {
    builder: Builder<'static>,
}

impl Sanitizer {
    /// Creates a sanitizer with the user-generated content policy.
    pub fn ugc() -> Self {
        let mut builder = Builder::default();
        // ammonia rejects a tag that is both allowed and content-cleaned
        builder
            .add_tags(EXTRA_TAGS)
            .rm_tags(&["nav"])
            .add_clean_content_tags(CLEAN_CONTENT_TAGS)
            .link_rel(Some(LINK_REL));
        for tag in CLASS_TAGS {
            builder.add_tag_attributes(*tag, &["class"]);
        }
        Self { builder }
    }

    /// Sanitizes an HTML fragment.
    pub fn clean(&self, html: &str) -> String {
        self.builder.clean(html).to_string()
    }
}

/// Escapes plain text for safe insertion into HTML.
pub fn escape_text(text: &str) -> String {
    ammonia::clean_text(text)
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::ugc()
    }
}
