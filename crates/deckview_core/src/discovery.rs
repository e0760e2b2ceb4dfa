//! Slide manifest discovery.
//!
//! The manifest comes from an index document: the first candidate address that
//! can be fetched, normalized and yields at least one link wins. Every
//! hyperlink in the normalized index becomes a slide, in document order.

use std::fmt;

use deckview_cache::Slide;
use deckview_fetch::ContentSource;
use deckview_render::{Normalizer, extract_links};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

/// One failed candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryAttempt {
    /// Candidate address.
    pub address: String,
    /// Why it was rejected.
    pub reason: String,
    /// The source reported the candidate as absent.
    pub missing: bool,
}

impl fmt::Display for DiscoveryAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.address, self.reason)
    }
}

/// None of the candidate index addresses produced a manifest.
#[derive(Debug, Clone, Error)]
#[error("Unable to load slide show: {}", format_attempts(.attempts))]
pub struct DiscoveryError {
    /// Every candidate that was tried, in priority order.
    pub attempts: Vec<DiscoveryAttempt>,
}

fn format_attempts(attempts: &[DiscoveryAttempt]) -> String {
    if attempts.is_empty() {
        return "no index candidates configured".to_string();
    }
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Tries each candidate in order and builds the manifest from the first usable
/// index.
pub async fn discover(
    source: &dyn ContentSource,
    normalizer: &Normalizer,
    candidates: &[String],
    slides_path: &str,
) -> Result<Vec<Slide>, DiscoveryError> {
    let mut attempts = Vec::new();

    for address in candidates {
        let content = match source.fetch(address).await {
            Ok(content) => content,
            Err(e) => {
                let missing = e.is_not_found();
                if missing {
                    debug!("Index candidate {} not found", address);
                } else {
                    warn!("Index candidate {} not available: {}", address, e);
                }
                attempts.push(DiscoveryAttempt {
                    address: address.clone(),
                    reason: e.to_string(),
                    missing,
                });
                continue;
            }
        };

        let html = match normalizer.normalize(&content.bytes, &content.content_type) {
            Ok(html) => html,
            Err(e) => {
                warn!("Found {}, but can't convert to HTML: {}", address, e);
                attempts.push(DiscoveryAttempt {
                    address: address.clone(),
                    reason: e.to_string(),
                    missing: false,
                });
                continue;
            }
        };

        let slides = manifest_from_html(&html, slides_path);
        if slides.is_empty() {
            warn!("Found {}, but it links to no slides", address);
            attempts.push(DiscoveryAttempt {
                address: address.clone(),
                reason: "no slide links".to_string(),
                missing: false,
            });
            continue;
        }

        info!("Successfully loaded {} ({} slides)", address, slides.len());
        return Ok(slides);
    }

    Err(DiscoveryError { attempts })
}

/// Builds slides from every usable hyperlink in an index document.
///
/// Links with no text get an empty title instead of failing the pass.
pub fn manifest_from_html(html: &str, slides_path: &str) -> Vec<Slide> {
    extract_links(html)
        .into_iter()
        .filter_map(|link| {
            let Some(address) = resolve_slide_address(&link.href, slides_path) else {
                debug!("Skipping index link `{}`", link.href);
                return None;
            };
            Some(Slide::new(address, link.text))
        })
        .collect()
}

/// Resolves an index hyperlink to a slide address.
///
/// Absolute HTTP(S) URLs, scheme-relative URLs and absolute paths are kept as
/// they are. Relative paths are placed under `slides_path`. Returns `None` for
/// links that cannot be slides: empty, fragment-only, or non-HTTP schemes.
pub fn resolve_slide_address(href: &str, slides_path: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if let Ok(url) = Url::parse(href) {
        return matches!(url.scheme(), "http" | "https").then(|| href.to_string());
    }

    if href.starts_with('/') {
        return Some(href.to_string());
    }

    let base = slides_path.trim_end_matches('/');
    Some(format!("{base}/{href}"))
}
