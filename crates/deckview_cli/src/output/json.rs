//! JSON output formatter

use deckview_core::Slide;
use miette::{IntoDiagnostic, Result};

/// Manifest as a JSON array of `{index, title, address}` objects.
pub fn manifest_json(slides: &[Slide]) -> serde_json::Value {
    slides
        .iter()
        .enumerate()
        .map(|(index, slide)| {
            serde_json::json!({
                "index": index,
                "title": slide.title,
                "address": slide.address,
            })
        })
        .collect()
}

pub fn output_json(slides: &[Slide]) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&manifest_json(slides)).into_diagnostic()?
    );
    Ok(())
}
