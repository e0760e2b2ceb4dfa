//! Output formatting module

mod json;
mod text;

use deckview_core::Slide;
use miette::Result;

use crate::cli::OutputFormat;

pub use json::manifest_json;

pub fn output_slides(slides: &[Slide], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => json::output_json(slides)?,
        OutputFormat::Text => text::output_text(slides),
    }

    Ok(())
}
