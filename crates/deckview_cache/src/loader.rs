//! Fetch + normalize pipeline run for each slide.

use std::sync::Arc;

use async_trait::async_trait;
use deckview_fetch::ContentSource;
use deckview_render::Normalizer;

use crate::{Slide, SlideError};

/// Produces the sanitized HTML body of a slide.
///
/// The cache calls `load` at most once per slide, from a background task.
#[async_trait]
pub trait SlideLoader: Send + Sync {
    /// Loads and normalizes the slide.
    async fn load(&self, slide: &Slide) -> Result<String, SlideError>;
}

/// The production loader: fetch the address, then normalize the bytes.
///
/// Raw bytes are dropped as soon as normalization finishes.
pub struct FetchNormalizeLoader {
    source: Arc<dyn ContentSource>,
    normalizer: Arc<Normalizer>,
}

impl FetchNormalizeLoader {
    /// Creates a loader over the given source and normalizer.
    pub fn new(source: Arc<dyn ContentSource>, normalizer: Arc<Normalizer>) -> Self {
        Self { source, normalizer }
    }
}

#[async_trait]
impl SlideLoader for FetchNormalizeLoader {
    async fn load(&self, slide: &Slide) -> Result<String, SlideError> {
        let content = self.source.fetch(&slide.address).await?;
        let html = self
            .normalizer
            .normalize(&content.bytes, &content.content_type)?;
        Ok(html)
    }
}
