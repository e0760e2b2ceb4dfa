//! Cache error types.

use std::sync::Arc;

use deckview_fetch::FetchError;
use deckview_render::ConversionError;
use thiserror::Error;

/// Why a single slide could not be made ready.
///
/// Cloneable so the same failure reaches every waiter on the slide.
#[derive(Debug, Clone, Error)]
pub enum SlideError {
    /// Fetching the slide failed.
    #[error(transparent)]
    Fetch(Arc<FetchError>),

    /// Converting or sanitizing the slide failed.
    #[error(transparent)]
    Conversion(Arc<ConversionError>),

    /// The load task ended without producing a result.
    #[error("Slide load was aborted")]
    Aborted,
}

impl From<FetchError> for SlideError {
    fn from(err: FetchError) -> Self {
        Self::Fetch(Arc::new(err))
    }
}

impl From<ConversionError> for SlideError {
    fn from(err: ConversionError) -> Self {
        Self::Conversion(Arc::new(err))
    }
}

/// Errors returned by cache operations.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    /// The index is not part of the manifest.
    #[error("Slide index {index} out of range (manifest has {len} slides)")]
    OutOfRange { index: usize, len: usize },

    /// No Tokio runtime is available to run background loads.
    #[error("No Tokio runtime available to load slides")]
    NoRuntime,

    /// The slide itself failed to load.
    #[error("Slide failed: {0}")]
    Slide(#[from] SlideError),
}

impl CacheError {
    /// Creates an out of range error.
    pub fn out_of_range(index: usize, len: usize) -> Self {
        Self::OutOfRange { index, len }
    }
}
