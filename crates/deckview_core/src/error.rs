//! Deck error types.

use deckview_cache::{CacheError, SlideError};
use thiserror::Error;

use crate::discovery::DiscoveryError;

/// Errors that can occur while loading or navigating a deck.
#[derive(Debug, Error)]
pub enum DeckError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// No slide index could be loaded.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// The deck has not been loaded yet.
    #[error("Slide show is not loaded")]
    NotLoaded,

    /// `load` was called on a deck that is loading or loaded.
    #[error("Slide show is already loaded")]
    AlreadyLoaded,

    /// The slide index is not part of the manifest.
    #[error("Slide index {index} out of range (deck has {len} slides)")]
    OutOfRange { index: usize, len: usize },

    /// A single slide failed to load.
    #[error("Slide #{index} failed: {source}")]
    Slide {
        index: usize,
        #[source]
        source: SlideError,
    },

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DeckError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub(crate) fn from_cache(index: usize, err: CacheError) -> Self {
        match err {
            CacheError::OutOfRange { index, len } => Self::OutOfRange { index, len },
            CacheError::Slide(source) => Self::Slide { index, source },
            err @ CacheError::NoRuntime => Self::Internal(err.to_string()),
        }
    }
}
