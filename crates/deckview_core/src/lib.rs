//! # deckview_core
//!
//! Slide show sessions for deckview.
//!
//! This crate provides:
//! - Manifest discovery from an index document, with fallback candidates
//! - The `Deck` session: display, next/previous and focus tracking
//! - Neighbourhood and viewport prefetch scheduling
//! - Configuration loading
//!
//! ## Example
//!
//! ```rust,ignore
//! use deckview_core::{Deck, DeckConfig};
//!
//! let deck = Deck::builder(DeckConfig::from_file(".deckview.json")?).build()?;
//! deck.load().await?;
//!
//! let body = deck.display(0)?.wait().await?;
//! println!("{body}");
//! ```

mod config;
mod deck;
pub mod discovery;
mod error;
mod navigator;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::DeckConfig;
pub use deck::{Deck, DeckBuilder, DeckPhase, DisplayHandle};
pub use discovery::{DiscoveryAttempt, DiscoveryError, discover};
pub use error::DeckError;
pub use navigator::{Navigator, NoopNavigator, error_placeholder};
pub use scheduler::ViewportRange;

// Re-export cache types that appear in the public API
pub use deckview_cache::{CacheStats, EntryState, Slide, SlideCache, SlideError, SlideEvent};
