//! # deckview_cache
//!
//! Session cache for slide content.
//!
//! Every slide in the manifest gets one [`CacheEntry`]. An entry is fetched,
//! converted and sanitized at most once; concurrent requests for the same
//! slide share the single in-flight load and wait on its readiness signal.
//!
//! ## Entry lifecycle
//!
//! ```text
//! Uncached --ensure_populated--> Pending --load ok--> Ready
//!                                        \--load err-> Failed
//! ```
//!
//! Both terminal states are permanent for the life of the cache: there is no
//! eviction and no re-fetch.

mod entry;
mod error;
mod loader;
mod manager;

pub use entry::{CacheEntry, EntryState, Slide, SlideOutcome};
pub use error::{CacheError, SlideError};
pub use loader::{FetchNormalizeLoader, SlideLoader};
pub use manager::{CacheStats, SlideCache, SlideEvent};
