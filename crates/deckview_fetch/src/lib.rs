//! # deckview_fetch
//!
//! Retrieval of raw slide bytes.
//!
//! A [`ContentSource`] turns a slide address into the response body plus the
//! content type the transport declared for it. [`HttpFetcher`] is the
//! production implementation; tests plug in their own sources.
//!
//! No retries happen here. A failed fetch is reported once and the caller
//! decides what it means for the slide.

mod error;
mod fetcher;
mod http_client;

pub use error::FetchError;
pub use fetcher::{ContentSource, FetchedContent, content_type_hint};
pub use http_client::{DEFAULT_MAX_BODY_BYTES, DEFAULT_TIMEOUT, HttpFetcher, HttpFetcherBuilder};
