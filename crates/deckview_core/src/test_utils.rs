//! In-memory content source for tests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use deckview_fetch::{ContentSource, FetchError, FetchedContent};
use parking_lot::Mutex;
use tokio::sync::Semaphore;

/// Serves canned documents and records every address requested.
///
/// Unknown addresses fail with [`FetchError::NotFound`]. Fetches of held
/// addresses wait until [`StaticSource::release`] is called.
pub struct StaticSource {
    documents: HashMap<String, FetchedContent>,
    fetched: Mutex<Vec<String>>,
    held: HashSet<String>,
    gate: Arc<Semaphore>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self {
            documents: HashMap::new(),
            fetched: Mutex::new(Vec::new()),
            held: HashSet::new(),
            gate: Arc::new(Semaphore::new(0)),
        }
    }

    /// Adds a document.
    pub fn with(
        mut self,
        address: &str,
        content_type: &str,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        self.documents
            .insert(address.to_string(), FetchedContent::new(body, content_type));
        self
    }

    /// Holds fetches of `address` until released.
    pub fn hold(mut self, address: &str) -> Self {
        self.held.insert(address.to_string());
        self
    }

    /// Lets every held and future fetch through.
    pub fn release(&self) {
        self.gate.add_permits(Semaphore::MAX_PERMITS / 2);
    }

    /// Addresses fetched so far, in request order.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().clone()
    }

    /// Forgets recorded fetches.
    pub fn clear_fetched(&self) {
        self.fetched.lock().clear();
    }
}

#[async_trait]
impl ContentSource for StaticSource {
    async fn fetch(&self, address: &str) -> Result<FetchedContent, FetchError> {
        self.fetched.lock().push(address.to_string());

        if self.held.contains(address) {
            let _permit = self
                .gate
                .acquire()
                .await
                .map_err(|_| FetchError::NotFound(address.to_string()))?;
        }

        self.documents
            .get(address)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(address.to_string()))
    }
}
