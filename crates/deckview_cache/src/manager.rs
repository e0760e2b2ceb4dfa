//! Slide cache manager.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::entry::{CacheEntry, EntryState, Slide, SlideOutcome};
use crate::loader::SlideLoader;
use crate::{CacheError, SlideError};

type SettledCallback = Box<dyn Fn(&SlideEvent) + Send + Sync>;

/// Notification sent to observers after a slide's readiness signal fired.
#[derive(Debug, Clone)]
pub enum SlideEvent {
    /// The slide body is ready.
    Ready { index: usize },
    /// The slide failed to load.
    Failed { index: usize, error: SlideError },
}

impl SlideEvent {
    /// Manifest index of the slide the event is about.
    pub fn index(&self) -> usize {
        match self {
            Self::Ready { index } | Self::Failed { index, .. } => *index,
        }
    }
}

/// Number of entries in each state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub uncached: usize,
    pub pending: usize,
    pub ready: usize,
    pub failed: usize,
}

/// Caches the content of every slide in a manifest for the whole session.
///
/// Cloning is cheap and every clone shares the same entries.
///
/// Loads run on the Tokio runtime the cache was created in, so
/// [`SlideCache::ensure_populated`] may be called from any thread, including
/// ones outside the runtime.
///
/// # Example
///
/// ```ignore
/// let cache = SlideCache::new(slides, loader);
/// cache.ensure_populated(1)?; // starts a background load, returns at once
/// let body = cache.await_ready(1).await?;
/// ```
#[derive(Clone)]
pub struct SlideCache {
    inner: Arc<CacheInner>,
}

struct CacheInner {
    entries: Vec<Arc<CacheEntry>>,
    loader: Arc<dyn SlideLoader>,
    observers: RwLock<Vec<SettledCallback>>,
    runtime: Option<Handle>,
}

impl fmt::Debug for SlideCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlideCache")
            .field("entries", &self.inner.entries)
            .field("loader", &"<dyn SlideLoader>")
            .field("observers", &self.inner.observers.read().len())
            .finish()
    }
}

impl SlideCache {
    /// Creates a cache with one `Uncached` entry per slide, in manifest order.
    ///
    /// Captures the current Tokio runtime, if any, for background loads.
    pub fn new(slides: Vec<Slide>, loader: Arc<dyn SlideLoader>) -> Self {
        Self::build(slides, loader, Handle::try_current().ok())
    }

    /// Creates a cache whose loads run on the given runtime.
    pub fn with_runtime(slides: Vec<Slide>, loader: Arc<dyn SlideLoader>, runtime: Handle) -> Self {
        Self::build(slides, loader, Some(runtime))
    }

    fn build(slides: Vec<Slide>, loader: Arc<dyn SlideLoader>, runtime: Option<Handle>) -> Self {
        let entries = slides
            .into_iter()
            .enumerate()
            .map(|(index, slide)| Arc::new(CacheEntry::new(index, slide)))
            .collect();

        Self {
            inner: Arc::new(CacheInner {
                entries,
                loader,
                observers: RwLock::new(Vec::new()),
                runtime,
            }),
        }
    }

    /// Number of slides.
    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    /// Returns true if the manifest has no slides.
    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }

    /// Gets the entry for a slide.
    pub fn entry(&self, index: usize) -> Result<&Arc<CacheEntry>, CacheError> {
        self.inner
            .entries
            .get(index)
            .ok_or_else(|| CacheError::out_of_range(index, self.len()))
    }

    /// Iterates over the slides in manifest order.
    pub fn slides(&self) -> impl Iterator<Item = &Slide> {
        self.inner.entries.iter().map(|entry| entry.slide())
    }

    /// Current state of a slide's entry.
    pub fn state(&self, index: usize) -> Result<EntryState, CacheError> {
        Ok(self.entry(index)?.state())
    }

    /// Runtime that background loads are spawned on.
    ///
    /// Falls back to the caller's runtime when the cache was created outside
    /// one.
    pub fn runtime(&self) -> Result<Handle, CacheError> {
        match &self.inner.runtime {
            Some(handle) => Ok(handle.clone()),
            None => Handle::try_current().map_err(|_| CacheError::NoRuntime),
        }
    }

    /// Registers an observer called after each slide settles.
    ///
    /// Observers run on the background load task, after the readiness signal
    /// fired. They must not block and must not register further observers.
    pub fn on_settled<F>(&self, callback: F)
    where
        F: Fn(&SlideEvent) + Send + Sync + 'static,
    {
        self.inner.observers.write().push(Box::new(callback));
    }

    /// Starts loading a slide unless a load was already started.
    ///
    /// Never blocks and never starts a second load for the same slide, no
    /// matter how many callers race here. Returns true if this call started
    /// the load. Fails with [`CacheError::NoRuntime`], leaving the entry
    /// untouched, if no runtime is available.
    pub fn ensure_populated(&self, index: usize) -> Result<bool, CacheError> {
        let entry = self.entry(index)?;
        let runtime = self.runtime()?;
        if !entry.try_begin() {
            debug!("Slide #{} is already cached or in flight", index);
            return Ok(false);
        }

        debug!("Caching slide #{} from {}", index, entry.slide().address);
        let completion = Completion {
            inner: Arc::clone(&self.inner),
            entry: Arc::clone(entry),
            armed: true,
        };
        runtime.spawn(async move {
            let outcome = completion
                .inner
                .loader
                .load(completion.entry.slide())
                .await
                .map(Arc::from);
            completion.finish(outcome);
        });

        Ok(true)
    }

    /// Waits for a slide's readiness signal and returns its body.
    ///
    /// Does not start a load; see [`SlideCache::load`] for that.
    pub async fn await_ready(&self, index: usize) -> Result<Arc<str>, CacheError> {
        let entry = Arc::clone(self.entry(index)?);
        Ok(entry.wait().await?)
    }

    /// Ensures a slide is populated, then waits for it.
    pub async fn load(&self, index: usize) -> Result<Arc<str>, CacheError> {
        self.ensure_populated(index)?;
        self.await_ready(index).await
    }

    /// Body of a slide if it is already `Ready`.
    pub fn body(&self, index: usize) -> Option<Arc<str>> {
        self.inner.entries.get(index).and_then(|entry| entry.body())
    }

    /// Counts entries per state.
    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats::default();
        for entry in &self.inner.entries {
            match entry.state() {
                EntryState::Uncached => stats.uncached += 1,
                EntryState::Pending => stats.pending += 1,
                EntryState::Ready => stats.ready += 1,
                EntryState::Failed => stats.failed += 1,
            }
        }
        stats
    }
}

impl CacheInner {
    fn settle(&self, entry: &CacheEntry, outcome: SlideOutcome) {
        let index = entry.index();
        let event = match &outcome {
            Ok(body) => {
                debug!("Done caching slide #{} ({} bytes)", index, body.len());
                SlideEvent::Ready { index }
            }
            Err(error) => {
                warn!("Failed to cache slide #{}: {}", index, error);
                SlideEvent::Failed {
                    index,
                    error: error.clone(),
                }
            }
        };

        if !entry.complete(outcome) {
            return;
        }

        for observer in self.observers.read().iter() {
            observer(&event);
        }
    }
}

/// Settles the entry when the load finishes, or with `Aborted` if the load
/// task is dropped or panics first. Waiters are released either way.
struct Completion {
    inner: Arc<CacheInner>,
    entry: Arc<CacheEntry>,
    armed: bool,
}

impl Completion {
    fn finish(mut self, outcome: SlideOutcome) {
        self.armed = false;
        self.inner.settle(&self.entry, outcome);
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if self.armed {
            self.inner.settle(&self.entry, Err(SlideError::Aborted));
        }
    }
}
