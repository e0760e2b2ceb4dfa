//! Cache entry types.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::SlideError;

/// Final result of loading a slide: sanitized HTML or the failure.
pub type SlideOutcome = Result<Arc<str>, SlideError>;

/// Identity of a slide in the manifest. Immutable once the manifest is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    /// Resolved address the content is fetched from.
    pub address: String,
    /// Display title, empty when the manifest link had no text.
    pub title: String,
}

impl Slide {
    /// Creates a new slide.
    pub fn new(address: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            title: title.into(),
        }
    }
}

/// Lifecycle state of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// No load has been started.
    Uncached,
    /// A load is in flight; the readiness signal has not fired.
    Pending,
    /// Body is populated and final.
    Ready,
    /// Load failed; the failure is final.
    Failed,
}

impl EntryState {
    /// Returns true for `Ready` and `Failed`.
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }
}

/// Cached content and readiness signal for a single slide.
///
/// The readiness signal is a watch channel that holds `None` until the one
/// and only load completes. Every waiter subscribes to it, so all of them are
/// released by the same send.
#[derive(Debug)]
pub struct CacheEntry {
    index: usize,
    slide: Slide,
    state: Mutex<EntryState>,
    signal: watch::Sender<Option<SlideOutcome>>,
}

impl CacheEntry {
    pub(crate) fn new(index: usize, slide: Slide) -> Self {
        let (signal, _) = watch::channel(None);
        Self {
            index,
            slide,
            state: Mutex::new(EntryState::Uncached),
            signal,
        }
    }

    /// Position of the slide in the manifest.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The slide this entry caches.
    pub fn slide(&self) -> &Slide {
        &self.slide
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EntryState {
        *self.state.lock()
    }

    /// Sanitized HTML, present only once the entry is `Ready`.
    pub fn body(&self) -> Option<Arc<str>> {
        match &*self.signal.borrow() {
            Some(Ok(body)) => Some(Arc::clone(body)),
            _ => None,
        }
    }

    /// The failure, present only once the entry is `Failed`.
    pub fn error(&self) -> Option<SlideError> {
        match &*self.signal.borrow() {
            Some(Err(err)) => Some(err.clone()),
            _ => None,
        }
    }

    /// Moves `Uncached` to `Pending`.
    ///
    /// Returns true for exactly one caller per entry: the one that must run
    /// the load.
    pub(crate) fn try_begin(&self) -> bool {
        let mut state = self.state.lock();
        if *state != EntryState::Uncached {
            return false;
        }
        *state = EntryState::Pending;
        true
    }

    /// Stores the outcome and fires the readiness signal.
    ///
    /// Only the first completion of a `Pending` entry has any effect.
    pub(crate) fn complete(&self, outcome: SlideOutcome) -> bool {
        let mut state = self.state.lock();
        if *state != EntryState::Pending {
            return false;
        }
        *state = if outcome.is_ok() {
            EntryState::Ready
        } else {
            EntryState::Failed
        };
        self.signal.send_replace(Some(outcome));
        true
    }

    /// Waits until the readiness signal fires and returns the outcome.
    ///
    /// Does not start a load. Waiting on an `Uncached` entry suspends until
    /// some other caller populates it.
    pub async fn wait(&self) -> SlideOutcome {
        let mut rx = self.signal.subscribe();
        match rx.wait_for(|outcome| outcome.is_some()).await {
            Ok(outcome) => outcome.clone().unwrap_or(Err(SlideError::Aborted)),
            Err(_) => Err(SlideError::Aborted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckview_render::ConversionError;

    fn entry() -> CacheEntry {
        CacheEntry::new(0, Slide::new("/slides/a.md", "Intro"))
    }

    #[test]
    fn test_new_entry_is_uncached_without_body() {
        let entry = entry();
        assert_eq!(entry.state(), EntryState::Uncached);
        assert!(entry.body().is_none());
        assert!(entry.error().is_none());
    }

    #[test]
    fn test_only_first_begin_wins() {
        let entry = entry();
        assert!(entry.try_begin());
        assert!(!entry.try_begin());
        assert_eq!(entry.state(), EntryState::Pending);
    }

    #[test]
    fn test_complete_requires_pending() {
        let entry = entry();
        assert!(!entry.complete(Ok(Arc::from("<p>x</p>"))));
        assert_eq!(entry.state(), EntryState::Uncached);
    }

    #[test]
    fn test_body_is_written_once() {
        let entry = entry();
        entry.try_begin();
        assert!(entry.complete(Ok(Arc::from("<p>first</p>"))));
        assert!(!entry.complete(Ok(Arc::from("<p>second</p>"))));

        assert_eq!(entry.state(), EntryState::Ready);
        assert_eq!(entry.body().as_deref(), Some("<p>first</p>"));
    }

    #[test]
    fn test_failure_is_recorded() {
        let entry = entry();
        entry.try_begin();
        entry.complete(Err(ConversionError::markdown("bad").into()));

        assert_eq!(entry.state(), EntryState::Failed);
        assert!(entry.state().is_settled());
        assert!(entry.body().is_none());
        assert!(matches!(entry.error(), Some(SlideError::Conversion(_))));
    }

    #[tokio::test]
    async fn test_wait_returns_immediately_when_settled() {
        let entry = entry();
        entry.try_begin();
        entry.complete(Ok(Arc::from("<p>done</p>")));

        let body = entry.wait().await.unwrap();
        assert_eq!(&*body, "<p>done</p>");
    }
}
