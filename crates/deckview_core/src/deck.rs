//! Deck session: discovery, display and prefetch scheduling.

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use deckview_cache::{FetchNormalizeLoader, Slide, SlideCache, SlideEvent};
use deckview_fetch::{ContentSource, HttpFetcher};
use deckview_render::Normalizer;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::discovery::discover;
use crate::navigator::{Navigator, NoopNavigator};
use crate::scheduler::{ViewportRange, neighborhood, viewport_window};
use crate::{DeckConfig, DeckError};

/// Lifecycle of a deck session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckPhase {
    /// Created, manifest not loaded.
    Idle,
    /// Discovery in progress.
    Loading,
    /// Manifest loaded, nothing displayed yet.
    Ready,
    /// At least one slide has been requested for display.
    Navigating,
}

/// Pending result of a [`Deck::display`] call.
#[derive(Debug)]
pub struct DisplayHandle {
    index: usize,
    task: JoinHandle<Result<Arc<str>, DeckError>>,
}

impl DisplayHandle {
    /// Slide this request is for.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Waits until the slide is ready (or failed) and returns its body.
    pub async fn wait(self) -> Result<Arc<str>, DeckError> {
        let index = self.index;
        self.task.await.map_err(|e| {
            DeckError::Internal(format!("Display task for slide #{} failed: {}", index, e))
        })?
    }
}

/// A slide show session.
///
/// Cloning is cheap; every clone drives the same session.
#[derive(Clone)]
pub struct Deck {
    inner: Arc<DeckInner>,
}

struct DeckInner {
    config: DeckConfig,
    source: Arc<dyn ContentSource>,
    normalizer: Arc<Normalizer>,
    navigator: Arc<dyn Navigator>,
    phase: Mutex<DeckPhase>,
    cache: OnceLock<SlideCache>,
    focus: AtomicUsize,
    latest_request: AtomicU64,
}

impl fmt::Debug for Deck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deck")
            .field("phase", &self.phase())
            .field("focus", &self.focus())
            .field("cache", &self.inner.cache.get())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Deck`].
pub struct DeckBuilder {
    config: DeckConfig,
    source: Option<Arc<dyn ContentSource>>,
    navigator: Option<Arc<dyn Navigator>>,
    normalizer: Option<Normalizer>,
}

impl DeckBuilder {
    /// Uses a custom content source instead of HTTP.
    pub fn source(mut self, source: Arc<dyn ContentSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Registers the navigator that renders displayed slides.
    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Uses a custom normalizer.
    pub fn normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    /// Builds the deck. Without a custom source, an HTTP fetcher is created
    /// from the configuration.
    pub fn build(self) -> Result<Deck, DeckError> {
        let source: Arc<dyn ContentSource> = match self.source {
            Some(source) => source,
            None => {
                let fetcher = HttpFetcher::builder(self.config.base_url.as_str())
                    .timeout(self.config.timeout())
                    .max_body_bytes(self.config.max_body_bytes)
                    .build()
                    .map_err(|e| DeckError::config(e.to_string()))?;
                Arc::new(fetcher)
            }
        };

        Ok(Deck {
            inner: Arc::new(DeckInner {
                config: self.config,
                source,
                normalizer: Arc::new(self.normalizer.unwrap_or_default()),
                navigator: self.navigator.unwrap_or_else(|| Arc::new(NoopNavigator)),
                phase: Mutex::new(DeckPhase::Idle),
                cache: OnceLock::new(),
                focus: AtomicUsize::new(0),
                latest_request: AtomicU64::new(0),
            }),
        })
    }
}

impl Deck {
    /// Starts building a deck.
    pub fn builder(config: DeckConfig) -> DeckBuilder {
        DeckBuilder {
            config,
            source: None,
            navigator: None,
            normalizer: None,
        }
    }

    /// Configuration this deck was built with.
    pub fn config(&self) -> &DeckConfig {
        &self.inner.config
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> DeckPhase {
        *self.inner.phase.lock()
    }

    /// Index of the slide currently displayed.
    pub fn focus(&self) -> usize {
        self.inner.focus.load(Ordering::Acquire)
    }

    /// Discovers the slide manifest and sets up the cache.
    ///
    /// On failure the deck returns to [`DeckPhase::Idle`] and `load` may be
    /// retried.
    pub async fn load(&self) -> Result<usize, DeckError> {
        {
            let mut phase = self.inner.phase.lock();
            if *phase != DeckPhase::Idle {
                return Err(DeckError::AlreadyLoaded);
            }
            *phase = DeckPhase::Loading;
        }

        let config = &self.inner.config;
        let result = discover(
            self.inner.source.as_ref(),
            &self.inner.normalizer,
            &config.index_candidates,
            &config.slides_path,
        )
        .await;

        let slides = match result {
            Ok(slides) => slides,
            Err(e) => {
                warn!("{}", e);
                *self.inner.phase.lock() = DeckPhase::Idle;
                return Err(e.into());
            }
        };

        let len = slides.len();
        let loader = FetchNormalizeLoader::new(
            Arc::clone(&self.inner.source),
            Arc::clone(&self.inner.normalizer),
        );
        let cache = SlideCache::new(slides, Arc::new(loader));
        if self.inner.cache.set(cache).is_err() {
            return Err(DeckError::Internal("slide cache initialized twice".to_string()));
        }

        *self.inner.phase.lock() = DeckPhase::Ready;
        info!("Slide show ready with {} slides", len);
        Ok(len)
    }

    /// The slide cache, once loaded.
    pub fn cache(&self) -> Result<&SlideCache, DeckError> {
        self.inner.cache.get().ok_or(DeckError::NotLoaded)
    }

    /// The ordered slide manifest.
    pub fn slides(&self) -> Result<Vec<Slide>, DeckError> {
        Ok(self.cache()?.slides().cloned().collect())
    }

    /// Number of slides, or 0 before loading.
    pub fn len(&self) -> usize {
        self.inner.cache.get().map_or(0, SlideCache::len)
    }

    /// Whether the deck has no slides (or is not loaded).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registers an observer called whenever a slide finishes loading.
    pub fn on_slide_settled<F>(&self, callback: F) -> Result<(), DeckError>
    where
        F: Fn(&SlideEvent) + Send + Sync + 'static,
    {
        self.cache()?.on_settled(callback);
        Ok(())
    }

    /// Requests display of a slide.
    ///
    /// Populates the slide and its immediate neighbours without blocking,
    /// then returns a handle resolving once the slide is ready. When it
    /// resolves, the focus moves to `index` and the navigator renders it,
    /// unless a newer `display` request was made in the meantime. A failed
    /// slide is rendered as an error and leaves the focus where it was.
    ///
    /// May be called from any thread; the work runs on the runtime the deck
    /// was loaded in.
    pub fn display(&self, index: usize) -> Result<DisplayHandle, DeckError> {
        let cache = self.cache()?.clone();
        let len = cache.len();
        if index >= len {
            return Err(DeckError::OutOfRange { index, len });
        }
        let runtime = cache.runtime().map_err(|e| DeckError::from_cache(index, e))?;

        for neighbor in neighborhood(index, len) {
            cache
                .ensure_populated(neighbor)
                .map_err(|e| DeckError::from_cache(neighbor, e))?;
        }

        {
            let mut phase = self.inner.phase.lock();
            if *phase == DeckPhase::Ready {
                *phase = DeckPhase::Navigating;
            }
        }

        let request = self.inner.latest_request.fetch_add(1, Ordering::AcqRel) + 1;
        debug!("Display request {} for slide #{}", request, index);

        let inner = Arc::clone(&self.inner);
        let task = runtime.spawn(async move {
            let outcome = cache.await_ready(index).await;
            let current = inner.latest_request.load(Ordering::Acquire) == request;
            let slide = cache.entry(index).map(|entry| entry.slide().clone());

            match outcome {
                Ok(body) => {
                    if current {
                        inner.focus.store(index, Ordering::Release);
                        if let Ok(slide) = &slide {
                            inner.navigator.render_slide(index, slide, &body);
                        }
                    } else {
                        debug!("Display of slide #{} superseded", index);
                    }
                    Ok(body)
                }
                Err(e) => {
                    let err = DeckError::from_cache(index, e);
                    if let (true, DeckError::Slide { source, .. }, Ok(slide)) =
                        (current, &err, &slide)
                    {
                        inner.navigator.render_error(index, slide, source);
                    }
                    Err(err)
                }
            }
        });

        Ok(DisplayHandle { index, task })
    }

    /// Whether a slide follows the focus.
    pub fn has_next(&self) -> bool {
        self.focus() + 1 < self.len()
    }

    /// Whether a slide precedes the focus.
    pub fn has_previous(&self) -> bool {
        !self.is_empty() && self.focus() > 0
    }

    /// Displays the slide after the focus; `None` on the last slide.
    pub fn next(&self) -> Result<Option<DisplayHandle>, DeckError> {
        let len = self.cache()?.len();
        let target = self.focus() + 1;
        if target >= len {
            return Ok(None);
        }
        self.display(target).map(Some)
    }

    /// Displays the slide before the focus; `None` on the first slide.
    pub fn previous(&self) -> Result<Option<DisplayHandle>, DeckError> {
        self.cache()?;
        match self.focus().checked_sub(1) {
            Some(target) => self.display(target).map(Some),
            None => Ok(None),
        }
    }

    /// Populates every slide visible in a thumbnail panel, plus the
    /// configured margin on each side. Returns the indices requested.
    ///
    /// Never cancels or delays loads started by [`Deck::display`].
    pub fn prefetch_viewport(&self, range: ViewportRange) -> Result<Vec<usize>, DeckError> {
        let cache = self.cache()?;
        let Some(window) = viewport_window(range, self.inner.config.viewport_margin, cache.len())
        else {
            return Ok(Vec::new());
        };

        let mut requested = Vec::new();
        for index in window {
            cache
                .ensure_populated(index)
                .map_err(|e| DeckError::from_cache(index, e))?;
            requested.push(index);
        }
        debug!("Viewport prefetch requested {:?}", requested);
        Ok(requested)
    }
}
