//! Render boundary between the deck and whatever displays it.

use deckview_cache::{Slide, SlideError};
use deckview_render::escape_text;

/// Receives slides once a `display` request has resolved.
///
/// Implementations own the display surface; the deck never renders anything
/// itself. Calls arrive on background tasks and must not block.
pub trait Navigator: Send + Sync {
    /// Shows a ready slide. The focus index already points at `index`.
    fn render_slide(&self, index: usize, slide: &Slide, body: &str);

    /// Shows a failed slide. The focus index is left unchanged.
    fn render_error(&self, index: usize, slide: &Slide, error: &SlideError);
}

/// Navigator that discards everything, used when none is registered.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn render_slide(&self, _index: usize, _slide: &Slide, _body: &str) {}

    fn render_error(&self, _index: usize, _slide: &Slide, _error: &SlideError) {}
}

/// Inline HTML shown in place of a slide that failed to load.
pub fn error_placeholder(slide: &Slide, error: &SlideError) -> String {
    let name = if slide.title.is_empty() {
        &slide.address
    } else {
        &slide.title
    };
    format!(
        "<div class=\"slide-error\"><p>Unable to display {}</p><pre>{}</pre></div>",
        escape_text(name),
        escape_text(&error.to_string())
    )
}
