//! Prefetch policies.
//!
//! Two policies decide which slides get populated ahead of display:
//! the focus neighbourhood (the displayed slide and its immediate neighbours
//! in both directions) and the visible viewport of a thumbnail panel. Both
//! only ever add work; neither cancels loads started by the other.

use std::ops::RangeInclusive;

/// Slides populated when `index` is displayed: `index - 1 ..= index + 1`,
/// clamped to the manifest.
///
/// `index` must be less than `len`.
pub fn neighborhood(index: usize, len: usize) -> RangeInclusive<usize> {
    debug_assert!(index < len, "index {index} out of range for {len} slides");
    index.saturating_sub(1)..=index.saturating_add(1).min(len.saturating_sub(1))
}

/// Thumbnails currently visible in a preview panel, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportRange {
    pub first: usize,
    pub last: usize,
}

impl ViewportRange {
    /// Creates a range; the bounds may be given in either order.
    pub fn new(first: usize, last: usize) -> Self {
        Self {
            first: first.min(last),
            last: first.max(last),
        }
    }

    /// A range covering a single thumbnail.
    pub fn single(index: usize) -> Self {
        Self::new(index, index)
    }
}

/// Slides to populate for a visible range, widened by `margin` on each side
/// and clamped to the manifest. `None` when nothing in range exists.
pub fn viewport_window(
    range: ViewportRange,
    margin: usize,
    len: usize,
) -> Option<RangeInclusive<usize>> {
    if len == 0 || range.first >= len {
        return None;
    }
    let first = range.first.saturating_sub(margin);
    let last = range.last.saturating_add(margin).min(len - 1);
    Some(first..=last)
}
