//! Lazy highlight functions and the target they write into

use std::ops::Range;
use std::sync::Arc;

/// Highlight namespace, so callers can tell their highlights apart from others
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Namespace(pub u32);

impl Namespace {
    /// Highlights produced by `Segment::Highlighted`
    pub const STATIC: Self = Self(0);
}

/// Receiver of highlights, addressed by zero-based row and byte columns
pub trait HighlightTarget {
    fn line(&self, row: usize) -> Option<&str>;

    fn line_count(&self) -> usize;

    fn add_highlight(&mut self, ns: Namespace, row: usize, cols: Range<usize>, group: &str);
}

/// Called with the target, a namespace, and the row ranges (end exclusive) to highlight
pub type HighlightFn = Arc<dyn Fn(&mut dyn HighlightTarget, Namespace, &[Range<usize>]) + Send + Sync>;

/// Wrap a closure as a shareable [`HighlightFn`]
///
/// Lines coalesce only when they hold clones of the same `HighlightFn`;
/// wrapping the same closure twice yields two distinct functions.
pub fn highlight_fn<F>(f: F) -> HighlightFn
where
    F: Fn(&mut dyn HighlightTarget, Namespace, &[Range<usize>]) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Identity of a highlight function, independent of vtable duplication
pub(crate) fn fn_id(f: &HighlightFn) -> *const () {
    Arc::as_ptr(f).cast::<()>()
}
