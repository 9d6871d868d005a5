//! Line/segment model for rendered dialog content
//!
//! A render function produces a sequence of [`Line`]s. Each line is one of:
//!
//! - **`Raw`**: plain text
//! - **`Lazy`**: text whose highlighting is computed on demand, only for the
//!   rows that become visible (see [`LineBuffer::apply_lazy`])
//! - **`Segments`**: a list of [`Segment`]s (text, highlighted text, key
//!   actions, and flattened groups)
//!
//! [`render`] runs a user function and always returns a `Result`: errors and
//! panics inside the function become a [`RenderError`].
//!
//! # Examples
//!
//! ```
//! use nodeselect::lines::{render, group, Line, Segment};
//!
//! let lines = render(|| {
//!     Ok::<_, String>(vec![
//!         Line::from("plain"),
//!         Line::from(vec![
//!             Segment::highlighted("Title", "Title"),
//!             group(vec![vec![Segment::text(" ")], vec![Segment::text("rest")]]),
//!         ]),
//!     ])
//! })
//! .unwrap();
//! assert_eq!(lines.len(), 2);
//! ```

mod buffer;
mod highlight;
#[cfg(feature = "syntax-highlighting")]
pub mod syntax;

pub use buffer::{BoundAction, LineBuffer, StaticHighlight};
pub use highlight::{HighlightFn, HighlightTarget, Namespace, highlight_fn};

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Handler bound to a key by an action segment; receives the row it was triggered on
pub type ActionFn = Arc<dyn Fn(usize) + Send + Sync>;

/// A display line
#[derive(Clone)]
pub enum Line {
    Raw(String),
    Lazy(LazyLine),
    Segments(Vec<Segment>),
}

/// Text highlighted on demand by `highlight`
#[derive(Clone)]
pub struct LazyLine {
    pub text: String,
    pub highlight: HighlightFn,
    /// Invoke `highlight` once for the whole buffer instead of per visible range
    pub global: bool,
}

impl LazyLine {
    #[must_use]
    pub fn new(text: impl Into<String>, highlight: HighlightFn) -> Self {
        Self {
            text: text.into(),
            highlight,
            global: false,
        }
    }

    #[must_use]
    pub const fn global(mut self, global: bool) -> Self {
        self.global = global;
        self
    }
}

/// Piece of a composed line
#[derive(Clone)]
pub enum Segment {
    Text(String),
    Highlighted {
        content: String,
        group: String,
    },
    /// Binds `key` to `handler`, on this line only unless `global`
    Action {
        key: String,
        handler: ActionFn,
        global: bool,
    },
    /// Always flat: nested groups are inlined on construction
    Group(Vec<Segment>),
}

impl Segment {
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    #[must_use]
    pub fn highlighted(content: impl Into<String>, group: impl Into<String>) -> Self {
        Self::Highlighted {
            content: content.into(),
            group: group.into(),
        }
    }

    #[must_use]
    pub fn action(key: impl Into<String>, handler: ActionFn, global: bool) -> Self {
        Self::Action {
            key: key.into(),
            handler,
            global,
        }
    }

    /// Text this segment contributes to its line
    #[must_use]
    pub fn content(&self) -> String {
        match self {
            Self::Text(content) | Self::Highlighted { content, .. } => content.clone(),
            Self::Action { .. } => String::new(),
            Self::Group(segments) => segments.iter().map(Self::content).collect(),
        }
    }
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(content) => f.debug_tuple("Text").field(content).finish(),
            Self::Highlighted { content, group } => f
                .debug_struct("Highlighted")
                .field("content", content)
                .field("group", group)
                .finish(),
            Self::Action { key, global, .. } => f
                .debug_struct("Action")
                .field("key", key)
                .field("global", global)
                .finish_non_exhaustive(),
            Self::Group(segments) => f.debug_tuple("Group").field(segments).finish(),
        }
    }
}

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw(text) => f.debug_tuple("Raw").field(text).finish(),
            Self::Lazy(lazy) => f
                .debug_struct("Lazy")
                .field("text", &lazy.text)
                .field("global", &lazy.global)
                .finish_non_exhaustive(),
            Self::Segments(segments) => f.debug_tuple("Segments").field(segments).finish(),
        }
    }
}

impl From<&str> for Line {
    fn from(text: &str) -> Self {
        Self::Raw(text.to_string())
    }
}

impl From<String> for Line {
    fn from(text: String) -> Self {
        Self::Raw(text)
    }
}

impl From<LazyLine> for Line {
    fn from(lazy: LazyLine) -> Self {
        Self::Lazy(lazy)
    }
}

impl From<Vec<Segment>> for Line {
    fn from(segments: Vec<Segment>) -> Self {
        Self::Segments(segments)
    }
}

/// Anything that can be spliced into a [`group`]
pub trait IntoSegments {
    fn into_segments(self) -> Vec<Segment>;
}

impl IntoSegments for Segment {
    fn into_segments(self) -> Vec<Segment> {
        vec![self]
    }
}

impl IntoSegments for Vec<Segment> {
    fn into_segments(self) -> Vec<Segment> {
        self
    }
}

fn flatten_into(out: &mut Vec<Segment>, segment: Segment) {
    match segment {
        Segment::Group(inner) => {
            for segment in inner {
                flatten_into(out, segment);
            }
        }
        other => out.push(other),
    }
}

/// Compose segments and segment lists into one flat `Segment::Group`
pub fn group<I, P>(parts: I) -> Segment
where
    I: IntoIterator<Item = P>,
    P: IntoSegments,
{
    let mut flat = Vec::new();
    for part in parts {
        for segment in part.into_segments() {
            flatten_into(&mut flat, segment);
        }
    }
    Segment::Group(flat)
}

/// Mixed-type form of [`group`]: `group![seg, vec_of_segs, seg]`
#[macro_export]
macro_rules! group {
    ($($part:expr),* $(,)?) => {{
        let mut parts: Vec<Vec<$crate::lines::Segment>> = Vec::new();
        $( parts.push($crate::lines::IntoSegments::into_segments($part)); )*
        $crate::lines::group(parts)
    }};
}

/// Failure of a render function
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("render failed: {message}")]
pub struct RenderError {
    pub message: String,
}

impl RenderError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(ToString::to_string)
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "render function panicked".to_string());
        Self::new(message)
    }
}

/// Run a render function, converting errors and panics into `RenderError`
///
/// # Errors
///
/// Returns `RenderError` if `f` returns an error or panics.
pub fn render<F, E>(f: F) -> Result<Vec<Line>, RenderError>
where
    F: FnOnce() -> Result<Vec<Line>, E>,
    E: fmt::Display,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(lines)) => Ok(lines),
        Ok(Err(e)) => Err(RenderError::new(e.to_string())),
        Err(payload) => Err(RenderError::from_panic(payload.as_ref())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_ok() {
        let lines = render(|| Ok::<_, String>(vec![Line::from("a"), Line::from("b".to_string())])).unwrap();
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_render_error_is_caught() {
        let err = render(|| Err::<Vec<Line>, _>("no such node")).unwrap_err();
        assert_eq!(err.message, "no such node");
    }

    #[test]
    fn test_render_panic_is_caught() {
        let err = render(|| -> Result<Vec<Line>, String> { panic!("boom") }).unwrap_err();
        assert_eq!(err.message, "boom");
    }

    #[test]
    fn test_group_flattens_nested() {
        let inner = group(vec![Segment::text("b"), Segment::text("c")]);
        let outer = group![Segment::text("a"), vec![inner, Segment::text("d")]];

        let Segment::Group(segments) = outer else {
            panic!("expected group");
        };
        assert_eq!(segments.len(), 4);
        assert!(segments.iter().all(|s| !matches!(s, Segment::Group(_))));
        assert_eq!(
            segments.iter().map(Segment::content).collect::<String>(),
            "abcd"
        );
    }

    #[test]
    fn test_group_of_lists() {
        let grouped = group(vec![
            vec![Segment::highlighted("x", "Title")],
            vec![Segment::text("y"), group(vec![Segment::text("z")])],
        ]);
        assert_eq!(grouped.content(), "xyz");
        if let Segment::Group(segments) = grouped {
            assert_eq!(segments.len(), 3);
        }
    }
}
