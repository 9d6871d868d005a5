//! Laid-out lines with static highlights, bound actions and pending lazy highlights

use super::highlight::{HighlightFn, HighlightTarget, Namespace, fn_id};
use super::{ActionFn, Line, Segment};
use crate::ui::Theme;
use ratatui::text::{Line as TextLine, Span};
use std::fmt;
use std::ops::Range;

/// A highlight applied to a byte range of one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticHighlight {
    pub ns: Namespace,
    pub row: usize,
    pub cols: Range<usize>,
    pub group: String,
}

/// A key bound by an action segment
#[derive(Clone)]
pub struct BoundAction {
    pub key: String,
    /// `None` for buffer-wide bindings
    pub row: Option<usize>,
    handler: ActionFn,
}

impl fmt::Debug for BoundAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundAction")
            .field("key", &self.key)
            .field("row", &self.row)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
struct LazySlot {
    highlight: HighlightFn,
    global: bool,
}

/// Lines laid out into rows, ready for display
///
/// Lazy highlights stay pending until [`LineBuffer::apply_lazy`] is called
/// for the rows that become visible.
#[derive(Default)]
pub struct LineBuffer {
    rows: Vec<String>,
    highlights: Vec<StaticHighlight>,
    actions: Vec<BoundAction>,
    lazy: Vec<Option<LazySlot>>,
    handled: Vec<bool>,
    global_done: bool,
}

impl LineBuffer {
    /// Lay out rendered lines
    ///
    /// Raw text is split on newlines into several rows; newlines inside lazy
    /// or segment lines are shown as spaces.
    #[must_use]
    pub fn from_lines(lines: Vec<Line>) -> Self {
        let mut buffer = Self::default();
        for line in lines {
            match line {
                Line::Raw(text) => {
                    for part in text.split('\n') {
                        buffer.push_row(part.to_string(), None);
                    }
                }
                Line::Lazy(lazy) => {
                    let slot = LazySlot {
                        highlight: lazy.highlight,
                        global: lazy.global,
                    };
                    buffer.push_row(lazy.text.replace('\n', " "), Some(slot));
                }
                Line::Segments(segments) => {
                    let row = buffer.rows.len();
                    let mut text = String::new();
                    for segment in segments {
                        buffer.lay_out(row, &mut text, segment);
                    }
                    buffer.push_row(text, None);
                }
            }
        }
        buffer
    }

    fn push_row(&mut self, text: String, slot: Option<LazySlot>) {
        self.rows.push(text);
        self.lazy.push(slot);
        self.handled.push(false);
    }

    fn lay_out(&mut self, row: usize, text: &mut String, segment: Segment) {
        match segment {
            Segment::Text(content) => text.push_str(&content.replace('\n', " ")),
            Segment::Highlighted { content, group } => {
                let start = text.len();
                text.push_str(&content.replace('\n', " "));
                self.highlights.push(StaticHighlight {
                    ns: Namespace::STATIC,
                    row,
                    cols: start..text.len(),
                    group,
                });
            }
            Segment::Action { key, handler, global } => self.actions.push(BoundAction {
                key,
                row: (!global).then_some(row),
                handler,
            }),
            Segment::Group(segments) => {
                for segment in segments {
                    self.lay_out(row, text, segment);
                }
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    #[must_use]
    pub fn highlights(&self) -> &[StaticHighlight] {
        &self.highlights
    }

    #[must_use]
    pub fn actions(&self) -> &[BoundAction] {
        &self.actions
    }

    /// Run the handler bound to `key` on `row`, falling back to global bindings
    pub fn trigger(&self, key: &str, row: usize) -> bool {
        let local = self.actions.iter().find(|a| a.key == key && a.row == Some(row));
        let action = local.or_else(|| self.actions.iter().find(|a| a.key == key && a.row.is_none()));
        match action {
            Some(action) => {
                (action.handler)(row);
                true
            }
            None => false,
        }
    }

    /// Invoke pending lazy highlights for `visible` rows
    ///
    /// The first call also runs the global pass: each function flagged global
    /// on any row is invoked once with every row it owns, across the whole
    /// buffer. Remaining rows in `visible` are grouped into runs of
    /// consecutive rows sharing one function, one call per run. Rows are
    /// highlighted at most once over the buffer's lifetime.
    ///
    /// Returns the number of highlight function invocations.
    pub fn apply_lazy(&mut self, visible: Range<usize>, ns: Namespace) -> usize {
        let mut calls = self.take_global_calls();
        for (_, ranges) in &calls {
            self.mark_handled(ranges);
        }

        let end = visible.end.min(self.rows.len());
        let mut row = visible.start.min(end);
        while row < end {
            let Some(slot) = self.pending(row) else {
                row += 1;
                continue;
            };
            let id = fn_id(&slot.highlight);
            let start = row;
            row += 1;
            while row < end && self.pending(row).is_some_and(|next| fn_id(&next.highlight) == id) {
                row += 1;
            }
            self.mark_handled(&[start..row]);
            calls.push((slot.highlight, vec![start..row]));
        }

        let count = calls.len();
        for (highlight, ranges) in calls {
            tracing::trace!(ranges = ?ranges, "lazy highlight");
            highlight(&mut *self, ns, &ranges);
        }
        count
    }

    fn mark_handled(&mut self, ranges: &[Range<usize>]) {
        for range in ranges {
            self.handled[range.clone()].fill(true);
        }
    }

    fn pending(&self, row: usize) -> Option<LazySlot> {
        if self.handled[row] {
            return None;
        }
        self.lazy[row].clone()
    }

    fn take_global_calls(&mut self) -> Vec<(HighlightFn, Vec<Range<usize>>)> {
        if self.global_done {
            return Vec::new();
        }
        self.global_done = true;

        let mut plans: Vec<(HighlightFn, Vec<usize>)> = Vec::new();
        for slot in self.lazy.iter().flatten().filter(|slot| slot.global) {
            let id = fn_id(&slot.highlight);
            if !plans.iter().any(|(f, _)| fn_id(f) == id) {
                plans.push((slot.highlight.clone(), Vec::new()));
            }
        }
        if plans.is_empty() {
            return Vec::new();
        }

        for (row, slot) in self.lazy.iter().enumerate() {
            let Some(slot) = slot else { continue };
            let id = fn_id(&slot.highlight);
            if let Some((_, rows)) = plans.iter_mut().find(|(f, _)| fn_id(f) == id) {
                rows.push(row);
            }
        }

        plans
            .into_iter()
            .map(|(highlight, rows)| (highlight, coalesce(&rows)))
            .collect()
    }

    /// Convert rows to styled text, mapping highlight groups through `theme`
    ///
    /// Where highlights overlap, the one added last wins.
    #[must_use]
    pub fn to_text(&self, theme: &Theme) -> Vec<TextLine<'static>> {
        let mut by_row: Vec<Vec<&StaticHighlight>> = vec![Vec::new(); self.rows.len()];
        for highlight in &self.highlights {
            if let Some(bucket) = by_row.get_mut(highlight.row) {
                bucket.push(highlight);
            }
        }

        self.rows
            .iter()
            .zip(by_row)
            .map(|(text, highlights)| style_row(text, &highlights, theme))
            .collect()
    }
}

impl HighlightTarget for LineBuffer {
    fn line(&self, row: usize) -> Option<&str> {
        self.rows.get(row).map(String::as_str)
    }

    fn line_count(&self) -> usize {
        self.rows.len()
    }

    fn add_highlight(&mut self, ns: Namespace, row: usize, cols: Range<usize>, group: &str) {
        self.highlights.push(StaticHighlight {
            ns,
            row,
            cols,
            group: group.to_string(),
        });
    }
}

/// Merge sorted rows into end-exclusive runs of consecutive rows
fn coalesce(rows: &[usize]) -> Vec<Range<usize>> {
    let mut ranges: Vec<Range<usize>> = Vec::new();
    for &row in rows {
        match ranges.last_mut() {
            Some(last) if last.end == row => last.end = row + 1,
            _ => ranges.push(row..row + 1),
        }
    }
    ranges
}

fn floor_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn style_row(text: &str, highlights: &[&StaticHighlight], theme: &Theme) -> TextLine<'static> {
    if highlights.is_empty() {
        return TextLine::raw(text.to_string());
    }

    let mut cuts = vec![0, text.len()];
    for highlight in highlights {
        cuts.push(floor_boundary(text, highlight.cols.start));
        cuts.push(floor_boundary(text, highlight.cols.end));
    }
    cuts.sort_unstable();
    cuts.dedup();

    let spans: Vec<Span<'static>> = cuts
        .windows(2)
        .filter(|w| w[0] < w[1])
        .map(|w| {
            let style = highlights
                .iter()
                .rev()
                .find(|h| h.cols.start <= w[0] && w[1] <= h.cols.end)
                .map(|h| theme.group_style(&h.group))
                .unwrap_or_default();
            Span::styled(text[w[0]..w[1]].to_string(), style)
        })
        .collect();
    TextLine::from(spans)
}
