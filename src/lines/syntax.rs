//! Syntect-backed lazy highlighting for file excerpts
//!
//! Emits highlight groups of the form `#rrggbb`, which [`crate::ui::Theme`]
//! maps straight to a foreground color.

use super::highlight::{HighlightFn, HighlightTarget, Namespace, highlight_fn};
use std::ops::Range;
use std::sync::LazyLock;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme as SyntectTheme, ThemeSet};
use syntect::parsing::SyntaxSet;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME: LazyLock<SyntectTheme> = LazyLock::new(|| {
    let mut themes = ThemeSet::load_defaults().themes;
    themes.remove("base16-ocean.dark").unwrap_or_default()
});

/// Highlight function for text in the language with file `extension`
///
/// Each range is highlighted from a fresh parse state, so a range starting
/// inside a multi-line construct may be colored as plain text.
#[must_use]
pub fn highlighter(extension: &str) -> HighlightFn {
    let extension = extension.to_string();
    highlight_fn(move |target, ns, ranges| highlight_ranges(&extension, target, ns, ranges))
}

fn highlight_ranges(extension: &str, target: &mut dyn HighlightTarget, ns: Namespace, ranges: &[Range<usize>]) {
    let syntax = SYNTAX_SET
        .find_syntax_by_extension(extension)
        .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text());

    for range in ranges {
        let mut highlighter = HighlightLines::new(syntax, &THEME);
        for row in range.clone() {
            let Some(text) = target.line(row).map(|line| format!("{line}\n")) else {
                break;
            };
            let Ok(regions) = highlighter.highlight_line(&text, &SYNTAX_SET) else {
                continue;
            };
            let mut col = 0;
            let mut found = Vec::new();
            for (style, piece) in regions {
                let piece = piece.trim_end_matches('\n');
                let fg = style.foreground;
                found.push((col..col + piece.len(), format!("#{:02x}{:02x}{:02x}", fg.r, fg.g, fg.b)));
                col += piece.len();
            }
            for (cols, group) in found {
                if !cols.is_empty() {
                    target.add_highlight(ns, row, cols, &group);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lines::{LazyLine, Line, LineBuffer};
    use std::sync::Arc;

    #[test]
    fn test_highlighter_emits_color_groups() {
        let f = highlighter("rs");
        let mut buffer = LineBuffer::from_lines(vec![
            Line::Lazy(LazyLine::new("fn main() {}", Arc::clone(&f))),
            Line::Lazy(LazyLine::new("let x = 1;", f)),
        ]);
        assert_eq!(buffer.apply_lazy(0..2, Namespace(7)), 1);
        assert!(!buffer.highlights().is_empty());
        assert!(buffer.highlights().iter().all(|h| h.group.starts_with('#') && h.ns == Namespace(7)));
    }
}
