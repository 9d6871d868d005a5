//! Search bar widget for query input

use crate::ui::ratatui_adapter::query::QueryLine;
use crate::ui::ratatui_adapter::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Prompt and query with the edit cursor
pub struct SearchBar<'a> {
    query: &'a QueryLine,
    prompt: &'a str,
    theme: &'a Theme,
    /// Shown while items are still arriving
    loading: bool,
}

impl<'a> SearchBar<'a> {
    #[must_use]
    pub const fn new(query: &'a QueryLine, prompt: &'a str, theme: &'a Theme) -> Self {
        Self {
            query,
            prompt,
            theme,
            loading: false,
        }
    }

    #[must_use]
    pub const fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }
}

impl Widget for SearchBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.loading { " Search (loading) " } else { " Search " };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.cursor_style())
            .title(title);

        let inner = block.inner(area);
        block.render(area, buf);

        let cursor = Span::styled("│", Style::default().add_modifier(Modifier::SLOW_BLINK));
        let (before, after) = self.query.as_str().split_at(self.query.cursor());
        let line = Line::from(vec![
            Span::styled(self.prompt, self.theme.dimmed_style()),
            Span::raw(before),
            cursor,
            Span::raw(after),
        ]);
        Paragraph::new(line).render(inner, buf);
    }
}
