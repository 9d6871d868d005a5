//! Preview pane widget for displaying rendered preview lines
//!
//! Rows are not wrapped, so the scroll offset maps one-to-one onto the
//! [`LineBuffer`](crate::lines::LineBuffer) rows that lazy highlights track.

use crate::ui::ratatui_adapter::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Content of the preview pane for one item
#[derive(Debug, Clone, Default)]
pub enum PreviewContent {
    /// Nothing to show for the item
    #[default]
    Empty,
    Lines(Vec<Line<'static>>),
    /// Rendering the preview failed
    Failed(String),
}

/// Preview pane widget
pub struct PreviewPane<'a> {
    content: &'a PreviewContent,
    theme: &'a Theme,
    /// Scroll offset
    scroll: u16,
}

impl<'a> PreviewPane<'a> {
    #[must_use]
    pub const fn new(content: &'a PreviewContent, theme: &'a Theme) -> Self {
        Self {
            content,
            theme,
            scroll: 0,
        }
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll as u16;
        self
    }
}

impl Widget for PreviewPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = match self.content {
            PreviewContent::Empty => vec![Line::styled("No preview available", self.theme.dimmed_style())],
            PreviewContent::Lines(lines) => lines.clone(),
            PreviewContent::Failed(message) => vec![Line::styled(message.clone(), self.theme.error_style())],
        };

        let title = match (self.scroll, lines.len()) {
            (0, _) => " Preview ".to_string(),
            (row, total) => format!(" Preview {}/{total} ", row + 1),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style())
            .title(title);

        Paragraph::new(lines).block(block).scroll((self.scroll, 0)).render(area, buf);
    }
}
