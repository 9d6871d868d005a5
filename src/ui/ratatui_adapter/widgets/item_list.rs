//! Matched nodes, one row per item, annotations dimmed

use crate::item::split_label;
use crate::ui::ratatui_adapter::state::AppState;
use crate::ui::ratatui_adapter::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Widget},
};

pub struct ItemList<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> ItemList<'a> {
    #[must_use]
    pub const fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    fn title(&self) -> String {
        let matched = self.state.filtered_indices.len();
        let total = self.state.items.len();
        let more = if self.state.input_done { "" } else { "+" };
        format!(" Nodes ({matched}/{total}{more}) ")
    }

    fn row(&self, display: &str, is_cursor: bool) -> ListItem<'static> {
        let (label, annotation) = split_label(display);
        let mut spans = vec![
            Span::styled(if is_cursor { ">" } else { " " }, self.theme.cursor_style()),
            Span::raw(" "),
            Span::raw(label.to_string()),
        ];
        if let Some(annotation) = annotation {
            spans.push(Span::styled(format!("  {annotation}"), self.theme.dimmed_style()));
        }

        let row = ListItem::new(Line::from(spans));
        if is_cursor {
            row.style(self.theme.selected_style())
        } else {
            row
        }
    }
}

impl Widget for ItemList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style())
            .title(self.title());
        let inner = block.inner(area);
        block.render(area, buf);

        let rows: Vec<ListItem> = self
            .state
            .filtered_indices
            .iter()
            .enumerate()
            .skip(self.state.scroll_offset)
            .take(inner.height as usize)
            .filter_map(|(pos, &idx)| {
                let item = self.state.items.get(idx as usize)?;
                Some(self.row(&item.display, pos == self.state.cursor))
            })
            .collect();

        List::new(rows).render(inner, buf);
    }
}
