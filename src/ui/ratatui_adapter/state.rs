//! Application state for the ratatui TUI
//!
//! Items may keep arriving while the finder is shown, so the state also
//! tracks whether the input is complete. Query editing lives in
//! [`QueryLine`].

use super::query::QueryLine;
use crate::ui::types::DisplayItem;

/// How the finder loop should end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exit {
    Confirmed(Option<String>),
    Aborted(Option<String>),
}

/// Application state for the fuzzy finder
#[derive(Debug)]
pub struct AppState {
    /// All items received so far
    pub items: Vec<DisplayItem>,
    /// Indices into `items` matching the query, best first (from nucleo)
    pub filtered_indices: Vec<u32>,
    /// Position in `filtered_indices`
    pub cursor: usize,
    pub query: QueryLine,
    pub prompt: String,
    /// Whether the feed has been drained
    pub input_done: bool,
    pub exit: Option<Exit>,
    /// First visible row of the item list
    pub scroll_offset: usize,
    pub preview_scroll: usize,
    /// Rows in the item list area, set during render
    pub visible_height: usize,
}

impl AppState {
    #[must_use]
    pub fn new(items: Vec<DisplayItem>, prompt: impl Into<String>, query: impl Into<String>) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        let filtered_indices = (0..items.len() as u32).collect();
        Self {
            items,
            filtered_indices,
            cursor: 0,
            query: QueryLine::new(query),
            prompt: prompt.into(),
            input_done: false,
            exit: None,
            scroll_offset: 0,
            preview_scroll: 0,
            visible_height: 20,
        }
    }

    fn last_row(&self) -> usize {
        self.filtered_indices.len().saturating_sub(1)
    }

    /// Move the cursor by `delta` rows, clamped to the matched items
    pub fn move_cursor(&mut self, delta: isize) {
        let target = self.cursor.saturating_add_signed(delta).min(self.last_row());
        if target != self.cursor {
            self.cursor = target;
            self.preview_scroll = 0;
        }
        self.keep_cursor_visible();
    }

    pub fn cursor_up(&mut self) {
        self.move_cursor(-1);
    }

    pub fn cursor_down(&mut self) {
        self.move_cursor(1);
    }

    #[allow(clippy::cast_possible_wrap)]
    pub fn page_up(&mut self) {
        self.move_cursor(-(self.visible_height as isize));
    }

    #[allow(clippy::cast_possible_wrap)]
    pub fn page_down(&mut self) {
        self.move_cursor(self.visible_height as isize);
    }

    pub fn jump_to_start(&mut self) {
        self.move_cursor(isize::MIN);
    }

    pub fn jump_to_end(&mut self) {
        self.move_cursor(isize::MAX);
    }

    const fn keep_cursor_visible(&mut self) {
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.visible_height > 0 && self.cursor >= self.scroll_offset + self.visible_height {
            self.scroll_offset = self.cursor + 1 - self.visible_height;
        }
    }

    #[must_use]
    pub fn current_item(&self) -> Option<&DisplayItem> {
        let idx = *self.filtered_indices.get(self.cursor)?;
        self.items.get(idx as usize)
    }

    #[must_use]
    pub fn current_key(&self) -> Option<&str> {
        self.current_item().map(|item| item.key.as_str())
    }

    /// Key of the item under the cursor, or nothing when no item matches
    #[must_use]
    pub fn selected_keys(&self) -> Vec<String> {
        self.current_key().map(str::to_string).into_iter().collect()
    }

    /// Replace the matches after a nucleo tick, keeping the cursor in range
    pub fn update_filtered(&mut self, indices: Vec<u32>) {
        self.filtered_indices = indices;
        self.cursor = self.cursor.min(self.last_row());
        self.keep_cursor_visible();
    }

    pub fn finish(&mut self, exit: Exit) {
        self.exit = Some(exit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(count: usize) -> AppState {
        let items = (0..count)
            .map(|i| DisplayItem::new(format!("n{i}"), format!("Node {i}"), format!("node {i}")))
            .collect();
        AppState::new(items, "Node: ", "")
    }

    #[test]
    fn test_cursor_is_clamped() {
        let mut state = state_with(5);
        state.cursor_up();
        assert_eq!(state.cursor, 0);

        (0..10).for_each(|_| state.cursor_down());
        assert_eq!(state.cursor, 4);

        state.jump_to_start();
        assert_eq!(state.cursor, 0);
        state.jump_to_end();
        assert_eq!(state.cursor, 4);
    }

    #[test]
    fn test_paging_scrolls_list() {
        let mut state = state_with(10);
        state.visible_height = 3;

        state.page_down();
        assert_eq!((state.cursor, state.scroll_offset), (3, 1));
        state.cursor_down();
        assert_eq!((state.cursor, state.scroll_offset), (4, 2));
        state.page_up();
        assert_eq!((state.cursor, state.scroll_offset), (1, 1));
    }

    #[test]
    fn test_moving_resets_preview_scroll() {
        let mut state = state_with(3);
        state.preview_scroll = 7;
        state.cursor_up();
        assert_eq!(state.preview_scroll, 7);
        state.cursor_down();
        assert_eq!(state.preview_scroll, 0);
    }

    #[test]
    fn test_selection_follows_matches() {
        let mut state = state_with(5);
        state.jump_to_end();
        assert_eq!(state.selected_keys(), ["n4"]);

        state.update_filtered(vec![2, 0]);
        assert_eq!(state.cursor, 1);
        assert_eq!(state.selected_keys(), ["n0"]);

        state.update_filtered(Vec::new());
        assert!(state.selected_keys().is_empty());
        assert!(state.current_item().is_none());
    }
}
