//! Ratatui-based fuzzy finder implementation
//!
//! Implements the `FuzzyFinder` trait using ratatui for UI and nucleo for
//! matching. Streamed input is drained a batch at a time between frames, so
//! the list fills while the user is already typing.

use super::events::{EventResult, poll_and_handle};
use super::state::{AppState, Exit};
use super::theme::Theme;
use super::widgets::{HelpBar, ItemList, KeyHint, PreviewContent, PreviewPane, SearchBar};
use crate::lines::{LineBuffer, Namespace};
use crate::ui::error::Result;
use crate::ui::traits::{EntryFeed, FinderConfig, FinderInput, FinderOptions, FuzzyFinder, PreviewProvider};
use crate::ui::types::{DisplayItem, FinderResult};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use moka::sync::Cache;
use nucleo::{
    Config, Nucleo,
    pattern::{CaseMatching, Normalization},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
};
use std::io::{self, Stdout};
use std::sync::{Arc, Mutex, PoisonError};
use std::task::Poll;
use std::time::Duration;

/// Namespace for lazy highlights applied to the preview pane
const PREVIEW_NS: Namespace = Namespace(1);

/// Entries taken from a feed per frame
const FEED_BATCH: usize = 512;

/// Ratatui-based fuzzy finder implementation
pub struct RatatuiFinder {
    theme: Theme,
    preview_cache_size: u64,
}

impl Default for RatatuiFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl RatatuiFinder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            theme: Theme::dark(),
            preview_cache_size: 64,
        }
    }

    /// Set custom theme
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Number of rendered previews kept between cursor moves
    #[must_use]
    pub const fn with_preview_cache_size(mut self, size: u64) -> Self {
        self.preview_cache_size = size;
        self
    }

    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        Terminal::new(backend).map_err(Into::into)
    }

    fn cleanup_terminal() -> Result<()> {
        disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen)?;
        Ok(())
    }

    fn render(&self, frame: &mut Frame, state: &mut AppState, preview: Option<&PreviewContent>, hints: &[KeyHint]) {
        let area = frame.area();

        let main_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search bar
                Constraint::Min(3),    // Items + preview
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        let search_bar = SearchBar::new(&state.query, &state.prompt, &self.theme)
            .loading(!state.input_done);
        frame.render_widget(search_bar, main_layout[0]);

        let content = if preview.is_some() {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(main_layout[1])
        } else {
            Layout::default()
                .constraints([Constraint::Percentage(100)])
                .split(main_layout[1])
        };

        // Borders take two rows
        state.visible_height = content[0].height.saturating_sub(2) as usize;
        frame.render_widget(ItemList::new(state, &self.theme), content[0]);

        if let Some(preview) = preview {
            let pane = PreviewPane::new(preview, &self.theme).scroll(state.preview_scroll);
            frame.render_widget(pane, content[1]);
        }

        frame.render_widget(HelpBar::new(hints, &self.theme), main_layout[2]);
    }

    fn run_loop(&self, terminal: &mut Terminal<CrosstermBackend<Stdout>>, config: FinderConfig) -> Result<FinderResult> {
        let FinderConfig {
            input,
            options,
            preview,
            keymap,
        } = config;

        let mut state = AppState::new(Vec::new(), options.prompt.clone(), options.query.clone());
        let mut matcher = Matcher::new();
        let mut feed = match input {
            FinderInput::Items(items) => {
                for item in items {
                    matcher.push(&mut state, item);
                }
                None
            }
            FinderInput::Stream(feed) => Some(feed),
        };
        state.input_done = feed.is_none();

        let previews = preview.map(|provider| PreviewCache::new(provider, self.preview_cache_size));
        let hints = HelpBar::hints_for(&keymap);
        let mut initial_checked = false;

        loop {
            if let Some(source) = feed.as_mut()
                && drain_feed(&mut **source, &options, &matcher, &mut state)
            {
                state.input_done = true;
                feed = None;
            }

            let finished = matcher.refresh(&mut state);

            if !initial_checked && state.input_done && finished {
                initial_checked = true;
                if !state.query.is_touched()
                    && let Some(exit) = options.initial_exit(state.filtered_indices.len())
                {
                    tracing::debug!(%exit, "finder exited on initial query");
                    return Ok(FinderResult::initial(exit, state.selected_keys(), state.query.into_string()));
                }
            }
            if state.query.is_touched() {
                initial_checked = true;
            }

            let preview_content = previews.as_ref().map(|cache| {
                let height = terminal.size().map(|size| size.height as usize).unwrap_or(24);
                cache.render(state.current_key(), state.preview_scroll, height, &self.theme)
            });

            terminal.draw(|frame| self.render(frame, &mut state, preview_content.as_ref(), &hints))?;

            match poll_and_handle(&mut state, &keymap, Duration::from_millis(30))? {
                EventResult::Confirm(key) => state.finish(Exit::Confirmed(key)),
                EventResult::Abort(key) => state.finish(Exit::Aborted(key)),
                EventResult::QueryChanged | EventResult::Continue | EventResult::Ignored => {}
            }

            if let Some(exit) = state.exit.take() {
                let query = state.query.as_str().to_string();
                return Ok(match exit {
                    Exit::Aborted(key) => FinderResult::aborted(query).with_key(key),
                    Exit::Confirmed(key) => FinderResult::accepted(state.selected_keys(), query).with_key(key),
                });
            }
        }
    }
}

impl FuzzyFinder for RatatuiFinder {
    fn run(&self, config: FinderConfig) -> Result<FinderResult> {
        let mut terminal = Self::setup_terminal()?;
        let result = self.run_loop(&mut terminal, config);
        Self::cleanup_terminal()?;
        result
    }
}

/// Move ready entries into the matcher; returns true at the end of the feed
fn drain_feed(feed: &mut dyn EntryFeed, options: &FinderOptions, matcher: &Matcher, state: &mut AppState) -> bool {
    for _ in 0..FEED_BATCH {
        match feed.poll_entry() {
            Poll::Ready(Some(entry)) => matcher.push(state, DisplayItem::from_entry(entry, options)),
            Poll::Ready(None) => return true,
            Poll::Pending => return false,
        }
    }
    false
}

/// Nucleo matcher over the searchable text of the items in `AppState`
struct Matcher {
    nucleo: Nucleo<u32>,
    pattern: Option<String>,
}

impl Matcher {
    fn new() -> Self {
        Self {
            nucleo: Nucleo::new(Config::DEFAULT, Arc::new(|| {}), None, 1),
            pattern: None,
        }
    }

    fn push(&self, state: &mut AppState, item: DisplayItem) {
        #[allow(clippy::cast_possible_truncation)]
        let idx = state.items.len() as u32;
        let searchable = item.searchable.clone();
        state.items.push(item);
        let _ = self.nucleo.injector().push(idx, |_, cols| {
            cols[0] = searchable.into();
        });
    }

    /// Re-match and update the filtered indices; returns true once matching is complete
    fn refresh(&mut self, state: &mut AppState) -> bool {
        let query = state.query.as_str();
        if self.pattern.as_deref() != Some(query) {
            let append = self.pattern.as_deref().is_some_and(|prev| query.starts_with(prev));
            self.nucleo
                .pattern
                .reparse(0, query, CaseMatching::Smart, Normalization::Smart, append);
            self.pattern = Some(query.to_string());
        }

        let status = self.nucleo.tick(10);
        let snapshot = self.nucleo.snapshot();
        state.update_filtered(snapshot.matched_items(..).map(|item| *item.data).collect());
        !status.running
    }
}

/// Laid-out previews per item key
///
/// Buffers stay cached so lazy highlights already applied survive cursor
/// moves and scrolling.
struct PreviewCache {
    provider: Arc<dyn PreviewProvider>,
    buffers: Cache<String, Arc<Mutex<std::result::Result<LineBuffer, String>>>>,
}

impl PreviewCache {
    fn new(provider: Arc<dyn PreviewProvider>, size: u64) -> Self {
        Self {
            provider,
            buffers: Cache::new(size),
        }
    }

    fn render(&self, key: Option<&str>, scroll: usize, height: usize, theme: &Theme) -> PreviewContent {
        let Some(key) = key else {
            return PreviewContent::Empty;
        };
        let entry = self.buffers.get_with(key.to_string(), || {
            let laid_out = self
                .provider
                .preview(key)
                .map(LineBuffer::from_lines)
                .map_err(|e| e.to_string());
            Arc::new(Mutex::new(laid_out))
        });

        let mut guard = entry.lock().unwrap_or_else(PoisonError::into_inner);
        match &mut *guard {
            Ok(buffer) if buffer.is_empty() => PreviewContent::Empty,
            Ok(buffer) => {
                buffer.apply_lazy(scroll..scroll + height, PREVIEW_NS);
                PreviewContent::Lines(buffer.to_text(theme))
            }
            Err(message) => PreviewContent::Failed(message.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lines::{Line, RenderError};

    struct Echo;

    impl PreviewProvider for Echo {
        fn preview(&self, key: &str) -> std::result::Result<Vec<Line>, RenderError> {
            if key == "bad" {
                return Err(RenderError::new("no such node"));
            }
            Ok(vec![Line::Raw(format!("preview of {key}"))])
        }
    }

    #[test]
    fn test_matcher_filters_items() {
        let mut state = AppState::new(Vec::new(), "> ", "");
        let mut matcher = Matcher::new();
        for (key, text) in [("a", "ownership"), ("b", "borrowing"), ("c", "lifetimes")] {
            matcher.push(&mut state, DisplayItem::new(key, text, text));
        }

        while !matcher.refresh(&mut state) {}
        assert_eq!(state.filtered_indices.len(), 3);

        "bor".chars().for_each(|c| state.query.insert(c));
        while !matcher.refresh(&mut state) {}
        assert_eq!(state.selected_keys(), vec!["b"]);
    }

    #[test]
    fn test_preview_cache_renders_and_reports_errors() {
        let cache = PreviewCache::new(Arc::new(Echo), 8);
        let theme = Theme::default();

        match cache.render(Some("node"), 0, 10, &theme) {
            PreviewContent::Lines(lines) => assert_eq!(lines.len(), 1),
            other => panic!("unexpected preview {other:?}"),
        }
        assert!(matches!(cache.render(Some("bad"), 0, 10, &theme), PreviewContent::Failed(_)));
        assert!(matches!(cache.render(None, 0, 10, &theme), PreviewContent::Empty));
    }
}
