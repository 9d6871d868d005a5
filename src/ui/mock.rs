//! Scripted fuzzy finder for tests
//!
//! Drains its input completely, matches by case-insensitive substring and
//! then plays back one scripted user action. The initial-query exits
//! (`select_one`, `exit_on_empty`) are honored before the script runs, the
//! same way an interactive finder would.

use super::error::Result;
use super::traits::{FinderConfig, FinderInput, FuzzyFinder};
use super::types::{DisplayItem, FinderResult};
use std::sync::{Arc, Mutex, PoisonError};

/// What the scripted user does once the finder is shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockAction {
    /// Confirm the first match, after replacing the query when `query` is set
    Accept { query: Option<String> },
    /// Cancel
    Abort,
}

/// Mock fuzzy finder that plays back a scripted action
#[derive(Debug, Clone)]
pub struct MockFinder {
    action: MockAction,
    seen: Arc<Mutex<Vec<DisplayItem>>>,
}

impl MockFinder {
    /// Accept the first match of the initial query
    #[must_use]
    pub fn accept() -> Self {
        Self::with_action(MockAction::Accept { query: None })
    }

    /// Type `query` over the initial query, then accept the first match
    #[must_use]
    pub fn accept_query(query: impl Into<String>) -> Self {
        Self::with_action(MockAction::Accept {
            query: Some(query.into()),
        })
    }

    /// Create a mock finder that simulates user abort
    #[must_use]
    pub fn aborted() -> Self {
        Self::with_action(MockAction::Abort)
    }

    #[must_use]
    pub fn with_action(action: MockAction) -> Self {
        Self {
            action,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every item received by the last run, in arrival order
    #[must_use]
    pub fn seen(&self) -> Vec<DisplayItem> {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Default for MockFinder {
    fn default() -> Self {
        Self::accept()
    }
}

fn matches<'a>(items: &'a [DisplayItem], query: &str) -> Vec<&'a DisplayItem> {
    let query = query.to_lowercase();
    items
        .iter()
        .filter(|item| item.searchable.to_lowercase().contains(&query))
        .collect()
}

impl FuzzyFinder for MockFinder {
    fn run(&self, config: FinderConfig) -> Result<FinderResult> {
        let options = config.options;
        let items: Vec<DisplayItem> = match config.input {
            FinderInput::Items(items) => items,
            FinderInput::Stream(mut feed) => std::iter::from_fn(|| feed.next_entry())
                .map(|entry| DisplayItem::from_entry(entry, &options))
                .collect(),
        };
        *self.seen.lock().unwrap_or_else(PoisonError::into_inner) = items.clone();

        let initial = matches(&items, &options.query);
        if let Some(exit) = options.initial_exit(initial.len()) {
            let selected = initial.iter().map(|item| item.key.clone()).collect();
            return Ok(FinderResult::initial(exit, selected, options.query));
        }

        match &self.action {
            MockAction::Abort => Ok(FinderResult::aborted(options.query).with_key(Some("esc".into()))),
            MockAction::Accept { query } => {
                let query = query.clone().unwrap_or(options.query);
                let selected = matches(&items, &query)
                    .first()
                    .map(|item| vec![item.key.clone()])
                    .unwrap_or_default();
                Ok(FinderResult::accepted(selected, query).with_key(Some("enter".into())))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{EntryFeed, FinderExit, FinderOptions};
    use std::collections::VecDeque;
    use std::task::Poll;

    struct QueueFeed(VecDeque<String>);

    impl EntryFeed for QueueFeed {
        fn poll_entry(&mut self) -> Poll<Option<String>> {
            Poll::Ready(self.0.pop_front())
        }

        fn next_entry(&mut self) -> Option<String> {
            self.0.pop_front()
        }
    }

    fn items() -> FinderInput {
        FinderInput::Items(vec![
            DisplayItem::new("0", "Ownership", "ownership"),
            DisplayItem::new("1", "Borrowing", "borrowing"),
        ])
    }

    #[test]
    fn test_accept_first_match() {
        let finder = MockFinder::accept_query("BORROW");
        let result = finder.run(FinderConfig::new(items(), FinderOptions::default())).unwrap();

        assert_eq!(result.exit, FinderExit::Accept);
        assert_eq!(result.selected, vec!["1"]);
        assert_eq!(result.query, "BORROW");
        assert_eq!(finder.seen().len(), 2);
    }

    #[test]
    fn test_aborted() {
        let result = MockFinder::aborted()
            .run(FinderConfig::new(items(), FinderOptions::default()))
            .unwrap();

        assert!(result.is_aborted());
        assert!(result.selected.is_empty());
    }

    #[test]
    fn test_accept_without_match_is_empty() {
        let result = MockFinder::accept_query("zzz")
            .run(FinderConfig::new(items(), FinderOptions::default()))
            .unwrap();

        assert_eq!(result.exit, FinderExit::Accept);
        assert!(result.selected.is_empty());
    }

    #[test]
    fn test_select_one_skips_script() {
        let options = FinderOptions {
            select_one: true,
            ..FinderOptions::new("> ").with_query("own")
        };
        let result = MockFinder::aborted().run(FinderConfig::new(items(), options)).unwrap();

        assert_eq!(result.exit, FinderExit::AutoSelected);
        assert_eq!(result.selected, vec!["0"]);
    }

    #[test]
    fn test_stream_input_is_drained() {
        let options = FinderOptions {
            delimiter: Some('\n'),
            match_fields: vec![2],
            display_fields: vec![3],
            ..FinderOptions::default()
        };
        let feed = QueueFeed(VecDeque::from(vec!["a\nalpha\nA".to_string(), "b\nbeta\nB".to_string()]));
        let finder = MockFinder::accept_query("beta");
        let result = finder
            .run(FinderConfig::new(FinderInput::Stream(Box::new(feed)), options))
            .unwrap();

        assert_eq!(result.selected, vec!["b\nbeta\nB"]);
        assert_eq!(finder.seen()[0].display, "A");
    }
}
