//! Selection over a fully materialized item list

use super::dialog::{BackendKind, Outcome, SelectionCore};
use super::preview::NodePreview;
use super::{SelectionBackend, SharedFinder};
use crate::NodeSelectError;
use crate::facade::NodeSelect;
use crate::item::Item;
use crate::store::RecordId;
use crate::ui::{DisplayItem, FinderConfig, FinderInput};
use std::fmt;
use std::sync::Arc;

/// Builds every item before the finder opens
///
/// Finder keys are item indices, so duplicate labels stay distinguishable.
pub struct EagerSelect {
    select: NodeSelect,
    finder: SharedFinder,
    core: SelectionCore,
}

impl fmt::Debug for EagerSelect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EagerSelect")
            .field("select", &self.select)
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl EagerSelect {
    #[must_use]
    pub fn new(select: NodeSelect, finder: SharedFinder) -> Self {
        let core = SelectionCore::new(select.options().clone(), BackendKind::Eager);
        Self { select, finder, core }
    }

    fn finder_config(&self, items: &[Item]) -> FinderConfig {
        let display = items
            .iter()
            .enumerate()
            .map(|(i, item)| DisplayItem::new(i.to_string(), item.display(), item.value.clone()))
            .collect();
        let config = FinderConfig::new(FinderInput::Items(display), self.core.finder_options())
            .with_keymap(self.select.keymap().clone());

        if !self.select.preview().enabled {
            return config;
        }
        let ids: Arc<Vec<RecordId>> = Arc::new(items.iter().map(|item| item.id.clone()).collect());
        let resolve = Arc::new(move |key: &str| key.parse::<usize>().ok().and_then(|i| ids.get(i).cloned()));
        let preview = NodePreview::new(self.select.store(), resolve, self.select.preview().clone());
        config.with_preview(Arc::new(preview))
    }
}

impl SelectionBackend for EagerSelect {
    fn on_choice(mut self, f: impl FnOnce(Item) + Send + 'static) -> Self {
        self.core.set_on_choice(Box::new(f));
        self
    }

    fn on_choice_missing(mut self, f: impl FnOnce(String) + Send + 'static) -> Self {
        self.core.set_on_choice_missing(Box::new(f));
        self
    }

    fn on_cancel(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.core.set_on_cancel(Box::new(f));
        self
    }

    fn open(mut self) -> Result<Outcome, NodeSelectError> {
        self.core.options().validate()?;
        let items = self.select.items();
        let config = self.finder_config(&items);

        self.core.open();
        let result = self.finder.run(config)?;

        let selected = result
            .selected
            .iter()
            .filter_map(|key| key.parse::<usize>().ok())
            .filter_map(|i| items.get(i).cloned())
            .collect();
        let outcome = self.core.decide(result.exit, selected, &result.query);
        Ok(self.core.finish(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::SelectOptions;
    use crate::testing::{rid, sample_store};
    use crate::ui::{MockAction, MockFinder};
    use std::sync::Mutex;

    fn select(options: SelectOptions) -> NodeSelect {
        NodeSelect::new(sample_store()).with_options(options)
    }

    #[test]
    fn test_finder_sees_indexed_items() {
        let finder = Arc::new(MockFinder::aborted());
        let outcome = select(SelectOptions::default())
            .eager(finder.clone())
            .open()
            .unwrap();

        assert_eq!(outcome, Outcome::Canceled);
        let seen = finder.seen();
        let keys: Vec<&str> = seen.iter().map(|item| item.key.as_str()).collect();
        assert_eq!(keys, ["0", "1", "2", "3"]);
        assert_eq!(seen[0].display, "Rust\u{a0}#lang #systems");
        assert_eq!(seen[1].searchable, "rustlang");
    }

    #[test]
    fn test_accept_maps_key_back_to_item() {
        let chosen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&chosen);
        let outcome = select(SelectOptions::default())
            .eager(Arc::new(MockFinder::accept_query("rustl")))
            .on_choice(move |item| *sink.lock().unwrap() = Some(item))
            .open()
            .unwrap();

        let Outcome::Accepted(item) = outcome else {
            panic!("expected a choice, got {outcome:?}");
        };
        assert_eq!(item.id, rid("rust"));
        assert_eq!(item.label, "rustlang");
        assert_eq!(chosen.lock().unwrap().as_ref(), Some(&item));
    }

    #[test]
    fn test_auto_select_single_match() {
        let options = SelectOptions::default().with_initial_input("tok").with_auto_select(true);
        let finder = Arc::new(MockFinder::with_action(MockAction::Abort));
        let outcome = select(options).eager(finder).open().unwrap();
        assert!(matches!(outcome, Outcome::Accepted(item) if item.id == rid("tokio")));
    }

    #[test]
    fn test_invalid_options_fail_before_finder_runs() {
        let finder = Arc::new(MockFinder::accept());
        let result = select(SelectOptions::default().with_initial_input("a\nb"))
            .eager(finder.clone())
            .open();
        assert!(matches!(result, Err(NodeSelectError::Options(_))));
        assert!(finder.seen().is_empty());
    }
}
