//! Node selection entry point
//!
//! [`NodeSelect`] turns the records of a [`RecordStore`] into [`Item`]s and
//! opens a selection dialog over them with either backend:
//!
//! - **eager** ([`NodeSelect::eager`]): every item is built up front and the
//!   finder receives a complete list
//! - **streaming** ([`NodeSelect::streaming`]): items are produced one at a
//!   time by an [`ItemSource`] while the finder is already open
//!
//! Both backends see the same ids in the same order: `include` when set,
//! the store order otherwise, with `exclude` removed before any record is
//! expanded.
//!
//! # Examples
//!
//! ```no_run
//! use nodeselect::facade::NodeSelect;
//! use nodeselect::select::{Outcome, SelectionBackend};
//! use nodeselect::store::MemoryStore;
//! use nodeselect::ui::RatatuiFinder;
//! use std::sync::Arc;
//!
//! let select = NodeSelect::new(Arc::new(MemoryStore::new()));
//! let outcome = select
//!     .streaming(Arc::new(RatatuiFinder::new()))
//!     .on_choice(|item| println!("{}", item.id))
//!     .open()
//!     .unwrap();
//! assert!(matches!(outcome, Outcome::Accepted(_) | Outcome::Canceled));
//! ```

use crate::item::Item;
use crate::keybinds::{KeyAction, Keymap};
use crate::select::{EagerSelect, PreviewSettings, SelectOptions, SharedFinder, StreamingSelect};
use crate::source::{Annotate, Expansion, ItemSource, ItemStream, RecordToItems};
use crate::store::{IdIter, Node, RecordStore};
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Title item plus one item per alias
#[must_use]
pub fn default_record_to_items(node: &Node) -> Vec<Item> {
    std::iter::once(&node.title)
        .chain(&node.aliases)
        .map(|text| Item::new(node.id.clone(), text.clone(), text.clone()))
        .collect()
}

/// The node's tags as `#tag #tag`, or nothing for untagged nodes
#[must_use]
pub fn default_annotate(node: &Node) -> Option<String> {
    if node.tags.is_empty() {
        return None;
    }
    Some(node.tags.iter().map(|tag| format!("#{tag}")).collect::<Vec<_>>().join(" "))
}

/// Backend-agnostic node selection
#[derive(Clone)]
pub struct NodeSelect {
    store: Arc<dyn RecordStore>,
    record_to_items: RecordToItems,
    annotate: Annotate,
    options: SelectOptions,
    keymap: Keymap,
    preview: PreviewSettings,
}

impl fmt::Debug for NodeSelect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeSelect")
            .field("options", &self.options)
            .field("keymap", &self.keymap)
            .field("preview", &self.preview)
            .finish_non_exhaustive()
    }
}

impl NodeSelect {
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            record_to_items: Arc::new(default_record_to_items),
            annotate: Arc::new(default_annotate),
            options: SelectOptions::default(),
            keymap: Keymap::default(),
            preview: PreviewSettings::default(),
        }
    }

    #[must_use]
    pub fn with_record_to_items<F>(mut self, f: F) -> Self
    where
        F: Fn(&Node) -> Vec<Item> + Send + Sync + 'static,
    {
        self.record_to_items = Arc::new(f);
        self
    }

    #[must_use]
    pub fn with_annotate<F>(mut self, f: F) -> Self
    where
        F: Fn(&Node) -> Option<String> + Send + Sync + 'static,
    {
        self.annotate = Arc::new(f);
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: SelectOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_keymap(mut self, keymap: Keymap) -> Self {
        self.keymap = keymap;
        self
    }

    #[must_use]
    pub fn with_preview(mut self, preview: PreviewSettings) -> Self {
        self.preview = preview;
        self
    }

    #[must_use]
    pub const fn options(&self) -> &SelectOptions {
        &self.options
    }

    #[must_use]
    pub const fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    #[must_use]
    pub const fn preview(&self) -> &PreviewSettings {
        &self.preview
    }

    #[must_use]
    pub fn store(&self) -> Arc<dyn RecordStore> {
        Arc::clone(&self.store)
    }

    /// Expansion functions with the `exclude` option applied
    #[must_use]
    pub fn expansion(&self) -> Expansion {
        Expansion::new(Arc::clone(&self.record_to_items), Arc::clone(&self.annotate))
            .with_exclude(self.options.exclude.iter().flatten().cloned())
    }

    /// Candidate ids: `include` in its own order, else every id in the store
    #[must_use]
    pub fn ids(&self) -> IdIter {
        match &self.options.include {
            Some(include) => Box::new(include.clone().into_iter()),
            None => self.store.iter_ids(),
        }
    }

    /// Build every item on the calling thread
    ///
    /// Records that are missing or fail to load are skipped.
    #[must_use]
    pub fn items(&self) -> Vec<Item> {
        let expansion = self.expansion();
        let mut items = Vec::new();
        for id in self.ids() {
            if expansion.is_excluded(&id) {
                continue;
            }
            match self.store.get_sync(&id) {
                Ok(Some(node)) => items.extend(expansion.expand(&node)),
                Ok(None) => tracing::trace!(%id, "record not found"),
                Err(e) => tracing::warn!(%id, error = %e, "skipping record"),
            }
        }
        tracing::debug!(count = items.len(), "items built");
        items
    }

    /// Produce items lazily on the current tokio runtime
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn stream(&self, cancel: &CancellationToken) -> ItemStream {
        ItemSource::new(Arc::clone(&self.store), self.ids(), self.expansion()).spawn(cancel)
    }

    #[must_use]
    pub fn eager(&self, finder: SharedFinder) -> EagerSelect {
        EagerSelect::new(self.clone(), finder)
    }

    #[must_use]
    pub fn streaming(&self, finder: SharedFinder) -> StreamingSelect {
        StreamingSelect::new(self.clone(), finder)
    }
}

/// Registration record of the node selection extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    pub name: &'static str,
    /// Command that opens the dialog
    pub invocation: &'static str,
    pub keymap: Keymap,
}

impl Extension {
    pub const NAME: &'static str = "node_select";
    pub const INVOCATION: &'static str = "find_node";

    #[must_use]
    pub fn register() -> Self {
        let extension = Self {
            name: Self::NAME,
            invocation: Self::INVOCATION,
            keymap: Keymap::default(),
        };
        tracing::debug!(name = extension.name, invocation = extension.invocation, "extension registered");
        extension
    }

    /// Keys bound to `action`
    #[must_use]
    pub fn keys_for(&self, action: KeyAction) -> Vec<String> {
        self.keymap
            .bindings()
            .into_iter()
            .filter(|(_, bound)| *bound == action)
            .map(|(key, _)| key)
            .collect()
    }
}
