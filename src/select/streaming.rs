//! Selection over items streamed into the finder as encoded entries

use super::dialog::{BackendKind, Outcome, SelectionCore};
use super::preview::NodePreview;
use super::{SelectionBackend, SharedFinder};
use crate::NodeSelectError;
use crate::codec::{Formatter, NodeFormatter};
use crate::facade::NodeSelect;
use crate::item::Item;
use crate::source::{ItemStream, Resume};
use crate::store::RecordId;
use crate::ui::{EntryFeed, FinderConfig, FinderInput, FinderOptions};
use std::fmt;
use std::sync::Arc;
use std::task::Poll;
use tokio_util::sync::CancellationToken;

/// Feeds a running item stream to the finder, one encoded entry at a time
///
/// Each item is acknowledged as soon as it is taken, so the producer
/// fetches the next record while the finder renders this one.
struct EncodedFeed {
    stream: ItemStream,
    formatter: Arc<dyn Formatter>,
    options: FinderOptions,
}

impl EncodedFeed {
    fn take(&self, handed_off: Option<(Item, Resume)>) -> Option<String> {
        let (item, resume) = handed_off?;
        resume.resume();
        Some(self.formatter.to(&item, &self.options))
    }
}

impl EntryFeed for EncodedFeed {
    fn poll_entry(&mut self) -> Poll<Option<String>> {
        match self.stream.try_next() {
            Poll::Ready(handed_off) => Poll::Ready(self.take(handed_off)),
            Poll::Pending => Poll::Pending,
        }
    }

    fn next_entry(&mut self) -> Option<String> {
        let handed_off = self.stream.blocking_next();
        self.take(handed_off)
    }
}

/// Opens the finder right away and streams items into it
pub struct StreamingSelect {
    select: NodeSelect,
    finder: SharedFinder,
    formatter: Arc<dyn Formatter>,
    core: SelectionCore,
}

impl fmt::Debug for StreamingSelect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamingSelect")
            .field("select", &self.select)
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl StreamingSelect {
    #[must_use]
    pub fn new(select: NodeSelect, finder: SharedFinder) -> Self {
        let core = SelectionCore::new(select.options().clone(), BackendKind::Streaming);
        Self {
            select,
            finder,
            formatter: Arc::new(NodeFormatter::new()),
            core,
        }
    }

    /// Replace the entry codec
    #[must_use]
    pub fn with_formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        self.formatter = formatter;
        self
    }

    /// Finder options after the formatter declared its fields
    #[must_use]
    pub fn finder_options(&self) -> FinderOptions {
        let mut options = self.core.finder_options();
        self.formatter.enrich(&mut options);
        options
    }

    fn finder_config(&self, stream: ItemStream, options: &FinderOptions) -> FinderConfig {
        let feed = EncodedFeed {
            stream,
            formatter: Arc::clone(&self.formatter),
            options: options.clone(),
        };
        let config = FinderConfig::new(FinderInput::Stream(Box::new(feed)), options.clone())
            .with_keymap(self.select.keymap().clone());

        if !self.select.preview().enabled {
            return config;
        }
        let formatter = Arc::clone(&self.formatter);
        let entry_options = options.clone();
        let resolve = Arc::new(move |entry: &str| {
            formatter
                .from(entry, &entry_options)
                .and_then(|id| RecordId::new(id).ok())
        });
        let preview = NodePreview::new(self.select.store(), resolve, self.select.preview().clone());
        config.with_preview(Arc::new(preview))
    }

    /// Run the dialog from async code
    ///
    /// The finder runs on the blocking pool while the item source runs on
    /// the current runtime. The source is cancelled when the finder exits.
    ///
    /// # Errors
    ///
    /// Returns `NodeSelectError` if the options are invalid or the finder
    /// fails.
    pub async fn open_async(mut self) -> Result<Outcome, NodeSelectError> {
        self.core.options().validate()?;
        let options = self.finder_options();
        let cancel = CancellationToken::new();
        let config = self.finder_config(self.select.stream(&cancel), &options);

        self.core.open();
        let finder = Arc::clone(&self.finder);
        let run = tokio::task::spawn_blocking(move || finder.run(config)).await;
        cancel.cancel();
        let result = run??;

        let selected = result
            .selected
            .iter()
            .filter_map(|entry| self.formatter.decode(entry, &options))
            .collect();
        let outcome = self.core.decide(result.exit, selected, &result.query);
        Ok(self.core.finish(outcome))
    }
}

impl SelectionBackend for StreamingSelect {
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

    /// Run the dialog on a fresh current-thread runtime
    ///
    /// Must not be called from inside a tokio runtime; use
    /// [`StreamingSelect::open_async`] there.
    fn open(self) -> Result<Outcome, NodeSelectError> {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build()?;
        runtime.block_on(self.open_async())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::SelectOptions;
    use crate::testing::{ScriptedStore, rid, sample_nodes, sample_store};
    use crate::ui::MockFinder;
    use std::sync::Mutex;

    fn select(options: SelectOptions) -> NodeSelect {
        NodeSelect::new(sample_store()).with_options(options)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_finder_receives_encoded_entries() {
        let finder = Arc::new(MockFinder::aborted());
        let outcome = select(SelectOptions::default())
            .streaming(finder.clone())
            .open_async()
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Canceled);
        let seen = finder.seen();
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[0].key, "rust\nRust\nRust\u{a0}#lang #systems");
        assert_eq!(seen[0].searchable, "Rust");
        assert_eq!(seen[0].display, "Rust\u{a0}#lang #systems");
        assert_eq!(seen[3].display, "Tokio");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_accept_decodes_selected_entry() {
        let chosen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&chosen);
        let outcome = select(SelectOptions::default())
            .streaming(Arc::new(MockFinder::accept_query("sled")))
            .on_choice(move |item| *sink.lock().unwrap() = Some(item.id))
            .open_async()
            .await
            .unwrap();

        assert!(matches!(&outcome, Outcome::Accepted(item) if item.label == "Sled"));
        assert_eq!(*chosen.lock().unwrap(), Some(rid("sled")));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_cancel_on_no_initial_matches() {
        let canceled = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&canceled);
        let options = SelectOptions::default()
            .with_initial_input("zzz")
            .with_allow_select_missing(true)
            .with_cancel_on_no_initial_matches(true);

        let outcome = select(options)
            .streaming(Arc::new(MockFinder::accept()))
            .on_choice_missing(|_| panic!("missing handler must not run"))
            .on_cancel(move || *flag.lock().unwrap() = true)
            .open_async()
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Canceled);
        assert!(*canceled.lock().unwrap());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_failing_records_are_left_out() {
        let store = Arc::new(ScriptedStore::new(sample_nodes()).with_failure("sled"));
        let finder = Arc::new(MockFinder::aborted());
        NodeSelect::new(store)
            .streaming(finder.clone())
            .open_async()
            .await
            .unwrap();

        let ids: Vec<String> = finder
            .seen()
            .iter()
            .map(|item| item.key.split('\n').next().unwrap_or_default().to_string())
            .collect();
        assert_eq!(ids, ["rust", "rust", "tokio"]);
    }

    #[test]
    fn test_blocking_open() {
        let outcome = select(SelectOptions::default())
            .streaming(Arc::new(MockFinder::accept_query("tokio")))
            .open()
            .unwrap();
        assert!(matches!(outcome, Outcome::Accepted(item) if item.id == rid("tokio")));
    }

    #[test]
    fn test_finder_options_are_enriched() {
        let options = select(SelectOptions::default())
            .streaming(Arc::new(MockFinder::accept()))
            .finder_options();
        assert_eq!(options.delimiter, Some('\n'));
        assert!(options.read0);
        assert_eq!(options.match_fields, vec![2]);
    }
}
