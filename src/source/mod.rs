//! Streaming item source
//!
//! An [`ItemSource`] turns a sequence of record ids into [`Item`]s without
//! materializing the collection: a producer task fetches one record at a
//! time, expands it, and hands each item to the consumer together with a
//! [`Resume`]. The producer does not continue until that `Resume` is
//! invoked, so at most one item is ever in flight.
//!
//! The producer stops when
//! - the ids are exhausted (the stream then yields `None`),
//! - the cancellation token passed to [`ItemSource::spawn`] is cancelled,
//! - the [`ItemStream`] is dropped, or
//! - a `Resume` is dropped without being invoked.

use crate::item::Item;
use crate::store::{IdIter, Node, RecordId, RecordStore};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::task::Poll;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};

/// Expands one record into display items
pub type RecordToItems = Arc<dyn Fn(&Node) -> Vec<Item> + Send + Sync>;

/// Computes the annotation shared by all items of one record
pub type Annotate = Arc<dyn Fn(&Node) -> Option<String> + Send + Sync>;

/// How records become items, shared by the eager and streaming paths
#[derive(Clone)]
pub struct Expansion {
    pub record_to_items: RecordToItems,
    pub annotate: Annotate,
    pub exclude: HashSet<RecordId>,
}

impl Expansion {
    #[must_use]
    pub fn new(record_to_items: RecordToItems, annotate: Annotate) -> Self {
        Self {
            record_to_items,
            annotate,
            exclude: HashSet::new(),
        }
    }

    #[must_use]
    pub fn with_exclude(mut self, exclude: impl IntoIterator<Item = RecordId>) -> Self {
        self.exclude = exclude.into_iter().collect();
        self
    }

    #[must_use]
    pub fn is_excluded(&self, id: &RecordId) -> bool {
        self.exclude.contains(id)
    }

    /// Items for `node` in expansion order, each carrying the node's annotation
    #[must_use]
    pub fn expand(&self, node: &Node) -> Vec<Item> {
        let annotation = (self.annotate)(node);
        (self.record_to_items)(node)
            .into_iter()
            .map(|item| item.with_annotation(annotation.clone()))
            .collect()
    }
}

impl fmt::Debug for Expansion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expansion")
            .field("exclude", &self.exclude)
            .finish_non_exhaustive()
    }
}

/// Acknowledgement letting the producer continue past a handed-off item
#[derive(Debug)]
pub struct Resume(oneshot::Sender<()>);

impl Resume {
    pub fn resume(self) {
        // The producer may already be gone
        let _ = self.0.send(());
    }
}

/// Lazily fetched items for a sequence of ids
pub struct ItemSource {
    store: Arc<dyn RecordStore>,
    ids: IdIter,
    expansion: Expansion,
}

impl ItemSource {
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, ids: IdIter, expansion: Expansion) -> Self {
        Self { store, ids, expansion }
    }

    /// Start the producer on the current tokio runtime
    ///
    /// The producer runs under a child of `cancel`; dropping the returned
    /// stream cancels only that child.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn spawn(self, cancel: &CancellationToken) -> ItemStream {
        let token = cancel.child_token();
        let (tx, rx) = mpsc::channel(1);
        let task = tokio::spawn(self.produce(tx, token.clone()));
        ItemStream {
            rx,
            task,
            token: token.clone(),
            _guard: token.drop_guard(),
        }
    }

    async fn produce(self, tx: mpsc::Sender<(Item, Resume)>, cancel: CancellationToken) {
        let Self { store, ids, expansion } = self;
        let mut handed_off = 0usize;

        for id in ids {
            if expansion.is_excluded(&id) {
                tracing::trace!(%id, "excluded");
                continue;
            }

            let fetched = tokio::select! {
                biased;
                () = cancel.cancelled() => return,
                fetched = store.get(&id) => fetched,
            };
            let node = match fetched {
                Ok(Some(node)) => node,
                Ok(None) => {
                    tracing::trace!(%id, "record not found");
                    continue;
                }
                Err(e) => {
                    tracing::warn!(%id, error = %e, "skipping record");
                    continue;
                }
            };

            for item in expansion.expand(&node) {
                let (resume, resumed) = oneshot::channel();
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => return,
                    sent = tx.send((item, Resume(resume))) => if sent.is_err() {
                        return;
                    },
                }
                handed_off += 1;
                tracing::trace!(%id, handed_off, "item handed off");

                tokio::select! {
                    biased;
                    () = cancel.cancelled() => return,
                    ack = resumed => if ack.is_err() {
                        tracing::debug!(%id, "resume dropped, stopping item source");
                        return;
                    },
                }
            }
        }
        tracing::debug!(handed_off, "item source exhausted");
    }
}

/// Consumer end of a running [`ItemSource`]
pub struct ItemStream {
    rx: mpsc::Receiver<(Item, Resume)>,
    task: JoinHandle<()>,
    token: CancellationToken,
    _guard: DropGuard,
}

impl ItemStream {
    /// Next item, or `None` once the producer has finished
    pub async fn next(&mut self) -> Option<(Item, Resume)> {
        self.rx.recv().await
    }

    /// Next item if one is ready, without waiting
    pub fn try_next(&mut self) -> Poll<Option<(Item, Resume)>> {
        match self.rx.try_recv() {
            Ok(handed_off) => Poll::Ready(Some(handed_off)),
            Err(TryRecvError::Empty) => Poll::Pending,
            Err(TryRecvError::Disconnected) => Poll::Ready(None),
        }
    }

    /// Block the calling thread until the next item
    ///
    /// # Panics
    ///
    /// Panics if called from inside an async execution context.
    pub fn blocking_next(&mut self) -> Option<(Item, Resume)> {
        self.rx.blocking_recv()
    }

    /// Resume through every item and collect them
    pub async fn collect(mut self) -> Vec<Item> {
        let mut items = Vec::new();
        while let Some((item, resume)) = self.next().await {
            items.push(item);
            resume.resume();
        }
        items
    }

    /// Drive a push callback: `f(Some((item, resume)))` per item, then `f(None)`
    ///
    /// The callback decides when to resume; dropping the `Resume` ends the
    /// stream early.
    pub async fn push_into<F>(mut self, mut f: F)
    where
        F: FnMut(Option<(Item, Resume)>),
    {
        while let Some(handed_off) = self.next().await {
            f(Some(handed_off));
        }
        f(None);
    }

    /// Stop the producer
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the producer task has exited
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl fmt::Debug for ItemStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemStream")
            .field("cancelled", &self.token.is_cancelled())
            .field("finished", &self.task.is_finished())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedStore, rid, sample_nodes};
    use std::time::Duration;

    fn title_and_aliases() -> Expansion {
        Expansion::new(
            Arc::new(|node: &Node| {
                std::iter::once(&node.title)
                    .chain(&node.aliases)
                    .map(|label| Item::new(node.id.clone(), label.clone(), label.clone()))
                    .collect()
            }),
            Arc::new(|node: &Node| Some(format!("#{}", node.tags.len()))),
        )
    }

    fn ids(ids: &[&str]) -> IdIter {
        Box::new(ids.iter().map(|id| rid(id)).collect::<Vec<_>>().into_iter())
    }

    async fn wait_finished(stream: &ItemStream) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !stream.is_finished() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("producer did not exit");
    }

    #[test]
    fn test_expand_attaches_annotation() {
        let items = title_and_aliases().expand(&sample_nodes()[0]);
        let labels: Vec<_> = items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["Rust", "rustlang"]);
        assert!(items.iter().all(|i| i.annotation.as_deref() == Some("#2")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_survives_fetch_latency() {
        let store = ScriptedStore::new(sample_nodes())
            .with_delay("rust", Duration::from_millis(300))
            .with_delay("sled", Duration::from_millis(5));
        let source = ItemSource::new(Arc::new(store), ids(&["rust", "sled", "tokio"]), title_and_aliases());

        let items = source.spawn(&CancellationToken::new()).collect().await;
        let labels: Vec<_> = items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["Rust", "rustlang", "Sled", "Tokio"]);
    }

    #[tokio::test]
    async fn test_excluded_ids_are_never_fetched() {
        let store = Arc::new(ScriptedStore::new(sample_nodes()));
        let expansion = title_and_aliases().with_exclude([rid("rust")]);
        let source = ItemSource::new(store.clone(), ids(&["rust", "sled"]), expansion);

        let items = source.spawn(&CancellationToken::new()).collect().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "Sled");
        assert_eq!(store.fetches(), 1);
    }

    #[tokio::test]
    async fn test_missing_and_failing_records_are_skipped() {
        let store = ScriptedStore::new(sample_nodes()).with_failure("sled");
        let source = ItemSource::new(Arc::new(store), ids(&["ghost", "sled", "tokio"]), title_and_aliases());

        let items = source.spawn(&CancellationToken::new()).collect().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, rid("tokio"));
    }

    #[tokio::test]
    async fn test_one_item_in_flight() {
        let store = Arc::new(ScriptedStore::new(sample_nodes()));
        let source = ItemSource::new(store.clone(), ids(&["rust", "sled", "tokio"]), title_and_aliases());
        let mut stream = source.spawn(&CancellationToken::new());

        let (first, resume) = stream.next().await.unwrap();
        assert_eq!(first.label, "Rust");

        // Without a resume the producer stays parked on the first item
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
        assert!(stream.try_next().is_pending());
        assert_eq!(store.fetches(), 1);

        resume.resume();
        let (second, resume) = stream.next().await.unwrap();
        assert_eq!(second.label, "rustlang");
        resume.resume();
    }

    #[tokio::test]
    async fn test_cancellation_stops_producer() {
        let cancel = CancellationToken::new();
        let source = ItemSource::new(Arc::new(ScriptedStore::new(sample_nodes())), ids(&["rust", "sled"]), title_and_aliases());
        let mut stream = source.spawn(&cancel);

        let (_item, _resume) = stream.next().await.unwrap();
        cancel.cancel();
        wait_finished(&stream).await;
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_dropped_resume_stops_producer() {
        let source = ItemSource::new(Arc::new(ScriptedStore::new(sample_nodes())), ids(&["rust", "sled"]), title_and_aliases());
        let mut stream = source.spawn(&CancellationToken::new());

        let (_item, resume) = stream.next().await.unwrap();
        drop(resume);
        wait_finished(&stream).await;
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_dropping_stream_leaves_parent_token() {
        let parent = CancellationToken::new();
        let source = ItemSource::new(Arc::new(ScriptedStore::new(sample_nodes())), ids(&["rust"]), title_and_aliases());
        let stream = source.spawn(&parent);
        drop(stream);
        assert!(!parent.is_cancelled());
    }

    #[tokio::test]
    async fn test_push_into_ends_with_none() {
        let source = ItemSource::new(Arc::new(ScriptedStore::new(sample_nodes())), ids(&["sled", "tokio"]), title_and_aliases());
        let mut pushed = Vec::new();

        source
            .spawn(&CancellationToken::new())
            .push_into(|handed_off| match handed_off {
                Some((item, resume)) => {
                    pushed.push(Some(item.label));
                    resume.resume();
                }
                None => pushed.push(None),
            })
            .await;

        assert_eq!(pushed, vec![Some("Sled".to_string()), Some("Tokio".to_string()), None]);
    }
}
