//! Testing utilities for nodeselect
//!
//! Store fixtures shared by unit tests: a small sample knowledge base and a
//! [`ScriptedStore`] whose async fetches can be delayed or made to fail per
//! id.
//!
//! Only available when compiled with `cfg(test)`.

use crate::store::{IdIter, MemoryStore, Node, RecordId, RecordStore, StoreError};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Record id from a test literal
///
/// # Panics
/// Panics if `id` is empty.
#[must_use]
pub fn rid(id: &str) -> RecordId {
    RecordId::new(id).expect("test ids are non-empty")
}

/// Three nodes: `rust` (one alias, two tags), `sled` (no aliases), `tokio`
#[must_use]
pub fn sample_nodes() -> Vec<Node> {
    vec![
        Node::new(rid("rust"), "Rust")
            .with_aliases(vec!["rustlang".into()])
            .with_tags(vec!["lang".into(), "systems".into()])
            .with_location("notes/rust.md", 1, 0),
        Node::new(rid("sled"), "Sled").with_tags(vec!["db".into()]),
        Node::new(rid("tokio"), "Tokio").with_location("notes/tokio.md", 3, 2),
    ]
}

#[must_use]
pub fn sample_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::from_nodes(sample_nodes()))
}

/// Store wrapper with per-id fetch latency and failures
///
/// Counts every async fetch, so tests can tell which ids were looked up.
pub struct ScriptedStore {
    inner: MemoryStore,
    delays: HashMap<RecordId, Duration>,
    failing: HashSet<RecordId>,
    fetches: AtomicUsize,
}

impl ScriptedStore {
    #[must_use]
    pub fn new(nodes: impl IntoIterator<Item = Node>) -> Self {
        Self {
            inner: MemoryStore::from_nodes(nodes),
            delays: HashMap::new(),
            failing: HashSet::new(),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Delay the async fetch of `id`
    #[must_use]
    pub fn with_delay(mut self, id: &str, delay: Duration) -> Self {
        self.delays.insert(rid(id), delay);
        self
    }

    /// Make every fetch of `id` fail
    #[must_use]
    pub fn with_failure(mut self, id: &str) -> Self {
        self.failing.insert(rid(id));
        self
    }

    /// Number of async fetches so far
    #[must_use]
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for ScriptedStore {
    fn ids(&self) -> Result<Vec<RecordId>, StoreError> {
        self.inner.ids()
    }

    fn iter_ids(&self) -> IdIter {
        self.inner.iter_ids()
    }

    async fn get(&self, id: &RecordId) -> Result<Option<Node>, StoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(id) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(id) {
            return Err(StoreError::FetchError(format!("scripted failure for {id}")));
        }
        self.inner.get(id).await
    }

    fn get_sync(&self, id: &RecordId) -> Result<Option<Node>, StoreError> {
        if self.failing.contains(id) {
            return Err(StoreError::FetchError(format!("scripted failure for {id}")));
        }
        self.inner.get_sync(id)
    }
}
