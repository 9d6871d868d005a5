//! In-memory record store

use super::{IdIter, Node, RecordId, RecordStore, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

#[derive(Debug, Default)]
struct Inner {
    order: Vec<RecordId>,
    nodes: HashMap<RecordId, Node>,
}

/// Insertion-ordered in-memory store
///
/// Re-inserting an existing id replaces the node but keeps its position.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from nodes, keeping their order
    #[must_use]
    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> Self {
        let store = Self::new();
        for node in nodes {
            store.insert(node);
        }
        store
    }

    pub fn insert(&self, node: Node) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if !inner.nodes.contains_key(&node.id) {
            inner.order.push(node.id.clone());
        }
        inner.nodes.insert(node.id.clone(), node);
    }

    pub fn remove(&self, id: &RecordId) -> Option<Node> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let removed = inner.nodes.remove(id);
        if removed.is_some() {
            inner.order.retain(|existing| existing != id);
        }
        removed
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, id: &RecordId) -> Option<Node> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .nodes
            .get(id)
            .cloned()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn ids(&self) -> Result<Vec<RecordId>, StoreError> {
        Ok(self.inner.read().unwrap_or_else(PoisonError::into_inner).order.clone())
    }

    fn iter_ids(&self) -> IdIter {
        let ids = self.inner.read().unwrap_or_else(PoisonError::into_inner).order.clone();
        Box::new(ids.into_iter())
    }

    async fn get(&self, id: &RecordId) -> Result<Option<Node>, StoreError> {
        tokio::task::yield_now().await;
        Ok(self.lookup(id))
    }

    fn get_sync(&self, id: &RecordId) -> Result<Option<Node>, StoreError> {
        Ok(self.lookup(id))
    }
}
