//! Persistent node store backed by sled
//!
//! Nodes live in a single `nodes` tree keyed by the UTF-8 bytes of their id,
//! with bincode-encoded values. Iteration order is sled's key order.

use super::{IdIter, Node, RecordId, RecordStore, StoreError};
use async_trait::async_trait;
use sled::{Db, Tree};
use std::path::Path;

/// Sled-backed record store
pub struct SledStore {
    db: Db,
    nodes: Tree,
}

impl SledStore {
    /// Opens or creates a store at the specified path
    ///
    /// # Examples
    /// ```no_run
    /// use nodeselect::store::SledStore;
    /// let store = SledStore::open("my_kb").unwrap();
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the database or its tree cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        let nodes = db.open_tree("nodes")?;
        Ok(Self { db, nodes })
    }

    /// Insert or replace a node
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if encoding or the write fails.
    pub fn insert(&self, node: &Node) -> Result<(), StoreError> {
        let value = bincode::encode_to_vec(node, bincode::config::standard())?;
        self.nodes.insert(node.id.as_str().as_bytes(), value)?;
        Ok(())
    }

    /// Remove a node, returning whether it existed
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub fn remove(&self, id: &RecordId) -> Result<bool, StoreError> {
        Ok(self.nodes.remove(id.as_str().as_bytes())?.is_some())
    }

    /// Decode every node in key order
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if iteration or decoding fails.
    pub fn list_all(&self) -> Result<Vec<Node>, StoreError> {
        let mut nodes = Vec::new();
        for result in &self.nodes {
            let (_, value) = result?;
            nodes.push(decode_node(&value)?);
        }
        Ok(nodes)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.nodes.len()
    }

    /// Remove every node
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the tree cannot be cleared.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.nodes.clear()?;
        Ok(())
    }

    /// Flush pending writes to disk
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the flush fails.
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }
}

fn decode_node(bytes: &[u8]) -> Result<Node, StoreError> {
    let (node, _): (Node, usize) = bincode::decode_from_slice(bytes, bincode::config::standard())?;
    Ok(node)
}

fn key_to_id(key: &[u8]) -> Option<RecordId> {
    std::str::from_utf8(key).ok().and_then(|s| RecordId::new(s).ok())
}

fn read_node(tree: &Tree, id: &RecordId) -> Result<Option<Node>, StoreError> {
    tree.get(id.as_str().as_bytes())?
        .map(|value| decode_node(&value))
        .transpose()
}

#[async_trait]
impl RecordStore for SledStore {
    fn ids(&self) -> Result<Vec<RecordId>, StoreError> {
        let mut ids = Vec::new();
        for key in self.nodes.iter().keys() {
            if let Some(id) = key_to_id(&key?) {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    fn iter_ids(&self) -> IdIter {
        Box::new(self.nodes.iter().keys().filter_map(|key| match key {
            Ok(key) => key_to_id(&key),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable node key");
                None
            }
        }))
    }

    async fn get(&self, id: &RecordId) -> Result<Option<Node>, StoreError> {
        let tree = self.nodes.clone();
        let id = id.clone();
        tokio::task::spawn_blocking(move || read_node(&tree, &id))
            .await
            .map_err(|e| StoreError::FetchError(e.to_string()))?
    }

    fn get_sync(&self, id: &RecordId) -> Result<Option<Node>, StoreError> {
        read_node(&self.nodes, id)
    }
}
