//! Keyed record store for knowledge-base nodes
//!
//! The selection layer only ever reads from a store, through the
//! [`RecordStore`] trait. Two implementations are provided:
//!
//! - [`MemoryStore`]: insertion-ordered in-memory store
//! - [`SledStore`]: persistent store backed by a sled tree, values encoded with bincode
//!
//! # Examples
//!
//! ```
//! use nodeselect::store::{MemoryStore, Node, RecordId, RecordStore};
//!
//! let store = MemoryStore::new();
//! store.insert(Node::new(RecordId::new("n1").unwrap(), "Rust"));
//!
//! let ids = store.ids().unwrap();
//! assert_eq!(ids.len(), 1);
//! assert!(store.get_sync(&ids[0]).unwrap().is_some());
//! ```

use async_trait::async_trait;

pub mod error;
pub mod memory;
pub mod sled_store;
pub mod types;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use sled_store::SledStore;
pub use types::{Location, Node, RecordId};

/// Lazy, owned iteration over record ids
pub type IdIter = Box<dyn Iterator<Item = RecordId> + Send>;

/// Read-only access to a keyed record store
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All ids, in store order
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the underlying storage cannot be read.
    fn ids(&self) -> Result<Vec<RecordId>, StoreError>;

    /// Lazy id iteration in store order
    ///
    /// Entries that cannot be read are skipped.
    fn iter_ids(&self) -> IdIter;

    /// Fetch a record, yielding to the runtime while the fetch is pending
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the record cannot be read or decoded.
    async fn get(&self, id: &RecordId) -> Result<Option<Node>, StoreError>;

    /// Fetch a record on the calling thread
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the record cannot be read or decoded.
    fn get_sync(&self, id: &RecordId) -> Result<Option<Node>, StoreError>;
}
