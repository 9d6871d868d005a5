//! Record types held by a store
//!
//! - **`RecordId`**: Non-empty identifier of a knowledge-base node
//! - **`Node`**: A knowledge-base record (title, aliases, tags, location)
//! - **`Location`**: File/row/column a node points at, used for previews

use super::error::StoreError;
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Identifier of a record in the store
///
/// Guaranteed non-empty when constructed through [`RecordId::new`] or
/// deserialized with serde.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Encode, Decode, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// # Errors
    ///
    /// Returns `StoreError::InvalidId` if `id` is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, StoreError> {
        let id = id.into();
        if id.is_empty() {
            return Err(StoreError::InvalidId(id));
        }
        Ok(Self(id))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RecordId {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for RecordId {
    type Error = StoreError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Position inside a file a node refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: PathBuf,
    /// 1-based line number
    pub row: usize,
    /// 1-based column
    pub col: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.row, self.col)
    }
}

/// A knowledge-base node
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct Node {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// File the node lives in, if any
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// 1-based line of the node heading inside `file`
    #[serde(default = "one")]
    pub row: usize,
    #[serde(default = "one")]
    pub col: usize,
}

const fn one() -> usize {
    1
}

impl Node {
    /// Create a node without aliases, tags or location
    #[must_use]
    pub fn new(id: RecordId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            aliases: Vec::new(),
            tags: Vec::new(),
            file: None,
            row: 1,
            col: 1,
        }
    }

    #[must_use]
    pub fn with_aliases(mut self, aliases: Vec<String>) -> Self {
        self.aliases = aliases;
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    #[must_use]
    pub fn with_location(mut self, file: impl Into<PathBuf>, row: usize, col: usize) -> Self {
        self.file = Some(file.into());
        self.row = row.max(1);
        self.col = col.max(1);
        self
    }

    /// Location of the node, if it is backed by a file
    ///
    /// Row and column are one-based; a stored zero reads as one.
    #[must_use]
    pub fn location(&self) -> Option<Location> {
        self.file.as_ref().map(|file| Location {
            file: file.clone(),
            row: self.row.max(1),
            col: self.col.max(1),
        })
    }
}
