//! Result model
//!
//! Every file reported by a command is mapped to a ResultItem before
//! rendering.

use serde::{Deserialize, Serialize};

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// A file found in history
    File,
    /// An entry dropped from the tracked-files history
    Removed,
}

/// Metadata for a result item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Modification time in milliseconds since epoch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtime_ms: Option<i64>,

    /// File size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// A single reported path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem {
    pub kind: Kind,

    /// Absolute path
    pub path: String,

    /// Position in the result stream, starting at 1 (most recent first)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,

    #[serde(default)]
    pub meta: Meta,
}

impl ResultItem {
    /// Create a found file result
    pub fn file(path: impl Into<String>, rank: usize) -> Self {
        Self {
            kind: Kind::File,
            path: path.into(),
            rank: Some(rank),
            meta: Meta::default(),
        }
    }

    /// Create a removed entry result
    pub fn removed(path: impl Into<String>) -> Self {
        Self {
            kind: Kind::Removed,
            path: path.into(),
            rank: None,
            meta: Meta::default(),
        }
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }
}

/// An ordered collection of result items
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
