use serde::{Deserialize, Serialize};

use crate::hash::{compute_blob_hash, compute_tombstone_hash, Hash};

/// immutable snapshot of one file
///
/// identity is the content; `name` only records which file the blob was
/// first created from. a tombstone has no content and stands for a file that
/// is being removed without its bytes being available.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    /// filename at creation time (informational)
    pub name: String,
    /// file bytes, `None` for a tombstone
    pub content: Option<Vec<u8>>,
}

impl Blob {
    /// blob holding file bytes
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: Some(content.into()),
        }
    }

    /// tombstone for a file that no longer exists on disk
    pub fn tombstone(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: None,
        }
    }

    /// content address
    pub fn hash(&self) -> Hash {
        match &self.content {
            Some(content) => compute_blob_hash(content),
            None => compute_tombstone_hash(&self.name),
        }
    }

    pub fn is_tombstone(&self) -> bool {
        self.content.is_none()
    }

    /// file bytes (empty for a tombstone)
    pub fn bytes(&self) -> &[u8] {
        self.content.as_deref().unwrap_or(&[])
    }
}
