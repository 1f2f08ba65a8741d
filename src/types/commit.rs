use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::hash::{compute_commit_hash, Hash};

/// message of the root commit created by `init`
pub const ROOT_MESSAGE: &str = "initial commit";

/// a snapshot of the tracked file set
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// commit message (never empty)
    pub message: String,
    /// unix timestamp (seconds since epoch)
    pub timestamp: i64,
    /// parent commit hashes (empty for root, 1 for linear, 2 for merge)
    pub parents: Vec<Hash>,
    /// tracked filename -> blob hash (BTreeMap for deterministic serialization)
    #[serde(default)]
    pub files: BTreeMap<String, Hash>,
}

impl Commit {
    /// create a new commit stamped with the current time
    pub fn new(
        message: impl Into<String>,
        parents: Vec<Hash>,
        files: BTreeMap<String, Hash>,
    ) -> Result<Self> {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        Self::with_timestamp(message, timestamp, parents, files)
    }

    /// create a new commit with explicit timestamp
    pub fn with_timestamp(
        message: impl Into<String>,
        timestamp: i64,
        parents: Vec<Hash>,
        files: BTreeMap<String, Hash>,
    ) -> Result<Self> {
        let message = message.into();
        if message.is_empty() {
            return Err(Error::EmptyMessage);
        }
        Ok(Self {
            message,
            timestamp,
            parents,
            files,
        })
    }

    /// the root commit: fixed message, epoch timestamp, no files, no parents
    pub fn root() -> Self {
        Self {
            message: ROOT_MESSAGE.to_string(),
            timestamp: 0,
            parents: vec![],
            files: BTreeMap::new(),
        }
    }

    /// canonical encoding the address is derived from
    pub fn canonical_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        ciborium::into_writer(self, &mut bytes)?;
        Ok(bytes)
    }

    /// content address of this commit
    pub fn hash(&self) -> Result<Hash> {
        Ok(compute_commit_hash(&self.canonical_bytes()?))
    }

    /// blob tracked under `name`, if any
    pub fn file(&self, name: &str) -> Option<&Hash> {
        self.files.get(name)
    }

    /// is `name` tracked by this commit
    pub fn tracks(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    /// first parent (the branch this commit was made on)
    pub fn first_parent(&self) -> Option<&Hash> {
        self.parents.first()
    }

    /// is this the root commit (no parents)
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// is this a merge commit (two parents)
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}
