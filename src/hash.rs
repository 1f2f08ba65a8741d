use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::Error;

/// length of a full hex-encoded address
pub const HEX_LEN: usize = 64;

/// SHA-256 hash used for content addressing
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash([u8; 32]);

impl Hash {
    /// zero hash (useful as sentinel)
    pub const ZERO: Hash = Hash([0u8; 32]);

    /// create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// parse from hex string
    pub fn from_hex(s: &str) -> crate::Result<Self> {
        let bytes = hex::decode(s).map_err(|_| Error::InvalidHashHex(s.to_string()))?;
        if bytes.len() != 32 {
            return Err(Error::InvalidHashHex(s.to_string()));
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// get raw bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// convert to hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// first `len` hex chars, for display
    pub fn short(&self, len: usize) -> String {
        let hex = self.to_hex();
        hex[..len.min(HEX_LEN)].to_string()
    }

    /// does the hex form start with an already-normalized prefix
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        self.to_hex().starts_with(prefix)
    }

    /// split into path components for object store
    /// returns (first 2 hex chars, remaining 62 hex chars)
    pub fn to_path_components(&self) -> (String, String) {
        let hex = self.to_hex();
        (hex[..2].to_string(), hex[2..].to_string())
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", &self.to_hex()[..12])
    }
}

impl Serialize for Hash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// normalize a user-supplied id prefix
///
/// accepts 1..=64 hex chars in either case and returns the lowercase form.
pub fn normalize_prefix(prefix: &str) -> crate::Result<String> {
    if prefix.is_empty()
        || prefix.len() > HEX_LEN
        || !prefix.chars().all(|c| c.is_ascii_hexdigit())
    {
        return Err(Error::InvalidHashPrefix(prefix.to_string()));
    }
    Ok(prefix.to_ascii_lowercase())
}

/// compute blob hash over the file content only
///
/// format:
///   tag: b"blob"
///   content_len: 8 bytes LE
///   content: bytes
pub fn compute_blob_hash(content: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(b"blob");
    hasher.update((content.len() as u64).to_le_bytes());
    hasher.update(content);
    Hash(hasher.finalize().into())
}

/// compute hash of a tombstone (a file staged for removal with no bytes on disk)
///
/// format:
///   tag: b"tombstone"
///   name_len: 8 bytes LE
///   name: utf-8 bytes
pub fn compute_tombstone_hash(name: &str) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(b"tombstone");
    hasher.update((name.len() as u64).to_le_bytes());
    hasher.update(name.as_bytes());
    Hash(hasher.finalize().into())
}

/// compute commit hash over its canonical (CBOR) encoding
pub fn compute_commit_hash(canonical: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(b"commit");
    hasher.update((canonical.len() as u64).to_le_bytes());
    hasher.update(canonical);
    Hash(hasher.finalize().into())
}
