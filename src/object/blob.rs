use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::repo::Repo;
use crate::types::Blob;

use super::{load_object, object_path, store_object};

/// write a blob to the object store
///
/// returns the blob hash. tombstones have an address but no stored object.
pub fn write_blob(repo: &Repo, blob: &Blob) -> Result<Hash> {
    let hash = blob.hash();
    if blob.is_tombstone() {
        return Ok(hash);
    }

    let path = blob_path(repo, &hash);
    if store_object(repo, &path, blob)? {
        tracing::debug!(blob = %hash.short(12), name = %blob.name, size = blob.bytes().len(), "wrote blob");
    }
    Ok(hash)
}

/// read a blob from the object store
pub fn read_blob(repo: &Repo, hash: &Hash) -> Result<Blob> {
    let path = blob_path(repo, hash);
    let blob: Blob = load_object(&path, hash)?;

    // verify hash
    if blob.is_tombstone() || blob.hash() != *hash {
        return Err(Error::CorruptObject(*hash));
    }

    Ok(blob)
}

/// get the filesystem path to a blob
pub fn blob_path(repo: &Repo, hash: &Hash) -> PathBuf {
    object_path(repo.blobs_path(), hash)
}

/// check if a blob exists in the object store
pub fn blob_exists(repo: &Repo, hash: &Hash) -> bool {
    blob_path(repo, hash).exists()
}
