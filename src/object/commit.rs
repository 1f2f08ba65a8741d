use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::repo::Repo;
use crate::types::Commit;

use super::{load_object, object_path, store_object};

/// write a commit to the object store
///
/// commits are serialized as CBOR, then zstd compressed.
/// the hash is computed over the canonical (uncompressed) encoding.
pub fn write_commit(repo: &Repo, commit: &Commit) -> Result<Hash> {
    let hash = commit.hash()?;
    let path = commit_path(repo, &hash);

    if store_object(repo, &path, commit)? {
        tracing::debug!(commit = %hash.short(12), "wrote commit");
    }
    Ok(hash)
}

/// read a commit from the object store
pub fn read_commit(repo: &Repo, hash: &Hash) -> Result<Commit> {
    let path = commit_path(repo, hash);
    let commit: Commit = load_object(&path, hash)?;

    // verify hash
    if commit.hash()? != *hash {
        return Err(Error::CorruptObject(*hash));
    }

    Ok(commit)
}

/// get the filesystem path to a commit object
pub fn commit_path(repo: &Repo, hash: &Hash) -> PathBuf {
    object_path(repo.commits_path(), hash)
}

/// check if a commit exists in the object store
pub fn commit_exists(repo: &Repo, hash: &Hash) -> bool {
    commit_path(repo, hash).exists()
}
