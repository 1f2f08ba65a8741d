pub mod blob;
pub mod commit;

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use walkdir::WalkDir;

use crate::error::{Error, IoResultExt, Result};
use crate::hash::{normalize_prefix, Hash, HEX_LEN};
use crate::repo::Repo;
use crate::types::{Blob, Commit};

pub use blob::{blob_exists, blob_path, read_blob, write_blob};
pub use commit::{commit_exists, commit_path, read_commit, write_commit};

/// zstd level for stored objects
const COMPRESSION_LEVEL: i32 = 3;

/// any object held by the store
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Object {
    Blob(Blob),
    Commit(Commit),
}

impl Object {
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Blob(_) => "blob",
            Object::Commit(_) => "commit",
        }
    }
}

/// read an object of either kind
pub fn read_object(repo: &Repo, hash: &Hash) -> Result<Object> {
    if commit_exists(repo, hash) {
        return read_commit(repo, hash).map(Object::Commit);
    }
    read_blob(repo, hash).map(Object::Blob)
}

/// resolve a full id or unique prefix against every stored object
pub fn resolve_object(repo: &Repo, prefix: &str) -> Result<Hash> {
    let prefix = normalize_prefix(prefix)?;

    let mut matches = Vec::new();
    for dir in [repo.blobs_path(), repo.commits_path()] {
        collect_matching(&dir, &prefix, &mut matches)?;
    }

    match matches.len() {
        0 => match Hash::from_hex(&prefix) {
            Ok(hash) => Err(Error::ObjectNotFound(hash)),
            Err(_) => Err(Error::CommitNotFound(prefix)),
        },
        1 => Ok(matches[0]),
        count => Err(Error::AmbiguousPrefix { prefix, count }),
    }
}

/// collect stored hashes under `dir` whose hex starts with `prefix`
fn collect_matching(dir: &Path, prefix: &str, matches: &mut Vec<Hash>) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }

    // objects live at <dir>/<2 hex>/<62 hex>
    for entry in WalkDir::new(dir).min_depth(2).max_depth(2) {
        let entry = entry.map_err(|e| Error::Io {
            path: dir.to_path_buf(),
            source: e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "walkdir error")),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let fan = entry
            .path()
            .parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let rest = entry.file_name().to_string_lossy();
        let hex = format!("{}{}", fan, rest);

        if hex.len() != HEX_LEN || !hex.starts_with(prefix) {
            continue;
        }
        if let Ok(hash) = Hash::from_hex(&hex) {
            matches.push(hash);
        }
    }
    Ok(())
}

/// filesystem path of an object under `dir`
fn object_path(dir: PathBuf, hash: &Hash) -> PathBuf {
    let (fan, file) = hash.to_path_components();
    dir.join(fan).join(file)
}

/// serialize `value` as CBOR, compress, and write it once at `path`
///
/// returns false when the object was already present (dedup).
fn store_object<T: Serialize>(repo: &Repo, path: &Path, value: &T) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    let mut cbor_bytes = Vec::new();
    ciborium::into_writer(value, &mut cbor_bytes)?;

    let compressed =
        zstd::encode_all(&cbor_bytes[..], COMPRESSION_LEVEL).map_err(|e| Error::Io {
            path: PathBuf::from("<zstd>"),
            source: e,
        })?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_path(parent)?;
    }
    repo.write_atomic(path, &compressed)?;
    Ok(true)
}

/// read, decompress and decode the object at `path`
fn load_object<T: DeserializeOwned>(path: &Path, hash: &Hash) -> Result<T> {
    let compressed = fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::ObjectNotFound(*hash)
        } else {
            Error::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let cbor_bytes = zstd::decode_all(&compressed[..]).map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let value: T = ciborium::from_reader(&cbor_bytes[..])?;
    Ok(value)
}
