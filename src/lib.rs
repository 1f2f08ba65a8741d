//! twig - a small local version-control engine
//!
//! snapshots the plain files of one working directory into a content-addressed
//! store, keeps branches of those snapshots, and reconciles diverged branches
//! with a three-way merge.
//!
//! # Core concepts
//!
//! - **Blob**: one file's bytes (CBOR + zstd), addressed by its content
//! - **Commit**: the full tracked file set plus message, timestamp and parents (CBOR + zstd)
//! - **Branch**: a named pointer to a commit with its first-parent history
//! - **State**: branches, staging area and commit index, rewritten after every operation
//!
//! # Hash format
//!
//! blob hash = SHA256("blob" | content_len | content)
//!
//! commit hash = SHA256("commit" | cbor_len | cbor(commit))
//!
//! # Example usage
//!
//! ```no_run
//! use twig::ops;
//! use std::path::Path;
//!
//! let (repo, mut state) = ops::init(Path::new("/path/to/project")).unwrap();
//!
//! ops::add(&repo, &mut state, "notes.txt").unwrap();
//! ops::commit(&repo, &mut state, "add notes").unwrap();
//! repo.save_state(&state).unwrap();
//! ```

mod config;
mod error;
mod hash;
mod object;
mod repo;

pub mod ops;
pub mod types;
pub mod workspace;

pub use config::{Config, LogConfig, Remote};
pub use error::{Error, ErrorKind, Result};
pub use hash::{compute_blob_hash, compute_commit_hash, compute_tombstone_hash, Hash};
pub use object::{
    blob_exists, commit_exists, read_blob, read_commit, read_object, resolve_object, write_blob,
    write_commit, Object,
};
pub use repo::{Repo, META_DIR};
pub use types::{Blob, Branch, Commit, SplitPoint, State};
