use crate::error::Result;
use crate::object::write_blob;
use crate::repo::Repo;
use crate::types::State;
use crate::workspace::{blob_from_file, validate_file_name};

use super::head_commit;

/// stage the working copy of `name` for the next commit
///
/// a file identical to the head's version is not staged, and any pending
/// change for it is dropped.
pub fn add(repo: &Repo, state: &mut State, name: &str) -> Result<()> {
    validate_file_name(name)?;

    let blob = blob_from_file(repo, name)?;
    let hash = blob.hash();

    let head = head_commit(repo, state)?;
    if head.file(name) == Some(&hash) {
        state.unstage(name);
        tracing::debug!(file = name, "unchanged from head, cleared staging");
        return Ok(());
    }

    write_blob(repo, &blob)?;
    state.stage_addition(name, hash);
    tracing::debug!(file = name, blob = %hash.short(12), "staged for addition");
    Ok(())
}
