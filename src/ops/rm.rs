use crate::error::{Error, Result};
use crate::object::write_blob;
use crate::repo::Repo;
use crate::types::{Blob, State};
use crate::workspace::{blob_from_file, file_exists, remove_file, validate_file_name};

use super::head_commit;

/// unstage `name`, and stage it for removal if the head tracks it
///
/// the working copy is deleted. a tracked file already gone from disk is
/// recorded with a tombstone.
pub fn remove(repo: &Repo, state: &mut State, name: &str) -> Result<()> {
    validate_file_name(name)?;

    let head = head_commit(repo, state)?;
    let staged = state.staged.contains_key(name);
    let tracked = head.tracks(name);

    if !staged && !tracked {
        return Err(Error::NoReasonToRemove(name.to_string()));
    }

    if tracked {
        let blob = if file_exists(repo, name) {
            blob_from_file(repo, name)?
        } else {
            Blob::tombstone(name)
        };
        let hash = write_blob(repo, &blob)?;
        state.stage_removal(name, hash);
        tracing::debug!(file = name, tombstone = blob.is_tombstone(), "staged for removal");
    } else {
        state.unstage(name);
        tracing::debug!(file = name, "unstaged addition");
    }

    remove_file(repo, name)?;
    Ok(())
}
