use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::object::{read_blob, read_commit};
use crate::repo::Repo;
use crate::types::{Commit, State};
use crate::workspace::{blob_from_file, file_exists, remove_file, validate_file_name, write_file};

use super::head_commit;

/// how to treat an untracked working file that a target commit would overwrite
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum UntrackedPolicy {
    /// any such file is an error
    Refuse,
    /// only an error when its content differs from the target's version
    AllowIdentical,
}

/// restore `name` from the head commit
pub fn checkout_file(repo: &Repo, state: &State, name: &str) -> Result<()> {
    restore_file(repo, &state.head()?, name)
}

/// restore `name` from the commit `commit_id` (full id or unique prefix)
pub fn checkout_file_at(repo: &Repo, state: &State, commit_id: &str, name: &str) -> Result<()> {
    let hash = state.resolve_commit(commit_id)?;
    restore_file(repo, &hash, name)
}

fn restore_file(repo: &Repo, commit_hash: &Hash, name: &str) -> Result<()> {
    validate_file_name(name)?;

    let commit = read_commit(repo, commit_hash)?;
    let blob_hash = commit
        .file(name)
        .ok_or_else(|| Error::FileNotInCommit(name.to_string()))?;
    let blob = read_blob(repo, blob_hash)?;
    write_file(repo, name, blob.bytes())?;

    tracing::debug!(file = name, commit = %commit_hash.short(12), "restored file");
    Ok(())
}

/// switch the working tree and current branch to `name`
pub fn checkout_branch(repo: &Repo, state: &mut State, name: &str) -> Result<()> {
    let target_head = state
        .branch(name)
        .map(|b| b.head)
        .ok_or_else(|| Error::NoSuchBranch(name.to_string()))?;
    if state.current == name {
        return Err(Error::CheckoutCurrentBranch);
    }

    let current = head_commit(repo, state)?;
    let target = read_commit(repo, &target_head)?;

    check_untracked(repo, &current, &target, UntrackedPolicy::AllowIdentical)?;
    replace_tree(repo, &current, &target)?;

    state.current = name.to_string();
    state.clear_staging();

    tracing::info!(branch = name, head = %target_head.short(12), "switched branch");
    Ok(())
}

/// fail if writing `target` would clobber a file `current` does not track
pub(crate) fn check_untracked(
    repo: &Repo,
    current: &Commit,
    target: &Commit,
    policy: UntrackedPolicy,
) -> Result<()> {
    for (name, hash) in &target.files {
        if current.tracks(name) || !file_exists(repo, name) {
            continue;
        }
        let in_the_way = match policy {
            UntrackedPolicy::Refuse => true,
            UntrackedPolicy::AllowIdentical => blob_from_file(repo, name)?.hash() != *hash,
        };
        if in_the_way {
            return Err(Error::UntrackedFileInTheWay(name.clone()));
        }
    }
    Ok(())
}

/// make the working tree match `target`, given that it currently reflects `current`
///
/// files only `current` tracks are deleted; untracked files are left alone.
pub(crate) fn replace_tree(repo: &Repo, current: &Commit, target: &Commit) -> Result<()> {
    for name in current.files.keys() {
        if !target.tracks(name) {
            remove_file(repo, name)?;
        }
    }
    for (name, hash) in &target.files {
        let blob = read_blob(repo, hash)?;
        write_file(repo, name, blob.bytes())?;
    }
    Ok(())
}
