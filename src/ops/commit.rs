use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::object::write_commit;
use crate::repo::Repo;
use crate::types::{Commit, State};

use super::head_commit;

/// record the staged changes as a new commit on the current branch
pub fn commit(repo: &Repo, state: &mut State, message: &str) -> Result<Hash> {
    commit_with_parents(repo, state, message, None, false)
}

/// form a commit from the head's files plus staged changes
///
/// `second_parent` is set by merge. nothing in `state` changes unless the
/// commit is written successfully.
pub(crate) fn commit_with_parents(
    repo: &Repo,
    state: &mut State,
    message: &str,
    second_parent: Option<Hash>,
    allow_empty: bool,
) -> Result<Hash> {
    if message.is_empty() {
        return Err(Error::EmptyMessage);
    }
    if !allow_empty && !state.has_staged_changes() {
        return Err(Error::NothingToCommit);
    }

    let head = state.head()?;
    let mut files = head_commit(repo, state)?.files;
    for name in state.removed.keys() {
        files.remove(name);
    }
    for (name, blob) in &state.staged {
        files.insert(name.clone(), *blob);
    }

    let mut parents = vec![head];
    parents.extend(second_parent);

    let commit = Commit::new(message, parents, files)?;
    let hash = write_commit(repo, &commit)?;

    state.current_branch_mut()?.advance(hash);
    state.record_commit(hash, message);
    state.clear_staging();

    tracing::info!(
        commit = %hash.short(12),
        branch = %state.current,
        files = commit.files.len(),
        "created commit"
    );
    Ok(hash)
}
