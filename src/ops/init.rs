use std::path::Path;

use crate::error::Result;
use crate::object::write_commit;
use crate::repo::Repo;
use crate::types::{Commit, State, ROOT_MESSAGE};

/// create a repository in `work_tree` with a root commit on `master`
///
/// the initial state is persisted before returning.
pub fn init(work_tree: &Path) -> Result<(Repo, State)> {
    let repo = Repo::init(work_tree)?;

    let root = Commit::root();
    let root_hash = write_commit(&repo, &root)?;

    let state = State::new(root_hash, ROOT_MESSAGE);
    repo.save_state(&state)?;

    tracing::info!(root = %root_hash.short(12), path = %work_tree.display(), "initialized repository");
    Ok((repo, state))
}
