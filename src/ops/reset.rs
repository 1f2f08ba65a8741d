use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::object::read_commit;
use crate::repo::Repo;
use crate::types::{State, DEFAULT_BRANCH};

use super::checkout::{check_untracked, replace_tree, UntrackedPolicy};
use super::head_commit;
use super::log::first_parent_chain;

/// move the working tree and a branch head to the commit `commit_id`
///
/// the moved branch is the current one if its history holds the target,
/// otherwise the branch whose history does (`master` first, then by name),
/// otherwise the current one. returns the target hash.
pub fn reset(repo: &Repo, state: &mut State, commit_id: &str) -> Result<Hash> {
    let target_hash = state.resolve_commit(commit_id)?;
    let target = read_commit(repo, &target_hash)?;
    let current = head_commit(repo, state)?;

    check_untracked(repo, &current, &target, UntrackedPolicy::Refuse)?;

    let chosen = choose_branch(state, &target_hash)?;
    let rebuilt = if state.branch(&chosen).is_some_and(|b| b.contains(&target_hash)) {
        None
    } else {
        Some(first_parent_chain(repo, target_hash)?)
    };

    replace_tree(repo, &current, &target)?;

    let branch = state
        .branches
        .get_mut(&chosen)
        .ok_or_else(|| Error::CorruptState(format!("branch '{}' vanished", chosen)))?;
    match rebuilt {
        None => {
            branch.rewind_to(&target_hash);
        }
        Some(history) => branch.repoint(target_hash, history),
    }
    state.current = chosen;
    state.clear_staging();

    tracing::info!(branch = %state.current, head = %target_hash.short(12), "reset branch");
    Ok(target_hash)
}

/// name of the branch a reset to `target` should move
fn choose_branch(state: &State, target: &Hash) -> Result<String> {
    if state.current_branch()?.contains(target) {
        return Ok(state.current.clone());
    }

    let holder = state
        .branches
        .get(DEFAULT_BRANCH)
        .filter(|b| b.contains(target))
        .or_else(|| state.branches.values().find(|b| b.contains(target)));

    Ok(holder
        .map(|b| b.name.clone())
        .unwrap_or_else(|| state.current.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::tests::setup;
    use crate::ops::{add, branch, checkout_branch, commit, remove_branch};
    use crate::workspace::{file_exists, read_file, write_file};

    #[test]
    fn test_reset_rewinds_current() {
        let (_dir, repo, mut state) = setup();
        let root = state.head().unwrap();

        write_file(&repo, "a.txt", b"v1").unwrap();
        add(&repo, &mut state, "a.txt").unwrap();
        let one = commit(&repo, &mut state, "one").unwrap();

        write_file(&repo, "a.txt", b"v2").unwrap();
        write_file(&repo, "b.txt", b"b").unwrap();
        add(&repo, &mut state, "a.txt").unwrap();
        add(&repo, &mut state, "b.txt").unwrap();
        commit(&repo, &mut state, "two").unwrap();

        reset(&repo, &mut state, &one.to_hex()[..6]).unwrap();

        assert_eq!(state.head().unwrap(), one);
        assert_eq!(state.current_branch().unwrap().history, vec![root, one]);
        assert_eq!(read_file(&repo, "a.txt").unwrap(), b"v1");
        assert!(!file_exists(&repo, "b.txt"));
        assert!(!state.has_staged_changes());
    }

    #[test]
    fn test_reset_switches_to_holding_branch() {
        let (_dir, repo, mut state) = setup();
        branch(&mut state, "dev").unwrap();
        checkout_branch(&repo, &mut state, "dev").unwrap();

        write_file(&repo, "d.txt", b"d").unwrap();
        add(&repo, &mut state, "d.txt").unwrap();
        let dev_one = commit(&repo, &mut state, "dev one").unwrap();
        write_file(&repo, "d.txt", b"d2").unwrap();
        add(&repo, &mut state, "d.txt").unwrap();
        commit(&repo, &mut state, "dev two").unwrap();

        checkout_branch(&repo, &mut state, "master").unwrap();
        reset(&repo, &mut state, &dev_one.to_hex()).unwrap();

        assert_eq!(state.current, "dev");
        assert_eq!(state.branches["dev"].head, dev_one);
        assert_eq!(read_file(&repo, "d.txt").unwrap(), b"d");
    }

    #[test]
    fn test_reset_to_orphan_repoints_current() {
        let (_dir, repo, mut state) = setup();
        let root = state.head().unwrap();
        branch(&mut state, "gone").unwrap();
        checkout_branch(&repo, &mut state, "gone").unwrap();

        write_file(&repo, "g.txt", b"g").unwrap();
        add(&repo, &mut state, "g.txt").unwrap();
        let orphan = commit(&repo, &mut state, "orphan").unwrap();

        checkout_branch(&repo, &mut state, "master").unwrap();
        remove_branch(&mut state, "gone").unwrap();

        reset(&repo, &mut state, &orphan.to_hex()).unwrap();
        assert_eq!(state.current, "master");
        assert_eq!(state.head().unwrap(), orphan);
        assert_eq!(state.current_branch().unwrap().history, vec![root, orphan]);
    }

    #[test]
    fn test_reset_untracked_in_the_way() {
        let (_dir, repo, mut state) = setup();
        write_file(&repo, "a.txt", b"a").unwrap();
        add(&repo, &mut state, "a.txt").unwrap();
        let one = commit(&repo, &mut state, "one").unwrap();

        crate::ops::remove(&repo, &mut state, "a.txt").unwrap();
        commit(&repo, &mut state, "two").unwrap();

        // same bytes still count as in the way
        write_file(&repo, "a.txt", b"a").unwrap();
        let head = state.head().unwrap();
        let result = reset(&repo, &mut state, &one.to_hex());
        assert!(matches!(result, Err(Error::UntrackedFileInTheWay(_))));
        assert_eq!(state.head().unwrap(), head);
    }

    #[test]
    fn test_reset_unknown_commit() {
        let (_dir, repo, mut state) = setup();
        let missing = crate::hash::compute_blob_hash(b"x").to_hex();
        assert!(matches!(
            reset(&repo, &mut state, &missing),
            Err(Error::CommitNotFound(_))
        ));
    }
}
