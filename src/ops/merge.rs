use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::object::{read_blob, read_commit};
use crate::repo::Repo;
use crate::types::State;
use crate::workspace::write_file;

use super::add::add;
use super::checkout::{check_untracked, replace_tree, UntrackedPolicy};
use super::commit::commit_with_parents;
use super::merge_base::merge_base;
use super::rm::remove;

const CONFLICT_START: &[u8] = b"<<<<<<< HEAD\n";
const CONFLICT_SEPARATOR: &[u8] = b"=======\n";
const CONFLICT_END: &[u8] = b">>>>>>>\n";

/// what a three-way merge does with one file
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// leave the current version (or absence) in place
    Keep,
    /// check out and stage the given branch's blob
    TakeGiven(Hash),
    /// delete and stage the removal
    Remove,
    /// both sides changed the file differently
    Conflict,
}

/// classify one file from its blob at the merge base, current head and given head
pub fn classify(split: Option<&Hash>, current: Option<&Hash>, given: Option<&Hash>) -> Resolution {
    if current == given {
        return Resolution::Keep;
    }
    match (split, current, given) {
        (Some(s), Some(c), Some(g)) => {
            if c == s {
                Resolution::TakeGiven(*g)
            } else if g == s {
                Resolution::Keep
            } else {
                Resolution::Conflict
            }
        }
        (None, Some(_), Some(_)) => Resolution::Conflict,
        (None, Some(_), None) => Resolution::Keep,
        (None, None, Some(g)) => Resolution::TakeGiven(*g),
        (Some(s), None, Some(g)) => {
            if g == s {
                Resolution::Keep
            } else {
                Resolution::Conflict
            }
        }
        (Some(s), Some(c), None) => {
            if c == s {
                Resolution::Remove
            } else {
                Resolution::Conflict
            }
        }
        // current == given covers the remaining (_, None, None) case
        (_, None, None) => Resolution::Keep,
    }
}

/// result of a merge that did not fail
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MergeOutcome {
    /// the given head is already an ancestor of the current head
    AlreadyMerged,
    /// the current branch moved forward to this commit
    FastForward(Hash),
    /// a merge commit was made; `conflicts` lists files written with markers
    Merged { commit: Hash, conflicts: Vec<String> },
}

/// merge branch `given` into the current branch
pub fn merge(repo: &Repo, state: &mut State, given: &str) -> Result<MergeOutcome> {
    if state.has_staged_changes() {
        return Err(Error::UncommittedChanges);
    }
    let given_branch = state
        .branch(given)
        .cloned()
        .ok_or_else(|| Error::BranchNotFound(given.to_string()))?;
    if given == state.current {
        return Err(Error::MergeWithSelf);
    }

    let current_head = state.head()?;
    let given_head = given_branch.head;
    let base = merge_base(repo, current_head, given_head)?;
    log_split_point(state, given, base);

    if base == given_head {
        tracing::info!(given, "given branch is an ancestor of the current branch");
        return Ok(MergeOutcome::AlreadyMerged);
    }

    let current_commit = read_commit(repo, &current_head)?;
    let given_commit = read_commit(repo, &given_head)?;
    check_untracked(repo, &current_commit, &given_commit, UntrackedPolicy::Refuse)?;

    if base == current_head {
        replace_tree(repo, &current_commit, &given_commit)?;
        state
            .current_branch_mut()?
            .repoint(given_head, given_branch.history.clone());
        state.clear_staging();
        tracing::info!(branch = %state.current, head = %given_head.short(12), "fast-forwarded");
        return Ok(MergeOutcome::FastForward(given_head));
    }

    let split_commit = read_commit(repo, &base)?;
    let names: BTreeSet<&String> = current_commit
        .files
        .keys()
        .chain(given_commit.files.keys())
        .collect();

    let mut conflicts = Vec::new();
    for name in names {
        let split = split_commit.file(name);
        let current = current_commit.file(name);
        let other = given_commit.file(name);

        let resolution = classify(split, current, other);
        tracing::debug!(file = %name, ?resolution, "classified");

        match resolution {
            Resolution::Keep => {}
            Resolution::TakeGiven(hash) => {
                let blob = read_blob(repo, &hash)?;
                write_file(repo, name, blob.bytes())?;
                add(repo, state, name)?;
            }
            Resolution::Remove => remove(repo, state, name)?,
            Resolution::Conflict => {
                let content = conflict_content(&side_bytes(repo, current)?, &side_bytes(repo, other)?);
                write_file(repo, name, &content)?;
                add(repo, state, name)?;
                tracing::warn!(file = %name, "merge conflict");
                conflicts.push(name.clone());
            }
        }
    }

    let message = format!("Merged {} into {}.", given, state.current);
    let commit = commit_with_parents(repo, state, &message, Some(given_head), true)?;

    tracing::info!(
        commit = %commit.short(12),
        base = %base.short(12),
        conflicts = conflicts.len(),
        "merged {} into {}",
        given,
        state.current
    );
    Ok(MergeOutcome::Merged { commit, conflicts })
}

/// bytes of one side of a conflict; an absent file contributes nothing
fn side_bytes(repo: &Repo, blob: Option<&Hash>) -> Result<Vec<u8>> {
    match blob {
        Some(hash) => Ok(read_blob(repo, hash)?.content.unwrap_or_default()),
        None => Ok(Vec::new()),
    }
}

/// file body holding both versions between conflict markers
pub fn conflict_content(current: &[u8], given: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(
        CONFLICT_START.len() + current.len() + CONFLICT_SEPARATOR.len() + given.len() + CONFLICT_END.len(),
    );
    out.extend_from_slice(CONFLICT_START);
    out.extend_from_slice(current);
    out.extend_from_slice(CONFLICT_SEPARATOR);
    out.extend_from_slice(given);
    out.extend_from_slice(CONFLICT_END);
    out
}

/// compare the graph merge base with the split point recorded at branch creation
fn log_split_point(state: &State, given: &str, base: Hash) {
    let recorded = state
        .split_points
        .iter()
        .rev()
        .find(|sp| sp.between(&state.current, given))
        .map(|sp| sp.commit);

    match recorded {
        Some(commit) if commit != base => tracing::debug!(
            recorded = %commit.short(12),
            base = %base.short(12),
            "merge base differs from recorded split point"
        ),
        Some(_) => tracing::debug!(base = %base.short(12), "merge base matches recorded split point"),
        None => tracing::debug!(base = %base.short(12), "no recorded split point"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::tests::setup;
    use crate::ops::{branch, checkout_branch, commit, log};
    use crate::types::DEFAULT_BRANCH;
    use crate::workspace::{file_exists, read_file};

    fn h(n: u8) -> Hash {
        Hash::from_bytes([n; 32])
    }

    fn commit_file(repo: &Repo, state: &mut State, name: &str, content: &[u8], msg: &str) -> Hash {
        write_file(repo, name, content).unwrap();
        add(repo, state, name).unwrap();
        commit(repo, state, msg).unwrap()
    }

    #[test]
    fn test_classify_table() {
        let (s, x, y) = (h(1), h(2), h(3));
        use Resolution::*;

        // unchanged everywhere
        assert_eq!(classify(Some(&s), Some(&s), Some(&s)), Keep);
        // changed only in given
        assert_eq!(classify(Some(&s), Some(&s), Some(&y)), TakeGiven(y));
        // changed only in current
        assert_eq!(classify(Some(&s), Some(&x), Some(&s)), Keep);
        // changed identically
        assert_eq!(classify(Some(&s), Some(&x), Some(&x)), Keep);
        // changed differently
        assert_eq!(classify(Some(&s), Some(&x), Some(&y)), Conflict);
        // added identically / differently / on one side
        assert_eq!(classify(None, Some(&x), Some(&x)), Keep);
        assert_eq!(classify(None, Some(&x), Some(&y)), Conflict);
        assert_eq!(classify(None, Some(&x), None), Keep);
        assert_eq!(classify(None, None, Some(&y)), TakeGiven(y));
        // deleted in current
        assert_eq!(classify(Some(&s), None, Some(&s)), Keep);
        assert_eq!(classify(Some(&s), None, Some(&y)), Conflict);
        // deleted in given
        assert_eq!(classify(Some(&s), Some(&s), None), Remove);
        assert_eq!(classify(Some(&s), Some(&x), None), Conflict);
        // deleted in both
        assert_eq!(classify(Some(&s), None, None), Keep);
    }

    #[test]
    fn test_merge_preconditions() {
        let (_dir, repo, mut state) = setup();
        branch(&mut state, "dev").unwrap();

        assert!(matches!(
            merge(&repo, &mut state, "nope"),
            Err(Error::BranchNotFound(_))
        ));
        assert!(matches!(
            merge(&repo, &mut state, DEFAULT_BRANCH),
            Err(Error::MergeWithSelf)
        ));

        write_file(&repo, "a.txt", b"a").unwrap();
        add(&repo, &mut state, "a.txt").unwrap();
        assert!(matches!(
            merge(&repo, &mut state, "dev"),
            Err(Error::UncommittedChanges)
        ));
    }

    #[test]
    fn test_merge_ancestor_is_noop() {
        let (_dir, repo, mut state) = setup();
        branch(&mut state, "dev").unwrap();
        let head = commit_file(&repo, &mut state, "a.txt", b"a", "ahead");

        let outcome = merge(&repo, &mut state, "dev").unwrap();
        assert_eq!(outcome, MergeOutcome::AlreadyMerged);
        assert_eq!(state.head().unwrap(), head);
    }

    #[test]
    fn test_merge_fast_forward() {
        let (_dir, repo, mut state) = setup();
        branch(&mut state, "dev").unwrap();
        checkout_branch(&repo, &mut state, "dev").unwrap();
        let dev_head = commit_file(&repo, &mut state, "a.txt", b"a", "dev work");
        checkout_branch(&repo, &mut state, DEFAULT_BRANCH).unwrap();
        let commits_before = state.commits.len();

        let outcome = merge(&repo, &mut state, "dev").unwrap();

        assert_eq!(outcome, MergeOutcome::FastForward(dev_head));
        assert_eq!(state.head().unwrap(), dev_head);
        assert_eq!(state.commits.len(), commits_before);
        assert_eq!(read_file(&repo, "a.txt").unwrap(), b"a");
        assert_eq!(
            state.current_branch().unwrap().history,
            state.branches["dev"].history
        );
    }

    #[test]
    fn test_merge_conflict_scenario() {
        let (_dir, repo, mut state) = setup();
        commit_file(&repo, &mut state, "f.txt", b"1\n2\n3\n", "base");
        branch(&mut state, "other").unwrap();

        let ours = commit_file(&repo, &mut state, "f.txt", b"1\nX\n3\n", "ours");
        checkout_branch(&repo, &mut state, "other").unwrap();
        let theirs = commit_file(&repo, &mut state, "f.txt", b"1\nY\n3\n", "theirs");
        checkout_branch(&repo, &mut state, DEFAULT_BRANCH).unwrap();

        let outcome = merge(&repo, &mut state, "other").unwrap();
        let MergeOutcome::Merged { commit, conflicts } = outcome else {
            panic!("expected a merge commit");
        };
        assert_eq!(conflicts, vec!["f.txt"]);

        let content = read_file(&repo, "f.txt").unwrap();
        assert_eq!(
            content,
            b"<<<<<<< HEAD\n1\nX\n3\n=======\n1\nY\n3\n>>>>>>>\n".to_vec()
        );

        let merged = read_commit(&repo, &commit).unwrap();
        assert_eq!(merged.parents, vec![ours, theirs]);
        assert_eq!(merged.message, "Merged other into master.");
        assert_eq!(merged.files["f.txt"], crate::hash::compute_blob_hash(&content));
        assert!(!state.has_staged_changes());
    }

    #[test]
    fn test_merge_reconciles_each_file() {
        let (_dir, repo, mut state) = setup();
        write_file(&repo, "keep.txt", b"k").unwrap();
        write_file(&repo, "theirs.txt", b"t").unwrap();
        write_file(&repo, "gone.txt", b"g").unwrap();
        for name in ["keep.txt", "theirs.txt", "gone.txt"] {
            add(&repo, &mut state, name).unwrap();
        }
        commit(&repo, &mut state, "base").unwrap();
        branch(&mut state, "other").unwrap();

        commit_file(&repo, &mut state, "keep.txt", b"k-ours", "ours");

        checkout_branch(&repo, &mut state, "other").unwrap();
        write_file(&repo, "theirs.txt", b"t-theirs").unwrap();
        write_file(&repo, "new.txt", b"n").unwrap();
        add(&repo, &mut state, "theirs.txt").unwrap();
        add(&repo, &mut state, "new.txt").unwrap();
        remove(&repo, &mut state, "gone.txt").unwrap();
        commit(&repo, &mut state, "theirs").unwrap();

        checkout_branch(&repo, &mut state, DEFAULT_BRANCH).unwrap();
        let outcome = merge(&repo, &mut state, "other").unwrap();
        let MergeOutcome::Merged { commit, conflicts } = outcome else {
            panic!("expected a merge commit");
        };
        assert!(conflicts.is_empty());

        assert_eq!(read_file(&repo, "keep.txt").unwrap(), b"k-ours");
        assert_eq!(read_file(&repo, "theirs.txt").unwrap(), b"t-theirs");
        assert_eq!(read_file(&repo, "new.txt").unwrap(), b"n");
        assert!(!file_exists(&repo, "gone.txt"));

        let merged = read_commit(&repo, &commit).unwrap();
        let names: Vec<&str> = merged.files.keys().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["keep.txt", "new.txt", "theirs.txt"]);

        // merge commit shows on the first-parent log with both parents
        let entries = log(&repo, &state).unwrap();
        assert!(entries[0].commit.is_merge());
    }

    #[test]
    fn test_merge_untracked_in_the_way() {
        let (_dir, repo, mut state) = setup();
        branch(&mut state, "other").unwrap();
        commit_file(&repo, &mut state, "a.txt", b"a", "ours");
        checkout_branch(&repo, &mut state, "other").unwrap();
        commit_file(&repo, &mut state, "b.txt", b"b", "theirs");
        checkout_branch(&repo, &mut state, DEFAULT_BRANCH).unwrap();

        write_file(&repo, "b.txt", b"local").unwrap();
        let head = state.head().unwrap();
        let result = merge(&repo, &mut state, "other");
        assert!(matches!(result, Err(Error::UntrackedFileInTheWay(_))));
        assert_eq!(state.head().unwrap(), head);
        assert_eq!(read_file(&repo, "b.txt").unwrap(), b"local");
    }

    #[test]
    fn test_merge_delete_vs_modify_conflict() {
        let (_dir, repo, mut state) = setup();
        commit_file(&repo, &mut state, "f.txt", b"base\n", "base");
        branch(&mut state, "other").unwrap();

        remove(&repo, &mut state, "f.txt").unwrap();
        commit(&repo, &mut state, "delete").unwrap();
        checkout_branch(&repo, &mut state, "other").unwrap();
        commit_file(&repo, &mut state, "f.txt", b"changed\n", "modify");
        checkout_branch(&repo, &mut state, DEFAULT_BRANCH).unwrap();

        let outcome = merge(&repo, &mut state, "other").unwrap();
        let MergeOutcome::Merged { conflicts, .. } = outcome else {
            panic!("expected a merge commit");
        };
        assert_eq!(conflicts, vec!["f.txt"]);
        assert_eq!(
            read_file(&repo, "f.txt").unwrap(),
            b"<<<<<<< HEAD\n=======\nchanged\n>>>>>>>\n".to_vec()
        );
    }

    #[test]
    fn test_repeated_merges_use_latest_base() {
        let (_dir, repo, mut state) = setup();
        commit_file(&repo, &mut state, "f.txt", b"v0", "base");
        branch(&mut state, "other").unwrap();

        checkout_branch(&repo, &mut state, "other").unwrap();
        commit_file(&repo, &mut state, "f.txt", b"v1", "other v1");
        checkout_branch(&repo, &mut state, DEFAULT_BRANCH).unwrap();
        commit_file(&repo, &mut state, "g.txt", b"g", "master g");
        merge(&repo, &mut state, "other").unwrap();

        // other edits f again; the first merge is now the base for f
        checkout_branch(&repo, &mut state, "other").unwrap();
        commit_file(&repo, &mut state, "f.txt", b"v2", "other v2");
        checkout_branch(&repo, &mut state, DEFAULT_BRANCH).unwrap();

        let outcome = merge(&repo, &mut state, "other").unwrap();
        let MergeOutcome::Merged { conflicts, .. } = outcome else {
            panic!("expected a merge commit");
        };
        assert!(conflicts.is_empty());
        assert_eq!(read_file(&repo, "f.txt").unwrap(), b"v2");
    }
}
