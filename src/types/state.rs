use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::hash::{normalize_prefix, Hash, HEX_LEN};
use crate::types::{Branch, SplitPoint};

/// name of the branch created by `init`
pub const DEFAULT_BRANCH: &str = "master";

/// the persisted repository aggregate
///
/// loaded at the start of every command and rewritten wholesale at the end.
/// objects themselves live in the object store; this only holds addresses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    /// branch name -> branch
    pub branches: BTreeMap<String, Branch>,
    /// name of the checked-out branch
    pub current: String,
    /// every commit ever created
    pub commits: BTreeSet<Hash>,
    /// commit message -> commits with that message, in creation order
    pub messages: BTreeMap<String, Vec<Hash>>,
    /// filename -> blob staged for addition
    #[serde(default)]
    pub staged: BTreeMap<String, Hash>,
    /// filename -> blob (or tombstone) staged for removal
    #[serde(default)]
    pub removed: BTreeMap<String, Hash>,
    /// branch-creation events
    #[serde(default)]
    pub split_points: Vec<SplitPoint>,
}

impl State {
    /// fresh state with a single `master` branch at `root`
    pub fn new(root: Hash, root_message: &str) -> Self {
        let mut branches = BTreeMap::new();
        branches.insert(DEFAULT_BRANCH.to_string(), Branch::new(DEFAULT_BRANCH, root));

        let mut state = Self {
            branches,
            current: DEFAULT_BRANCH.to_string(),
            commits: BTreeSet::new(),
            messages: BTreeMap::new(),
            staged: BTreeMap::new(),
            removed: BTreeMap::new(),
            split_points: Vec::new(),
        };
        state.record_commit(root, root_message);
        state
    }

    /// the checked-out branch
    pub fn current_branch(&self) -> Result<&Branch> {
        self.branches
            .get(&self.current)
            .ok_or_else(|| Error::CorruptState(format!("current branch '{}' missing", self.current)))
    }

    pub fn current_branch_mut(&mut self) -> Result<&mut Branch> {
        let current = self.current.clone();
        self.branches
            .get_mut(&current)
            .ok_or_else(|| Error::CorruptState(format!("current branch '{}' missing", current)))
    }

    /// head commit of the checked-out branch
    pub fn head(&self) -> Result<Hash> {
        Ok(self.current_branch()?.head)
    }

    pub fn branch(&self, name: &str) -> Option<&Branch> {
        self.branches.get(name)
    }

    /// add a commit to the universe and the message index
    pub fn record_commit(&mut self, hash: Hash, message: &str) {
        if self.commits.insert(hash) {
            self.messages.entry(message.to_string()).or_default().push(hash);
        }
    }

    /// anything staged for addition or removal
    pub fn has_staged_changes(&self) -> bool {
        !self.staged.is_empty() || !self.removed.is_empty()
    }

    /// stage `name` for addition, cancelling a pending removal
    pub fn stage_addition(&mut self, name: &str, blob: Hash) {
        self.removed.remove(name);
        self.staged.insert(name.to_string(), blob);
    }

    /// stage `name` for removal, cancelling a pending addition
    pub fn stage_removal(&mut self, name: &str, blob: Hash) {
        self.staged.remove(name);
        self.removed.insert(name.to_string(), blob);
    }

    /// forget any pending change for `name`
    pub fn unstage(&mut self, name: &str) {
        self.staged.remove(name);
        self.removed.remove(name);
    }

    pub fn clear_staging(&mut self) {
        self.staged.clear();
        self.removed.clear();
    }

    /// resolve a full id or unique prefix against all known commits
    pub fn resolve_commit(&self, prefix: &str) -> Result<Hash> {
        let prefix = normalize_prefix(prefix)?;

        if prefix.len() == HEX_LEN {
            let hash = Hash::from_hex(&prefix)?;
            return if self.commits.contains(&hash) {
                Ok(hash)
            } else {
                Err(Error::CommitNotFound(prefix))
            };
        }

        let matches: Vec<&Hash> = self
            .commits
            .iter()
            .filter(|h| h.matches_prefix(&prefix))
            .collect();

        match matches.as_slice() {
            [] => Err(Error::CommitNotFound(prefix)),
            [hash] => Ok(**hash),
            _ => Err(Error::AmbiguousPrefix {
                prefix,
                count: matches.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::compute_blob_hash;

    fn h(n: u8) -> Hash {
        compute_blob_hash(&[n])
    }

    #[test]
    fn test_new_state() {
        let state = State::new(h(0), "initial commit");
        assert_eq!(state.current, DEFAULT_BRANCH);
        assert_eq!(state.head().unwrap(), h(0));
        assert!(state.commits.contains(&h(0)));
        assert_eq!(state.messages["initial commit"], vec![h(0)]);
        assert!(!state.has_staged_changes());
    }

    #[test]
    fn test_record_commit_is_idempotent() {
        let mut state = State::new(h(0), "initial commit");
        state.record_commit(h(1), "m");
        state.record_commit(h(1), "m");
        state.record_commit(h(2), "m");
        assert_eq!(state.messages["m"], vec![h(1), h(2)]);
    }

    #[test]
    fn test_staging_sets_stay_disjoint() {
        let mut state = State::new(h(0), "initial commit");

        state.stage_addition("a", h(1));
        state.stage_removal("a", h(2));
        assert!(!state.staged.contains_key("a"));
        assert!(state.removed.contains_key("a"));

        state.stage_addition("a", h(3));
        assert!(state.staged.contains_key("a"));
        assert!(!state.removed.contains_key("a"));

        state.unstage("a");
        assert!(!state.has_staged_changes());
    }

    #[test]
    fn test_resolve_commit_prefix() {
        let mut state = State::new(h(0), "initial commit");
        state.record_commit(h(1), "one");

        let full = h(1).to_hex();
        assert_eq!(state.resolve_commit(&full).unwrap(), h(1));
        assert_eq!(state.resolve_commit(&full[..8]).unwrap(), h(1));
        assert_eq!(state.resolve_commit(&full[..8].to_uppercase()).unwrap(), h(1));
    }

    #[test]
    fn test_resolve_commit_not_found() {
        let state = State::new(h(0), "initial commit");
        let missing = h(7).to_hex();
        assert!(matches!(
            state.resolve_commit(&missing),
            Err(Error::CommitNotFound(_))
        ));
        assert!(matches!(
            state.resolve_commit("not-hex"),
            Err(Error::InvalidHashPrefix(_))
        ));
    }

    #[test]
    fn test_resolve_commit_ambiguous() {
        let mut state = State::new(h(0), "initial commit");
        for n in 1..=40 {
            state.record_commit(h(n), "m");
        }

        // 41 hashes over 16 possible first chars: some char repeats
        let first = state
            .commits
            .iter()
            .map(|c| c.to_hex()[..1].to_string())
            .find(|p| state.commits.iter().filter(|c| c.matches_prefix(p)).count() > 1)
            .unwrap();

        assert!(matches!(
            state.resolve_commit(&first),
            Err(Error::AmbiguousPrefix { .. })
        ));
    }

    #[test]
    fn test_state_cbor_roundtrip() {
        let mut state = State::new(h(0), "initial commit");
        state.stage_addition("a.txt", h(1));
        state.split_points.push(SplitPoint::new(h(0), "master", "dev"));

        let mut bytes = Vec::new();
        ciborium::into_writer(&state, &mut bytes).unwrap();
        let parsed: State = ciborium::from_reader(&bytes[..]).unwrap();
        assert_eq!(state, parsed);
    }
}
