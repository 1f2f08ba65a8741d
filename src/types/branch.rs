use serde::{Deserialize, Serialize};

use crate::hash::Hash;

/// a named, movable pointer to a commit
///
/// `history` is the first-parent lineage from the root up to and including
/// `head`, oldest first. it drives `log`; ancestry questions go through the
/// full parent graph instead.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    pub head: Hash,
    pub history: Vec<Hash>,
}

impl Branch {
    /// branch whose history is just its head
    pub fn new(name: impl Into<String>, head: Hash) -> Self {
        Self {
            name: name.into(),
            head,
            history: vec![head],
        }
    }

    /// new branch sharing this branch's head and an independent copy of its history
    pub fn fork(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            head: self.head,
            history: self.history.clone(),
        }
    }

    /// append a commit whose first parent is the current head
    pub fn advance(&mut self, commit: Hash) {
        self.history.push(commit);
        self.head = commit;
    }

    /// is `commit` on this branch's first-parent lineage
    pub fn contains(&self, commit: &Hash) -> bool {
        self.history.contains(commit)
    }

    /// move the head back to a commit already in the history
    ///
    /// returns false (and changes nothing) if the commit is not in the history.
    pub fn rewind_to(&mut self, commit: &Hash) -> bool {
        match self.history.iter().position(|h| h == commit) {
            Some(pos) => {
                self.history.truncate(pos + 1);
                self.head = *commit;
                true
            }
            None => false,
        }
    }

    /// point at `head` with an explicitly supplied lineage (oldest first, ending at `head`)
    pub fn repoint(&mut self, head: Hash, history: Vec<Hash>) {
        self.head = head;
        self.history = history;
    }

    /// history newest first
    pub fn lineage(&self) -> impl Iterator<Item = &Hash> {
        self.history.iter().rev()
    }
}

/// a recorded branch-creation event: `commit` was the head of both branches
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPoint {
    pub commit: Hash,
    pub branches: [String; 2],
}

impl SplitPoint {
    pub fn new(commit: Hash, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            commit,
            branches: [from.into(), to.into()],
        }
    }

    pub fn involves(&self, branch: &str) -> bool {
        self.branches.iter().any(|b| b == branch)
    }

    /// recorded between exactly these two branches (either order)
    pub fn between(&self, a: &str, b: &str) -> bool {
        self.involves(a) && self.involves(b)
    }
}
