use std::collections::BTreeSet;
use std::fmt;

use crate::error::Result;
use crate::repo::Repo;
use crate::types::State;
use crate::workspace::{blob_from_file, list_files};

use super::head_commit;

/// how a tracked or staged file differs from the working copy
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Modification {
    Modified,
    Deleted,
}

impl fmt::Display for Modification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modification::Modified => write!(f, "modified"),
            Modification::Deleted => write!(f, "deleted"),
        }
    }
}

/// snapshot of branches, staging and working tree; every list is sorted
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusReport {
    pub branches: Vec<String>,
    pub current: String,
    pub staged: Vec<String>,
    pub removed: Vec<String>,
    pub modified: Vec<(String, Modification)>,
    pub untracked: Vec<String>,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Branches ===")?;
        for name in &self.branches {
            if *name == self.current {
                writeln!(f, "*{}", name)?;
            } else {
                writeln!(f, "{}", name)?;
            }
        }

        writeln!(f, "\n=== Staged Files ===")?;
        for name in &self.staged {
            writeln!(f, "{}", name)?;
        }

        writeln!(f, "\n=== Removed Files ===")?;
        for name in &self.removed {
            writeln!(f, "{}", name)?;
        }

        writeln!(f, "\n=== Modifications Not Staged For Commit ===")?;
        for (name, kind) in &self.modified {
            writeln!(f, "{} ({})", name, kind)?;
        }

        writeln!(f, "\n=== Untracked Files ===")?;
        for name in &self.untracked {
            writeln!(f, "{}", name)?;
        }
        Ok(())
    }
}

/// compute the status report without touching anything
pub fn status(repo: &Repo, state: &State) -> Result<StatusReport> {
    let head = head_commit(repo, state)?;
    let on_disk: BTreeSet<String> = list_files(repo)?.into_iter().collect();

    let mut modified = Vec::new();
    let candidates: BTreeSet<&String> = head.files.keys().chain(state.staged.keys()).collect();
    for name in candidates {
        let expected = match state.staged.get(name.as_str()) {
            Some(blob) => blob,
            None if state.removed.contains_key(name.as_str()) => continue,
            None => match head.file(name) {
                Some(blob) => blob,
                None => continue,
            },
        };

        if !on_disk.contains(name.as_str()) {
            modified.push((name.clone(), Modification::Deleted));
        } else if blob_from_file(repo, name)?.hash() != *expected {
            modified.push((name.clone(), Modification::Modified));
        }
    }

    let untracked = on_disk
        .iter()
        .filter(|name| {
            let known = head.tracks(name) || state.staged.contains_key(name.as_str());
            !known || state.removed.contains_key(name.as_str())
        })
        .cloned()
        .collect();

    Ok(StatusReport {
        branches: state.branches.keys().cloned().collect(),
        current: state.current.clone(),
        staged: state.staged.keys().cloned().collect(),
        removed: state.removed.keys().cloned().collect(),
        modified,
        untracked,
    })
}
