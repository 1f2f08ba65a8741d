use std::fmt;

use chrono::{DateTime, Local, Utc};

use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::object::read_commit;
use crate::repo::Repo;
use crate::types::{Commit, State};

/// date layout used in log output, e.g. `Thu Jan 1 00:00:00 1970 +0000`
const DATE_FORMAT: &str = "%a %b %-d %H:%M:%S %Y %z";

/// commit with its hash for log output
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub hash: Hash,
    pub commit: Commit,
    /// hex chars shown per parent on the `Merge:` line
    pub abbrev: usize,
}

impl LogEntry {
    /// commit time in the local timezone
    pub fn date(&self) -> DateTime<Local> {
        DateTime::<Utc>::from_timestamp(self.commit.timestamp, 0)
            .unwrap_or_default()
            .with_timezone(&Local)
    }
}

/// format a log entry for display
impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===")?;
        writeln!(f, "commit {}", self.hash)?;
        if self.commit.is_merge() {
            let parents: Vec<String> = self
                .commit
                .parents
                .iter()
                .map(|p| p.short(self.abbrev))
                .collect();
            writeln!(f, "Merge: {}", parents.join(" "))?;
        }
        writeln!(f, "Date: {}", self.date().format(DATE_FORMAT))?;
        write!(f, "{}", self.commit.message)
    }
}

/// first-parent history of the current branch, newest first
pub fn log(repo: &Repo, state: &State) -> Result<Vec<LogEntry>> {
    let abbrev = repo.config().log.abbrev;
    state
        .current_branch()?
        .lineage()
        .map(|hash| -> Result<LogEntry> {
            Ok(LogEntry {
                hash: *hash,
                commit: read_commit(repo, hash)?,
                abbrev,
            })
        })
        .collect()
}

/// every commit ever made, newest first
pub fn global_log(repo: &Repo, state: &State) -> Result<Vec<LogEntry>> {
    let abbrev = repo.config().log.abbrev;
    let mut entries = state
        .commits
        .iter()
        .map(|hash| -> Result<LogEntry> {
            Ok(LogEntry {
                hash: *hash,
                commit: read_commit(repo, hash)?,
                abbrev,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    entries.sort_by(|a, b| {
        b.commit
            .timestamp
            .cmp(&a.commit.timestamp)
            .then_with(|| a.hash.cmp(&b.hash))
    });
    Ok(entries)
}

/// ids of commits whose message is exactly `message`, in creation order
pub fn find(state: &State, message: &str) -> Result<Vec<Hash>> {
    state
        .messages
        .get(message)
        .filter(|hashes| !hashes.is_empty())
        .cloned()
        .ok_or_else(|| Error::MessageNotFound(message.to_string()))
}

/// lineage of `head` following first parents, oldest first
pub(crate) fn first_parent_chain(repo: &Repo, head: Hash) -> Result<Vec<Hash>> {
    let mut chain = vec![head];
    let mut commit = read_commit(repo, &head)?;
    while let Some(parent) = commit.first_parent().copied() {
        chain.push(parent);
        commit = read_commit(repo, &parent)?;
    }
    chain.reverse();
    Ok(chain)
}
