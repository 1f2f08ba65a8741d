//! high-level operations on twig repositories
//!
//! every operation takes the repository and its loaded [`State`]; callers
//! persist the state only when the operation succeeds.

mod add;
mod branch;
mod checkout;
mod commit;
mod init;
mod log;
mod merge;
mod merge_base;
mod remote;
mod reset;
mod rm;
mod status;

pub use add::add;
pub use branch::{branch, remove_branch, validate_branch_name};
pub use checkout::{checkout_branch, checkout_file, checkout_file_at};
pub use commit::commit;
pub use init::init;
pub use log::{find, global_log, log, LogEntry};
pub use merge::{classify, conflict_content, merge, MergeOutcome, Resolution};
pub use merge_base::{find_merge_base, merge_base};
pub use remote::{add_remote, remove_remote};
pub use reset::reset;
pub use rm::remove;
pub use status::{status, Modification, StatusReport};

use crate::error::Result;
use crate::object::read_commit;
use crate::repo::Repo;
use crate::types::{Commit, State};

/// the commit at the head of the current branch
fn head_commit(repo: &Repo, state: &State) -> Result<Commit> {
    read_commit(repo, &state.head()?)
}
