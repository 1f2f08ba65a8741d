use crate::error::{Error, Result};
use crate::types::{SplitPoint, State};

/// create a branch at the current head
///
/// the new branch gets its own copy of the current history and the head is
/// recorded as a split point between the two.
pub fn branch(state: &mut State, name: &str) -> Result<()> {
    validate_branch_name(name)?;
    if state.branches.contains_key(name) {
        return Err(Error::BranchExists(name.to_string()));
    }

    let current = state.current_branch()?;
    let head = current.head;
    let forked = current.fork(name);

    state.branches.insert(name.to_string(), forked);
    state
        .split_points
        .push(SplitPoint::new(head, state.current.clone(), name));

    tracing::info!(branch = name, from = %state.current, head = %head.short(12), "created branch");
    Ok(())
}

/// delete a branch pointer; its commits stay in the store
pub fn remove_branch(state: &mut State, name: &str) -> Result<()> {
    if !state.branches.contains_key(name) {
        return Err(Error::BranchNotFound(name.to_string()));
    }
    if state.current == name {
        return Err(Error::RemoveCurrentBranch);
    }

    state.branches.remove(name);
    state.split_points.retain(|sp| !sp.involves(name));

    tracing::info!(branch = name, "removed branch");
    Ok(())
}

/// validate a branch name
pub fn validate_branch_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidBranchName("empty branch name".to_string()));
    }

    if name.starts_with('/') || name.ends_with('/') {
        return Err(Error::InvalidBranchName(format!(
            "branch name cannot start or end with '/': {}",
            name
        )));
    }

    if name.contains("..") {
        return Err(Error::InvalidBranchName(format!(
            "branch name cannot contain '..': {}",
            name
        )));
    }

    if name.chars().any(|c| c.is_whitespace() || c == '\0') {
        return Err(Error::InvalidBranchName(format!(
            "branch name cannot contain whitespace: {}",
            name
        )));
    }

    Ok(())
}
