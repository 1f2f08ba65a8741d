use crate::error::Result;
use crate::repo::Repo;

/// register a remote under `name` and save the config
pub fn add_remote(repo: &mut Repo, name: &str, path: &str) -> Result<()> {
    repo.config_mut().add_remote(name, path)?;
    repo.save_config()?;
    tracing::info!(remote = name, path, "added remote");
    Ok(())
}

/// forget the remote `name` and save the config
pub fn remove_remote(repo: &mut Repo, name: &str) -> Result<()> {
    repo.config_mut().remove_remote(name)?;
    repo.save_config()?;
    tracing::info!(remote = name, "removed remote");
    Ok(())
}
