use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Error, IoResultExt, Result};
use crate::types::State;

/// name of the metadata directory inside the working tree
pub const META_DIR: &str = ".twig";

/// a twig repository: a working tree plus its metadata directory
pub struct Repo {
    work_tree: PathBuf,
    path: PathBuf,
    config: Config,
}

impl Repo {
    /// create the metadata directory for a new repository rooted at `work_tree`
    pub fn init(work_tree: &Path) -> Result<Self> {
        let path = work_tree.join(META_DIR);
        if path.exists() {
            return Err(Error::RepoExists(work_tree.to_path_buf()));
        }

        // create directory structure
        fs::create_dir_all(path.join("objects/blobs")).with_path(&path)?;
        fs::create_dir_all(path.join("objects/commits")).with_path(&path)?;
        fs::create_dir_all(path.join("tmp")).with_path(&path)?;

        let config = Config::default();
        config.save(&path.join("config.toml"))?;

        Ok(Self {
            work_tree: work_tree.to_path_buf(),
            path,
            config,
        })
    }

    /// open an existing repository
    pub fn open(work_tree: &Path) -> Result<Self> {
        let path = work_tree.join(META_DIR);
        let config_path = path.join("config.toml");
        if !config_path.exists() {
            return Err(Error::NoRepo(work_tree.to_path_buf()));
        }

        let config = Config::load(&config_path)?;

        Ok(Self {
            work_tree: work_tree.to_path_buf(),
            path,
            config,
        })
    }

    /// working tree root
    pub fn work_tree(&self) -> &Path {
        &self.work_tree
    }

    /// metadata directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// repository configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// mutable access to configuration
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// save configuration changes
    pub fn save_config(&self) -> Result<()> {
        self.config.save(&self.config_path())
    }

    /// path to config.toml
    pub fn config_path(&self) -> PathBuf {
        self.path.join("config.toml")
    }

    /// path to the persisted state
    pub fn state_path(&self) -> PathBuf {
        self.path.join("state.cbor")
    }

    /// path to objects directory
    pub fn objects_path(&self) -> PathBuf {
        self.path.join("objects")
    }

    /// path to blobs directory
    pub fn blobs_path(&self) -> PathBuf {
        self.objects_path().join("blobs")
    }

    /// path to commits directory
    pub fn commits_path(&self) -> PathBuf {
        self.objects_path().join("commits")
    }

    /// path to tmp directory (for atomic writes)
    pub fn tmp_path(&self) -> PathBuf {
        self.path.join("tmp")
    }

    /// load the repository state
    ///
    /// a missing state file means the repository was never initialized.
    pub fn load_state(&self) -> Result<State> {
        let path = self.state_path();
        let bytes = fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NoRepo(self.work_tree.clone())
            } else {
                Error::Io {
                    path: path.clone(),
                    source: e,
                }
            }
        })?;
        let state: State = ciborium::from_reader(&bytes[..])?;
        Ok(state)
    }

    /// replace the persisted state with `state`
    pub fn save_state(&self, state: &State) -> Result<()> {
        let mut bytes = Vec::new();
        ciborium::into_writer(state, &mut bytes)?;
        self.write_atomic(&self.state_path(), &bytes)?;
        tracing::debug!(branch = %state.current, commits = state.commits.len(), "saved state");
        Ok(())
    }

    /// atomic write: temp -> fsync -> rename -> fsync parent
    pub(crate) fn write_atomic(&self, dest: &Path, bytes: &[u8]) -> Result<()> {
        let tmp_path = self.tmp_path().join(uuid::Uuid::new_v4().to_string());
        {
            let mut tmp_file = File::create(&tmp_path).with_path(&tmp_path)?;
            tmp_file.write_all(bytes).with_path(&tmp_path)?;
            tmp_file.sync_all().with_path(&tmp_path)?;
        }

        fs::rename(&tmp_path, dest).with_path(dest)?;

        if let Some(parent) = dest.parent() {
            let dir = File::open(parent).with_path(parent)?;
            dir.sync_all().with_path(parent)?;
        }

        Ok(())
    }
}
