use std::fs;
use std::path::PathBuf;

use walkdir::WalkDir;

use crate::error::{Error, IoResultExt, Result};
use crate::repo::{Repo, META_DIR};
use crate::types::Blob;

/// reject names that are not plain files at the top of the working tree
pub fn validate_file_name(name: &str) -> Result<()> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name == META_DIR
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0')
    {
        return Err(Error::InvalidFileName(name.to_string()));
    }
    Ok(())
}

/// path of `name` inside the working tree
pub fn file_path(repo: &Repo, name: &str) -> PathBuf {
    repo.work_tree().join(name)
}

/// plain files directly in the working tree, sorted by name
///
/// subdirectories (including the metadata directory) are not part of the
/// working set. names that are not valid utf-8 are skipped.
pub fn list_files(repo: &Repo) -> Result<Vec<String>> {
    let root = repo.work_tree();
    let mut names = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::Io {
            path: root.to_path_buf(),
            source: e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "walkdir error")),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }

    Ok(names)
}

/// is there a plain file called `name` in the working tree
pub fn file_exists(repo: &Repo, name: &str) -> bool {
    file_path(repo, name).is_file()
}

/// read a working file, `FileNotFound` if it is missing
pub fn read_file(repo: &Repo, name: &str) -> Result<Vec<u8>> {
    let path = file_path(repo, name);
    fs::read(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound(name.to_string())
        } else {
            Error::Io { path, source: e }
        }
    })
}

/// snapshot a working file as a blob
pub fn blob_from_file(repo: &Repo, name: &str) -> Result<Blob> {
    Ok(Blob::new(name, read_file(repo, name)?))
}

/// create or overwrite a working file
pub fn write_file(repo: &Repo, name: &str, content: &[u8]) -> Result<()> {
    let path = file_path(repo, name);
    fs::write(&path, content).with_path(&path)
}

/// delete a working file; a missing file is not an error
pub fn remove_file(repo: &Repo, name: &str) -> Result<()> {
    let path = file_path(repo, name);
    match fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Io { path, source: e }),
    }
}
