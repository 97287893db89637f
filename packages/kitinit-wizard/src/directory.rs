use std::path::{Component, Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::error::{Result, WizardError};

/// Sub-directories of one directory, as offered on the Location step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryListing {
    pub current: PathBuf,
    /// Names of visible sub-directories, sorted.
    pub entries: Vec<String>,
    pub parent: PathBuf,
}

impl DirectoryListing {
    pub fn entry_path(&self, name: &str) -> PathBuf {
        self.current.join(name)
    }

    pub fn is_root(&self) -> bool {
        self.parent == self.current
    }
}

/// Lexical parent of `path`; the root is its own parent.
pub fn parent_path(path: &Path) -> PathBuf {
    path.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| path.to_path_buf())
}

pub async fn list_directories(path: &Path) -> Result<DirectoryListing> {
    debug!("Listing {}", path.display());
    let mut read_dir = fs::read_dir(path)
        .await
        .map_err(|e| WizardError::filesystem(path, e))?;
    let mut entries = Vec::new();
    while let Some(entry) = read_dir
        .next_entry()
        .await
        .map_err(|e| WizardError::filesystem(path, e))?
    {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        if is_directory(&entry).await {
            entries.push(name);
        }
    }
    entries.sort();
    Ok(DirectoryListing {
        current: path.to_path_buf(),
        entries,
        parent: parent_path(path),
    })
}

async fn is_directory(entry: &fs::DirEntry) -> bool {
    match entry.file_type().await {
        Ok(file_type) if file_type.is_dir() => true,
        Ok(file_type) if file_type.is_symlink() => fs::metadata(entry.path())
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false),
        _ => false,
    }
}

/// A directory is empty when it has no entries at all, hidden ones included.
pub async fn directory_is_empty(path: &Path) -> Result<bool> {
    let mut read_dir = fs::read_dir(path)
        .await
        .map_err(|e| WizardError::filesystem(path, e))?;
    let first = read_dir
        .next_entry()
        .await
        .map_err(|e| WizardError::filesystem(path, e))?;
    Ok(first.is_none())
}

/// A new directory name must be exactly one normal path component.
pub fn is_valid_directory_name(name: &str) -> bool {
    let name = name.trim();
    if name.is_empty() {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Creates `parent/name`. An existing directory of that name is fine.
pub async fn create_directory(parent: &Path, name: &str) -> Result<PathBuf> {
    if !is_valid_directory_name(name) {
        return Err(WizardError::bad_request(format!(
            "Invalid directory name: {}",
            name
        )));
    }
    let path = parent.join(name.trim());
    match fs::create_dir(&path).await {
        Ok(()) => Ok(path),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists && path.is_dir() => Ok(path),
        Err(e) => Err(WizardError::filesystem(&path, e)),
    }
}
