//! Output targets for generated site files

use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::error::{CoreError, Result};

/// Where materialised templates are written.
pub trait SiteWriter {
    /// Workspace root, or `None` when no workspace is open.
    fn root(&self) -> Option<&Path>;

    /// Write `contents` to `relative` under the root.
    fn write(&self, relative: &str, contents: &str) -> Result<()>;

    fn exists(&self, relative: &str) -> bool;

    fn remove(&self, relative: &str) -> Result<()>;
}

/// Writes into a directory on the local file system.
#[derive(Debug, Clone, Default)]
pub struct FsSiteWriter {
    root: Option<PathBuf>,
}

impl FsSiteWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// A writer with no workspace; every write fails with [`CoreError::NoOutputRoot`].
    pub fn detached() -> Self {
        Self { root: None }
    }
}

impl SiteWriter for FsSiteWriter {
    fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    fn write(&self, relative: &str, contents: &str) -> Result<()> {
        let root = self.root.as_deref().ok_or(CoreError::NoOutputRoot)?;
        atomic_write(&root.join(relative), contents.as_bytes())
    }

    fn exists(&self, relative: &str) -> bool {
        self.root.as_deref().is_some_and(|root| root.join(relative).exists())
    }

    fn remove(&self, relative: &str) -> Result<()> {
        let root = self.root.as_deref().ok_or(CoreError::NoOutputRoot)?;
        std::fs::remove_file(root.join(relative))?;
        Ok(())
    }
}

/// Atomically write `data` to `path` using a tempfile in the same directory.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
