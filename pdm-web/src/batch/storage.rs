//! Flat-file storage for batch inputs and results
//!
//! One shared directory, addressed by sanitized filename only. No index, no
//! locking: a second upload with the same name overwrites the first.

use pdm_common::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::filename::secure_filename;

#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the directory if it is missing
    pub fn ensure_exists(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Resolve a stored name to its path, refusing anything not already safe
    fn path_for(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || secure_filename(name) != name {
            return Err(Error::NotFound(name.to_string()));
        }
        Ok(self.dir.join(name))
    }

    /// Write a whole file, replacing any previous content
    pub async fn save(&self, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path_for(name)?;
        tokio::fs::write(&path, bytes).await?;
        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }

    /// Read a stored file; missing files are `NotFound`
    pub async fn read(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.path_for(name)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::NotFound(name.to_string()))
            }
            Err(e) => Err(Error::Io(e)),
        }
    }
}
