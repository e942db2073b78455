use anyhow::{Context, Result};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::utils::app_paths::AppPaths;

/// Owns the file holding the last successful catalog response.
///
/// Other add-on code reads this path directly, so the file is either absent
/// or holds one complete response body.
#[derive(Debug, Clone)]
pub struct ResponseStore {
    path: PathBuf,
}

impl ResponseStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_location() -> Result<Self> {
        Ok(Self::new(AppPaths::response_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Delete the saved response. A missing file is fine.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(target: "store", "Removed old response {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to remove {}", self.path.display())),
        }
    }

    /// Replace the saved response with `bytes`.
    ///
    /// Written to a sibling temp file first and renamed into place.
    pub fn save(&self, bytes: &[u8]) -> Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;

        let mut tmp = NamedTempFile::new_in(&parent)?;
        tmp.write_all(bytes)?;
        tmp.flush()?;
        tmp.persist(&self.path)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        tracing::debug!(
            target: "store",
            "Saved {} bytes to {}",
            bytes.len(),
            self.path.display()
        );
        Ok(())
    }

    pub fn read(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", self.path.display())),
        }
    }
}
