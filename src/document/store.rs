use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::StoreError;

/// Filesystem content store for rendered documents, keyed by filename
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Write a new document. Existing files are never overwritten.
    pub fn save(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, StoreError> {
        let path = self.path_for(name)?;
        let write_err = |source| StoreError::Write {
            name: name.to_string(),
            source,
        };

        fs::create_dir_all(&self.root).map_err(write_err)?;
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(write_err)?;
        file.write_all(bytes).map_err(write_err)?;
        file.sync_all().map_err(write_err)?;

        debug!("Stored document {:?} ({} bytes)", path, bytes.len());
        Ok(path)
    }

    /// Exact bytes previously written under `name`
    pub fn load(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.path_for(name)?;
        fs::read(&path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => StoreError::NotFound(name.to_string()),
            _ => StoreError::Read {
                name: name.to_string(),
                source,
            },
        })
    }

    /// Resolve a key to a path inside the root, rejecting anything that is
    /// not a single plain filename
    fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        let invalid = || StoreError::InvalidName(name.to_string());
        if name.is_empty() || name.len() > 255 || name.contains(['/', '\\']) {
            return Err(invalid());
        }
        let file_name = Path::new(name).file_name().and_then(|n| n.to_str()).ok_or_else(invalid)?;
        if file_name != name || name.starts_with('.') {
            return Err(invalid());
        }
        Ok(self.root.join(file_name))
    }
}
