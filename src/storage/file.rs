//! Single-file backend for the patient store.

use super::StoreGateway;
use super::format::StorageFormat;
use super::store::PatientStore;
use crate::core::{PatientError, Result};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

// ============================================================================
// File Gateway
// ============================================================================

/// Keeps the whole collection in one file.
///
/// Saves never modify the target in place: the new contents are written to
/// a temporary file in the same directory, synced, then renamed over the
/// target. A crash mid-save leaves the previous file intact.
#[derive(Debug, Clone)]
pub struct FileGateway {
    path: PathBuf,
    format: StorageFormat,
}

impl FileGateway {
    pub fn new<P: AsRef<Path>>(path: P, format: StorageFormat) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            format,
        }
    }

    pub fn json<P: AsRef<Path>>(path: P) -> Self {
        Self::new(path, StorageFormat::Json)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> StorageFormat {
        self.format
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl StoreGateway for FileGateway {
    fn load(&self) -> Result<PatientStore> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "store file missing, starting empty");
                return Ok(PatientStore::new());
            }
            Err(e) => {
                return Err(PatientError::storage(format!(
                    "Failed to read '{}': {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let store = self.format.decode(&bytes).map_err(|e| {
            PatientError::storage(format!("'{}': {}", self.path.display(), e))
        })?;
        debug!(
            path = %self.path.display(),
            records = store.len(),
            bytes = bytes.len(),
            "store loaded"
        );
        Ok(store)
    }

    fn save(&self, store: &PatientStore) -> Result<()> {
        let bytes = self.format.encode(store)?;
        let dir = self.parent_dir();

        fs::create_dir_all(dir).map_err(|e| {
            PatientError::storage(format!("Failed to create directory '{}': {}", dir.display(), e))
        })?;

        let mut temp = NamedTempFile::new_in(dir).map_err(|e| {
            PatientError::storage(format!(
                "Failed to create temp file in '{}': {}",
                dir.display(),
                e
            ))
        })?;
        temp.write_all(&bytes)
            .map_err(|e| PatientError::storage(format!("Failed to write temp file: {}", e)))?;
        temp.flush()
            .map_err(|e| PatientError::storage(format!("Failed to flush temp file: {}", e)))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| PatientError::storage(format!("Failed to sync temp file: {}", e)))?;
        temp.persist(&self.path).map_err(|e| {
            PatientError::storage(format!(
                "Failed to replace '{}': {}",
                self.path.display(),
                e.error
            ))
        })?;

        debug!(
            path = %self.path.display(),
            records = store.len(),
            bytes = bytes.len(),
            "store saved"
        );
        Ok(())
    }
}
