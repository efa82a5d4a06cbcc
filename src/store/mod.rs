//! Persisted playlist file
//!
//! Reads are lenient: anything other than readable UTF-8 is "no prior state".
//! Writes go to a temporary file beside the target which is then renamed over
//! it, so readers never see a half-written playlist.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::errors::{StoreError, StoreResult};

#[derive(Debug, Clone)]
pub struct PlaylistStore {
    path: PathBuf,
}

impl PlaylistStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current file contents, `None` when missing or unreadable
    pub fn load(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Some(contents),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No playlist at {}", self.path.display());
                None
            }
            Err(e) => {
                warn!(
                    "Ignoring unreadable playlist {}: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    /// Replace the file with `contents` atomically
    pub fn save(&self, contents: &str) -> StoreResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|source| StoreError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let mut file = NamedTempFile::new_in(&dir).map_err(|source| StoreError::Write {
            dir: dir.clone(),
            source,
        })?;
        file.write_all(contents.as_bytes())
            .and_then(|_| file.as_file().sync_all())
            .map_err(|source| StoreError::Write {
                dir: dir.clone(),
                source,
            })?;
        file.persist(&self.path).map_err(|e| StoreError::Persist {
            path: self.path.clone(),
            source: e.error,
        })?;

        info!("Wrote {} bytes to {}", contents.len(), self.path.display());
        Ok(())
    }
}
