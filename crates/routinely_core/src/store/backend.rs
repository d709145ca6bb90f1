//! Storage backends for the whole-document payload.
//!
//! # Responsibility
//! - Abstract raw payload reads/writes behind `StorageBackend`.
//! - Provide the file backend used in production and the in-memory backend
//!   used by tests and the CLI probe.
//!
//! # Invariants
//! - `read` returns `Ok(None)` for a backend that has never been written.
//! - `FileBackend::write` replaces the file via a sibling temp file so a
//!   crashed write cannot leave a half-written document behind.

use crate::store::StoreResult;
use std::fs;
use std::path::PathBuf;

/// Raw payload storage for one app document.
pub trait StorageBackend {
    /// Returns the stored payload, or `None` when nothing was ever written.
    fn read(&self) -> StoreResult<Option<String>>;
    /// Replaces the stored payload.
    fn write(&mut self, payload: &str) -> StoreResult<()>;
}

/// Single-file JSON storage.
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl StorageBackend for FileBackend {
    fn read(&self) -> StoreResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(payload) => Ok(Some(payload)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&mut self, payload: &str) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut tmp = self.path.clone();
        tmp.set_extension("json.tmp");
        fs::write(&tmp, payload)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-memory storage for tests and smoke probes.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    payload: Option<String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts pre-populated, as if a previous session had written `payload`.
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: Some(payload.into()),
        }
    }

    /// Returns the currently stored payload for inspection.
    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self) -> StoreResult<Option<String>> {
        Ok(self.payload.clone())
    }

    fn write(&mut self, payload: &str) -> StoreResult<()> {
        self.payload = Some(payload.to_string());
        Ok(())
    }
}
