//! The durable credential record.
//!
//! Three well-known keys survive restarts: the raw credential string
//! (`token`), the subject id (`userId`), and the lowercased role string
//! (`usertype`). They are one record: all three are present together or all
//! absent, and no completed operation may leave a partial record behind.
//! Logout in particular clears all three in one step from the caller's
//! perspective.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use campus_core::{Role, SubjectId};

/// Errors from the durable credential store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store could not be read or written.
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),
    /// The stored record is not a valid JSON document.
    #[error("stored record is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// The persisted credential record.
///
/// Field names are the wire-compatible storage keys inherited from the
/// portal's original client; the role is stored in its lowercased form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Raw credential string.
    pub token: String,
    /// Subject id of the credential's owner.
    #[serde(rename = "userId")]
    pub subject_id: SubjectId,
    /// Lowercased role string.
    #[serde(rename = "usertype")]
    pub role: String,
}

impl CredentialRecord {
    /// Build a record from its parts, lowercasing the role.
    #[must_use]
    pub fn new(token: String, subject_id: SubjectId, role: Role) -> Self {
        Self {
            token,
            subject_id,
            role: role.as_str().to_owned(),
        }
    }
}

/// Durable storage for the credential record.
///
/// Implementations persist the record as a unit: `save` and `clear` must never
/// expose a state where only some of the keys exist. The store is the one
/// resource shared across independent processes; no cross-process
/// synchronization is provided - each session store diverges from disk until
/// its own rehydration.
pub trait CredentialStore: Send + Sync {
    /// Load the record, or `None` if no credential is persisted.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be read or holds
    /// a corrupt document.
    fn load(&self) -> Result<Option<CredentialRecord>, StorageError>;

    /// Persist the whole record, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the record cannot be written.
    fn save(&self, record: &CredentialRecord) -> Result<(), StorageError>;

    /// Remove the record entirely. Clearing an absent record is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be modified.
    fn clear(&self) -> Result<(), StorageError>;
}

/// File-backed credential store.
///
/// The record is one JSON document. Writes go through a sibling temp file and
/// a rename, so a reader never observes a torn record.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Create a store over the given path. The parent directory is created
    /// lazily on first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path this store persists to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<CredentialRecord>, StorageError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn save(&self, record: &CredentialRecord) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(record)?;
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory credential store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    record: Mutex<Option<CredentialRecord>>,
}

impl MemoryCredentialStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<CredentialRecord>, StorageError> {
        Ok(self.record.lock().map_or(None, |guard| guard.clone()))
    }

    fn save(&self, record: &CredentialRecord) -> Result<(), StorageError> {
        if let Ok(mut guard) = self.record.lock() {
            *guard = Some(record.clone());
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        if let Ok(mut guard) = self.record.lock() {
            *guard = None;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CredentialRecord {
        CredentialRecord::new("h.p.s".to_owned(), SubjectId::new(7), Role::Student)
    }

    #[test]
    fn test_record_lowercases_role() {
        let record = CredentialRecord::new("t".to_owned(), SubjectId::new(1), Role::Administrator);
        assert_eq!(record.role, "administrador");
    }

    #[test]
    fn test_record_wire_keys() {
        let json = serde_json::to_value(sample()).expect("serialize");
        assert!(json.get("token").is_some());
        assert!(json.get("userId").is_some());
        assert!(json.get("usertype").is_some());
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileCredentialStore::new(dir.path().join("credentials.json"));

        assert!(store.load().expect("load empty").is_none());
        store.save(&sample()).expect("save");
        assert_eq!(store.load().expect("load"), Some(sample()));
        store.clear().expect("clear");
        assert!(store.load().expect("load cleared").is_none());
    }

    #[test]
    fn test_file_store_clear_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileCredentialStore::new(dir.path().join("credentials.json"));
        store.clear().expect("clear absent record");
        store.clear().expect("clear again");
    }

    #[test]
    fn test_file_store_corrupt_record_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, b"not json").expect("write junk");
        let store = FileCredentialStore::new(path);
        assert!(matches!(store.load(), Err(StorageError::Corrupt(_))));
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryCredentialStore::new();
        assert!(store.load().expect("empty").is_none());
        store.save(&sample()).expect("save");
        assert_eq!(store.load().expect("load"), Some(sample()));
        store.clear().expect("clear");
        assert!(store.load().expect("cleared").is_none());
    }
}
