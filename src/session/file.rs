//! Token persistence in a JSON document on disk
//!
//! The document plays the role browser local storage plays for a web page:
//! a flat map of keys to string values that survives restarts. It lives in
//! the user data directory unless a path is configured.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{ItineraError, Result};
use crate::session::TokenPersistence;

/// File name used inside the data directory
const STORAGE_FILE_NAME: &str = "local_storage.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct StorageDocument {
    #[serde(default)]
    entries: BTreeMap<String, StoredValue>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredValue {
    value: String,
    updated_at: DateTime<Utc>,
}

/// Key/value store persisted as a JSON file.
///
/// The whole document is rewritten on every change through a sibling
/// temporary file and a rename, so readers never see a partial document. A
/// mutex serializes writers within the process; concurrent writers in
/// separate processes are last-writer-wins.
///
/// A document that cannot be parsed is reported by [`TokenPersistence::get`]
/// but never blocks a write: it is moved aside to `<name>.bak` and replaced.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileTokenStore {
    /// Create a store in the default data directory.
    ///
    /// # Errors
    ///
    /// Returns [`ItineraError::Storage`] if the platform data directory
    /// cannot be determined.
    pub fn new() -> Result<Self> {
        let proj_dirs = ProjectDirs::from("com", "itinera", "itinera")
            .ok_or_else(|| ItineraError::Storage("Could not determine data directory".into()))?;
        Ok(Self::with_path(proj_dirs.data_dir().join(STORAGE_FILE_NAME)))
    }

    /// Create a store at an explicit path.
    ///
    /// # Examples
    ///
    /// ```
    /// use itinera::session::{FileTokenStore, TokenPersistence};
    ///
    /// let dir = tempfile::TempDir::new().unwrap();
    /// let store = FileTokenStore::with_path(dir.path().join("storage.json"));
    /// store.set("token", "abc123").unwrap();
    /// assert_eq!(store.get("token").unwrap().as_deref(), Some("abc123"));
    /// ```
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<StorageDocument> {
        if !self.path.exists() {
            return Ok(StorageDocument::default());
        }
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(StorageDocument::default());
        }
        serde_json::from_str(&contents).map_err(|e| {
            ItineraError::Storage(format!(
                "Failed to parse {}: {}",
                self.path.display(),
                e
            ))
            .into()
        })
    }

    /// Document to apply a change to. An unreadable document is set aside.
    fn document_for_write(&self) -> Result<StorageDocument> {
        match self.read_document() {
            Ok(document) => Ok(document),
            Err(e) if matches!(e.downcast_ref::<ItineraError>(), Some(ItineraError::Storage(_))) => {
                let backup = self.sibling("bak");
                tracing::warn!(
                    path = %self.path.display(),
                    backup = %backup.display(),
                    error = %e,
                    "Session storage is corrupt; starting a new document"
                );
                std::fs::rename(&self.path, &backup)
                    .with_context(|| format!("Failed to move aside {}", self.path.display()))?;
                Ok(StorageDocument::default())
            }
            Err(e) => Err(e),
        }
    }

    fn sibling(&self, extension: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| STORAGE_FILE_NAME.into());
        name.push(".");
        name.push(extension);
        self.path.with_file_name(name)
    }

    fn write_document(&self, document: &StorageDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create parent directory for session storage")?;
        }
        let json = serde_json::to_string_pretty(document)?;
        let temp = self.sibling("tmp");
        std::fs::write(&temp, json)
            .with_context(|| format!("Failed to write {}", temp.display()))?;
        std::fs::rename(&temp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }

    fn modify(&self, change: impl FnOnce(&mut StorageDocument)) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| ItineraError::Storage("file store lock poisoned".to_string()))?;
        let mut document = self.document_for_write()?;
        change(&mut document);
        self.write_document(&document)
    }
}

impl TokenPersistence for FileTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .read_document()?
            .entries
            .remove(key)
            .map(|stored| stored.value))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.modify(|document| {
            document.entries.insert(
                key.to_string(),
                StoredValue {
                    value: value.to_string(),
                    updated_at: Utc::now(),
                },
            );
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        self.modify(|document| {
            document.entries.remove(key);
        })
    }
}
