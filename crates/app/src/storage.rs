//! Local key-value storage.
//!
//! The storefront keeps a handful of small JSON documents on the client: the
//! guest cart and the signed-in session. Each lives under a fixed key and is
//! always read and written whole.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use serde::Serialize;
use thiserror::Error;
use tokio::{fs, sync::Mutex};

/// Failure reading or writing a stored document.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read `{key}`")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write `{key}`")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode document")]
    Encode(#[from] serde_json::Error),
}

/// String-keyed document storage, the client-side counterpart of browser
/// local storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key` in a single write.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Encode `value` as JSON and store it under `key`. Nothing is written when
/// encoding fails.
///
/// # Errors
///
/// Returns [`StorageError::Encode`] when `value` has no JSON form, or the
/// store's write error.
pub async fn set_json<T>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError>
where
    T: Serialize + ?Sized + Sync,
{
    let json = serde_json::to_string(value)?;

    store.set(key, &json).await
}

/// Process-local store, used when nothing needs to outlive the process.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<FxHashMap<String, String>>,
}

impl MemoryKeyValueStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().await.remove(key);

        Ok(())
    }
}

/// Directory of one file per key.
///
/// Writes go to a sibling temporary file that is renamed over the target, so
/// a reader never observes a half-written document. Concurrent writers are not
/// coordinated: the last rename wins.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();

        self.dir.join(format!("{file_name}.json"))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(source) if source.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read {
                key: key.to_string(),
                source,
            }),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let write_error = |source| StorageError::Write {
            key: key.to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).await.map_err(write_error)?;

        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");

        fs::write(&staging, value).await.map_err(write_error)?;
        fs::rename(&staging, &path).await.map_err(write_error)?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(source) if source.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Write {
                key: key.to_string(),
                source,
            }),
        }
    }
}
