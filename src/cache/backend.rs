//! Storage backends for the response cache.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::RwLock;
use thiserror::Error;
use tracing::warn;

/// Storage-layer failure.
///
/// [`crate::cache::ResponseCache`] never propagates these to its callers;
/// they surface only through `tracing` logs and tests that exercise a
/// backend directly.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Pluggable key/value medium underneath a [`crate::cache::ResponseCache`].
///
/// Implementations store opaque string values under string keys. All
/// operations are synchronous: the cache runs each call to completion on
/// the calling thread, and assumes no concurrent writers to the same
/// medium (read-modify-write sequences are not atomic across contexts).
pub trait CacheBackend: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&self, key: &str) -> StoreResult<()>;
    /// Every key currently present, in no particular order.
    fn keys(&self) -> StoreResult<Vec<String>>;
    fn name(&self) -> &'static str;
}

/// In-memory backend for tests and ephemeral sessions.
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheBackend for MemoryBackend {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        Ok(entries.keys().cloned().collect())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Persistent backend: one JSON object file mapping keys to values.
///
/// The whole map is loaded on open and rewritten on every mutation.
/// Entries are small text records and the capacity bound keeps the file
/// in the tens of kilobytes, so a single file is the simplest durable
/// medium that survives process restarts.
pub struct JsonFileBackend {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl JsonFileBackend {
    /// Open a store at `path`, loading any existing contents. A missing
    /// file starts empty; a corrupted one is logged and starts empty as
    /// well, so a damaged store degrades to a cold cache instead of a
    /// persistent failure.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(map) => map,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "corrupted cache file, starting empty");
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Open the store at the default per-user location.
    pub fn open_default() -> StoreResult<Self> {
        Self::open(Self::default_path()?)
    }

    /// Default store location under the platform data directory.
    pub fn default_path() -> StoreResult<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join("styletalk").join("response_cache.json"))
            .ok_or_else(|| StoreError::Unavailable("no platform data directory".into()))
    }

    fn persist(&self, entries: &HashMap<String, String>) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string(entries)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl CacheBackend for JsonFileBackend {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        Ok(entries.keys().cloned().collect())
    }

    fn name(&self) -> &'static str {
        "json_file"
    }
}
