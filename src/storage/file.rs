// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Durable JSON-file store.
//!
//! The Rust analog of an origin-scoped browser store: one small JSON object
//! on disk holding every key. Saves rewrite the whole file, so concurrent
//! processes sharing a path resolve to last-write-wins, the same eventual
//! consistency the engine accepts for concurrent tabs.
//!
//! A missing, unreadable, or malformed file behaves as an empty store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::debug;

use super::traits::{StateStore, StorageError};

pub struct JsonFileStore {
    path: PathBuf,
    /// In-process view of the file contents. Reloaded once at open;
    /// external writers are not watched (last-write-wins).
    cache: Mutex<HashMap<String, String>>,
}

impl JsonFileStore {
    /// Open a store at the given path, loading any existing contents.
    ///
    /// Corrupted or unreadable contents are discarded and treated as an
    /// empty store rather than surfacing an error.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let cache = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<HashMap<String, String>>(&raw) {
                Ok(map) => map,
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Store file corrupted, starting fresh");
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Store file unreadable, starting fresh");
                HashMap::new()
            }
        };

        Self {
            path,
            cache: Mutex::new(cache),
        }
    }

    /// Rewrite the whole file from the in-process view.
    fn flush(&self, cache: &HashMap<String, String>) -> Result<(), StorageError> {
        let raw = serde_json::to_string(cache).map_err(|e| StorageError::Serialization {
            key: String::new(),
            reason: e.to_string(),
        })?;
        std::fs::write(&self.path, raw).map_err(|e| StorageError::Io(e.to_string()))
    }
}

impl StateStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.cache.lock().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut cache = self.cache.lock();
        cache.insert(key.to_string(), value.to_string());
        self.flush(&cache)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut cache = self.cache.lock();
        if cache.remove(key).is_some() {
            self.flush(&cache)?;
        }
        Ok(())
    }
}
