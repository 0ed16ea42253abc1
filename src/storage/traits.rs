// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Serialization failed for key '{key}': {reason}")]
    Serialization { key: String, reason: String },
    #[error("I/O error: {0}")]
    Io(String),
}

/// Origin-scoped persistent key-value port.
///
/// Operations are synchronous and expected to be fast (a map lookup or a
/// small file rewrite). A failing or corrupted store surfaces as an error,
/// or `Ok(None)` for a missing key, so the caller can degrade to fresh
/// state; implementations must not panic.
pub trait StateStore: Send + Sync {
    /// Load the raw value for a key. Missing key is `Ok(None)`.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store the raw value for a key, replacing any prior value.
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
