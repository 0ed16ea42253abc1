use dashmap::DashMap;
use super::traits::{StateStore, StorageError};

pub struct MemoryStore {
    data: DashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
        }
    }

    /// Get current key count
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Clear all keys
    pub fn clear(&self) {
        self.data.clear();
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.data.get(key).map(|r| r.value().clone()))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.data.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_is_empty() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_save_and_load() {
        let store = MemoryStore::new();

        store.save("visitor", r#"{"visitorId":"v-1"}"#).unwrap();

        let result = store.load("visitor").unwrap();
        assert_eq!(result.as_deref(), Some(r#"{"visitorId":"v-1"}"#));
    }

    #[test]
    fn test_load_missing_returns_none() {
        let store = MemoryStore::new();

        let result = store.load("nonexistent").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_save_overwrites() {
        let store = MemoryStore::new();

        store.save("key", "first").unwrap();
        store.save("key", "second").unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.load("key").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_remove() {
        let store = MemoryStore::new();

        store.save("key", "value").unwrap();
        assert_eq!(store.len(), 1);

        store.remove("key").unwrap();
        assert_eq!(store.len(), 0);
        assert!(store.load("key").unwrap().is_none());
    }

    #[test]
    fn test_remove_missing_is_ok() {
        let store = MemoryStore::new();

        // Should not error
        assert!(store.remove("nonexistent").is_ok());
    }

    #[test]
    fn test_clear() {
        let store = MemoryStore::new();

        for i in 0..5 {
            store.save(&format!("key-{}", i), "value").unwrap();
        }
        assert_eq!(store.len(), 5);

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_default_trait() {
        let store = MemoryStore::default();
        assert!(store.is_empty());
    }
}
