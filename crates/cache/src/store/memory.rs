//! In-memory metadata store.

use super::{MetadataStore, validate_key};
use crate::RawMetadata;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory metadata store.
///
/// Entries live in a `HashMap` behind a [`RwLock`], so all trait methods
/// can operate on `&self` without external synchronisation.
///
/// # Examples
///
/// ```
/// use sznjd_cache::{MemoryStore, MetadataStore};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::default();
/// assert!(store.get("Nyaa_1").await?.is_none());
/// # Ok(())
/// # }
/// ```
pub struct MemoryStore {
    name: String,
    entries: RwLock<HashMap<String, RawMetadata>>,
}
impl MemoryStore {
    /// Create a store pre-populated with entries.
    ///
    /// Panics if any key fails validation. If test setup is wrong, then the
    /// test should not pass.
    pub fn with_entries(entries: impl IntoIterator<Item = (impl Into<String>, RawMetadata)>) -> Self {
        let mut map = HashMap::new();
        for (key, value) in entries {
            let key = key.into();
            if validate_key(&key).is_err() {
                panic!("MemoryStore::with_entries: invalid key {key}");
            }
            map.insert(key, value);
        }
        Self {
            name: "memory".to_string(),
            entries: RwLock::new(map),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
impl Default for MemoryStore {
    fn default() -> Self {
        let entries: [(String, RawMetadata); 0] = [];
        Self::with_entries(entries)
    }
}

#[async_trait]
impl MetadataStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, key: &str) -> Result<Option<RawMetadata>> {
        let key = validate_key(key)?;
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &RawMetadata) -> Result<()> {
        let key = validate_key(key)?;
        self.entries.write().await.insert(key.to_string(), value.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::metadata;

    #[tokio::test]
    async fn test_get_missing() {
        let store = MemoryStore::default();
        assert_eq!(store.get("Nyaa_1").await.unwrap(), None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let store = MemoryStore::default();
        store.set("Nyaa_1", &metadata(1)).await.unwrap();
        assert_eq!(store.get("Nyaa_1").await.unwrap(), Some(metadata(1)));
        assert_eq!(store.get("Nyaa_2").await.unwrap(), None);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_with_entries() {
        let store = MemoryStore::with_entries([("Nyaa_1", metadata(1)), ("Nyaa_2", metadata(2))]).with_name("seeded");
        assert_eq!(store.name(), "seeded");
        assert_eq!(store.get("Nyaa_2").await.unwrap().map(|m| m.id), Some(2));
    }

    #[tokio::test]
    async fn test_rejects_invalid_key() {
        let store = MemoryStore::default();
        assert!(store.set("../1", &metadata(1)).await.is_err());
        assert!(store.get("").await.is_err());
    }
}
