//! Metadata store trait and implementations.

mod file;
mod memory;

pub use self::file::FileStore;
pub use self::memory::MemoryStore;
use crate::RawMetadata;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;

/// Get/set contract for cached release metadata.
///
/// Entries are written once per key and never mutated afterwards, so
/// implementations need no coordination between concurrent callers working
/// on different keys.
///
/// # Examples
///
/// ```
/// use sznjd_cache::{MetadataStore, error::Result};
///
/// async fn is_cached(store: &dyn MetadataStore, id: u64) -> Result<bool> {
///     Ok(store.get(&format!("Nyaa_{id}")).await?.is_some())
/// }
/// ```
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Name of the store, for logging only.
    fn name(&self) -> &str;

    /// Fetch the metadata cached under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<RawMetadata>>;

    /// Cache `value` under `key`, replacing whatever was there.
    async fn set(&self, key: &str, value: &RawMetadata) -> Result<()>;
}

/// Validates a cache key: non-empty ASCII alphanumerics, `_` and `-` only.
///
/// ```
/// use sznjd_cache::validate_key;
/// assert!(validate_key("Nyaa_1234567").is_ok());
/// assert!(validate_key("../etc/passwd").is_err());
/// ```
pub fn validate_key(key: &str) -> Result<&str> {
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        exn::bail!(ErrorKind::InvalidKey(key.to_string()));
    }
    Ok(key)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn metadata(id: u64) -> RawMetadata {
        RawMetadata {
            id,
            title: format!("[Group] Show {id} (1080p) [BD FLAC]"),
            date: "2023-01-15 12:34 UTC".to_string(),
            seeders: 10,
            leechers: 1,
            size: "1.5 GiB".to_string(),
            completed: 100,
            infohash: "0123456789abcdef0123456789abcdef01234567".to_string(),
            files: 12,
        }
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("Nyaa_1").is_ok());
        assert!(validate_key("some-provider_99").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("Nyaa 1").is_err());
        assert!(validate_key("Nyaa/1").is_err());
        assert!(validate_key("..").is_err());
    }
}
