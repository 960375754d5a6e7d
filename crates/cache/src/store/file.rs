//! Directory-backed metadata store.
//!
//! Each entry is a JSON document named `<key>.json` in the store's root
//! directory, accessed via `tokio::fs` for async I/O.

use super::{MetadataStore, validate_key};
use crate::RawMetadata;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use exn::ResultExt;
use std::fs::create_dir_all as sync_create_dir;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, instrument};

/// Directory-backed metadata store.
///
/// # Examples
///
/// ```no_run
/// use sznjd_cache::FileStore;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = FileStore::new("/var/cache/sznjd")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    name: String,
    root: PathBuf,
}
impl FileStore {
    /// Create a store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not absolute, is not a directory, or
    /// can't be created.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_absolute() {
            exn::bail!(ErrorKind::InvalidDirectory(root));
        }
        if root.exists() {
            if !root.is_dir() {
                exn::bail!(ErrorKind::InvalidDirectory(root));
            }
        } else {
            // Only happens once at startup; not worth an async constructor.
            sync_create_dir(&root).map_err(ErrorKind::Io)?;
        }
        Ok(Self {
            name: "file".to_string(),
            root,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, key: &str) -> Result<PathBuf> {
        Ok(self.root.join(format!("{}.json", validate_key(key)?)))
    }
}

#[async_trait]
impl MetadataStore for FileStore {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(store = %self.name))]
    async fn get(&self, key: &str) -> Result<Option<RawMetadata>> {
        let path = self.path(key)?;
        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == IoErrorKind::NotFound => {
                debug!(path = %path.display(), "no cached entry");
                return Ok(None);
            },
            Err(e) => exn::bail!(ErrorKind::Io(e)),
        };
        let metadata = serde_json::from_slice(&data).or_raise(|| ErrorKind::InvalidData(key.to_string()))?;
        Ok(Some(metadata))
    }

    #[instrument(skip(self, value), fields(store = %self.name))]
    async fn set(&self, key: &str, value: &RawMetadata) -> Result<()> {
        let path = self.path(key)?;
        let data = serde_json::to_vec_pretty(value).or_raise(|| ErrorKind::InvalidData(key.to_string()))?;
        // Write-then-rename, so a concurrent reader never sees half a document.
        let partial = path.with_extension("json.partial");
        fs::write(&partial, data).await.map_err(ErrorKind::Io)?;
        fs::rename(&partial, &path).await.map_err(ErrorKind::Io)?;
        debug!(path = %path.display(), "cached entry written");
        Ok(())
    }
}
