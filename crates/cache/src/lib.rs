//! Metadata cache for scraped release pages.
//!
//! Scraping is the slow, rate-limited part of resolving a release, and a
//! release page's metadata is treated as immutable once scraped. Stores keep
//! [`RawMetadata`] keyed by `<provider>_<id>` so that each page is only ever
//! fetched once. Eviction, if any, is the store's own business.
//!
//! - [`MemoryStore`]: process-local, for tests and one-shot runs.
//! - [`FileStore`]: one JSON document per key in a directory.

pub mod error;
mod store;

pub use crate::store::{FileStore, MemoryStore, MetadataStore, validate_key};
use std::sync::Arc;

pub type RawMetadata = sznjd_extract::models::RawMetadata;
pub type StoreHandle = Arc<dyn MetadataStore + Send + Sync>;
