//! The release record handed to downstream consumers.

use crate::error::{ErrorKind, Result};
use crate::index::Index;
use exn::ResultExt;
use serde::Serialize;
use sznjd_cache::RawMetadata;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseKind {
    #[default]
    Torrent,
}

/// A resolved release: its final title plus the link, swarm and content
/// metadata of the torrent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Release {
    pub title: String,
    pub link: String,
    pub download_url: String,
    pub seeders: u64,
    pub leechers: u64,
    pub infohash: String,
    /// Bytes.
    pub size: u64,
    pub files: u64,
    #[serde(with = "time::serde::rfc3339")]
    pub published: OffsetDateTime,
    /// Completed downloads.
    pub grabs: u64,
    pub kind: ReleaseKind,
}
impl Release {
    /// Builds the record for scraped metadata under its final title.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidRecord`] if the size or date can't be
    /// parsed.
    pub fn assemble(index: &Index, metadata: &RawMetadata, title: String) -> Result<Self> {
        let id = metadata.id;
        let size = sznjd_extract::parse_size(&metadata.size).or_raise(|| ErrorKind::InvalidRecord { id, field: "size" })?;
        let published =
            sznjd_extract::parse_timestamp(&metadata.date).or_raise(|| ErrorKind::InvalidRecord { id, field: "date" })?;
        Ok(Self {
            title,
            link: index.view_url(id),
            download_url: index.download_url(id),
            seeders: metadata.seeders,
            leechers: metadata.leechers,
            infohash: metadata.infohash.clone(),
            size,
            files: metadata.files,
            published,
            grabs: metadata.completed,
            kind: ReleaseKind::Torrent,
        })
    }

    /// Seconds since the Unix epoch.
    pub fn published_unix(&self) -> i64 {
        self.published.unix_timestamp()
    }
}
