/// Metadata scraped from a single release page on the torrent index.
///
/// Counts and strings are kept as the index displays them; unit and date
/// conversion happen when a release record is assembled, so that cached
/// entries stay a faithful copy of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawMetadata {
    /// Numeric item ID on the index
    pub id: u64,
    /// Release title as authored by the uploader
    pub title: String,
    /// Upload timestamp, e.g. `2023-01-15 12:34 UTC`
    pub date: String,
    pub seeders: u64,
    pub leechers: u64,
    /// Human-readable size, e.g. `1.5 GiB`
    pub size: String,
    /// Number of completed downloads
    pub completed: u64,
    /// Lower-case, 40 hex character BitTorrent v1 infohash
    pub infohash: String,
    /// Number of entries in the torrent's file list
    pub files: u64,
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn test_cache_payload_shape() {
        let metadata = RawMetadata {
            id: 42,
            title: "[G] Show (1080p)".to_string(),
            date: "2023-01-15 12:34 UTC".to_string(),
            seeders: 1,
            leechers: 2,
            size: "1.5 GiB".to_string(),
            completed: 3,
            infohash: "0123456789abcdef0123456789abcdef01234567".to_string(),
            files: 4,
        };
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["id"], 42);
        assert_eq!(json["size"], "1.5 GiB");
        let back: RawMetadata = serde_json::from_value(json).unwrap();
        assert_eq!(back, metadata);
    }
}
