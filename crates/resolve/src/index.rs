//! Links into the torrent index.

use sznjd_config::IndexConfig;

/// A torrent index: where release pages live and what its cache keys are
/// prefixed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    name: String,
    base_url: String,
}
impl Index {
    pub fn new(name: impl Into<String>, base_url: impl AsRef<str>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.as_ref().trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Host (and any path prefix) of the base URL, without the scheme.
    pub fn host(&self) -> &str {
        self.base_url
            .split_once("://")
            .map_or(self.base_url.as_str(), |(_, rest)| rest)
    }

    pub fn view_url(&self, id: u64) -> String {
        format!("{}/view/{id}", self.base_url)
    }

    pub fn download_url(&self, id: u64) -> String {
        format!("{}/download/{id}.torrent", self.base_url)
    }

    /// Key under which a release's scraped metadata is stored.
    pub fn cache_key(&self, id: u64) -> String {
        format!("{}_{id}", self.name)
    }
}
impl From<&IndexConfig> for Index {
    fn from(config: &IndexConfig) -> Self {
        Self::new(config.name.clone(), config.base_url())
    }
}
impl Default for Index {
    fn default() -> Self {
        Self::from(&IndexConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links() {
        let index = Index::default();
        assert_eq!(index.view_url(1234567), "https://nyaa.si/view/1234567");
        assert_eq!(index.download_url(1234567), "https://nyaa.si/download/1234567.torrent");
        assert_eq!(index.cache_key(1234567), "Nyaa_1234567");
        assert_eq!(index.host(), "nyaa.si");
    }

    #[test]
    fn test_trailing_slash_is_dropped() {
        let index = Index::new("Mirror", " http://mirror.example/nyaa/ ");
        assert_eq!(index.base_url(), "http://mirror.example/nyaa");
        assert_eq!(index.host(), "mirror.example/nyaa");
        assert_eq!(index.view_url(5), "http://mirror.example/nyaa/view/5");
    }
}
