//! Cache-first retrieval of release metadata.

use crate::error::{ErrorKind, Result};
use crate::index::Index;
use async_trait::async_trait;
use exn::ResultExt;
use std::sync::Arc;
use sznjd_cache::{RawMetadata, StoreHandle};
use tracing::{debug, instrument};

pub type SourceHandle = Arc<dyn PageSource + Send + Sync>;

/// Where release pages come from.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Returns the HTML body of the page at `url`.
    async fn fetch_page(&self, url: &str) -> Result<String>;
}

/// Fetches pages over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: reqwest::Client,
}
impl HttpPageSource {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .or_raise(|| ErrorKind::HttpClient)?;
        Ok(Self { client })
    }
}
#[async_trait]
impl PageSource for HttpPageSource {
    #[instrument(skip(self))]
    async fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .or_raise(|| ErrorKind::Transport(url.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            exn::bail!(ErrorKind::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().await.or_raise(|| ErrorKind::Transport(url.to_string()))
    }
}

/// Returns release metadata from the store when present, scraping (and then
/// storing) it otherwise.
pub struct MetadataFetcher {
    index: Index,
    store: StoreHandle,
    source: SourceHandle,
}
impl MetadataFetcher {
    pub fn new(index: Index, store: StoreHandle, source: SourceHandle) -> Self {
        Self { index, store, source }
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    /// # Errors
    ///
    /// - [`ErrorKind::Store`] if the store can't be read or written
    /// - [`ErrorKind::Transport`] or [`ErrorKind::Status`] if the page can't
    ///   be retrieved
    /// - [`ErrorKind::MalformedPage`] if the page isn't a release page
    #[instrument(skip(self), fields(provider = self.index.name()))]
    pub async fn fetch(&self, id: u64) -> Result<RawMetadata> {
        let key = self.index.cache_key(id);
        let store = || ErrorKind::Store(self.store.name().to_string());
        if let Some(metadata) = self.store.get(&key).await.or_raise(store)? {
            debug!(key, "cache hit");
            return Ok(metadata);
        }
        debug!(key, "cache miss");
        let html = self.source.fetch_page(&self.index.view_url(id)).await?;
        let metadata = sznjd_extract::extract(&html, id).or_raise(|| ErrorKind::MalformedPage(id))?;
        self.store.set(&key, &metadata).await.or_raise(store)?;
        Ok(metadata)
    }
}
