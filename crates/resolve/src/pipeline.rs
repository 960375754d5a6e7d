//! Candidate links in, release records out.

use crate::candidates::{CandidateSelector, Candidates};
use crate::error::Result;
use crate::fetch::{MetadataFetcher, SourceHandle};
use crate::index::Index;
use crate::overrides::OverrideTable;
use crate::release::Release;
use futures::future::join_all;
use sznjd_cache::{RawMetadata, StoreHandle};
use sznjd_config::{Config, FailureMode};
use sznjd_extract::Normalizer;
use tracing::{debug, info, instrument, warn};

/// Resolves an aggregator entry's recommendations into [`Release`]s.
///
/// Each selected ID is fetched (cache first), titled (override first,
/// normalized otherwise) and assembled. Fetches for one entry run
/// concurrently; results keep the order the IDs were selected in.
pub struct ReleasePipeline {
    selector: CandidateSelector,
    fetcher: MetadataFetcher,
    overrides: OverrideTable,
    normalizer: Normalizer,
    failure_mode: FailureMode,
}
impl ReleasePipeline {
    pub fn new(index: Index, store: StoreHandle, source: SourceHandle, overrides: OverrideTable) -> Result<Self> {
        Ok(Self {
            selector: CandidateSelector::new(&index)?,
            fetcher: MetadataFetcher::new(index, store, source),
            overrides,
            normalizer: Normalizer::default(),
            failure_mode: FailureMode::default(),
        })
    }

    /// Builds a pipeline for the configured index, title format and failure
    /// mode.
    pub fn from_config(
        config: &Config,
        store: StoreHandle,
        source: SourceHandle,
        overrides: OverrideTable,
    ) -> Result<Self> {
        Ok(Self::new(Index::from(&config.index), store, source, overrides)?
            .with_normalizer(Normalizer::new(config.title_format))
            .with_failure_mode(config.failure_mode))
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_failure_mode(mut self, failure_mode: FailureMode) -> Self {
        self.failure_mode = failure_mode;
        self
    }

    pub fn index(&self) -> &Index {
        self.fetcher.index()
    }

    pub fn selector(&self) -> &CandidateSelector {
        &self.selector
    }

    /// The title a release is published under: its override if one exists,
    /// otherwise its normalized scraped title.
    pub fn title_for(&self, metadata: &RawMetadata) -> String {
        match self.overrides.get(metadata.id) {
            Some(title) => {
                debug!(id = metadata.id, "using title override");
                title.to_string()
            },
            None => self.normalizer.normalize(&metadata.title),
        }
    }

    /// Resolves a single release ID.
    #[instrument(skip(self))]
    pub async fn resolve_id(&self, id: u64) -> Result<Release> {
        let metadata = self.fetcher.fetch(id).await?;
        let title = self.title_for(&metadata);
        Release::assemble(self.index(), &metadata, title)
    }

    /// Resolves every selected release, keeping each outcome.
    ///
    /// All fetches are allowed to settle, whatever the others do.
    #[instrument(skip_all)]
    pub async fn resolve_each(&self, candidates: &Candidates) -> Vec<(u64, Result<Release>)> {
        let ids = self.selector.select(candidates);
        debug!(count = ids.len(), "resolving releases");
        let outcomes = join_all(ids.iter().map(|&id| self.resolve_id(id))).await;
        ids.into_iter().zip(outcomes).collect()
    }

    /// Resolves an aggregator entry according to the pipeline's
    /// [`FailureMode`].
    ///
    /// An entry whose preferred list yields no IDs resolves to no releases.
    ///
    /// # Errors
    ///
    /// With [`FailureMode::AllOrNothing`], the first failure (in selection
    /// order) once every fetch has settled. [`FailureMode::Isolated`] never
    /// fails; failed releases are logged and left out.
    #[instrument(skip_all, fields(mode = ?self.failure_mode))]
    pub async fn resolve(&self, candidates: &Candidates) -> Result<Vec<Release>> {
        let outcomes = self.resolve_each(candidates).await;
        let mut releases = Vec::with_capacity(outcomes.len());
        for (id, outcome) in outcomes {
            match (outcome, self.failure_mode) {
                (Ok(release), _) => releases.push(release),
                (Err(err), FailureMode::AllOrNothing) => return Err(err),
                (Err(err), FailureMode::Isolated) => warn!(id, error = ?err, "skipping release"),
            }
        }
        info!(count = releases.len(), "resolved releases");
        Ok(releases)
    }
}
