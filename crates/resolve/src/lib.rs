//! Resolution of aggregator recommendations into torrent releases.
//!
//! An aggregator entry recommends releases as lists of index links. The
//! [`ReleasePipeline`] picks the IDs out of those links
//! ([`CandidateSelector`]), retrieves each release's metadata through the
//! cache ([`MetadataFetcher`]), settles on a title ([`OverrideTable`] first,
//! normalized scraped title otherwise) and assembles a [`Release`].

mod candidates;
pub mod error;
mod fetch;
mod index;
mod overrides;
mod pipeline;
mod release;

pub use crate::candidates::{CandidateSelector, Candidates};
pub use crate::fetch::{HttpPageSource, MetadataFetcher, PageSource, SourceHandle};
pub use crate::index::Index;
pub use crate::overrides::OverrideTable;
pub use crate::pipeline::ReleasePipeline;
pub use crate::release::{Release, ReleaseKind};
pub use sznjd_config::FailureMode;
