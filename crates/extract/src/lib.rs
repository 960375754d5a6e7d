//! Extraction for the release resolution pipeline.
//!
//! - [`Extractor`] turns a release page of the torrent index into
//!   [`RawMetadata`](models::RawMetadata).
//! - [`Normalizer`] turns a free-text release title into a canonical title.
//! - [`parse_size`] and [`parse_timestamp`] convert the page's display values.

mod consts;
mod date;
pub mod error;
mod extract;
pub mod models;
pub mod normalize;
mod size;

pub use crate::date::{format_timestamp, parse_timestamp};
pub use crate::extract::{Extractor, extract, is_valid};
pub use crate::normalize::{Normalizer, TitleFormat};
pub use crate::size::parse_size;
