//! Picking release IDs out of an aggregator's recommendation.

use crate::error::{ErrorKind, Result};
use crate::index::Index;
use exn::ResultExt;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, instrument, trace};

/// The two recommendation lists an aggregator entry carries.
///
/// Each list is free text holding zero or more release page links, usually
/// one per line. Missing lists are treated as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Candidates {
    #[serde(alias = "bestLinks")]
    pub best_links: String,
    #[serde(alias = "altLinks")]
    pub alt_links: String,
}
impl Candidates {
    pub fn new(best_links: impl Into<String>, alt_links: impl Into<String>) -> Self {
        Self {
            best_links: best_links.into(),
            alt_links: alt_links.into(),
        }
    }

    /// The list that counts: `best_links` whenever it has any content,
    /// otherwise `alt_links`. The lists are never merged.
    pub fn preferred(&self) -> &str {
        if self.best_links.trim().is_empty() {
            &self.alt_links
        } else {
            &self.best_links
        }
    }
}

/// Extracts release IDs from candidate links that point at one index.
#[derive(Debug, Clone)]
pub struct CandidateSelector {
    pattern: Regex,
}
impl CandidateSelector {
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidIndex`] if no link pattern can be built
    /// from the index's base URL.
    pub fn new(index: &Index) -> Result<Self> {
        let host = index.host();
        let (authority, prefix) = host.split_once('/').unwrap_or((host, ""));
        let prefix = if prefix.is_empty() {
            String::new()
        } else {
            format!("/{}", regex::escape(prefix))
        };
        let pattern = format!(
            r"^[<(\[]?https?://(?i:(?:www\.)?{}){}/view/(\d+)(?:[?#/>)\],]|$)",
            regex::escape(authority),
            prefix,
        );
        let pattern = Regex::new(&pattern).or_raise(|| ErrorKind::InvalidIndex(index.base_url().to_string()))?;
        Ok(Self { pattern })
    }

    /// IDs of the releases recommended by an entry, in first-seen order.
    #[instrument(skip_all)]
    pub fn select(&self, candidates: &Candidates) -> Vec<u64> {
        let from_best = !candidates.best_links.trim().is_empty();
        debug!(list = if from_best { "best" } else { "alt" }, "selecting candidates");
        self.ids(candidates.preferred())
    }

    /// Every distinct, well-formed release ID linked from the text.
    ///
    /// Links to other hosts, non-numeric IDs and IDs of zero or beyond
    /// `u64::MAX` are skipped.
    pub fn ids(&self, links: &str) -> Vec<u64> {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        for token in links.split_whitespace() {
            let Some(captures) = self.pattern.captures(token) else {
                trace!(token, "not a release link");
                continue;
            };
            match captures[1].parse::<u64>() {
                Ok(0) | Err(_) => trace!(token, "skipping malformed release ID"),
                Ok(id) => {
                    if seen.insert(id) {
                        ids.push(id);
                    }
                },
            }
        }
        ids
    }
}
