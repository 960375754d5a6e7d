//! Configuration for sznjd.
//!
//! Values are layered with [figment], later sources overriding earlier ones:
//!
//! 1. Built-in defaults ([`Config::default`]).
//! 2. A TOML file: either given explicitly, or `config.toml` in the
//!    platform's configuration directory if it exists.
//! 3. Environment variables prefixed with `SZNJD_`, using `__` to reach
//!    nested keys (`SZNJD_INDEX__BASE_URL=https://nyaa.si`).
//!
//! ```toml
//! title_format = "descriptive"   # descriptive | compact | compact-skip-empty
//! failure_mode = "all-or-nothing" # all-or-nothing | isolated
//! overrides = "/etc/sznjd/overrides.json"
//!
//! [index]
//! name = "Nyaa"
//! base_url = "https://nyaa.si"
//!
//! [cache]
//! backend = "file" # memory | file
//! dir = "/var/cache/sznjd"
//! ```

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
pub use sznjd_extract::TitleFormat;
use tracing::instrument;

pub const ENV_PREFIX: &str = "SZNJD_";
const CONFIG_FILE: &str = "config.toml";

/// How the pipeline treats a release that fails to resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureMode {
    /// One failed release fails the whole batch.
    #[default]
    AllOrNothing,
    /// Failed releases are logged and left out of the result.
    Isolated,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheBackend {
    #[default]
    Memory,
    File,
}

/// The torrent index releases are resolved against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Provider name; prefixes cache keys.
    pub name: String,
    pub base_url: String,
    pub user_agent: String,
}
impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            name: "Nyaa".to_string(),
            base_url: "https://nyaa.si".to_string(),
            user_agent: concat!("sznjd/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
impl IndexConfig {
    /// Base URL without any trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    /// Directory for the file backend; defaults to the platform cache directory.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub index: IndexConfig,
    pub title_format: TitleFormat,
    pub failure_mode: FailureMode,
    /// JSON file mapping release IDs to manually curated titles.
    pub overrides: Option<PathBuf>,
    pub cache: CacheConfig,
}
impl Config {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "sznjd")
    }

    /// `config.toml` in the platform configuration directory.
    pub fn default_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// The layered providers, before extraction.
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path.map(Path::to_path_buf).or_else(Self::default_path) {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Loads and validates the configuration.
    ///
    /// An explicit `path` must exist; the default path is optional.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path
            && !path.is_file()
        {
            exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
        }
        Self::from_figment(Self::figment(path))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        tracing::debug!(index = %config.index.base_url(), format = %config.title_format, "configuration loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let base_url = self.index.base_url();
        let host = base_url.strip_prefix("https://").or_else(|| base_url.strip_prefix("http://"));
        if host.is_none_or(|host| host.is_empty()) {
            exn::bail!(ErrorKind::Invalid {
                field: "index.base_url",
                reason: format!("expected an http(s) URL, found '{}'", self.index.base_url),
            });
        }
        let name = &self.index.name;
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            exn::bail!(ErrorKind::Invalid {
                field: "index.name",
                reason: format!("expected ASCII letters, digits or '-', found '{name}'"),
            });
        }
        Ok(())
    }

    /// Directory for the file cache backend.
    pub fn cache_dir(&self) -> Option<PathBuf> {
        self.cache
            .dir
            .clone()
            .or_else(|| Self::project_dirs().map(|dirs| dirs.cache_dir().to_path_buf()))
    }
}
