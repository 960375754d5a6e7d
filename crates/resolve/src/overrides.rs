//! Manually curated titles that replace the normalized title of a release.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, instrument, warn};

/// Release ID to title, stored on disk as a flat JSON object keyed by the
/// stringified ID.
///
/// ```json
/// { "1234567": "[Group] Show S01 1080p BluRay" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideTable {
    titles: HashMap<String, String>,
}
impl OverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the table from a JSON file.
    ///
    /// A missing, unreadable or malformed file never stops the pipeline: the
    /// problem is logged and an empty table is returned.
    #[instrument]
    pub async fn load(path: &Path) -> Self {
        match Self::try_load(path).await {
            Ok(table) => {
                debug!(entries = table.len(), "loaded title overrides");
                table
            },
            Err(err) => {
                warn!(error = ?err, "continuing without title overrides");
                Self::new()
            },
        }
    }

    /// Loads the table from a JSON file, reporting why it can't be used.
    pub async fn try_load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).await.or_raise(|| ErrorKind::Overrides(path.to_path_buf()))?;
        Self::from_json(&json).or_raise(|| ErrorKind::Overrides(path.to_path_buf()))
    }

    /// Parses a JSON object of string IDs to string titles.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let titles: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(Self { titles })
    }

    pub fn get(&self, id: u64) -> Option<&str> {
        self.titles.get(&id.to_string()).map(String::as_str)
    }

    /// Adds or replaces the override for a release, returning the previous
    /// title if there was one.
    pub fn insert(&mut self, id: u64, title: impl Into<String>) -> Option<String> {
        self.titles.insert(id.to_string(), title.into())
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Serializes the table as pretty-printed JSON with sorted keys.
    pub fn to_json(&self) -> String {
        let sorted: BTreeMap<&str, &str> = self.titles.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        // A map of strings to strings always serializes.
        serde_json::to_string_pretty(&sorted).unwrap_or_default()
    }

    /// Writes the table to a JSON file, replacing it.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let mut json = self.to_json();
        json.push('\n');
        let failed = || ErrorKind::Overrides(path.to_path_buf());
        // Write-then-rename, so an interrupted save leaves the old file intact.
        let partial = partial_path(path);
        fs::write(&partial, json).await.or_raise(failed)?;
        fs::rename(&partial, path).await.or_raise(failed)
    }

    /// Records a single override in a file: the existing table is read,
    /// updated and written back.
    ///
    /// A file that isn't JSON at all is started over. A file that can't be
    /// read, or that is JSON of the wrong shape, is an error and left
    /// untouched.
    #[instrument]
    pub async fn record(path: &Path, id: u64, title: &str) -> Result<Option<String>> {
        let mut table = match fs::read_to_string(path).await {
            Ok(json) => match Self::from_json(&json) {
                Ok(table) => table,
                Err(err) if err.is_syntax() || err.is_eof() => {
                    warn!(error = %err, "override file is not JSON, starting over");
                    Self::new()
                },
                Err(err) => return Err(err).or_raise(|| ErrorKind::Overrides(path.to_path_buf())),
            },
            Err(err) if err.kind() == IoErrorKind::NotFound => Self::new(),
            Err(err) => return Err(err).or_raise(|| ErrorKind::Overrides(path.to_path_buf())),
        };
        let previous = table.insert(id, title);
        table.save(path).await?;
        Ok(previous)
    }
}
impl FromIterator<(u64, String)> for OverrideTable {
    fn from_iter<T: IntoIterator<Item = (u64, String)>>(iter: T) -> Self {
        Self {
            titles: iter.into_iter().map(|(id, title)| (id.to_string(), title)).collect(),
        }
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut partial = path.as_os_str().to_owned();
    partial.push(".partial");
    PathBuf::from(partial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[test]
    fn test_lookup() {
        let table = OverrideTable::from_json(r#"{"1234567": "[Group] Custom Title"}"#).unwrap();
        assert_eq!(table.get(1234567), Some("[Group] Custom Title"));
        assert_eq!(table.get(7654321), None);
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let table = OverrideTable::load(&dir.path().join("overrides.json")).await;
        assert!(table.is_empty());
    }

    #[rstest]
    #[case("")]
    #[case("not json")]
    #[case("[\"1234567\"]")]
    #[case(r#"{"1234567": 42}"#)]
    #[tokio::test]
    async fn test_malformed_file_is_empty(#[case] contents: &str) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("overrides.json");
        std::fs::write(&path, contents).unwrap();
        assert!(OverrideTable::load(&path).await.is_empty());
        let err = OverrideTable::try_load(&path).await.unwrap_err();
        assert_eq!(*err, ErrorKind::Overrides(path));
    }

    #[tokio::test]
    async fn test_save_sorts_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("overrides.json");
        let table: OverrideTable = [(20, "B".to_string()), (100, "C".to_string()), (1, "A".to_string())]
            .into_iter()
            .collect();
        table.save(&path).await.unwrap();
        let json = std::fs::read_to_string(&path).unwrap();
        assert_eq!(json, "{\n  \"1\": \"A\",\n  \"100\": \"C\",\n  \"20\": \"B\"\n}\n");
        assert!(!dir.path().join("overrides.json.partial").exists());
        assert_eq!(OverrideTable::try_load(&path).await.unwrap(), table);
    }

    #[tokio::test]
    async fn test_record_updates_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("overrides.json");
        assert_eq!(OverrideTable::record(&path, 1, "First").await.unwrap(), None);
        assert_eq!(OverrideTable::record(&path, 2, "Second").await.unwrap(), None);
        assert_eq!(OverrideTable::record(&path, 1, "Renamed").await.unwrap().as_deref(), Some("First"));
        let table = OverrideTable::try_load(&path).await.unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1), Some("Renamed"));
    }

    #[rstest]
    #[case("")]
    #[case("{ broken")]
    #[case("not json")]
    #[tokio::test]
    async fn test_record_starts_over_on_non_json_file(#[case] contents: &str) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("overrides.json");
        std::fs::write(&path, contents).unwrap();
        OverrideTable::record(&path, 7, "Title").await.unwrap();
        let table = OverrideTable::try_load(&path).await.unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(7), Some("Title"));
    }

    #[rstest]
    #[case(r#"{"1": "Curated One", "2": "Curated Two", "3": null}"#)]
    #[case(r#"{"1": "Curated One", "2": 2}"#)]
    #[case(r#"["Curated One"]"#)]
    #[tokio::test]
    async fn test_record_keeps_unexpected_json_intact(#[case] contents: &str) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("overrides.json");
        std::fs::write(&path, contents).unwrap();
        let err = OverrideTable::record(&path, 9, "New").await.unwrap_err();
        assert_eq!(*err, ErrorKind::Overrides(path.clone()));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), contents);
    }

    #[tokio::test]
    async fn test_record_into_unreadable_path_fails() {
        let dir = TempDir::new().unwrap();
        let err = OverrideTable::record(dir.path(), 9, "New").await.unwrap_err();
        assert_eq!(*err, ErrorKind::Overrides(dir.path().to_path_buf()));
    }
}
