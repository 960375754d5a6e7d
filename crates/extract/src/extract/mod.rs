//! Metadata extraction from the index's release pages.

use std::convert::Infallible;
use std::str::FromStr;

use crate::consts;
use crate::error::{Error, ErrorKind, Result};
use crate::models::RawMetadata;
use exn::{OptionExt, ResultExt};
use scraper::{Html, Selector};
use tracing::instrument;

#[derive(Debug)]
pub struct Extractor {
    document: Html,
}
impl Extractor {
    pub fn from_document(document: Html) -> Self {
        Self { document }
    }

    pub fn from_html(html: &str) -> Self {
        Self::from_document(Html::parse_document(html))
    }

    /// Returns `true` if the document has the title heading every release
    /// page carries.
    pub fn is_valid(&self) -> bool {
        self.title().is_ok()
    }

    /// Extracts release metadata for the item with the given index ID.
    ///
    /// The ID is not read from the page: it is the ID the page was requested
    /// for, and it is recorded as-is.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The title, date, size or infohash is absent or empty
    /// - Seeder, leecher or completed counts are not numbers
    /// - The infohash is not 40 hexadecimal characters
    #[instrument(skip(self))]
    pub fn metadata(self, id: u64) -> Result<RawMetadata> {
        let title = self.title().or_raise(|| ErrorKind::InvalidDocument)?;
        Ok(RawMetadata {
            id,
            title,
            date: self.required_text(&consts::DATE_SELECTOR, "date")?,
            seeders: self.count(&consts::SEEDERS_SELECTOR, "seeders")?,
            leechers: self.count(&consts::LEECHERS_SELECTOR, "leechers")?,
            size: self.required_text(&consts::SIZE_SELECTOR, "size")?,
            completed: self.count(&consts::COMPLETED_SELECTOR, "completed")?,
            infohash: self.infohash()?,
            files: self.files(),
        })
    }

    fn text(&self, selector: &Selector) -> Option<String> {
        self.document
            .select(selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn required_text(&self, selector: &Selector, field: &'static str) -> Result<String> {
        self.text(selector).ok_or_raise(|| ErrorKind::MissingField(field))
    }

    fn title(&self) -> Result<String> {
        self.required_text(&consts::TITLE_SELECTOR, "title")
    }

    fn count(&self, selector: &Selector, field: &'static str) -> Result<u64> {
        let text = self.required_text(selector, field)?;
        text.replace(',', "").parse::<u64>().or_raise(|| ErrorKind::ParseError { field, value: text })
    }

    fn infohash(&self) -> Result<String> {
        let hash = self.required_text(&consts::INFOHASH_SELECTOR, "infohash")?;
        if !consts::INFOHASH_REGEX.is_match(&hash) {
            exn::bail!(ErrorKind::ParseError {
                field: "infohash",
                value: hash,
            });
        }
        Ok(hash.to_ascii_lowercase())
    }

    /// Single-file torrents have no nested file list.
    fn files(&self) -> u64 {
        self.document
            .select(&consts::FILE_LIST_SELECTOR)
            .next()
            .map(|list| list.select(&consts::LIST_ITEM_SELECTOR).count() as u64)
            .unwrap_or(0)
    }
}
impl FromStr for Extractor {
    type Err = Infallible;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_html(s))
    }
}
impl From<String> for Extractor {
    fn from(value: String) -> Self {
        Self::from_html(&value)
    }
}
impl From<Html> for Extractor {
    fn from(document: Html) -> Self {
        Self::from_document(document)
    }
}

/// Returns `true` if the HTML looks like a release page of the index.
#[instrument(skip(html), fields(html_size = html.len()))]
pub fn is_valid(html: &str) -> bool {
    Extractor::from_html(html).is_valid()
}

/// Convenience wrapper around [`Extractor::metadata`].
pub fn extract(html: &str, id: u64) -> std::result::Result<RawMetadata, Error> {
    Extractor::from_html(html).metadata(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const VIEW_PAGE: &str = include_str!("../../tests/fixtures/view.html");
    const SINGLE_FILE_PAGE: &str = include_str!("../../tests/fixtures/view_single_file.html");

    #[test]
    fn test_extracts_all_fields() {
        let metadata = extract(VIEW_PAGE, 1_234_567).unwrap();
        assert_eq!(
            metadata,
            RawMetadata {
                id: 1_234_567,
                title: "[Erai-raws] Some Show S2 (1080p) [BD FLAC x265 Hi10 Dual-Audio]".to_string(),
                date: "2023-01-15 12:34 UTC".to_string(),
                seeders: 123,
                leechers: 4,
                size: "1.5 GiB".to_string(),
                completed: 5678,
                infohash: "0123456789abcdef0123456789abcdef01234567".to_string(),
                files: 3,
            }
        );
    }

    #[test]
    fn test_single_file_torrent_has_no_file_list() {
        let metadata = extract(SINGLE_FILE_PAGE, 42).unwrap();
        assert_eq!(metadata.files, 0);
        assert_eq!(metadata.size, "700 MiB");
        assert_eq!(metadata.seeders, 1);
    }

    #[test]
    fn test_validity() {
        assert!(is_valid(VIEW_PAGE));
        assert!(!is_valid("<html><body><p>404 Not Found</p></body></html>"));
    }

    #[test]
    fn test_empty_title_is_invalid_document() {
        let html = VIEW_PAGE.replace(
            "[Erai-raws] Some Show S2 (1080p) [BD FLAC x265 Hi10 Dual-Audio]",
            "   ",
        );
        let err = extract(&html, 1).unwrap_err();
        assert_eq!(*err, ErrorKind::InvalidDocument);
    }

    #[rstest]
    #[case("1.5 GiB", "", ErrorKind::MissingField("size"))]
    #[case(">123<", ">lots<", ErrorKind::ParseError { field: "seeders", value: "lots".to_string() })]
    #[case(
        "0123456789ABCDEF0123456789abcdef01234567",
        "not-a-hash",
        ErrorKind::ParseError { field: "infohash", value: "not-a-hash".to_string() }
    )]
    fn test_broken_fields(#[case] from: &str, #[case] to: &str, #[case] expected: ErrorKind) {
        let html = VIEW_PAGE.replace(from, to);
        let err = extract(&html, 1).unwrap_err();
        assert_eq!(*err, expected);
    }

    #[test]
    fn test_infohash_is_lowercased() {
        let metadata = extract(VIEW_PAGE, 1).unwrap();
        assert!(metadata.infohash.chars().all(|c| !c.is_ascii_uppercase()));
    }
}
