//! Release title normalization.
//!
//! Scene and fansub titles have no grammar, just conventions. Normalization
//! runs an ordered list of independent [`Rule`]s over the raw title; each rule
//! fills at most one field of [`NormalizedFields`] from its first match, and a
//! rule that doesn't match leaves its field empty. The fields are then
//! reassembled into a canonical title in one of the [`TitleFormat`]s.
//!
//! ```rust
//! use sznjd_extract::{Normalizer, TitleFormat};
//!
//! let normalizer = Normalizer::new(TitleFormat::Descriptive);
//! assert_eq!(
//!     normalizer.normalize("[Erai-raws] Some Show S2 (1080p) [BD FLAC x265 Hi10 Dual-Audio]"),
//!     "Some Show S2 1080p BluRay FLAC  x265 10bit Dual-Audio SZNJD-Erai-raws",
//! );
//! ```

use crate::consts;
use crate::models::NormalizedFields;
use regex::Regex;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use tracing::instrument;

/// Tag appended to every canonical title, ahead of the release group.
pub const RELEASE_TAG: &str = "SZNJD";

/// Field of [`NormalizedFields`] that a [`Rule`] populates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    ReleaseGroup,
    ShowName,
    Season,
    Resolution,
    Source,
    AudioCodec,
    VideoCodec,
    BitDepth,
    DualAudio,
    Version,
}

/// A single named extraction pattern.
///
/// Rules are data: the normalizer only knows how to run them in order and
/// store what they return, so rules can be added, reordered and tested on
/// their own.
#[derive(Debug, Clone)]
pub struct Rule {
    name: &'static str,
    field: Field,
    regex: Regex,
    /// Capture group holding the value; `0` for the whole match.
    group: usize,
    /// Matches immediately preceded by any of these are skipped.
    not_after: &'static [&'static str],
}
impl Rule {
    pub fn new(name: &'static str, field: Field, regex: Regex) -> Self {
        Self {
            name,
            field,
            regex,
            group: 0,
            not_after: &[],
        }
    }

    /// Take the value from a capture group instead of the whole match.
    pub fn capture(mut self, group: usize) -> Self {
        self.group = group;
        self
    }

    /// Skip matches whose preceding text ends with one of `prefixes`.
    pub fn not_after(mut self, prefixes: &'static [&'static str]) -> Self {
        self.not_after = prefixes;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn field(&self) -> Field {
        self.field
    }

    /// Returns the first acceptable match in `title`, if any.
    pub fn find<'t>(&self, title: &'t str) -> Option<&'t str> {
        self.regex.captures_iter(title).find_map(|captures| {
            let whole = captures.get(0)?;
            let preceding = &title[..whole.start()];
            if self.not_after.iter().any(|prefix| preceding.ends_with(prefix)) {
                return None;
            }
            captures.get(self.group).map(|m| m.as_str())
        })
    }
}

/// The built-in rules, in evaluation order.
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule::new("release-group", Field::ReleaseGroup, consts::RELEASE_GROUP_REGEX.clone()).capture(1),
        Rule::new("show-name", Field::ShowName, consts::SHOW_SEGMENT_REGEX.clone()).capture(1),
        Rule::new("season", Field::Season, consts::SEASON_REGEX.clone()),
        Rule::new("resolution", Field::Resolution, consts::RESOLUTION_REGEX.clone()).not_after(&["264", "265"]),
        Rule::new("source", Field::Source, consts::SOURCE_REGEX.clone()),
        Rule::new("audio-codec", Field::AudioCodec, consts::AUDIO_REGEX.clone()),
        Rule::new("video-codec", Field::VideoCodec, consts::VIDEO_REGEX.clone()),
        Rule::new("hi10", Field::BitDepth, consts::HI10_REGEX.clone()),
        Rule::new("dual-audio", Field::DualAudio, consts::DUAL_AUDIO_REGEX.clone()),
        Rule::new("version", Field::Version, consts::VERSION_REGEX.clone()).capture(1),
    ]
}

/// Canonical title layouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum TitleFormat {
    /// `Show S2 1080p BluRay FLAC  x265 10bit Dual-Audio SZNJD-Group`
    #[default]
    Descriptive,
    /// `Show.S2.1080p.BluRay.v2.SZNJD-Group`, empty fields keep their dots.
    Compact,
    /// Like [`Compact`](Self::Compact), but empty fields are left out.
    CompactSkipEmpty,
}
impl TitleFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Descriptive => "descriptive",
            Self::Compact => "compact",
            Self::CompactSkipEmpty => "compact-skip-empty",
        }
    }
}
impl FromStr for TitleFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "descriptive" | "space" => Self::Descriptive,
            "compact" | "dot" => Self::Compact,
            "compact-skip-empty" => Self::CompactSkipEmpty,
            other => return Err(format!("unknown title format: {other}")),
        })
    }
}
impl Display for TitleFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Turns raw release titles into canonical titles.
#[derive(Debug, Clone)]
pub struct Normalizer {
    rules: Vec<Rule>,
    format: TitleFormat,
}
impl Default for Normalizer {
    fn default() -> Self {
        Self::new(TitleFormat::default())
    }
}
impl Normalizer {
    pub fn new(format: TitleFormat) -> Self {
        Self::with_rules(default_rules(), format)
    }

    pub fn with_rules(rules: Vec<Rule>, format: TitleFormat) -> Self {
        Self { rules, format }
    }

    pub fn format(&self) -> TitleFormat {
        self.format
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Runs every rule against `title`. The first rule to produce a value for
    /// a field wins; later rules for the same field are ignored.
    pub fn extract(&self, title: &str) -> NormalizedFields {
        let mut fields = NormalizedFields::default();
        let mut filled = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            if filled.contains(&rule.field) {
                continue;
            }
            if let Some(value) = rule.find(title) {
                store(&mut fields, rule.field, value);
                filled.push(rule.field);
            }
        }
        fields
    }

    /// Normalizes `title` into this normalizer's [`TitleFormat`].
    #[instrument(level = "trace", skip(self), fields(format = %self.format))]
    pub fn normalize(&self, title: &str) -> String {
        assemble(&self.extract(title), self.format)
    }
}

fn store(fields: &mut NormalizedFields, field: Field, value: &str) {
    match field {
        Field::ReleaseGroup => fields.release_group = value.to_string(),
        Field::ShowName => fields.show_name = show_name(value),
        Field::Season => fields.season = value.to_string(),
        Field::Resolution => fields.resolution = value.to_string(),
        Field::Source if value.eq_ignore_ascii_case("BD") => fields.source = "BluRay".to_string(),
        Field::Source => fields.source = value.to_string(),
        Field::AudioCodec => fields.audio_codec = value.to_ascii_uppercase(),
        Field::VideoCodec => {
            fields.video_codec = match value.to_ascii_uppercase().as_str() {
                "HEVC" => "x265".to_string(),
                "AVC" => "x264".to_string(),
                _ => value.to_string(),
            }
        },
        Field::BitDepth => fields.bit_depth = true,
        Field::DualAudio => fields.dual_audio = true,
        Field::Version => fields.version = value.to_string(),
    }
}

/// The show name runs up to the first bracket, but a season or arc marker
/// sitting before that bracket belongs to the season, not the name.
fn show_name(segment: &str) -> String {
    let name = match consts::SEASON_REGEX.find(segment) {
        Some(marker) if !segment[..marker.start()].trim().is_empty() => &segment[..marker.start()],
        _ => segment,
    };
    name.trim().to_string()
}

/// Reassembles extracted fields into a canonical title.
pub fn assemble(fields: &NormalizedFields, format: TitleFormat) -> String {
    match format {
        TitleFormat::Descriptive => descriptive(fields),
        TitleFormat::Compact => compact(fields, false),
        TitleFormat::CompactSkipEmpty => compact(fields, true),
    }
}

fn descriptive(fields: &NormalizedFields) -> String {
    // Empty fields still contribute their separator; the exact spacing is
    // what downstream name matching was built against.
    let mut title = format!(
        "{} {} {} {} {}  {}",
        fields.show_name,
        fields.season,
        fields.resolution,
        fields.source,
        fields.audio_codec.to_ascii_uppercase(),
        fields.video_codec.to_ascii_lowercase(),
    );
    if fields.bit_depth {
        if fields.video_codec.is_empty() {
            title.push_str(" x264 10bit");
        } else {
            title.push_str(" 10bit");
        }
    }
    if fields.dual_audio {
        title.push_str(" Dual-Audio");
    }
    title.push_str(&format!(" {RELEASE_TAG}-{}", fields.release_group));
    title.trim().to_string()
}

fn compact(fields: &NormalizedFields, skip_empty: bool) -> String {
    let tag = format!("{RELEASE_TAG}-{}", fields.release_group);
    [
        fields.show_name.as_str(),
        fields.season.as_str(),
        fields.resolution.as_str(),
        fields.source.as_str(),
        fields.version.as_str(),
        tag.as_str(),
    ]
    .into_iter()
    .filter(|part| !skip_empty || !part.is_empty())
    .collect::<Vec<_>>()
    .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const EXAMPLE: &str = "[Erai-raws] Some Show S2 (1080p) [BD FLAC x265 Hi10 Dual-Audio]";

    #[test]
    fn test_descriptive_example_keeps_double_space() {
        let normalizer = Normalizer::new(TitleFormat::Descriptive);
        assert_eq!(
            normalizer.normalize(EXAMPLE),
            "Some Show S2 1080p BluRay FLAC  x265 10bit Dual-Audio SZNJD-Erai-raws"
        );
    }

    #[test]
    fn test_extracts_example_fields() {
        let fields = Normalizer::default().extract(EXAMPLE);
        assert_eq!(
            fields,
            NormalizedFields {
                release_group: "Erai-raws".to_string(),
                show_name: "Some Show".to_string(),
                season: "S2".to_string(),
                resolution: "1080p".to_string(),
                source: "BluRay".to_string(),
                audio_codec: "FLAC".to_string(),
                video_codec: "x265".to_string(),
                bit_depth: true,
                dual_audio: true,
                version: String::new(),
            }
        );
    }

    #[test]
    fn test_is_deterministic() {
        let normalizer = Normalizer::new(TitleFormat::Compact);
        let first = normalizer.normalize(EXAMPLE);
        assert_eq!(first, normalizer.normalize(EXAMPLE));
        assert_eq!(first, Normalizer::new(TitleFormat::Compact).normalize(EXAMPLE));
    }

    #[rstest]
    #[case("")]
    #[case("no brackets, no codecs, nothing")]
    #[case("]]]][[[(((")]
    #[case("[")]
    fn test_unrecognizable_titles_degrade_to_placeholders(#[case] title: &str) {
        let normalizer = Normalizer::default();
        assert_eq!(normalizer.extract(title), NormalizedFields::default());
        assert_eq!(normalizer.normalize(title), "SZNJD-");
        assert_eq!(Normalizer::new(TitleFormat::Compact).normalize(title), ".....SZNJD-");
        assert_eq!(Normalizer::new(TitleFormat::CompactSkipEmpty).normalize(title), "SZNJD-");
    }

    #[rstest]
    #[case("[Group] Show (1080p)", "Show")]
    #[case("[Group]Show Name [BD 1080p]", "Show Name")]
    #[case("[Group] Show Season 2 (BD 1080p)", "Show")]
    #[case("[Group] Show Name Arc [WEB]", "Show Name")]
    #[case("[Group] S2 Show (1080p)", "S2 Show")]
    #[case("[Group] Arcane (1080p)", "Arcane")]
    #[case("Show Without Group (1080p)", "")]
    fn test_show_name(#[case] title: &str, #[case] expected: &str) {
        assert_eq!(Normalizer::default().extract(title).show_name, expected);
    }

    #[rstest]
    #[case("[G] Show S2 (1080p)", "S2")]
    #[case("[G] Show s3 (1080p)", "s3")]
    #[case("[G] Show S 4 (1080p)", "S 4")]
    #[case("[G] Show Season 2 (1080p)", "Season 2")]
    #[case("[G] Show season2 (1080p)", "season2")]
    #[case("[G] Show Arc (1080p)", "Arc")]
    #[case("[G] Show (1080p)", "")]
    #[case("[SubsPlease] Shows (1080p)", "")]
    fn test_season(#[case] title: &str, #[case] expected: &str) {
        assert_eq!(Normalizer::default().extract(title).season, expected);
    }

    #[test]
    fn test_season_marker_inside_group_tag_counts() {
        // Rules scan the whole raw title, group tag included.
        let normalizer = Normalizer::default();
        let fields = normalizer.extract("[S2-Subs] Show (1080p)");
        assert_eq!(fields.release_group, "S2-Subs");
        assert_eq!(fields.season, "S2");
        assert_eq!(normalizer.normalize("[S2-Subs] Show (1080p)"), "Show S2 1080p     SZNJD-S2-Subs");
    }

    #[rstest]
    #[case("[G] Show (1080p)", "1080p")]
    #[case("[G] Show [1920x1080 x264]", "1920x1080")]
    #[case("[G] Show [x264 720p]", "720p")]
    #[case("[G] Show [BD 2160p HEVC]", "2160p")]
    #[case("[G] Show [x2651080p]", "")]
    #[case("[G] Show [0720p]", "")]
    #[case("[G] Show [10bit]", "")]
    fn test_resolution(#[case] title: &str, #[case] expected: &str) {
        assert_eq!(Normalizer::default().extract(title).resolution, expected);
    }

    #[test]
    fn test_resolution_skips_codec_suffixed_match() {
        // A bare regex without word boundaries, to show the codec guard at work.
        let rule = Rule::new("resolution", Field::Resolution, Regex::new(r"[1-9]\d{2,3}p").unwrap())
            .not_after(&["264", "265"]);
        assert_eq!(rule.find("x2651080p then 720p"), Some("720p"));
        assert_eq!(rule.find("x2641080p"), None);
    }

    #[rstest]
    #[case("[G] Show [BD]", "BluRay")]
    #[case("[G] Show [bd]", "BluRay")]
    #[case("[G] Show [BD-rip]", "BD-rip")]
    #[case("[G] Show [BDRip]", "BDRip")]
    #[case("[G] Show [BluRay]", "BluRay")]
    #[case("[G] Show [web-rip]", "web-rip")]
    #[case("[G] Show [WEB]", "WEB")]
    #[case("[G] Show [HDTV-WEB]", "HDTV-WEB")]
    #[case("[G] Show [R2 DVD]", "R2 DVD")]
    #[case("[G] Show [JPBD]", "JPBD")]
    #[case("[G] Show [R2J]", "R2J")]
    #[case("[G] Show [VHS]", "")]
    fn test_source(#[case] title: &str, #[case] expected: &str) {
        assert_eq!(Normalizer::default().extract(title).source, expected);
    }

    #[rstest]
    #[case("[G] Show [flac]", "FLAC")]
    #[case("[G] Show [Opus]", "OPUS")]
    #[case("[G] Show [EAC3]", "EAC3")]
    #[case("[G] Show [aac]", "AAC")]
    #[case("[G] Show [MP3]", "")]
    fn test_audio_codec(#[case] title: &str, #[case] expected: &str) {
        assert_eq!(Normalizer::default().extract(title).audio_codec, expected);
    }

    #[rstest]
    #[case("[G] Show [HEVC]", "x265")]
    #[case("[G] Show [hevc]", "x265")]
    #[case("[G] Show [AVC]", "x264")]
    #[case("[G] Show [X264]", "X264")]
    #[case("[G] Show [x265]", "x265")]
    #[case("[G] Show [AV1]", "")]
    fn test_video_codec(#[case] title: &str, #[case] expected: &str) {
        assert_eq!(Normalizer::default().extract(title).video_codec, expected);
    }

    #[rstest]
    #[case("[G] Show [Hi10]", true, false)]
    #[case("[G] Show [hi10p]", true, false)]
    #[case("[G] Show [Hi444PP]", false, false)]
    #[case("[G] Show [Dual Audio]", false, true)]
    #[case("[G] Show [DualAudio]", false, true)]
    #[case("[G] Show [dual-audio]", false, true)]
    #[case("[G] Show [EN+JA]", false, true)]
    #[case("[G] Show [Multi-Audio]", false, false)]
    fn test_flags(#[case] title: &str, #[case] bit_depth: bool, #[case] dual_audio: bool) {
        let fields = Normalizer::default().extract(title);
        assert_eq!(fields.bit_depth, bit_depth);
        assert_eq!(fields.dual_audio, dual_audio);
    }

    #[rstest]
    #[case("[G] Show [v2]", "v2")]
    #[case("[G] Show - 01v3 [1080p]", "v3")]
    #[case("[G] Show V0", "V0")]
    #[case("[G] Show [v5]", "")]
    #[case("[G] Show [dev2]", "")]
    fn test_version(#[case] title: &str, #[case] expected: &str) {
        assert_eq!(Normalizer::default().extract(title).version, expected);
    }

    #[rstest]
    #[case("[G] Show (1080p) [BD x264 Hi10]", "Show  1080p BluRay   x264 10bit SZNJD-G")]
    #[case("[G] Show (1080p) [BD Hi10P]", "Show  1080p BluRay    x264 10bit SZNJD-G")]
    #[case("[G] Show (1080p) [BD AVC FLAC]", "Show  1080p BluRay FLAC  x264 SZNJD-G")]
    #[case("[G] Show (1080p) [X265 EN+JA]", "Show  1080p    x265 Dual-Audio SZNJD-G")]
    fn test_descriptive_form(#[case] title: &str, #[case] expected: &str) {
        assert_eq!(Normalizer::new(TitleFormat::Descriptive).normalize(title), expected);
    }

    #[rstest]
    #[case("[Group] Show (1080p) [BD][v2]", TitleFormat::Compact, "Show..1080p.BluRay.v2.SZNJD-Group")]
    #[case("[Group] Show (1080p) [BD]", TitleFormat::Compact, "Show..1080p.BluRay..SZNJD-Group")]
    #[case(EXAMPLE, TitleFormat::Compact, "Some Show.S2.1080p.BluRay..SZNJD-Erai-raws")]
    #[case("[Group] Show (1080p) [BD]", TitleFormat::CompactSkipEmpty, "Show.1080p.BluRay.SZNJD-Group")]
    #[case(EXAMPLE, TitleFormat::CompactSkipEmpty, "Some Show.S2.1080p.BluRay.SZNJD-Erai-raws")]
    fn test_compact_forms(#[case] title: &str, #[case] format: TitleFormat, #[case] expected: &str) {
        assert_eq!(Normalizer::new(format).normalize(title), expected);
    }

    #[test]
    fn test_first_rule_per_field_wins() {
        let mut rules = vec![Rule::new("web-first", Field::Source, Regex::new(r"WEB").unwrap())];
        rules.extend(default_rules());
        let normalizer = Normalizer::with_rules(rules, TitleFormat::Descriptive);
        assert_eq!(normalizer.extract("[G] Show [BD WEB]").source, "WEB");
        assert_eq!(Normalizer::default().extract("[G] Show [BD WEB]").source, "BluRay");
    }

    #[rstest]
    #[case("descriptive", TitleFormat::Descriptive)]
    #[case("Compact", TitleFormat::Compact)]
    #[case("compact_skip_empty", TitleFormat::CompactSkipEmpty)]
    fn test_title_format_from_str(#[case] input: &str, #[case] expected: TitleFormat) {
        assert_eq!(input.parse::<TitleFormat>().unwrap(), expected);
        assert_eq!(expected.as_str().parse::<TitleFormat>().unwrap(), expected);
    }
}
