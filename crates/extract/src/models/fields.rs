/// Structured fields pulled out of a free-text release title.
///
/// Every field is best-effort: a rule that doesn't match leaves its field
/// empty (or `false`), it never fails the extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalizedFields {
    /// Leading bracketed tag, without the brackets
    pub release_group: String,
    pub show_name: String,
    /// Season or arc marker, exactly as written (`S2`, `Season 3`, `Arc`)
    pub season: String,
    /// `1080p` or `1920x1080` style token
    pub resolution: String,
    /// Media source, with a bare `BD` canonicalized to `BluRay`
    pub source: String,
    /// Upper-cased audio codec
    pub audio_codec: String,
    /// Video codec with `HEVC`/`AVC` mapped to `x265`/`x264`
    pub video_codec: String,
    /// `Hi10`/`Hi10P` present
    pub bit_depth: bool,
    pub dual_audio: bool,
    /// Release revision (`v2`)
    pub version: String,
}
