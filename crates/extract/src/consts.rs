use regex::Regex;
use scraper::Selector;
use std::sync::LazyLock;

macro_rules! selector {
    ($name:ident, $css:expr) => {
        pub(crate) static $name: LazyLock<Selector> = LazyLock::new(|| Selector::parse($css).unwrap());
    };
}

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// Release page layout. Rows of the info panel are positional, so are these.
selector!(TITLE_SELECTOR, "body > div > div:nth-child(1) > div.panel-heading > h3");
selector!(DATE_SELECTOR, "div.row:nth-child(1) > div:nth-child(4)");
selector!(SEEDERS_SELECTOR, "div.row:nth-child(2) > div:nth-child(4) > span:nth-child(1)");
selector!(LEECHERS_SELECTOR, "div.row:nth-child(3) > div:nth-child(4) > span:nth-child(1)");
selector!(SIZE_SELECTOR, "div.row:nth-child(4) > div:nth-child(2)");
selector!(COMPLETED_SELECTOR, "div.row:nth-child(4) > div:nth-child(4)");
selector!(INFOHASH_SELECTOR, "div.row:nth-child(5) > div:nth-child(2) > kbd:nth-child(1)");
selector!(FILE_LIST_SELECTOR, ".torrent-file-list > ul:nth-child(1) > li:nth-child(1) > ul:nth-child(2)");
selector!(LIST_ITEM_SELECTOR, "li");
regex!(INFOHASH_REGEX, r"^[0-9a-fA-F]{40}$");

// Size strings: "1.5 GiB", "1,024 KiB", "700MiB".
regex!(SIZE_REGEX, r"^\s*(\d{1,3}(?:,\d{3})+|\d+)(?:\.(\d+))?\s*([A-Za-z]+)\s*$");

// Release title rules.
regex!(RELEASE_GROUP_REGEX, r"^\[([^\]]+)\]");
regex!(SHOW_SEGMENT_REGEX, r"^\[[^\]]+\]\s*([^\[\]()]+)");
regex!(SEASON_REGEX, r"(?i)\b(?:Season\s*\d+|S\s?\d+|Arc)\b");
regex!(RESOLUTION_REGEX, r"\b(?:\d{3,4}x\d{3,4}|[1-9]\d{2,3}p)\b");
regex!(
    SOURCE_REGEX,
    r"(?i)\b(?:BD(?:-?rip)?|BluRay|WEB(?:-?rip)?|HDTV(?:-?WEB)?|DVD(?:-?rip)?|JPBD|USBD|ITABD|R1\s?DVD|R2\s?DVD|R2J|R1J)\b"
);
regex!(AUDIO_REGEX, r"(?i)\b(?:FLAC|OPUS|AAC|AC3|EAC3)\b");
regex!(VIDEO_REGEX, r"(?i)\b(?:x264|x265|HEVC|AVC)\b");
regex!(HI10_REGEX, r"(?i)\b(?:Hi10|Hi10P)\b");
regex!(DUAL_AUDIO_REGEX, r"(?i)\b(?:Dual[\s-]?Audio|EN\+JA)\b");
regex!(VERSION_REGEX, r"(?i)(?:\b|\d)(v[0-4])\b");
