//! Shared constants and compiled patterns for archive and release-name
//! classification.

use once_cell::sync::Lazy;
use regex::Regex;

/// Library category folder names.
pub const TV_CATEGORY: &str = "TV-Shows";
pub const MOVIES_CATEGORY: &str = "Movies";

/// Canonical names for special release subdirectories.
pub const SUBDIR_SUBS: &str = "Subs";
pub const SUBDIR_SAMPLE: &str = "Sample";
pub const SUBDIR_OTHER: &str = "Sonstige";

/// Sentinel suffix of a volume that is still being downloaded.
pub const INCOMPLETE_SUFFIX: &str = ".dctmp";

/// Checksum sidecars and similar files excluded from extraction output.
pub const UNWANTED_SUFFIXES: &[&str] = &[".sfv"];

/// Outer archive suffixes the pipeline accepts, longest first so compound
/// suffixes win over their tails.
pub const SUPPORTED_ARCHIVE_SUFFIXES: &[&str] = &[
    ".tar.bz2",
    ".tar.gz",
    ".tar.xz",
    ".tbz2",
    ".tgz",
    ".txz",
    ".rar",
    ".tar",
    ".zip",
    ".7z",
    ".bz2",
    ".gz",
    ".xz",
];

/// Season-plus-optional-episode tag: `S01`, `s02e03`.
pub static TV_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)s\d{2}(?:e\d{2})?").unwrap());

/// Episode-only tag like `E01`/`E001`, bounded by non-letters. The tag
/// itself is capture group 1 (the regex crate has no lookaround).
pub static EPISODE_ONLY_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:^|[^a-z])(e\d{2,3})(?:[^a-z]|$)").unwrap());

/// Season folder names: `Season 1`, `Season 01`.
pub static SEASON_DIR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^season\s*(\d+)$").unwrap());

/// Short season folder variant: `S03`.
pub static SEASON_SHORT_DIR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^s(\d{1,2})$").unwrap());

/// German season folder variant: `Staffel 1`, `Staffel 01`.
pub static STAFFEL_DIR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^staffel\s*(\d+)$").unwrap());

/// Season tag embedded in a dotted release name: `.S02`.
pub static SEASON_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.s(\d+)").unwrap());

/// Fallback season tag without the leading dot.
pub static SEASON_TAG_ALT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)s(\d+)").unwrap());

/// Modern multi-part volume: `<base>.part01.rar`.
pub static PART_VOLUME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?P<base>.+?)\.part(?P<index>\d+)(?P<ext>(?:\.[^.]+)+)$")
        .unwrap()
});

/// Legacy RAR continuation volume: `<base>.r00`.
pub static R_VOLUME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?P<base>.+?)\.r(?P<index>\d+)$").unwrap());

/// Split archive: `<base>.zip.001`.
pub static SPLIT_EXT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?P<base>.+?)(?P<ext>(?:\.[^.]+)+)\.(?P<index>\d+)$")
        .unwrap()
});

/// True when `name` ends in one of the supported outer archive suffixes.
pub fn has_supported_suffix(name: &str) -> bool {
    SUPPORTED_ARCHIVE_SUFFIXES
        .iter()
        .any(|suffix| name.ends_with(suffix))
}

/// Find the episode-only tag (`e01`, `e001`) in a name, lowercased.
pub fn episode_tag(name: &str) -> Option<String> {
    EPISODE_ONLY_TAG_RE
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|tag| tag.as_str().to_lowercase())
}

/// Byte offset where the episode-only tag starts, if present.
pub fn episode_tag_start(name: &str) -> Option<usize> {
    EPISODE_ONLY_TAG_RE
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|tag| tag.start())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_matching_prefers_compound_suffixes() {
        assert!(has_supported_suffix("show.tar.gz"));
        assert!(has_supported_suffix("movie.rar"));
        assert!(!has_supported_suffix("movie.mkv"));
    }

    #[test]
    fn episode_tag_requires_non_letter_boundary() {
        assert_eq!(episode_tag("Show.E01.mkv"), Some("e01".to_string()));
        assert_eq!(episode_tag("Show.E001-GRP"), Some("e001".to_string()));
        assert_eq!(episode_tag("Release.NAME-GRP"), None);
        // "WEB" style tokens must not match as episode tags
        assert_eq!(episode_tag("Show.WEBRip"), None);
    }

    #[test]
    fn season_folder_variants() {
        assert!(SEASON_DIR_RE.is_match("Season 01"));
        assert!(STAFFEL_DIR_RE.is_match("Staffel 2"));
        assert!(SEASON_SHORT_DIR_RE.is_match("S03"));
        assert!(!SEASON_SHORT_DIR_RE.is_match("S03E01"));
    }
}
