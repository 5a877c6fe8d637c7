//! Library layout rules: movie vs TV classification and destination
//! synthesis.
//!
//! Release names are dot-delimited token strings (`The.Show.S02E01.1080p-GRP`).
//! A release lands under `TV-Shows/<Show>/Season NN/` when a season token is
//! found, under `TV-Shows/<Show>/` for episode-only releases, and under
//! `Movies/<release-relative-path>` otherwise.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use reelsort_model::ReleaseKind;
use walkdir::WalkDir;

use crate::archive::tokens::{
    EPISODE_ONLY_TAG_RE, MOVIES_CATEGORY, SEASON_DIR_RE, SEASON_SHORT_DIR_RE,
    SEASON_TAG_ALT_RE, SEASON_TAG_RE, STAFFEL_DIR_RE, SUBDIR_OTHER,
    SUBDIR_SAMPLE, SUBDIR_SUBS, TV_CATEGORY, TV_TAG_RE, episode_tag_start,
};

/// Everything from the season token onwards is noise for the show name.
static SEASON_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.s\d+.*$").unwrap());

/// Depth limit for the recursive TV-content scan below a release root.
const TV_SCAN_MAX_DEPTH: usize = 3;

/// True for directory names like `Season 01`, `Staffel 1` or `S03`.
pub fn is_season_directory(directory: &Path) -> bool {
    let Some(name) = directory.file_name().and_then(|name| name.to_str())
    else {
        return false;
    };
    SEASON_DIR_RE.is_match(name)
        || STAFFEL_DIR_RE.is_match(name)
        || SEASON_SHORT_DIR_RE.is_match(name)
}

/// Extract a normalised `Season NN` label from a name carrying a TV tag.
pub fn season_label_from_tag(name: &str) -> Option<String> {
    let tag = TV_TAG_RE.find(name)?;
    let season = SEASON_TAG_ALT_RE
        .captures(tag.as_str())
        .and_then(|caps| caps[1].parse::<u32>().ok())?;
    Some(format!("Season {season:02}"))
}

/// Map variant special-folder names onto their canonical forms.
pub fn normalize_special_subdir(name: &str) -> Option<&'static str> {
    let lower = name.trim().to_lowercase();
    match lower.as_str() {
        "sub" | "subs" | "untertitel" => Some(SUBDIR_SUBS),
        "sample" => Some(SUBDIR_SAMPLE),
        "sonstige" | "other" | "misc" => Some(SUBDIR_OTHER),
        _ => None,
    }
}

/// Decide whether a release tree contains TV-show content.
///
/// Checks the name itself, then immediate children, then a bounded-depth
/// walk for season directories or tagged files.
pub fn looks_like_tv_show(root: &Path) -> bool {
    if is_season_directory(root) {
        return true;
    }
    if let Some(name) = root.file_name().and_then(|name| name.to_str()) {
        if TV_TAG_RE.is_match(name) || EPISODE_ONLY_TAG_RE.is_match(name) {
            return true;
        }
    }

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(TV_SCAN_MAX_DEPTH)
        .into_iter()
        .filter_map(|entry| entry.ok())
    {
        let name = entry.file_name().to_string_lossy();
        if entry.file_type().is_dir() && is_season_directory(entry.path()) {
            return true;
        }
        if TV_TAG_RE.is_match(&name) || EPISODE_ONLY_TAG_RE.is_match(&name) {
            return true;
        }
    }

    false
}

/// Classify a release directory.
pub fn release_kind(root: &Path) -> ReleaseKind {
    if looks_like_tv_show(root) {
        ReleaseKind::TvShow
    } else {
        ReleaseKind::Movie
    }
}

/// The category prefix (`TV-Shows` or `Movies`) for a release directory.
pub fn category_prefix(root: &Path) -> &'static str {
    match release_kind(root) {
        ReleaseKind::TvShow => TV_CATEGORY,
        ReleaseKind::Movie => MOVIES_CATEGORY,
    }
}

/// Build the normalised library-relative path for a TV directory.
///
/// `The.Show.S02.GERMAN.1080p-GRP/The.Show.S02E01...` becomes
/// `TV-Shows/The Show/Season 02`; episode-only shows collapse to
/// `TV-Shows/<Show>` with no season directory.
pub fn build_tv_show_path(
    base_dir: &Path,
    download_root: &Path,
    prefix: &str,
) -> PathBuf {
    let rel_path = base_dir
        .strip_prefix(download_root)
        .unwrap_or(base_dir)
        .to_path_buf();
    let parts: Vec<String> = rel_path
        .components()
        .map(|part| part.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        return PathBuf::from(prefix).join(rel_path);
    }

    // First path segment carrying a season token wins. Both embedded tags
    // (`.S02`, `S02E01`) and season directory names (`Season 02`,
    // `Staffel 2`) count.
    let tagged = parts.iter().find(|segment| {
        SEASON_TAG_RE.is_match(segment)
            || SEASON_DIR_RE.is_match(segment)
            || STAFFEL_DIR_RE.is_match(segment)
            || SEASON_TAG_ALT_RE.is_match(segment)
    });

    if let Some(tagged) = tagged {
        let season = SEASON_TAG_RE
            .captures(tagged)
            .or_else(|| SEASON_DIR_RE.captures(tagged))
            .or_else(|| STAFFEL_DIR_RE.captures(tagged))
            .or_else(|| SEASON_TAG_ALT_RE.captures(tagged))
            .and_then(|caps| caps[1].parse::<u32>().ok());
        if let Some(season) = season {
            let season_dir = format!("Season {season:02}");
            let pure_season_dir = SEASON_SHORT_DIR_RE.is_match(tagged)
                || SEASON_DIR_RE.is_match(tagged)
                || STAFFEL_DIR_RE.is_match(tagged);
            let show_name = if pure_season_dir {
                clean_show_name(&parts[0])
            } else {
                let stripped = SEASON_SUFFIX_RE.replace(tagged, "");
                let name = clean_show_name(&stripped);
                if name.is_empty() {
                    clean_show_name(&parts[0])
                } else {
                    name
                }
            };
            return PathBuf::from(prefix).join(show_name).join(season_dir);
        }
    }

    // No season anywhere: an episode-only tag makes this a no-season show.
    for segment in &parts {
        if let Some(start) = episode_tag_start(segment) {
            let show_name = clean_show_name(&segment[..start]);
            let show_name = if show_name.is_empty() {
                clean_show_name(&parts[0])
            } else {
                show_name
            };
            return PathBuf::from(prefix).join(show_name);
        }
    }

    PathBuf::from(prefix).join(rel_path)
}

fn clean_show_name(raw: &str) -> String {
    raw.replace('.', " ")
        .trim()
        .trim_matches('-')
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn season_directory_variants() {
        assert!(is_season_directory(Path::new("/x/Season 01")));
        assert!(is_season_directory(Path::new("/x/Staffel 2")));
        assert!(is_season_directory(Path::new("/x/S03")));
        assert!(!is_season_directory(Path::new("/x/Some.Release-GRP")));
    }

    #[test]
    fn season_label_extraction() {
        assert_eq!(
            season_label_from_tag("The.Show.S02E01.1080p"),
            Some("Season 02".to_string())
        );
        assert_eq!(season_label_from_tag("Movie.2021.1080p"), None);
    }

    #[test]
    fn special_subdir_normalisation() {
        assert_eq!(normalize_special_subdir("Untertitel"), Some("Subs"));
        assert_eq!(normalize_special_subdir("sub"), Some("Subs"));
        assert_eq!(normalize_special_subdir("Sample"), Some("Sample"));
        assert_eq!(normalize_special_subdir("Misc"), Some("Sonstige"));
        assert_eq!(normalize_special_subdir("Proof"), None);
    }

    #[test]
    fn tv_path_for_season_pack() {
        let root = Path::new("/downloads");
        let base = Path::new("/downloads/The.Show.S02.GERMAN.1080p-GRP");
        let path = build_tv_show_path(base, root, "TV-Shows");
        assert_eq!(path, PathBuf::from("TV-Shows/The Show/Season 02"));
    }

    #[test]
    fn tv_path_for_pure_season_directory() {
        let root = Path::new("/downloads");
        let base = Path::new("/downloads/The.Show.Complete/Season 03");
        let path = build_tv_show_path(base, root, "TV-Shows");
        assert_eq!(
            path,
            PathBuf::from("TV-Shows/The Show Complete/Season 03")
        );
    }

    #[test]
    fn tv_path_for_episode_only_release() {
        let root = Path::new("/downloads");
        let base = Path::new("/downloads/The.Show.E05.GERMAN-GRP");
        let path = build_tv_show_path(base, root, "TV-Shows");
        assert_eq!(path, PathBuf::from("TV-Shows/The Show"));
    }

    #[test]
    fn movie_release_is_not_tv() {
        let tmp = TempDir::new().unwrap();
        let release = tmp.path().join("Example.Movie.2021.1080p-GRP");
        fs::create_dir_all(&release).unwrap();
        fs::write(release.join("Example.Movie.2021.1080p-GRP.rar"), b"x")
            .unwrap();
        assert_eq!(release_kind(&release), ReleaseKind::Movie);
        assert_eq!(category_prefix(&release), "Movies");
    }

    #[test]
    fn nested_season_directory_marks_tv() {
        let tmp = TempDir::new().unwrap();
        let release = tmp.path().join("Some.Show.Pack");
        fs::create_dir_all(release.join("Season 01")).unwrap();
        assert!(looks_like_tv_show(&release));
        assert_eq!(release_kind(&release), ReleaseKind::TvShow);
    }

    #[test]
    fn tagged_file_below_release_marks_tv() {
        let tmp = TempDir::new().unwrap();
        let release = tmp.path().join("Opaque.Pack.Name");
        fs::create_dir_all(release.join("disc")).unwrap();
        fs::write(release.join("disc/show.s01e04.mkv"), b"x").unwrap();
        assert!(looks_like_tv_show(&release));
    }
}
