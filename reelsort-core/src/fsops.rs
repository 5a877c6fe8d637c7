//! Filesystem operations with the fallbacks the pipeline relies on:
//! read-only and cross-device moves degrade to copy-then-delete, extraction
//! trees are flattened into library shape, and processed releases mirror
//! into the finished tree 1:1.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, error, warn};
use walkdir::WalkDir;

use crate::archive::groups::is_supported_archive;
use crate::archive::tokens::{UNWANTED_SUFFIXES, episode_tag};

/// Sibling folders whose content belongs to an episode next to them.
const RELATED_SUBDIR_NAMES: &[&str] =
    &["subs", "sub", "sample", "sonstige", "proof"];

const VIDEO_EXTENSIONS: &[&str] = &["mkv", "mp4", "avi", "mov", "m4v"];

/// Outcome of a move attempt that may have degraded to a copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Source is gone, destination exists.
    Moved,
    /// Destination exists but the source could not be deleted (typically a
    /// read-only filesystem); divergence is accepted.
    CopiedSourceRetained,
}

/// Per-file size history used by [`is_file_complete`], persisted in the
/// settings store under `file_status:<absolute-path>` keys.
#[async_trait]
pub trait FileStatusStore: Send + Sync {
    async fn file_status(&self, path: &Path) -> Option<(u64, DateTime<Utc>)>;
    async fn save_file_status(&self, path: &Path, size: u64);
}

/// Return the destination unchanged: collisions are overwritten by policy.
/// Implementations must not silently rename.
pub fn ensure_unique_destination(destination: PathBuf) -> PathBuf {
    destination
}

fn is_read_only_error(err: &std::io::Error) -> bool {
    // EROFS is 30 on the Unix platforms this runs on.
    err.raw_os_error() == Some(30)
        || err.to_string().contains("Read-only file system")
}

/// Move a file, falling back to copy-then-delete on read-only or
/// cross-device errors, and to normalised path forms for UNC paths.
pub fn move_file(src: &Path, dst: &Path) -> std::io::Result<MoveOutcome> {
    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent)?;
    }

    match std::fs::rename(src, dst) {
        Ok(()) => return Ok(MoveOutcome::Moved),
        Err(err) => {
            if is_read_only_error(&err) {
                warn!(
                    file = %src.display(),
                    "Read-only file system detected, using copy+delete"
                );
            } else {
                debug!(
                    source = %src.display(),
                    error = %err,
                    "direct move failed, falling back to copy"
                );
            }
        }
    }

    std::fs::copy(src, dst)?;
    if let Err(err) = std::fs::remove_file(src) {
        warn!(
            file = %src.display(),
            error = %err,
            "could not delete original file after copy"
        );
        return Ok(MoveOutcome::CopiedSourceRetained);
    }
    Ok(MoveOutcome::Moved)
}

/// If `directory` contains exactly one subdirectory and no files, lift the
/// subdirectory's contents up one level and remove it.
pub fn flatten_single_subdir(directory: &Path) {
    let Ok(entries) = std::fs::read_dir(directory) else {
        return;
    };
    let entries: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .collect();

    if entries.iter().any(|path| path.is_file()) {
        return;
    }
    let dirs: Vec<&PathBuf> =
        entries.iter().filter(|path| path.is_dir()).collect();
    if dirs.len() != 1 {
        return;
    }

    let only = dirs[0];
    let Ok(children) = std::fs::read_dir(only) else {
        return;
    };
    for child in children.filter_map(|entry| entry.ok()) {
        let dest = clash_free(directory, &child.file_name());
        if let Err(err) = std::fs::rename(child.path(), &dest) {
            warn!(
                source = %child.path().display(),
                error = %err,
                "failed to lift entry while flattening"
            );
        }
    }
    let _ = std::fs::remove_dir(only);
}

/// Flatten top-level directories created by the latest extraction, plus any
/// episode-named directories that may predate it. Used for no-season shows
/// where archives wrap their payload in a release-named folder.
pub fn flatten_new_top_level_dirs(
    target_dir: &Path,
    previous_names: &HashSet<String>,
) {
    let Ok(entries) = std::fs::read_dir(target_dir) else {
        return;
    };
    let current: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();

    let mut candidates: Vec<String> = current
        .iter()
        .filter(|name| {
            !previous_names.contains(*name) || episode_tag(name).is_some()
        })
        .cloned()
        .collect();
    candidates.sort();
    candidates.dedup();

    for name in candidates {
        let candidate = target_dir.join(&name);
        if !candidate.is_dir() {
            continue;
        }
        let lower = name.to_lowercase();
        if RELATED_SUBDIR_NAMES.contains(&lower.as_str()) {
            continue;
        }
        lift_children(&candidate, target_dir);
        let _ = std::fs::remove_dir(&candidate);
    }
}

/// Lift episode-like subdirectories so video files end up directly under
/// the library season folder. A directory counts as episode-like when its
/// name carries an episode tag or it contains a video file at any depth.
pub fn flatten_episode_like_dirs(target_dir: &Path) {
    let Ok(entries) = std::fs::read_dir(target_dir) else {
        return;
    };
    let candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();

    for candidate in candidates {
        let name = candidate
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tagged = episode_tag(&name).is_some();
        let has_video = tagged
            || WalkDir::new(&candidate)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .any(|entry| {
                    entry.file_type().is_file() && is_video_file(entry.path())
                });
        if !tagged && !has_video {
            continue;
        }

        lift_files_recursive(&candidate, target_dir);
        if directory_is_empty(&candidate) {
            let _ = std::fs::remove_dir(&candidate);
        }
    }
}

/// Copy non-archive companions (`.nfo`, `.srt`, ...) into the extraction
/// target; sources stay behind for the finished mirror. Returns the number
/// of files copied.
pub fn copy_companion_files(source_dir: &Path, target_dir: &Path) -> usize {
    if std::fs::create_dir_all(target_dir).is_err() {
        return 0;
    }
    let Ok(entries) = std::fs::read_dir(source_dir) else {
        return 0;
    };
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && !is_supported_archive(path))
        .collect();
    paths.sort_by_key(|path| {
        path.file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    });

    let mut copied = 0;
    for path in paths {
        if has_unwanted_suffix(&path) {
            continue;
        }
        let Some(name) = path.file_name() else { continue };
        let dest = ensure_unique_destination(target_dir.join(name));
        match std::fs::copy(&path, &dest) {
            Ok(_) => copied += 1,
            Err(err) => {
                error!(
                    file = %path.display(),
                    error = %err,
                    "error copying companion file"
                );
            }
        }
    }
    copied
}

/// Mirror every remaining file under a release directory into the finished
/// tree, preserving the release-relative sub-path.
pub fn move_release_tree_to_finished(
    current_dir: &Path,
    finished_root: &Path,
    download_root: &Path,
) {
    let (release_root, release_root_name) =
        release_root_of(current_dir, download_root);

    for entry in WalkDir::new(current_dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
    {
        let sub_rel = entry
            .path()
            .parent()
            .and_then(|parent| parent.strip_prefix(&release_root).ok())
            .unwrap_or_else(|| Path::new(""));
        let dest_dir = finished_root.join(&release_root_name).join(sub_rel);
        let dest = ensure_unique_destination(
            dest_dir.join(entry.file_name()),
        );
        if let Err(err) = move_file(entry.path(), &dest) {
            error!(
                source = %entry.path().display(),
                destination = %dest.display(),
                error = %err,
                "failed to move file into finished tree"
            );
        }
    }
}

/// Move files matching an episode's tag out of sibling special folders
/// (`Subs`, `Sample`, ...) so subtitles and proofs follow their episode
/// into the finished tree.
pub fn move_related_episode_artifacts(
    episode_dir: &Path,
    finished_root: &Path,
    download_root: &Path,
) {
    let Some(tag) = episode_dir
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(episode_tag)
    else {
        return;
    };
    let Some(parent) = episode_dir.parent() else {
        return;
    };
    let Ok(siblings) = std::fs::read_dir(parent) else {
        return;
    };

    let (release_root, release_root_name) =
        release_root_of(episode_dir, download_root);
    let sub_rel = episode_dir
        .strip_prefix(&release_root)
        .unwrap_or_else(|_| Path::new(""))
        .to_path_buf();

    for sibling in siblings.filter_map(|entry| entry.ok()) {
        let path = sibling.path();
        if path == episode_dir || !path.is_dir() {
            continue;
        }
        let name = sibling.file_name().to_string_lossy().to_lowercase();
        if !RELATED_SUBDIR_NAMES.contains(&name.trim()) {
            continue;
        }

        for entry in WalkDir::new(&path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
        {
            let file_name = entry.file_name().to_string_lossy().to_lowercase();
            if !file_name.contains(&tag) {
                continue;
            }
            let dest_dir =
                finished_root.join(&release_root_name).join(&sub_rel);
            let dest = ensure_unique_destination(
                dest_dir.join(entry.file_name()),
            );
            if let Err(err) = move_file(entry.path(), &dest) {
                warn!(
                    source = %entry.path().display(),
                    error = %err,
                    "failed to move related episode artifact"
                );
            }
        }
    }
}

/// Remove empty directories below `root`, deepest first.
pub fn remove_empty_subdirs(root: &Path) {
    let mut dirs: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_dir())
        .map(|entry| entry.into_path())
        .collect();
    dirs.sort_by_key(|path| std::cmp::Reverse(path.components().count()));
    for dir in dirs {
        if directory_is_empty(&dir) {
            let _ = std::fs::remove_dir(&dir);
        }
    }
}

/// Remove empty directories walking up from `directory` until `stop`
/// (exclusive) or the first non-empty ancestor.
pub fn remove_empty_tree(directory: &Path, stop: &Path) {
    let mut current = directory.to_path_buf();
    while current != stop && current.exists() {
        if !directory_is_empty(&current) {
            break;
        }
        if std::fs::remove_dir(&current).is_err() {
            break;
        }
        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }
}

/// Decide whether a non-archive file already present in the downloads tree
/// has finished arriving.
///
/// A file is complete once its size matches the previously recorded
/// observation and its mtime is older than `stability_hours`. The first
/// observation records the size and reports incomplete.
pub async fn is_file_complete(
    path: &Path,
    store: &dyn FileStatusStore,
    stability_hours: u32,
) -> bool {
    let Ok(meta) = std::fs::metadata(path) else {
        return false;
    };
    if !meta.is_file() {
        return false;
    }
    let size = meta.len();

    let Some((previous_size, _last_check)) = store.file_status(path).await
    else {
        store.save_file_status(path, size).await;
        return false;
    };

    if size != previous_size {
        store.save_file_status(path, size).await;
        return false;
    }

    let Ok(modified) = meta.modified() else {
        return false;
    };
    let modified: DateTime<Utc> = modified.into();
    let stable_for = Utc::now() - modified;
    stable_for >= chrono::Duration::hours(i64::from(stability_hours))
}

pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

pub fn has_unwanted_suffix(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    UNWANTED_SUFFIXES
        .iter()
        .any(|suffix| name.ends_with(suffix))
}

/// The release root is the first path segment below the download root.
fn release_root_of(
    current_dir: &Path,
    download_root: &Path,
) -> (PathBuf, String) {
    match current_dir.strip_prefix(download_root) {
        Ok(rel) => match rel.components().next() {
            Some(first) => {
                let name = first.as_os_str().to_string_lossy().into_owned();
                (download_root.join(&name), name)
            }
            None => (
                current_dir.to_path_buf(),
                current_dir
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            ),
        },
        Err(_) => (
            current_dir.to_path_buf(),
            current_dir
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
        ),
    }
}

fn directory_is_empty(directory: &Path) -> bool {
    std::fs::read_dir(directory)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}

fn lift_children(from: &Path, to: &Path) {
    let Ok(children) = std::fs::read_dir(from) else {
        return;
    };
    for child in children.filter_map(|entry| entry.ok()) {
        let dest = ensure_unique_destination(to.join(child.file_name()));
        if dest.exists() && dest.is_file() {
            let _ = std::fs::remove_file(&dest);
        }
        if let Err(err) = std::fs::rename(child.path(), &dest) {
            warn!(
                source = %child.path().display(),
                error = %err,
                "failed to lift entry"
            );
        }
    }
}

fn lift_files_recursive(current: &Path, top: &Path) {
    let Ok(entries) = std::fs::read_dir(current) else {
        return;
    };
    for entry in entries.filter_map(|entry| entry.ok()) {
        let path = entry.path();
        if path.is_dir() {
            lift_files_recursive(&path, top);
            if directory_is_empty(&path) {
                let _ = std::fs::remove_dir(&path);
            }
            continue;
        }
        let dest = ensure_unique_destination(top.join(entry.file_name()));
        if dest.exists() && dest != path {
            let _ = std::fs::remove_file(&dest);
        }
        if let Err(err) = std::fs::rename(&path, &dest) {
            warn!(
                source = %path.display(),
                error = %err,
                "failed to lift file"
            );
        }
    }
}

fn clash_free(dir: &Path, name: &std::ffi::OsStr) -> PathBuf {
    let mut destination = dir.join(name);
    let mut counter = 1;
    while destination.exists() {
        let name = name.to_string_lossy();
        let candidate = match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => {
                format!("{stem}_{counter}.{ext}")
            }
            _ => format!("{name}_{counter}"),
        };
        destination = dir.join(candidate);
        counter += 1;
    }
    destination
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct MemoryStore {
        entries: Mutex<HashMap<PathBuf, (u64, DateTime<Utc>)>>,
    }

    #[async_trait]
    impl FileStatusStore for MemoryStore {
        async fn file_status(
            &self,
            path: &Path,
        ) -> Option<(u64, DateTime<Utc>)> {
            self.entries.lock().unwrap().get(path).copied()
        }

        async fn save_file_status(&self, path: &Path, size: u64) {
            self.entries
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), (size, Utc::now()));
        }
    }

    #[test]
    fn unique_destination_is_identity() {
        let path = PathBuf::from("/library/Movies/Example (2021)/x.mkv");
        assert_eq!(ensure_unique_destination(path.clone()), path);
    }

    #[test]
    fn move_file_plain() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("a.bin");
        let dst = tmp.path().join("nested/b.bin");
        fs::write(&src, b"payload").unwrap();
        let outcome = move_file(&src, &dst).unwrap();
        assert_eq!(outcome, MoveOutcome::Moved);
        assert!(!src.exists());
        assert_eq!(fs::read(&dst).unwrap(), b"payload");
    }

    #[test]
    fn flatten_single_subdir_lifts_contents() {
        let tmp = TempDir::new().unwrap();
        let inner = tmp.path().join("wrapped");
        fs::create_dir_all(&inner).unwrap();
        fs::write(inner.join("movie.mkv"), b"x").unwrap();
        flatten_single_subdir(tmp.path());
        assert!(tmp.path().join("movie.mkv").exists());
        assert!(!inner.exists());
    }

    #[test]
    fn flatten_single_subdir_keeps_mixed_content() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("file.nfo"), b"x").unwrap();
        flatten_single_subdir(tmp.path());
        assert!(tmp.path().join("sub").exists());
    }

    #[test]
    fn flatten_episode_like_dirs_by_tag_and_video() {
        let tmp = TempDir::new().unwrap();
        let tagged = tmp.path().join("Show.E01-GRP");
        fs::create_dir_all(&tagged).unwrap();
        fs::write(tagged.join("Show.E01.mkv"), b"x").unwrap();
        let nested = tmp.path().join("untagged/deeper");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("clip.mkv"), b"x").unwrap();
        let plain = tmp.path().join("artwork");
        fs::create_dir_all(&plain).unwrap();
        fs::write(plain.join("cover.jpg"), b"x").unwrap();

        flatten_episode_like_dirs(tmp.path());

        assert!(tmp.path().join("Show.E01.mkv").exists());
        assert!(tmp.path().join("clip.mkv").exists());
        assert!(!tagged.exists());
        // Directories without videos or tags stay put.
        assert!(plain.join("cover.jpg").exists());
    }

    #[test]
    fn companion_files_copied_but_sources_remain() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("release");
        let dst = tmp.path().join("target");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("movie.nfo"), b"meta").unwrap();
        fs::write(src.join("movie.sfv"), b"crc").unwrap();
        fs::write(src.join("movie.part01.rar"), b"arc").unwrap();

        let copied = copy_companion_files(&src, &dst);
        assert_eq!(copied, 1);
        assert!(dst.join("movie.nfo").exists());
        assert!(!dst.join("movie.sfv").exists());
        assert!(!dst.join("movie.part01.rar").exists());
        assert!(src.join("movie.nfo").exists());
    }

    #[test]
    fn finished_mirror_preserves_relative_subpath() {
        let tmp = TempDir::new().unwrap();
        let downloads = tmp.path().join("downloads");
        let finished = tmp.path().join("finished");
        let episode = downloads.join("The.Show.S01-GRP/The.Show.S01E01-GRP");
        fs::create_dir_all(&episode).unwrap();
        fs::write(episode.join("e01.part01.rar"), b"x").unwrap();

        move_release_tree_to_finished(&episode, &finished, &downloads);

        assert!(
            finished
                .join("The.Show.S01-GRP/The.Show.S01E01-GRP/e01.part01.rar")
                .exists()
        );
        assert!(!episode.join("e01.part01.rar").exists());
    }

    #[test]
    fn related_artifacts_follow_their_episode() {
        let tmp = TempDir::new().unwrap();
        let downloads = tmp.path().join("downloads");
        let finished = tmp.path().join("finished");
        let release = downloads.join("The.Show.S01-GRP");
        let episode = release.join("The.Show.E01-GRP");
        let subs = release.join("Subs");
        fs::create_dir_all(&episode).unwrap();
        fs::create_dir_all(&subs).unwrap();
        fs::write(subs.join("The.Show.E01.srt"), b"x").unwrap();
        fs::write(subs.join("The.Show.E02.srt"), b"x").unwrap();

        move_related_episode_artifacts(&episode, &finished, &downloads);

        assert!(
            finished
                .join("The.Show.S01-GRP/The.Show.E01-GRP/The.Show.E01.srt")
                .exists()
        );
        assert!(subs.join("The.Show.E02.srt").exists());
    }

    #[test]
    fn empty_tree_removal_stops_at_root() {
        let tmp = TempDir::new().unwrap();
        let deep = tmp.path().join("a/b/c");
        fs::create_dir_all(&deep).unwrap();
        remove_empty_tree(&deep, tmp.path());
        assert!(!tmp.path().join("a").exists());
        assert!(tmp.path().exists());
    }

    #[tokio::test]
    async fn first_observation_is_incomplete() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("drop.mkv");
        fs::write(&file, b"data").unwrap();
        let store = MemoryStore::default();

        assert!(!is_file_complete(&file, &store, 1).await);
        // Second observation with the same size but a fresh mtime is still
        // incomplete.
        assert!(!is_file_complete(&file, &store, 1).await);
    }

    #[tokio::test]
    async fn stable_old_file_is_complete() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("drop.mkv");
        fs::write(&file, b"data").unwrap();
        let store = MemoryStore::default();
        store.save_file_status(&file, 4).await;

        let old = std::time::SystemTime::now()
            - std::time::Duration::from_secs(2 * 3600);
        fs::File::options()
            .write(true)
            .open(&file)
            .unwrap()
            .set_modified(old)
            .unwrap();

        assert!(is_file_complete(&file, &store, 1).await);
    }

    #[tokio::test]
    async fn size_change_resets_completeness() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("drop.mkv");
        fs::write(&file, b"data").unwrap();
        let store = MemoryStore::default();
        store.save_file_status(&file, 2).await;

        assert!(!is_file_complete(&file, &store, 1).await);
        // The new size was recorded on the mismatch.
        assert_eq!(store.file_status(&file).await.unwrap().0, 4);
    }
}
