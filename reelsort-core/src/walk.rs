//! Release tree walker: enumerates the ordered contexts of a release.
//!
//! A context is one source directory to process as a unit, paired with its
//! library-relative destination and an extraction flag. The release root is
//! always yielded last as the main context; its failure rolls back the
//! whole release.

use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::archive::tokens::{
    EPISODE_ONLY_TAG_RE, MOVIES_CATEGORY, SUBDIR_OTHER, SUBDIR_SAMPLE,
    SUBDIR_SUBS, TV_CATEGORY, TV_TAG_RE,
};
use crate::archive::groups::split_directory_entries;
use crate::layout::{
    build_tv_show_path, is_season_directory, looks_like_tv_show,
    normalize_special_subdir,
};

/// Which special release subdirectories are processed.
#[derive(Debug, Clone, Copy)]
pub struct SubfolderPolicy {
    pub include_sample: bool,
    pub include_sub: bool,
    pub include_other: bool,
}

impl Default for SubfolderPolicy {
    fn default() -> Self {
        Self {
            include_sample: false,
            include_sub: true,
            include_other: false,
        }
    }
}

/// One unit of work within a release.
#[derive(Debug, Clone)]
pub struct ReleaseContext {
    /// Directory whose content is processed.
    pub source: PathBuf,
    /// Destination path relative to the extracted root.
    pub target_rel: PathBuf,
    /// Whether archives in this context are extracted (policy-gated for
    /// special subdirectories).
    pub should_extract: bool,
}

/// Callback invoked for every entry the walker inspects, so callers can
/// surface live reading progress with an exact denominator.
pub trait DirectoryObserver {
    fn on_directory(&mut self, path: &Path);
}

/// Adapter turning a closure into a [`DirectoryObserver`].
#[derive(Debug)]
pub struct FnObserver<F>(pub F);

impl<F: FnMut(&Path)> DirectoryObserver for FnObserver<F> {
    fn on_directory(&mut self, path: &Path) {
        (self.0)(path)
    }
}

/// No-op observer for callers that do not track reading progress.
#[derive(Debug, Default)]
pub struct NullObserver;

impl DirectoryObserver for NullObserver {
    fn on_directory(&mut self, _path: &Path) {}
}

/// Enumerate the ordered context list for one release.
///
/// Subdirectories come first (specials, episodes, season content), the
/// release root itself is appended last as the main context.
pub fn release_contexts(
    base_dir: &Path,
    download_root: &Path,
    policy: &SubfolderPolicy,
    observer: &mut dyn DirectoryObserver,
) -> Vec<ReleaseContext> {
    let mut contexts = Vec::new();
    collect_contexts(base_dir, download_root, policy, observer, &mut contexts);

    if contains_archives(base_dir) || contains_files(base_dir) {
        let main_rel = target_for(base_dir, base_dir, download_root);
        contexts.push(ReleaseContext {
            source: base_dir.to_path_buf(),
            target_rel: main_rel,
            should_extract: true,
        });
    }
    contexts
}

fn collect_contexts(
    base_dir: &Path,
    download_root: &Path,
    policy: &SubfolderPolicy,
    observer: &mut dyn DirectoryObserver,
    contexts: &mut Vec<ReleaseContext>,
) {
    let children = match sorted_children(base_dir) {
        Ok(children) => children,
        Err(err) => {
            // A release can disappear mid-scan; skip it rather than
            // aborting the whole run.
            error!(
                directory = %base_dir.display(),
                error = %err,
                "unable to list directory, skipping"
            );
            return;
        }
    };

    let base_has_tv_tag = name_has_tv_tag(base_dir);
    let base_is_season = is_season_directory(base_dir);

    for child in children {
        observer.on_directory(&child);
        if !child.is_dir() {
            continue;
        }

        let child_name = child
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let normalized = normalize_special_subdir(&child_name);
        let child_has_archives = contains_archives(&child);
        let child_has_files = contains_files(&child);

        // Policy decides for well-known folders; episode directories under
        // a season (or a TV-tagged parent) always extract; anything else
        // follows the include_other switch.
        let should_extract = match normalized {
            Some(SUBDIR_SAMPLE) => policy.include_sample,
            Some(SUBDIR_SUBS) => policy.include_sub,
            Some(SUBDIR_OTHER) => policy.include_other,
            _ => {
                if (base_is_season || base_has_tv_tag)
                    && (child_has_archives || child_has_files)
                {
                    true
                } else {
                    policy.include_other
                }
            }
        };

        // Episode directories inside a season flatten into the season
        // destination: no per-episode subfolder survives in the library.
        if base_is_season && (child_has_archives || child_has_files) {
            let season_rel = target_for(base_dir, base_dir, download_root);
            debug!(
                episode = %child_name,
                target = %season_rel.display(),
                "season child flattens into season folder"
            );
            contexts.push(ReleaseContext {
                source: child,
                target_rel: season_rel,
                should_extract,
            });
            continue;
        }

        if let Some(normalized) = normalized {
            let rel =
                target_for(base_dir, base_dir, download_root).join(normalized);
            contexts.push(ReleaseContext {
                source: child,
                target_rel: rel,
                should_extract,
            });
            continue;
        }

        if is_season_directory(&child) {
            collect_contexts(&child, download_root, policy, observer, contexts);
            if contains_archives(&child) || contains_files(&child) {
                let rel = target_for(&child, &child, download_root);
                contexts.push(ReleaseContext {
                    source: child,
                    target_rel: rel,
                    should_extract: true,
                });
            }
            continue;
        }

        if name_has_tv_tag(&child) {
            collect_contexts(&child, download_root, policy, observer, contexts);
            if contains_archives(&child) || contains_files(&child) {
                let rel = target_for(&child, &child, download_root);
                contexts.push(ReleaseContext {
                    source: child,
                    target_rel: rel,
                    should_extract: true,
                });
            }
            continue;
        }

        if should_extract {
            let rel = target_for(base_dir, &child, download_root);
            contexts.push(ReleaseContext {
                source: child,
                target_rel: rel,
                should_extract: true,
            });
        }
    }
}

/// Destination (relative to the extracted root) for `target` within the
/// release rooted near `classify_dir`.
fn target_for(
    classify_dir: &Path,
    target: &Path,
    download_root: &Path,
) -> PathBuf {
    if looks_like_tv_show(classify_dir) {
        build_tv_show_path(target, download_root, TV_CATEGORY)
    } else {
        PathBuf::from(MOVIES_CATEGORY).join(
            target
                .strip_prefix(download_root)
                .unwrap_or(target)
                .to_path_buf(),
        )
    }
}

fn name_has_tv_tag(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| {
            TV_TAG_RE.is_match(name) || EPISODE_ONLY_TAG_RE.is_match(name)
        })
}

fn sorted_children(directory: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut children: Vec<PathBuf> = std::fs::read_dir(directory)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .collect();
    children.sort_by_key(|path| {
        path.file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    });
    Ok(children)
}

fn contains_archives(directory: &Path) -> bool {
    split_directory_entries(directory)
        .map(|(archives, _)| !archives.is_empty())
        .unwrap_or(false)
}

fn contains_files(directory: &Path) -> bool {
    std::fs::read_dir(directory)
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok())
                .any(|entry| entry.path().is_file())
        })
        .unwrap_or(false)
}
