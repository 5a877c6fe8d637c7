//! Archive discovery, grouping and completeness validation.
//!
//! Release groups ship multi-volume archives in three shapes: modern
//! `.partNN.<ext>` volumes, legacy `.rNN` RAR continuations, and numeric
//! split suffixes (`.zip.001`). Files sharing a normalised base form one
//! [`ArchiveGroup`]; a group is only handed to the extraction driver once
//! validation proves the volume run is complete.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::tokens::{
    INCOMPLETE_SUFFIX, PART_VOLUME_RE, R_VOLUME_RE, SPLIT_EXT_RE,
    has_supported_suffix,
};

/// A set of files that together constitute one logical archive.
#[derive(Debug, Clone)]
pub struct ArchiveGroup {
    /// Identifier shared by all volumes of the same archive.
    pub key: String,
    /// Member the extraction tool is invoked on.
    pub primary: PathBuf,
    /// All volumes, ordered by volume index then filename.
    pub members: Vec<PathBuf>,
    /// Volume index per member; −1 for singletons.
    pub order_map: HashMap<PathBuf, i32>,
}

impl ArchiveGroup {
    /// Number of volumes in this group.
    pub fn part_count(&self) -> usize {
        self.members.len()
    }
}

/// Why a group must not be extracted yet.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GroupValidationError {
    #[error("part {0} is still downloading (.dctmp)")]
    StillDownloading(String),

    #[error("missing volume index(es): {}", join_indices(.0))]
    MissingVolumes(Vec<i32>),

    #[error(
        "found volume {found} but sequence ends at {last} - download may still be in progress"
    )]
    TrailingVolume { found: i32, last: i32 },

    #[error("missing base .rar volume")]
    MissingBaseRar,

    #[error("primary archive file is missing")]
    PrimaryMissing,
}

fn join_indices(indices: &[i32]) -> String {
    indices
        .iter()
        .map(|index| index.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Check whether a file is an archive the pipeline can handle, including
/// multi-volume members and `.dctmp` intermediates.
pub fn is_supported_archive(entry: &Path) -> bool {
    let Some(name) = entry.file_name().and_then(|name| name.to_str()) else {
        return false;
    };
    let name = name.to_lowercase();

    if name.ends_with(".rar") || name.ends_with(INCOMPLETE_SUFFIX) {
        return true;
    }
    if has_supported_suffix(&name) {
        return true;
    }

    if let Some(caps) = PART_VOLUME_RE.captures(&name) {
        let candidate = format!("{}{}", &caps["base"], &caps["ext"]);
        if has_supported_suffix(&candidate) || candidate.ends_with(".rar") {
            return true;
        }
    }

    if R_VOLUME_RE.is_match(&name) {
        return true;
    }

    if let Some(caps) = SPLIT_EXT_RE.captures(&name) {
        let candidate = format!("{}{}", &caps["base"], &caps["ext"]);
        if has_supported_suffix(&candidate) || candidate.ends_with(".rar") {
            return true;
        }
    }

    false
}

/// Split a directory's files into supported archives and everything else.
/// Both lists are sorted case-insensitively by filename.
pub fn split_directory_entries(
    directory: &Path,
) -> std::io::Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(directory)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    entries.sort_by_key(|path| {
        path.file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    });

    let mut supported = Vec::new();
    let mut unsupported = Vec::new();
    for entry in entries {
        if is_supported_archive(&entry) {
            supported.push(entry);
        } else {
            unsupported.push(entry);
        }
    }
    Ok((supported, unsupported))
}

/// Grouping key and volume index for an archive file.
///
/// A trailing `.dctmp` is stripped before matching so a half-downloaded
/// volume still lands in the group it belongs to. Singletons get index −1.
pub fn archive_group_key(archive: &Path) -> (String, i32) {
    let mut name = archive
        .file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if let Some(stripped) = name.strip_suffix(INCOMPLETE_SUFFIX) {
        name = stripped.to_string();
    }

    // Modern part volumes take precedence over the split pattern, which
    // would otherwise swallow ".part01" as part of the extension run.
    if let Some(caps) = PART_VOLUME_RE.captures(&name) {
        let base = format!("{}{}", &caps["base"], &caps["ext"]);
        let index: i32 = caps["index"].parse().unwrap_or(0);
        return (base, index.max(0));
    }

    if let Some(caps) = R_VOLUME_RE.captures(&name) {
        let base = format!("{}.rar", &caps["base"]);
        let index: i32 = caps["index"].parse().unwrap_or(0);
        return (base, index.max(0));
    }

    if let Some(caps) = SPLIT_EXT_RE.captures(&name) {
        let base = format!("{}{}", &caps["base"], &caps["ext"]);
        let index: i32 = caps["index"].parse().unwrap_or(0);
        return (base, index.max(0));
    }

    (name, -1)
}

/// Cluster archive files into logical groups, sorted by primary filename.
pub fn build_archive_groups(archives: &[PathBuf]) -> Vec<ArchiveGroup> {
    let mut grouped: HashMap<String, Vec<(i32, PathBuf)>> = HashMap::new();
    for archive in archives {
        let (key, order) = archive_group_key(archive);
        grouped.entry(key).or_default().push((order, archive.clone()));
    }

    let mut groups: Vec<ArchiveGroup> = grouped
        .into_iter()
        .map(|(key, mut items)| {
            items.sort_by(|a, b| {
                a.0.cmp(&b.0).then_with(|| {
                    let left = a.1.file_name().map(|n| n.to_string_lossy().to_lowercase());
                    let right = b.1.file_name().map(|n| n.to_string_lossy().to_lowercase());
                    left.cmp(&right)
                })
            });
            let members: Vec<PathBuf> =
                items.iter().map(|(_, path)| path.clone()).collect();
            let order_map: HashMap<PathBuf, i32> = items
                .iter()
                .map(|(order, path)| (path.clone(), *order))
                .collect();
            let primary = members[0].clone();
            ArchiveGroup {
                key,
                primary,
                members,
                order_map,
            }
        })
        .collect();

    groups.sort_by_key(|group| {
        group
            .primary
            .file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    });
    groups
}

/// Validate that a group is complete and safe to extract.
///
/// With `check_completeness` the parent directory is also scanned for
/// volumes indexed beyond the group's highest member, which indicates a
/// download still in flight.
pub fn validate_archive_group(
    group: &ArchiveGroup,
    check_completeness: bool,
) -> Result<(), GroupValidationError> {
    for member in &group.members {
        let name = member
            .file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if name.ends_with(INCOMPLETE_SUFFIX) {
            return Err(GroupValidationError::StillDownloading(
                member
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            ));
        }
    }

    let mut positives: Vec<i32> = group
        .order_map
        .values()
        .copied()
        .filter(|order| *order >= 0)
        .collect();
    positives.sort_unstable();

    if !positives.is_empty() {
        // Volume runs start at 0 or 1 depending on the packer.
        let start = if positives.contains(&0) {
            0
        } else if positives.contains(&1) {
            1
        } else {
            positives[0]
        };
        let expected: Vec<i32> =
            (start..start + positives.len() as i32).collect();
        if positives != expected {
            let missing: Vec<i32> = expected
                .iter()
                .copied()
                .filter(|index| !positives.contains(index))
                .collect();
            if !missing.is_empty() {
                return Err(GroupValidationError::MissingVolumes(missing));
            }
        }

        if check_completeness {
            if let Some(&last) = positives.last() {
                scan_for_trailing_volumes(group, last)?;
            }
        }

        // Legacy .rNN volume sets need the base .rar on disk; modern
        // .partNN.rar sets do not.
        if group.key.ends_with(".rar")
            && !group.order_map.values().any(|order| *order < 0)
        {
            let modern_part_format = group.members.iter().any(|member| {
                member
                    .file_name()
                    .map(|name| name.to_string_lossy().to_lowercase())
                    .is_some_and(|name| name.contains(".part"))
            });
            if !modern_part_format {
                return Err(GroupValidationError::MissingBaseRar);
            }
        }
    }

    if !group.primary.exists() {
        return Err(GroupValidationError::PrimaryMissing);
    }

    Ok(())
}

/// Look for sibling files indexed past the group's last volume.
fn scan_for_trailing_volumes(
    group: &ArchiveGroup,
    last: i32,
) -> Result<(), GroupValidationError> {
    let Some(parent) = group.primary.parent() else {
        return Ok(());
    };
    let Ok(entries) = std::fs::read_dir(parent) else {
        // Unreadable directory: assume complete rather than stalling forever.
        return Ok(());
    };

    for entry in entries.filter_map(|entry| entry.ok()) {
        let path = entry.path();
        if !path.is_file() || group.members.contains(&path) {
            continue;
        }
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let candidates = [
            PART_VOLUME_RE.captures(&name).map(|caps| {
                (
                    format!("{}{}", &caps["base"], &caps["ext"]),
                    caps["index"].parse::<i32>().unwrap_or(0),
                )
            }),
            R_VOLUME_RE.captures(&name).map(|caps| {
                (
                    format!("{}.rar", &caps["base"]),
                    caps["index"].parse::<i32>().unwrap_or(0),
                )
            }),
            SPLIT_EXT_RE.captures(&name).map(|caps| {
                (
                    format!("{}{}", &caps["base"], &caps["ext"]),
                    caps["index"].parse::<i32>().unwrap_or(0),
                )
            }),
        ];

        for candidate in candidates.into_iter().flatten() {
            let (base, index) = candidate;
            if base == group.key.to_lowercase() && index > last {
                return Err(GroupValidationError::TrailingVolume {
                    found: index,
                    last,
                });
            }
        }
    }

    Ok(())
}
