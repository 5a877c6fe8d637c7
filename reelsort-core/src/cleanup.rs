//! Retention-based cleanup of the finished tree.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use tracing::{error, info};
use walkdir::WalkDir;

/// What the retention sweep did (or would have done).
#[derive(Debug, Default)]
pub struct CleanupReport {
    pub deleted: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Delete files under the finished root whose mtime is older than
/// `retention_days`. Deletion only happens with `enable_delete`; demo mode
/// logs what would be removed. Emptied directories are pruned afterwards,
/// never the finished root itself.
pub fn cleanup_finished(
    finished_root: &Path,
    retention_days: u32,
    enable_delete: bool,
    demo_mode: bool,
) -> CleanupReport {
    let cutoff = Utc::now() - Duration::days(i64::from(retention_days));
    let mut report = CleanupReport::default();
    let mut candidate_dirs: HashSet<PathBuf> = HashSet::new();

    for entry in WalkDir::new(finished_root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
    {
        let path = entry.path();
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        let Ok(modified) = metadata.modified() else {
            continue;
        };
        let modified: DateTime<Utc> = modified.into();
        if modified > cutoff {
            continue;
        }

        if demo_mode {
            info!(file = %path.display(), "demo: would delete");
            report.skipped.push(path.to_path_buf());
            continue;
        }
        if !enable_delete {
            info!(
                file = %path.display(),
                "delete switch disabled, skipping deletion"
            );
            report.skipped.push(path.to_path_buf());
            continue;
        }

        match std::fs::remove_file(path) {
            Ok(()) => {
                report.deleted.push(path.to_path_buf());
                if let Some(parent) = path.parent() {
                    candidate_dirs.insert(parent.to_path_buf());
                }
            }
            Err(err) => {
                error!(
                    file = %path.display(),
                    error = %err,
                    "could not delete finished file"
                );
                report.failed.push(path.to_path_buf());
            }
        }
    }

    if enable_delete && !demo_mode {
        remove_emptied_directories(candidate_dirs, finished_root);
    }

    report
}

fn remove_emptied_directories(
    candidates: HashSet<PathBuf>,
    finished_root: &Path,
) {
    let mut candidates: Vec<PathBuf> = candidates.into_iter().collect();
    candidates.sort_by_key(|path| std::cmp::Reverse(path.components().count()));
    for directory in candidates {
        let mut current = directory;
        while current != finished_root {
            if std::fs::remove_dir(&current).is_err() {
                break;
            }
            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{Duration as StdDuration, SystemTime};
    use tempfile::TempDir;

    fn write_aged(path: &Path, days_old: u64) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
        let mtime = SystemTime::now()
            - StdDuration::from_secs(days_old * 24 * 3600);
        fs::File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(mtime)
            .unwrap();
    }

    #[test]
    fn old_files_deleted_and_directories_pruned() {
        let tmp = TempDir::new().unwrap();
        let old = tmp.path().join("Old.Release/sub/old.rar");
        let fresh = tmp.path().join("Fresh.Release/fresh.rar");
        write_aged(&old, 30);
        write_aged(&fresh, 1);

        let report = cleanup_finished(tmp.path(), 15, true, false);
        assert_eq!(report.deleted, vec![old.clone()]);
        assert!(report.failed.is_empty());
        assert!(!old.exists());
        assert!(!tmp.path().join("Old.Release").exists());
        assert!(fresh.exists());
        assert!(tmp.path().exists());
    }

    #[test]
    fn delete_switch_off_only_reports() {
        let tmp = TempDir::new().unwrap();
        let old = tmp.path().join("Old.Release/old.rar");
        write_aged(&old, 30);

        let report = cleanup_finished(tmp.path(), 15, false, false);
        assert!(report.deleted.is_empty());
        assert_eq!(report.skipped, vec![old.clone()]);
        assert!(old.exists());
    }

    #[test]
    fn demo_mode_only_reports() {
        let tmp = TempDir::new().unwrap();
        let old = tmp.path().join("Old.Release/old.rar");
        write_aged(&old, 30);

        let report = cleanup_finished(tmp.path(), 15, true, true);
        assert!(report.deleted.is_empty());
        assert_eq!(report.skipped.len(), 1);
        assert!(old.exists());
    }
}
