//! Driver for the external archive tool.
//!
//! The pipeline shells out to a 7-Zip-compatible binary for everything:
//! extraction with progress, list-mode volume counting, and test-mode
//! integrity probing. The binary name is never assumed; it is either
//! configured or auto-detected from a small candidate list.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

use super::groups::ArchiveGroup;
use super::tokens::UNWANTED_SUFFIXES;
use crate::error::{PipelineError, Result};

/// Candidate executables probed when no tool path is configured.
const TOOL_CANDIDATES: &[&str] = &["7z", "7za", "7zr"];

/// Output of `l` mode carries a `Volumes: N` line for multi-volume sets.
static VOLUME_COUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)volumes:\s*(\d+)").unwrap());

/// Integer percent token emitted by `-bsp1` progress lines.
static PERCENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,3})%").unwrap());

/// Failure markers scanned for in test-mode output.
const INTEGRITY_MARKERS: &[&str] = &[
    "crc failed",
    "missing volume",
    "unexpected end of archive",
    "data error",
];

/// Handle on the resolved external archive tool.
#[derive(Debug, Clone)]
pub struct ArchiveTool {
    command: String,
}

impl ArchiveTool {
    /// Resolve the tool from an explicit path or the candidate list.
    pub fn resolve(configured: Option<&Path>) -> Result<Self> {
        if let Some(configured) = configured {
            if configured.is_absolute() && configured.exists() {
                return Ok(Self::with_command(
                    configured.to_string_lossy().into_owned(),
                ));
            }
            if let Ok(found) = which::which(configured) {
                return Ok(Self::with_command(
                    found.to_string_lossy().into_owned(),
                ));
            }
            let relative = std::env::current_dir()
                .map(|cwd| cwd.join(configured))
                .unwrap_or_else(|_| configured.to_path_buf());
            if relative.exists() {
                return Ok(Self::with_command(
                    relative.to_string_lossy().into_owned(),
                ));
            }
            return Err(PipelineError::ToolMissing(
                configured.to_string_lossy().into_owned(),
            ));
        }

        for candidate in TOOL_CANDIDATES {
            if let Ok(found) = which::which(candidate) {
                return Ok(Self::with_command(
                    found.to_string_lossy().into_owned(),
                ));
            }
        }
        Err(PipelineError::ToolMissing(format!(
            "none of {} found on PATH",
            TOOL_CANDIDATES.join(", ")
        )))
    }

    /// Wrap an already-known command without probing the filesystem.
    pub fn with_command(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Version line reported by the tool, for system health.
    pub async fn version(&self) -> String {
        let output = Command::new(&self.command)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .stdin(Stdio::null())
            .output()
            .await;
        let Ok(output) = output else {
            return "unknown".to_string();
        };
        let text = String::from_utf8_lossy(&output.stdout);
        text.lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("unknown")
            .to_string()
    }

    /// Read the volume count from the archive header via list mode.
    ///
    /// Archives without a `Volumes:` line count as a single volume.
    pub async fn volume_count(&self, archive: &Path) -> Result<u64> {
        let future = Command::new(&self.command)
            .arg("l")
            .arg(long_path(archive))
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();
        let output = tokio::time::timeout(Duration::from_secs(30), future)
            .await
            .map_err(|_| PipelineError::PrecheckFailed {
                archive: archive.to_path_buf(),
                reason: "volume listing timed out".to_string(),
            })?
            .map_err(|err| PipelineError::PrecheckFailed {
                archive: archive.to_path_buf(),
                reason: format!("failed to run archive tool: {err}"),
            })?;

        if !output.status.success() {
            return Err(PipelineError::PrecheckFailed {
                archive: archive.to_path_buf(),
                reason: format!(
                    "volume listing failed (exit code {})",
                    output.status.code().unwrap_or(-1)
                ),
            });
        }

        let combined = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        let count = VOLUME_COUNT_RE
            .captures(&combined)
            .and_then(|caps| caps[1].parse().ok())
            .unwrap_or(1);
        Ok(count)
    }

    /// Run the tool in test mode and scan for corruption markers.
    pub async fn probe_integrity(&self, archive: &Path) -> Result<()> {
        let output = Command::new(&self.command)
            .arg("t")
            .arg(long_path(archive))
            .arg("-y")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|err| PipelineError::PrecheckFailed {
                archive: archive.to_path_buf(),
                reason: format!("failed to run archive tool: {err}"),
            })?;

        let combined = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
        .to_lowercase();

        for marker in INTEGRITY_MARKERS {
            if combined.contains(marker) {
                return Err(PipelineError::PrecheckFailed {
                    archive: archive.to_path_buf(),
                    reason: format!("integrity test reported: {marker}"),
                });
            }
        }
        if !output.status.success() {
            return Err(PipelineError::PrecheckFailed {
                archive: archive.to_path_buf(),
                reason: format!(
                    "integrity test failed (exit code {})",
                    output.status.code().unwrap_or(-1)
                ),
            });
        }
        Ok(())
    }

    /// Extract a validated group into `target`, reporting part-granular
    /// progress parsed from the tool's percent output.
    ///
    /// On a non-zero exit the extraction is retried once through a freshly
    /// created short-named temporary directory before giving up.
    pub async fn extract(
        &self,
        group: &ArchiveGroup,
        target: &Path,
        cpu_cores: u32,
        progress: &mut (dyn FnMut(usize, usize) + Send),
    ) -> Result<()> {
        tokio::fs::create_dir_all(target).await.map_err(|source| {
            PipelineError::Filesystem {
                path: target.to_path_buf(),
                source,
            }
        })?;

        let part_count = group.part_count().max(1);
        let mut child = Command::new(&self.command)
            .arg("x")
            .arg(long_path(&group.primary))
            .arg(format!("-o{}", long_path(target).display()))
            .arg("-y")
            .arg(format!("-mmt{cpu_cores}"))
            .arg("-bsp1")
            .arg("-bso1")
            .arg("-bb1")
            .arg("-x!*.sfv")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| PipelineError::ExtractionFailed {
                archive: group.primary.clone(),
                reason: format!("failed to spawn archive tool: {err}"),
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let stderr_task = tokio::spawn(async move {
            let mut buffer = String::new();
            if let Some(mut stderr) = stderr {
                let _ = stderr.read_to_string(&mut buffer).await;
            }
            buffer
        });

        let mut last_percent: i32 = -1;
        if let Some(stdout) = stdout {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                let text = line.trim();
                if text.is_empty() {
                    continue;
                }
                debug!(target: "reelsort::extract", "{}", text);
                if let Some(caps) = PERCENT_RE.captures(text) {
                    let percent: i32 =
                        caps[1].parse::<i32>().unwrap_or(0).clamp(0, 100);
                    if percent != last_percent {
                        last_percent = percent;
                        let current = (((percent as f64) / 100.0
                            * part_count as f64)
                            .round() as usize)
                            .clamp(1, part_count);
                        progress(current, part_count);
                    }
                }
            }
        }

        let status = child.wait().await.map_err(|err| {
            PipelineError::ExtractionFailed {
                archive: group.primary.clone(),
                reason: format!("failed to wait for archive tool: {err}"),
            }
        })?;
        let stderr_tail = stderr_task.await.unwrap_or_default();

        if status.success() {
            progress(part_count, part_count);
            fix_permissions(target);
            return Ok(());
        }

        warn!(
            archive = %group.primary.display(),
            code = status.code().unwrap_or(-1),
            "extraction failed, retrying through a temporary directory"
        );
        self.extract_via_tempdir(group, target, cpu_cores, &stderr_tail)
            .await
    }

    /// Fallback: extract into a short temporary path, then move the
    /// top-level entries into the intended target.
    async fn extract_via_tempdir(
        &self,
        group: &ArchiveGroup,
        target: &Path,
        cpu_cores: u32,
        first_error: &str,
    ) -> Result<()> {
        let tmp = tempfile::tempdir().map_err(|err| {
            PipelineError::ExtractionFailed {
                archive: group.primary.clone(),
                reason: format!("failed to create temporary directory: {err}"),
            }
        })?;

        let output = Command::new(&self.command)
            .arg("x")
            .arg(long_path(&group.primary))
            .arg(format!("-o{}", tmp.path().display()))
            .arg("-y")
            .arg(format!("-mmt{cpu_cores}"))
            .arg("-bsp1")
            .arg("-bso1")
            .arg("-bb1")
            .arg("-x!*.sfv")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|err| PipelineError::ExtractionFailed {
                archive: group.primary.clone(),
                reason: format!("failed to spawn archive tool: {err}"),
            })?;

        if !output.status.success() {
            let retry_error = String::from_utf8_lossy(&output.stderr);
            return Err(PipelineError::ExtractionFailed {
                archive: group.primary.clone(),
                reason: format!(
                    "tool exited with {} after fallback: {}",
                    output.status.code().unwrap_or(-1),
                    tail(if retry_error.trim().is_empty() {
                        first_error
                    } else {
                        &retry_error
                    }),
                ),
            });
        }

        remove_unwanted_files(tmp.path());

        tokio::fs::create_dir_all(target).await.map_err(|source| {
            PipelineError::Filesystem {
                path: target.to_path_buf(),
                source,
            }
        })?;
        let entries =
            std::fs::read_dir(tmp.path()).map_err(|source| {
                PipelineError::Filesystem {
                    path: tmp.path().to_path_buf(),
                    source,
                }
            })?;
        for entry in entries.filter_map(|entry| entry.ok()) {
            let destination =
                clash_free_destination(target, &entry.file_name());
            if let Err(err) = std::fs::rename(entry.path(), &destination) {
                warn!(
                    source = %entry.path().display(),
                    destination = %destination.display(),
                    error = %err,
                    "failed to move entry out of fallback directory"
                );
            }
        }

        fix_permissions(target);
        Ok(())
    }
}

/// Delete checksum sidecars and similar unwanted files below `root`.
fn remove_unwanted_files(root: &Path) {
    for entry in walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
    {
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if UNWANTED_SUFFIXES
            .iter()
            .any(|suffix| name.ends_with(suffix))
        {
            let _ = std::fs::remove_file(entry.path());
        }
    }
}

/// Pick a destination under `dir` that does not collide with an existing
/// entry, appending a numeric suffix when needed.
fn clash_free_destination(dir: &Path, name: &std::ffi::OsStr) -> PathBuf {
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

/// Normalise permissions so extracted trees are usable by owner and group.
#[cfg(unix)]
fn fix_permissions(root: &Path) {
    use std::os::unix::fs::PermissionsExt;

    for entry in walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
    {
        let mode = if entry.file_type().is_dir() { 0o755 } else { 0o644 };
        let _ = std::fs::set_permissions(
            entry.path(),
            std::fs::Permissions::from_mode(mode),
        );
    }
}

#[cfg(not(unix))]
fn fix_permissions(_root: &Path) {}

/// Convert to the platform's long-path form where one exists.
#[cfg(windows)]
fn long_path(path: &Path) -> PathBuf {
    let text = path.to_string_lossy();
    if text.starts_with(r"\\?\") {
        return path.to_path_buf();
    }
    let absolute = path
        .canonicalize()
        .unwrap_or_else(|_| path.to_path_buf());
    let text = absolute.to_string_lossy();
    if let Some(rest) = text.strip_prefix(r"\\") {
        PathBuf::from(format!(r"\\?\UNC\{rest}"))
    } else {
        PathBuf::from(format!(r"\\?\{text}"))
    }
}

#[cfg(not(windows))]
fn long_path(path: &Path) -> PathBuf {
    path.to_path_buf()
}

/// Last few lines of tool output, for error messages.
fn tail(text: &str) -> String {
    let lines: Vec<&str> =
        text.lines().filter(|line| !line.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(8);
    lines[start..].join(" | ")
}
