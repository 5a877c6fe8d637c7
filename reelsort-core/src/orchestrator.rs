//! The per-release state machine driving the whole pipeline.
//!
//! Releases are processed sequentially. Within a release, contexts run in
//! walker order with the release root last; failure of that main context
//! rolls back every staging directory the release created. On full
//! success the consumed archives mirror into the finished tree and the
//! emptied download directories collapse.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use reelsort_model::{
    QueueState, ReleaseHistoryEntry, ReleaseStage,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::archive::extract::ArchiveTool;
use crate::archive::groups::{
    ArchiveGroup, build_archive_groups, split_directory_entries,
    validate_archive_group,
};
use crate::error::{PipelineError, Result};
use crate::fsops::{
    self, FileStatusStore, copy_companion_files, ensure_unique_destination,
    flatten_episode_like_dirs, flatten_new_top_level_dirs,
    flatten_single_subdir, is_file_complete, move_file,
    move_related_episode_artifacts, move_release_tree_to_finished,
    remove_empty_subdirs, remove_empty_tree,
};
use crate::layout;
use crate::metadata::{TmdbClient, merge_metadata};
use crate::naming::{
    DEFAULT_FILE_PATTERN, DEFAULT_FOLDER_PATTERN, rename_folder_and_files,
};
use crate::nfo::{
    find_nfo_file, parse_directory_name, parse_nfo_file, write_episode_nfo,
    write_movie_nfo,
};
use crate::progress::ProgressTracker;
use crate::tracker::StatusTracker;
use crate::walk::{
    FnObserver, NullObserver, ReleaseContext, SubfolderPolicy,
    release_contexts,
};

static EPISODE_SE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)s(\d{1,2})e(\d{2,3})").unwrap());

/// The filesystem roots the pipeline operates on.
#[derive(Debug, Clone)]
pub struct LibraryPaths {
    pub download_roots: Vec<PathBuf>,
    pub extracted_root: PathBuf,
    pub finished_root: PathBuf,
    pub movie_root: Option<PathBuf>,
    pub tvshow_root: Option<PathBuf>,
}

impl LibraryPaths {
    /// Validate the download roots and create the writable roots.
    pub fn ensure_ready(&self) -> Result<()> {
        if self.download_roots.is_empty() {
            return Err(PipelineError::ConfigurationInvalid(
                "no download roots configured".to_string(),
            ));
        }
        for root in &self.download_roots {
            if !root.is_dir() {
                return Err(PipelineError::ConfigurationInvalid(format!(
                    "download root {} is not a directory",
                    root.display()
                )));
            }
        }
        for root in [&self.extracted_root, &self.finished_root] {
            std::fs::create_dir_all(root).map_err(|source| {
                PipelineError::Filesystem {
                    path: root.clone(),
                    source,
                }
            })?;
        }
        for root in [&self.movie_root, &self.tvshow_root].into_iter().flatten()
        {
            std::fs::create_dir_all(root).map_err(|source| {
                PipelineError::Filesystem {
                    path: root.clone(),
                    source,
                }
            })?;
        }
        Ok(())
    }
}

/// Behavioural knobs for one processing run.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    pub demo_mode: bool,
    pub subfolders: SubfolderPolicy,
    pub cpu_cores: u32,
    pub file_stability_hours: u32,
    /// Reserved: extraction is sequential regardless of this value.
    pub parallel_extractions: u32,
    pub folder_pattern: String,
    pub file_pattern: String,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            demo_mode: false,
            subfolders: SubfolderPolicy::default(),
            cpu_cores: 2,
            file_stability_hours: 24,
            parallel_extractions: 1,
            folder_pattern: DEFAULT_FOLDER_PATTERN.to_string(),
            file_pattern: DEFAULT_FILE_PATTERN.to_string(),
        }
    }
}

/// Aggregate outcome of one run over all download roots.
#[derive(Debug, Default)]
pub struct ProcessReport {
    pub processed: usize,
    pub failed: Vec<PathBuf>,
    pub unsupported: Vec<PathBuf>,
    pub success_messages: Vec<String>,
}

/// Owns a release from discovery to its terminal state.
pub struct Orchestrator {
    paths: LibraryPaths,
    tool: ArchiveTool,
    options: ProcessOptions,
    tracker: Arc<StatusTracker>,
    file_status: Arc<dyn FileStatusStore>,
    tmdb: Option<TmdbClient>,
    cancel: CancellationToken,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("paths", &self.paths)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Release-local bookkeeping shared across contexts.
#[derive(Debug, Default)]
struct ReleaseState {
    extracted_targets: Vec<PathBuf>,
    groups_to_move: Vec<(ArchiveGroup, PathBuf)>,
    copy_only_sources: Vec<PathBuf>,
    processed: usize,
    failed: usize,
    first_failure: Option<String>,
    release_failed: bool,
}

impl Orchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        paths: LibraryPaths,
        tool: ArchiveTool,
        options: ProcessOptions,
        tracker: Arc<StatusTracker>,
        file_status: Arc<dyn FileStatusStore>,
        tmdb: Option<TmdbClient>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            paths,
            tool,
            options,
            tracker,
            file_status,
            tmdb,
            cancel,
        }
    }

    /// Process every release under every download root, sequentially.
    pub async fn process_downloads(&self) -> ProcessReport {
        if self.options.parallel_extractions > 1 {
            debug!(
                requested = self.options.parallel_extractions,
                "parallel extraction is reserved, processing sequentially"
            );
        }

        let mut report = ProcessReport::default();
        for download_root in self.paths.download_roots.clone() {
            let releases = release_directories(&download_root);
            for release_dir in releases {
                if self.cancel.is_cancelled() {
                    info!("shutdown requested, draining at release boundary");
                    return report;
                }
                self.wait_while_paused().await;
                if self.cancel.is_cancelled() {
                    return report;
                }
                self.process_release(&download_root, &release_dir, &mut report)
                    .await;
            }
        }
        report
    }

    async fn wait_while_paused(&self) {
        while self.tracker.is_paused() && !self.cancel.is_cancelled() {
            tokio::time::sleep(std::time::Duration::from_secs(1)).await;
        }
    }

    async fn process_release(
        &self,
        download_root: &Path,
        release_dir: &Path,
        report: &mut ProcessReport,
    ) {
        let release_name = release_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let started = Instant::now();

        // Queue the release with an archive-count preview.
        let preview = release_contexts(
            release_dir,
            download_root,
            &self.options.subfolders,
            &mut NullObserver,
        );
        let archive_count: usize = preview
            .iter()
            .filter_map(|ctx| split_directory_entries(&ctx.source).ok())
            .map(|(archives, _)| {
                build_archive_groups(&archives)
                    .iter()
                    .map(|group| group.part_count())
                    .sum::<usize>()
            })
            .sum();
        self.tracker.add_to_queue(
            &release_name,
            &release_dir.to_string_lossy(),
            archive_count,
        );
        self.tracker.set_current_release(&release_name);
        self.tracker.update_release_status(
            ReleaseStage::Reading,
            &format!("Processing {release_name}"),
            None,
            0,
            0,
            None,
        );

        // Enumerate contexts with live reading progress; the denominator
        // grows as more entries are discovered so (k/N) stays exact.
        let mut read_progress = ProgressTracker::new(1);
        read_progress.log(&format!("Reading directories for {release_name}"));
        let mut seen = 0usize;
        let contexts = {
            let mut observer = FnObserver(|path: &Path| {
                seen += 1;
                read_progress.grow_total(seen);
                let name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                read_progress.advance_to(seen, &format!("Reading {name}"));
            });
            release_contexts(
                release_dir,
                download_root,
                &self.options.subfolders,
                &mut observer,
            )
        };
        read_progress
            .complete(&format!("Found {seen} entrie(s) in {release_name}"));

        let mut state = ReleaseState::default();
        let total_contexts = contexts.len();

        for (index, context) in contexts.iter().enumerate() {
            if self.cancel.is_cancelled() {
                info!("shutdown requested, draining at context boundary");
                break;
            }
            let is_main_context = index + 1 == total_contexts;
            self.process_context(
                download_root,
                release_dir,
                context,
                is_main_context,
                &mut state,
                report,
            )
            .await;
            if state.release_failed {
                break;
            }
        }

        if state.release_failed {
            self.finish_release(
                &release_name,
                &state,
                started.elapsed().as_secs_f64(),
            );
            return;
        }

        // Move consumed archives into the finished mirror.
        if !state.groups_to_move.is_empty() {
            info!(
                release = %release_name,
                groups = state.groups_to_move.len(),
                "all extractions complete, moving archives to finished"
            );
            let total_files: usize = state
                .groups_to_move
                .iter()
                .map(|(group, _)| group.part_count())
                .sum();
            let mut move_progress = ProgressTracker::new(total_files);
            let mut files_moved = 0usize;

            for (group, source_dir) in &state.groups_to_move {
                report
                    .success_messages
                    .push(format!("Moving {} -> finished", display_name(&group.primary)));
                let destination_dir = self.finished_destination(
                    source_dir,
                    download_root,
                );
                for member in &group.members {
                    if self.options.demo_mode {
                        files_moved += 1;
                        move_progress.advance_to(
                            files_moved,
                            &format!(
                                "demo: would move {}",
                                display_name(member)
                            ),
                        );
                        continue;
                    }
                    let destination = ensure_unique_destination(
                        destination_dir.join(
                            member.file_name().unwrap_or_default(),
                        ),
                    );
                    match move_file(member, &destination) {
                        Ok(_) => {
                            self.tracker.increment_moved(1);
                            files_moved += 1;
                            move_progress.advance_to(
                                files_moved,
                                &format!("Moved {}", display_name(member)),
                            );
                        }
                        Err(err) => {
                            error!(
                                archive = %member.display(),
                                destination = %destination.display(),
                                error = %err,
                                "failed to move archive to finished"
                            );
                            report.failed.push(group.primary.clone());
                            break;
                        }
                    }
                }
            }
            if files_moved > 0 {
                move_progress.complete(&format!(
                    "Finished moving {files_moved} file(s) for release {release_name}"
                ));
            }

            if !self.options.demo_mode {
                for (_, source_dir) in &state.groups_to_move {
                    move_release_tree_to_finished(
                        source_dir,
                        &self.paths.finished_root,
                        download_root,
                    );
                    if crate::archive::tokens::episode_tag(
                        &source_dir.file_name().unwrap_or_default().to_string_lossy(),
                    )
                    .is_some()
                    {
                        move_related_episode_artifacts(
                            source_dir,
                            &self.paths.finished_root,
                            download_root,
                        );
                    }
                    remove_empty_subdirs(source_dir);
                    remove_empty_tree(source_dir, download_root);
                }
            }
        }

        // Mirror copy-only sources (no archives) into finished as well.
        if !self.options.demo_mode {
            for source_dir in &state.copy_only_sources {
                move_release_tree_to_finished(
                    source_dir,
                    &self.paths.finished_root,
                    download_root,
                );
                remove_empty_subdirs(source_dir);
                remove_empty_tree(source_dir, download_root);
            }
            remove_empty_tree(release_dir, download_root);
        }

        self.finish_release(
            &release_name,
            &state,
            started.elapsed().as_secs_f64(),
        );
        report.processed += state.processed;
    }

    fn finish_release(
        &self,
        release_name: &str,
        state: &ReleaseState,
        duration_seconds: f64,
    ) {
        let failed = state.release_failed
            || (state.failed > 0 && state.processed == 0);
        let queue_state = if failed {
            QueueState::Failed
        } else {
            QueueState::Completed
        };
        let error = failed
            .then(|| {
                state
                    .first_failure
                    .clone()
                    .unwrap_or_else(|| "Extraction failed".to_string())
            });
        self.tracker.update_queue_item(
            release_name,
            queue_state,
            error.as_deref(),
        );
        self.tracker.add_to_history(ReleaseHistoryEntry {
            release_name: release_name.to_string(),
            state: queue_state,
            processed_archives: state.processed,
            failed_archives: state.failed,
            timestamp: Utc::now(),
            duration_seconds,
        });
        self.tracker.update_release_status(
            if failed {
                ReleaseStage::Failed
            } else {
                ReleaseStage::Completed
            },
            &format!("Finished {release_name}"),
            None,
            0,
            0,
            error.as_deref(),
        );
    }

    async fn process_context(
        &self,
        download_root: &Path,
        release_dir: &Path,
        context: &ReleaseContext,
        is_main_context: bool,
        state: &mut ReleaseState,
        report: &mut ProcessReport,
    ) {
        let release_name = release_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (archives, unsupported) =
            match split_directory_entries(&context.source) {
                Ok(split) => split,
                Err(err) => {
                    error!(
                        directory = %context.source.display(),
                        error = %err,
                        "unable to list context directory, skipping"
                    );
                    return;
                }
            };
        report.unsupported.extend(unsupported);

        if !context.should_extract {
            info!(
                directory = %display_name(&context.source),
                "skipping extraction (disabled in configuration)"
            );
            return;
        }

        if archives.is_empty() {
            self.copy_context_files(context, state).await;
            return;
        }

        let groups = build_archive_groups(&archives);
        if groups.is_empty() {
            error!(
                directory = %context.source.display(),
                "no valid archive groups found, likely incomplete download"
            );
            report.failed.push(context.source.clone());
            state.failed += 1;
            return;
        }

        if is_main_context {
            self.tracker.update_queue_item(
                &release_name,
                QueueState::Processing,
                None,
            );
        }

        let target_dir =
            self.paths.extracted_root.join(&context.target_rel);
        let total_parts: usize =
            groups.iter().map(|group| group.part_count()).sum();
        info!(
            directory = %display_name(&context.source),
            groups = groups.len(),
            parts = total_parts,
            "processing archives"
        );

        // Phase 1: validate every group before touching the filesystem.
        self.tracker.update_release_status(
            ReleaseStage::Validating,
            &format!("Validating {} archive group(s)", groups.len()),
            None,
            0,
            total_parts,
            None,
        );
        let mut groups_to_extract: Vec<ArchiveGroup> = Vec::new();
        for group in groups {
            match self.validate_group(&group).await {
                Ok(()) => groups_to_extract.push(group),
                Err(reason) => {
                    warn!(
                        archive = %group.primary.display(),
                        %reason,
                        "skipping archive group"
                    );
                    report.failed.push(group.primary.clone());
                    state.failed += 1;
                    if state.first_failure.is_none() {
                        state.first_failure = Some(reason);
                    }
                }
            }
        }

        // Phase 2: extract, flatten, rename, enrich, relocate.
        for group in groups_to_extract {
            let pre_existing_target = target_dir.exists();
            let primary_name = display_name(&group.primary);
            self.tracker.update_release_status(
                ReleaseStage::Extracting,
                &format!("Extracting {primary_name}"),
                Some(&primary_name),
                0,
                group.part_count(),
                None,
            );

            if self.options.demo_mode {
                info!(
                    archive = %primary_name,
                    target = %target_dir.display(),
                    "demo: would extract"
                );
                state.groups_to_move.push((group, context.source.clone()));
                state.processed += 1;
                continue;
            }

            copy_companion_files(&context.source, &target_dir);

            // Snapshot top-level names so post-extraction flattening can
            // tell fresh directories from pre-existing ones.
            let pre_names: HashSet<String> = std::fs::read_dir(&target_dir)
                .map(|entries| {
                    entries
                        .filter_map(|entry| entry.ok())
                        .map(|entry| {
                            entry.file_name().to_string_lossy().into_owned()
                        })
                        .collect()
                })
                .unwrap_or_default();

            let tracker = Arc::clone(&self.tracker);
            let progress_name = primary_name.clone();
            let mut progress = move |current: usize, total: usize| {
                tracker.update_release_status(
                    ReleaseStage::Extracting,
                    &format!("Extracting {progress_name} ({current}/{total})"),
                    Some(&progress_name),
                    current,
                    total,
                    None,
                );
            };

            match self
                .tool
                .extract(
                    &group,
                    &target_dir,
                    self.options.cpu_cores,
                    &mut progress,
                )
                .await
            {
                Ok(()) => {
                    self.tracker.increment_extracted(group.part_count());
                    report.success_messages.push(format!(
                        "Extracted {} -> {}",
                        primary_name,
                        display_name(&target_dir)
                    ));

                    flatten_single_subdir(&target_dir);
                    flatten_new_top_level_dirs(&target_dir, &pre_names);
                    flatten_episode_like_dirs(&target_dir);

                    let final_dir =
                        self.rename_and_enrich(&target_dir, context).await;
                    state.extracted_targets.push(final_dir);
                    state
                        .groups_to_move
                        .push((group, context.source.clone()));
                    state.processed += 1;
                }
                Err(err) => {
                    error!(
                        archive = %group.primary.display(),
                        error = %err,
                        "extraction failed"
                    );
                    report.failed.push(group.primary.clone());
                    state.failed += 1;
                    if state.first_failure.is_none() {
                        state.first_failure = Some(err.to_string());
                    }
                    if self.handle_extraction_failure(
                        &target_dir,
                        &state.extracted_targets,
                        is_main_context,
                        pre_existing_target,
                    ) {
                        state.release_failed = true;
                        return;
                    }
                }
            }
        }
    }

    /// Validation plus the RAR-specific precheck pipeline.
    async fn validate_group(
        &self,
        group: &ArchiveGroup,
    ) -> std::result::Result<(), String> {
        validate_archive_group(group, true)
            .map_err(|err| err.to_string())?;

        let is_rar = group.key.ends_with(".rar")
            || group
                .primary
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("rar"));
        if !is_rar || self.options.demo_mode {
            return Ok(());
        }

        // The header knows the real volume count even for .partNN sets.
        match self.tool.volume_count(&group.primary).await {
            Ok(volume_count) => {
                if volume_count > 1
                    && (group.part_count() as u64) < volume_count
                {
                    return Err(format!(
                        "found {} volume(s) but archive requires {} - download may still be in progress",
                        group.part_count(),
                        volume_count
                    ));
                }
            }
            Err(err) => {
                debug!(
                    archive = %group.primary.display(),
                    error = %err,
                    "could not verify volume count, relying on file-based validation"
                );
            }
        }

        self.tool
            .probe_integrity(&group.primary)
            .await
            .map_err(|err| err.to_string())
    }

    /// Copy-only fallback for contexts without archives; files must pass
    /// the completeness gate before they are picked up.
    async fn copy_context_files(
        &self,
        context: &ReleaseContext,
        state: &mut ReleaseState,
    ) {
        if self.options.demo_mode {
            debug!(
                directory = %context.source.display(),
                "demo: would copy loose files"
            );
            return;
        }
        let Ok(entries) = std::fs::read_dir(&context.source) else {
            return;
        };
        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && !fsops::has_unwanted_suffix(path))
            .collect();
        files.sort_by_key(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy().to_lowercase())
                .unwrap_or_default()
        });

        let mut to_copy = Vec::new();
        for file in files {
            if !is_file_complete(
                &file,
                self.file_status.as_ref(),
                self.options.file_stability_hours,
            )
            .await
            {
                info!(
                    file = %display_name(&file),
                    "file appears to be still downloading, skipping"
                );
                continue;
            }
            to_copy.push(file);
        }

        let target_dir =
            self.paths.extracted_root.join(&context.target_rel);
        if std::fs::create_dir_all(&target_dir).is_err() {
            return;
        }
        state.extracted_targets.push(target_dir.clone());

        if to_copy.is_empty() {
            return;
        }
        let mut copy_progress = ProgressTracker::new(to_copy.len());
        copy_progress.log(&format!(
            "Copying {} file(s) from {}",
            to_copy.len(),
            display_name(&context.source)
        ));
        for (index, file) in to_copy.iter().enumerate() {
            let destination =
                target_dir.join(file.file_name().unwrap_or_default());
            match std::fs::copy(file, &destination) {
                Ok(_) => {
                    self.tracker.increment_copied(1);
                    copy_progress.advance_to(
                        index + 1,
                        &format!("Copied {}", display_name(file)),
                    );
                }
                Err(err) => {
                    warn!(
                        file = %file.display(),
                        error = %err,
                        "failed to copy file"
                    );
                }
            }
        }
        copy_progress.complete(&format!(
            "Finished copying {} file(s) from {}",
            to_copy.len(),
            display_name(&context.source)
        ));
        state.copy_only_sources.push(context.source.clone());
    }

    /// Non-fatal metadata, rename and relocation pass over a freshly
    /// extracted staging directory. Returns the directory's final path.
    async fn rename_and_enrich(
        &self,
        target_dir: &Path,
        context: &ReleaseContext,
    ) -> PathBuf {
        self.tracker.update_release_status(
            ReleaseStage::Renaming,
            &format!("Renaming {}", display_name(target_dir)),
            None,
            0,
            0,
            None,
        );

        let nfo_file = find_nfo_file(target_dir);
        let mut is_episode = false;
        let mut metadata = None;
        if let Some(nfo_file) = &nfo_file {
            if let Some((parsed, episode)) = parse_nfo_file(nfo_file) {
                if parsed.title.is_some() {
                    is_episode = episode;
                    metadata = Some(parsed);
                }
            }
        }
        let mut metadata = match metadata {
            Some(metadata) => metadata,
            None => {
                let name = target_dir
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let fallback = parse_directory_name(&name);
                if fallback.title.is_none() {
                    debug!(
                        directory = %name,
                        "no usable metadata, skipping rename"
                    );
                    return target_dir.to_path_buf();
                }
                fallback
            }
        };

        // Optional remote enrichment; failures fall back to local data.
        if let Some(tmdb) = &self.tmdb {
            self.tracker.update_release_status(
                ReleaseStage::Enriching,
                &format!("Looking up {}", display_name(target_dir)),
                None,
                0,
                0,
                None,
            );
            metadata = self
                .enrich_metadata(tmdb, metadata, context, is_episode, target_dir)
                .await;
        }

        if metadata.title.is_none() {
            return target_dir.to_path_buf();
        }
        let (renamed, final_dir) = rename_folder_and_files(
            target_dir,
            &self.options.folder_pattern,
            &self.options.file_pattern,
            &metadata,
        );
        if !renamed {
            return final_dir;
        }

        // Relocate into the configured library root, overwriting existing
        // targets by policy.
        let library_root = if is_episode
            || layout::looks_like_tv_show(&final_dir)
        {
            self.paths.tvshow_root.as_ref()
        } else {
            self.paths.movie_root.as_ref()
        };
        let Some(library_root) = library_root else {
            debug!(
                directory = %display_name(&final_dir),
                "library root not configured, leaving in staging"
            );
            return final_dir;
        };
        self.tracker.update_release_status(
            ReleaseStage::Relocating,
            &format!("Moving {} to library", display_name(&final_dir)),
            None,
            0,
            0,
            None,
        );
        match move_directory_overwriting(&final_dir, library_root) {
            Some(moved) => moved,
            None => final_dir,
        }
    }

    async fn enrich_metadata(
        &self,
        tmdb: &TmdbClient,
        metadata: reelsort_model::MediaMetadata,
        context: &ReleaseContext,
        is_episode: bool,
        target_dir: &Path,
    ) -> reelsort_model::MediaMetadata {
        let Some(title) = metadata.title.clone() else {
            return metadata;
        };

        let source_name = context
            .source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let season_episode = EPISODE_SE_RE.captures(&source_name).and_then(
            |caps| {
                let season: u64 = caps[1].parse().ok()?;
                let episode: u64 = caps[2].parse().ok()?;
                Some((season, episode))
            },
        );

        let enriched = if is_episode || season_episode.is_some() {
            let (season, episode) = season_episode.unwrap_or((1, 1));
            match tmdb.search_tv_show(&title).await {
                Ok(Some(series_id)) => {
                    match tmdb
                        .episode_metadata(series_id, season, episode)
                        .await
                    {
                        Ok(remote) => {
                            let merged = merge_metadata(&metadata, remote);
                            let sidecar = target_dir.join(format!(
                                "{title} S{season:02}E{episode:02}"
                            ));
                            if let Err(err) = write_episode_nfo(
                                &merged,
                                &title,
                                Some(season as u32),
                                Some(episode as u32),
                                &sidecar,
                            ) {
                                warn!(error = %err, "failed to write episode sidecar");
                            }
                            Some(merged)
                        }
                        Err(err) => {
                            warn!(error = %err, "episode lookup failed");
                            None
                        }
                    }
                }
                Ok(None) => None,
                Err(err) => {
                    warn!(error = %err, "series search failed");
                    None
                }
            }
        } else {
            let year = metadata
                .year
                .as_ref()
                .and_then(|year| year.parse::<u16>().ok());
            match tmdb.search_movie(&title, year).await {
                Ok(Some(movie_id)) => match tmdb.movie_metadata(movie_id).await
                {
                    Ok(remote) => {
                        let merged = merge_metadata(&metadata, remote);
                        let sidecar_name = merged
                            .title
                            .clone()
                            .unwrap_or_else(|| title.clone());
                        let sidecar = target_dir.join(sidecar_name);
                        if let Err(err) =
                            write_movie_nfo(&merged, &sidecar)
                        {
                            warn!(error = %err, "failed to write movie sidecar");
                        }
                        Some(merged)
                    }
                    Err(err) => {
                        warn!(error = %err, "movie lookup failed");
                        None
                    }
                },
                Ok(None) => None,
                Err(err) => {
                    warn!(error = %err, "movie search failed");
                    None
                }
            }
        };

        enriched.unwrap_or(metadata)
    }

    /// Clean up after a failed extraction. Returns true when the whole
    /// release must be rolled back (main-context failure).
    fn handle_extraction_failure(
        &self,
        target_dir: &Path,
        extracted_targets: &[PathBuf],
        is_main_context: bool,
        pre_existing: bool,
    ) -> bool {
        if !pre_existing
            && target_dir.is_dir()
            && std::fs::read_dir(target_dir)
                .map(|mut entries| entries.next().is_none())
                .unwrap_or(false)
        {
            let _ = std::fs::remove_dir(target_dir);
        }

        if !is_main_context {
            return false;
        }

        error!(
            "main archive extraction failed, cleaning up all extracted content for this release"
        );
        for extracted in extracted_targets {
            if extracted.exists() {
                if let Err(err) = std::fs::remove_dir_all(extracted) {
                    warn!(
                        directory = %extracted.display(),
                        error = %err,
                        "failed to remove staging directory during rollback"
                    );
                }
            }
        }
        true
    }

    /// Finished-tree destination mirroring the release-relative sub-path.
    fn finished_destination(
        &self,
        source_dir: &Path,
        download_root: &Path,
    ) -> PathBuf {
        match source_dir.strip_prefix(download_root) {
            Ok(rel) => {
                let mut components = rel.components();
                match components.next() {
                    Some(first) => self
                        .paths
                        .finished_root
                        .join(first.as_os_str())
                        .join(components.as_path()),
                    None => self
                        .paths
                        .finished_root
                        .join(source_dir.file_name().unwrap_or_default()),
                }
            }
            Err(_) => self
                .paths
                .finished_root
                .join(source_dir.file_name().unwrap_or_default()),
        }
    }
}

/// Immediate subdirectories of a download root, sorted by name.
pub fn release_directories(download_root: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(download_root) else {
        return Vec::new();
    };
    let mut releases: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    releases.sort_by_key(|path| {
        path.file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    });
    releases
}

/// Move a directory under `destination_root`, replacing any existing entry
/// of the same name. Returns the new location, or `None` on failure.
fn move_directory_overwriting(
    directory: &Path,
    destination_root: &Path,
) -> Option<PathBuf> {
    if !directory.is_dir() {
        warn!(
            directory = %directory.display(),
            "source directory missing, cannot relocate"
        );
        return None;
    }
    if let Err(err) = std::fs::create_dir_all(destination_root) {
        error!(
            root = %destination_root.display(),
            error = %err,
            "failed to create library root"
        );
        return None;
    }

    let destination = destination_root.join(directory.file_name()?);
    if destination.exists() {
        let removal = if destination.is_dir() {
            std::fs::remove_dir_all(&destination)
        } else {
            std::fs::remove_file(&destination)
        };
        if let Err(err) = removal {
            error!(
                destination = %destination.display(),
                error = %err,
                "failed to replace existing library entry"
            );
            return None;
        }
        info!(destination = %destination.display(), "removed existing destination");
    }

    match std::fs::rename(directory, &destination) {
        Ok(()) => {
            info!(
                from = %directory.display(),
                to = %destination.display(),
                "moved directory to library"
            );
            Some(destination)
        }
        Err(err) => {
            error!(
                from = %directory.display(),
                to = %destination.display(),
                error = %err,
                "failed to move directory to library"
            );
            None
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
