//! The top-level run/sleep loop.
//!
//! Each iteration runs the orchestrator over every download root, sweeps
//! the finished tree, publishes counters and health, then sleeps until the
//! next deadline. The sleep polls at one-second ticks so a manual trigger
//! or shutdown reacts promptly, and re-reads the settings store every 30
//! seconds so interval changes rebase the deadline live.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reelsort_config::loader::apply_store_overlay;
use reelsort_config::{Config, SettingsStore, keys};
use reelsort_core::cleanup::cleanup_finished;
use reelsort_core::metadata::TmdbClient;
use reelsort_core::orchestrator::{Orchestrator, ProcessOptions, ProcessReport};
use reelsort_core::tracker::StatusTracker;
use reelsort_core::{ArchiveTool, naming};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::health;

const SETTINGS_RECHECK_INTERVAL: Duration = Duration::from_secs(30);
const SLEEP_TICK: Duration = Duration::from_secs(1);

pub struct Supervisor {
    config: Config,
    store: SettingsStore,
    tracker: Arc<StatusTracker>,
    tool: ArchiveTool,
    tool_version: String,
    cancel: CancellationToken,
}

impl std::fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supervisor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Supervisor {
    pub fn new(
        config: Config,
        store: SettingsStore,
        tracker: Arc<StatusTracker>,
        tool: ArchiveTool,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            config,
            store,
            tracker,
            tool,
            tool_version: "unknown".to_string(),
            cancel,
        }
    }

    /// Run until repeat mode is disabled or a shutdown signal arrives.
    /// Returns the process exit code.
    pub async fn run(mut self) -> i32 {
        self.tool_version = self.tool.version().await;
        self.tracker.set_repeat_mode(
            self.config.repeat_forever,
            self.config.repeat_after_minutes,
        );
        if self.config.repeat_forever {
            self.tracker.set_next_run(self.config.repeat_after_minutes);
            info!(
                minutes = self.config.repeat_after_minutes,
                "next run scheduled"
            );
        } else {
            info!("manual mode: repeat is disabled");
        }

        let mut exit_code = 0;
        loop {
            apply_store_overlay(&mut self.config, &self.store).await;
            self.publish_health().await;

            let code = self.run_once().await;
            exit_code = exit_code.max(code);
            exit_code = exit_code.max(self.sweep_finished().await);
            self.publish_health().await;

            if self.cancel.is_cancelled() {
                break;
            }
            let repeat = self
                .store
                .get::<bool>(keys::REPEAT_FOREVER)
                .await
                .unwrap_or(self.config.repeat_forever);
            if !repeat {
                break;
            }
            if !self.sleep_until_next_run().await {
                break;
            }
        }

        self.tracker.clear_next_run();
        exit_code
    }

    /// One orchestrator pass over all download roots. Panics inside the
    /// run are caught at the task seam; the loop continues.
    async fn run_once(&mut self) -> i32 {
        info!("reelsort {}", env!("CARGO_PKG_VERSION"));
        self.tracker.start_processing();

        let options = ProcessOptions {
            demo_mode: self.config.demo_mode,
            subfolders: self.config.subfolders,
            cpu_cores: self.config.cpu_cores_per_extraction,
            file_stability_hours: self.config.file_stability_hours,
            parallel_extractions: self.config.parallel_extractions,
            folder_pattern: naming::DEFAULT_FOLDER_PATTERN.to_string(),
            file_pattern: naming::DEFAULT_FILE_PATTERN.to_string(),
        };
        let orchestrator = Orchestrator::new(
            self.config.paths.clone(),
            self.tool.clone(),
            options,
            Arc::clone(&self.tracker),
            Arc::new(self.store.clone()),
            self.config
                .tmdb_api_key
                .clone()
                .map(TmdbClient::new),
            self.cancel.clone(),
        );

        let outcome =
            tokio::spawn(async move { orchestrator.process_downloads().await })
                .await;
        match outcome {
            Ok(report) => {
                let code = if report.failed.is_empty() { 0 } else { 2 };
                self.publish_report(&report);
                self.tracker.stop_processing();
                code
            }
            Err(join_error) => {
                error!(error = %join_error, "processing run aborted");
                self.tracker
                    .add_log("ERROR", &format!("run aborted: {join_error}"));
                self.tracker.stop_processing();
                2
            }
        }
    }

    fn publish_report(&self, report: &ProcessReport) {
        self.tracker.update_counts(|counters| {
            counters.processed = report.processed;
            counters.failed = report.failed.len();
            counters.unsupported = report.unsupported.len();
        });
        info!(processed = report.processed, "processed archives");
        if self.config.demo_mode {
            info!("demo mode: all actions were simulated only");
        }
        log_path_summary("failed archives", &report.failed);
        log_path_summary("unsupported files", &report.unsupported);
        if report.processed > 0 {
            self.tracker.add_notification(
                reelsort_model::NotificationKind::Success,
                "Processing complete",
                &format!(
                    "Successfully processed {} archive(s)",
                    report.processed
                ),
            );
        }
    }

    /// Retention sweep over the finished tree.
    async fn sweep_finished(&self) -> i32 {
        if !self.config.enable_delete && !self.config.demo_mode {
            info!(
                "delete switch disabled and demo mode off: skipping finished cleanup scan"
            );
            return 0;
        }

        let finished_root = self.config.paths.finished_root.clone();
        let retention_days = self.config.retention_days;
        let enable_delete = self.config.enable_delete;
        let demo_mode = self.config.demo_mode;
        let report = tokio::task::spawn_blocking(move || {
            cleanup_finished(
                &finished_root,
                retention_days,
                enable_delete,
                demo_mode,
            )
        })
        .await
        .unwrap_or_default();

        self.tracker.update_counts(|counters| {
            counters.deleted = report.deleted.len();
            counters.cleanup_failed = report.failed.len();
        });
        log_path_summary("deleted finished files", &report.deleted);
        log_path_summary("skipped finished files", &report.skipped);
        log_path_summary("failed to clean finished files", &report.failed);
        if report.failed.is_empty() { 0 } else { 2 }
    }

    async fn publish_health(&self) {
        let paths = self.config.paths.clone();
        let tool_version = self.tool_version.clone();
        if let Ok(health) = tokio::task::spawn_blocking(move || {
            health::sample(&paths, &tool_version)
        })
        .await
        {
            self.tracker.update_system_health(health);
        }
    }

    /// Sleep until the published deadline. Returns false when the loop
    /// should exit instead of starting another run.
    async fn sleep_until_next_run(&mut self) -> bool {
        let mut delay = self.config.repeat_after_minutes.max(1);
        self.tracker.set_repeat_mode(true, delay);
        self.tracker.set_next_run(delay);
        info!(minutes = delay, "next run scheduled");
        self.tracker
            .add_log("INFO", &format!("Next run in {delay} minute(s)"));

        if self.tracker.should_trigger_now() {
            info!("manual trigger received, starting run now");
            self.tracker.clear_next_run();
            return true;
        }

        let mut deadline = Instant::now() + Duration::from_secs(delay * 60);
        let mut last_settings_check = Instant::now();
        let mut last_minutes_logged = u64::MAX;

        while Instant::now() < deadline {
            if self.cancel.is_cancelled() {
                self.tracker.clear_next_run();
                return false;
            }
            if self.tracker.should_trigger_now() {
                info!("manual trigger received, starting run now");
                self.tracker.add_log(
                    "INFO",
                    "Manual trigger - starting immediately",
                );
                break;
            }

            // Live reconfiguration: a changed interval rebases the
            // deadline instead of extending it.
            if last_settings_check.elapsed() >= SETTINGS_RECHECK_INTERVAL {
                last_settings_check = Instant::now();
                let repeat_forever = self
                    .store
                    .get::<bool>(keys::REPEAT_FOREVER)
                    .await
                    .unwrap_or(self.config.repeat_forever);
                self.config.repeat_forever = repeat_forever;
                if let Some(stored) =
                    self.store.get::<u64>(keys::REPEAT_AFTER_MINUTES).await
                {
                    let stored = stored.max(1);
                    if stored != delay {
                        info!(
                            "Settings changed during sleep: {delay} → {stored} minutes"
                        );
                        delay = stored;
                        self.config.repeat_after_minutes = delay;
                        self.tracker.set_repeat_mode(repeat_forever, delay);
                        self.tracker.set_next_run(delay);
                        deadline = Instant::now()
                            + Duration::from_secs(delay * 60);
                        info!(minutes = delay, "next run rescheduled");
                    }
                }
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            let minutes_left = remaining.as_secs() / 60;
            if minutes_left != last_minutes_logged && minutes_left > 0 {
                info!(minutes = minutes_left, "until next run");
                last_minutes_logged = minutes_left;
            }

            tokio::time::sleep(SLEEP_TICK).await;
        }

        self.tracker.clear_next_run();
        if self.cancel.is_cancelled() {
            return false;
        }
        info!("starting next run now");
        true
    }
}

fn log_path_summary(label: &str, paths: &[std::path::PathBuf]) {
    const LIMIT: usize = 5;
    if paths.is_empty() {
        return;
    }
    let mut sorted: Vec<&Path> =
        paths.iter().map(std::path::PathBuf::as_path).collect();
    sorted.sort_by_key(|path| path.to_string_lossy().to_lowercase());
    warn!("{} ({})", label, sorted.len());
    for path in sorted.iter().take(LIMIT) {
        warn!("  {}", path.display());
    }
    if sorted.len() > LIMIT {
        warn!("  ... {} more", sorted.len() - LIMIT);
    }
}
