//! # reelsort daemon
//!
//! Headless post-processor for release downloads: watches download roots
//! for completed multi-volume archives, extracts them through an external
//! 7-Zip-compatible tool, organises the results into a Movies / TV-Shows
//! library layout, mirrors consumed archives into a finished tree, and
//! ages that tree out under a retention policy. Live state is observable
//! through the status tracker; settings live in a SQLite store shared
//! with the control surface.

mod health;
mod supervisor;
mod tracker_log;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use reelsort_config::loader::apply_store_overlay;
use reelsort_config::{CliOverrides, SettingsStore, load_config, validate};
use reelsort_core::{ArchiveTool, StatusTracker};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::supervisor::Supervisor;
use crate::tracker_log::TrackerLogLayer;

/// Command line arguments for the reelsort daemon.
#[derive(Parser, Debug)]
#[command(name = "reelsort-daemon", version)]
#[command(about = "Extract release archives and organise them into a media library")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, env = "REELSORT_CONFIG")]
    config: Option<PathBuf>,

    /// Download directory root (repeatable).
    #[arg(long = "download-root")]
    download_root: Vec<PathBuf>,

    /// Staging root for extracted content.
    #[arg(long)]
    extracted_root: Option<PathBuf>,

    /// Mirror root for consumed archives.
    #[arg(long)]
    finished_root: Option<PathBuf>,

    /// Final library root for movies.
    #[arg(long)]
    movie_root: Option<PathBuf>,

    /// Final library root for TV shows.
    #[arg(long)]
    tvshow_root: Option<PathBuf>,

    /// Days after which finished files are deleted.
    #[arg(long)]
    retention_days: Option<u32>,

    /// Enable deletion of old files in the finished tree.
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    enable_delete: Option<bool>,

    /// Demo mode: log actions without modifying files.
    #[arg(long = "demo", num_args = 0..=1, default_missing_value = "true")]
    demo_mode: Option<bool>,

    /// Process `Sample` subfolders.
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    include_sample: Option<bool>,

    /// Process `Subs` subfolders.
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    include_sub: Option<bool>,

    /// Process any other subfolders inside a release.
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    include_other: Option<bool>,

    /// Path or executable name of the archive tool (auto-detected when
    /// unset).
    #[arg(long, env = "REELSORT_ARCHIVER")]
    archiver: Option<PathBuf>,

    /// Repeat the scan/extract loop indefinitely.
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    repeat_forever: Option<bool>,

    /// Minutes to sleep between runs.
    #[arg(long)]
    repeat_after_minutes: Option<u64>,

    /// Location of the SQLite settings store.
    #[arg(long, env = "REELSORT_SETTINGS_DB", default_value = "reelsort-settings.db")]
    settings_db: PathBuf,

    /// TMDB API key enabling metadata enrichment.
    #[arg(long, env = "TMDB_API_KEY")]
    tmdb_api_key: Option<String>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            download_roots: self.download_root.clone(),
            extracted_root: self.extracted_root.clone(),
            finished_root: self.finished_root.clone(),
            movie_root: self.movie_root.clone(),
            tvshow_root: self.tvshow_root.clone(),
            retention_days: self.retention_days,
            enable_delete: self.enable_delete,
            demo_mode: self.demo_mode,
            include_sample: self.include_sample,
            include_sub: self.include_sub,
            include_other: self.include_other,
            tool_path: self.archiver.clone(),
            repeat_forever: self.repeat_forever,
            repeat_after_minutes: self.repeat_after_minutes,
            tmdb_api_key: self.tmdb_api_key.clone(),
        }
    }
}

#[tokio::main]
async fn main() {
    std::process::exit(run().await);
}

async fn run() -> i32 {
    let args = Args::parse();
    let tracker = Arc::new(StatusTracker::new());

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(TrackerLogLayer::new(Arc::clone(&tracker)))
        .init();

    let mut config = match load_config(args.config.as_deref(), &args.overrides())
    {
        Ok(config) => config,
        Err(err) => {
            error!("configuration error: {err}");
            return 1;
        }
    };

    let store = match SettingsStore::open(&args.settings_db).await {
        Ok(store) => store,
        Err(err) => {
            error!(
                store = %args.settings_db.display(),
                "failed to open settings store: {err}"
            );
            return 1;
        }
    };
    if store.is_first_run().await {
        if let Err(err) = store.mark_initialized().await {
            warn!("failed to mark settings store initialised: {err}");
        }
    }
    apply_store_overlay(&mut config, &store).await;
    if let Err(err) = validate(&mut config) {
        error!("configuration error: {err}");
        return 1;
    }

    let tool = match ArchiveTool::resolve(config.tool_path.as_deref()) {
        Ok(tool) => tool,
        Err(err) => {
            error!(
                "{err}. Configure [tools].archiver or install 7-Zip."
            );
            return 1;
        }
    };
    if let Err(err) = config.paths.ensure_ready() {
        error!("path validation failed: {err}");
        return 1;
    }

    info!(
        config = ?args.config,
        repeat_forever = config.repeat_forever,
        repeat_after_minutes = config.repeat_after_minutes,
        demo = config.demo_mode,
        delete = config.enable_delete,
        "starting"
    );
    if config.demo_mode {
        warn!("demo mode enabled: no files will be extracted, moved, or deleted");
    } else if !config.enable_delete {
        info!("delete switch disabled: finished cleanup will not remove files");
    }

    let cancel = CancellationToken::new();
    spawn_signal_handler(cancel.clone());

    let supervisor =
        Supervisor::new(config, store, tracker, tool, cancel);
    supervisor.run().await
}

/// A first SIGINT/SIGTERM drains the current release and exits cleanly.
fn spawn_signal_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            let mut terminate = match tokio::signal::unix::signal(
                tokio::signal::unix::SignalKind::terminate(),
            ) {
                Ok(stream) => stream,
                Err(err) => {
                    warn!("failed to install SIGTERM handler: {err}");
                    let _ = tokio::signal::ctrl_c().await;
                    cancel.cancel();
                    return;
                }
            };
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = terminate.recv() => {}
            }
        }
        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
        }
        info!("shutdown signal received, draining current release");
        cancel.cancel();
    });
}
