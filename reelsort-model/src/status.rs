use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Processing state of a queued release.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QueueState {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl std::fmt::Display for QueueState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueueState::Pending => write!(f, "pending"),
            QueueState::Processing => write!(f, "processing"),
            QueueState::Completed => write!(f, "completed"),
            QueueState::Failed => write!(f, "failed"),
        }
    }
}

/// A release waiting in (or finished with) the processing queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueItem {
    pub name: String,
    pub path: String,
    pub state: QueueState,
    pub archive_count: usize,
    pub added_at: DateTime<Utc>,
    pub error: Option<String>,
}

/// Stage of the per-release state machine, as surfaced to observers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseStage {
    Idle,
    Reading,
    Validating,
    Extracting,
    Renaming,
    Enriching,
    Relocating,
    Completed,
    Failed,
}

/// Live progress for the release currently being processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseProgress {
    pub release_name: String,
    pub current_archive: Option<String>,
    pub archive_progress: usize,
    pub archive_total: usize,
    pub stage: ReleaseStage,
    pub message: String,
    pub error: Option<String>,
}

impl ReleaseProgress {
    pub fn new(release_name: impl Into<String>) -> Self {
        Self {
            release_name: release_name.into(),
            current_archive: None,
            archive_progress: 0,
            archive_total: 0,
            stage: ReleaseStage::Idle,
            message: String::new(),
            error: None,
        }
    }
}

/// Aggregate counters across the lifetime of the process.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Counters {
    pub processed: usize,
    pub failed: usize,
    pub unsupported: usize,
    pub copied: usize,
    pub moved: usize,
    pub extracted_files: usize,
    pub deleted: usize,
    pub cleanup_failed: usize,
}

/// One line of the bounded log ring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: String,
    pub message: String,
}

/// Disk usage of a single root.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DiskUsage {
    pub total_gb: f64,
    pub used_gb: f64,
    pub free_gb: f64,
    pub percent: f32,
}

/// System health metrics published alongside the status snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemHealth {
    pub disk_downloads: DiskUsage,
    pub disk_extracted: DiskUsage,
    pub disk_finished: DiskUsage,
    pub tool_version: String,
    pub cpu_percent: f32,
    pub memory_used_gb: f64,
    pub memory_total_gb: f64,
    pub memory_percent: f32,
}

/// Terminal record of one processed release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseHistoryEntry {
    pub release_name: String,
    pub state: QueueState,
    pub processed_archives: usize,
    pub failed_archives: usize,
    pub timestamp: DateTime<Utc>,
    pub duration_seconds: f64,
}

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

/// A user-facing notification in the bounded notification ring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

/// Immutable copy of the tracker state handed to observers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub is_running: bool,
    pub is_paused: bool,
    pub current_operation: String,
    pub counters: Counters,
    pub last_update: DateTime<Utc>,
    pub current_release: Option<ReleaseProgress>,
    pub recent_logs: Vec<LogEntry>,
    pub start_time: Option<DateTime<Utc>>,
    pub last_completion_time: Option<DateTime<Utc>>,
    pub queue: Vec<QueueItem>,
    pub system_health: SystemHealth,
    pub notifications: Vec<Notification>,
    pub history: Vec<ReleaseHistoryEntry>,
    pub next_run_time: Option<DateTime<Utc>>,
    pub seconds_until_next_run: Option<i64>,
    pub repeat_mode: bool,
    pub repeat_interval_minutes: u64,
}
