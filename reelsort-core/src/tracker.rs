//! Thread-safe observable status for the control surface.
//!
//! The tracker is the single owner of the mutable status record. Every
//! mutation goes through its serialised API; readers get an immutable
//! [`StatusSnapshot`] copy. Log, notification and history rings are
//! bounded.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use reelsort_model::{
    Counters, LogEntry, Notification, NotificationKind, QueueItem, QueueState,
    ReleaseHistoryEntry, ReleaseProgress, ReleaseStage, StatusSnapshot,
    SystemHealth,
};
use uuid::Uuid;

const LOG_RING_LIMIT: usize = 100;
const NOTIFICATION_RING_LIMIT: usize = 50;
const HISTORY_RING_LIMIT: usize = 100;

#[derive(Debug, Default)]
struct TrackerState {
    is_running: bool,
    is_paused: bool,
    current_operation: String,
    counters: Counters,
    last_update: Option<DateTime<Utc>>,
    current_release: Option<ReleaseProgress>,
    recent_logs: Vec<LogEntry>,
    start_time: Option<DateTime<Utc>>,
    last_completion_time: Option<DateTime<Utc>>,
    queue: Vec<QueueItem>,
    system_health: SystemHealth,
    notifications: Vec<Notification>,
    history: Vec<ReleaseHistoryEntry>,
    next_run_time: Option<DateTime<Utc>>,
    repeat_mode: bool,
    repeat_interval_minutes: u64,
    trigger_now: bool,
}

/// Serialised, observable processing state.
#[derive(Debug, Default)]
pub struct StatusTracker {
    state: Mutex<TrackerState>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_processing(&self) {
        let mut state = self.lock();
        state.is_running = true;
        state.start_time = Some(Utc::now());
        state.current_operation = "processing".to_string();
        state.last_update = Some(Utc::now());
    }

    pub fn stop_processing(&self) {
        let mut state = self.lock();
        state.is_running = false;
        state.current_operation = "idle".to_string();
        state.current_release = None;
        state.last_completion_time = Some(Utc::now());
        state.last_update = Some(Utc::now());
    }

    pub fn set_current_release(&self, release_name: &str) {
        let mut state = self.lock();
        state.current_release = Some(ReleaseProgress::new(release_name));
        state.last_update = Some(Utc::now());
    }

    #[allow(clippy::too_many_arguments)]
    pub fn update_release_status(
        &self,
        stage: ReleaseStage,
        message: &str,
        current_archive: Option<&str>,
        archive_progress: usize,
        archive_total: usize,
        error: Option<&str>,
    ) {
        let mut state = self.lock();
        if let Some(release) = state.current_release.as_mut() {
            release.stage = stage;
            release.message = message.to_string();
            release.current_archive = current_archive.map(String::from);
            release.archive_progress = archive_progress;
            release.archive_total = archive_total;
            release.error = error.map(String::from);
        }
        state.last_update = Some(Utc::now());
    }

    pub fn add_log(&self, level: &str, message: &str) {
        let mut state = self.lock();
        state.recent_logs.push(LogEntry {
            timestamp: Utc::now(),
            level: level.to_string(),
            message: message.to_string(),
        });
        let len = state.recent_logs.len();
        if len > LOG_RING_LIMIT {
            state.recent_logs.drain(0..len - LOG_RING_LIMIT);
        }
        state.last_update = Some(Utc::now());
    }

    pub fn update_counts(&self, update: impl FnOnce(&mut Counters)) {
        let mut state = self.lock();
        update(&mut state.counters);
        state.last_update = Some(Utc::now());
    }

    pub fn increment_copied(&self, count: usize) {
        self.update_counts(|counters| counters.copied += count);
    }

    pub fn increment_moved(&self, count: usize) {
        self.update_counts(|counters| counters.moved += count);
    }

    pub fn increment_extracted(&self, count: usize) {
        self.update_counts(|counters| counters.extracted_files += count);
    }

    // Queue management

    pub fn add_to_queue(&self, name: &str, path: &str, archive_count: usize) {
        let mut state = self.lock();
        state.queue.push(QueueItem {
            name: name.to_string(),
            path: path.to_string(),
            state: QueueState::Pending,
            archive_count,
            added_at: Utc::now(),
            error: None,
        });
        state.last_update = Some(Utc::now());
    }

    pub fn update_queue_item(
        &self,
        name: &str,
        queue_state: QueueState,
        error: Option<&str>,
    ) {
        let mut state = self.lock();
        if let Some(item) =
            state.queue.iter_mut().find(|item| item.name == name)
        {
            item.state = queue_state;
            item.error = error.map(String::from);
        }
        state.last_update = Some(Utc::now());
    }

    pub fn remove_from_queue(&self, name: &str) {
        let mut state = self.lock();
        state.queue.retain(|item| item.name != name);
        state.last_update = Some(Utc::now());
    }

    pub fn clear_completed_queue_items(&self) {
        let mut state = self.lock();
        state.queue.retain(|item| {
            !matches!(
                item.state,
                QueueState::Completed | QueueState::Failed
            )
        });
        state.last_update = Some(Utc::now());
    }

    // System health

    pub fn update_system_health(&self, health: SystemHealth) {
        let mut state = self.lock();
        state.system_health = health;
        state.last_update = Some(Utc::now());
    }

    // Notifications

    pub fn add_notification(
        &self,
        kind: NotificationKind,
        title: &str,
        message: &str,
    ) {
        let mut state = self.lock();
        state.notifications.push(Notification {
            id: Uuid::new_v4().to_string(),
            kind,
            title: title.to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
            read: false,
        });
        let len = state.notifications.len();
        if len > NOTIFICATION_RING_LIMIT {
            state.notifications.drain(0..len - NOTIFICATION_RING_LIMIT);
        }
        state.last_update = Some(Utc::now());
    }

    pub fn mark_notification_read(&self, id: &str) {
        let mut state = self.lock();
        if let Some(notification) = state
            .notifications
            .iter_mut()
            .find(|notification| notification.id == id)
        {
            notification.read = true;
        }
        state.last_update = Some(Utc::now());
    }

    // History

    pub fn add_to_history(&self, entry: ReleaseHistoryEntry) {
        let mut state = self.lock();
        state.history.push(entry);
        let len = state.history.len();
        if len > HISTORY_RING_LIMIT {
            state.history.drain(0..len - HISTORY_RING_LIMIT);
        }
        state.last_update = Some(Utc::now());
    }

    // Pause / resume

    pub fn pause_processing(&self) {
        let mut state = self.lock();
        state.is_paused = true;
        state.last_update = Some(Utc::now());
    }

    pub fn resume_processing(&self) {
        let mut state = self.lock();
        state.is_paused = false;
        state.last_update = Some(Utc::now());
    }

    pub fn is_paused(&self) -> bool {
        self.lock().is_paused
    }

    // Scheduling

    pub fn set_next_run(&self, minutes: u64) {
        let mut state = self.lock();
        state.next_run_time =
            Some(Utc::now() + Duration::minutes(minutes as i64));
        state.repeat_interval_minutes = minutes;
        state.last_update = Some(Utc::now());
    }

    pub fn clear_next_run(&self) {
        let mut state = self.lock();
        state.next_run_time = None;
        state.last_update = Some(Utc::now());
    }

    pub fn set_repeat_mode(&self, enabled: bool, interval_minutes: u64) {
        let mut state = self.lock();
        state.repeat_mode = enabled;
        state.repeat_interval_minutes = interval_minutes;
        state.last_update = Some(Utc::now());
    }

    /// Seconds until the published next run, clamped to zero. `None` when
    /// no run is scheduled.
    pub fn seconds_until_next_run(&self) -> Option<i64> {
        let state = self.lock();
        state
            .next_run_time
            .map(|next| (next - Utc::now()).num_seconds().max(0))
    }

    /// Request an immediate run; consumed by the supervisor's next poll.
    pub fn trigger_run_now(&self) {
        let mut state = self.lock();
        state.trigger_now = true;
        state.next_run_time = None;
        state.last_update = Some(Utc::now());
    }

    /// Consume-on-read trigger flag: returns true exactly once per
    /// [`StatusTracker::trigger_run_now`] call.
    pub fn should_trigger_now(&self) -> bool {
        let mut state = self.lock();
        std::mem::take(&mut state.trigger_now)
    }

    /// Immutable copy of the full status record.
    pub fn snapshot(&self) -> StatusSnapshot {
        let state = self.lock();
        StatusSnapshot {
            is_running: state.is_running,
            is_paused: state.is_paused,
            current_operation: state.current_operation.clone(),
            counters: state.counters,
            last_update: state.last_update.unwrap_or_else(Utc::now),
            current_release: state.current_release.clone(),
            recent_logs: state.recent_logs.clone(),
            start_time: state.start_time,
            last_completion_time: state.last_completion_time,
            queue: state.queue.clone(),
            system_health: state.system_health.clone(),
            notifications: state.notifications.clone(),
            history: state.history.clone(),
            next_run_time: state.next_run_time,
            seconds_until_next_run: state
                .next_run_time
                .map(|next| (next - Utc::now()).num_seconds().max(0)),
            repeat_mode: state.repeat_mode,
            repeat_interval_minutes: state.repeat_interval_minutes,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            // A panicking writer must not wedge the surface forever.
            poisoned.into_inner()
        })
    }
}
