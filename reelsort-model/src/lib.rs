//! Core data model definitions shared across reelsort crates.

pub mod metadata;
pub mod release;
pub mod status;

pub use metadata::{MediaMetadata, Substitution};
pub use release::ReleaseKind;
pub use status::{
    Counters, DiskUsage, LogEntry, Notification, NotificationKind, QueueItem,
    QueueState, ReleaseHistoryEntry, ReleaseProgress, ReleaseStage,
    StatusSnapshot, SystemHealth,
};
