//! SQLite-backed settings store.
//!
//! A single-file key/value table with JSON-encoded values, plus a small
//! metadata table for first-run detection. Writes are CAS-style upserts
//! keyed by setting name; the pool is capped at one connection so writes
//! serialise.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reelsort_core::fsops::FileStatusStore;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, warn};

use crate::error::ConfigError;

/// Well-known setting names.
pub mod keys {
    pub const REPEAT_FOREVER: &str = "repeat_forever";
    pub const REPEAT_AFTER_MINUTES: &str = "repeat_after_minutes";
    pub const FINISHED_RETENTION_DAYS: &str = "finished_retention_days";
    pub const ENABLE_DELETE: &str = "enable_delete";
    pub const DEMO_MODE: &str = "demo_mode";
    pub const INCLUDE_SAMPLE: &str = "include_sample";
    pub const INCLUDE_SUB: &str = "include_sub";
    pub const INCLUDE_OTHER: &str = "include_other";
    pub const PARALLEL_EXTRACTIONS: &str = "parallel_extractions";
    pub const CPU_CORES_PER_EXTRACTION: &str = "cpu_cores_per_extraction";
    pub const FILE_STABILITY_HOURS: &str = "file_stability_hours";

    /// Prefix for per-file size history entries.
    pub const FILE_STATUS_PREFIX: &str = "file_status:";
}

/// Built-in defaults, overlaid under whatever the store contains.
pub fn default_settings() -> HashMap<String, serde_json::Value> {
    use serde_json::json;
    HashMap::from([
        (keys::REPEAT_FOREVER.to_string(), json!(true)),
        (keys::REPEAT_AFTER_MINUTES.to_string(), json!(30)),
        (keys::FINISHED_RETENTION_DAYS.to_string(), json!(15)),
        (keys::ENABLE_DELETE.to_string(), json!(false)),
        (keys::DEMO_MODE.to_string(), json!(false)),
        (keys::INCLUDE_SAMPLE.to_string(), json!(false)),
        (keys::INCLUDE_SUB.to_string(), json!(true)),
        (keys::INCLUDE_OTHER.to_string(), json!(false)),
        (keys::PARALLEL_EXTRACTIONS.to_string(), json!(1)),
        (keys::CPU_CORES_PER_EXTRACTION.to_string(), json!(2)),
        (keys::FILE_STABILITY_HOURS.to_string(), json!(24)),
    ])
}

#[derive(Debug, Serialize, Deserialize)]
struct FileStatusRecord {
    size: u64,
    last_check: DateTime<Utc>,
}

/// Thread-safe settings store over a SQLite file.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    pool: SqlitePool,
}

impl SettingsStore {
    /// Open (creating if necessary) the store at `path`.
    pub async fn open(path: &Path) -> Result<Self, ConfigError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| {
                    ConfigError::Read {
                        path: parent.to_path_buf(),
                        source,
                    }
                })?;
            }
        }
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )",
        )
        .execute(&pool)
        .await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    /// Read one setting, deserialised from its JSON value.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let row = sqlx::query("SELECT value FROM settings WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| {
                warn!(key, error = %err, "settings read failed");
                err
            })
            .ok()??;
        let raw: String = row.try_get("value").ok()?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, error = %err, "stored setting has the wrong shape");
                None
            }
        }
    }

    /// Upsert one setting as JSON.
    pub async fn set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), ConfigError> {
        let encoded = serde_json::to_string(value)
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        sqlx::query(
            "INSERT INTO settings (key, value, updated_at)
             VALUES (?1, ?2, CURRENT_TIMESTAMP)
             ON CONFLICT(key) DO UPDATE SET
                 value = excluded.value,
                 updated_at = CURRENT_TIMESTAMP",
        )
        .bind(key)
        .bind(encoded)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// All settings with defaults overlaid for missing keys.
    pub async fn all_settings(&self) -> HashMap<String, serde_json::Value> {
        let mut settings = default_settings();
        let rows = sqlx::query("SELECT key, value FROM settings")
            .fetch_all(&self.pool)
            .await
            .unwrap_or_default();
        for row in rows {
            let Ok(key) = row.try_get::<String, _>("key") else {
                continue;
            };
            let Ok(raw) = row.try_get::<String, _>("value") else {
                continue;
            };
            match serde_json::from_str(&raw) {
                Ok(value) => {
                    settings.insert(key, value);
                }
                Err(err) => {
                    debug!(key, error = %err, "skipping malformed setting");
                }
            }
        }
        settings
    }

    async fn get_meta(&self, key: &str) -> Option<String> {
        let row = sqlx::query("SELECT value FROM meta WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .ok()??;
        row.try_get("value").ok()
    }

    async fn set_meta(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        sqlx::query(
            "INSERT INTO meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn is_first_run(&self) -> bool {
        self.get_meta("initialized").await.as_deref() != Some("true")
    }

    pub async fn mark_initialized(&self) -> Result<(), ConfigError> {
        self.set_meta("initialized", "true").await
    }

    fn file_status_key(path: &Path) -> String {
        format!("{}{}", keys::FILE_STATUS_PREFIX, path.display())
    }
}

#[async_trait]
impl FileStatusStore for SettingsStore {
    async fn file_status(&self, path: &Path) -> Option<(u64, DateTime<Utc>)> {
        let record: FileStatusRecord =
            self.get(&Self::file_status_key(path)).await?;
        Some((record.size, record.last_check))
    }

    async fn save_file_status(&self, path: &Path, size: u64) {
        let record = FileStatusRecord {
            size,
            last_check: Utc::now(),
        };
        if let Err(err) =
            self.set(&Self::file_status_key(path), &record).await
        {
            warn!(
                file = %path.display(),
                error = %err,
                "failed to persist file status"
            );
        }
    }
}
