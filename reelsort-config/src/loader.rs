//! Merge defaults, the TOML file, CLI overrides and the settings store
//! into one [`Config`].

use std::path::{Path, PathBuf};

use reelsort_core::orchestrator::LibraryPaths;
use reelsort_core::walk::SubfolderPolicy;
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::models::{Config, FileConfig};
use crate::store::{SettingsStore, keys};

/// Command-line overrides, applied on top of the file configuration.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub download_roots: Vec<PathBuf>,
    pub extracted_root: Option<PathBuf>,
    pub finished_root: Option<PathBuf>,
    pub movie_root: Option<PathBuf>,
    pub tvshow_root: Option<PathBuf>,
    pub retention_days: Option<u32>,
    pub enable_delete: Option<bool>,
    pub demo_mode: Option<bool>,
    pub include_sample: Option<bool>,
    pub include_sub: Option<bool>,
    pub include_other: Option<bool>,
    pub tool_path: Option<PathBuf>,
    pub repeat_forever: Option<bool>,
    pub repeat_after_minutes: Option<u64>,
    pub tmdb_api_key: Option<String>,
}

/// Load and merge the configuration. Either the file or the CLI must
/// provide the three mandatory roots.
pub fn load_config(
    file: Option<&Path>,
    overrides: &CliOverrides,
) -> Result<Config, ConfigError> {
    let file_config = match file {
        Some(path) => read_file_config(path)?,
        None => FileConfig::default(),
    };

    let download_roots = if overrides.download_roots.is_empty() {
        file_config.paths.download_roots.clone()
    } else {
        overrides.download_roots.clone()
    };
    if download_roots.is_empty() {
        return Err(ConfigError::Invalid(
            "either a config file or --download-root must provide at least one download root"
                .to_string(),
        ));
    }
    let extracted_root = overrides
        .extracted_root
        .clone()
        .or_else(|| file_config.paths.extracted_root.clone())
        .ok_or_else(|| {
            ConfigError::Invalid(
                "either a config file or --extracted-root must be provided"
                    .to_string(),
            )
        })?;
    let finished_root = overrides
        .finished_root
        .clone()
        .or_else(|| file_config.paths.finished_root.clone())
        .ok_or_else(|| {
            ConfigError::Invalid(
                "either a config file or --finished-root must be provided"
                    .to_string(),
            )
        })?;

    let paths = LibraryPaths {
        download_roots,
        extracted_root,
        finished_root,
        movie_root: overrides
            .movie_root
            .clone()
            .or_else(|| file_config.paths.movie_root.clone()),
        tvshow_root: overrides
            .tvshow_root
            .clone()
            .or_else(|| file_config.paths.tvshow_root.clone()),
    };

    let defaults = SubfolderPolicy::default();
    let subfolders = SubfolderPolicy {
        include_sample: overrides
            .include_sample
            .or(file_config.subfolders.include_sample)
            .unwrap_or(defaults.include_sample),
        include_sub: overrides
            .include_sub
            .or(file_config.subfolders.include_sub)
            .unwrap_or(defaults.include_sub),
        include_other: overrides
            .include_other
            .or(file_config.subfolders.include_other)
            .unwrap_or(defaults.include_other),
    };

    let mut config = Config::defaults_with_paths(paths);
    config.subfolders = subfolders;
    config.tool_path = overrides
        .tool_path
        .clone()
        .or_else(|| file_config.tools.archiver.clone());
    config.retention_days = overrides
        .retention_days
        .or(file_config.retention.finished_retention_days)
        .unwrap_or(config.retention_days);
    config.enable_delete = overrides
        .enable_delete
        .or(file_config.retention.enable_delete)
        .unwrap_or(config.enable_delete);
    config.demo_mode = overrides.demo_mode.unwrap_or(config.demo_mode);
    config.repeat_forever = overrides
        .repeat_forever
        .or(file_config.schedule.repeat_forever)
        .unwrap_or(config.repeat_forever);
    config.repeat_after_minutes = overrides
        .repeat_after_minutes
        .or(file_config.schedule.repeat_after_minutes)
        .unwrap_or(config.repeat_after_minutes);
    config.parallel_extractions = file_config
        .performance
        .parallel_extractions
        .unwrap_or(config.parallel_extractions);
    config.cpu_cores_per_extraction = file_config
        .performance
        .cpu_cores_per_extraction
        .unwrap_or(config.cpu_cores_per_extraction);
    config.file_stability_hours = file_config
        .performance
        .file_stability_hours
        .unwrap_or(config.file_stability_hours);
    config.tmdb_api_key = overrides
        .tmdb_api_key
        .clone()
        .or_else(|| file_config.tmdb.api_key.clone());

    Ok(config)
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw =
        std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Overlay values from the settings store; the control surface writes
/// there, so its values take the highest priority.
pub async fn apply_store_overlay(config: &mut Config, store: &SettingsStore) {
    if let Some(value) = store.get::<bool>(keys::REPEAT_FOREVER).await {
        config.repeat_forever = value;
    }
    if let Some(value) = store.get::<u64>(keys::REPEAT_AFTER_MINUTES).await {
        config.repeat_after_minutes = value;
    }
    if let Some(value) = store.get::<u32>(keys::FINISHED_RETENTION_DAYS).await
    {
        config.retention_days = value;
    }
    if let Some(value) = store.get::<bool>(keys::ENABLE_DELETE).await {
        config.enable_delete = value;
    }
    if let Some(value) = store.get::<bool>(keys::DEMO_MODE).await {
        config.demo_mode = value;
    }
    if let Some(value) = store.get::<bool>(keys::INCLUDE_SAMPLE).await {
        config.subfolders.include_sample = value;
    }
    if let Some(value) = store.get::<bool>(keys::INCLUDE_SUB).await {
        config.subfolders.include_sub = value;
    }
    if let Some(value) = store.get::<bool>(keys::INCLUDE_OTHER).await {
        config.subfolders.include_other = value;
    }
    if let Some(value) = store.get::<u32>(keys::PARALLEL_EXTRACTIONS).await {
        config.parallel_extractions = value;
    }
    if let Some(value) =
        store.get::<u32>(keys::CPU_CORES_PER_EXTRACTION).await
    {
        config.cpu_cores_per_extraction = value;
    }
    if let Some(value) = store.get::<u32>(keys::FILE_STABILITY_HOURS).await {
        config.file_stability_hours = value;
    }

    // A stale store may carry a zero interval from an older version.
    if config.repeat_after_minutes < 1 {
        warn!(
            stored = config.repeat_after_minutes,
            "repeat_after_minutes below the minimum, using the default of 30"
        );
        config.repeat_after_minutes = 30;
    }
    debug!(
        repeat_forever = config.repeat_forever,
        repeat_after_minutes = config.repeat_after_minutes,
        "applied settings store overlay"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn file_and_overrides_merge_with_cli_priority() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("reelsort.toml");
        fs::write(
            &config_path,
            r#"
[paths]
download_roots = ["/data/downloads"]
extracted_root = "/data/extracted"
finished_root = "/data/finished"
movie_root = "/library/movies"

[schedule]
repeat_forever = false
repeat_after_minutes = 45

[retention]
finished_retention_days = 10
enable_delete = true

[subfolders]
include_sample = true

[performance]
cpu_cores_per_extraction = 4
"#,
        )
        .unwrap();

        let overrides = CliOverrides {
            retention_days: Some(20),
            include_sample: Some(false),
            ..CliOverrides::default()
        };
        let config = load_config(Some(&config_path), &overrides).unwrap();

        assert_eq!(
            config.paths.download_roots,
            vec![PathBuf::from("/data/downloads")]
        );
        assert_eq!(
            config.paths.movie_root.as_deref(),
            Some(Path::new("/library/movies"))
        );
        assert!(config.paths.tvshow_root.is_none());
        // CLI wins over file.
        assert_eq!(config.retention_days, 20);
        assert!(!config.subfolders.include_sample);
        // File wins over defaults.
        assert!(!config.repeat_forever);
        assert_eq!(config.repeat_after_minutes, 45);
        assert!(config.enable_delete);
        assert_eq!(config.cpu_cores_per_extraction, 4);
        // Untouched defaults survive.
        assert!(config.subfolders.include_sub);
        assert_eq!(config.file_stability_hours, 24);
    }

    #[test]
    fn missing_roots_are_rejected() {
        let err = load_config(None, &CliOverrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let overrides = CliOverrides {
            download_roots: vec![PathBuf::from("/data/downloads")],
            ..CliOverrides::default()
        };
        let err = load_config(None, &overrides).unwrap_err();
        assert!(err.to_string().contains("extracted-root"));
    }

    #[test]
    fn cli_only_configuration_works() {
        let overrides = CliOverrides {
            download_roots: vec![PathBuf::from("/d")],
            extracted_root: Some(PathBuf::from("/e")),
            finished_root: Some(PathBuf::from("/f")),
            demo_mode: Some(true),
            ..CliOverrides::default()
        };
        let config = load_config(None, &overrides).unwrap();
        assert!(config.demo_mode);
        assert_eq!(config.repeat_after_minutes, 30);
    }
}
