//! Config model: the merged runtime configuration plus the TOML file
//! schema it is loaded from.

use std::path::PathBuf;

use reelsort_core::orchestrator::LibraryPaths;
use reelsort_core::walk::SubfolderPolicy;
use serde::Deserialize;

/// Fully merged runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub paths: LibraryPaths,
    pub tool_path: Option<PathBuf>,
    pub retention_days: u32,
    pub enable_delete: bool,
    pub demo_mode: bool,
    pub subfolders: SubfolderPolicy,
    pub repeat_forever: bool,
    pub repeat_after_minutes: u64,
    pub parallel_extractions: u32,
    pub cpu_cores_per_extraction: u32,
    pub file_stability_hours: u32,
    pub tmdb_api_key: Option<String>,
}

impl Config {
    pub fn defaults_with_paths(paths: LibraryPaths) -> Self {
        Self {
            paths,
            tool_path: None,
            retention_days: 15,
            enable_delete: false,
            demo_mode: false,
            subfolders: SubfolderPolicy::default(),
            repeat_forever: true,
            repeat_after_minutes: 30,
            parallel_extractions: 1,
            cpu_cores_per_extraction: 2,
            file_stability_hours: 24,
            tmdb_api_key: None,
        }
    }
}

/// Raw TOML schema. Every section and field is optional; merging applies
/// the documented defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub paths: PathsSection,
    #[serde(default)]
    pub tools: ToolsSection,
    #[serde(default)]
    pub schedule: ScheduleSection,
    #[serde(default)]
    pub retention: RetentionSection,
    #[serde(default)]
    pub subfolders: SubfoldersSection,
    #[serde(default)]
    pub performance: PerformanceSection,
    #[serde(default)]
    pub tmdb: TmdbSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsSection {
    #[serde(default)]
    pub download_roots: Vec<PathBuf>,
    pub extracted_root: Option<PathBuf>,
    pub finished_root: Option<PathBuf>,
    pub movie_root: Option<PathBuf>,
    pub tvshow_root: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolsSection {
    /// Path or executable name of the archive tool; auto-detected when
    /// unset.
    pub archiver: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleSection {
    pub repeat_forever: Option<bool>,
    pub repeat_after_minutes: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RetentionSection {
    pub finished_retention_days: Option<u32>,
    pub enable_delete: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubfoldersSection {
    pub include_sample: Option<bool>,
    pub include_sub: Option<bool>,
    pub include_other: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PerformanceSection {
    pub parallel_extractions: Option<u32>,
    pub cpu_cores_per_extraction: Option<u32>,
    pub file_stability_hours: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbSection {
    pub api_key: Option<String>,
}
