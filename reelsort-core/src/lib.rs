pub mod archive;
pub mod cleanup;
pub mod error;
pub mod fsops;
pub mod layout;
pub mod metadata;
pub mod naming;
pub mod nfo;
pub mod orchestrator;
pub mod progress;
pub mod tracker;
pub mod walk;

pub use archive::extract::ArchiveTool;
pub use archive::groups::{
    ArchiveGroup, GroupValidationError, build_archive_groups,
    is_supported_archive, split_directory_entries, validate_archive_group,
};
pub use cleanup::{CleanupReport, cleanup_finished};
pub use error::{PipelineError, Result};
pub use fsops::FileStatusStore;
pub use layout::release_kind;
pub use metadata::{ProviderError, TmdbClient};
pub use naming::{DEFAULT_FILE_PATTERN, DEFAULT_FOLDER_PATTERN, PatternInterpreter};
pub use orchestrator::{LibraryPaths, Orchestrator, ProcessOptions, ProcessReport};
pub use progress::{ProgressTracker, format_progress};
pub use tracker::StatusTracker;
pub use walk::{DirectoryObserver, FnObserver, ReleaseContext, SubfolderPolicy};
