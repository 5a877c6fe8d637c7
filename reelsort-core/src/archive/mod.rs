pub mod extract;
pub mod groups;
pub mod tokens;

pub use extract::ArchiveTool;
pub use groups::{
    ArchiveGroup, GroupValidationError, build_archive_groups,
    is_supported_archive, split_directory_entries, validate_archive_group,
};
