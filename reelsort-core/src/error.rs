use std::path::PathBuf;
use thiserror::Error;

/// One error taxonomy across the whole pipeline.
///
/// Only [`PipelineError::ConfigurationInvalid`] and
/// [`PipelineError::ToolMissing`] abort the process; everything else is
/// recorded against the group or release it belongs to and the loop
/// continues.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("invalid configuration: {0}")]
    ConfigurationInvalid(String),

    #[error("archive tool not found: {0}")]
    ToolMissing(String),

    #[error("pre-extraction check failed for {archive}: {reason}")]
    PrecheckFailed { archive: PathBuf, reason: String },

    #[error("extraction failed for {archive}: {reason}")]
    ExtractionFailed { archive: PathBuf, reason: String },

    #[error("filesystem error on {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file {0} is still incomplete")]
    Incomplete(PathBuf),

    #[error("metadata unavailable: {0}")]
    MetadataUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
