//! Guard rails applied after the merge.

use tracing::warn;

use crate::error::ConfigError;
use crate::models::Config;

/// Validate the merged configuration, clamping recoverable values and
/// rejecting contradictions.
pub fn validate(config: &mut Config) -> Result<(), ConfigError> {
    if config.paths.download_roots.is_empty() {
        return Err(ConfigError::Invalid(
            "no download roots configured".to_string(),
        ));
    }
    for root in &config.paths.download_roots {
        if config.paths.extracted_root == *root {
            return Err(ConfigError::Invalid(format!(
                "extracted root {} must not equal a download root",
                root.display()
            )));
        }
    }

    if config.repeat_after_minutes < 1 {
        warn!(
            configured = config.repeat_after_minutes,
            "repeat_after_minutes below the 1 minute minimum, using 30"
        );
        config.repeat_after_minutes = 30;
    }
    if config.parallel_extractions < 1 {
        config.parallel_extractions = 1;
    }
    let available_cores = num_cpus::get() as u32;
    if config.cpu_cores_per_extraction < 1 {
        config.cpu_cores_per_extraction = 1;
    } else if config.cpu_cores_per_extraction > available_cores {
        warn!(
            configured = config.cpu_cores_per_extraction,
            available = available_cores,
            "cpu_cores_per_extraction exceeds available cores, clamping"
        );
        config.cpu_cores_per_extraction = available_cores;
    }
    if config.file_stability_hours < 1 {
        config.file_stability_hours = 1;
    }

    Ok(())
}
