//! Run settings and their defaults.

use std::path::PathBuf;

use crate::analysis::DEFAULT_THRESHOLD;
use crate::error::{DocCheckError, Result};

/// Environment variable holding the minimum aggregate coverage.
pub const THRESHOLD_ENV: &str = "DOC_COVERAGE_THRESHOLD";
/// Directory whose immediate subdirectories are checked.
pub const DEFAULT_MODELS_DIR: &str = "models";
/// File the coverage tool writes its JSON report to.
pub const DEFAULT_COVERAGE_FILE: &str = "documentation_coverage.json";

/// Inputs for a full check run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Minimum aggregate coverage, 0.0-1.0.
    pub threshold: f64,
    /// Root of the model directories.
    pub models_dir: PathBuf,
    /// Coverage report written by the tool.
    pub coverage_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            models_dir: PathBuf::from(DEFAULT_MODELS_DIR),
            coverage_file: PathBuf::from(DEFAULT_COVERAGE_FILE),
        }
    }
}

/// Parse a threshold fraction, rejecting anything outside 0.0-1.0.
pub fn parse_threshold(value: &str) -> Result<f64> {
    let trimmed = value.trim();
    let threshold: f64 = trimmed.parse().map_err(|_| {
        DocCheckError::Other(format!(
            "threshold must be a number between 0 and 1, got {trimmed:?}"
        ))
    })?;
    if !(0.0..=1.0).contains(&threshold) {
        return Err(DocCheckError::Other(format!(
            "threshold must be between 0 and 1, got {threshold}"
        )));
    }
    Ok(threshold)
}
