//! `dbt-coverage` invocation.

use std::path::PathBuf;
use std::process::Command;

use crate::discovery::FilterArgs;
use crate::error::{DocCheckError, Result};

/// Default coverage program.
pub const DEFAULT_COVERAGE_PROGRAM: &str = "dbt-coverage";

/// Format requested from the tool for its own console summary.
const COVERAGE_FORMAT: &str = "markdown";

/// Arguments for a single `compute doc` run.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageInvocation {
    /// Model path filters.
    pub filters: FilterArgs,
    /// Minimum aggregate coverage passed as `--cov-fail-under`.
    pub threshold: f64,
    /// File the tool writes its JSON report to.
    pub output_file: PathBuf,
}

impl CoverageInvocation {
    /// Create an invocation.
    pub fn new(filters: FilterArgs, threshold: f64, output_file: impl Into<PathBuf>) -> Self {
        Self {
            filters,
            threshold,
            output_file: output_file.into(),
        }
    }

    /// Argument vector, without the program name.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec!["compute".to_string(), "doc".to_string()];
        args.extend(self.filters.tokens());
        args.extend([
            "--cov-format".to_string(),
            COVERAGE_FORMAT.to_string(),
            "--cov-fail-under".to_string(),
            fail_under(self.threshold),
            "--cov-report".to_string(),
            self.output_file.display().to_string(),
        ]);
        args
    }
}

// Whole numbers keep one decimal place: `1.0`, not `1`.
fn fail_under(threshold: f64) -> String {
    if threshold.fract() == 0.0 {
        format!("{threshold:.1}")
    } else {
        threshold.to_string()
    }
}

/// Result of running the coverage tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Whether the process exited successfully.
    pub success: bool,
    /// Exit code, when the process was not killed by a signal.
    pub code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl ToolOutput {
    fn from(output: std::process::Output) -> Self {
        Self {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

/// A program that computes documentation coverage.
#[cfg_attr(test, mockall::automock)]
pub trait CoverageTool {
    /// Program name shown in logs.
    fn program(&self) -> &str;
    /// Run the tool to completion and capture its output.
    fn compute(&self, invocation: &CoverageInvocation) -> Result<ToolOutput>;
}

/// Runs `dbt-coverage` (or a compatible program) as a blocking subprocess.
#[derive(Debug, Clone)]
pub struct DbtCoverage {
    program: String,
}

impl DbtCoverage {
    /// Use the given program, resolved through `PATH`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for DbtCoverage {
    fn default() -> Self {
        Self::new(DEFAULT_COVERAGE_PROGRAM)
    }
}

impl CoverageTool for DbtCoverage {
    fn program(&self) -> &str {
        &self.program
    }

    fn compute(&self, invocation: &CoverageInvocation) -> Result<ToolOutput> {
        let output = Command::new(&self.program)
            .args(invocation.args())
            .output()
            .map_err(|err| {
                DocCheckError::Other(format!("failed to start {}: {err}", self.program))
            })?;
        Ok(ToolOutput::from(output))
    }
}
