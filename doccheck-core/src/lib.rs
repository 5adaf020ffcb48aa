#![deny(missing_docs)]
//! doccheck core library.
//!
//! Analyzes `dbt-coverage` documentation reports: discovers model
//! directories, runs the coverage tool, classifies under-documented models,
//! and renders the verdict to the console and a run log.

pub mod acquisition;
pub mod analysis;
pub mod discovery;
pub mod domain;
pub mod error;
pub mod fs;
pub mod pipeline;
pub mod report;
pub mod settings;
pub mod sink;
pub mod tool;

pub use acquisition::{acquire_coverage, load_report};
pub use analysis::{
    Analysis, CoverageSummary, DEFAULT_THRESHOLD, Deficiency, Severity, Verdict, analyze,
    find_deficiencies,
};
pub use discovery::{FilterArgs, build_filter_args, discover_model_paths};
pub use domain::{ColumnCoverage, CoverageReport, TableCoverage};
pub use error::{DocCheckError, Result};
pub use fs::{FileSystem, StdFileSystem};
pub use pipeline::{Outcome, run_analyze, run_check};
pub use report::{
    ReportFormat, ReportLine, emit_analysis, render_json, render_lines, render_markdown,
    render_report,
};
pub use settings::{
    DEFAULT_COVERAGE_FILE, DEFAULT_MODELS_DIR, Settings, THRESHOLD_ENV, parse_threshold,
};
pub use sink::{DEFAULT_LOG_FILE, DualSink, Level, ReportSink};
pub use tool::{
    CoverageInvocation, CoverageTool, DEFAULT_COVERAGE_PROGRAM, DbtCoverage, ToolOutput,
};
