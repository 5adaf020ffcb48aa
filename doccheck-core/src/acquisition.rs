//! Running the coverage tool and loading the report it writes.

use std::path::Path;

use colored::Color;

use crate::domain::CoverageReport;
use crate::error::Result;
use crate::fs::FileSystem;
use crate::report::format_threshold;
use crate::sink::{Level, ReportSink};
use crate::tool::{CoverageInvocation, CoverageTool};

/// Run the coverage tool and load its JSON report.
///
/// Tool failures are reported through the sink and yield `Ok(None)`. A
/// non-zero exit is not fatal: the report is still loaded when the file
/// exists. An empty report also yields `Ok(None)`. Only sink write failures
/// are returned as errors.
pub fn acquire_coverage<T, F, S>(
    tool: &T,
    fs: &F,
    invocation: &CoverageInvocation,
    sink: &mut S,
) -> Result<Option<CoverageReport>>
where
    T: CoverageTool + ?Sized,
    F: FileSystem + ?Sized,
    S: ReportSink + ?Sized,
{
    let program = tool.program();
    sink.emit(
        &format!("Running {program} with filters: {}", invocation.filters),
        Level::Info,
        Some(Color::Cyan),
    )?;
    sink.emit(
        &format!("Running command: {program} {}", invocation.args().join(" ")),
        Level::Info,
        Some(Color::Cyan),
    )?;

    let output = match tool.compute(invocation) {
        Ok(output) => output,
        Err(err) => {
            sink.emit(
                &format!("Running {program} failed: {err}"),
                Level::Error,
                Some(Color::Red),
            )?;
            return Ok(None);
        }
    };

    sink.passthrough(&output.stdout)?;
    if !output.stderr.trim().is_empty() {
        log::debug!("{program} stderr:\n{}", output.stderr.trim_end());
    }
    if !output.success {
        log::debug!("{program} exited with status {:?}", output.code);
        sink.emit(
            &format!(
                "Documentation coverage is below the threshold of {}%",
                format_threshold(invocation.threshold)
            ),
            Level::Error,
            Some(Color::Red),
        )?;
    }

    let path = invocation.output_file.as_path();
    if !fs.is_file(path) {
        sink.emit(
            &format!("Output file {} not found", path.display()),
            Level::Error,
            Some(Color::Red),
        )?;
        return Ok(None);
    }

    match load_report(fs, path) {
        Ok(report) => Ok(report),
        Err(err) => {
            sink.emit(
                &format!("Running {program} failed: {err}"),
                Level::Error,
                Some(Color::Red),
            )?;
            Ok(None)
        }
    }
}

/// Read and decode a coverage report file.
///
/// A file holding an empty JSON object decodes to `None`.
pub fn load_report<F: FileSystem + ?Sized>(
    fs: &F,
    path: &Path,
) -> Result<Option<CoverageReport>> {
    let contents = fs.read_to_string(path)?;
    let report = CoverageReport::from_json(&contents)?;
    match &report {
        Some(report) => log::debug!(
            "loaded coverage for {} table(s) from {}",
            report.tables.len(),
            path.display()
        ),
        None => log::debug!("{} holds an empty coverage report", path.display()),
    }
    Ok(report)
}
