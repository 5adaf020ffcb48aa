//! End-to-end runs: discovery, acquisition, analysis.

use std::path::Path;

use colored::Color;

use crate::acquisition::{acquire_coverage, load_report};
use crate::analysis::{Analysis, Verdict, analyze};
use crate::discovery::{build_filter_args, discover_model_paths};
use crate::error::Result;
use crate::fs::FileSystem;
use crate::report::emit_analysis;
use crate::settings::Settings;
use crate::sink::{Level, ReportSink};
use crate::tool::{CoverageInvocation, CoverageTool};

/// How a check run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// No model directories were found; nothing was analyzed.
    NoModelPaths,
    /// Coverage was acquired (or found missing) and analyzed.
    Analyzed(Analysis),
}

impl Outcome {
    /// Overall verdict for the run.
    pub fn verdict(&self) -> Verdict {
        match self {
            Self::NoModelPaths => Verdict::Fail,
            Self::Analyzed(analysis) => analysis.verdict(),
        }
    }

    /// The analysis, when the run got that far.
    pub fn analysis(&self) -> Option<&Analysis> {
        match self {
            Self::NoModelPaths => None,
            Self::Analyzed(analysis) => Some(analysis),
        }
    }
}

/// Discover model paths, run the coverage tool, and analyze its report.
pub fn run_check<F, T, S>(settings: &Settings, fs: &F, tool: &T, sink: &mut S) -> Result<Outcome>
where
    F: FileSystem + ?Sized,
    T: CoverageTool + ?Sized,
    S: ReportSink + ?Sized,
{
    let paths = match discover_model_paths(fs, &settings.models_dir) {
        Ok(paths) => paths,
        Err(err) => {
            sink.emit(
                &format!("Finding model paths failed: {err}"),
                Level::Error,
                Some(Color::Red),
            )?;
            Vec::new()
        }
    };
    if paths.is_empty() {
        sink.emit("No model paths found", Level::Error, Some(Color::Red))?;
        return Ok(Outcome::NoModelPaths);
    }

    let invocation = CoverageInvocation::new(
        build_filter_args(&paths),
        settings.threshold,
        settings.coverage_file.clone(),
    );
    let report = acquire_coverage(tool, fs, &invocation, sink)?;
    let analysis = analyze(report.as_ref(), settings.threshold);
    emit_analysis(sink, &analysis)?;
    Ok(Outcome::Analyzed(analysis))
}

/// Analyze an existing coverage report without running the tool.
pub fn run_analyze<F, S>(input: &Path, threshold: f64, fs: &F, sink: &mut S) -> Result<Analysis>
where
    F: FileSystem + ?Sized,
    S: ReportSink + ?Sized,
{
    let report = if !fs.is_file(input) {
        sink.emit(
            &format!("Coverage file {} not found", input.display()),
            Level::Error,
            Some(Color::Red),
        )?;
        None
    } else {
        match load_report(fs, input) {
            Ok(report) => report,
            Err(err) => {
                sink.emit(
                    &format!("Reading {} failed: {err}", input.display()),
                    Level::Error,
                    Some(Color::Red),
                )?;
                None
            }
        }
    };

    let analysis = analyze(report.as_ref(), threshold);
    emit_analysis(sink, &analysis)?;
    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use super::{Outcome, run_analyze, run_check};
    use crate::analysis::{Analysis, Verdict};
    use crate::fs::MockFileSystem;
    use crate::settings::Settings;
    use crate::sink::tests::{memory_sink, outputs};
    use crate::tool::{MockCoverageTool, ToolOutput};
    use std::io;
    use std::path::{Path, PathBuf};

    const ORDERS_JSON: &str = r#"{
        "coverage": 0.75, "covered": 3, "total": 4,
        "tables": [{"name": "orders", "coverage": 0.5, "columns": [
            {"name": "id", "coverage": 1}, {"name": "total", "coverage": 0}
        ]}]
    }"#;

    fn passing_tool() -> MockCoverageTool {
        let mut tool = MockCoverageTool::new();
        tool.expect_program().return_const("dbt-coverage".to_string());
        tool.expect_compute()
            .withf(|invocation| {
                invocation.filters.paths() == ["models/marts", "models/staging"]
                    && invocation.output_file == Path::new("documentation_coverage.json")
            })
            .times(1)
            .returning(|_| {
                Ok(ToolOutput {
                    success: true,
                    code: Some(0),
                    stdout: "coverage table\n".to_string(),
                    stderr: String::new(),
                })
            });
        tool
    }

    fn project_fs() -> MockFileSystem {
        let mut fs = MockFileSystem::new();
        fs.expect_list_dirs().returning(|_| {
            Ok(vec![
                PathBuf::from("models/staging"),
                PathBuf::from("models/marts"),
            ])
        });
        fs.expect_is_file().return_const(true);
        fs.expect_read_to_string()
            .returning(|_| Ok(ORDERS_JSON.to_string()));
        fs
    }

    #[test]
    fn check_runs_all_stages_and_fails_below_threshold() {
        let mut sink = memory_sink();

        let outcome = run_check(&Settings::default(), &project_fs(), &passing_tool(), &mut sink)
            .expect("run check");

        assert_eq!(outcome.verdict(), Verdict::Fail);
        let analysis = outcome.analysis().expect("analysis");
        assert_eq!(analysis.deficiencies()[0].model, "orders");
        let (_, log) = outputs(sink);
        assert!(log.contains("coverage table\n"));
        assert!(log.contains("WARNING: WARNING: orders (50.0%)\n"));
        assert!(log.ends_with(
            "ERROR: Documentation coverage (75.0%) is below the threshold of 90.0%\n"
        ));
    }

    #[test]
    fn check_passes_with_lower_threshold() {
        let settings = Settings {
            threshold: 0.5,
            ..Settings::default()
        };
        let mut sink = memory_sink();

        let outcome =
            run_check(&settings, &project_fs(), &passing_tool(), &mut sink).expect("run check");

        assert_eq!(outcome.verdict(), Verdict::Pass);
        assert_eq!(outcome.analysis().map(|a| a.deficiencies().len()), Some(1));
    }

    #[test]
    fn check_fails_without_model_paths() {
        let mut fs = MockFileSystem::new();
        fs.expect_list_dirs().returning(|_| Ok(Vec::new()));
        let mut tool = MockCoverageTool::new();
        tool.expect_compute().never();
        let mut sink = memory_sink();

        let outcome = run_check(&Settings::default(), &fs, &tool, &mut sink).expect("run check");

        assert_eq!(outcome, Outcome::NoModelPaths);
        assert_eq!(outcome.verdict().exit_code(), 1);
        let (_, log) = outputs(sink);
        assert_eq!(log, "ERROR: No model paths found\n");
    }

    #[test]
    fn check_logs_discovery_failure_and_fails() {
        let mut fs = MockFileSystem::new();
        fs.expect_list_dirs()
            .returning(|_| Err(io::Error::new(io::ErrorKind::NotFound, "no such dir").into()));
        let mut tool = MockCoverageTool::new();
        tool.expect_compute().never();
        let mut sink = memory_sink();

        let outcome = run_check(&Settings::default(), &fs, &tool, &mut sink).expect("run check");

        assert_eq!(outcome.verdict(), Verdict::Fail);
        let (_, log) = outputs(sink);
        assert_eq!(
            log,
            "ERROR: Finding model paths failed: io error: no such dir\nERROR: No model paths found\n"
        );
    }

    #[test]
    fn check_reports_no_data_when_tool_writes_nothing() {
        let mut fs = MockFileSystem::new();
        fs.expect_list_dirs()
            .returning(|_| Ok(vec![PathBuf::from("models/staging")]));
        fs.expect_is_file().return_const(false);
        let mut tool = MockCoverageTool::new();
        tool.expect_program().return_const("dbt-coverage".to_string());
        tool.expect_compute().returning(|_| {
            Ok(ToolOutput {
                success: false,
                code: Some(2),
                stdout: String::new(),
                stderr: "dbt project not found".to_string(),
            })
        });
        let mut sink = memory_sink();

        let outcome = run_check(&Settings::default(), &fs, &tool, &mut sink).expect("run check");

        assert!(matches!(outcome, Outcome::Analyzed(Analysis::NoData { .. })));
        assert_eq!(outcome.verdict(), Verdict::Fail);
        let (_, log) = outputs(sink);
        assert!(log.ends_with("ERROR: No coverage data available to analyze\n"));
    }

    #[test]
    fn analyze_reads_existing_report() {
        let fs = project_fs();
        let mut sink = memory_sink();

        let analysis =
            run_analyze(Path::new("coverage.json"), 0.7, &fs, &mut sink).expect("analyze");

        assert_eq!(analysis.verdict(), Verdict::Pass);
        let (console, _) = outputs(sink);
        assert!(console.contains("meets or exceeds the threshold of 70.0%"));
    }

    #[test]
    fn analyze_missing_file_is_no_data() {
        let mut fs = MockFileSystem::new();
        fs.expect_is_file().return_const(false);
        let mut sink = memory_sink();

        let analysis =
            run_analyze(Path::new("missing.json"), 0.9, &fs, &mut sink).expect("analyze");

        assert_eq!(analysis, Analysis::NoData { threshold: 0.9 });
        let (_, log) = outputs(sink);
        assert_eq!(
            log,
            "ERROR: Coverage file missing.json not found\nERROR: No coverage data available to analyze\n"
        );
    }

    #[test]
    fn analyze_empty_report_is_no_data_even_at_zero_threshold() {
        let mut fs = MockFileSystem::new();
        fs.expect_is_file().return_const(true);
        fs.expect_read_to_string()
            .returning(|_| Ok("{}".to_string()));
        let mut sink = memory_sink();

        let analysis =
            run_analyze(Path::new("coverage.json"), 0.0, &fs, &mut sink).expect("analyze");

        assert_eq!(analysis, Analysis::NoData { threshold: 0.0 });
        assert_eq!(analysis.verdict(), Verdict::Fail);
        let (_, log) = outputs(sink);
        assert_eq!(log, "ERROR: No coverage data available to analyze\n");
    }

    #[test]
    fn analyze_invalid_json_is_no_data() {
        let mut fs = MockFileSystem::new();
        fs.expect_is_file().return_const(true);
        fs.expect_read_to_string()
            .returning(|_| Ok("[1, 2".to_string()));
        let mut sink = memory_sink();

        let analysis = run_analyze(Path::new("bad.json"), 0.9, &fs, &mut sink).expect("analyze");

        assert_eq!(analysis.verdict(), Verdict::Fail);
        let (_, log) = outputs(sink);
        assert!(log.starts_with("ERROR: Reading bad.json failed: invalid coverage json"));
    }
}
