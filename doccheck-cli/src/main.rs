#![deny(missing_docs)]
//! doccheck command-line interface.
//!
//! Gates a dbt project on documentation coverage reported by `dbt-coverage`.

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Color;
use doccheck_core::{
    DEFAULT_COVERAGE_FILE, DEFAULT_COVERAGE_PROGRAM, DEFAULT_LOG_FILE, DEFAULT_MODELS_DIR,
    DEFAULT_THRESHOLD, DbtCoverage, DualSink, Level, Outcome, ReportFormat, ReportSink, Settings,
    StdFileSystem, THRESHOLD_ENV, Verdict, parse_threshold, render_report, run_analyze,
    run_check,
};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "doccheck", version, about = "dbt documentation coverage gate")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Debug)]
struct ThresholdArgs {
    /// Minimum aggregate documentation coverage, 0.0-1.0.
    #[arg(long, env = THRESHOLD_ENV, default_value_t = DEFAULT_THRESHOLD, value_parser = threshold_arg)]
    threshold: f64,
}

#[derive(Args, Clone, Debug)]
struct OutputArgs {
    /// Run log, truncated at start.
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,
    /// When to colour console output.
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,
    /// Also write the analysis to this file.
    #[arg(long = "report-output")]
    report_output: Option<PathBuf>,
    /// Format for `--report-output`.
    #[arg(long, value_enum, default_value_t = ReportFormatArg::Markdown)]
    report_format: ReportFormatArg,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    fn enabled(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal(),
        }
    }
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum ReportFormatArg {
    Json,
    Markdown,
}

impl From<ReportFormatArg> for ReportFormat {
    fn from(value: ReportFormatArg) -> Self {
        match value {
            ReportFormatArg::Json => ReportFormat::Json,
            ReportFormatArg::Markdown => ReportFormat::Markdown,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run dbt-coverage over every model directory and check the result.
    Check {
        /// Directory whose immediate subdirectories are passed as model filters.
        #[arg(long, default_value = DEFAULT_MODELS_DIR)]
        models_dir: PathBuf,
        /// File dbt-coverage writes its JSON report to.
        #[arg(long, default_value = DEFAULT_COVERAGE_FILE)]
        coverage_file: PathBuf,
        /// Coverage program to run.
        #[arg(long, default_value = DEFAULT_COVERAGE_PROGRAM)]
        tool: String,
        #[command(flatten)]
        threshold: ThresholdArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Check an existing dbt-coverage JSON report without running the tool.
    Analyze {
        /// Coverage report to analyze.
        #[arg(short, long)]
        input: PathBuf,
        #[command(flatten)]
        threshold: ThresholdArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
}

impl Commands {
    fn output(&self) -> &OutputArgs {
        match self {
            Self::Check { output, .. } | Self::Analyze { output, .. } => output,
        }
    }
}

#[cfg(not(test))]
fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let code = match execute(cli.command) {
        Ok(verdict) => verdict.exit_code(),
        Err(err) => {
            eprintln!("doccheck: {err}");
            Verdict::Fail.exit_code()
        }
    };
    std::process::exit(code);
}

#[cfg(test)]
fn main() {}

fn execute(command: Commands) -> CliResult<Verdict> {
    let output = command.output().clone();
    let color = output.color.enabled();
    colored::control::set_override(color);
    let mut sink = DualSink::create(&output.log_file, color)?;
    let fs = StdFileSystem::new();

    let result = match command {
        Commands::Check {
            models_dir,
            coverage_file,
            tool,
            threshold,
            ..
        } => {
            let settings = Settings {
                threshold: threshold.threshold,
                models_dir,
                coverage_file,
            };
            log::debug!("running check with {settings:?} using {tool}");
            run_check(&settings, &fs, &DbtCoverage::new(tool), &mut sink)
        }
        Commands::Analyze {
            input, threshold, ..
        } => run_analyze(&input, threshold.threshold, &fs, &mut sink).map(Outcome::Analyzed),
    };

    conclude(&mut sink, result, &output)
}

fn conclude<S: ReportSink + ?Sized>(
    sink: &mut S,
    result: doccheck_core::Result<Outcome>,
    output: &OutputArgs,
) -> CliResult<Verdict> {
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(err) => {
            sink.emit(
                &format!("Documentation check failed: {err}"),
                Level::Error,
                Some(Color::Red),
            )?;
            return Ok(Verdict::Fail);
        }
    };

    if let (Some(path), Some(analysis)) = (&output.report_output, outcome.analysis()) {
        let contents = render_report(analysis, output.report_format.into())?;
        if let Err(err) = write_report(path, &contents) {
            sink.emit(
                &format!("Writing report {} failed: {err}", path.display()),
                Level::Error,
                Some(Color::Red),
            )?;
            return Ok(Verdict::Fail);
        }
    }

    Ok(outcome.verdict())
}

fn write_report(path: &Path, contents: &str) -> CliResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, contents)?;
    Ok(())
}

fn threshold_arg(value: &str) -> Result<f64, String> {
    parse_threshold(value).map_err(|err| err.to_string())
}
