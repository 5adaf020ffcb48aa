//! Report formatting for coverage analyses.

use std::fmt::Write;

use colored::Color;
use serde::Serialize;

use crate::analysis::{Analysis, CoverageSummary, Deficiency};
use crate::error::Result;
use crate::sink::{Level, ReportSink};

/// One unit of console/log output.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportLine {
    /// A message with a level and optional colour.
    Message {
        /// Message text.
        text: String,
        /// Log level.
        level: Level,
        /// Console colour hint.
        color: Option<Color>,
    },
    /// A blank line.
    Separator,
}

impl ReportLine {
    fn message(text: impl Into<String>, level: Level, color: Option<Color>) -> Self {
        Self::Message {
            text: text.into(),
            level,
            color,
        }
    }
}

/// Render an analysis as console/log lines.
pub fn render_lines(analysis: &Analysis) -> Vec<ReportLine> {
    let summary = match analysis {
        Analysis::NoData { .. } => {
            return vec![ReportLine::message(
                "No coverage data available to analyze",
                Level::Error,
                Some(Color::Red),
            )];
        }
        Analysis::Analyzed(summary) => summary,
    };

    let mut lines = vec![
        ReportLine::Separator,
        ReportLine::message(
            "Documentation Coverage Summary",
            Level::Status,
            Some(Color::Blue),
        ),
        ReportLine::message(
            format!(
                "Coverage: {}/{} columns ({:.1}%)",
                summary.covered,
                summary.total,
                summary.coverage_percent()
            ),
            Level::Info,
            Some(Color::Cyan),
        ),
    ];

    if !summary.deficiencies.is_empty() {
        lines.push(ReportLine::Separator);
        lines.push(ReportLine::message(
            "Models Requiring Documentation Fixes",
            Level::Status,
            Some(Color::Yellow),
        ));
        for deficiency in &summary.deficiencies {
            append_deficiency(&mut lines, deficiency);
        }
    }

    lines.push(ReportLine::Separator);
    lines.push(verdict_line(summary));
    lines
}

/// Heading line for a deficient model, e.g. `WARNING: orders (50.0%)`.
pub fn deficiency_heading(deficiency: &Deficiency) -> String {
    format!(
        "{}: {} ({:.1}%)",
        deficiency.severity.as_str(),
        deficiency.model,
        deficiency.coverage_percent
    )
}

/// Threshold as a percentage the way it is shown to users (`90.0`, `85.5`).
pub fn format_threshold(threshold: f64) -> String {
    let percent = threshold * 100.0;
    if percent.fract() == 0.0 {
        format!("{percent:.1}")
    } else {
        format!("{percent}")
    }
}

fn append_deficiency(lines: &mut Vec<ReportLine>, deficiency: &Deficiency) {
    let severity = deficiency.severity;
    lines.push(ReportLine::Separator);
    lines.push(ReportLine::message(
        deficiency_heading(deficiency),
        severity.level(),
        Some(severity.color()),
    ));
    lines.push(ReportLine::message(
        "Missing documentation for columns:",
        Level::Info,
        None,
    ));
    for column in &deficiency.missing_columns {
        lines.push(ReportLine::message(
            format!("  - {column}"),
            Level::Info,
            None,
        ));
    }
}

fn verdict_line(summary: &CoverageSummary) -> ReportLine {
    let threshold = format_threshold(summary.threshold);
    if summary.verdict().is_pass() {
        ReportLine::message(
            format!(
                "Documentation coverage ({:.1}%) meets or exceeds the threshold of {threshold}%",
                summary.coverage_percent()
            ),
            Level::Success,
            Some(Color::Green),
        )
    } else {
        ReportLine::message(
            format!(
                "Documentation coverage ({:.1}%) is below the threshold of {threshold}%",
                summary.coverage_percent()
            ),
            Level::Error,
            Some(Color::Red),
        )
    }
}

/// Write rendered lines to a sink.
pub fn emit_lines<S: ReportSink + ?Sized>(sink: &mut S, lines: &[ReportLine]) -> Result<()> {
    for line in lines {
        match line {
            ReportLine::Message { text, level, color } => sink.emit(text, *level, *color)?,
            ReportLine::Separator => sink.separator()?,
        }
    }
    Ok(())
}

/// Render an analysis to a sink.
pub fn emit_analysis<S: ReportSink + ?Sized>(sink: &mut S, analysis: &Analysis) -> Result<()> {
    emit_lines(sink, &render_lines(analysis))
}

/// Report file formats.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReportFormat {
    /// Pretty-printed JSON.
    Json,
    /// Markdown document.
    Markdown,
}

/// Render an analysis in the given file format.
pub fn render_report(analysis: &Analysis, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Json => render_json(analysis),
        ReportFormat::Markdown => Ok(render_markdown(analysis)),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    status: &'static str,
    passed: bool,
    threshold: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    coverage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    covered: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    coverage_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deficiencies: Option<&'a [Deficiency]>,
}

/// Render an analysis as pretty JSON.
pub fn render_json(analysis: &Analysis) -> Result<String> {
    let payload = match analysis {
        Analysis::NoData { threshold } => JsonReport {
            status: "no_data",
            passed: false,
            threshold: *threshold,
            coverage: None,
            covered: None,
            total: None,
            coverage_percent: None,
            deficiencies: None,
        },
        Analysis::Analyzed(summary) => JsonReport {
            status: "analyzed",
            passed: summary.verdict().is_pass(),
            threshold: summary.threshold,
            coverage: Some(summary.coverage),
            covered: Some(summary.covered),
            total: Some(summary.total),
            coverage_percent: Some(summary.coverage_percent()),
            deficiencies: Some(summary.deficiencies.as_slice()),
        },
    };
    Ok(serde_json::to_string_pretty(&payload)?)
}

/// Render an analysis as Markdown.
pub fn render_markdown(analysis: &Analysis) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# Documentation Coverage Report\n");
    let summary = match analysis {
        Analysis::NoData { threshold } => {
            let _ = writeln!(output, "- Status: no coverage data available");
            let _ = writeln!(output, "- Threshold: {}%", format_threshold(*threshold));
            let _ = writeln!(output, "- Result: fail");
            return output;
        }
        Analysis::Analyzed(summary) => summary,
    };

    let _ = writeln!(
        output,
        "- Coverage: {}/{} columns ({:.1}%)",
        summary.covered,
        summary.total,
        summary.coverage_percent()
    );
    let _ = writeln!(
        output,
        "- Threshold: {}%",
        format_threshold(summary.threshold)
    );
    let _ = writeln!(
        output,
        "- Result: {}\n",
        if summary.verdict().is_pass() {
            "pass"
        } else {
            "fail"
        }
    );

    if summary.deficiencies.is_empty() {
        let _ = writeln!(output, "## Models Requiring Documentation Fixes\nNone.");
        return output;
    }
    let _ = writeln!(output, "## Models Requiring Documentation Fixes\n");
    let _ = writeln!(output, "| Severity | Model | Coverage | Missing columns |");
    let _ = writeln!(output, "|---|---|---|---|");
    for deficiency in &summary.deficiencies {
        let _ = writeln!(
            output,
            "| {} | `{}` | {:.1}% | {} |",
            deficiency.severity.as_str(),
            escape_cell(&deficiency.model),
            deficiency.coverage_percent,
            deficiency
                .missing_columns
                .iter()
                .map(|column| format!("`{}`", escape_cell(column)))
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    output
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
