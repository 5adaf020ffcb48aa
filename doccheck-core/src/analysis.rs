//! Coverage analysis: aggregate verdict and per-model deficiencies.
//!
//! The verdict depends only on the aggregate coverage figure. Deficiencies
//! are diagnostic detail and never change it.

use std::cmp::Ordering;

use colored::Color;
use serde::Serialize;

use crate::domain::{CoverageReport, TableCoverage};
use crate::sink::Level;

/// Default minimum aggregate coverage.
pub const DEFAULT_THRESHOLD: f64 = 0.9;

/// How urgently a model needs documentation work.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// No documented columns at all.
    Critical,
    /// Below the threshold.
    Warning,
    /// At or above the threshold but not fully documented.
    Minor,
}

impl Severity {
    /// Classify a deficient model by its coverage percentage (0-100).
    ///
    /// Rules are applied in order: zero coverage is critical, anything below
    /// `threshold * 100` is a warning, and the rest is minor.
    pub fn classify(coverage_percent: f64, threshold: f64) -> Self {
        if coverage_percent == 0.0 {
            Self::Critical
        } else if coverage_percent < threshold * 100.0 {
            Self::Warning
        } else {
            Self::Minor
        }
    }

    /// Uppercase label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::Warning => "WARNING",
            Self::Minor => "MINOR",
        }
    }

    /// Log level used for the model heading.
    pub fn level(self) -> Level {
        match self {
            Self::Critical => Level::Critical,
            Self::Warning => Level::Warning,
            Self::Minor => Level::Minor,
        }
    }

    /// Console colour for the model heading.
    pub fn color(self) -> Color {
        match self {
            Self::Critical => Color::Red,
            Self::Warning => Color::Yellow,
            Self::Minor => Color::Cyan,
        }
    }
}

/// A model that needs documentation work.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deficiency {
    /// Model name.
    pub model: String,
    /// Model coverage, 0-100.
    pub coverage_percent: f64,
    /// Columns with no documentation, in column order. Never empty.
    pub missing_columns: Vec<String>,
    /// Remediation priority.
    pub severity: Severity,
}

/// Overall pass/fail outcome.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Coverage meets or exceeds the threshold.
    Pass,
    /// Coverage is below the threshold, or there was nothing to analyze.
    Fail,
}

impl Verdict {
    /// Process exit code for this verdict.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Pass => 0,
            Self::Fail => 1,
        }
    }

    /// Whether the check passed.
    pub fn is_pass(self) -> bool {
        self == Self::Pass
    }
}

/// Analysis of a coverage report.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageSummary {
    /// Aggregate coverage fraction as reported.
    pub coverage: f64,
    /// Documented columns.
    pub covered: u64,
    /// Total columns.
    pub total: u64,
    /// Threshold the verdict was computed against.
    pub threshold: f64,
    /// Deficient models, worst first.
    pub deficiencies: Vec<Deficiency>,
}

impl CoverageSummary {
    /// Aggregate coverage as a percentage.
    pub fn coverage_percent(&self) -> f64 {
        self.coverage * 100.0
    }

    /// Pass iff aggregate coverage is at least the threshold.
    pub fn verdict(&self) -> Verdict {
        if self.coverage < self.threshold {
            Verdict::Fail
        } else {
            Verdict::Pass
        }
    }
}

/// Result of analyzing an optional coverage report.
#[derive(Debug, Clone, PartialEq)]
pub enum Analysis {
    /// No report could be obtained.
    NoData {
        /// Threshold that would have applied.
        threshold: f64,
    },
    /// A report was analyzed.
    Analyzed(CoverageSummary),
}

impl Analysis {
    /// Overall verdict; missing data always fails.
    pub fn verdict(&self) -> Verdict {
        match self {
            Self::NoData { .. } => Verdict::Fail,
            Self::Analyzed(summary) => summary.verdict(),
        }
    }

    /// Threshold used for the verdict.
    pub fn threshold(&self) -> f64 {
        match self {
            Self::NoData { threshold } => *threshold,
            Self::Analyzed(summary) => summary.threshold,
        }
    }

    /// Deficient models, worst first; empty without data.
    pub fn deficiencies(&self) -> &[Deficiency] {
        match self {
            Self::NoData { .. } => &[],
            Self::Analyzed(summary) => &summary.deficiencies,
        }
    }
}

/// Analyze a coverage report against a threshold.
pub fn analyze(report: Option<&CoverageReport>, threshold: f64) -> Analysis {
    let Some(report) = report else {
        return Analysis::NoData { threshold };
    };

    Analysis::Analyzed(CoverageSummary {
        coverage: report.coverage,
        covered: report.covered,
        total: report.total,
        threshold,
        deficiencies: find_deficiencies(report, threshold),
    })
}

/// Deficient models sorted by ascending coverage; ties keep report order.
pub fn find_deficiencies(report: &CoverageReport, threshold: f64) -> Vec<Deficiency> {
    let mut deficiencies: Vec<Deficiency> = report
        .tables
        .iter()
        .filter_map(|table| deficiency_for(table, threshold))
        .collect();
    deficiencies.sort_by(|a, b| {
        a.coverage_percent
            .partial_cmp(&b.coverage_percent)
            .unwrap_or(Ordering::Equal)
    });
    deficiencies
}

// Partially covered tables without a fully undocumented column are not reported.
fn deficiency_for(table: &TableCoverage, threshold: f64) -> Option<Deficiency> {
    if table.coverage >= 1.0 {
        return None;
    }
    let missing_columns = table.undocumented_columns();
    if missing_columns.is_empty() {
        return None;
    }
    let coverage_percent = table.coverage * 100.0;
    Some(Deficiency {
        model: table.name.clone(),
        coverage_percent,
        missing_columns,
        severity: Severity::classify(coverage_percent, threshold),
    })
}
