//! Console and log file output.
//!
//! Every message is written twice: to the console, optionally coloured, and
//! to the run log as a plain `LEVEL: message` line.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Stdout, Write};
use std::path::Path;

use colored::{Color, Colorize};

use crate::error::Result;

/// Default run log file name.
pub const DEFAULT_LOG_FILE: &str = "dbt_documentation.log";

/// Level prefix written to the log for each message.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Level {
    /// Plain information.
    Info,
    /// Section header.
    Status,
    /// A failure.
    Error,
    /// Coverage meets the threshold.
    Success,
    /// A model with no documented columns.
    Critical,
    /// A model below the threshold.
    Warning,
    /// A model at or above the threshold but not fully documented.
    Minor,
}

impl Level {
    /// Label used in the log file.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Status => "STATUS",
            Self::Error => "ERROR",
            Self::Success => "SUCCESS",
            Self::Critical => "CRITICAL",
            Self::Warning => "WARNING",
            Self::Minor => "MINOR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destination for user-facing report output.
pub trait ReportSink {
    /// Write a message to every channel.
    fn emit(&mut self, message: &str, level: Level, color: Option<Color>) -> Result<()>;
    /// Write raw text (external tool output) to every channel, unprefixed.
    fn passthrough(&mut self, text: &str) -> Result<()>;
    /// Write a blank line to every channel.
    fn separator(&mut self) -> Result<()>;
}

/// Sink writing to a console stream and a log stream.
#[derive(Debug)]
pub struct DualSink<C: Write, L: Write> {
    console: C,
    log: L,
    color: bool,
}

impl DualSink<Stdout, BufWriter<File>> {
    /// Write to stdout and to `log_path`, truncating the log first.
    pub fn create(log_path: &Path, color: bool) -> Result<Self> {
        let file = File::create(log_path)?;
        log::debug!("writing run log to {}", log_path.display());
        Ok(Self::new(io::stdout(), BufWriter::new(file), color))
    }
}

impl<C: Write, L: Write> DualSink<C, L> {
    /// Wrap arbitrary console and log writers.
    pub fn new(console: C, log: L, color: bool) -> Self {
        Self {
            console,
            log,
            color,
        }
    }

    /// Recover the underlying writers.
    pub fn into_parts(self) -> (C, L) {
        (self.console, self.log)
    }
}

impl<C: Write, L: Write> ReportSink for DualSink<C, L> {
    fn emit(&mut self, message: &str, level: Level, color: Option<Color>) -> Result<()> {
        match color {
            Some(color) if self.color => writeln!(self.console, "{}", message.color(color))?,
            _ => writeln!(self.console, "{message}")?,
        }
        writeln!(self.log, "{level}: {message}")?;
        self.console.flush()?;
        self.log.flush()?;
        Ok(())
    }

    fn passthrough(&mut self, text: &str) -> Result<()> {
        writeln!(self.console, "{text}")?;
        self.log.write_all(text.as_bytes())?;
        self.console.flush()?;
        self.log.flush()?;
        Ok(())
    }

    fn separator(&mut self) -> Result<()> {
        writeln!(self.console)?;
        writeln!(self.log)?;
        self.console.flush()?;
        self.log.flush()?;
        Ok(())
    }
}
