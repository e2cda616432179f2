//! Report rendering.
//!
//! ## ReportSink Trait
//!
//! The harness hands each finished [`Report`] to a [`ReportSink`] instead of printing directly. [`ConsoleSink`]
//! reproduces the console format below on any `io::Write`; `Vec<Report>` collects reports for inspection.
//!
//! ## Console format
//!
//! ```text
//! ### TESTING <name>: PASSED <passed>/<total>
//! # <diagnostic>            (zero or more)
//! # <index>\t: <message>    (one per failed result, index into the full session)
//! ###
//!
//! ```

use std::fmt;
use std::io::{self, Write};

use crate::session::TestResult;

/// Outcome of one `wrap` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub target: String,
    pub results: Vec<TestResult>,
    pub diagnostics: Vec<String>,
}

impl Report {
    pub fn new(target: impl Into<String>, results: Vec<TestResult>, diagnostics: Vec<String>) -> Self {
        Self {
            target: target.into(),
            results,
            diagnostics,
        }
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Failed results paired with their position in the session.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &TestResult)> {
        self.results.iter().enumerate().filter(|(_, r)| !r.passed())
    }

    /// True when every recorded result passed and nothing needed a diagnostic.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty() && self.passed() == self.total()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### TESTING {}: PASSED {}/{}", self.target, self.passed(), self.total())?;
        for diagnostic in &self.diagnostics {
            writeln!(f, "# {diagnostic}")?;
        }
        for (index, result) in self.failures() {
            writeln!(f, "# {index}\t: {}", result.message())?;
        }
        writeln!(f, "###")?;
        writeln!(f)
    }
}

/// Destination for finished reports.
pub trait ReportSink {
    fn report(&mut self, report: &Report) -> io::Result<()>;
}

/// Writes reports in the console format.
#[derive(Debug, Default)]
pub struct ConsoleSink<W> {
    writer: W,
}

impl ConsoleSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self { writer: io::stdout() }
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for ConsoleSink<W> {
    fn report(&mut self, report: &Report) -> io::Result<()> {
        write!(self.writer, "{report}")?;
        self.writer.flush()
    }
}

impl ReportSink for Vec<Report> {
    fn report(&mut self, report: &Report) -> io::Result<()> {
        self.push(report.clone());
        Ok(())
    }
}

impl<S: ReportSink + ?Sized> ReportSink for &mut S {
    fn report(&mut self, report: &Report) -> io::Result<()> {
        (**self).report(report)
    }
}
