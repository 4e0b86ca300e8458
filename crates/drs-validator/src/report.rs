//! # Per-Check Report Records
//!
//! Each evaluated check produces one [`ValidationResult`] whose `Display`
//! is the fixed report line format:
//!
//! ```text
//! {object_id : <id>, test_name : <name>, pass : <bool>, message : <text>}
//! ```
//!
//! The format carries no timestamps, counters, or other run-dependent
//! state, so validating the same response twice yields byte-identical
//! lines. Results are pushed into a [`ReportSink`] as soon as they are
//! evaluated; the sink decides where the line goes (stderr in the CLI,
//! memory in tests and embedders).

use std::fmt;
use std::io::Write;

/// Which of the harness checks a result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    /// Observed HTTP status equals the expected status.
    StatusCode,
    /// Response declares `application/json` and the body parses as JSON.
    ContentType,
    /// Body conforms to the schema selected for the observed status.
    Schema,
    /// The schema for the observed status could not be selected, loaded,
    /// or compiled. Hardened-path check: reported instead of aborting.
    SchemaLoad,
    /// The GET request itself could not be completed. Hardened-path check.
    Transport,
}

impl CheckKind {
    /// Report name of the check.
    pub fn name(&self) -> &'static str {
        match self {
            Self::StatusCode => "Check HTTP status code",
            Self::ContentType => "Check response object type",
            Self::Schema => "Check response JSON against schema",
            Self::SchemaLoad => "Load response schema",
            Self::Transport => "Perform GET request",
        }
    }
}

/// Outcome of one check for one object id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// Object id the check ran against.
    pub object_id: String,
    /// Which check this is.
    pub check: CheckKind,
    /// Whether the check passed.
    pub passed: bool,
    /// Human-readable detail (expected/observed values, log pointer, ...).
    pub message: String,
}

impl ValidationResult {
    /// Construct a result record.
    pub fn new(
        object_id: impl Into<String>,
        check: CheckKind,
        passed: bool,
        message: impl Into<String>,
    ) -> Self {
        Self {
            object_id: object_id.into(),
            check,
            passed,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{object_id : {}, test_name : {}, pass : {}, message : {}}}",
            self.object_id,
            self.check.name(),
            self.passed,
            self.message
        )
    }
}

/// Destination for report records and skip notices.
///
/// `emit` is called once per evaluated check, immediately. `note` carries
/// out-of-band run notices (currently only the schema-validation skip
/// message for non-JSON responses).
pub trait ReportSink {
    /// Record one check outcome.
    fn emit(&mut self, result: &ValidationResult);

    /// Record a free-form notice line.
    fn note(&mut self, message: &str);
}

/// Sink that streams each record to standard error as one line followed
/// by a blank separator line.
#[derive(Debug, Default)]
pub struct StderrSink;

impl StderrSink {
    /// New stderr sink.
    pub fn new() -> Self {
        Self
    }
}

impl ReportSink for StderrSink {
    fn emit(&mut self, result: &ValidationResult) {
        let mut err = std::io::stderr().lock();
        write_separated(&mut err, &result.to_string());
    }

    fn note(&mut self, message: &str) {
        let mut err = std::io::stderr().lock();
        write_separated(&mut err, message);
    }
}

/// Write one record line followed by a blank separator line, the stream
/// shape consumers of the stderr report expect.
fn write_separated(out: &mut dyn Write, line: &str) {
    // A report line the operator cannot see is not worth crashing the
    // run over; the exit code still reflects the outcome.
    let _ = writeln!(out, "{line}\n");
}

/// In-memory sink for tests and embedders that aggregate their own output.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Vec<String>,
    results: Vec<ValidationResult>,
}

impl MemorySink {
    /// New empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every emitted line (report records and notes) in emission order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Only the structured check records, in emission order.
    pub fn results(&self) -> &[ValidationResult] {
        &self.results
    }
}

impl ReportSink for MemorySink {
    fn emit(&mut self, result: &ValidationResult) {
        self.lines.push(result.to_string());
        self.results.push(result.clone());
    }

    fn note(&mut self, message: &str) {
        self.lines.push(message.to_string());
    }
}
