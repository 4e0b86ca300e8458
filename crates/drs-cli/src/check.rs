//! # Check CLI — Run the DRS endpoint conformance suite.
//!
//! Provides the `drs check` subcommand: loads test cases from a
//! comma-separated input file, issues one GET per case against the
//! configured base URL, and emits a structured report line per check
//! to stderr. Schema-mismatch details land in per-object `<id>.log`
//! files under the log directory.
//!
//! ## Usage
//!
//! ```bash
//! drs check --schema_dir schemas/json \
//!           --base_url http://localhost:5000/ga4gh/drs/v1/objects/ \
//!           --input_file cases.csv
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use drs_validator::{EndpointValidator, StderrSink, TestCase, ValidatorConfig};

/// Check subcommand arguments.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Directory containing the JSON response schemas.
    #[arg(long = "schema_dir", short = 's')]
    pub schema_dir: PathBuf,

    /// Base URL of the DRS objects endpoint. Object IDs are appended
    /// verbatim, so include any trailing slash the service expects.
    #[arg(long = "base_url", short = 'u')]
    pub base_url: String,

    /// Comma-separated input file of test cases with an
    /// `object_id,expected_status_code` header row.
    #[arg(long = "input_file", short = 'i')]
    pub input_file: PathBuf,

    /// Directory for per-object failure logs.
    #[arg(long, default_value = ".")]
    pub log_dir: PathBuf,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}

/// Execute the check subcommand.
///
/// Returns 0 when every check in every case passed, 1 otherwise.
/// Transport and schema-load faults are reported as failed checks,
/// not errors, so a flaky endpoint never aborts the remaining cases.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let cases = load_cases(&args.input_file)?;
    tracing::info!(
        cases = cases.len(),
        base_url = %args.base_url,
        "loaded test cases"
    );

    let config = ValidatorConfig::new(&args.base_url, &args.schema_dir)
        .with_log_dir(&args.log_dir)
        .with_timeout_secs(args.timeout_secs);
    let validator = EndpointValidator::new(config).context("failed to build HTTP client")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build async runtime")?;

    let mut sink = StderrSink::new();
    let mut failed = 0usize;

    runtime.block_on(async {
        for case in &cases {
            let outcome = validator
                .validate(&case.object_id, case.expected_status, &mut sink)
                .await;
            if !outcome.all_passed() {
                failed += 1;
            }
        }
    });

    if failed > 0 {
        tracing::warn!(failed, total = cases.len(), "cases with failed checks");
        Ok(1)
    } else {
        tracing::info!(total = cases.len(), "all checks passed");
        Ok(0)
    }
}

/// Read and deserialize the test cases from the input file.
///
/// Rows must carry `object_id` and `expected_status_code` columns; an
/// optional `expected_content_type` column is accepted for forward
/// compatibility with older case files.
fn load_cases(path: &PathBuf) -> Result<Vec<TestCase>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open input file: {}", path.display()))?;
    let mut cases = Vec::new();
    for record in reader.deserialize() {
        let case: TestCase = record
            .with_context(|| format!("malformed test case in {}", path.display()))?;
        cases.push(case);
    }
    Ok(cases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_cases(dir: &std::path::Path, data: &str) -> PathBuf {
        let path = dir.join("cases.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(data.as_bytes()).unwrap();
        path
    }

    #[test]
    fn load_cases_parses_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_cases(
            dir.path(),
            "object_id,expected_status_code\nabc123,200\nmissing1,404\n",
        );
        let cases = load_cases(&path).unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].object_id, "abc123");
        assert_eq!(cases[0].expected_status, 200);
        assert_eq!(cases[1].expected_status, 404);
    }

    #[test]
    fn load_cases_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_cases(&dir.path().join("nope.csv")).unwrap_err();
        assert!(err.to_string().contains("failed to open input file"));
    }

    #[test]
    fn load_cases_bad_status_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_cases(
            dir.path(),
            "object_id,expected_status_code\nabc123,twohundred\n",
        );
        let err = load_cases(&path).unwrap_err();
        assert!(err.to_string().contains("malformed test case"));
    }
}
