//! # Endpoint Validator
//!
//! Orchestrates the check sequence for one test case: issue the GET, emit
//! the status-code and content-type checks, then (only when the body is
//! usable JSON) select and apply the schema implied by the observed status.
//!
//! The validator holds configuration only — base URL, schema store, catalog,
//! HTTP client, failure-log directory. Everything observed about a response
//! lives in a [`ResponseSnapshot`] that is built fresh per call and dropped
//! when the case completes, so a previous object id can never leak into a
//! later report.

use std::path::{Path, PathBuf};
use std::time::Duration;

use drs_schema::{SchemaCatalog, SchemaError, SchemaStore, Violations};
use serde_json::Value;

use crate::error::ValidatorError;
use crate::report::{CheckKind, ReportSink, ValidationResult};

/// Content type every DRS response must declare.
pub const EXPECTED_CONTENT_TYPE: &str = "application/json";

/// Notice emitted when schema validation is skipped for a non-JSON response.
pub const SCHEMA_SKIP_NOTICE: &str =
    "Object received was not a valid JSON, and so not checked against schema.";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Validator configuration.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// URL prefix to which object ids are appended verbatim.
    pub base_url: String,
    /// Flat directory of `<SchemaName>.json` files.
    pub schema_dir: PathBuf,
    /// Directory for `<object_id>.log` failure artifacts.
    pub log_dir: PathBuf,
    /// Per-request timeout in seconds (default: 30).
    pub timeout_secs: u64,
}

impl ValidatorConfig {
    /// Configuration with the default timeout and the current directory as
    /// the log directory.
    pub fn new(base_url: impl Into<String>, schema_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_url: base_url.into(),
            schema_dir: schema_dir.into(),
            log_dir: PathBuf::from("."),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Override the failure-log directory.
    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = log_dir.into();
        self
    }

    /// Override the per-request timeout.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Response body as captured for validation.
#[derive(Debug, Clone)]
pub enum ResponseBody {
    /// Body parsed as JSON.
    Json(Value),
    /// Body could not be parsed as JSON; carries the parse diagnostic.
    NotJson(String),
}

/// Captured status, content type, and body of one GET response.
///
/// Owned by the validation run for one object id and discarded when its
/// checks complete.
#[derive(Debug, Clone)]
pub struct ResponseSnapshot {
    /// Observed HTTP status code.
    pub status: u16,
    /// Declared content type (empty string when the header is absent).
    pub content_type: String,
    /// Captured body.
    pub body: ResponseBody,
}

/// Snapshot plus the verdicts of the two request-level checks.
#[derive(Debug)]
pub struct RequestOutcome {
    /// The captured response.
    pub snapshot: ResponseSnapshot,
    /// Check 1 verdict: observed status equals expected status.
    pub status_ok: bool,
    /// Check 2 verdict: declared `application/json` and body parsed.
    pub content_type_ok: bool,
}

/// Per-case verdict summary for the driver's exit accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaseOutcome {
    /// Check 1 verdict.
    pub status_ok: bool,
    /// Check 2 verdict.
    pub content_type_ok: bool,
    /// Check 3 verdict; `None` when schema validation was skipped or the
    /// request never completed.
    pub schema_ok: Option<bool>,
}

impl CaseOutcome {
    /// True only when all three checks ran and passed.
    pub fn all_passed(&self) -> bool {
        self.status_ok && self.content_type_ok && self.schema_ok == Some(true)
    }

    fn transport_failed() -> Self {
        Self {
            status_ok: false,
            content_type_ok: false,
            schema_ok: None,
        }
    }
}

/// Runs the three-stage check sequence against a configured endpoint.
#[derive(Debug)]
pub struct EndpointValidator {
    client: reqwest::Client,
    base_url: String,
    store: SchemaStore,
    catalog: SchemaCatalog,
    log_dir: PathBuf,
}

impl EndpointValidator {
    /// Build a validator with the built-in DRS schema catalog.
    pub fn new(config: ValidatorConfig) -> Result<Self, ValidatorError> {
        Self::with_catalog(config, SchemaCatalog::builtin())
    }

    /// Build a validator with a custom status→schema catalog.
    pub fn with_catalog(
        config: ValidatorConfig,
        catalog: SchemaCatalog,
    ) -> Result<Self, ValidatorError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ValidatorError::ClientBuild)?;
        Ok(Self {
            client,
            base_url: config.base_url,
            store: SchemaStore::new(&config.schema_dir),
            catalog,
            log_dir: config.log_dir,
        })
    }

    /// The configured base URL prefix.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run all checks for one test case.
    ///
    /// Always runs the request-level checks; runs the schema check only
    /// when the content-type check passed. A transport fault is reported
    /// as a failed check and the method still returns, so the driver can
    /// continue with the next case.
    pub async fn validate(
        &self,
        object_id: &str,
        expected_status: u16,
        sink: &mut dyn ReportSink,
    ) -> CaseOutcome {
        let outcome = match self.validate_request(object_id, expected_status, sink).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(object_id, "GET request failed: {err}");
                sink.emit(&ValidationResult::new(
                    object_id,
                    CheckKind::Transport,
                    false,
                    err.to_string(),
                ));
                return CaseOutcome::transport_failed();
            }
        };

        let schema_ok = if outcome.content_type_ok {
            Some(self.validate_schema(object_id, &outcome.snapshot, sink))
        } else {
            sink.note(SCHEMA_SKIP_NOTICE);
            None
        };

        CaseOutcome {
            status_ok: outcome.status_ok,
            content_type_ok: outcome.content_type_ok,
            schema_ok,
        }
    }

    /// Perform the GET request and emit the status-code and content-type
    /// checks. Both checks are always emitted, in that order, regardless
    /// of their verdicts.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::Transport`] when the request or the body
    /// read fails; in that case no check has been emitted.
    pub async fn validate_request(
        &self,
        object_id: &str,
        expected_status: u16,
        sink: &mut dyn ReportSink,
    ) -> Result<RequestOutcome, ValidatorError> {
        let url = format!("{}{}", self.base_url, object_id);
        tracing::debug!(%url, expected_status, "issuing GET request");

        let response =
            self.client
                .get(&url)
                .send()
                .await
                .map_err(|e| ValidatorError::Transport {
                    endpoint: url.clone(),
                    reason: e.to_string(),
                })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ValidatorError::Transport {
                endpoint: url,
                reason: format!("failed to read response body: {e}"),
            })?;

        let body = match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => ResponseBody::Json(value),
            Err(e) => ResponseBody::NotJson(e.to_string()),
        };
        let snapshot = ResponseSnapshot {
            status,
            content_type,
            body,
        };

        let status_ok = status == expected_status;
        sink.emit(&ValidationResult::new(
            object_id,
            CheckKind::StatusCode,
            status_ok,
            format!("Expected - {expected_status}; Received - {status}"),
        ));

        let header_ok = snapshot.content_type.contains(EXPECTED_CONTENT_TYPE);
        let (content_type_ok, message) = match (&snapshot.body, header_ok) {
            (ResponseBody::Json(_), true) => (
                true,
                format!(
                    "Expected: {EXPECTED_CONTENT_TYPE} in header; Received: {}",
                    snapshot.content_type
                ),
            ),
            (_, false) => (
                false,
                format!(
                    "Expected: {EXPECTED_CONTENT_TYPE} in header; Received: {}",
                    snapshot.content_type
                ),
            ),
            (ResponseBody::NotJson(reason), true) => (
                false,
                format!(
                    "Response declared {EXPECTED_CONTENT_TYPE} but body is not parseable as JSON: {reason}"
                ),
            ),
        };
        sink.emit(&ValidationResult::new(
            object_id,
            CheckKind::ContentType,
            content_type_ok,
            message,
        ));

        Ok(RequestOutcome {
            snapshot,
            status_ok,
            content_type_ok,
        })
    }

    /// Select the schema for the snapshot's status code and validate the
    /// body against it. Precondition: the content-type check passed, so
    /// the body is parsed JSON.
    ///
    /// Returns the schema-check verdict. Schema selection and load
    /// failures emit a failed [`CheckKind::SchemaLoad`] record rather than
    /// aborting the run.
    pub fn validate_schema(
        &self,
        object_id: &str,
        snapshot: &ResponseSnapshot,
        sink: &mut dyn ReportSink,
    ) -> bool {
        let ResponseBody::Json(instance) = &snapshot.body else {
            sink.emit(&ValidationResult::new(
                object_id,
                CheckKind::SchemaLoad,
                false,
                "response body is not JSON; schema validation requires a parsed body",
            ));
            return false;
        };

        let schema_name = match self.catalog.schema_for_status(snapshot.status) {
            Ok(name) => name.to_string(),
            Err(err) => {
                sink.emit(&ValidationResult::new(
                    object_id,
                    CheckKind::SchemaLoad,
                    false,
                    err.to_string(),
                ));
                return false;
            }
        };

        match self.store.validate(instance, &schema_name) {
            Ok(()) => {
                sink.emit(&ValidationResult::new(
                    object_id,
                    CheckKind::Schema,
                    true,
                    format!("{object_id} endpoint instance matches {schema_name} schema."),
                ));
                true
            }
            Err(SchemaError::ValidationFailed { violations, .. }) => {
                self.write_failure_log(object_id, &schema_name, &violations);
                sink.emit(&ValidationResult::new(
                    object_id,
                    CheckKind::Schema,
                    false,
                    format!(
                        "{object_id} endpoint instance does not match {schema_name} schema, see {object_id}.log."
                    ),
                ));
                false
            }
            Err(err) => {
                sink.emit(&ValidationResult::new(
                    object_id,
                    CheckKind::SchemaLoad,
                    false,
                    err.to_string(),
                ));
                false
            }
        }
    }

    /// Write (overwrite) the `<object_id>.log` artifact with the full
    /// violation detail so a human can inspect the exact schema breach.
    fn write_failure_log(&self, object_id: &str, schema_name: &str, violations: &Violations) {
        let path = self.log_dir.join(format!("{object_id}.log"));
        let detail = format!(
            "schema validation failed for object '{object_id}' against schema '{schema_name}':\n{violations}\n"
        );
        if let Err(e) = std::fs::write(&path, detail) {
            tracing::warn!(path = %path.display(), "could not write schema failure log: {e}");
        }
    }

    /// The failure-log directory.
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}
