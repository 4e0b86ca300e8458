//! # drs-validator — Endpoint Validator Core
//!
//! Runs the three-stage check sequence of the DRS conformance harness for
//! one object id at a time:
//!
//! 1. **Status code** — observed GET status equals the expected status.
//! 2. **Content type** — the response declares `application/json` and the
//!    body parses as JSON.
//! 3. **Schema** — the body conforms to the schema implied by the observed
//!    status code (`DrsObject` for 200, `Error` for the failure statuses),
//!    with cross-file `$ref`s resolved against the schema directory.
//!
//! Every check emits one [`ValidationResult`] to a [`ReportSink`] the
//! moment it is evaluated; nothing is batched and nothing is retained
//! across test cases. Check failures are never fatal — transport faults and
//! unusable schema files are themselves reported as failed checks so that
//! one bad case cannot abort the rest of the run.

pub mod case;
pub mod error;
pub mod report;
pub mod validator;

pub use case::TestCase;
pub use error::ValidatorError;
pub use report::{CheckKind, MemorySink, ReportSink, StderrSink, ValidationResult};
pub use validator::{
    CaseOutcome, EndpointValidator, RequestOutcome, ResponseBody, ResponseSnapshot,
    ValidatorConfig, EXPECTED_CONTENT_TYPE, SCHEMA_SKIP_NOTICE,
};
