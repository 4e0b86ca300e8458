//! Validator error types.
//!
//! Only faults that prevent a check from being *evaluated* are errors here.
//! A check that evaluates to "failed" is an ordinary [`crate::ValidationResult`]
//! and never surfaces through this enum.

/// Errors from the endpoint validator.
///
/// Schema-side faults never surface here: `validate_schema` turns them
/// into failed `SchemaLoad` records, and failure-log IO problems are
/// logged and swallowed so a full disk cannot change a verdict.
#[derive(Debug, thiserror::Error)]
pub enum ValidatorError {
    /// The GET request could not be completed (connection refused, DNS
    /// failure, timeout, body read failure).
    #[error("HTTP error calling {endpoint}: {reason}")]
    Transport {
        /// Full URL that was requested.
        endpoint: String,
        /// Transport diagnostic.
        reason: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}
