//! Test case records read from the tabular input file.

use serde::Deserialize;

/// One row of the comma-separated input file.
///
/// The header row names the columns `object_id`, `expected_status_code`,
/// `expected_content_type`. The third column is accepted for compatibility
/// with existing input files but unused: the content-type check always
/// expects `application/json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TestCase {
    /// Identifier appended to the base URL to form the GET target.
    pub object_id: String,
    /// HTTP status code the endpoint is expected to return.
    #[serde(rename = "expected_status_code")]
    pub expected_status: u16,
    /// Accepted but unused; see struct docs.
    #[serde(default, rename = "expected_content_type")]
    pub expected_content_type: Option<String>,
}
