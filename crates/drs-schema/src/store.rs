//! # Schema Store
//!
//! Loads JSON Schema documents from a flat directory and validates response
//! bodies against them. Cross-file `$ref`s (e.g. an `Error` schema pointing
//! at a shared definition file) resolve against the same directory via a
//! local [`Retrieve`] implementation, so validation never touches the
//! network.
//!
//! Schemas are re-read from disk on every call. The harness validates one
//! response per test case, so the reload cost is irrelevant and the
//! directory can be edited between runs without restarting anything.

use std::fmt;
use std::path::{Path, PathBuf};

use jsonschema::{Retrieve, Uri};
use serde_json::Value;
use thiserror::Error;

/// Errors from catalog lookup, schema loading, and schema validation.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// Two catalog entries claim the same status code.
    #[error("schema catalog overlap: status {status} is claimed by both '{first}' and '{second}'")]
    CatalogOverlap {
        /// The contested status code.
        status: u16,
        /// First schema name claiming the code.
        first: String,
        /// Second schema name claiming the code.
        second: String,
    },

    /// No catalog entry covers the observed status code.
    #[error("no schema is mapped for HTTP status {status}; the catalog does not cover it")]
    UnmappedStatus {
        /// The uncovered status code.
        status: u16,
    },

    /// The schema file does not exist or cannot be read.
    #[error("schema file '{path}' could not be read: {reason}")]
    SchemaNotFound {
        /// Path that was attempted.
        path: String,
        /// Underlying read failure.
        reason: String,
    },

    /// The schema file is not valid JSON.
    #[error("schema file '{path}' is not valid JSON: {reason}")]
    SchemaMalformed {
        /// Path of the malformed file.
        path: String,
        /// Parse failure detail.
        reason: String,
    },

    /// The schema parsed but could not be compiled into a validator
    /// (bad keyword, unresolvable `$ref`, ...).
    #[error("schema '{schema_name}' failed to compile: {reason}")]
    CompileFailed {
        /// Logical schema name.
        schema_name: String,
        /// Compiler diagnostic.
        reason: String,
    },

    /// The instance did not conform to the schema.
    #[error("instance does not conform to schema '{schema_name}':\n{violations}")]
    ValidationFailed {
        /// Logical schema name validated against.
        schema_name: String,
        /// Structured list of individual violations.
        violations: Violations,
    },

    /// IO error outside schema reads (e.g. directory enumeration).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single schema violation with structured context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// JSON Pointer into the instance where the violation occurred.
    pub instance_path: String,
    /// JSON Pointer into the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of violations from one validation call.
#[derive(Debug, Clone)]
pub struct Violations {
    violations: Vec<Violation>,
}

impl Violations {
    /// Number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// True when no violations were recorded.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Resolves `$ref` URIs by trailing filename against the schema directory.
///
/// Relative references between schema files ("Error.json" pointing at a
/// shared "Checksum.json") surface here with whatever base URI the
/// `jsonschema` crate assigned; only the final path segment matters for a
/// flat directory, so that is what gets looked up on disk.
struct DirRetriever {
    schema_dir: PathBuf,
}

impl Retrieve for DirRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        let filename = uri_str.rsplit('/').next().unwrap_or(uri_str);
        let path = self.schema_dir.join(filename);
        let content = std::fs::read_to_string(&path)
            .map_err(|e| format!("cannot read referenced schema '{}': {e}", path.display()))?;
        let value: Value = serde_json::from_str(&content)
            .map_err(|e| format!("referenced schema '{}' is not valid JSON: {e}", path.display()))?;
        Ok(value)
    }
}

/// Validator over a flat directory of `<SchemaName>.json` files.
#[derive(Debug, Clone)]
pub struct SchemaStore {
    schema_dir: PathBuf,
}

impl SchemaStore {
    /// Create a store over `schema_dir`. The directory is not scanned up
    /// front; files are read when a validation call names them.
    pub fn new(schema_dir: impl AsRef<Path>) -> Self {
        Self {
            schema_dir: schema_dir.as_ref().to_path_buf(),
        }
    }

    /// The configured schema directory.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Load `<schema_name>.json`, compile it with directory-local `$ref`
    /// resolution, and validate `instance` against it.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::SchemaNotFound`] / [`SchemaError::SchemaMalformed`] /
    ///   [`SchemaError::CompileFailed`] when the schema itself is unusable.
    /// - [`SchemaError::ValidationFailed`] with the full violation list when
    ///   the instance does not conform.
    pub fn validate(&self, instance: &Value, schema_name: &str) -> Result<(), SchemaError> {
        let path = self.schema_dir.join(format!("{schema_name}.json"));
        let content = std::fs::read_to_string(&path).map_err(|e| SchemaError::SchemaNotFound {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let schema: Value =
            serde_json::from_str(&content).map_err(|e| SchemaError::SchemaMalformed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let mut opts = jsonschema::options();
        opts.with_retriever(DirRetriever {
            schema_dir: self.schema_dir.clone(),
        });
        let validator = opts.build(&schema).map_err(|e| SchemaError::CompileFailed {
            schema_name: schema_name.to_string(),
            reason: e.to_string(),
        })?;

        let violations: Vec<Violation> = validator
            .iter_errors(instance)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed {
                schema_name: schema_name.to_string(),
                violations: Violations { violations },
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_schema(dir: &Path, name: &str, schema: &Value) {
        let text = serde_json::to_string_pretty(schema).unwrap();
        std::fs::write(dir.join(format!("{name}.json")), text).unwrap();
    }

    fn drs_object_schema() -> Value {
        json!({
            "type": "object",
            "required": ["id", "size"],
            "properties": {
                "id": { "type": "string" },
                "size": { "type": "integer" }
            }
        })
    }

    #[test]
    fn valid_instance_passes() {
        let dir = tempfile::tempdir().unwrap();
        write_schema(dir.path(), "DrsObject", &drs_object_schema());

        let store = SchemaStore::new(dir.path());
        let instance = json!({ "id": "abc123", "size": 10 });
        store.validate(&instance, "DrsObject").unwrap();
    }

    #[test]
    fn invalid_instance_reports_violations() {
        let dir = tempfile::tempdir().unwrap();
        write_schema(dir.path(), "DrsObject", &drs_object_schema());

        let store = SchemaStore::new(dir.path());
        let instance = json!({ "id": 123 });
        let err = store.validate(&instance, "DrsObject").unwrap_err();
        match err {
            SchemaError::ValidationFailed { schema_name, violations } => {
                assert_eq!(schema_name, "DrsObject");
                assert!(!violations.is_empty());
                let detail = violations.to_string();
                assert!(
                    detail.contains("size") || detail.contains("id"),
                    "violation detail should name a field: {detail}"
                );
            }
            other => panic!("expected ValidationFailed, got: {other}"),
        }
    }

    #[test]
    fn missing_schema_file_is_schema_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = SchemaStore::new(dir.path());
        let err = store.validate(&json!({}), "Nonexistent").unwrap_err();
        assert!(matches!(err, SchemaError::SchemaNotFound { .. }));
    }

    #[test]
    fn malformed_schema_file_is_schema_malformed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Broken.json"), "{ not json").unwrap();
        let store = SchemaStore::new(dir.path());
        let err = store.validate(&json!({}), "Broken").unwrap_err();
        assert!(matches!(err, SchemaError::SchemaMalformed { .. }));
    }

    #[test]
    fn cross_file_ref_resolves_against_schema_dir() {
        let dir = tempfile::tempdir().unwrap();
        write_schema(
            dir.path(),
            "Error",
            &json!({
                "type": "object",
                "required": ["status_code", "msg"],
                "properties": {
                    "status_code": { "type": "integer" },
                    "msg": { "$ref": "Message.json" }
                }
            }),
        );
        write_schema(dir.path(), "Message", &json!({ "type": "string" }));

        let store = SchemaStore::new(dir.path());
        store
            .validate(&json!({ "status_code": 404, "msg": "not found" }), "Error")
            .unwrap();

        let err = store
            .validate(&json!({ "status_code": 404, "msg": 7 }), "Error")
            .unwrap_err();
        assert!(matches!(err, SchemaError::ValidationFailed { .. }));
    }

    #[test]
    fn unresolvable_ref_is_compile_failure() {
        let dir = tempfile::tempdir().unwrap();
        write_schema(
            dir.path(),
            "Dangling",
            &json!({ "$ref": "DoesNotExist.json" }),
        );
        let store = SchemaStore::new(dir.path());
        let err = store.validate(&json!({}), "Dangling").unwrap_err();
        assert!(matches!(err, SchemaError::CompileFailed { .. }));
    }

    #[test]
    fn schema_edits_are_picked_up_between_calls() {
        // No caching: tightening the schema on disk changes the verdict.
        let dir = tempfile::tempdir().unwrap();
        write_schema(dir.path(), "DrsObject", &json!({ "type": "object" }));

        let store = SchemaStore::new(dir.path());
        let instance = json!({ "id": "x" });
        store.validate(&instance, "DrsObject").unwrap();

        write_schema(
            dir.path(),
            "DrsObject",
            &json!({ "type": "object", "required": ["size"] }),
        );
        let err = store.validate(&instance, "DrsObject").unwrap_err();
        assert!(matches!(err, SchemaError::ValidationFailed { .. }));
    }

    #[test]
    fn violation_display_names_instance_path() {
        let v = Violation {
            instance_path: "/size".to_string(),
            schema_path: "/properties/size/type".to_string(),
            message: r#""ten" is not of type "integer""#.to_string(),
        };
        let display = v.to_string();
        assert!(display.contains("/size"));
        assert!(display.contains("is not of type"));
    }

    #[test]
    fn violation_display_root() {
        let v = Violation {
            instance_path: String::new(),
            schema_path: "/required".to_string(),
            message: r#""id" is a required property"#.to_string(),
        };
        assert!(v.to_string().contains("(root)"));
    }
}
