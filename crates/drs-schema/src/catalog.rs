//! # Schema Catalog
//!
//! Maps observed HTTP status codes to the logical schema name the response
//! body must conform to. The DRS object-retrieval endpoint answers with a
//! `DrsObject` document on 200 and an `Error` document on every expected
//! failure status.
//!
//! ## Partition Invariant
//!
//! The status-code sets of the catalog entries are pairwise disjoint and
//! their union covers every status code the harness expects to encounter.
//! Overlap is rejected at construction; a lookup outside the union surfaces
//! as [`SchemaError::UnmappedStatus`] rather than falling back to an
//! implicit first match.

use crate::store::SchemaError;

/// Reverse-lookup table from HTTP status code to schema name.
///
/// Entries are `(schema_name, status_codes)`. The built-in catalog has two
/// entries; custom catalogs (e.g. for a server that adds 410) can be built
/// with [`SchemaCatalog::new`].
#[derive(Debug, Clone)]
pub struct SchemaCatalog {
    entries: Vec<(String, Vec<u16>)>,
}

impl SchemaCatalog {
    /// Build a catalog from `(schema_name, status_codes)` pairs, enforcing
    /// the partition invariant.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::CatalogOverlap`] if any status code appears
    /// under more than one schema name.
    pub fn new(entries: Vec<(String, Vec<u16>)>) -> Result<Self, SchemaError> {
        for (i, (name_a, codes_a)) in entries.iter().enumerate() {
            for (name_b, codes_b) in entries.iter().skip(i + 1) {
                if let Some(code) = codes_a.iter().find(|c| codes_b.contains(c)) {
                    return Err(SchemaError::CatalogOverlap {
                        status: *code,
                        first: name_a.clone(),
                        second: name_b.clone(),
                    });
                }
            }
        }
        Ok(Self { entries })
    }

    /// The catalog for the DRS object-retrieval endpoint:
    /// 200 → `DrsObject`; 400, 401, 403, 404, 500 → `Error`.
    pub fn builtin() -> Self {
        // The built-in table is disjoint by inspection; `new` re-checks it
        // so a future edit cannot silently break the invariant.
        Self::new(vec![
            ("DrsObject".to_string(), vec![200]),
            ("Error".to_string(), vec![400, 401, 403, 404, 500]),
        ])
        .unwrap_or_else(|e| panic!("built-in schema catalog violates partition invariant: {e}"))
    }

    /// Resolve the schema name implied by an observed status code.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnmappedStatus`] when no entry claims the
    /// status code.
    pub fn schema_for_status(&self, status: u16) -> Result<&str, SchemaError> {
        self.entries
            .iter()
            .find(|(_, codes)| codes.contains(&status))
            .map(|(name, _)| name.as_str())
            .ok_or(SchemaError::UnmappedStatus { status })
    }

    /// All status codes the catalog covers, in entry order.
    pub fn covered_statuses(&self) -> Vec<u16> {
        self.entries
            .iter()
            .flat_map(|(_, codes)| codes.iter().copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_maps_200_to_drs_object() {
        let catalog = SchemaCatalog::builtin();
        assert_eq!(catalog.schema_for_status(200).unwrap(), "DrsObject");
    }

    #[test]
    fn builtin_maps_error_statuses_to_error() {
        let catalog = SchemaCatalog::builtin();
        for status in [400, 401, 403, 404, 500] {
            assert_eq!(
                catalog.schema_for_status(status).unwrap(),
                "Error",
                "status {status} must map to Error"
            );
        }
    }

    #[test]
    fn builtin_is_exhaustive_and_exclusive_over_expected_codes() {
        let catalog = SchemaCatalog::builtin();
        let covered = catalog.covered_statuses();
        for status in [200, 400, 401, 403, 404, 500] {
            assert_eq!(
                covered.iter().filter(|&&c| c == status).count(),
                1,
                "status {status} must appear exactly once"
            );
        }
    }

    #[test]
    fn unmapped_status_is_an_error() {
        let catalog = SchemaCatalog::builtin();
        let err = catalog.schema_for_status(418).unwrap_err();
        assert!(matches!(err, SchemaError::UnmappedStatus { status: 418 }));
    }

    #[test]
    fn overlapping_entries_rejected_at_construction() {
        let err = SchemaCatalog::new(vec![
            ("A".to_string(), vec![200, 404]),
            ("B".to_string(), vec![404]),
        ])
        .unwrap_err();
        match err {
            SchemaError::CatalogOverlap { status, first, second } => {
                assert_eq!(status, 404);
                assert_eq!(first, "A");
                assert_eq!(second, "B");
            }
            other => panic!("expected CatalogOverlap, got: {other}"),
        }
    }

    #[test]
    fn custom_catalog_lookup() {
        let catalog = SchemaCatalog::new(vec![
            ("Thing".to_string(), vec![200, 201]),
            ("Error".to_string(), vec![500]),
        ])
        .unwrap();
        assert_eq!(catalog.schema_for_status(201).unwrap(), "Thing");
        assert_eq!(catalog.schema_for_status(500).unwrap(), "Error");
    }
}
