//! # drs-cli — Command-Line Driver for the DRS Conformance Harness
//!
//! Provides the `drs` binary with two subcommands:
//!
//! - `drs check` — run the endpoint check suite from a comma-separated
//!   input file of test cases.
//! - `drs convert-schemas` — convert a directory of YAML schema sources
//!   to JSON, rewriting YAML-extension `$ref`s along the way.
//!
//! ## Usage
//!
//! ```bash
//! drs convert-schemas --input_dir schemas/yaml --outdir schemas/json
//! drs check --schema_dir schemas/json \
//!           --base_url http://localhost:5000/ga4gh/drs/v1/objects/ \
//!           --input_file cases.csv
//! ```
//!
//! Flag spellings (`--schema_dir`, `--base_url`, `--input_file`,
//! `--input_dir`, `--outdir`) match the existing harness invocations so
//! CI pipelines keep working unchanged.

pub mod check;
pub mod convert;
