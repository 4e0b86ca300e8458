//! # Convert CLI — Turn YAML schema sources into JSON.
//!
//! Provides the `drs convert-schemas` subcommand. The GA4GH schema
//! sources ship as YAML with `$ref`s pointing at sibling `.yaml`
//! files; the validator consumes JSON, so this rewrites each document
//! and its refs in one pass.
//!
//! ## Usage
//!
//! ```bash
//! drs convert-schemas --input_dir schemas/yaml --outdir schemas/json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use drs_schema::convert_dir;

/// Convert-schemas subcommand arguments.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Directory containing `.yaml`/`.yml` schema sources.
    #[arg(long = "input_dir", short = 'd')]
    pub input_dir: PathBuf,

    /// Output directory for the converted `.json` schemas.
    /// Defaults to the input directory.
    #[arg(long)]
    pub outdir: Option<PathBuf>,
}

/// Execute the convert-schemas subcommand.
pub fn run_convert(args: &ConvertArgs) -> Result<u8> {
    let out_dir = args.outdir.as_ref().unwrap_or(&args.input_dir);
    let written = convert_dir(&args.input_dir, out_dir).with_context(|| {
        format!(
            "failed to convert schemas from {}",
            args.input_dir.display()
        )
    })?;

    for path in &written {
        println!("wrote {}", path.display());
    }
    tracing::info!(count = written.len(), "converted schemas");
    Ok(0)
}
