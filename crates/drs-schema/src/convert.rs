//! # YAML→JSON Schema Conversion
//!
//! The DRS schema sources are authored in YAML, but JSON Schema tooling
//! resolves `$ref`s by filename and does not understand YAML. This module
//! converts every YAML file in a directory to pretty-printed JSON and
//! rewrites reference strings that point at YAML files (`Object.yaml`,
//! `Object.yaml#/definitions/X`) to point at their JSON counterparts.
//!
//! The rewrite is suffix-scoped: only strings that end in a YAML extension,
//! or carry one immediately before a `#` fragment, are touched. Prose that
//! merely mentions ".yaml" mid-sentence is left alone.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::store::SchemaError;

/// Convert every `*.yaml`/`*.yml` file in `input_dir` to `<stem>.json` in
/// `out_dir`, creating `out_dir` if needed. Returns the written paths.
///
/// # Errors
///
/// Returns [`SchemaError::SchemaMalformed`] for YAML that does not parse or
/// does not map onto JSON (non-string map keys, non-finite floats), and
/// [`SchemaError::Io`] for directory or file IO failures.
pub fn convert_dir(input_dir: &Path, out_dir: &Path) -> Result<Vec<PathBuf>, SchemaError> {
    std::fs::create_dir_all(out_dir)?;

    let mut sources: Vec<PathBuf> = std::fs::read_dir(input_dir)?
        .filter_map(|e| e.ok().map(|x| x.path()))
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e == "yaml" || e == "yml")
        })
        .collect();
    sources.sort();

    let mut written = Vec::with_capacity(sources.len());
    for source in sources {
        written.push(convert_file(&source, out_dir)?);
    }
    Ok(written)
}

/// Convert one YAML schema file, returning the output path.
fn convert_file(yaml_path: &Path, out_dir: &Path) -> Result<PathBuf, SchemaError> {
    let content = std::fs::read_to_string(yaml_path)?;
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(&content).map_err(|e| SchemaError::SchemaMalformed {
            path: yaml_path.display().to_string(),
            reason: format!("invalid YAML: {e}"),
        })?;
    let mut json = yaml_to_json_value(&yaml).map_err(|reason| SchemaError::SchemaMalformed {
        path: yaml_path.display().to_string(),
        reason,
    })?;
    rewrite_yaml_refs(&mut json);

    let stem = yaml_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("schema");
    let out_path = out_dir.join(format!("{stem}.json"));
    let mut text = serde_json::to_string_pretty(&json).map_err(|e| SchemaError::SchemaMalformed {
        path: yaml_path.display().to_string(),
        reason: format!("JSON serialization failed: {e}"),
    })?;
    text.push('\n');
    std::fs::write(&out_path, text)?;
    Ok(out_path)
}

/// Rewrite every string in the document whose YAML extension would defeat
/// JSON `$ref` resolution: `X.yaml` → `X.json`, `X.yaml#/frag` → `X.json#/frag`
/// (and the `.yml` spellings).
fn rewrite_yaml_refs(value: &mut Value) {
    match value {
        Value::String(s) => {
            if let Some(rewritten) = rewrite_ref_string(s) {
                *s = rewritten;
            }
        }
        Value::Array(items) => {
            for item in items {
                rewrite_yaml_refs(item);
            }
        }
        Value::Object(map) => {
            for (_, v) in map.iter_mut() {
                rewrite_yaml_refs(v);
            }
        }
        _ => {}
    }
}

fn rewrite_ref_string(s: &str) -> Option<String> {
    for ext in [".yaml", ".yml"] {
        if let Some(stripped) = s.strip_suffix(ext) {
            return Some(format!("{stripped}.json"));
        }
        let marker = format!("{ext}#");
        if let Some(pos) = s.find(&marker) {
            let (file, fragment) = s.split_at(pos);
            return Some(format!("{file}.json{}", &fragment[ext.len()..]));
        }
    }
    None
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// Schema sources use only the JSON-compatible subset of YAML; tags are
/// unwrapped, and anything without a JSON representation is an error.
fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(serde_json::Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(serde_json::Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let items: Result<Vec<Value>, String> = seq.iter().map(yaml_to_json_value).collect();
            Ok(Value::Array(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key type: {other:?}")),
                };
                json_map.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}
