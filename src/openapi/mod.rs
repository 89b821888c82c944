//! OpenAPI document validation
//!
//! Loads a JSON or YAML document, inlines every `$ref` it can reach and checks the resulting
//! tree for the fields an OpenAPI 3.x or Swagger 2.0 document must carry.

mod refs;
mod structure;

pub use refs::RefResolver;
pub use structure::{SpecVersion, check_structure};

use crate::core::error::{DocsError, DocsResult, ResultExt};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// A resolved, structurally valid document
#[derive(Debug, Clone)]
pub struct OpenApiDocument {
  pub path: PathBuf,
  pub version: SpecVersion,
  /// Document with every local and relative-file reference inlined
  pub resolved: Value,
}

/// Operation keys of a path item
const HTTP_METHODS: [&str; 8] = ["get", "put", "post", "delete", "options", "head", "patch", "trace"];

impl OpenApiDocument {
  /// Number of operations declared under `paths`
  pub fn operation_count(&self) -> usize {
    self
      .resolved
      .get("paths")
      .and_then(Value::as_object)
      .map_or(0, |paths| {
        paths
          .values()
          .filter_map(Value::as_object)
          .map(|item| item.keys().filter(|key| HTTP_METHODS.contains(&key.as_str())).count())
          .sum()
      })
  }
}

/// Parse a document file; `.json` is read as JSON, anything else as YAML
pub fn parse_file(path: &Path) -> DocsResult<Value> {
  let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
  let is_json = path
    .extension()
    .and_then(|ext| ext.to_str())
    .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

  let value = if is_json {
    serde_json::from_str::<Value>(&text)
      .map_err(|err| DocsError::message(format!("invalid JSON in {}: {}", path.display(), err)))?
  } else {
    let yaml = serde_yaml::from_str::<serde_yaml::Value>(&text)
      .map_err(|err| DocsError::message(format!("invalid YAML in {}: {}", path.display(), err)))?;
    yaml_to_json(yaml).with_context(|| format!("Unsupported YAML in {}", path.display()))?
  };
  Ok(value)
}

/// Convert YAML to JSON, stringifying scalar mapping keys (`200:` status codes)
fn yaml_to_json(value: serde_yaml::Value) -> DocsResult<Value> {
  use serde_yaml::Value as Yaml;

  Ok(match value {
    Yaml::Null => Value::Null,
    Yaml::Bool(b) => Value::Bool(b),
    Yaml::Number(n) => {
      if let Some(i) = n.as_i64() {
        Value::from(i)
      } else if let Some(u) = n.as_u64() {
        Value::from(u)
      } else {
        n.as_f64()
          .and_then(serde_json::Number::from_f64)
          .map(Value::Number)
          .unwrap_or(Value::Null)
      }
    }
    Yaml::String(s) => Value::String(s),
    Yaml::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect::<DocsResult<_>>()?),
    Yaml::Mapping(mapping) => {
      let mut map = serde_json::Map::with_capacity(mapping.len());
      for (key, child) in mapping {
        let key = match key {
          Yaml::String(s) => s,
          Yaml::Number(n) => n.to_string(),
          Yaml::Bool(b) => b.to_string(),
          other => return Err(DocsError::message(format!("unsupported mapping key {:?}", other))),
        };
        map.insert(key, yaml_to_json(child)?);
      }
      Value::Object(map)
    }
    Yaml::Tagged(tagged) => yaml_to_json(tagged.value)?,
  })
}

/// Resolve and validate the document at `path`
pub fn validate_file(path: &Path) -> DocsResult<OpenApiDocument> {
  let mut resolver = RefResolver::new();
  let resolved = resolver.resolve_file(path)?;
  tracing::debug!(
    path = %path.display(),
    files = resolver.loaded_files(),
    "OpenAPI references resolved"
  );

  let version = check_structure(&resolved).map_err(|problems| {
    DocsError::message(format!(
      "{} is not a valid OpenAPI document:\n{}",
      path.display(),
      problems
        .iter()
        .map(|problem| format!("  - {}", problem))
        .collect::<Vec<_>>()
        .join("\n")
    ))
  })?;

  Ok(OpenApiDocument {
    path: path.to_path_buf(),
    version,
    resolved,
  })
}
