//! Structural checks on a resolved document

use serde_json::{Map, Value};
use std::fmt;

const METHODS: [&str; 8] = ["get", "put", "post", "delete", "options", "head", "patch", "trace"];

/// Specification family a document declares
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecVersion {
  Swagger2,
  /// `openapi: 3.0.x`
  OpenApi30(String),
  /// `openapi: 3.1.x` and later 3.x
  OpenApi31(String),
}

impl SpecVersion {
  fn requires_paths(&self) -> bool {
    !matches!(self, SpecVersion::OpenApi31(_))
  }
}

impl fmt::Display for SpecVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SpecVersion::Swagger2 => write!(f, "2.0"),
      SpecVersion::OpenApi30(v) | SpecVersion::OpenApi31(v) => write!(f, "{}", v),
    }
  }
}

/// Check the skeleton of a resolved document, returning its version or every problem found
pub fn check_structure(doc: &Value) -> Result<SpecVersion, Vec<String>> {
  let Some(root) = doc.as_object() else {
    return Err(vec!["document root must be a mapping".to_string()]);
  };

  let mut problems = Vec::new();
  let version = detect_version(root, &mut problems);
  check_info(root.get("info"), &mut problems);

  if let Some(version) = &version {
    match root.get("paths") {
      Some(Value::Object(paths)) => check_paths(paths, version, &mut problems),
      Some(_) => problems.push("`paths` must be a mapping".to_string()),
      None if version.requires_paths() => problems.push("missing `paths` object".to_string()),
      None => {
        if !root.contains_key("webhooks") && !root.contains_key("components") {
          problems.push(
            "OpenAPI 3.1 documents need at least one of `paths`, `webhooks`, `components`".to_string(),
          );
        }
      }
    }
  }

  match version {
    Some(version) if problems.is_empty() => Ok(version),
    _ => Err(problems),
  }
}

fn detect_version(root: &Map<String, Value>, problems: &mut Vec<String>) -> Option<SpecVersion> {
  if let Some(value) = root.get("openapi") {
    let Some(text) = value.as_str() else {
      problems.push("`openapi` must be a string such as \"3.0.3\"".to_string());
      return None;
    };
    if text.starts_with("3.0") {
      return Some(SpecVersion::OpenApi30(text.to_string()));
    }
    if text.starts_with("3.") {
      return Some(SpecVersion::OpenApi31(text.to_string()));
    }
    problems.push(format!("unsupported OpenAPI version `{}`", text));
    return None;
  }

  match root.get("swagger") {
    Some(Value::String(text)) if text == "2.0" => Some(SpecVersion::Swagger2),
    Some(_) => {
      problems.push("`swagger` must be \"2.0\"".to_string());
      None
    }
    None => {
      problems.push("missing `openapi` or `swagger` version field".to_string());
      None
    }
  }
}

fn check_info(info: Option<&Value>, problems: &mut Vec<String>) {
  let Some(info) = info else {
    problems.push("missing `info` object".to_string());
    return;
  };
  let Some(info) = info.as_object() else {
    problems.push("`info` must be a mapping".to_string());
    return;
  };
  for field in ["title", "version"] {
    match info.get(field) {
      Some(Value::String(_)) => {}
      Some(_) => problems.push(format!("info.{} must be a string", field)),
      None => problems.push(format!("missing info.{}", field)),
    }
  }
}

fn check_paths(paths: &Map<String, Value>, version: &SpecVersion, problems: &mut Vec<String>) {
  for (path, item) in paths {
    // Specification extensions
    if path.starts_with("x-") {
      continue;
    }
    if !path.starts_with('/') {
      problems.push(format!("path `{}` must start with `/`", path));
    }
    let Some(item) = item.as_object() else {
      problems.push(format!("path `{}` must map to a path item", path));
      continue;
    };
    for method in METHODS {
      let Some(operation) = item.get(method) else {
        continue;
      };
      let Some(operation) = operation.as_object() else {
        problems.push(format!("{} {}: operation must be a mapping", method.to_uppercase(), path));
        continue;
      };
      check_responses(path, method, operation.get("responses"), version, problems);
    }
  }
}

fn check_responses(
  path: &str,
  method: &str,
  responses: Option<&Value>,
  version: &SpecVersion,
  problems: &mut Vec<String>,
) {
  let label = format!("{} {}", method.to_uppercase(), path);
  match responses {
    None if version.requires_paths() => problems.push(format!("{}: missing `responses`", label)),
    None => {}
    Some(Value::Object(map)) => {
      if map.is_empty() && version.requires_paths() {
        problems.push(format!("{}: `responses` must declare at least one response", label));
      }
      for code in map.keys() {
        if !is_response_key(code) {
          problems.push(format!("{}: invalid response code `{}`", label, code));
        }
      }
    }
    Some(_) => problems.push(format!("{}: `responses` must be a mapping", label)),
  }
}

/// `default`, a 3-digit status code, a `1XX`-style range, or an extension
fn is_response_key(code: &str) -> bool {
  if code == "default" || code.starts_with("x-") {
    return true;
  }
  let bytes = code.as_bytes();
  bytes.len() == 3
    && (b'1'..=b'5').contains(&bytes[0])
    && bytes[1..]
      .iter()
      .all(|b| b.is_ascii_digit() || *b == b'X')
}
