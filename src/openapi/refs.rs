//! `$ref` resolution
//!
//! Local JSON pointers (`#/components/schemas/X`) and relative file references
//! (`./common.yaml#/Error`) are inlined recursively. Each file is parsed once. A reference that
//! is already being resolved higher up the walk (a recursive schema) is left in place as a
//! `$ref` object. Remote (`http://`, `https://`) references are never fetched.

use crate::core::error::{DocsError, DocsResult, ResultExt};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};

type RefKey = (PathBuf, String);

/// Resolves references across one or more document files
#[derive(Debug, Default)]
pub struct RefResolver {
  documents: HashMap<PathBuf, Value>,
}

impl RefResolver {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of distinct files parsed so far
  pub fn loaded_files(&self) -> usize {
    self.documents.len()
  }

  /// Load `path` and return it with every reachable reference inlined
  pub fn resolve_file(&mut self, path: &Path) -> DocsResult<Value> {
    let path = path
      .canonicalize()
      .with_context(|| format!("Failed to read {}", path.display()))?;
    let root = self.document(&path)?.clone();
    let mut stack = Vec::new();
    self.resolve_value(&root, &path, &mut stack)
  }

  fn document(&mut self, path: &Path) -> DocsResult<&Value> {
    match self.documents.entry(path.to_path_buf()) {
      Entry::Occupied(entry) => Ok(entry.into_mut()),
      Entry::Vacant(entry) => {
        tracing::trace!(path = %path.display(), "parsing referenced document");
        let value = super::parse_file(path)?;
        Ok(entry.insert(value))
      }
    }
  }

  fn resolve_value(&mut self, value: &Value, base: &Path, stack: &mut Vec<RefKey>) -> DocsResult<Value> {
    match value {
      Value::Object(map) => {
        if let Some(Value::String(reference)) = map.get("$ref") {
          return self.resolve_ref(reference, map, base, stack);
        }
        let mut out = Map::with_capacity(map.len());
        for (key, child) in map {
          out.insert(key.clone(), self.resolve_value(child, base, stack)?);
        }
        Ok(Value::Object(out))
      }
      Value::Array(items) => items
        .iter()
        .map(|item| self.resolve_value(item, base, stack))
        .collect::<DocsResult<Vec<_>>>()
        .map(Value::Array),
      other => Ok(other.clone()),
    }
  }

  fn resolve_ref(
    &mut self,
    reference: &str,
    node: &Map<String, Value>,
    base: &Path,
    stack: &mut Vec<RefKey>,
  ) -> DocsResult<Value> {
    let (file_part, fragment) = reference.split_once('#').unwrap_or((reference, ""));

    if is_remote(file_part) {
      tracing::warn!(reference, "remote $ref is not fetched");
      return Ok(Value::Object(node.clone()));
    }

    let target = if file_part.is_empty() {
      base.to_path_buf()
    } else {
      base
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(file_part)
        .canonicalize()
        .map_err(|_| unresolvable(reference, base, "file not found"))?
    };

    let pointer = percent_decode(fragment);
    let key = (target.clone(), pointer.clone());
    if stack.contains(&key) {
      tracing::trace!(reference, "recursive $ref left in place");
      return Ok(Value::Object(node.clone()));
    }

    let raw = {
      let document = self.document(&target)?;
      if pointer.is_empty() {
        document.clone()
      } else {
        document
          .pointer(&pointer)
          .cloned()
          .ok_or_else(|| unresolvable(reference, base, "pointer does not exist"))?
      }
    };

    stack.push(key);
    let resolved = self.resolve_value(&raw, &target, stack);
    stack.pop();
    let mut resolved = resolved?;

    // Keys next to `$ref` override the referenced object's keys
    if let Value::Object(target_map) = &mut resolved {
      for (key, sibling) in node.iter().filter(|(key, _)| key.as_str() != "$ref") {
        let sibling = self.resolve_value(sibling, base, stack)?;
        target_map.insert(key.clone(), sibling);
      }
    }

    Ok(resolved)
  }
}

fn is_remote(file_part: &str) -> bool {
  file_part.starts_with("http://") || file_part.starts_with("https://")
}

fn unresolvable(reference: &str, base: &Path, reason: &str) -> DocsError {
  DocsError::message(format!(
    "Unresolvable $ref '{}' in {}: {}",
    reference,
    base.display(),
    reason
  ))
}

/// Decode `%XX` escapes in a URI fragment; malformed escapes are kept verbatim
fn percent_decode(fragment: &str) -> String {
  let bytes = fragment.as_bytes();
  let mut out = Vec::with_capacity(bytes.len());
  let mut i = 0;
  while i < bytes.len() {
    if bytes[i] == b'%'
      && let Some(hex) = fragment.get(i + 1..i + 3)
      && let Ok(byte) = u8::from_str_radix(hex, 16)
    {
      out.push(byte);
      i += 3;
      continue;
    }
    out.push(bytes[i]);
    i += 1;
  }
  String::from_utf8_lossy(&out).to_string()
}
