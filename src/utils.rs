//! Utility functions for cross-platform path handling

use crate::core::error::DocsResult;
use std::path::{Path, PathBuf};

/// All Markdown files below `dir`, recursively, in sorted order
///
/// A missing directory yields an empty list.
pub fn find_markdown_files(dir: &Path) -> DocsResult<Vec<PathBuf>> {
  if !dir.is_dir() {
    return Ok(Vec::new());
  }

  // Escape the directory part so brackets or stars in it are matched literally
  let pattern = format!("{}/**/*.md", glob::Pattern::escape(&dir.to_string_lossy()));
  let mut files = Vec::new();
  for entry in glob::glob(&pattern)? {
    let path = entry?;
    if path.is_file() {
      files.push(path);
    }
  }
  files.sort();
  Ok(files)
}

/// `path` relative to `base`, or `path` unchanged when no relative form exists
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
  pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

/// Path rendered with forward slashes, as tools and reports expect on every platform
pub fn display_posix(path: &Path) -> String {
  path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::TempDir;

  #[test]
  fn test_find_markdown_files_recursive_and_sorted() {
    let temp = TempDir::new().unwrap();
    let docs = temp.path().join("docs");
    fs::create_dir_all(docs.join("api").join("v1")).unwrap();
    fs::write(docs.join("index.md"), "# Home").unwrap();
    fs::write(docs.join("api").join("v1").join("meters.md"), "# Meters").unwrap();
    fs::write(docs.join("api").join("overview.md"), "# API").unwrap();
    fs::write(docs.join("logo.png"), "").unwrap();

    let files: Vec<_> = find_markdown_files(&docs)
      .unwrap()
      .iter()
      .map(|p| display_posix(&relative_to(p, temp.path())))
      .collect();
    assert_eq!(files, vec!["docs/api/overview.md", "docs/api/v1/meters.md", "docs/index.md"]);
  }

  #[test]
  fn test_missing_dir_is_empty() {
    let temp = TempDir::new().unwrap();
    assert!(find_markdown_files(&temp.path().join("docs")).unwrap().is_empty());
  }

  #[test]
  fn test_glob_metacharacters_in_dir_are_literal() {
    let temp = TempDir::new().unwrap();
    let docs = temp.path().join("docs [draft]");
    fs::create_dir_all(&docs).unwrap();
    fs::write(docs.join("a.md"), "").unwrap();
    assert_eq!(find_markdown_files(&docs).unwrap().len(), 1);
  }

  #[test]
  fn test_relative_to() {
    assert_eq!(
      relative_to(Path::new("/repo/docs/index.md"), Path::new("/repo")),
      PathBuf::from("docs/index.md")
    );
    assert_eq!(
      relative_to(Path::new("docs/index.md"), Path::new("/repo")),
      PathBuf::from("docs/index.md")
    );
  }
}
