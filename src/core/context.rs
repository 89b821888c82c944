//! Project context - build once, pass everywhere
//!
//! `main` resolves the project root, loads `docgate.toml` and settles the colour mode exactly
//! once. Commands and checks receive `&DocsContext` and never read ambient globals.

use crate::core::config::DocsConfig;
use crate::core::error::DocsResult;
use crate::ui::Painter;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct DocsContext {
  /// Project root (where mkdocs.yml lives); every relative path resolves against it
  pub root: PathBuf,

  pub config: DocsConfig,

  pub painter: Painter,
}

impl DocsContext {
  /// Build context from a root directory and an optional explicit config file
  pub fn build(root: &Path, config_path: Option<&Path>, painter: Painter) -> DocsResult<Self> {
    let config = DocsConfig::load(root, config_path)?;
    Ok(Self::with_config(root, config, painter))
  }

  /// Context with a given config (tests, in-process reuse)
  pub fn with_config(root: &Path, config: DocsConfig, painter: Painter) -> Self {
    Self {
      root: root.to_path_buf(),
      config,
      painter,
    }
  }

  /// Resolve a configured path against the project root
  pub fn resolve(&self, path: &Path) -> PathBuf {
    if path.is_absolute() {
      path.to_path_buf()
    } else {
      self.root.join(path)
    }
  }

  pub fn site_dir(&self) -> PathBuf {
    self.resolve(&self.config.paths.site_dir)
  }

  pub fn dist_dir(&self) -> PathBuf {
    self.resolve(&self.config.paths.dist_dir)
  }

  pub fn docs_dir(&self) -> PathBuf {
    self.resolve(&self.config.paths.docs_dir)
  }

  pub fn openapi_path(&self) -> PathBuf {
    self.resolve(&self.config.paths.openapi)
  }

  /// mkdocs command resolved for this root
  pub fn mkdocs(&self) -> Vec<String> {
    self.config.tools.mkdocs_command(&self.root)
  }
}
