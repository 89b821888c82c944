use crate::core::error::{ConfigError, DocsError, DocsResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for docgate
/// Searched in order: docgate.toml, .docgate.toml, .config/docgate.toml
///
/// Every section is optional. An empty file (or no file at all) reproduces the defaults the
/// pipeline has always used: `docs/`, `site/`, `dist/`, `openapi/api.yaml`, and a doc server on
/// 127.0.0.1:8000.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DocsConfig {
  #[serde(default)]
  pub paths: PathsConfig,
  #[serde(default)]
  pub tools: ToolsConfig,
  #[serde(default)]
  pub server: ServerConfig,
  #[serde(default)]
  pub links: LinksConfig,
  #[serde(default)]
  pub build: BuildConfig,
  #[serde(default)]
  pub pdf: PdfConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
  /// Markdown sources checked by the style linter
  #[serde(default = "default_docs_dir")]
  pub docs_dir: PathBuf,

  /// Output of `mkdocs build` during validation
  #[serde(default = "default_site_dir")]
  pub site_dir: PathBuf,

  /// Output of the production build
  #[serde(default = "default_dist_dir")]
  pub dist_dir: PathBuf,

  /// OpenAPI document validated by the openapi check
  #[serde(default = "default_openapi")]
  pub openapi: PathBuf,
}

fn default_docs_dir() -> PathBuf {
  PathBuf::from("docs")
}

fn default_site_dir() -> PathBuf {
  PathBuf::from("site")
}

fn default_dist_dir() -> PathBuf {
  PathBuf::from("dist")
}

fn default_openapi() -> PathBuf {
  PathBuf::from("openapi").join("api.yaml")
}

impl Default for PathsConfig {
  fn default() -> Self {
    Self {
      docs_dir: default_docs_dir(),
      site_dir: default_site_dir(),
      dist_dir: default_dist_dir(),
      openapi: default_openapi(),
    }
  }
}

/// External tool commands
///
/// Each command is a program followed by leading arguments, e.g. `["npx", "blc"]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
  #[serde(default = "default_markdownlint")]
  pub markdownlint: Vec<String>,

  /// File patterns handed to the markdown linter
  #[serde(default = "default_markdown_globs")]
  pub markdown_globs: Vec<String>,

  /// Unset = prefer the project virtualenv, then PATH
  #[serde(default)]
  pub mkdocs: Option<Vec<String>>,

  #[serde(default = "default_link_checker")]
  pub link_checker: Vec<String>,

  #[serde(default = "default_vale")]
  pub vale: Vec<String>,

  #[serde(default = "default_pre_commit")]
  pub pre_commit: Vec<String>,

  /// Unset = search PATH for a Chromium-family browser
  #[serde(default)]
  pub browser: Option<Vec<String>>,
}

fn default_markdownlint() -> Vec<String> {
  vec!["npx".to_string(), "markdownlint-cli2".to_string()]
}

fn default_markdown_globs() -> Vec<String> {
  vec!["**/*.md".to_string(), "!node_modules".to_string(), "!dist".to_string()]
}

fn default_link_checker() -> Vec<String> {
  vec!["npx".to_string(), "blc".to_string()]
}

fn default_vale() -> Vec<String> {
  vec!["vale".to_string()]
}

fn default_pre_commit() -> Vec<String> {
  vec!["pre-commit".to_string()]
}

impl Default for ToolsConfig {
  fn default() -> Self {
    Self {
      markdownlint: default_markdownlint(),
      markdown_globs: default_markdown_globs(),
      mkdocs: None,
      link_checker: default_link_checker(),
      vale: default_vale(),
      pre_commit: default_pre_commit(),
      browser: None,
    }
  }
}

impl ToolsConfig {
  /// Resolve the mkdocs command for a project root
  ///
  /// An explicit setting wins. Otherwise the project's `.venv` executable is used when it
  /// exists, falling back to whatever `mkdocs` is on PATH.
  pub fn mkdocs_command(&self, root: &Path) -> Vec<String> {
    if let Some(cmd) = &self.mkdocs {
      return cmd.clone();
    }

    let venv = if cfg!(windows) {
      root.join(".venv").join("Scripts").join("mkdocs.exe")
    } else {
      root.join(".venv").join("bin").join("mkdocs")
    };

    if venv.exists() {
      vec![venv.to_string_lossy().to_string()]
    } else {
      vec!["mkdocs".to_string()]
    }
  }
}

/// Local doc server used by the link check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host: String,

  #[serde(default = "default_port")]
  pub port: u16,

  /// Readiness probes before giving up
  #[serde(default = "default_ready_attempts")]
  pub ready_attempts: u32,

  /// Pause between readiness probes
  #[serde(default = "default_ready_interval_ms")]
  pub ready_interval_ms: u64,

  /// Timeout of a single readiness GET
  #[serde(default = "default_probe_timeout_ms")]
  pub probe_timeout_ms: u64,

  /// Grace period after SIGTERM before the server is killed
  #[serde(default = "default_shutdown_timeout_ms")]
  pub shutdown_timeout_ms: u64,
}

fn default_host() -> String {
  "127.0.0.1".to_string()
}

fn default_port() -> u16 {
  8000
}

fn default_ready_attempts() -> u32 {
  20
}

fn default_ready_interval_ms() -> u64 {
  500
}

fn default_probe_timeout_ms() -> u64 {
  2000
}

fn default_shutdown_timeout_ms() -> u64 {
  5000
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host: default_host(),
      port: default_port(),
      ready_attempts: default_ready_attempts(),
      ready_interval_ms: default_ready_interval_ms(),
      probe_timeout_ms: default_probe_timeout_ms(),
      shutdown_timeout_ms: default_shutdown_timeout_ms(),
    }
  }
}

impl ServerConfig {
  /// `HOST:PORT` as passed to `mkdocs serve -a`
  pub fn address(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }

  /// Root URL probed for readiness and handed to the crawler
  pub fn url(&self) -> String {
    format!("http://{}", self.address())
  }

  pub fn ready_interval(&self) -> Duration {
    Duration::from_millis(self.ready_interval_ms)
  }

  pub fn probe_timeout(&self) -> Duration {
    Duration::from_millis(self.probe_timeout_ms)
  }

  pub fn shutdown_timeout(&self) -> Duration {
    Duration::from_millis(self.shutdown_timeout_ms)
  }

  /// Total readiness budget (attempts × interval)
  pub fn ready_budget(&self) -> Duration {
    self.ready_interval() * self.ready_attempts
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
  /// Concurrent requests issued by the crawler
  #[serde(default = "default_requests")]
  pub requests: u32,
}

fn default_requests() -> u32 {
  5
}

impl Default for LinksConfig {
  fn default() -> Self {
    Self {
      requests: default_requests(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
  /// Public URL recorded in BUILD_INFO.md
  #[serde(default = "default_site_url")]
  pub site_url: String,

  /// Repository files copied into the production output
  #[serde(default = "default_extra_files")]
  pub extra_files: Vec<PathBuf>,
}

fn default_site_url() -> String {
  "https://whatwatt.ch".to_string()
}

fn default_extra_files() -> Vec<PathBuf> {
  vec![PathBuf::from("README.md"), PathBuf::from("LICENSE")]
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      site_url: default_site_url(),
      extra_files: default_extra_files(),
    }
  }
}

/// PDF export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfConfig {
  #[serde(default = "default_pdf_output")]
  pub output: PathBuf,

  /// CSS page size keyword (A4, Letter, ...)
  #[serde(default = "default_format")]
  pub format: String,

  #[serde(default)]
  pub margin: MarginConfig,

  /// Extra time after load for scripts (diagrams, search index) to settle
  #[serde(default = "default_settle_ms")]
  pub settle_ms: u64,

  /// Hard limit on the browser run
  #[serde(default = "default_pdf_timeout_secs")]
  pub timeout_secs: u64,

  #[serde(default = "default_true")]
  pub print_background: bool,
}

fn default_pdf_output() -> PathBuf {
  PathBuf::from("whatwatt-go-documentation.pdf")
}

fn default_format() -> String {
  "A4".to_string()
}

fn default_settle_ms() -> u64 {
  3000
}

fn default_pdf_timeout_secs() -> u64 {
  120
}

fn default_true() -> bool {
  true
}

impl Default for PdfConfig {
  fn default() -> Self {
    Self {
      output: default_pdf_output(),
      format: default_format(),
      margin: MarginConfig::default(),
      settle_ms: default_settle_ms(),
      timeout_secs: default_pdf_timeout_secs(),
      print_background: true,
    }
  }
}

impl PdfConfig {
  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }
}

/// Page margins as CSS lengths
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarginConfig {
  #[serde(default = "default_margin_side")]
  pub top: String,
  #[serde(default = "default_margin_side")]
  pub right: String,
  #[serde(default = "default_margin_bottom")]
  pub bottom: String,
  #[serde(default = "default_margin_side")]
  pub left: String,
}

fn default_margin_side() -> String {
  "12mm".to_string()
}

fn default_margin_bottom() -> String {
  "16mm".to_string()
}

impl Default for MarginConfig {
  fn default() -> Self {
    Self {
      top: default_margin_side(),
      right: default_margin_side(),
      bottom: default_margin_bottom(),
      left: default_margin_side(),
    }
  }
}

impl DocsConfig {
  /// Find config file in search order: docgate.toml, .docgate.toml, .config/docgate.toml
  pub fn find_config_path(root: &Path) -> Option<PathBuf> {
    let candidates = [
      root.join("docgate.toml"),
      root.join(".docgate.toml"),
      root.join(".config").join("docgate.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config for a project root
  ///
  /// `explicit` must exist when given. Without it, a missing file means defaults.
  pub fn load(root: &Path, explicit: Option<&Path>) -> DocsResult<Self> {
    let path = match explicit {
      Some(path) => {
        let path = if path.is_absolute() { path.to_path_buf() } else { root.join(path) };
        if !path.exists() {
          return Err(DocsError::Config(ConfigError::NotFound { path }));
        }
        path
      }
      None => match Self::find_config_path(root) {
        Some(path) => path,
        None => {
          tracing::debug!(root = %root.display(), "no docgate.toml found, using defaults");
          return Ok(Self::default());
        }
      },
    };

    tracing::debug!(path = %path.display(), "loading config");
    let content =
      fs::read_to_string(&path).with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config = Self::parse(&content).with_context(|| format!("Failed to parse config from {}", path.display()))?;
    Ok(config)
  }

  /// Parse and validate config text
  pub fn parse(content: &str) -> DocsResult<Self> {
    let config: DocsConfig = toml_edit::de::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  /// Reject settings that would make a check meaningless
  pub fn validate(&self) -> DocsResult<()> {
    let commands = [
      ("tools.markdownlint", Some(&self.tools.markdownlint)),
      ("tools.link_checker", Some(&self.tools.link_checker)),
      ("tools.vale", Some(&self.tools.vale)),
      ("tools.pre_commit", Some(&self.tools.pre_commit)),
      ("tools.mkdocs", self.tools.mkdocs.as_ref()),
      ("tools.browser", self.tools.browser.as_ref()),
    ];
    for (field, command) in commands {
      if let Some(command) = command
        && command.first().is_none_or(|program| program.trim().is_empty())
      {
        return Err(invalid(field, "command must name a program"));
      }
    }

    if self.server.port == 0 {
      return Err(invalid("server.port", "port must be non-zero"));
    }
    if self.server.ready_attempts == 0 {
      return Err(invalid("server.ready_attempts", "at least one readiness probe is required"));
    }
    if self.links.requests == 0 {
      return Err(invalid("links.requests", "crawler concurrency must be at least 1"));
    }
    if self.pdf.timeout_secs == 0 {
      return Err(invalid("pdf.timeout_secs", "timeout must be non-zero"));
    }

    Ok(())
  }
}

fn invalid(field: &str, reason: &str) -> DocsError {
  DocsError::Config(ConfigError::InvalidField {
    field: field.to_string(),
    reason: reason.to_string(),
  })
}

/// Which checks a validation run executes
///
/// Built once from command-line flags and passed by value into the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckSelection {
  pub markdown: bool,
  pub site_build: bool,
  pub openapi: bool,
  pub links: bool,
  pub style: bool,
}

impl Default for CheckSelection {
  fn default() -> Self {
    Self::all()
  }
}

/// Raw skip flags as they arrive from the CLI
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipFlags {
  pub skip_markdown: bool,
  pub skip_mkdocs: bool,
  pub skip_links: bool,
  pub skip_style: bool,
  pub skip_openapi: bool,
  /// Skips both slow checks (links, style)
  pub fast: bool,
}

impl CheckSelection {
  /// Every check enabled
  pub fn all() -> Self {
    Self {
      markdown: true,
      site_build: true,
      openapi: true,
      links: true,
      style: true,
    }
  }

  pub fn from_flags(flags: SkipFlags) -> Self {
    Self {
      markdown: !flags.skip_markdown,
      site_build: !flags.skip_mkdocs,
      openapi: !flags.skip_openapi,
      links: !flags.skip_links && !flags.fast,
      style: !flags.skip_style && !flags.fast,
    }
  }

  /// Number of checks this selection runs
  pub fn enabled_count(&self) -> usize {
    [self.markdown, self.site_build, self.openapi, self.links, self.style]
      .into_iter()
      .filter(|enabled| *enabled)
      .count()
  }
}
