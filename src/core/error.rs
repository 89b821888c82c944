//! Error types for docgate with contextual messages and exit codes
//!
//! Every failure mode of the pipeline lands in one of a few categories: an external tool is
//! missing, ran and failed, or ran too long; an input/output artifact is absent; the config is
//! invalid; or something unexpected happened. Each variant carries enough to print a useful
//! help line.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Exit codes for docgate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// Validation failed, or a tool/resource/config error stopped a command
  Failure = 1,
  /// System error (I/O, process supervision)
  System = 2,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for docgate
#[derive(Debug)]
pub enum DocsError {
  /// Configuration errors
  Config(ConfigError),

  /// External tool errors
  Tool(ToolError),

  /// Expected artifact missing
  Resource(ResourceError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl DocsError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    DocsError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    DocsError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Shorthand for a missing executable
  pub fn tool_not_found(program: impl Into<String>) -> Self {
    DocsError::Tool(ToolError::NotFound {
      program: program.into(),
    })
  }

  /// Shorthand for a missing artifact
  pub fn missing(what: impl Into<String>, path: impl Into<PathBuf>) -> Self {
    DocsError::Resource(ResourceError::Missing {
      what: what.into(),
      path: path.into(),
    })
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      DocsError::Message { message, context, help } => DocsError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      DocsError::Io(err) => DocsError::Message {
        message: format!("{}: {}", ctx_str, err),
        context: None,
        help: None,
      },
      _ => self,
    }
  }

  /// Whether this error means the external executable could not be found
  pub fn is_tool_missing(&self) -> bool {
    matches!(self, DocsError::Tool(ToolError::NotFound { .. }))
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      DocsError::Config(_) => ExitCode::Failure,
      DocsError::Tool(_) => ExitCode::Failure,
      DocsError::Resource(_) => ExitCode::Failure,
      DocsError::Io(_) => ExitCode::System,
      DocsError::Message { .. } => ExitCode::Failure,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      DocsError::Config(e) => e.help_message(),
      DocsError::Tool(e) => e.help_message(),
      DocsError::Resource(e) => e.help_message(),
      DocsError::Message { help, .. } => help.clone(),
      DocsError::Io(_) => None,
    }
  }
}

impl fmt::Display for DocsError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DocsError::Config(e) => write!(f, "{}", e),
      DocsError::Tool(e) => write!(f, "{}", e),
      DocsError::Resource(e) => write!(f, "{}", e),
      DocsError::Io(e) => write!(f, "I/O error: {}", e),
      DocsError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for DocsError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      DocsError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for DocsError {
  fn from(err: io::Error) -> Self {
    DocsError::Io(err)
  }
}

impl From<String> for DocsError {
  fn from(msg: String) -> Self {
    DocsError::message(msg)
  }
}

impl From<&str> for DocsError {
  fn from(msg: &str) -> Self {
    DocsError::message(msg)
  }
}

impl From<toml_edit::de::Error> for DocsError {
  fn from(err: toml_edit::de::Error) -> Self {
    DocsError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for DocsError {
  fn from(err: serde_json::Error) -> Self {
    DocsError::message(format!("JSON error: {}", err))
  }
}

#[cfg(feature = "openapi")]
impl From<serde_yaml::Error> for DocsError {
  fn from(err: serde_yaml::Error) -> Self {
    DocsError::message(format!("YAML error: {}", err))
  }
}

impl From<reqwest::Error> for DocsError {
  fn from(err: reqwest::Error) -> Self {
    DocsError::message(format!("HTTP error: {}", err))
  }
}

impl From<glob::PatternError> for DocsError {
  fn from(err: glob::PatternError) -> Self {
    DocsError::message(format!("Invalid glob pattern: {}", err))
  }
}

impl From<glob::GlobError> for DocsError {
  fn from(err: glob::GlobError) -> Self {
    DocsError::message(format!("File discovery error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// Explicit --config path does not exist
  NotFound { path: PathBuf },

  /// Field present but unusable
  InvalidField { field: String, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => {
        Some("Drop the --config flag to use docgate.toml discovery, or fix the path.".to_string())
      }
      ConfigError::InvalidField { field, .. } => Some(format!(
        "Fix or remove `{}` in docgate.toml; every field has a working default.",
        field
      )),
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { path } => {
        write!(f, "Config file not found: {}", path.display())
      }
      ConfigError::InvalidField { field, reason } => {
        write!(f, "Invalid config field `{}`: {}", field, reason)
      }
    }
  }
}

/// External tool errors
#[derive(Debug)]
pub enum ToolError {
  /// Executable not on the search path
  NotFound { program: String },

  /// Tool ran and signalled failure through its exit status
  NonZeroExit {
    command: String,
    code: Option<i32>,
    output: String,
  },

  /// Bounded wait exceeded
  Timeout { what: String, after: Duration },
}

impl ToolError {
  fn help_message(&self) -> Option<String> {
    match self {
      ToolError::NotFound { program } => Some(match program.as_str() {
        "npx" => "Install Node.js (npx ships with npm), then run `npm install`.".to_string(),
        "mkdocs" => "Install MkDocs into .venv: `python -m venv .venv && .venv/bin/pip install mkdocs`.".to_string(),
        "vale" => "Install Vale from https://vale.sh/docs/install.".to_string(),
        "pre-commit" => "Install pre-commit: `pip install pre-commit`.".to_string(),
        "chromium" => "Install Chromium or Google Chrome, or set `tools.browser` in docgate.toml.".to_string(),
        _ => format!("Make sure `{}` is installed and on PATH, or set it in docgate.toml [tools].", program),
      }),
      ToolError::Timeout { .. } => Some("Re-run with -v to see what the tool was waiting on.".to_string()),
      ToolError::NonZeroExit { .. } => None,
    }
  }
}

impl fmt::Display for ToolError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ToolError::NotFound { program } => write!(f, "Tool not found: {}", program),
      ToolError::NonZeroExit { command, code, output } => {
        match code {
          Some(code) => write!(f, "`{}` exited with code {}", command, code)?,
          None => write!(f, "`{}` was terminated by a signal", command)?,
        }
        let output = output.trim();
        if !output.is_empty() {
          write!(f, "\n{}", output)?;
        }
        Ok(())
      }
      ToolError::Timeout { what, after } => {
        write!(f, "{} timed out after {:.1}s", what, after.as_secs_f64())
      }
    }
  }
}

/// Missing artifact errors
#[derive(Debug)]
pub enum ResourceError {
  Missing { what: String, path: PathBuf },
}

impl ResourceError {
  fn help_message(&self) -> Option<String> {
    match self {
      ResourceError::Missing { what, .. } if what.to_lowercase().contains("print") => {
        Some("Enable the mkdocs-print-site-plugin (or similar) so the site contains a print page.".to_string())
      }
      ResourceError::Missing { .. } => None,
    }
  }
}

impl fmt::Display for ResourceError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ResourceError::Missing { what, path } => write!(f, "{} not found: {}", what, path.display()),
    }
  }
}

/// Result type alias for docgate
pub type DocsResult<T> = Result<T, DocsError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> DocsResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> DocsResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<DocsError>,
{
  fn context(self, ctx: impl Into<String>) -> DocsResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> DocsResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &DocsError) {
  eprintln!("\n[-] {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("Help: {}\n", help);
  }
}
