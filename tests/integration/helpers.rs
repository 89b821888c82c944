//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::fs;
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// mkdocs stand-in: `build` writes an index page (and a print page) into the site directory
/// named by `--site-dir`, defaulting to `site`; `serve` exits with `SERVE_EXIT`
pub const FAKE_MKDOCS: &str = r#"echo "$@" >> "$(dirname "$0")/mkdocs.log"
if [ "$1" = "serve" ]; then
  exit SERVE_EXIT
fi
dir=site
prev=""
for arg in "$@"; do
  if [ "$prev" = "--site-dir" ]; then dir="$arg"; fi
  prev="$arg"
done
mkdir -p "$dir/print"
echo '<html><head></head><body>Meters</body></html>' > "$dir/index.html"
cp "$dir/index.html" "$dir/print/index.html"
exit BUILD_EXIT
"#;

/// Chromium stand-in writing a tiny PDF to `--print-to-pdf`
pub const FAKE_BROWSER: &str = r#"for arg in "$@"; do
  case "$arg" in
    --print-to-pdf=*) out="${arg#--print-to-pdf=}" ;;
  esac
done
echo '%PDF-1.4' > "$out"
"#;

/// Minimal OpenAPI 3.0 document with a relative `$ref`
pub const OPENAPI_DOC: &str = r#"openapi: 3.0.3
info:
  title: Meter API
  version: 1.0.0
paths:
  /readings:
    get:
      responses:
        200:
          description: Current readings
          content:
            application/json:
              schema:
                $ref: "schemas.yaml#/Reading"
"#;

pub const OPENAPI_SCHEMAS: &str = r#"Reading:
  type: object
  properties:
    power:
      type: number
"#;

/// A scratch documentation project
pub struct TestProject {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestProject {
  /// Project with docs, an OpenAPI document and every tool faked as passing
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    let project = Self { _root: root, path };
    project.write_file("docs/index.md", "# Home\n")?;
    project.write_file("docs/guide/setup.md", "# Setup\n")?;
    project.write_file("openapi/api.yaml", OPENAPI_DOC)?;
    project.write_file("openapi/schemas.yaml", OPENAPI_SCHEMAS)?;
    project.write_file("README.md", "# Meter docs\n")?;

    project.tool("markdownlint", "exit 0\n")?;
    project.tool("vale", "echo \"$@\" > \"$(dirname \"$0\")/vale.log\"\n")?;
    project.tool("blc", "exit 0\n")?;
    project.tool("pre-commit", "exit 0\n")?;
    project.tool("browser", FAKE_BROWSER)?;
    project.mkdocs(0, 1)?;
    project.write_config(&[])?;

    Ok(project)
  }

  /// Directory holding the fake tools
  pub fn tools_dir(&self) -> PathBuf {
    self.path.join(".tools")
  }

  /// Write (or replace) a fake tool script
  pub fn tool(&self, name: &str, script: &str) -> Result<()> {
    let dir = self.tools_dir();
    fs::create_dir_all(&dir)?;
    fs::write(dir.join(format!("{}.sh", name)), script).with_context(|| format!("Failed to write tool {}", name))?;
    Ok(())
  }

  /// Replace the mkdocs stand-in with the given exit codes
  pub fn mkdocs(&self, build_exit: i32, serve_exit: i32) -> Result<()> {
    let script = FAKE_MKDOCS
      .replace("BUILD_EXIT", &build_exit.to_string())
      .replace("SERVE_EXIT", &serve_exit.to_string());
    self.tool("mkdocs", &script)
  }

  /// `["sh", "<tools>/<name>.sh"]` as a TOML array
  fn command(&self, name: &str) -> String {
    format!("[\"sh\", \"{}\"]", self.tools_dir().join(format!("{}.sh", name)).display())
  }

  /// Write docgate.toml; `overrides` replace whole `tools` entries
  pub fn write_config(&self, overrides: &[(&str, &str)]) -> Result<()> {
    let mut tools = vec![
      ("markdownlint", self.command("markdownlint")),
      ("mkdocs", self.command("mkdocs")),
      ("link_checker", self.command("blc")),
      ("vale", self.command("vale")),
      ("pre_commit", self.command("pre-commit")),
      ("browser", self.command("browser")),
    ];
    for (key, value) in overrides {
      if let Some(entry) = tools.iter_mut().find(|(name, _)| name == key) {
        entry.1 = value.to_string();
      }
    }

    let mut config = String::from("[tools]\n");
    for (key, value) in tools {
      config.push_str(&format!("{} = {}\n", key, value));
    }
    config.push_str(&format!(
      "\n[server]\nport = {}\nready_attempts = 50\nready_interval_ms = 20\n",
      free_port()?
    ));
    config.push_str("\n[pdf]\ntimeout_secs = 10\n");
    self.write_file("docgate.toml", &config)
  }

  /// Write a file relative to the project root
  pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
    let full = self.path.join(path);
    if let Some(parent) = full.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::write(&full, content).with_context(|| format!("Failed to write {}", path))?;
    Ok(())
  }

  /// Remove a file relative to the project root
  pub fn remove_file(&self, path: &str) -> Result<()> {
    fs::remove_file(self.path.join(path)).with_context(|| format!("Failed to remove {}", path))?;
    Ok(())
  }

  /// Check if a file exists
  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }

  /// Read a file
  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(fs::read_to_string(self.path.join(path))?)
  }

  /// Run docgate in the project without colour
  pub fn docgate(&self, args: &[&str]) -> Result<Run> {
    run_docgate(&self.path, args)
  }
}

/// Captured docgate invocation
pub struct Run {
  pub output: Output,
}

impl Run {
  pub fn code(&self) -> Option<i32> {
    self.output.status.code()
  }

  pub fn stdout(&self) -> String {
    String::from_utf8_lossy(&self.output.stdout).to_string()
  }

  /// stdout followed by stderr
  pub fn all(&self) -> String {
    format!("{}{}", self.stdout(), String::from_utf8_lossy(&self.output.stderr))
  }
}

/// Run the docgate CLI; a non-zero exit is not an error here
pub fn run_docgate(cwd: &Path, args: &[&str]) -> Result<Run> {
  let docgate_bin = env!("CARGO_BIN_EXE_docgate");

  let output = Command::new(docgate_bin)
    .current_dir(cwd)
    .args(args)
    .args(["--color", "never"])
    .env_remove("RUST_LOG")
    .output()
    .context("Failed to run docgate")?;

  Ok(Run { output })
}

/// A local port with nothing listening on it
pub fn free_port() -> Result<u16> {
  let listener = TcpListener::bind("127.0.0.1:0")?;
  Ok(listener.local_addr()?.port())
}
