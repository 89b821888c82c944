//! External tool invocation
//!
//! Every external program (markdownlint, mkdocs, blc, vale, pre-commit, the browser) is run
//! through [`ToolCommand`]. This is the single place where a missing executable becomes
//! [`ToolError::NotFound`] and a failed run becomes [`ToolError::NonZeroExit`], so callers only
//! ever see `DocsResult`.

use crate::core::error::{DocsError, DocsResult, ToolError};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Captured result of a finished tool run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
  pub success: bool,
  pub code: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

impl ToolOutput {
  /// stderr followed by stdout, the order diagnostics are reported in
  pub fn combined(&self) -> String {
    let mut text = String::new();
    text.push_str(&self.stderr);
    text.push_str(&self.stdout);
    text
  }
}

/// A program plus arguments, run from a fixed working directory
#[derive(Debug, Clone)]
pub struct ToolCommand {
  program: String,
  args: Vec<String>,
  cwd: PathBuf,
}

impl ToolCommand {
  /// Build from a configured command vector (`program`, leading args...)
  pub fn new(command: &[String], cwd: &Path) -> DocsResult<Self> {
    let (program, args) = command
      .split_first()
      .ok_or_else(|| DocsError::message("Empty tool command"))?;
    Ok(Self {
      program: program.clone(),
      args: args.to_vec(),
      cwd: cwd.to_path_buf(),
    })
  }

  /// Append one argument
  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  /// Append several arguments
  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  #[cfg(test)]
  pub fn program(&self) -> &str {
    &self.program
  }

  /// Command line as shown to users
  pub fn display(&self) -> String {
    if self.args.is_empty() {
      self.program.clone()
    } else {
      format!("{} {}", self.program, self.args.join(" "))
    }
  }

  /// Run to completion, capturing output; a non-zero exit is not an error here
  pub fn output(&self) -> DocsResult<ToolOutput> {
    tracing::debug!(command = %self.display(), cwd = %self.cwd.display(), "running tool");
    let output = self
      .command()
      .stdin(Stdio::null())
      .output()
      .map_err(|err| self.launch_error(err))?;

    let result = ToolOutput {
      success: output.status.success(),
      code: output.status.code(),
      stdout: String::from_utf8_lossy(&output.stdout).to_string(),
      stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    };
    tracing::debug!(command = %self.program, code = ?result.code, "tool finished");
    Ok(result)
  }

  /// Run to completion; a non-zero exit becomes [`ToolError::NonZeroExit`]
  pub fn run_checked(&self) -> DocsResult<ToolOutput> {
    let output = self.output()?;
    if output.success {
      Ok(output)
    } else {
      Err(DocsError::Tool(ToolError::NonZeroExit {
        command: self.display(),
        code: output.code,
        output: output.combined(),
      }))
    }
  }

  /// Start in the background with every stream discarded
  pub fn spawn_detached(&self) -> DocsResult<Child> {
    tracing::debug!(command = %self.display(), "spawning background process");
    self
      .command()
      .stdin(Stdio::null())
      .stdout(Stdio::null())
      .stderr(Stdio::null())
      .spawn()
      .map_err(|err| self.launch_error(err))
  }

  /// Run with discarded output, killing the process if it outlives `timeout`
  pub fn run_with_timeout(&self, what: &str, timeout: Duration) -> DocsResult<ExitStatus> {
    let mut child = self.spawn_detached()?;
    match wait_with_deadline(&mut child, timeout)? {
      Some(status) => Ok(status),
      None => {
        tracing::warn!(command = %self.program, "timed out, killing");
        force_kill(&mut child)?;
        Err(DocsError::Tool(ToolError::Timeout {
          what: what.to_string(),
          after: timeout,
        }))
      }
    }
  }

  fn command(&self) -> Command {
    let mut cmd = if needs_shell_shim(&self.program) {
      let mut cmd = Command::new("cmd");
      cmd.arg("/C").arg(&self.program);
      cmd
    } else {
      Command::new(&self.program)
    };
    cmd.args(&self.args).current_dir(&self.cwd);
    cmd
  }

  fn launch_error(&self, err: io::Error) -> DocsError {
    if err.kind() == io::ErrorKind::NotFound {
      DocsError::tool_not_found(&self.program)
    } else {
      DocsError::message(format!("Failed to start `{}`: {}", self.program, err))
    }
  }
}

/// npx and mkdocs are .cmd/.bat shims on Windows and need the shell to resolve
fn needs_shell_shim(program: &str) -> bool {
  cfg!(windows) && matches!(program, "npx" | "mkdocs")
}

/// Poll until the child exits or `timeout` elapses; `None` means still running
pub fn wait_with_deadline(child: &mut Child, timeout: Duration) -> DocsResult<Option<ExitStatus>> {
  let deadline = Instant::now() + timeout;
  loop {
    if let Some(status) = child.try_wait()? {
      return Ok(Some(status));
    }
    if Instant::now() >= deadline {
      return Ok(None);
    }
    thread::sleep(POLL_INTERVAL);
  }
}

/// Ask the child to exit (SIGTERM on unix; a hard kill elsewhere)
pub fn terminate(child: &mut Child) -> DocsResult<()> {
  #[cfg(unix)]
  {
    let pid = i32::try_from(child.id())
      .map_err(|_| DocsError::message(format!("pid {} out of range", child.id())))?;
    // SAFETY: kill(2) with a pid we spawned and still own; no memory is touched.
    let rc = unsafe { kill(pid, SIGTERM) };
    if rc == 0 {
      return Ok(());
    }
    let err = io::Error::last_os_error();
    if err.raw_os_error() == Some(ESRCH) {
      return Ok(());
    }
    Err(DocsError::message(format!("failed to signal pid {}: {}", pid, err)))
  }
  #[cfg(not(unix))]
  {
    force_kill(child)
  }
}

/// Kill and reap the child
///
/// On Windows the whole process tree goes, so a program started through the `cmd /C` shim
/// does not outlive its shell.
pub fn force_kill(child: &mut Child) -> DocsResult<()> {
  #[cfg(windows)]
  kill_tree(child.id());

  match child.kill() {
    Ok(()) => {}
    // Already exited
    Err(err) if err.kind() == io::ErrorKind::InvalidInput => {}
    Err(err) => return Err(err.into()),
  }
  child.wait()?;
  Ok(())
}

#[cfg(any(windows, test))]
fn tree_kill_args(pid: u32) -> [String; 4] {
  ["/T".to_string(), "/F".to_string(), "/PID".to_string(), pid.to_string()]
}

#[cfg(windows)]
fn kill_tree(pid: u32) {
  let status = Command::new("taskkill")
    .args(tree_kill_args(pid))
    .stdin(Stdio::null())
    .stdout(Stdio::null())
    .stderr(Stdio::null())
    .status();
  match status {
    Ok(status) if status.success() => tracing::debug!(pid, "process tree killed"),
    // The root may already be gone; child.kill() below still runs
    Ok(status) => tracing::debug!(pid, %status, "taskkill did not succeed"),
    Err(err) => tracing::warn!(pid, error = %err, "taskkill unavailable"),
  }
}

#[cfg(unix)]
unsafe extern "C" {
  fn kill(pid: i32, sig: i32) -> i32;
}

#[cfg(unix)]
const SIGTERM: i32 = 15;
#[cfg(unix)]
const ESRCH: i32 = 3;

/// Whether a pid is alive (signal 0 probe)
#[cfg(all(test, unix))]
pub fn process_exists(pid: u32) -> bool {
  let Ok(pid) = i32::try_from(pid) else {
    return false;
  };
  // SAFETY: signal 0 only checks for existence.
  unsafe { kill(pid, 0) == 0 }
}
