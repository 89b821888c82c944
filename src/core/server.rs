//! Transient doc server used by the link check
//!
//! ```text
//! NotStarted --spawn--> Starting --HTTP 200--> Ready --stop--> Stopping --> Stopped
//!                          |
//!                          +--attempts exhausted / early exit--> FailedStart
//! ```
//!
//! The child process is owned by [`DocServer`]; dropping the server always tears the process
//! down (SIGTERM, then SIGKILL after the shutdown grace period), so no exit path of the caller
//! can leak it. [`with_server`] is the scoped form used by the link check.

use crate::core::config::ServerConfig;
use crate::core::error::{DocsError, DocsResult, ToolError};
use crate::core::process::{ToolCommand, force_kill, terminate, wait_with_deadline};
use std::process::Child;
use std::thread;
use std::time::Duration;

/// Lifecycle position of a [`DocServer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
  NotStarted,
  Starting,
  Ready,
  FailedStart,
  Stopping,
  Stopped,
}

/// How to launch and probe a server
#[derive(Debug, Clone)]
pub struct ServerSpec {
  pub command: ToolCommand,
  /// Root URL polled for readiness
  pub url: String,
  pub attempts: u32,
  pub interval: Duration,
  pub probe_timeout: Duration,
  pub shutdown_timeout: Duration,
}

impl ServerSpec {
  /// `mkdocs serve -a HOST:PORT` with the configured probe budget
  pub fn mkdocs_serve(mkdocs: ToolCommand, server: &ServerConfig) -> Self {
    Self {
      command: mkdocs.arg("serve").arg("-a").arg(server.address()),
      url: server.url(),
      attempts: server.ready_attempts,
      interval: server.ready_interval(),
      probe_timeout: server.probe_timeout(),
      shutdown_timeout: server.shutdown_timeout(),
    }
  }

  fn budget(&self) -> Duration {
    self.interval * self.attempts
  }
}

/// A background server process and its lifecycle state
#[derive(Debug)]
pub struct DocServer {
  spec: ServerSpec,
  child: Option<Child>,
  state: ServerState,
}

impl DocServer {
  pub fn new(spec: ServerSpec) -> Self {
    Self {
      spec,
      child: None,
      state: ServerState::NotStarted,
    }
  }

  #[cfg(test)]
  pub fn state(&self) -> ServerState {
    self.state
  }

  pub fn url(&self) -> &str {
    &self.spec.url
  }

  /// Pid of the live child, if any
  pub fn pid(&self) -> Option<u32> {
    self.child.as_ref().map(Child::id)
  }

  /// Spawn the process (NotStarted → Starting)
  pub fn start(&mut self) -> DocsResult<()> {
    if self.state != ServerState::NotStarted {
      return Err(DocsError::message(format!(
        "doc server already {:?}; only one instance per run",
        self.state
      )));
    }
    self.child = Some(self.spec.command.spawn_detached()?);
    tracing::debug!(pid = ?self.pid(), url = %self.spec.url, "doc server spawned");
    self.state = ServerState::Starting;
    Ok(())
  }

  /// Poll until the root URL answers 200 (Starting → Ready | FailedStart)
  pub fn wait_ready(&mut self) -> DocsResult<()> {
    if self.state != ServerState::Starting {
      return Err(DocsError::message(format!("cannot wait for a server in state {:?}", self.state)));
    }

    let client = reqwest::blocking::Client::builder()
      .timeout(self.spec.probe_timeout)
      .no_proxy()
      .build()?;

    for attempt in 1..=self.spec.attempts {
      match client.get(&self.spec.url).send() {
        Ok(response) if response.status().as_u16() == 200 => {
          tracing::debug!(attempt, "doc server ready");
          self.state = ServerState::Ready;
          return Ok(());
        }
        Ok(response) => tracing::trace!(attempt, status = response.status().as_u16(), "not ready"),
        Err(err) => tracing::trace!(attempt, error = %err, "not ready"),
      }

      if let Some(child) = self.child.as_mut()
        && let Some(status) = child.try_wait()?
      {
        self.state = ServerState::FailedStart;
        return Err(DocsError::message(format!(
          "Local server exited during startup ({})",
          status
        )));
      }

      thread::sleep(self.spec.interval);
    }

    self.state = ServerState::FailedStart;
    Err(DocsError::Tool(ToolError::Timeout {
      what: format!("Local server at {}", self.spec.url),
      after: self.spec.budget(),
    }))
  }

  /// Terminate gracefully, force-kill after the grace period, reap
  ///
  /// Safe to call in any state and more than once.
  pub fn stop(&mut self) -> DocsResult<()> {
    let Some(mut child) = self.child.take() else {
      return Ok(());
    };
    let failed_start = self.state == ServerState::FailedStart;
    self.state = ServerState::Stopping;

    let result = shutdown(&mut child, self.spec.shutdown_timeout);
    self.state = if failed_start {
      ServerState::FailedStart
    } else {
      ServerState::Stopped
    };
    result
  }
}

fn shutdown(child: &mut Child, grace: Duration) -> DocsResult<()> {
  if child.try_wait()?.is_some() {
    return Ok(());
  }
  terminate(child)?;
  if wait_with_deadline(child, grace)?.is_some() {
    tracing::debug!("doc server stopped");
    return Ok(());
  }
  tracing::warn!(pid = child.id(), "doc server ignored SIGTERM, killing");
  force_kill(child)
}

impl Drop for DocServer {
  fn drop(&mut self) {
    if let Err(err) = self.stop() {
      tracing::warn!(error = %err, "failed to stop doc server");
    }
  }
}

/// Run `body` against a ready server; the server is stopped on every path
///
/// Readiness failure returns `Err` without calling `body`. A panic in `body` still tears the
/// server down through `Drop`.
pub fn with_server<T>(spec: ServerSpec, body: impl FnOnce(&str) -> T) -> DocsResult<T> {
  let mut server = DocServer::new(spec);
  let ready = server.start().and_then(|()| server.wait_ready());
  if let Err(err) = ready {
    server.stop()?;
    return Err(err);
  }

  let url = server.url().to_string();
  let value = body(&url);
  server.stop()?;
  Ok(value)
}
