//! Check runner for executing validations

use super::trait_def::{Check, CheckContext, CheckOutcome, CheckResult, CheckStatus, Criticality};
use crate::core::config::CheckSelection;
use crate::core::error::{DocsError, DocsResult, ToolError};
use crate::core::process::{ToolCommand, ToolOutput};
use crate::ui::{Painter, Status};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Run one check and convert whatever happens into a [`CheckResult`]
///
/// Prints a progress line before and a status line after. Faults (missing tool, I/O, panics)
/// never escape: they become a failed result with a diagnostic naming the fault kind.
pub fn run_check(check: &dyn Check, ctx: &CheckContext) -> CheckResult {
  let painter = ctx.painter;
  let description = check.description();
  painter.println(Status::Progress, &format!("{}...", description));

  let attempt = panic::catch_unwind(AssertUnwindSafe(|| check.run(ctx)));

  match attempt {
    Ok(Ok(outcome)) => {
      let result = CheckResult::from_outcome(check, outcome);
      match result.status {
        CheckStatus::Passed => {
          painter.println(Status::Pass, &format!("{} - PASSED", description));
          painter.print_output(Status::Info, &result.output);
        }
        _ => {
          let status = failure_status(check.criticality());
          let label = if check.criticality() == Criticality::Critical {
            "FAILED"
          } else {
            "WARNINGS"
          };
          painter.println(status, &format!("{} - {}", description, label));
          painter.print_output(status, &result.output);
        }
      }
      result
    }
    Ok(Err(DocsError::Tool(ToolError::NotFound { program }))) => {
      painter.println(Status::Fail, &format!("{} - TOOL NOT FOUND", description));
      painter.print_output(Status::Fail, &format!("Command not found: {}", program));
      CheckResult::fault(check, CheckStatus::ToolNotFound, format!("Tool not found: {}", program))
    }
    Ok(Err(err)) => {
      painter.println(Status::Fail, &format!("{} - ERROR: {}", description, err));
      CheckResult::fault(check, CheckStatus::Error, err.to_string())
    }
    Err(payload) => {
      let message = format!("check panicked: {}", panic_message(payload.as_ref()));
      tracing::error!(check = check.id(), "{}", message);
      painter.println(Status::Fail, &format!("{} - ERROR: {}", description, message));
      CheckResult::fault(check, CheckStatus::Error, message)
    }
  }
}

fn failure_status(criticality: Criticality) -> Status {
  match criticality {
    Criticality::Critical => Status::Fail,
    Criticality::Advisory => Status::Warn,
  }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
  if let Some(s) = payload.downcast_ref::<&str>() {
    (*s).to_string()
  } else if let Some(s) = payload.downcast_ref::<String>() {
    s.clone()
  } else {
    "unknown panic".to_string()
  }
}

/// Map a finished tool run onto a check outcome
///
/// Success reports stdout; failure reports stderr followed by stdout.
pub fn tool_outcome(output: &ToolOutput) -> CheckOutcome {
  if output.success {
    CheckOutcome::pass(output.stdout.clone())
  } else {
    CheckOutcome::fail(output.combined())
  }
}

/// Run one tool as a reported sub-step: a progress line, then PASSED/FAILED (or WARNINGS)
///
/// A finished run is returned whatever its exit status. A missing executable is reported and
/// returned as `Err`.
pub fn run_step(
  painter: Painter,
  description: &str,
  command: &ToolCommand,
  criticality: Criticality,
) -> DocsResult<ToolOutput> {
  painter.println(Status::Progress, &format!("{}...", description));
  let output = match command.output() {
    Ok(output) => output,
    Err(err) => {
      if err.is_tool_missing() {
        painter.println(Status::Fail, &format!("{} - TOOL NOT FOUND", description));
        painter.print_output(Status::Fail, &format!("Command not found: {}", command.display()));
      }
      return Err(err);
    }
  };

  if output.success {
    painter.println(Status::Pass, &format!("{} - PASSED", description));
    painter.print_output(Status::Info, &output.stdout);
  } else {
    let status = failure_status(criticality);
    let label = if criticality == Criticality::Critical { "FAILED" } else { "WARNINGS" };
    painter.println(status, &format!("{} - {}", description, label));
    painter.print_output(status, &output.combined());
  }
  Ok(output)
}

/// Ordered set of enabled checks
pub struct CheckRunner {
  checks: Vec<Arc<dyn Check>>,
}

impl CheckRunner {
  /// Create a new check runner
  pub fn new() -> Self {
    Self { checks: Vec::new() }
  }

  /// Add a check to the runner
  pub fn add_check(&mut self, check: Arc<dyn Check>) {
    self.checks.push(check);
  }

  /// Run every registered check once, in order
  ///
  /// Always yields exactly one result per registered check.
  pub fn run_all(&self, ctx: &CheckContext) -> Vec<CheckResult> {
    let mut results = Vec::with_capacity(self.checks.len());
    for check in &self.checks {
      results.push(run_check(check.as_ref(), ctx));
      println!();
    }
    results
  }

  /// Get all registered checks
  #[cfg(test)]
  pub fn checks(&self) -> &[Arc<dyn Check>] {
    &self.checks
  }
}

impl Default for CheckRunner {
  fn default() -> Self {
    Self::new()
  }
}

/// Create a runner with the built-in checks enabled by `selection`, in fixed order:
/// markdown, site build, OpenAPI, links, style
pub fn create_default_runner(selection: CheckSelection) -> CheckRunner {
  let mut runner = CheckRunner::new();

  if selection.markdown {
    runner.add_check(Arc::new(super::markdown::MarkdownSyntaxCheck));
  }
  if selection.site_build {
    runner.add_check(Arc::new(super::site_build::SiteBuildCheck));
  }
  if selection.openapi {
    runner.add_check(Arc::new(super::openapi::OpenApiCheck));
  }
  if selection.links {
    runner.add_check(Arc::new(super::links::LinkCheck));
  }
  if selection.style {
    runner.add_check(Arc::new(super::style::StyleCheck));
  }

  runner
}
