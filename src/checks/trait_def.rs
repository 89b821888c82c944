//! Check trait abstraction for documentation validations
//!
//! Every validation (markdown lint, strict build, OpenAPI, links, prose style) implements
//! [`Check`]. A check performs one external action and reports a [`CheckOutcome`]; the runner
//! turns that outcome, or any fault raised while producing it, into exactly one
//! [`CheckResult`].

use crate::core::context::DocsContext;
use crate::core::error::DocsResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Context passed to checks
pub type CheckContext = DocsContext;

/// How a failure is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criticality {
  /// Must pass; failure is shown as FAILED
  Critical,
  /// Best effort; failure is shown as WARNINGS
  Advisory,
}

impl fmt::Display for Criticality {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Criticality::Critical => write!(f, "CRITICAL"),
      Criticality::Advisory => write!(f, "ADVISORY"),
    }
  }
}

/// Standardized (success, output) pair returned by a check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
  pub passed: bool,
  /// Free-form diagnostics, may be empty
  pub output: String,
}

impl CheckOutcome {
  pub fn pass(output: impl Into<String>) -> Self {
    Self {
      passed: true,
      output: output.into(),
    }
  }

  pub fn fail(output: impl Into<String>) -> Self {
    Self {
      passed: false,
      output: output.into(),
    }
  }
}

/// How a check ended, for display and reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckStatus {
  Passed,
  /// Critical check failed
  Failed,
  /// Advisory check failed
  Warnings,
  /// Executable missing
  ToolNotFound,
  /// Fault while running the check
  Error,
}

/// Result of running one check
///
/// Immutable once produced; a run collects them in execution order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
  /// Stable kebab-case id
  pub id: String,
  /// Display label used in the summary table
  pub name: String,
  pub criticality: Criticality,
  pub passed: bool,
  pub status: CheckStatus,
  pub output: String,
}

impl CheckResult {
  /// Result from a completed outcome
  pub fn from_outcome(check: &dyn Check, outcome: CheckOutcome) -> Self {
    let status = match (outcome.passed, check.criticality()) {
      (true, _) => CheckStatus::Passed,
      (false, Criticality::Critical) => CheckStatus::Failed,
      (false, Criticality::Advisory) => CheckStatus::Warnings,
    };
    Self {
      id: check.id().to_string(),
      name: check.name().to_string(),
      criticality: check.criticality(),
      passed: outcome.passed,
      status,
      output: outcome.output,
    }
  }

  /// Failed result for a fault raised by the check
  pub fn fault(check: &dyn Check, status: CheckStatus, output: impl Into<String>) -> Self {
    Self {
      id: check.id().to_string(),
      name: check.name().to_string(),
      criticality: check.criticality(),
      passed: false,
      status,
      output: output.into(),
    }
  }
}

/// Documentation validation trait
///
/// # Example
///
/// ```rust,ignore
/// struct SpellingCheck;
///
/// impl Check for SpellingCheck {
///   fn id(&self) -> &str { "spelling" }
///   fn name(&self) -> &str { "Spelling" }
///   fn description(&self) -> &str { "Spell checking (cspell)" }
///   fn criticality(&self) -> Criticality { Criticality::Advisory }
///
///   fn run(&self, ctx: &CheckContext) -> DocsResult<CheckOutcome> {
///     let out = ToolCommand::new(&["cspell".into()], &ctx.root)?.arg("docs/**/*.md").output()?;
///     Ok(tool_outcome(&out))
///   }
/// }
/// ```
pub trait Check: Send + Sync {
  /// Unique id (kebab-case)
  fn id(&self) -> &str;

  /// Short label for the summary table
  fn name(&self) -> &str;

  /// Human-readable description used in progress lines
  fn description(&self) -> &str;

  fn criticality(&self) -> Criticality;

  /// Perform the external action
  ///
  /// `Err` is reserved for faults (missing tool, I/O); a tool that ran and reported problems
  /// is a failing `Ok(CheckOutcome)`.
  fn run(&self, ctx: &CheckContext) -> DocsResult<CheckOutcome>;
}

#[cfg(test)]
mod tests {
  use super::*;

  struct Dummy(Criticality);

  impl Check for Dummy {
    fn id(&self) -> &str {
      "dummy"
    }
    fn name(&self) -> &str {
      "Dummy"
    }
    fn description(&self) -> &str {
      "Dummy validation"
    }
    fn criticality(&self) -> Criticality {
      self.0
    }
    fn run(&self, _ctx: &CheckContext) -> DocsResult<CheckOutcome> {
      Ok(CheckOutcome::pass(""))
    }
  }

  #[test]
  fn test_status_follows_criticality() {
    let critical = CheckResult::from_outcome(&Dummy(Criticality::Critical), CheckOutcome::fail("x"));
    assert_eq!(critical.status, CheckStatus::Failed);
    let advisory = CheckResult::from_outcome(&Dummy(Criticality::Advisory), CheckOutcome::fail("x"));
    assert_eq!(advisory.status, CheckStatus::Warnings);
    let passed = CheckResult::from_outcome(&Dummy(Criticality::Advisory), CheckOutcome::pass(""));
    assert_eq!(passed.status, CheckStatus::Passed);
    assert!(passed.passed);
  }

  #[test]
  fn test_result_serializes_kebab_status() {
    let result = CheckResult::fault(&Dummy(Criticality::Critical), CheckStatus::ToolNotFound, "Tool not found: npx");
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["status"], "tool-not-found");
    assert_eq!(json["criticality"], "critical");
    assert_eq!(json["passed"], false);
  }
}
