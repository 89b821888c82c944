//! `docgate validate` - run the documentation checks and gate on the summary
//!
//! Checks run one at a time in a fixed order. Every enabled check contributes exactly one
//! result, failures never stop later checks, and the single summary at the end decides the
//! exit status.

use crate::checks::{CheckResult, create_default_runner};
use crate::core::config::CheckSelection;
use crate::core::context::DocsContext;
use crate::core::error::{DocsResult, ResultExt};
use crate::core::summary::{RunSummary, summarize};
use crate::ui::Status;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

/// Options for a validation run
#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
  pub selection: CheckSelection,
  /// Gate the exit status on critical checks only
  pub critical_only: bool,
  /// Write the run as JSON
  pub report: Option<PathBuf>,
}

/// JSON report of one run
#[derive(Debug, Serialize)]
struct ValidationReport<'a> {
  generated_at: String,
  selection: CheckSelection,
  critical_only: bool,
  summary: &'a RunSummary,
  results: &'a [CheckResult],
}

/// Run the validation suite; `Ok(true)` means the gating summary passed
pub fn run_validate(ctx: &DocsContext, options: &ValidateOptions) -> DocsResult<bool> {
  let painter = ctx.painter;
  println!("{}\n", painter.banner("DOCUMENTATION VALIDATION SUITE"));
  tracing::debug!(
    selection = ?options.selection,
    enabled = options.selection.enabled_count(),
    "checks selected"
  );

  let runner = create_default_runner(options.selection);
  let results = runner.run_all(ctx);

  let summary = if options.critical_only {
    let gating = RunSummary::compute_critical(&results);
    println!("{}", gating.render(&results, painter));
    painter.println(Status::Info, "Exit status gated on critical checks only");
    gating
  } else {
    summarize(&results, painter)
  };

  if let Some(path) = &options.report {
    let path = ctx.resolve(path);
    write_report(&path, options, &summary, &results)?;
    painter.println(Status::Info, &format!("Report written to {}", path.display()));
  }

  Ok(summary.overall_success)
}

fn write_report(
  path: &std::path::Path,
  options: &ValidateOptions,
  summary: &RunSummary,
  results: &[CheckResult],
) -> DocsResult<()> {
  let report = ValidationReport {
    generated_at: chrono::Local::now().to_rfc3339(),
    selection: options.selection,
    critical_only: options.critical_only,
    summary,
    results,
  };
  let json = serde_json::to_string_pretty(&report)?;

  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
  }
  fs::write(path, json + "\n").with_context(|| format!("Failed to write report to {}", path.display()))?;
  Ok(())
}
