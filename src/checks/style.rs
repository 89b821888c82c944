//! Prose style check (Vale)

use super::runner::tool_outcome;
use super::trait_def::{Check, CheckContext, CheckOutcome, Criticality};
use crate::core::error::DocsResult;
use crate::core::process::ToolCommand;
use crate::ui::Status;
use crate::utils;

/// Runs Vale over every Markdown file under the docs directory
pub struct StyleCheck;

impl Check for StyleCheck {
  fn id(&self) -> &str {
    "style"
  }

  fn name(&self) -> &str {
    "Language/Style"
  }

  fn description(&self) -> &str {
    "Language and style validation (Vale)"
  }

  fn criticality(&self) -> Criticality {
    Criticality::Advisory
  }

  fn run(&self, ctx: &CheckContext) -> DocsResult<CheckOutcome> {
    let vale = &ctx.config.tools.vale;

    if ctx.root.join(".vale.ini").exists() {
      ctx.painter.println(Status::Progress, "Syncing Vale styles...");
      // Result ignored
      match ToolCommand::new(vale, &ctx.root)?.arg("sync").output() {
        Ok(out) if !out.success => tracing::debug!(stderr = %out.stderr.trim(), "vale sync failed"),
        Ok(_) => {}
        Err(err) => tracing::debug!(error = %err, "vale sync not run"),
      }
    }

    let files = utils::find_markdown_files(&ctx.docs_dir())?;
    if files.is_empty() {
      return Ok(CheckOutcome::pass("No Markdown files found for Vale validation."));
    }

    let relative = files
      .iter()
      .map(|file| utils::display_posix(&utils::relative_to(file, &ctx.root)));
    let output = ToolCommand::new(vale, &ctx.root)?.args(relative).output()?;
    Ok(tool_outcome(&output))
  }
}
