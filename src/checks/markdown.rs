//! Markdown syntax check

use super::runner::tool_outcome;
use super::trait_def::{Check, CheckContext, CheckOutcome, Criticality};
use crate::core::error::DocsResult;
use crate::core::process::ToolCommand;

/// Lints every Markdown file in the project with markdownlint-cli2
///
/// Globs come from `tools.markdown_globs`, so dependency and output directories stay excluded.
pub struct MarkdownSyntaxCheck;

impl Check for MarkdownSyntaxCheck {
  fn id(&self) -> &str {
    "markdown"
  }

  fn name(&self) -> &str {
    "Markdown Syntax"
  }

  fn description(&self) -> &str {
    "Markdown syntax validation (markdownlint-cli2)"
  }

  fn criticality(&self) -> Criticality {
    Criticality::Critical
  }

  fn run(&self, ctx: &CheckContext) -> DocsResult<CheckOutcome> {
    let tools = &ctx.config.tools;
    let output = ToolCommand::new(&tools.markdownlint, &ctx.root)?
      .args(tools.markdown_globs.iter().cloned())
      .output()?;
    Ok(tool_outcome(&output))
  }
}
