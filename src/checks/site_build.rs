//! Strict site build check

use super::runner::tool_outcome;
use super::trait_def::{Check, CheckContext, CheckOutcome, Criticality};
use crate::core::error::DocsResult;
use crate::core::process::ToolCommand;

/// `mkdocs build --clean --strict`; any warning fails the build
pub struct SiteBuildCheck;

impl Check for SiteBuildCheck {
  fn id(&self) -> &str {
    "site-build"
  }

  fn name(&self) -> &str {
    "MkDocs Build"
  }

  fn description(&self) -> &str {
    "MkDocs build validation (strict mode)"
  }

  fn criticality(&self) -> Criticality {
    Criticality::Critical
  }

  fn run(&self, ctx: &CheckContext) -> DocsResult<CheckOutcome> {
    let output = ToolCommand::new(&ctx.mkdocs(), &ctx.root)?
      .args(["build", "--clean", "--strict"])
      .output()?;
    Ok(tool_outcome(&output))
  }
}
