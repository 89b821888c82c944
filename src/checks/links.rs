//! Link check against a transient local doc server

use super::runner::{run_step, tool_outcome};
use super::trait_def::{Check, CheckContext, CheckOutcome, Criticality};
use crate::core::error::{DocsError, DocsResult, ToolError};
use crate::core::process::ToolCommand;
use crate::core::server::{ServerSpec, with_server};
use crate::ui::Status;
use crate::utils;

/// Crawls the built site through `mkdocs serve` with broken-link-checker
///
/// Builds the site first when the site directory is missing. No server is started when the
/// site cannot be built or has no `index.html`; once started, the server is stopped before
/// `run` returns on every path.
pub struct LinkCheck;

impl Check for LinkCheck {
  fn id(&self) -> &str {
    "links"
  }

  fn name(&self) -> &str {
    "Link Validation"
  }

  fn description(&self) -> &str {
    "Link validation (broken-link-checker)"
  }

  fn criticality(&self) -> Criticality {
    Criticality::Advisory
  }

  fn run(&self, ctx: &CheckContext) -> DocsResult<CheckOutcome> {
    let painter = ctx.painter;
    let site_dir = ctx.site_dir();

    if !site_dir.exists() {
      painter.println(Status::Warn, "Site directory not found, building first...");
      let build = ToolCommand::new(&ctx.mkdocs(), &ctx.root)?.args(["build", "--clean"]);
      let output = run_step(painter, "Building site for link checking", &build, Criticality::Critical)?;
      if !output.success {
        return Ok(CheckOutcome::fail(output.combined()));
      }
    }

    if !site_dir.join("index.html").exists() {
      return Ok(CheckOutcome::fail(format!(
        "{}/index.html not found after build, skipping link check.",
        utils::display_posix(&ctx.config.paths.site_dir)
      )));
    }

    let server = &ctx.config.server;
    let spec = ServerSpec::mkdocs_serve(ToolCommand::new(&ctx.mkdocs(), &ctx.root)?, server);
    let crawler = ToolCommand::new(&ctx.config.tools.link_checker, &ctx.root)?;
    let requests = ctx.config.links.requests;

    painter.println(Status::Progress, "Starting local server for link validation...");
    let crawl = with_server(spec, |url| {
      painter.println(Status::Pass, &format!("Local server started at {}", url));
      let result = crawler
        .arg(url)
        .args(["--recursive", "--requests"])
        .arg(requests.to_string())
        .output();
      painter.println(Status::Progress, "Stopping local server...");
      result
    });

    match crawl {
      Ok(result) => Ok(tool_outcome(&result?)),
      Err(DocsError::Tool(ToolError::Timeout { .. })) => Ok(CheckOutcome::fail(format!(
        "Failed to start local server after {} seconds",
        server.ready_budget().as_secs_f64()
      ))),
      Err(err) => Err(err),
    }
  }
}
