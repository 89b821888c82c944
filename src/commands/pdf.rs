//! `docgate pdf` - export the site's print page to a single PDF

use crate::core::context::DocsContext;
use crate::core::error::DocsResult;
use crate::core::process::ToolCommand;
use crate::export::{export_pdf, find_browser, find_print_page};
use crate::ui::Status;
use std::path::PathBuf;

/// Options for the PDF export
#[derive(Debug, Clone, Default)]
pub struct PdfOptions {
  /// Overrides `pdf.output`
  pub output: Option<PathBuf>,
  /// Overrides `paths.site_dir`
  pub site_dir: Option<PathBuf>,
  /// Use the existing site instead of running `mkdocs build --strict`
  pub no_build: bool,
}

/// Build (unless disabled), locate the print page and render it; returns the PDF path
pub fn run_pdf(ctx: &DocsContext, options: &PdfOptions) -> DocsResult<PathBuf> {
  let painter = ctx.painter;

  if !options.no_build {
    painter.println(Status::Progress, "Building MkDocs site (strict)...");
    ToolCommand::new(&ctx.mkdocs(), &ctx.root)?
      .args(["build", "--strict"])
      .run_checked()?;
  }

  let site_dir = match &options.site_dir {
    Some(dir) => ctx.resolve(dir),
    None => ctx.site_dir(),
  };
  let page = find_print_page(&site_dir)?;
  tracing::debug!(page = %page.display(), "print page found");

  let browser = find_browser(ctx.config.tools.browser.as_ref())?;
  let output = ctx.resolve(options.output.as_ref().unwrap_or(&ctx.config.pdf.output));

  painter.println(Status::Progress, &format!("Exporting print page to PDF: {}", output.display()));
  let written = export_pdf(&browser, &page, &output, &ctx.config.pdf)?;
  painter.println(Status::Pass, &format!("PDF generated: {}", written.display()));
  Ok(written)
}
