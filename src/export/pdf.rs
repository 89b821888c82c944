//! PDF export of the site's print page through a headless Chromium-family browser
//!
//! The browser loads a sibling copy of the print page that carries an injected `@page` rule
//! (page size, margins, background colours). The copy sits next to the source page so relative
//! asset links keep working, and it is removed on every exit path.

use crate::core::config::PdfConfig;
use crate::core::error::{DocsError, DocsResult, ResultExt, ToolError};
use crate::core::process::ToolCommand;
use std::fs;
use std::path::{Path, PathBuf};

/// Print page locations, in the order they are tried, relative to the site directory
pub const PRINT_PAGE_CANDIDATES: [&str; 5] = [
  "print/index.html",
  "print/print.html",
  "print/site.html",
  "print_page/index.html",
  "print.html",
];

/// Browser executables searched on PATH when `tools.browser` is unset
pub const BROWSER_CANDIDATES: [&str; 5] = [
  "chromium",
  "chromium-browser",
  "google-chrome",
  "google-chrome-stable",
  "chrome",
];

const WRAPPER_SUFFIX: &str = ".docgate-print.html";

/// First existing print page under `site_dir`
pub fn find_print_page(site_dir: &Path) -> DocsResult<PathBuf> {
  PRINT_PAGE_CANDIDATES
    .iter()
    .map(|candidate| site_dir.join(candidate))
    .find(|path| path.is_file())
    .ok_or_else(|| DocsError::missing("Printable HTML (print/ or print_page/)", site_dir))
}

/// Browser command from config, or the first candidate found on PATH
pub fn find_browser(configured: Option<&Vec<String>>) -> DocsResult<Vec<String>> {
  if let Some(command) = configured {
    return Ok(command.clone());
  }

  let path = std::env::var_os("PATH").unwrap_or_default();
  for dir in std::env::split_paths(&path) {
    for name in BROWSER_CANDIDATES {
      let exe = dir.join(format!("{}{}", name, std::env::consts::EXE_SUFFIX));
      if exe.is_file() {
        tracing::debug!(browser = %exe.display(), "found browser");
        return Ok(vec![exe.to_string_lossy().to_string()]);
      }
    }
  }

  Err(DocsError::tool_not_found("chromium"))
}

/// CSS injected into the print copy
pub fn page_css(pdf: &PdfConfig) -> String {
  let margin = &pdf.margin;
  let adjust = if pdf.print_background { "exact" } else { "economy" };
  let page = format!(
    "@page {{ size: {}; margin: {} {} {} {}; }}",
    pdf.format, margin.top, margin.right, margin.bottom, margin.left
  );
  let colors = format!("html {{ -webkit-print-color-adjust: {adjust}; print-color-adjust: {adjust}; }}");
  format!("<style>{} {}</style>", page, colors)
}

/// Insert `css` before `</head>`, or at the top when the page has no head
pub fn inject_css(html: &str, css: &str) -> String {
  match html.to_ascii_lowercase().find("</head>") {
    Some(index) => format!("{}{}{}", &html[..index], css, &html[index..]),
    None => format!("{}{}", css, html),
  }
}

/// Print copy on disk; deleted when dropped
struct PrintWrapper {
  path: PathBuf,
}

impl PrintWrapper {
  fn create(page: &Path, pdf: &PdfConfig) -> DocsResult<Self> {
    let html = fs::read_to_string(page).with_context(|| format!("Failed to read {}", page.display()))?;
    let stem = page.file_stem().and_then(|s| s.to_str()).unwrap_or("print");
    let path = page.with_file_name(format!("{}{}", stem, WRAPPER_SUFFIX));
    fs::write(&path, inject_css(&html, &page_css(pdf)))
      .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(Self { path })
  }
}

impl Drop for PrintWrapper {
  fn drop(&mut self) {
    if let Err(err) = fs::remove_file(&self.path) {
      tracing::warn!(path = %self.path.display(), error = %err, "failed to remove print wrapper");
    }
  }
}

/// Render `page` to `output` with `browser`
///
/// The browser run is bounded by `pdf.timeout_secs`; a browser still running then is killed.
pub fn export_pdf(browser: &[String], page: &Path, output: &Path, pdf: &PdfConfig) -> DocsResult<PathBuf> {
  let page = page
    .canonicalize()
    .with_context(|| format!("Failed to resolve {}", page.display()))?;
  if let Some(parent) = output.parent()
    && !parent.as_os_str().is_empty()
  {
    fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
  }
  let output =
    std::path::absolute(output).with_context(|| format!("Failed to resolve {}", output.display()))?;

  let wrapper = PrintWrapper::create(&page, pdf)?;
  let url = reqwest::Url::from_file_path(&wrapper.path)
    .map_err(|()| DocsError::message(format!("Cannot build a file URL for {}", wrapper.path.display())))?;

  let cwd = page.parent().unwrap_or_else(|| Path::new("."));
  let command = ToolCommand::new(browser, cwd)?
    .args([
      "--headless",
      "--disable-gpu",
      "--no-first-run",
      "--no-pdf-header-footer",
    ])
    .arg(format!("--virtual-time-budget={}", pdf.settle_ms))
    .arg(format!("--print-to-pdf={}", output.display()))
    .arg(url.as_str());

  let status = command.run_with_timeout("Browser PDF export", pdf.timeout())?;
  if !status.success() {
    return Err(DocsError::Tool(ToolError::NonZeroExit {
      command: command.display(),
      code: status.code(),
      output: String::new(),
    }));
  }

  if !output.is_file() {
    return Err(DocsError::missing("Rendered PDF", &output));
  }

  drop(wrapper);
  Ok(output)
}
