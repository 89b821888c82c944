//! Tests for the `pdf` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_pdf_without_print_page() -> Result<()> {
  let project = TestProject::new()?;

  let run = project.docgate(&["pdf", "--no-build"])?;
  assert_ne!(run.code(), Some(0));
  assert!(run.all().contains("Printable HTML"), "{}", run.all());
  assert!(!project.file_exists(".tools/mkdocs.log"));
  Ok(())
}

#[test]
fn test_pdf_builds_then_exports() -> Result<()> {
  let project = TestProject::new()?;

  let run = project.docgate(&["pdf", "-o", "out/manual.pdf"])?;
  assert_eq!(run.code(), Some(0), "{}", run.all());
  assert_eq!(project.read_file("out/manual.pdf")?, "%PDF-1.4\n");
  assert!(run.stdout().contains("PDF generated: "));
  assert_eq!(project.read_file(".tools/mkdocs.log")?.trim(), "build --strict");

  let leftovers: Vec<_> = std::fs::read_dir(project.path.join("site").join("print"))?
    .filter_map(|entry| entry.ok())
    .filter(|entry| entry.file_name().to_string_lossy().contains("docgate-print"))
    .collect();
  assert!(leftovers.is_empty());
  Ok(())
}

#[test]
fn test_pdf_default_output_name() -> Result<()> {
  let project = TestProject::new()?;

  let run = project.docgate(&["pdf"])?;
  assert_eq!(run.code(), Some(0), "{}", run.all());
  assert!(project.file_exists("whatwatt-go-documentation.pdf"));
  Ok(())
}

#[test]
fn test_pdf_from_existing_site_dir() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("public/print_page/index.html", "<html><head></head><body>API</body></html>")?;

  let run = project.docgate(&["pdf", "--no-build", "--site-dir", "public", "-o", "api.pdf"])?;
  assert_eq!(run.code(), Some(0), "{}", run.all());
  assert!(project.file_exists("api.pdf"));
  assert!(!project.file_exists(".tools/mkdocs.log"));
  Ok(())
}

#[test]
fn test_pdf_strict_build_failure_stops_export() -> Result<()> {
  let project = TestProject::new()?;
  project.mkdocs(1, 1)?;

  let run = project.docgate(&["pdf", "-o", "manual.pdf"])?;
  assert_ne!(run.code(), Some(0));
  assert!(!project.file_exists("manual.pdf"));
  Ok(())
}
