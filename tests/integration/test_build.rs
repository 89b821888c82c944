//! Tests for the `build` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_build_populates_dist() -> Result<()> {
  let project = TestProject::new()?;

  let run = project.docgate(&["build", "--skip-validation"])?;
  let stdout = run.stdout();
  assert_eq!(run.code(), Some(0), "{}", run.all());

  assert!(project.file_exists("dist/index.html"));
  assert_eq!(project.read_file("dist/README.md")?, "# Meter docs\n");
  assert!(!project.file_exists("dist/LICENSE"));

  let info = project.read_file("dist/BUILD_INFO.md")?;
  assert!(info.starts_with("# Deployment Info\nBuilt: "));
  assert!(info.contains("Site URL: https://whatwatt.ch\n"));
  assert!(info.ends_with("Build directory: dist/\n"));

  assert!(stdout.contains("Production build completed in"));
  assert!(stdout.contains("Ready for deployment: ./dist/"));

  let mkdocs_log = project.read_file(".tools/mkdocs.log")?;
  let calls: Vec<&str> = mkdocs_log.lines().collect();
  assert_eq!(calls[0], "build --clean");
  assert!(calls[1].starts_with("build --strict --clean --site-dir "));
  assert!(calls[1].ends_with("dist"));
  Ok(())
}

#[test]
fn test_build_failure_aborts() -> Result<()> {
  let project = TestProject::new()?;
  project.mkdocs(1, 1)?;

  let run = project.docgate(&["build", "--skip-validation"])?;
  assert_eq!(run.code(), Some(1));
  assert!(run.all().contains("Cleaning previous builds failed"), "{}", run.all());
  assert!(!project.file_exists("dist/BUILD_INFO.md"));
  Ok(())
}

#[test]
fn test_pre_commit_problems_only_warn() -> Result<()> {
  let project = TestProject::new()?;
  project.tool("pre-commit", "echo 'trailing-whitespace: Failed'\nexit 1\n")?;

  let run = project.docgate(&["build", "--skip-validation"])?;
  assert_eq!(run.code(), Some(0), "{}", run.all());
  assert!(run.stdout().contains("Pre-commit failed - continuing anyway"));

  project.write_config(&[("pre_commit", "[\"docgate-test-no-such-hooks\"]")])?;
  let run = project.docgate(&["build", "--skip-validation"])?;
  assert_eq!(run.code(), Some(0), "{}", run.all());
  assert!(run.stdout().contains("pre-commit not installed - skipping hooks"));
  Ok(())
}

#[test]
fn test_validation_warnings_do_not_fail_build() -> Result<()> {
  let project = TestProject::new()?;

  // The fake `mkdocs serve` exits at once, so the link check cannot pass
  let run = project.docgate(&["build", "--skip-pre-commit"])?;
  let stdout = run.stdout();
  assert_eq!(run.code(), Some(0), "{}", run.all());
  assert!(stdout.contains("VALIDATION SUMMARY"));
  assert!(stdout.contains("Validation warnings - review output"));
  assert!(project.file_exists("dist/BUILD_INFO.md"));
  Ok(())
}
