//! Tests for the `validate` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_fast_run_with_passing_tools() -> Result<()> {
  let project = TestProject::new()?;

  let run = project.docgate(&["validate", "--fast"])?;
  let stdout = run.stdout();
  assert_eq!(run.code(), Some(0), "{}", run.all());

  assert!(stdout.contains("DOCUMENTATION VALIDATION SUITE"));
  assert!(stdout.contains("Markdown syntax validation (markdownlint-cli2) - PASSED"));
  assert!(stdout.contains("MkDocs build validation (strict mode) - PASSED"));
  assert!(stdout.contains("OpenAPI specification validation - PASSED"));
  assert!(stdout.contains("Success Rate: 100.0% (3/3)"));
  assert!(stdout.contains("All validations passed!"));
  assert!(!stdout.contains("Link Validation"));

  let mkdocs_log = project.read_file(".tools/mkdocs.log")?;
  assert_eq!(mkdocs_log.trim(), "build --clean --strict");
  Ok(())
}

#[test]
fn test_skipping_links_and_style_runs_critical_checks() -> Result<()> {
  let project = TestProject::new()?;

  let run = project.docgate(&["validate", "--skip-links", "--skip-style"])?;
  let stdout = run.stdout();
  assert_eq!(run.code(), Some(0), "{}", run.all());
  assert!(stdout.contains("Success Rate: 100.0% (3/3)"));
  assert!(!stdout.contains("Link Validation"));
  assert!(!stdout.contains("Language/Style"));
  assert!(!project.file_exists(".tools/vale.log"));
  Ok(())
}

#[test]
fn test_checks_run_in_fixed_order() -> Result<()> {
  let project = TestProject::new()?;

  let stdout = project.docgate(&["validate", "--skip-links"])?.stdout();
  let order = ["Markdown Syntax", "MkDocs Build", "OpenAPI Validation", "Language/Style"];
  let positions: Vec<usize> = order
    .iter()
    .map(|name| stdout.rfind(name).unwrap_or_else(|| panic!("{} missing from summary", name)))
    .collect();
  assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "{}", stdout);
  Ok(())
}

#[test]
fn test_missing_openapi_fails_and_later_checks_still_run() -> Result<()> {
  let project = TestProject::new()?;
  project.remove_file("openapi/api.yaml")?;

  let run = project.docgate(&["validate", "--skip-links"])?;
  let stdout = run.stdout();
  assert_eq!(run.code(), Some(1));
  assert!(stdout.contains("OpenAPI file not found: openapi/api.yaml"));
  assert!(stdout.contains("Language and style validation (Vale) - PASSED"));
  assert!(stdout.contains("Success Rate: 75.0% (3/4)"));
  assert!(stdout.contains("1 validation(s) failed"));
  assert_eq!(project.read_file(".tools/vale.log")?.trim(), "docs/guide/setup.md docs/index.md");
  Ok(())
}

#[test]
fn test_broken_openapi_reference_is_reported() -> Result<()> {
  let project = TestProject::new()?;
  project.remove_file("openapi/schemas.yaml")?;

  let run = project.docgate(&["validate", "--fast"])?;
  assert_eq!(run.code(), Some(1));
  assert!(run.stdout().contains("Unresolvable $ref 'schemas.yaml#/Reading'"), "{}", run.stdout());
  Ok(())
}

#[test]
fn test_missing_tool_is_reported_not_fatal() -> Result<()> {
  let project = TestProject::new()?;
  project.write_config(&[("markdownlint", "[\"docgate-test-no-such-linter\"]")])?;

  let run = project.docgate(&["validate", "--fast"])?;
  let stdout = run.stdout();
  assert_eq!(run.code(), Some(1));
  assert!(stdout.contains("Markdown syntax validation (markdownlint-cli2) - TOOL NOT FOUND"));
  assert!(stdout.contains("Command not found: docgate-test-no-such-linter"));
  assert!(stdout.contains("OpenAPI specification validation - PASSED"));
  assert!(stdout.contains("Success Rate: 66.7% (2/3)"));
  Ok(())
}

#[test]
fn test_linter_diagnostics_are_shown() -> Result<()> {
  let project = TestProject::new()?;
  project.tool("markdownlint", "echo 'docs/index.md:1 MD041 first-line-heading' >&2\nexit 1\n")?;

  let run = project.docgate(&["validate", "--fast"])?;
  let stdout = run.stdout();
  assert_eq!(run.code(), Some(1));
  assert!(stdout.contains("Markdown syntax validation (markdownlint-cli2) - FAILED"));
  assert!(stdout.contains("MD041 first-line-heading"));
  Ok(())
}

#[test]
fn test_nothing_selected_is_a_failure() -> Result<()> {
  let project = TestProject::new()?;

  let run = project.docgate(&["validate", "--skip-markdown", "--skip-mkdocs", "--skip-openapi", "--fast"])?;
  assert_eq!(run.code(), Some(1));
  assert!(run.stdout().contains("No validations were run"));
  assert!(!run.stdout().contains("Success Rate"));
  Ok(())
}

#[test]
fn test_advisory_failure_gates_unless_critical_only() -> Result<()> {
  let project = TestProject::new()?;
  project.tool("vale", "echo 'docs/index.md:1:3: Vale.Spelling' \nexit 1\n")?;

  let run = project.docgate(&["validate", "--skip-links"])?;
  assert_eq!(run.code(), Some(1));
  assert!(run.stdout().contains("Language and style validation (Vale) - WARNINGS"));

  let run = project.docgate(&["validate", "--skip-links", "--critical-only"])?;
  let stdout = run.stdout();
  assert_eq!(run.code(), Some(0), "{}", run.all());
  assert!(stdout.contains("Success Rate: 100.0% (3/3)"));
  assert!(stdout.contains("Exit status gated on critical checks only"));
  Ok(())
}

#[test]
fn test_link_check_server_exit_is_an_error_result() -> Result<()> {
  let project = TestProject::new()?;
  std::fs::create_dir_all(project.path.join("site"))?;
  project.write_file("site/index.html", "<html></html>")?;

  let run = project.docgate(&["validate", "--skip-markdown", "--skip-mkdocs", "--skip-openapi", "--skip-style"])?;
  let stdout = run.stdout();
  assert_eq!(run.code(), Some(1));
  assert!(stdout.contains("Starting local server for link validation..."));
  assert!(stdout.contains("Link validation (broken-link-checker) - ERROR"), "{}", stdout);
  assert!(stdout.contains("exited during startup"));
  Ok(())
}

#[test]
fn test_report_is_written_as_json() -> Result<()> {
  let project = TestProject::new()?;
  project.remove_file("openapi/api.yaml")?;

  let run = project.docgate(&["validate", "--fast", "--report", "reports/validation.json"])?;
  assert_eq!(run.code(), Some(1));
  assert!(run.stdout().contains("Report written to"));

  let report: serde_json::Value = serde_json::from_str(&project.read_file("reports/validation.json")?)?;
  assert_eq!(report["summary"]["total"], 3);
  assert_eq!(report["summary"]["passed_count"], 2);
  assert_eq!(report["summary"]["overall_success"], false);
  assert_eq!(report["critical_only"], false);

  let results = report["results"].as_array().map(Vec::as_slice).unwrap_or_default();
  let ids: Vec<&str> = results.iter().filter_map(|r| r["id"].as_str()).collect();
  assert_eq!(ids, ["markdown", "site-build", "openapi"]);
  assert_eq!(results[2]["status"], "failed");
  Ok(())
}

#[test]
fn test_invalid_config_exits_before_running_checks() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("docgate.toml", "[links]\nrequests = 0\n")?;

  let run = project.docgate(&["validate", "--fast"])?;
  assert_ne!(run.code(), Some(0));
  assert!(run.all().contains("links.requests"), "{}", run.all());
  assert!(!run.stdout().contains("DOCUMENTATION VALIDATION SUITE"));
  Ok(())
}
