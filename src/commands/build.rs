//! `docgate build` - production build into the dist directory
//!
//! Steps, in order:
//! 1. `mkdocs build --clean` (aborts on failure)
//! 2. `pre-commit run --all-files` (warns on failure)
//! 3. `mkdocs build --strict --clean --site-dir <dist>` (aborts on failure)
//! 4. Full validation suite (warns on failure)
//! 5. Copy extra repository files into dist
//! 6. Write `BUILD_INFO.md`

use crate::checks::{Criticality, run_step};
use crate::commands::validate::{ValidateOptions, run_validate};
use crate::core::context::DocsContext;
use crate::core::error::{DocsError, DocsResult, ResultExt};
use crate::core::process::ToolCommand;
use crate::export::{BUILD_INFO_FILE, render_build_info};
use crate::ui::Status;
use crate::utils;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Options for the production build
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
  pub skip_pre_commit: bool,
  pub skip_validation: bool,
}

/// Run the production build, returning the dist directory
pub fn run_build(ctx: &DocsContext, options: BuildOptions) -> DocsResult<PathBuf> {
  let painter = ctx.painter;
  let start = Instant::now();
  println!("{}\n", painter.banner("PRODUCTION BUILD"));

  let mkdocs = ctx.mkdocs();
  let dist = ctx.dist_dir();

  let clean = ToolCommand::new(&mkdocs, &ctx.root)?.args(["build", "--clean"]);
  let cleaned = run_step(painter, "Cleaning previous builds", &clean, Criticality::Critical)?;
  require(cleaned.success, "Cleaning previous builds")?;

  if options.skip_pre_commit {
    tracing::debug!("pre-commit skipped");
  } else {
    let hooks = ToolCommand::new(&ctx.config.tools.pre_commit, &ctx.root)?.args(["run", "--all-files"]);
    match run_step(painter, "Pre-commit validation", &hooks, Criticality::Advisory) {
      Ok(output) if !output.success => {
        painter.println(Status::Warn, "Pre-commit failed - continuing anyway");
      }
      Ok(_) => {}
      Err(err) if err.is_tool_missing() => {
        painter.println(Status::Warn, "pre-commit not installed - skipping hooks");
      }
      Err(err) => return Err(err),
    }
  }

  let production = ToolCommand::new(&mkdocs, &ctx.root)?
    .args(["build", "--strict", "--clean", "--site-dir"])
    .arg(dist.to_string_lossy());
  let built = run_step(painter, "Building production site", &production, Criticality::Critical)?;
  require(built.success, "Building production site")?;

  if !options.skip_validation {
    println!();
    if run_validate(ctx, &ValidateOptions::default())? {
      painter.println(Status::Pass, "Comprehensive validation - PASSED");
    } else {
      painter.println(Status::Warn, "Validation warnings - review output");
    }
    println!();
  }

  painter.println(Status::Progress, "Copying repository files...");
  for copied in copy_extra_files(&ctx.root, &dist, &ctx.config.build.extra_files)? {
    tracing::debug!(file = %copied.display(), "copied into dist");
  }

  let info = render_build_info(
    chrono::Local::now().naive_local(),
    &ctx.config.build.site_url,
    &utils::display_posix(&ctx.config.paths.dist_dir),
  );
  let info_path = dist.join(BUILD_INFO_FILE);
  fs::write(&info_path, info).with_context(|| format!("Failed to write {}", info_path.display()))?;

  let elapsed = start.elapsed().as_secs_f64();
  painter.println(Status::Pass, &format!("Production build completed in {:.1}s", elapsed));
  let dist_display = utils::display_posix(&ctx.config.paths.dist_dir);
  painter.println(
    Status::Info,
    &format!("Ready for deployment: ./{}/", dist_display.trim_end_matches('/')),
  );
  Ok(dist)
}

fn require(success: bool, step: &str) -> DocsResult<()> {
  if success {
    Ok(())
  } else {
    Err(DocsError::with_help(
      format!("{} failed", step),
      "Fix the errors reported above and re-run `docgate build`.",
    ))
  }
}

/// Copy each existing file into `dist`; missing files are skipped
fn copy_extra_files(root: &Path, dist: &Path, files: &[PathBuf]) -> DocsResult<Vec<PathBuf>> {
  fs::create_dir_all(dist).with_context(|| format!("Failed to create {}", dist.display()))?;

  let mut copied = Vec::new();
  for file in files {
    let source = if file.is_absolute() { file.clone() } else { root.join(file) };
    let Some(name) = source.file_name() else {
      continue;
    };
    if !source.is_file() {
      tracing::debug!(file = %source.display(), "extra file missing, skipped");
      continue;
    }
    let target = dist.join(name);
    fs::copy(&source, &target)
      .with_context(|| format!("Failed to copy {} to {}", source.display(), target.display()))?;
    copied.push(target);
  }
  Ok(copied)
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn test_copy_extra_files_skips_missing() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("README.md"), "# readme").unwrap();
    let dist = temp.path().join("dist");

    let copied = copy_extra_files(
      temp.path(),
      &dist,
      &[PathBuf::from("README.md"), PathBuf::from("LICENSE")],
    )
    .unwrap();
    assert_eq!(copied, vec![dist.join("README.md")]);
    assert_eq!(fs::read_to_string(dist.join("README.md")).unwrap(), "# readme");
    assert!(!dist.join("LICENSE").exists());
  }

  #[test]
  fn test_require_names_step() {
    assert!(require(true, "Cleaning previous builds").is_ok());
    let err = require(false, "Building production site").unwrap_err();
    assert_eq!(err.to_string(), "Building production site failed");
    assert!(err.help_message().is_some());
  }
}
