//! Deployment summary written into the production output

use chrono::NaiveDateTime;

pub const BUILD_INFO_FILE: &str = "BUILD_INFO.md";

/// Contents of `BUILD_INFO.md`
///
/// `build_dir` is shown as given, with a trailing `/`.
pub fn render_build_info(built: NaiveDateTime, site_url: &str, build_dir: &str) -> String {
  let build_dir = build_dir.trim_end_matches('/');
  format!(
    "# Deployment Info\nBuilt: {}\nSite URL: {}\nBuild directory: {}/\n",
    built.format("%Y-%m-%d %H:%M:%S"),
    site_url,
    build_dir
  )
}
