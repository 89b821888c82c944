//! Output artifacts beyond the site itself: deployment info and the PDF manual

pub mod build_info;
pub mod pdf;

pub use build_info::{BUILD_INFO_FILE, render_build_info};
pub use pdf::{export_pdf, find_browser, find_print_page};
