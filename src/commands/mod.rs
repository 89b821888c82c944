//! CLI commands for docgate
//!
//! - **validate**: Run the enabled checks and gate on the summary
//! - **build**: Production build into the dist directory
//! - **pdf**: Export the print page of the built site to PDF
//!
//! All commands accept `&DocsContext` so config is loaded once.

pub mod build;
pub mod pdf;
pub mod validate;

pub use build::{BuildOptions, run_build};
pub use pdf::{PdfOptions, run_pdf};
pub use validate::{ValidateOptions, run_validate};
