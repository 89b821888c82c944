//! Documentation checks and the runner that executes them
//!
//! Every validation implements the [`Check`] trait. The runner executes enabled checks one at
//! a time, in a fixed order, and turns every outcome (including missing tools and panics) into
//! exactly one [`CheckResult`].
//!
//! # Built-in Checks
//!
//! - **markdown**: markdownlint-cli2 over the project's Markdown (critical)
//! - **site-build**: `mkdocs build --clean --strict` (critical)
//! - **openapi**: `$ref` resolution and structure of the OpenAPI document (critical)
//! - **links**: broken-link-checker against a transient `mkdocs serve` (advisory)
//! - **style**: Vale over `docs/**/*.md` (advisory)
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::checks::create_default_runner;
//! use crate::core::config::CheckSelection;
//!
//! let runner = create_default_runner(CheckSelection::all());
//! let results = runner.run_all(&ctx);
//!
//! for result in results.iter().filter(|r| !r.passed) {
//!   println!("{}: {}", result.name, result.output);
//! }
//! ```

mod links;
mod markdown;
mod openapi;
mod runner;
mod site_build;
mod style;
mod trait_def;

pub use runner::{create_default_runner, run_step};
#[cfg(test)]
pub use trait_def::CheckStatus;
pub use trait_def::{CheckResult, Criticality};
