//! Core engine for docgate
//!
//! - **config**: docgate.toml parsing, defaults and the check selection
//! - **context**: Project context built once in `main`
//! - **error**: Error types with contextual help messages
//! - **process**: External tool invocation and child supervision
//! - **server**: Transient doc server lifecycle for the link check
//! - **summary**: Result aggregation and the summary table

pub mod config;
pub mod context;
pub mod error;
pub mod process;
pub mod server;
pub mod summary;
