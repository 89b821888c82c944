//! End-to-end tests that drive the `docgate` binary against a scratch project
//!
//! External tools are replaced by small sh scripts configured through `docgate.toml`.

#![cfg(unix)]

mod helpers;
mod test_build;
mod test_pdf;
mod test_validate;
