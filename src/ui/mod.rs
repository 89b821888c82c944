//! Terminal output helpers

pub mod style;

pub use style::{ColorMode, Painter, Status};
