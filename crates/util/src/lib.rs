//! Small helpers shared by the Stepform crates.

mod normalization;
mod path_processing;

pub use normalization::*;
pub use path_processing::expand_tilde;
