//! Command-line interface module.

mod args;
pub mod build;
pub mod manifest;
pub mod route;

pub use args::{Cli, Commands};
