//! Configuration loading and schema definitions
//!
//! Settings read from `.knocker.toml` and used as defaults by the CLI.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
