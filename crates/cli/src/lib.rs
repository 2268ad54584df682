//! Terminal helpers for the `knocker` command line
//!
//! - Status messages and tone colouring
//! - Column-aligned tables
//! - Spinners for requests in flight
//! - Output format selection

#![warn(missing_docs)]

pub mod output;
pub mod progress;
pub mod table;

pub use output::{paint, OutputFormat, Status};
pub use table::Table;
