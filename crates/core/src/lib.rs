//! Core utilities for the Knocker client crates
//!
//! This crate provides functionality shared by the API client, the CLI and
//! the telemetry crate:
//!
//! - **Errors**: coded errors with context and a hint, mapped to exit codes
//! - **Validation**: a fluent validator reporting failures by field path
//! - **Monitor settings**: accepted status code catalogue, interval and
//!   threshold options, header parsing
//! - **Configuration**: TOML-based configuration with discovery
//!
//! # Example
//!
//! ```rust
//! use knocker_core::monitor_settings::normalize_status_codes;
//! use knocker_core::validation::Validator;
//!
//! let codes = normalize_status_codes(&["2xx", "404"]);
//! assert!(codes.contains(&200) && codes.contains(&404));
//!
//! let result = Validator::new()
//!     .required("name", "api-gateway")
//!     .max_length("name", "api-gateway", 255)
//!     .validate();
//! assert!(result.is_valid());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod monitor_settings;
pub mod validation;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::monitor_settings::{normalize_status_codes, parse_headers};
    pub use crate::validation::{ValidationError, ValidationResult, Validator};
}
