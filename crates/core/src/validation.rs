//! Form and input validation
//!
//! Failures are reported per field path (`config.url`,
//! `elements.0.monitors.1.name`) with a human-readable message, so a form
//! layer can attach each message to the input that produced it.
//!
//! # Example
//!
//! ```rust
//! use knocker_core::validation::Validator;
//!
//! let result = Validator::new()
//!     .required("name", "")
//!     .range("interval", 5, 10, i64::MAX)
//!     .validate();
//!
//! assert!(!result.is_valid());
//! assert_eq!(result.errors()[0].field, "name");
//! ```

use crate::error::{Error, ErrorCode, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://[^\s/?#@]+(:\d+)?([/?#]\S*)?$").expect("url regex")
});

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

static INT64_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+$").expect("int64 regex"));

/// Validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Dotted path of the field that failed validation
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// Create a new empty result
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if validation passed
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get all errors
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// First message reported for `field`, if any
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, code: &str, message: impl Into<String>) {
        self.errors.push(ValidationError {
            field: field.into(),
            message: message.into(),
            code: code.to_string(),
        });
    }

    /// Merge another result, prefixing each of its field paths with `prefix`
    pub fn merge_nested(&mut self, prefix: &str, other: ValidationResult) {
        self.errors.extend(other.errors.into_iter().map(|mut e| {
            e.field = join_path(prefix, &e.field);
            e
        }));
    }

    /// Convert to Result type
    pub fn to_result(self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            let messages: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
            Err(Error::new(
                ErrorCode::Validation,
                format!("Validation failed: {}", messages.join("; ")),
            ))
        }
    }
}

fn join_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else if field.is_empty() {
        prefix.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}

/// Fluent validator builder
#[derive(Debug, Default)]
pub struct Validator {
    result: ValidationResult,
}

impl Validator {
    /// Create a new validator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate that a field is not blank
    #[must_use]
    pub fn required(mut self, field: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.result.add_error(field, "REQUIRED", "Field is required");
        }
        self
    }

    /// Validate that a field is not blank, with a custom message
    #[must_use]
    pub fn required_msg(mut self, field: &str, value: &str, message: &str) -> Self {
        if value.trim().is_empty() {
            self.result.add_error(field, "REQUIRED", message);
        }
        self
    }

    /// Validate minimum length in characters
    #[must_use]
    pub fn min_length(mut self, field: &str, value: &str, min: usize) -> Self {
        if value.chars().count() < min {
            self.result.add_error(
                field,
                "MIN_LENGTH",
                format!("Must be at least {min} characters"),
            );
        }
        self
    }

    /// Validate maximum length in characters
    #[must_use]
    pub fn max_length(mut self, field: &str, value: &str, max: usize) -> Self {
        if value.chars().count() > max {
            self.result.add_error(
                field,
                "MAX_LENGTH",
                format!("Must be at most {max} characters"),
            );
        }
        self
    }

    /// Validate an absolute URL with a scheme and host
    #[must_use]
    pub fn url(mut self, field: &str, value: &str) -> Self {
        if !URL_RE.is_match(value.trim()) {
            self.result.add_error(field, "URL", "Must be a valid URL");
        }
        self
    }

    /// Validate an email address
    #[must_use]
    pub fn email(mut self, field: &str, value: &str) -> Self {
        if !EMAIL_RE.is_match(value) {
            self.result
                .add_error(field, "EMAIL", "Must be a valid email address");
        }
        self
    }

    /// Validate a decimal int64 identifier rendered as a string
    #[must_use]
    pub fn int64_string(mut self, field: &str, value: &str) -> Self {
        if !INT64_RE.is_match(value) || value.parse::<i64>().is_err() {
            self.result
                .add_error(field, "INT64", "Expected int64 string");
        }
        self
    }

    /// Validate that a value is in a list of allowed values
    #[must_use]
    pub fn one_of(mut self, field: &str, value: &str, allowed: &[&str]) -> Self {
        if !allowed.contains(&value) {
            self.result.add_error(
                field,
                "ONE_OF",
                format!("Must be one of: {}", allowed.join(", ")),
            );
        }
        self
    }

    /// Validate an inclusive numeric range
    #[must_use]
    pub fn range<T: PartialOrd + std::fmt::Display>(
        mut self,
        field: &str,
        value: T,
        min: T,
        max: T,
    ) -> Self {
        if value < min {
            self.result
                .add_error(field, "RANGE", format!("Must be at least {min}"));
        } else if value > max {
            self.result
                .add_error(field, "RANGE", format!("Must be at most {max}"));
        }
        self
    }

    /// Validate an inclusive range with a custom message for the lower bound
    #[must_use]
    pub fn at_least<T: PartialOrd + std::fmt::Display>(
        mut self,
        field: &str,
        value: T,
        min: T,
        message: &str,
    ) -> Self {
        if value < min {
            self.result.add_error(field, "RANGE", message);
        }
        self
    }

    /// Validate that a collection is not empty
    #[must_use]
    pub fn non_empty<T>(mut self, field: &str, values: &[T], message: &str) -> Self {
        if values.is_empty() {
            self.result.add_error(field, "NON_EMPTY", message);
        }
        self
    }

    /// Add a custom validation
    #[must_use]
    pub fn custom<F>(mut self, field: &str, f: F) -> Self
    where
        F: FnOnce() -> Option<String>,
    {
        if let Some(message) = f() {
            self.result.add_error(field, "CUSTOM", message);
        }
        self
    }

    /// Fold a nested result under `prefix`
    #[must_use]
    pub fn nested(mut self, prefix: &str, nested: ValidationResult) -> Self {
        self.result.merge_nested(prefix, nested);
        self
    }

    /// Complete validation and return result
    #[must_use]
    pub fn validate(self) -> ValidationResult {
        self.result
    }
}
