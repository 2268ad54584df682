//! Errors raised before a request reaches the API
//!
//! Configuration, form validation and missing credentials are reported through
//! [`Error`]. Each carries an [`ErrorCode`] that decides the process exit
//! code of the command line, and optionally a hint telling the user what to
//! do next.

use std::fmt;
use std::path::Path;
use thiserror::Error;

/// What went wrong, grouped by how the command line exits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum ErrorCode {
    ConfigNotFound,
    ConfigUnreadable,
    ConfigInvalid,
    Validation,
    MissingCredentials,
}

impl ErrorCode {
    /// Stable identifier, e.g. `config_not_found`
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConfigNotFound => "config_not_found",
            Self::ConfigUnreadable => "config_unreadable",
            Self::ConfigInvalid => "config_invalid",
            Self::Validation => "validation",
            Self::MissingCredentials => "missing_credentials",
        }
    }

    /// Process exit code for a command failing with this error
    #[must_use]
    pub fn exit_code(self) -> i32 {
        match self {
            Self::ConfigNotFound | Self::ConfigUnreadable | Self::ConfigInvalid => {
                exit_codes::CONFIG_ERROR
            }
            Self::Validation => exit_codes::VALIDATION_ERROR,
            Self::MissingCredentials => exit_codes::AUTH_ERROR,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error with a code, the thing it concerns and a hint
#[derive(Error, Debug)]
pub struct Error {
    /// Kind of failure
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// What was being done, e.g. the file being read
    pub context: Option<String>,
    /// Next step for the user
    pub hint: Option<String>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(context) => write!(f, "{context}: {}", self.message)?,
            None => f.write_str(&self.message)?,
        }
        if let Some(hint) = &self.hint {
            write!(f, "\n  hint: {hint}")?;
        }
        Ok(())
    }
}

impl Error {
    /// Create an error without context or hint
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            hint: None,
            source: None,
        }
    }

    /// Record what was being done
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Suggest a next step
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    #[must_use]
    fn caused_by(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Explicit config path that does not exist
    pub fn config_not_found(path: &Path) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Configuration file not found: {}", path.display()),
        )
        .with_hint("Create a .knocker.toml file or point --config at an existing one")
    }

    /// Form or argument input that failed validation
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Validation, message)
    }

    /// A command needs an account but none was configured
    pub fn missing_credentials() -> Self {
        Self::new(ErrorCode::MissingCredentials, "No credentials configured")
            .with_hint("Set KNOCKER_EMAIL and KNOCKER_PASSWORD or pass --email/--password")
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorCode::ConfigUnreadable, err.to_string()).caused_by(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::new(ErrorCode::ConfigInvalid, err.message().to_string()).caused_by(err)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Exit codes of the `knocker` command line
#[allow(missing_docs)]
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    pub const VALIDATION_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const AUTH_ERROR: i32 = 4;
    pub const NOT_FOUND: i32 = 5;
}

/// Attach context to a failing [`Result`]
pub trait ResultExt<T> {
    /// Record what was being done when the error happened
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ErrorCode::ConfigInvalid.exit_code(), exit_codes::CONFIG_ERROR);
        assert_eq!(ErrorCode::Validation.exit_code(), exit_codes::VALIDATION_ERROR);
        assert_eq!(ErrorCode::MissingCredentials.exit_code(), exit_codes::AUTH_ERROR);
    }

    #[test]
    fn test_display_with_context_and_hint() {
        let err = Error::config_not_found(Path::new("/etc/knocker.toml"));
        assert_eq!(
            err.to_string(),
            "Configuration file not found: /etc/knocker.toml\n  \
             hint: Create a .knocker.toml file or point --config at an existing one"
        );

        let err = Error::validation("slug is too short").with_context("status page form");
        assert_eq!(err.to_string(), "status page form: slug is too short");
    }

    #[test]
    fn test_io_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let result: std::result::Result<(), _> = Err(io);
        let err = result.context("Reading .knocker.toml").unwrap_err();

        assert_eq!(err.code, ErrorCode::ConfigUnreadable);
        assert_eq!(err.to_string(), "Reading .knocker.toml: denied");
        assert!(std::error::Error::source(&err).is_some());
    }
}
