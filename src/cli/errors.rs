//! CLI-specific error types
//!
//! All CLI errors end the process with a non-zero exit status.

use std::fmt;
use std::io;

use crate::schema::SchemaError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout)
    IoError,
    /// Schema definitions could not be loaded
    SchemaError,
    /// Requested type is not among the loaded schemas
    UnknownType,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "RC_CLI_CONFIG_ERROR",
            Self::IoError => "RC_CLI_IO_ERROR",
            Self::SchemaError => "RC_CLI_SCHEMA_ERROR",
            Self::UnknownType => "RC_CLI_UNKNOWN_TYPE",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Schema loading error
    pub fn schema_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::SchemaError, msg)
    }

    /// Unknown type
    pub fn unknown_type(name: &str) -> Self {
        Self::new(
            CliErrorCode::UnknownType,
            format!("Type '{}' is not defined in the schema directory", name),
        )
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        Self::schema_error(e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(CliError::config_error("x").code_str(), "RC_CLI_CONFIG_ERROR");
        assert_eq!(CliError::unknown_type("Person").code_str(), "RC_CLI_UNKNOWN_TYPE");
        assert!(CliError::unknown_type("Person").message().contains("Person"));
    }

    #[test]
    fn test_from_schema_error() {
        let err: CliError = SchemaError::DuplicateType("Person".into()).into();
        assert_eq!(err.code(), &CliErrorCode::SchemaError);
        assert!(err.to_string().starts_with("RC_CLI_SCHEMA_ERROR: "));
    }
}
