//! Environment loading error types.
//!
//! Domain-specific errors for file loading, schema handling,
//! validation and process bootstrap.
//!
//! Malformed declaration lines and missing files are deliberately absent from
//! this list: the parser skips the former and the loader skips the latter.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Environment loading and validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvError {
    /// A file exists but could not be read as UTF-8 text.
    #[error("Failed to access environment file: {path} - {reason}")]
    FileAccess { path: String, reason: String },

    /// The mode indicator used to select the file chain is not set.
    #[error("`{variable}` must be set when injecting environment variables")]
    MissingMode { variable: String },

    /// A schema rule rejected the value of a key.
    #[error(
        "Invalid environment variable: key {key}, parsed value {}: {message}",
        display_input(.input)
    )]
    ValidationFailed {
        key: String,
        input: Option<String>,
        message: String,
    },

    /// A schema rule did not produce its answer synchronously.
    #[error("Validation of key \"{key}\" is not synchronous")]
    AsynchronousRule { key: String },

    /// A schema file could not be parsed.
    #[error("Failed to parse schema: {reason}")]
    SchemaParse { reason: String },

    /// Validated values do not fit the requested settings type.
    #[error("Failed to deserialize validated environment: {reason}")]
    Deserialize { reason: String },

    /// A loaded entry cannot be stored in the process environment.
    #[error("Cannot set process environment variable {key}: {reason}")]
    ProcessEnvironment { key: String, reason: String },

    /// A schema file parsed but describes an unusable rule.
    #[error("Invalid schema entry: {key} - {reason}")]
    InvalidSchema { key: String, reason: String },
}

fn display_input(input: &Option<String>) -> String {
    match input {
        Some(value) => format!("{:?}", value),
        None => "undefined".to_string(),
    }
}

/// Result type alias for environment operations.
pub type EnvResult<T> = Result<T, EnvError>;
