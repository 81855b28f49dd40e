use std::io;

use envstack_core::EnvError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the envstack CLI application.
#[derive(Error, Debug)]
pub enum Error {
    /// Loading, parsing or validating the environment failed.
    ///
    /// Validation failures carry the key, the raw input and the rule's
    /// message.
    #[error(transparent)]
    Env(#[from] EnvError),

    /// Invalid command-line arguments were provided.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The child process for `run` could not be started.
    #[error("Failed to run command `{command}`: {source}")]
    CommandFailed { command: String, source: io::Error },

    /// Output could not be rendered as JSON.
    #[error("Failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}
