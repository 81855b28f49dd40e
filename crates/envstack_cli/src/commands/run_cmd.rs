use std::process::Command;

use clap::Args;
use tracing::{debug, instrument};

use crate::errors::Error;
use crate::source::SourceArgs;

#[cfg(test)]
#[path = "run_cmd_tests.rs"]
mod tests;

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// The program to run followed by its arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
    pub command: Vec<String>,
}

/// Run a program with the loaded variables added to its environment.
///
/// Loaded values override inherited ones. Returns the child's exit code, or
/// 1 when it was terminated by a signal.
#[instrument]
pub fn execute(args: &RunArgs) -> Result<i32, Error> {
    let (program, program_args) = args
        .command
        .split_first()
        .ok_or_else(|| Error::InvalidArguments("no command given".to_string()))?;

    let mapping = args.source.load()?;
    debug!(message = "Running command", program = %program, keys = mapping.len());

    let status = Command::new(program)
        .args(program_args)
        .envs(mapping.iter())
        .status()
        .map_err(|source| Error::CommandFailed {
            command: program.clone(),
            source,
        })?;

    debug!(message = "Command finished", status = %status);
    Ok(status.code().unwrap_or(1))
}
