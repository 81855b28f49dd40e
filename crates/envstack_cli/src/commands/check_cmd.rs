use std::path::PathBuf;

use clap::Args;
use envstack_core::{validate, EnvironmentMapping, SchemaFile};
use tracing::{debug, info, instrument};

use crate::errors::Error;
use crate::source::SourceArgs;

#[cfg(test)]
#[path = "check_cmd_tests.rs"]
mod tests;

/// Arguments for the check command
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Path to the TOML schema file
    #[arg(short, long)]
    pub schema: PathBuf,

    /// Validate the current process environment instead of loading files
    #[arg(long)]
    pub process: bool,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// Execute the check command, returning the validated values as JSON
#[instrument]
pub fn execute(args: &CheckArgs) -> Result<String, Error> {
    let schema = SchemaFile::load(&args.schema)?.compile()?;
    debug!(message = "Schema compiled", path = ?args.schema, keys = schema.len());

    let mapping = if args.process {
        EnvironmentMapping::from_process()
    } else {
        args.source.load()?
    };

    let validated = validate(&mapping, &schema)?;
    info!(message = "Environment is valid", keys = validated.len());

    Ok(format!("{}\n", serde_json::to_string_pretty(&validated)?))
}
