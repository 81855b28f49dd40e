use clap::{Args, ValueEnum};
use envstack_core::EnvironmentMapping;
use tracing::{debug, instrument};

use crate::errors::Error;
use crate::source::SourceArgs;

#[cfg(test)]
#[path = "load_cmd_tests.rs"]
mod tests;

/// Output formats for the merged environment
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `KEY=value` lines that parse back to the same values
    #[default]
    Dotenv,
    /// A JSON object
    Json,
}

/// Arguments for the load command
#[derive(Args, Debug, Clone)]
pub struct LoadArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Dotenv)]
    pub format: OutputFormat,
}

/// Execute the load command, returning the rendered environment
#[instrument]
pub fn execute(args: &LoadArgs) -> Result<String, Error> {
    let mapping = args.source.load()?;
    debug!(message = "Environment loaded", keys = mapping.len());
    render(&mapping, args.format)
}

/// Render a mapping in the requested format
pub fn render(mapping: &EnvironmentMapping, format: OutputFormat) -> Result<String, Error> {
    match format {
        OutputFormat::Dotenv => Ok(mapping.to_dotenv()),
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(mapping)?)),
    }
}
