use clap::{Parser, Subcommand};

use envstack_cli::commands::{check_cmd::CheckArgs, load_cmd::LoadArgs, run_cmd::RunArgs};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

/// envstack CLI: Load layered dotenv files and validate them against a schema
#[derive(Parser)]
#[command(name = "envstack")]
#[command(
    about = "Load layered dotenv files and validate them against a schema",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the merged environment
    Load(LoadArgs),

    /// Validate an environment against a schema file
    Check(CheckArgs),

    /// Run a program with the merged environment applied
    Run(RunArgs),

    /// Show the CLI version
    Version,
}

fn main() {
    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_env("ENVSTACK_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Load(args) => match envstack_cli::commands::load_cmd::execute(args) {
            Ok(output) => print!("{output}"),
            Err(e) => {
                error!("Error: {e}");
                std::process::exit(1);
            }
        },
        Commands::Check(args) => match envstack_cli::commands::check_cmd::execute(args) {
            Ok(output) => print!("{output}"),
            Err(e) => {
                error!("Error: {e}");
                std::process::exit(1);
            }
        },
        Commands::Run(args) => match envstack_cli::commands::run_cmd::execute(args) {
            Ok(code) => std::process::exit(code),
            Err(e) => {
                error!("Error: {e}");
                std::process::exit(1);
            }
        },
        Commands::Version => {
            println!(
                "envstack version {}",
                option_env!("ENVSTACK_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
            );
        }
    }
}
