//! Selection of the environment files a command works on.
//!
//! Files are given either explicitly with `--file` (repeatable, lowest
//! precedence first) or implicitly through a mode, in which case the
//! standard chain `.env`, `.env.local`, `.env.<mode>`, `.env.<mode>.local`
//! is used. Without either flag the mode is read from the mode variable
//! (`APP_ENV` by default).

use std::path::PathBuf;

use clap::Args;
use envstack_core::{
    bootstrap::{mode_files, read_mode, DEFAULT_MODE_VARIABLE, DEVELOPMENT_MODE},
    load_environment, EnvironmentMapping, LoadOptions,
};
use tracing::debug;

use crate::errors::Error;

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;

/// Arguments shared by every command that loads environment files.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Directory the files are resolved against [default: current directory]
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Load the standard file chain for this mode
    #[arg(short, long, conflicts_with = "files")]
    pub mode: Option<String>,

    /// Load these files, lowest precedence first
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub files: Vec<String>,

    /// Variable holding the mode when neither --mode nor --file is given
    #[arg(long, default_value = DEFAULT_MODE_VARIABLE)]
    pub mode_variable: String,

    /// Keep keys whose value is empty or blank
    #[arg(long)]
    pub keep_empty: bool,

    /// Report skipped and loaded files
    #[arg(short, long)]
    pub debug: bool,
}

/// The files to load and the options to load them with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadPlan {
    pub files: Vec<String>,
    pub options: LoadOptions,
}

impl SourceArgs {
    /// Works out which files to load.
    ///
    /// Development mode turns on file reporting as if `--debug` was given.
    pub fn plan(&self) -> Result<LoadPlan, Error> {
        let mut options = LoadOptions {
            empty_as_undefined: !self.keep_empty,
            debug: self.debug,
        };

        if !self.files.is_empty() {
            return Ok(LoadPlan {
                files: self.files.clone(),
                options,
            });
        }

        let mode = match &self.mode {
            Some(mode) if mode.trim().is_empty() => {
                return Err(Error::InvalidArguments("--mode cannot be empty".to_string()))
            }
            Some(mode) => mode.clone(),
            None => read_mode(&self.mode_variable)?,
        };

        options.debug |= mode == DEVELOPMENT_MODE;
        Ok(LoadPlan {
            files: mode_files(&mode),
            options,
        })
    }

    /// Loads and merges the selected files.
    pub fn load(&self) -> Result<EnvironmentMapping, Error> {
        let plan = self.plan()?;
        debug!(message = "Loading environment files", files = ?plan.files, root = ?self.root);

        let mapping = load_environment(self.root.as_deref(), plan.files.as_slice(), plan.options)?;
        Ok(mapping)
    }
}
