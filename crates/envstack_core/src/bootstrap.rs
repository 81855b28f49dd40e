//! Process environment bootstrap.
//!
//! Everything else in this crate is free of side effects. This module is the
//! one place that reads the mode indicator from the process environment and
//! writes loaded values back into it, and is meant to be called once from a
//! program's entry point.
//!
//! For a mode `M` the files are, lowest precedence first:
//!
//! ```text
//! .env
//! .env.local
//! .env.M
//! .env.M.local
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use envstack_core::bootstrap::{inject, BootstrapOptions};
//!
//! fn main() -> Result<(), envstack_core::EnvError> {
//!     inject(&BootstrapOptions::default())?;
//!     // std::env::var now sees the values from the .env chain
//!     Ok(())
//! }
//! ```

use crate::{
    environment::EnvironmentMapping,
    errors::{EnvError, EnvResult},
    loader::{load_environment, LoadOptions},
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[cfg(test)]
#[path = "bootstrap_tests.rs"]
mod tests;

/// The variable holding the mode when none is configured.
pub const DEFAULT_MODE_VARIABLE: &str = "APP_ENV";

/// The mode for which loading reports skipped and loaded files.
pub const DEVELOPMENT_MODE: &str = "development";

/// Settings for [`inject`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapOptions {
    /// Name of the process variable holding the mode.
    pub mode_variable: String,

    /// Directory the files are resolved against. The current working
    /// directory when `None`.
    pub root: Option<PathBuf>,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            mode_variable: DEFAULT_MODE_VARIABLE.to_string(),
            root: None,
        }
    }
}

/// The file chain for `mode`, lowest precedence first.
pub fn mode_files(mode: &str) -> Vec<String> {
    vec![
        ".env".to_string(),
        ".env.local".to_string(),
        format!(".env.{mode}"),
        format!(".env.{mode}.local"),
    ]
}

/// Reads the mode from the process environment.
///
/// # Errors
///
/// * `EnvError::MissingMode` - The variable is unset, empty or not Unicode
pub fn read_mode(variable: &str) -> EnvResult<String> {
    match std::env::var(variable) {
        Ok(mode) if !mode.trim().is_empty() => Ok(mode),
        _ => Err(EnvError::MissingMode {
            variable: variable.to_string(),
        }),
    }
}

/// Loads the file chain for `mode` without touching the process environment.
///
/// Files are reported at `info` level when `mode` is `development`.
///
/// # Errors
///
/// * `EnvError::FileAccess` - A file exists but cannot be read
pub fn load_for_mode(root: Option<&Path>, mode: &str) -> EnvResult<EnvironmentMapping> {
    let options = LoadOptions {
        debug: mode == DEVELOPMENT_MODE,
        ..LoadOptions::default()
    };
    let files = mode_files(mode);
    load_environment(root, files.as_slice(), options)
}

/// Writes every entry into the process environment, replacing existing
/// values.
///
/// All entries are checked first; nothing is written if any is rejected.
///
/// # Errors
///
/// * `EnvError::ProcessEnvironment` - A key is empty or contains `=` or a NUL
///   byte, or a value contains a NUL byte
pub fn apply_to_process(mapping: &EnvironmentMapping) -> EnvResult<()> {
    for (key, value) in mapping.iter() {
        check_process_entry(key, value)?;
    }

    for (key, value) in mapping.iter() {
        std::env::set_var(key, value);
    }
    debug!(message = "Applied environment to process", keys = mapping.len());
    Ok(())
}

fn check_process_entry(key: &str, value: &str) -> EnvResult<()> {
    let reason = if key.is_empty() {
        "the name is empty"
    } else if key.contains(&['=', '\0'][..]) {
        "the name contains `=` or a NUL byte"
    } else if value.contains('\0') {
        "the value contains a NUL byte"
    } else {
        return Ok(());
    };

    Err(EnvError::ProcessEnvironment {
        key: key.to_string(),
        reason: reason.to_string(),
    })
}

/// Reads the mode, loads its file chain and applies it to the process
/// environment. Returns the applied mapping.
///
/// # Errors
///
/// * `EnvError::MissingMode` - The mode variable is not set
/// * `EnvError::FileAccess` - A file exists but cannot be read
/// * `EnvError::ProcessEnvironment` - A loaded entry cannot be stored in the
///   process environment
pub fn inject(options: &BootstrapOptions) -> EnvResult<EnvironmentMapping> {
    let mode = read_mode(&options.mode_variable)?;
    let mapping = load_for_mode(options.root.as_deref(), &mode)?;

    apply_to_process(&mapping)?;
    info!(message = "Environment injected", mode = %mode, keys = mapping.len());

    Ok(mapping)
}
