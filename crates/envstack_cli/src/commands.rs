//! Command modules for the envstack CLI.
//!
//! - `load_cmd`: print the merged environment
//! - `check_cmd`: validate an environment against a schema file
//! - `run_cmd`: run a program with the merged environment applied

pub mod check_cmd;
pub mod load_cmd;
pub mod run_cmd;
