//! Layered environment file loading and validation.
//!
//! Loads `KEY=value` declarations from an ordered list of files (such as
//! `.env`, `.env.local`, `.env.production`), merges them so later files
//! override earlier ones, and validates the result against a typed schema.
//!
//! The pipeline is:
//!
//! ```text
//! files ──► parser (one layer per file) ──► merger ──► EnvironmentMapping
//!                                                          │
//!                                         Schema ──► validate ──► ValidatedEnvironment
//! ```
//!
//! Parsing, merging, loading and validation have no side effects. Writing
//! values into the process environment is left to [`bootstrap`], which a
//! program calls explicitly from its entry point.
//!
//! # Examples
//!
//! ```no_run
//! use envstack_core::{load_environment, rules, validate, LoadOptions, Schema};
//!
//! let env = load_environment(None, &[".env", ".env.local"], LoadOptions::default())?;
//!
//! let schema = Schema::new()
//!     .field("DATABASE_URL", rules::url())
//!     .field("PORT", rules::port());
//!
//! let validated = validate(&env, &schema)?;
//! println!("listening on {}", validated.get_i64("PORT").unwrap_or_default());
//! # Ok::<(), envstack_core::EnvError>(())
//! ```

pub mod bootstrap;
pub mod environment;
pub mod errors;
pub mod loader;
pub mod merger;
pub mod parser;
pub mod rules;
pub mod schema;
pub mod schema_file;

#[cfg(test)]
mod integration_tests;

pub use environment::{EnvironmentLayer, EnvironmentMapping};
pub use errors::{EnvError, EnvResult};
pub use loader::{
    load_environment, EnvLoader, FileSource, FsFileSource, InMemoryFileSource, LoadOptions,
};
pub use merger::{merge, merge_into};
pub use parser::{declarations, parse, QuoteKind, RawDeclaration};
pub use rules::RuleExt;
pub use schema::{
    validate, RuleOutcome, Schema, SchemaRule, ValidatedEnvironment, ValidationIssue,
};
pub use schema_file::SchemaFile;
