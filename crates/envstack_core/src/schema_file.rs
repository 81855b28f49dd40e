//! Declarative schema files.
//!
//! A schema file is TOML with one `[[var]]` table per key. Tables are checked
//! in the order they appear.
//!
//! ```toml
//! [[var]]
//! key = "APP_ENV"
//! type = "one_of"
//! values = ["development", "test", "production"]
//!
//! [[var]]
//! key = "PORT"
//! type = "port"
//! default = "3000"
//!
//! [[var]]
//! key = "SENTRY_DSN"
//! type = "url"
//! optional = true
//! ```

use crate::{
    errors::{EnvError, EnvResult},
    rules::{self, RuleExt},
    schema::{Schema, SchemaRule},
};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

#[cfg(test)]
#[path = "schema_file_tests.rs"]
mod tests;

/// The kind of check applied to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarType {
    String,
    NonEmpty,
    Integer,
    Port,
    Boolean,
    OneOf,
    Url,
}

/// One `[[var]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VarSpec {
    pub key: String,

    #[serde(rename = "type", default = "default_var_type")]
    pub var_type: VarType,

    /// Allowed values for `one_of`.
    #[serde(default)]
    pub values: Vec<String>,

    /// Lower bound for `integer`.
    pub min: Option<i64>,

    /// Upper bound for `integer`.
    pub max: Option<i64>,

    /// Text checked in place of an absent key.
    pub default: Option<String>,

    /// Accept an absent key, yielding `null`.
    #[serde(default)]
    pub optional: bool,
}

fn default_var_type() -> VarType {
    VarType::String
}

/// The parsed contents of a schema file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaFile {
    #[serde(default, rename = "var")]
    pub vars: Vec<VarSpec>,
}

impl SchemaFile {
    /// Parses schema file text.
    ///
    /// # Errors
    ///
    /// * `EnvError::SchemaParse` - The text is not valid TOML or does not
    ///   match the schema file layout
    pub fn from_toml(content: &str) -> EnvResult<Self> {
        toml::from_str(content).map_err(|e| EnvError::SchemaParse {
            reason: e.to_string(),
        })
    }

    /// Reads and parses a schema file.
    ///
    /// # Errors
    ///
    /// * `EnvError::FileAccess` - The file cannot be read
    /// * `EnvError::SchemaParse` - The content is not a valid schema file
    pub fn load(path: &Path) -> EnvResult<Self> {
        debug!(message = "Loading schema file", path = ?path);
        let content = fs::read_to_string(path).map_err(|e| EnvError::FileAccess {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Builds the [`Schema`] described by this file.
    ///
    /// # Errors
    ///
    /// * `EnvError::InvalidSchema` - A key is declared twice, a `one_of` has
    ///   no values, bounds are given for a non-integer type, or a key has both
    ///   `default` and `optional`
    pub fn compile(&self) -> EnvResult<Schema> {
        let mut schema = Schema::new();
        let mut seen = HashSet::new();

        for spec in &self.vars {
            if !seen.insert(spec.key.as_str()) {
                return Err(invalid(spec, "key is declared more than once"));
            }
            schema.insert(spec.key.clone(), compile_var(spec)?);
        }

        Ok(schema)
    }
}

fn compile_var(spec: &VarSpec) -> EnvResult<Box<dyn SchemaRule>> {
    if spec.default.is_some() && spec.optional {
        return Err(invalid(spec, "`default` and `optional` cannot be combined"));
    }
    if spec.var_type != VarType::OneOf && !spec.values.is_empty() {
        return Err(invalid(spec, "`values` is only allowed for type `one_of`"));
    }
    if spec.var_type != VarType::Integer && (spec.min.is_some() || spec.max.is_some()) {
        return Err(invalid(spec, "`min` and `max` are only allowed for type `integer`"));
    }

    let rule = match spec.var_type {
        VarType::String => finish(rules::string(), spec),
        VarType::NonEmpty => finish(rules::non_empty(), spec),
        VarType::Integer => {
            let mut rule = rules::integer();
            if let Some(min) = spec.min {
                rule = rule.min(min);
            }
            if let Some(max) = spec.max {
                rule = rule.max(max);
            }
            finish(rule, spec)
        }
        VarType::Port => finish(rules::port(), spec),
        VarType::Boolean => finish(rules::boolean(), spec),
        VarType::OneOf => {
            if spec.values.is_empty() {
                return Err(invalid(spec, "type `one_of` needs at least one entry in `values`"));
            }
            finish(rules::one_of(spec.values.iter().cloned()), spec)
        }
        VarType::Url => finish(rules::url(), spec),
    };

    Ok(rule)
}

fn finish<R: SchemaRule + 'static>(rule: R, spec: &VarSpec) -> Box<dyn SchemaRule> {
    match (&spec.default, spec.optional) {
        (Some(default), _) => Box::new(rule.with_default(default.clone())),
        (None, true) => Box::new(rule.optional()),
        (None, false) => Box::new(rule),
    }
}

fn invalid(spec: &VarSpec, reason: &str) -> EnvError {
    EnvError::InvalidSchema {
        key: spec.key.clone(),
        reason: reason.to_string(),
    }
}
