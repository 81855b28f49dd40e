//! Schema validation of environment values.
//!
//! A [`Schema`] lists the keys an application needs, each with a
//! [`SchemaRule`] that checks the raw text and coerces it into a typed value.
//! Validation is fail-fast: the first rule that rejects its input aborts the
//! whole call and no partial result is produced.
//!
//! Rules must answer synchronously. A rule returning [`RuleOutcome::Pending`]
//! is a programming error and is reported as [`EnvError::AsynchronousRule`]
//! rather than waited on.
//!
//! # Examples
//!
//! ```
//! use envstack_core::{rules, validate, EnvironmentMapping, RuleExt, Schema};
//!
//! let source: EnvironmentMapping = [("APP_ENV", "production"), ("PORT", "3000")]
//!     .into_iter()
//!     .collect();
//!
//! let schema = Schema::new()
//!     .field("APP_ENV", rules::one_of(["development", "test", "production"]))
//!     .field("PORT", rules::port())
//!     .field("LOG_JSON", rules::boolean().with_default("false"));
//!
//! let env = validate(&source, &schema)?;
//! assert_eq!(env.get_str("APP_ENV"), Some("production"));
//! assert_eq!(env.get_i64("PORT"), Some(3000));
//! assert_eq!(env.get_bool("LOG_JSON"), Some(false));
//! # Ok::<(), envstack_core::EnvError>(())
//! ```

use crate::{
    environment::EnvironmentMapping,
    errors::{EnvError, EnvResult},
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, error};

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;

/// A single problem reported by a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Human-readable description of the problem.
    pub message: String,
}

impl ValidationIssue {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// What a rule decided about one input.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    /// The input is acceptable; holds the coerced value.
    Valid(Value),
    /// The input was rejected. The first issue is the one reported.
    Invalid(Vec<ValidationIssue>),
    /// The rule could not answer synchronously.
    Pending,
}

impl RuleOutcome {
    /// Shorthand for a rejection with a single issue.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(vec![ValidationIssue::new(message)])
    }
}

/// Validation and coercion for one environment key.
///
/// `input` is `None` when the key is absent from the source; the rule decides
/// whether that is acceptable.
///
/// Closures taking `Option<&str>` and returning a [`RuleOutcome`] are rules:
///
/// ```
/// use envstack_core::{RuleOutcome, SchemaRule};
///
/// let even = |input: Option<&str>| match input.and_then(|v| v.parse::<i64>().ok()) {
///     Some(n) if n % 2 == 0 => RuleOutcome::Valid(n.into()),
///     _ => RuleOutcome::invalid("Expected an even number"),
/// };
///
/// assert_eq!(even.check(Some("4")), RuleOutcome::Valid(4.into()));
/// ```
pub trait SchemaRule: Send + Sync {
    fn check(&self, input: Option<&str>) -> RuleOutcome;
}

impl<F> SchemaRule for F
where
    F: Fn(Option<&str>) -> RuleOutcome + Send + Sync,
{
    fn check(&self, input: Option<&str>) -> RuleOutcome {
        self(input)
    }
}

/// An ordered set of keys and the rules that validate them.
///
/// Keys are checked in declaration order, which decides which failure is
/// reported when several keys are invalid. Declaring a key twice replaces its
/// rule but keeps its original position.
#[derive(Default)]
pub struct Schema {
    entries: Vec<(String, Box<dyn SchemaRule>)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a key, builder style.
    pub fn field(mut self, key: impl Into<String>, rule: impl SchemaRule + 'static) -> Self {
        self.insert(key, Box::new(rule));
        self
    }

    /// Adds a key or replaces the rule of an existing one.
    pub fn insert(&mut self, key: impl Into<String>, rule: Box<dyn SchemaRule>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = rule,
            None => self.entries.push((key, rule)),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(existing, _)| existing == key)
    }

    /// Keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// The typed values of every schema key after successful validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidatedEnvironment {
    values: Map<String, Value>,
}

impl ValidatedEnvironment {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Converts the values into a JSON object.
    pub fn into_json(self) -> Value {
        Value::Object(self.values)
    }

    /// Deserializes the values into a caller-defined settings type.
    ///
    /// ```
    /// use envstack_core::{rules, validate, EnvironmentMapping, Schema};
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct Settings {
    ///     #[serde(rename = "PORT")]
    ///     port: u16,
    /// }
    ///
    /// let source: EnvironmentMapping = [("PORT", "8080")].into_iter().collect();
    /// let env = validate(&source, &Schema::new().field("PORT", rules::port()))?;
    ///
    /// let settings: Settings = env.deserialize()?;
    /// assert_eq!(settings.port, 8080);
    /// # Ok::<(), envstack_core::EnvError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// * `EnvError::Deserialize` - The values do not fit `T`
    pub fn deserialize<T: DeserializeOwned>(&self) -> EnvResult<T> {
        serde_json::from_value(Value::Object(self.values.clone())).map_err(|e| {
            EnvError::Deserialize {
                reason: e.to_string(),
            }
        })
    }
}

/// Validates `source` against `schema`.
///
/// Every schema key is looked up in `source` and passed to its rule, absent
/// keys as `None`. The first rejection aborts validation.
///
/// # Errors
///
/// * `EnvError::ValidationFailed` - A rule rejected its input; carries the
///   key, the raw input and the first issue's message
/// * `EnvError::AsynchronousRule` - A rule returned [`RuleOutcome::Pending`]
pub fn validate(source: &EnvironmentMapping, schema: &Schema) -> EnvResult<ValidatedEnvironment> {
    let mut values = Map::new();

    for (key, rule) in &schema.entries {
        let input = source.get(key);

        match rule.check(input) {
            RuleOutcome::Valid(value) => {
                values.insert(key.clone(), value);
            }
            RuleOutcome::Invalid(issues) => {
                let message = issues
                    .into_iter()
                    .next()
                    .map(|issue| issue.message)
                    .unwrap_or_else(|| "Validation failed".to_string());

                error!(
                    message = "Invalid environment variable",
                    key = %key,
                    input = ?input,
                    reason = %message
                );
                return Err(EnvError::ValidationFailed {
                    key: key.clone(),
                    input: input.map(str::to_string),
                    message,
                });
            }
            RuleOutcome::Pending => {
                error!(message = "Schema rule did not answer synchronously", key = %key);
                return Err(EnvError::AsynchronousRule { key: key.clone() });
            }
        }
    }

    debug!(message = "Environment validated", keys = values.len());
    Ok(ValidatedEnvironment { values })
}
