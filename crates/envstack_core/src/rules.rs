//! Built-in schema rules.
//!
//! Every rule rejects an absent key with the issue `Required` unless wrapped
//! with [`RuleExt::optional`] or [`RuleExt::with_default`].

use crate::schema::{RuleOutcome, SchemaRule};
use serde_json::Value;
use ::url::Url;

#[cfg(test)]
#[path = "rules_tests.rs"]
mod tests;

const REQUIRED: &str = "Required";

/// Accepts text as-is.
#[derive(Debug, Clone, Default)]
pub struct StringRule {
    non_empty: bool,
}

/// Any text, including an empty value.
pub fn string() -> StringRule {
    StringRule { non_empty: false }
}

/// Text with at least one non-whitespace character.
pub fn non_empty() -> StringRule {
    StringRule { non_empty: true }
}

impl SchemaRule for StringRule {
    fn check(&self, input: Option<&str>) -> RuleOutcome {
        match input {
            None => RuleOutcome::invalid(REQUIRED),
            Some(value) if self.non_empty && value.trim().is_empty() => {
                RuleOutcome::invalid("Expected a non-empty string")
            }
            Some(value) => RuleOutcome::Valid(Value::String(value.to_string())),
        }
    }
}

/// Accepts a base-10 integer, optionally bounded.
#[derive(Debug, Clone, Default)]
pub struct IntegerRule {
    min: Option<i64>,
    max: Option<i64>,
}

pub fn integer() -> IntegerRule {
    IntegerRule::default()
}

/// A TCP/UDP port number between 1 and 65535.
pub fn port() -> IntegerRule {
    integer().min(1).max(65535)
}

impl IntegerRule {
    pub fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }
}

impl SchemaRule for IntegerRule {
    fn check(&self, input: Option<&str>) -> RuleOutcome {
        let Some(raw) = input else {
            return RuleOutcome::invalid(REQUIRED);
        };

        let number = match raw.trim().parse::<i64>() {
            Ok(number) => number,
            Err(_) => {
                return RuleOutcome::invalid(format!("Expected an integer, received {:?}", raw))
            }
        };

        if let Some(min) = self.min.filter(|min| number < *min) {
            return RuleOutcome::invalid(format!(
                "Expected a number >= {}, received {}",
                min, number
            ));
        }
        if let Some(max) = self.max.filter(|max| number > *max) {
            return RuleOutcome::invalid(format!(
                "Expected a number <= {}, received {}",
                max, number
            ));
        }

        RuleOutcome::Valid(Value::from(number))
    }
}

/// Accepts `true/false`, `1/0`, `yes/no` and `on/off`, ignoring case.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanRule;

pub fn boolean() -> BooleanRule {
    BooleanRule
}

impl SchemaRule for BooleanRule {
    fn check(&self, input: Option<&str>) -> RuleOutcome {
        let Some(raw) = input else {
            return RuleOutcome::invalid(REQUIRED);
        };

        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => RuleOutcome::Valid(Value::Bool(true)),
            "false" | "0" | "no" | "off" => RuleOutcome::Valid(Value::Bool(false)),
            _ => RuleOutcome::invalid(format!("Expected a boolean, received {:?}", raw)),
        }
    }
}

/// Accepts exactly one of a fixed set of values.
#[derive(Debug, Clone)]
pub struct OneOfRule {
    values: Vec<String>,
}

pub fn one_of<I, S>(values: I) -> OneOfRule
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    OneOfRule {
        values: values.into_iter().map(Into::into).collect(),
    }
}

impl SchemaRule for OneOfRule {
    fn check(&self, input: Option<&str>) -> RuleOutcome {
        match input {
            None => RuleOutcome::invalid(REQUIRED),
            Some(value) if self.values.iter().any(|allowed| allowed == value) => {
                RuleOutcome::Valid(Value::String(value.to_string()))
            }
            Some(_) => {
                let expected: Vec<String> =
                    self.values.iter().map(|v| format!("{:?}", v)).collect();
                RuleOutcome::invalid(format!(
                    "Invalid option: expected one of {}",
                    expected.join("|")
                ))
            }
        }
    }
}

/// Accepts an absolute URL. The output is the normalized URL text.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlRule;

pub fn url() -> UrlRule {
    UrlRule
}

impl SchemaRule for UrlRule {
    fn check(&self, input: Option<&str>) -> RuleOutcome {
        let Some(raw) = input else {
            return RuleOutcome::invalid(REQUIRED);
        };

        match Url::parse(raw.trim()) {
            Ok(url) => RuleOutcome::Valid(Value::String(url.to_string())),
            Err(e) => RuleOutcome::invalid(format!("Invalid URL: {}", e)),
        }
    }
}

/// Wraps a rule so an absent key yields `null`.
#[derive(Debug, Clone)]
pub struct Optional<R> {
    rule: R,
}

impl<R: SchemaRule> SchemaRule for Optional<R> {
    fn check(&self, input: Option<&str>) -> RuleOutcome {
        match input {
            None => RuleOutcome::Valid(Value::Null),
            Some(_) => self.rule.check(input),
        }
    }
}

/// Wraps a rule so an absent key is checked as if it held a default text.
#[derive(Debug, Clone)]
pub struct WithDefault<R> {
    rule: R,
    default: String,
}

impl<R: SchemaRule> SchemaRule for WithDefault<R> {
    fn check(&self, input: Option<&str>) -> RuleOutcome {
        self.rule.check(Some(input.unwrap_or(&self.default)))
    }
}

/// Combinators available on every rule.
pub trait RuleExt: SchemaRule + Sized {
    fn optional(self) -> Optional<Self> {
        Optional { rule: self }
    }

    fn with_default(self, default: impl Into<String>) -> WithDefault<Self> {
        WithDefault {
            rule: self,
            default: default.into(),
        }
    }
}

impl<R: SchemaRule> RuleExt for R {}
