//! Environment mapping types.
//!
//! An [`EnvironmentLayer`] holds the declarations of one parsed file and an
//! [`EnvironmentMapping`] holds the result of merging several layers. Both
//! share the same representation: a map with unique keys.

use serde::Serialize;
use std::collections::btree_map::{self, BTreeMap};

#[cfg(test)]
#[path = "environment_tests.rs"]
mod tests;

/// A flat key/value environment with unique keys.
///
/// Iteration is sorted by key. Callers must not rely on any particular
/// order; sorting only keeps rendered output stable.
///
/// # Examples
///
/// ```
/// use envstack_core::EnvironmentMapping;
///
/// let mut env = EnvironmentMapping::new();
/// env.insert("PORT", "3000");
/// env.insert("PORT", "4000");
///
/// assert_eq!(env.get("PORT"), Some("4000"));
/// assert_eq!(env.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EnvironmentMapping {
    entries: BTreeMap<String, String>,
}

/// One parsed file's declarations, prior to merging.
pub type EnvironmentLayer = EnvironmentMapping;

impl EnvironmentMapping {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots the current process environment.
    ///
    /// Variables whose name or value is not valid Unicode are skipped.
    pub fn from_process() -> Self {
        std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }

    /// Inserts a value, replacing and returning any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Renders the mapping as declaration text that parses back to the same
    /// mapping.
    ///
    /// Plain values are written bare. Values that would be altered by the
    /// unquoted grammar (comments, surrounding whitespace, newlines, leading
    /// quotes) are wrapped in the first quote kind that can hold them
    /// literally, falling back to a double-quoted value with `\n` and `\r`
    /// escaped. A value that none of these can hold is written double-quoted
    /// as-is and may not parse back exactly. Examples are a carriage return
    /// next to a `"`, or all three quote kinds next to a `#`.
    ///
    /// ```
    /// use envstack_core::{parse, EnvironmentMapping};
    ///
    /// let mut env = EnvironmentMapping::new();
    /// env.insert("GREETING", "hello # world");
    ///
    /// let text = env.to_dotenv();
    /// assert_eq!(text, "GREETING='hello # world'\n");
    /// assert_eq!(parse(&text, true), env);
    /// ```
    pub fn to_dotenv(&self) -> String {
        let mut out = String::new();
        for (key, value) in self.iter() {
            out.push_str(key);
            out.push('=');
            out.push_str(&render_value(value));
            out.push('\n');
        }
        out
    }
}

fn render_value(value: &str) -> String {
    if !needs_quotes(value) {
        return value.to_string();
    }

    // Raw carriage returns do not survive newline normalization, so they can
    // only be written as a double-quoted escape.
    if !value.contains('\r') {
        for quote in ['\'', '`'] {
            if !value.contains(quote) && !value.ends_with('\\') {
                return format!("{quote}{value}{quote}");
            }
        }
    }

    if !value.contains(&['"', '\\'][..]) {
        let escaped = value.replace('\n', "\\n").replace('\r', "\\r");
        return format!("\"{escaped}\"");
    }

    format!("\"{value}\"")
}

fn needs_quotes(value: &str) -> bool {
    value != value.trim()
        || value.contains(&['#', '\n', '\r'][..])
        || value.starts_with(&['\'', '"', '`'][..])
}

impl FromIterator<(String, String)> for EnvironmentMapping {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for EnvironmentMapping {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

impl Extend<(String, String)> for EnvironmentMapping {
    fn extend<I: IntoIterator<Item = (String, String)>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl IntoIterator for EnvironmentMapping {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a EnvironmentMapping {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
