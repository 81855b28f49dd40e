//! Tests for schema validation.

use super::*;
use crate::rules::{self, RuleExt};
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn source(pairs: &[(&str, &str)]) -> EnvironmentMapping {
    pairs.iter().copied().collect()
}

fn node_env_schema() -> Schema {
    Schema::new().field(
        "NODE_ENV",
        rules::one_of(["development", "test", "production"]),
    )
}

// ============================================================================
// Successful validation
// ============================================================================

/// Verify valid values are coerced and returned.
#[test]
fn test_validate_returns_coerced_values() {
    let schema = node_env_schema().field("PORT", |input: Option<&str>| {
        match input.and_then(|v| v.parse::<u16>().ok()) {
            Some(port) => RuleOutcome::Valid(json!(port)),
            None => RuleOutcome::invalid("Expected a port"),
        }
    });

    let env = validate(&source(&[("NODE_ENV", "production"), ("PORT", "3000")]), &schema)
        .expect("Validation should succeed");

    assert_eq!(
        env.clone().into_json(),
        json!({ "NODE_ENV": "production", "PORT": 3000 })
    );
    assert_eq!(env.get_str("NODE_ENV"), Some("production"));
    assert_eq!(env.get_i64("PORT"), Some(3000));
}

/// Verify only schema keys appear in the result.
#[test]
fn test_validate_ignores_keys_outside_schema() {
    let env = validate(
        &source(&[("NODE_ENV", "test"), ("UNRELATED", "x")]),
        &node_env_schema(),
    )
    .expect("Validation should succeed");

    assert_eq!(env.len(), 1);
    assert!(env.get("UNRELATED").is_none());
}

/// Verify an absent key reaches the rule as `None`.
#[test]
fn test_validate_passes_absent_key_as_none() {
    let schema = Schema::new().field("MISSING", |input: Option<&str>| {
        assert!(input.is_none());
        RuleOutcome::Valid(json!("fallback"))
    });

    let env = validate(&EnvironmentMapping::new(), &schema).expect("Validation should succeed");

    assert_eq!(env.get_str("MISSING"), Some("fallback"));
}

/// Verify an empty schema validates anything.
#[test]
fn test_validate_empty_schema() {
    let env = validate(&source(&[("A", "1")]), &Schema::new()).expect("Validation should succeed");

    assert!(env.is_empty());
}

/// Verify validated values deserialize into a settings struct.
#[test]
fn test_validated_environment_deserialize() {
    #[derive(Debug, Deserialize)]
    struct Settings {
        #[serde(rename = "APP_ENV")]
        mode: String,
        #[serde(rename = "PORT")]
        port: u16,
        #[serde(rename = "DEBUG")]
        debug: bool,
        #[serde(rename = "SENTRY_DSN")]
        sentry_dsn: Option<String>,
    }

    let schema = Schema::new()
        .field("APP_ENV", rules::one_of(["development", "production"]))
        .field("PORT", rules::port().with_default("3000"))
        .field("DEBUG", rules::boolean())
        .field("SENTRY_DSN", rules::url().optional());

    let env = validate(&source(&[("APP_ENV", "development"), ("DEBUG", "yes")]), &schema)
        .expect("Validation should succeed");
    let settings: Settings = env.deserialize().expect("Deserialization should succeed");

    assert_eq!(settings.mode, "development");
    assert_eq!(settings.port, 3000);
    assert!(settings.debug);
    assert!(settings.sentry_dsn.is_none());
}

/// Verify a type mismatch during deserialization is reported.
#[test]
fn test_validated_environment_deserialize_mismatch() {
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Settings {
        #[serde(rename = "PORT")]
        port: bool,
    }

    let env = validate(
        &source(&[("PORT", "80")]),
        &Schema::new().field("PORT", rules::port()),
    )
    .expect("Validation should succeed");

    assert!(matches!(
        env.deserialize::<Settings>(),
        Err(EnvError::Deserialize { .. })
    ));
}

// ============================================================================
// Failures
// ============================================================================

/// Verify an invalid value fails with key, input and message.
#[test]
fn test_validate_rejects_invalid_value() {
    let result = validate(&source(&[("NODE_ENV", "staging")]), &node_env_schema());

    match result {
        Err(EnvError::ValidationFailed {
            key,
            input,
            message,
        }) => {
            assert_eq!(key, "NODE_ENV");
            assert_eq!(input.as_deref(), Some("staging"));
            assert!(message.starts_with("Invalid option"));
        }
        other => panic!("Expected ValidationFailed, got {:?}", other),
    }
}

/// Verify a missing required key fails with an undefined input.
#[test]
fn test_validate_rejects_missing_required_key() {
    let result = validate(&EnvironmentMapping::new(), &node_env_schema());

    match result {
        Err(EnvError::ValidationFailed { key, input, message }) => {
            assert_eq!(key, "NODE_ENV");
            assert_eq!(input, None);
            assert_eq!(message, "Required");
        }
        other => panic!("Expected ValidationFailed, got {:?}", other),
    }
}

/// Verify the first failing key in declaration order is reported and later
/// rules never run.
#[test]
fn test_validate_is_fail_fast_in_declaration_order() {
    let later_calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&later_calls);

    let schema = Schema::new()
        .field("Z_FIRST", rules::integer())
        .field("A_SECOND", rules::integer())
        .field("M_THIRD", move |_: Option<&str>| {
            counter.fetch_add(1, Ordering::SeqCst);
            RuleOutcome::Valid(json!(null))
        });

    let result = validate(&source(&[("Z_FIRST", "x"), ("A_SECOND", "y")]), &schema);

    match result {
        Err(EnvError::ValidationFailed { key, .. }) => assert_eq!(key, "Z_FIRST"),
        other => panic!("Expected ValidationFailed, got {:?}", other),
    }
    assert_eq!(later_calls.load(Ordering::SeqCst), 0);
}

/// Verify only the first issue of a rule is reported.
#[test]
fn test_validate_reports_first_issue() {
    let schema = Schema::new().field("KEY", |_: Option<&str>| {
        RuleOutcome::Invalid(vec![
            ValidationIssue::new("first problem"),
            ValidationIssue::new("second problem"),
        ])
    });

    match validate(&source(&[("KEY", "v")]), &schema) {
        Err(EnvError::ValidationFailed { message, .. }) => assert_eq!(message, "first problem"),
        other => panic!("Expected ValidationFailed, got {:?}", other),
    }
}

/// Verify a rejection without issues still fails.
#[test]
fn test_validate_rejection_without_issues() {
    let schema = Schema::new().field("KEY", |_: Option<&str>| RuleOutcome::Invalid(Vec::new()));

    match validate(&source(&[("KEY", "v")]), &schema) {
        Err(EnvError::ValidationFailed { message, .. }) => {
            assert_eq!(message, "Validation failed")
        }
        other => panic!("Expected ValidationFailed, got {:?}", other),
    }
}

/// Verify a pending rule fails with the distinct asynchronous error.
#[test]
fn test_validate_rejects_pending_rule() {
    let schema = node_env_schema().field("DATABASE_URL", |_: Option<&str>| RuleOutcome::Pending);

    let result = validate(
        &source(&[("NODE_ENV", "test"), ("DATABASE_URL", "postgres://db")]),
        &schema,
    );

    assert_eq!(
        result,
        Err(EnvError::AsynchronousRule {
            key: "DATABASE_URL".to_string()
        })
    );
}

// ============================================================================
// Schema
// ============================================================================

/// Verify redeclaring a key replaces its rule in place.
#[test]
fn test_schema_redeclared_key_keeps_position() {
    let schema = Schema::new()
        .field("A", rules::string())
        .field("B", rules::string())
        .field("A", rules::integer());

    assert_eq!(schema.keys().collect::<Vec<_>>(), vec!["A", "B"]);
    assert_eq!(schema.len(), 2);
    assert!(schema.contains_key("B"));

    let result = validate(&source(&[("A", "text"), ("B", "x")]), &schema);
    assert!(matches!(result, Err(EnvError::ValidationFailed { .. })));
}

/// Verify the debug output lists keys.
#[test]
fn test_schema_debug_lists_keys() {
    let rendered = format!("{:?}", node_env_schema());

    assert!(rendered.contains("NODE_ENV"));
}
