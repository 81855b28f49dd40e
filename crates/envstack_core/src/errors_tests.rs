//! Tests for environment error types.

use super::*;

#[test]
fn validation_failed_message_names_key_and_input() {
    let error = EnvError::ValidationFailed {
        key: "APP_ENV".to_string(),
        input: Some("staging".to_string()),
        message: "Invalid option".to_string(),
    };

    assert_eq!(
        error.to_string(),
        "Invalid environment variable: key APP_ENV, parsed value \"staging\": Invalid option"
    );
}

#[test]
fn validation_failed_message_reports_absent_input_as_undefined() {
    let error = EnvError::ValidationFailed {
        key: "PORT".to_string(),
        input: None,
        message: "Required".to_string(),
    };

    assert!(error.to_string().contains("parsed value undefined"));
}

#[test]
fn asynchronous_rule_error_is_distinct() {
    let error = EnvError::AsynchronousRule {
        key: "DATABASE_URL".to_string(),
    };

    assert_eq!(
        error.to_string(),
        "Validation of key \"DATABASE_URL\" is not synchronous"
    );
}

#[test]
fn missing_mode_error_names_variable() {
    let error = EnvError::MissingMode {
        variable: "APP_ENV".to_string(),
    };

    assert_eq!(
        error.to_string(),
        "`APP_ENV` must be set when injecting environment variables"
    );
}

#[test]
fn file_access_error_includes_path_and_reason() {
    let error = EnvError::FileAccess {
        path: "/srv/app/.env".to_string(),
        reason: "permission denied".to_string(),
    };

    match error {
        EnvError::FileAccess { path, reason } => {
            assert_eq!(path, "/srv/app/.env");
            assert_eq!(reason, "permission denied");
        }
        _ => panic!("Expected FileAccess"),
    }
}

#[test]
fn process_environment_message_names_key() {
    let error = EnvError::ProcessEnvironment {
        key: "SECRET".to_string(),
        reason: "the value contains a NUL byte".to_string(),
    };

    assert_eq!(
        error.to_string(),
        "Cannot set process environment variable SECRET: the value contains a NUL byte"
    );
}
