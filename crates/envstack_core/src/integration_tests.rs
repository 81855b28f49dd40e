//! Cross-module tests: files on disk through loading, merging and validation.

use crate::*;
use std::fs;
use tempfile::TempDir;

/// Test that a base file and a local override load, merge and validate.
#[test]
fn test_load_then_validate_layered_files() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    fs::write(
        temp_dir.path().join(".env"),
        "APP_ENV=development\nPORT=3000\nDATABASE_URL=\"postgres://localhost/dev\"\n",
    )
    .expect("Failed to write .env");
    fs::write(
        temp_dir.path().join(".env.production"),
        "export APP_ENV=production\nPORT: 8080 # behind the proxy\n",
    )
    .expect("Failed to write .env.production");

    let env = load_environment(
        Some(temp_dir.path()),
        &[".env", ".env.local", ".env.production"],
        LoadOptions::default(),
    )
    .expect("Failed to load environment");

    let schema = Schema::new()
        .field("APP_ENV", rules::one_of(["development", "test", "production"]))
        .field("PORT", rules::port())
        .field("DATABASE_URL", rules::url())
        .field("LOG_LEVEL", rules::string().with_default("info"));

    let validated = validate(&env, &schema).expect("Validation should succeed");

    assert_eq!(validated.get_str("APP_ENV"), Some("production"));
    assert_eq!(validated.get_i64("PORT"), Some(8080));
    assert_eq!(
        validated.get_str("DATABASE_URL"),
        Some("postgres://localhost/dev")
    );
    assert_eq!(validated.get_str("LOG_LEVEL"), Some("info"));
}

/// Test that an invalid merged value stops validation with its key.
#[test]
fn test_load_then_validate_reports_override_problem() {
    let source = InMemoryFileSource::new()
        .with_file("/app/.env", "NODE_ENV=production\n")
        .with_file("/app/.env.local", "NODE_ENV=staging\n");

    let env = EnvLoader::new(source, "/app")
        .load(&[".env", ".env.local"])
        .expect("Failed to load environment");

    let schema = Schema::new().field(
        "NODE_ENV",
        rules::one_of(["development", "test", "production"]),
    );

    match validate(&env, &schema) {
        Err(EnvError::ValidationFailed { key, input, .. }) => {
            assert_eq!(key, "NODE_ENV");
            assert_eq!(input.as_deref(), Some("staging"));
        }
        other => panic!("Expected ValidationFailed, got {:?}", other),
    }
}

/// Test that a schema file validates a loaded mapping.
#[test]
fn test_schema_file_against_loaded_mapping() {
    let schema = SchemaFile::from_toml(concat!(
        "[[var]]\nkey = \"FEATURE_X\"\ntype = \"boolean\"\n\n",
        "[[var]]\nkey = \"RETRIES\"\ntype = \"integer\"\noptional = true\n",
    ))
    .and_then(|file| file.compile())
    .expect("Schema should compile");

    let env = parse("FEATURE_X=on\nRETRIES=\n", true);
    let validated = validate(&env, &schema).expect("Validation should succeed");

    assert_eq!(validated.get_bool("FEATURE_X"), Some(true));
    assert!(validated.get("RETRIES").is_some_and(|v| v.is_null()));
}
