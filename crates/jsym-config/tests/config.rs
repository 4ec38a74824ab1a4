use std::sync::Arc;

use jsym_config::{ConfigError, JsymConfig, LogBuffer, LoggingConfig};
use jsym_members::{AncestorConfig, UnresolvedPolicy};
use tracing_subscriber::prelude::*;

use pretty_assertions::assert_eq;

#[test]
fn empty_config_uses_defaults() {
    let config = JsymConfig::load_from_str("").expect("empty config parses");
    assert_eq!(config, JsymConfig::default());
    assert_eq!(config.ancestors, AncestorConfig::default());
    assert!(config.ancestors.include_object);
    assert_eq!(config.ancestors.max_depth, 64);
    assert_eq!(config.ancestors.on_unresolved, UnresolvedPolicy::Error);
    assert_eq!(config.logging.level, "info");
    assert!(config.logging.stderr);
    assert_eq!(config.logging.buffer_lines, 2_000);
}

#[test]
fn parses_all_sections() {
    let config = JsymConfig::load_from_str(
        r#"
[ancestors]
include_object = false
max_depth = 12
on_unresolved = "skip"

[logging]
level = "debug,jsym_members=trace"
json = true
stderr = false
buffer_lines = 50
"#,
    )
    .expect("config parses");

    assert_eq!(
        config,
        JsymConfig {
            ancestors: AncestorConfig {
                include_object: false,
                max_depth: 12,
                on_unresolved: UnresolvedPolicy::Skip,
            },
            logging: LoggingConfig {
                level: "debug,jsym_members=trace".to_owned(),
                json: true,
                stderr: false,
                buffer_lines: 50,
            },
        }
    );
}

#[test]
fn partial_sections_keep_remaining_defaults() {
    let config = JsymConfig::load_from_str(
        r#"
[ancestors]
max_depth = 3
"#,
    )
    .expect("config parses");

    assert_eq!(config.ancestors.max_depth, 3);
    assert!(config.ancestors.include_object);
    assert_eq!(config.logging, LoggingConfig::default());
}

#[test]
fn unknown_keys_are_rejected_without_echoing_them() {
    let err = JsymConfig::load_from_str(
        r#"
[ancestors]
api_token = "s3cr3t"
"#,
    )
    .unwrap_err();

    let ConfigError::Toml(message) = &err else {
        panic!("expected a TOML error, got {err:?}");
    };
    assert!(message.contains("unknown field"), "{message}");
    assert!(!message.contains("api_token"), "{message}");
    assert!(!message.contains("s3cr3t"), "{message}");
}

#[test]
fn invalid_policy_values_are_redacted() {
    let err = JsymConfig::load_from_str(
        r#"
[ancestors]
on_unresolved = "private-value"
"#,
    )
    .unwrap_err();

    let message = err.to_string();
    assert!(message.starts_with("failed to parse toml config"), "{message}");
    assert!(!message.contains("private-value"), "{message}");
}

#[test]
fn load_from_path_reads_the_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("jsym.toml");
    std::fs::write(
        &path,
        r#"
[ancestors]
on_unresolved = "skip"
"#,
    )
    .expect("write config");

    let config = JsymConfig::load_from_path(&path).expect("config loads");
    assert_eq!(config.ancestors.on_unresolved, UnresolvedPolicy::Skip);
}

#[test]
fn missing_file_reports_the_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("does-not-exist.toml");

    let err = JsymConfig::load_from_path(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }), "{err:?}");
    assert!(
        err.to_string().contains("does-not-exist.toml"),
        "{err}"
    );
}

#[test]
fn log_buffer_writer_collects_formatted_events() {
    let buffer = Arc::new(LogBuffer::new(16));
    let subscriber = tracing_subscriber::registry().with(
        tracing_subscriber::fmt::layer()
            .with_writer(buffer.make_writer())
            .with_ansi(false),
    );

    tracing::subscriber::with_default(subscriber, || {
        tracing::info!(class = "java.util.ArrayList", "computed visible methods");
    });

    let lines = buffer.last_lines(16);
    assert_eq!(lines.len(), 1, "{lines:?}");
    assert!(lines[0].contains("computed visible methods"), "{lines:?}");
    assert!(lines[0].contains("java.util.ArrayList"), "{lines:?}");
}
