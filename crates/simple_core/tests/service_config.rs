use simple_core::config::{DEFAULT_DB_PATH, IN_MEMORY_DB_PATH};
use simple_core::{ConfigError, ServiceConfig, SIMPLE_MODEL_TOPIC};
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    move |name: &str| map.get(name).cloned()
}

#[test]
fn defaults_use_fixed_topic_and_file_db() {
    let config = ServiceConfig::load_with(None, env(&[])).unwrap();

    assert_eq!(config.topic, SIMPLE_MODEL_TOPIC);
    assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_PATH));
    assert!(!config.is_in_memory());
    assert_eq!(config.log_dir, None);
}

#[test]
fn file_values_are_overridden_by_environment() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "db_path = \"/var/lib/simple/simple.db\"\ntopic = \"from-file\"\nlog_level = \"WARNING\""
    )
    .unwrap();

    let config =
        ServiceConfig::load_with(Some(file.path()), env(&[("SIMPLE_TOPIC", "from-env")])).unwrap();

    assert_eq!(config.topic, "from-env");
    assert_eq!(
        config.db_path,
        PathBuf::from("/var/lib/simple/simple.db")
    );
    assert_eq!(config.log_level, "warn");
}

#[test]
fn blank_environment_values_are_ignored() {
    let config = ServiceConfig::load_with(None, env(&[("SIMPLE_TOPIC", "  ")])).unwrap();
    assert_eq!(config.topic, SIMPLE_MODEL_TOPIC);
}

#[test]
fn invalid_values_are_rejected() {
    let err = ServiceConfig::load_with(None, env(&[("SIMPLE_LOG_LEVEL", "loud")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));

    let err = ServiceConfig::load_with(None, env(&[("SIMPLE_LOG_DIR", "relative/logs")]))
        .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));

    assert!(matches!(
        ServiceConfig::from_toml_str("topic = \"\""),
        Ok(ServiceConfig { ref topic, .. }) if topic.is_empty()
    ));
    assert!(matches!(
        ServiceConfig::from_toml_str("unknown_key = 1"),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = ServiceConfig::load_with(Some(path.as_path()), env(&[])).unwrap_err();
    assert!(matches!(err, ConfigError::Io { path: ref reported, .. } if *reported == path));
}

#[test]
fn memory_sentinel_selects_in_memory_db() {
    let config =
        ServiceConfig::load_with(None, env(&[("SIMPLE_DB_PATH", IN_MEMORY_DB_PATH)])).unwrap();
    assert!(config.is_in_memory());

    assert!(matches!(
        ServiceConfig::load_with(None, env(&[])).map(|config| config.is_in_memory()),
        Ok(false)
    ));
}
