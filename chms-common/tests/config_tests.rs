//! Tests for configuration loading and database path resolution
//!
//! Tests that touch CHMS_DATABASE are marked #[serial] so they do not race
//! on the process environment.

use chms_common::config::{
    load_toml_config, read_toml_config, CompiledDefaults, DatabasePathResolver, TomlConfig,
    DATABASE_ENV_VAR,
};
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_compiled_defaults() {
    let defaults = CompiledDefaults::for_current_platform();

    assert_eq!(defaults.log_level, "info");
    assert_eq!(
        defaults.database_path.file_name().and_then(|n| n.to_str()),
        Some("chms.db")
    );
}

#[test]
#[serial]
fn test_resolver_with_no_overrides_uses_default() {
    env::remove_var(DATABASE_ENV_VAR);

    let resolver = DatabasePathResolver::new(None, &TomlConfig::default());

    assert_eq!(
        resolver.resolve(),
        CompiledDefaults::for_current_platform().database_path
    );
}

#[test]
#[serial]
fn test_resolver_priority_order() {
    let toml_config = TomlConfig {
        database_path: Some(PathBuf::from("/tmp/chms-from-toml.db")),
        ..Default::default()
    };

    // TOML beats compiled default
    env::remove_var(DATABASE_ENV_VAR);
    let resolver = DatabasePathResolver::new(None, &toml_config);
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/chms-from-toml.db"));

    // Environment beats TOML
    env::set_var(DATABASE_ENV_VAR, "/tmp/chms-from-env.db");
    let resolver = DatabasePathResolver::new(None, &toml_config);
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/chms-from-env.db"));

    // CLI beats everything
    let resolver = DatabasePathResolver::new(Some(PathBuf::from("/tmp/chms-cli.db")), &toml_config);
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/chms-cli.db"));

    env::remove_var(DATABASE_ENV_VAR);
}

#[test]
fn test_toml_parsing_with_logging_section() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        "database_path = \"/srv/chms/chms.db\"\n\n[logging]\nlevel = \"debug\"\n",
    )
    .unwrap();

    let config = read_toml_config(&path).unwrap();

    assert_eq!(config.database_path, Some(PathBuf::from("/srv/chms/chms.db")));
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_toml_logging_defaults_when_absent() {
    let config: TomlConfig = toml::from_str("").unwrap();

    assert!(config.database_path.is_none());
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_missing_explicit_config_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("does-not-exist.toml");

    assert!(read_toml_config(&missing).is_err());

    let config = load_toml_config(Some(&missing));
    assert!(config.database_path.is_none());
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_invalid_toml_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "database_path = [not valid").unwrap();

    let config = load_toml_config(Some(&path));
    assert!(config.database_path.is_none());
}
