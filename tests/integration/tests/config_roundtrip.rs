//! Config save/load roundtrip integration tests.
//!
//! These tests verify that configuration can be written to disk, loaded back,
//! and resolved into the paths the cache layer uses.

use std::path::Path;

use passcache_core::config::{Config, LogLevel, PathOverrides};
use tempfile::TempDir;

#[test]
fn test_config_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("passcache.json5");

    let config = Config::default();
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.cache.encrypt, config.cache.encrypt);
    assert_eq!(loaded.logging.level, config.logging.level);
    assert!(loaded.source.path.is_none());
}

#[test]
fn test_config_modify_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("passcache.json5");

    let mut config = Config::default();
    config.set_source(&dir.path().join("export.csv"));
    config.cache.encrypt = false;
    config.logging.level = LogLevel::Warn;
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert!(!loaded.cache.encrypt);
    assert_eq!(loaded.logging.level, LogLevel::Warn);

    let resolved = loaded.resolve(&PathOverrides::default()).unwrap();
    assert_eq!(resolved.source, Some(dir.path().join("export.csv")));
    assert!(!resolved.encrypt);
}

#[test]
fn test_hand_written_json5_loads() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("passcache.json5");
    std::fs::write(
        &path,
        r#"{
            // where the export lives
            source: { path: "/data/export.csv" },
            cache: { path: "/data/cache.json", encrypt: true },
        }"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.source.path.as_deref(), Some("/data/export.csv"));
    assert!(config.validate().is_ok());
}

#[test]
fn test_overrides_win_over_config() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.set_source(&dir.path().join("from-config.csv"));
    config.cache.path = Some(dir.path().join("cache.json").display().to_string());

    let overrides = PathOverrides {
        source: Some(dir.path().join("from-flag.csv")),
        cache_file: None,
    };
    let resolved = config.resolve(&overrides).unwrap();
    assert_eq!(resolved.source, Some(dir.path().join("from-flag.csv")));
    assert_eq!(resolved.cache_file, dir.path().join("cache.json"));
}

#[test]
fn test_cache_path_equal_to_source_rejected() {
    let mut config = Config::default();
    config.source.path = Some("/data/export.csv".into());
    config.cache.path = Some("/data/export.csv".into());
    assert!(config.validate().is_err());
    assert!(config.resolve(&PathOverrides::default()).is_err());
}

#[test]
fn test_config_load_nonexistent() {
    let result = Config::load(Path::new("/nonexistent/passcache.json5"));
    assert!(result.is_err());
    assert!(Config::load_or_default(Some(Path::new("/nonexistent/passcache.json5"))).is_ok());
}

#[test]
fn test_config_parse_invalid() {
    let result = Config::parse("not valid json");
    assert!(result.is_err());
}
