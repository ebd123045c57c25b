mod common;

use common::unreachable_authority;
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use tempfile::TempDir;
use trustkeep_license::{LicenseConfig, LicenseError, LicenseManager, default_database_path};

#[test]
fn license_config_default() {
    let cfg = LicenseConfig::default();
    assert_eq!(cfg.authority_url, "http://localhost:8000");
    assert_eq!(cfg.timeout_secs, 30);
    assert!(cfg.offline_grace_enabled);
    assert_eq!(cfg.database_path, default_database_path());
}

#[test]
fn default_database_path_ends_in_license_db() {
    let path = default_database_path();
    assert_eq!(path.file_name().unwrap(), "license.db");
}

#[test]
fn client_config_projection() {
    let cfg = LicenseConfig {
        authority_url: "https://licensing.example.com".to_string(),
        timeout_secs: 10,
        offline_grace_enabled: false,
        database_path: PathBuf::from("x.db"),
    };
    let client = cfg.client_config();
    assert_eq!(client.authority_url, "https://licensing.example.com");
    assert_eq!(client.timeout_secs, 10);
    assert!(!client.offline_grace_enabled);
}

#[test]
fn load_fills_missing_fields_with_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trustkeep.json");
    std::fs::write(
        &path,
        r#"{"authority_url": "https://licensing.example.com", "offline_grace_enabled": false}"#,
    )
    .unwrap();

    let cfg = LicenseConfig::load(&path).unwrap();
    assert_eq!(cfg.authority_url, "https://licensing.example.com");
    assert!(!cfg.offline_grace_enabled);
    assert_eq!(cfg.timeout_secs, 30);
}

#[test]
fn load_missing_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    let err = LicenseConfig::load(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, LicenseError::Config(_)));
}

#[test]
fn load_malformed_file_is_serialization_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = LicenseConfig::load(&path).unwrap_err();
    assert!(matches!(err, LicenseError::Serialization(_)));
}

#[test]
fn manager_open_creates_database_file() {
    let dir = TempDir::new().unwrap();
    let cfg = LicenseConfig {
        authority_url: unreachable_authority(),
        database_path: dir.path().join("data").join("license.db"),
        ..Default::default()
    };

    let m = LicenseManager::open(&cfg).unwrap();
    assert!(cfg.database_path.exists());
    assert_eq!(m.store().path(), Some(cfg.database_path.as_path()));
    m.store().health_check().unwrap();
}

#[test]
fn manager_open_rejects_zero_timeout() {
    let dir = TempDir::new().unwrap();
    let cfg = LicenseConfig {
        authority_url: unreachable_authority(),
        timeout_secs: 0,
        database_path: dir.path().join("license.db"),
        ..Default::default()
    };
    let err = LicenseManager::open(&cfg).unwrap_err();
    assert!(matches!(err, LicenseError::Config(_)));
}
