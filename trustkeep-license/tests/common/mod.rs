//! Shared test helpers for license tests.

#![allow(dead_code)]

use std::net::TcpListener;
use tempfile::TempDir;
use trustkeep_license::{ClientConfig, LicenseManager, TrustStore, VerificationClient};

pub const DEVICE: &str = "550e8400-e29b-41d4-a716-446655440000";

/// Returns a base URL on which nothing is listening.
pub fn unreachable_authority() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

pub fn client_config(url: &str, offline_grace_enabled: bool) -> ClientConfig {
    ClientConfig {
        authority_url: url.to_string(),
        timeout_secs: 5,
        offline_grace_enabled,
    }
}

pub fn client(url: &str, offline_grace_enabled: bool) -> VerificationClient {
    VerificationClient::new(client_config(url, offline_grace_enabled)).unwrap()
}

/// Builds a manager over a throwaway on-disk store.
pub fn manager(url: &str, offline_grace_enabled: bool) -> (TempDir, LicenseManager) {
    let dir = TempDir::new().unwrap();
    let store = TrustStore::open(dir.path().join("license.db")).unwrap();
    let manager = LicenseManager::new(store, client(url, offline_grace_enabled));
    (dir, manager)
}

/// Runs blocking HTTP work off the async test runtime.
pub async fn blocking<T, F>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.unwrap()
}

pub fn verdict_json(valid: bool, message: &str) -> serde_json::Value {
    serde_json::json!({
        "valid": valid,
        "message": message,
        "machine": {
            "id": "machine-42",
            "device_uuid": DEVICE,
            "status": if valid { "active" } else { "blocked" },
            "registered_at": "2026-01-01T00:00:00Z",
            "last_access_at": "2026-10-01T00:00:00Z"
        },
        "employer": {
            "id": "employer-7",
            "name": "Acme Ltda",
            "email": "it@acme.example"
        }
    })
}
