//! Device identity for license binding.
//!
//! A device identity is a random UUID generated once per installation and
//! reused for every later verification, so a token stays bound to the same
//! machine across reconfiguration.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Generates a new random device identity.
#[must_use]
pub fn generate_device_identity() -> String {
    Uuid::new_v4().to_string()
}

/// Returns `existing` when it is non-empty, otherwise a fresh identity.
#[must_use]
pub fn ensure_device_identity(existing: Option<&str>) -> String {
    match existing {
        Some(id) if !id.trim().is_empty() => id.to_string(),
        _ => generate_device_identity(),
    }
}

/// Short, non-reversible label for a token, safe to put in logs.
#[must_use]
pub fn token_fingerprint(token: &str) -> String {
    let hash = Sha256::digest(token.as_bytes());
    hex::encode(&hash[..4])
}
