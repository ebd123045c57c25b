//! Configuration for the verification client and the license manager.

use crate::error::{LicenseError, LicenseResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default authority base URL.
pub const DEFAULT_AUTHORITY_URL: &str = "http://localhost:8000";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for talking to the remote authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the authority (e.g. `https://licensing.example.com`).
    pub authority_url: String,
    /// Upper bound on a single verification request.
    pub timeout_secs: u64,
    /// When the authority is unreachable, treat the token as valid.
    ///
    /// A severed network connection is indistinguishable from a valid
    /// offline grace period while this is on.
    pub offline_grace_enabled: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            authority_url: DEFAULT_AUTHORITY_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            offline_grace_enabled: true,
        }
    }
}

impl ClientConfig {
    /// Returns the request timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Full configuration for a [`LicenseManager`](crate::LicenseManager).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenseConfig {
    pub authority_url: String,
    pub timeout_secs: u64,
    pub offline_grace_enabled: bool,
    /// Location of the trust store file.
    pub database_path: PathBuf,
}

impl Default for LicenseConfig {
    fn default() -> Self {
        let client = ClientConfig::default();
        Self {
            authority_url: client.authority_url,
            timeout_secs: client.timeout_secs,
            offline_grace_enabled: client.offline_grace_enabled,
            database_path: default_database_path(),
        }
    }
}

impl LicenseConfig {
    /// Loads a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> LicenseResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            LicenseError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Projects the client-facing settings.
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            authority_url: self.authority_url.clone(),
            timeout_secs: self.timeout_secs,
            offline_grace_enabled: self.offline_grace_enabled,
        }
    }
}

/// `<local data dir>/trustkeep/license.db`, or `data/license.db` when the
/// platform has no data directory.
#[must_use]
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("trustkeep"))
        .unwrap_or_else(|| PathBuf::from("data"))
        .join("license.db")
}
