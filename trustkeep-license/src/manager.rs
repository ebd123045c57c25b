//! License manager: the entry point the rest of the application calls.
//!
//! Coordinates the trust store and the verification client. Neither of those
//! knows about the other; every read-verify-write sequence happens here.

use crate::client::{VerificationClient, VerificationVerdict};
use crate::config::LicenseConfig;
use crate::device::{ensure_device_identity, token_fingerprint};
use crate::error::{LicenseError, LicenseResult};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, warn};
use trustkeep_store::{LicenseRecord, StoreResult, StoreStats, TrustStore};

/// Snapshot of the local license state for status display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseStatus {
    pub has_license: bool,
    /// Cached verdict of the last check, not a fresh verification.
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<LicenseRecord>,
    pub message: String,
}

impl LicenseStatus {
    fn unconfigured() -> Self {
        Self {
            has_license: false,
            is_valid: false,
            record: None,
            message: "license not configured".to_string(),
        }
    }
}

/// Sets up, checks and clears the installation's license.
#[derive(Debug, Clone)]
pub struct LicenseManager {
    store: TrustStore,
    client: VerificationClient,
}

impl LicenseManager {
    /// Creates a manager over an already-open store and client.
    #[must_use]
    pub fn new(store: TrustStore, client: VerificationClient) -> Self {
        Self { store, client }
    }

    /// Opens the store and builds the client described by `config`.
    pub fn open(config: &LicenseConfig) -> LicenseResult<Self> {
        let store = TrustStore::open(&config.database_path)?;
        let client = VerificationClient::new(config.client_config())?;
        Ok(Self::new(store, client))
    }

    /// Returns the underlying trust store.
    #[must_use]
    pub fn store(&self) -> &TrustStore {
        &self.store
    }

    /// Returns the underlying verification client.
    #[must_use]
    pub fn client(&self) -> &VerificationClient {
        &self.client
    }

    /// Configures a new license for `token`.
    ///
    /// Reuses the stored device identity when one exists. Nothing is written
    /// unless the verdict (real or simulated) is valid.
    ///
    /// # Errors
    ///
    /// [`LicenseError::Validation`] for an empty token,
    /// [`LicenseError::InvalidToken`] when the authority rejects it, and
    /// [`LicenseError::Store`] on persistence failure.
    pub fn setup_license(&self, token: &str) -> LicenseResult<()> {
        self.setup(token, None)
    }

    /// [`setup_license`](Self::setup_license) bounded by `deadline`.
    pub fn setup_license_until(&self, token: &str, deadline: Instant) -> LicenseResult<()> {
        self.setup(token, Some(deadline))
    }

    /// Re-verifies the configured license and refreshes the cached verdict.
    ///
    /// # Errors
    ///
    /// [`LicenseError::NotConfigured`] when no license is stored (nothing is
    /// written), [`LicenseError::InvalidLicense`] when the authority rejects
    /// it.
    pub fn check_license(&self) -> LicenseResult<bool> {
        self.check(None)
    }

    /// [`check_license`](Self::check_license) bounded by `deadline`.
    pub fn check_license_until(&self, deadline: Instant) -> LicenseResult<bool> {
        self.check(Some(deadline))
    }

    /// Forgets the current license. Succeeds when none is stored.
    pub fn clear_license(&self) -> LicenseResult<()> {
        self.store.clear_record()?;
        Ok(())
    }

    /// Returns true if a license record is stored.
    #[must_use]
    pub fn has_license(&self) -> bool {
        self.store.has_record()
    }

    /// Returns the stored license record, if any.
    pub fn license_info(&self) -> LicenseResult<Option<LicenseRecord>> {
        Ok(self.store.get_record()?)
    }

    /// Summarizes the local license state without contacting the authority.
    #[must_use]
    pub fn license_status(&self) -> LicenseStatus {
        if !self.store.has_record() {
            return LicenseStatus::unconfigured();
        }

        match self.store.get_record() {
            Ok(Some(record)) => LicenseStatus {
                has_license: true,
                is_valid: record.is_active,
                message: if record.is_active {
                    "license active".to_string()
                } else {
                    "license inactive".to_string()
                },
                record: Some(record),
            },
            Ok(None) => LicenseStatus::unconfigured(),
            Err(e) => {
                warn!(error = %e, "Failed to read license record for status");
                LicenseStatus {
                    has_license: true,
                    is_valid: false,
                    record: None,
                    message: "failed to read license record".to_string(),
                }
            }
        }
    }

    /// Returns trust store counters.
    pub fn store_stats(&self) -> LicenseResult<StoreStats> {
        Ok(self.store.stats()?)
    }

    fn verify(
        &self,
        token: &str,
        device_uuid: &str,
        deadline: Option<Instant>,
    ) -> LicenseResult<VerificationVerdict> {
        match deadline {
            Some(deadline) => self
                .client
                .verify_with_fallback_until(token, device_uuid, deadline),
            None => self.client.verify_with_fallback(token, device_uuid),
        }
    }

    fn setup(&self, token: &str, deadline: Option<Instant>) -> LicenseResult<()> {
        let token = token.trim();
        if token.is_empty() {
            return Err(LicenseError::Validation("token must not be empty".to_string()));
        }

        let existing = self.store.get_record()?;
        let device_uuid =
            ensure_device_identity(existing.as_ref().map(|r| r.device_uuid.as_str()));

        let verdict = self.verify(token, &device_uuid, deadline)?;
        if !verdict.valid {
            warn!(
                token = %token_fingerprint(token),
                message = %verdict.message,
                "Authority rejected token during setup"
            );
            return Err(LicenseError::InvalidToken(verdict.message));
        }

        self.store.save_record(token, &device_uuid)?;
        info!(
            device_uuid = %device_uuid,
            token = %token_fingerprint(token),
            simulated = verdict.simulated,
            "License configured"
        );
        Ok(())
    }

    fn check(&self, deadline: Option<Instant>) -> LicenseResult<bool> {
        let record = match self.store.get_record()? {
            Some(r) if !r.token.is_empty() && !r.device_uuid.is_empty() => r,
            _ => return Err(LicenseError::NotConfigured),
        };

        let result = self.verify(&record.token, &record.device_uuid, deadline);
        non_critical("update last check", || self.store.update_last_check());
        let verdict = result?;
        non_critical("update active status", || {
            self.store.update_active_status(verdict.valid)
        });

        if !verdict.valid {
            warn!(
                message = %verdict.message,
                error = verdict.error.as_deref().unwrap_or(""),
                "License rejected by authority"
            );
            return Err(LicenseError::InvalidLicense(verdict.message));
        }

        info!(
            device_uuid = %record.device_uuid,
            simulated = verdict.simulated,
            "License valid"
        );
        Ok(true)
    }
}

/// Runs a secondary store write whose failure must not change the outcome
/// of the operation it follows. Failures are logged, never returned.
fn non_critical(action: &'static str, op: impl FnOnce() -> StoreResult<()>) {
    if let Err(e) = op() {
        warn!(action, error = %e, "Non-critical license store update failed");
    }
}
