//! License verification and device binding for trustkeep.
//!
//! This module handles:
//! - Device identity generation for binding a token to one installation
//! - Verification of a token against the remote licensing authority
//! - Offline continuity when the authority cannot be reached
//! - Keeping the local trust store's cached verdict current
//!
//! # Offline grace
//!
//! With `offline_grace_enabled` (the default), a network failure yields a
//! simulated *valid* verdict. The authority being unreachable can therefore
//! never deactivate a license; disable the flag to surface
//! [`LicenseError::Network`] instead.
//!
//! # Wire format
//!
//! `POST {authority_url}/api/verify-token` with `{"token", "device_uuid"}`,
//! answered by `{"valid", "message", "machine", "employer", "error"?}`.

mod client;
mod config;
mod device;
mod error;
mod manager;

pub use client::{
    EmployerInfo, MachineInfo, SIMULATED_MESSAGE, VerificationClient, VerificationVerdict,
    VerifyTokenRequest,
};
pub use config::{
    ClientConfig, DEFAULT_AUTHORITY_URL, DEFAULT_TIMEOUT_SECS, LicenseConfig,
    default_database_path,
};
pub use device::{ensure_device_identity, generate_device_identity, token_fingerprint};
pub use error::{LicenseError, LicenseResult};
pub use manager::{LicenseManager, LicenseStatus};

pub use trustkeep_store::{LicenseRecord, StoreError, StoreStats, TrustStore};
