//! The persisted license record and store statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The single authoritative license record for this installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseRecord {
    /// Opaque credential supplied by the operator.
    pub token: String,
    /// Device identity bound to the token.
    pub device_uuid: String,
    /// Cached verdict of the last remote verification.
    pub is_active: bool,
    /// When the record was saved.
    pub created_at: DateTime<Utc>,
    /// When the record was last verified (successfully or not).
    pub last_check_at: DateTime<Utc>,
}

/// Summary counters over the license table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    /// Number of stored license records (0 or 1).
    pub license_count: u64,
    /// Number of stored records marked active.
    pub active_licenses: u64,
    /// Most recent verification time, if any record exists.
    pub last_check_at: Option<DateTime<Utc>>,
}
