//! Local trust store for trustkeep.
//!
//! Persists exactly zero or one [`LicenseRecord`] in a small SQLite file:
//! the license token, the device identity it is bound to, the cached verdict
//! of the last remote check, and its timestamps.
//!
//! The store never talks to the network. Callers decide what to write.

mod error;
mod record;
mod store;

pub use error::{StoreError, StoreResult};
pub use record::{LicenseRecord, StoreStats};
pub use store::TrustStore;
