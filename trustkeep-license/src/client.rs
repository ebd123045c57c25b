//! Remote verification client.
//!
//! Sends `{token, device_uuid}` to `{authority_url}/api/verify-token` and
//! parses the authority's verdict. A non-2xx status with a readable JSON body
//! is still a verdict; only transport and decode failures are errors.

use crate::config::ClientConfig;
use crate::device::token_fingerprint;
use crate::error::{LicenseError, LicenseResult};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Message carried by locally synthesized verdicts.
pub const SIMULATED_MESSAGE: &str = "token is valid (simulated)";

/// Request body for the verify-token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyTokenRequest {
    pub token: String,
    pub device_uuid: String,
}

/// Machine metadata reported by the authority.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub device_uuid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub registered_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_access_at: String,
}

/// Employer metadata reported by the authority.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
}

/// Outcome of a verification attempt.
///
/// Absent or `null` fields decode to their zero values, so a rejection body
/// without `valid` reads as `valid = false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationVerdict {
    #[serde(default, deserialize_with = "null_as_default")]
    pub valid: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub machine: MachineInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub employer: EmployerInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// True when the verdict was synthesized locally instead of received.
    #[serde(skip)]
    pub simulated: bool,
}

impl VerificationVerdict {
    /// Builds the stand-in verdict used while the authority is unreachable.
    #[must_use]
    pub fn simulated(device_uuid: &str) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            valid: true,
            message: SIMULATED_MESSAGE.to_string(),
            machine: MachineInfo {
                id: "simulated-machine-id".to_string(),
                device_uuid: device_uuid.to_string(),
                status: "active".to_string(),
                registered_at: now.clone(),
                last_access_at: now,
            },
            employer: EmployerInfo {
                id: "simulated-employer-id".to_string(),
                name: "Simulated Employer".to_string(),
                email: "employer@simulated.invalid".to_string(),
            },
            error: None,
            simulated: true,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Blocking HTTP client for the licensing authority.
#[derive(Debug, Clone)]
pub struct VerificationClient {
    config: ClientConfig,
    http: Client,
}

impl VerificationClient {
    /// Creates a client with the configured timeout.
    ///
    /// A zero timeout is rejected: every request would fail instantly and,
    /// with offline grace on, every verdict would be simulated.
    pub fn new(config: ClientConfig) -> LicenseResult<Self> {
        if config.timeout_secs == 0 {
            return Err(LicenseError::Config(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("trustkeep/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LicenseError::Config(format!("http client: {e}")))?;
        Ok(Self { config, http })
    }

    /// Returns the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/api/verify-token",
            self.config.authority_url.trim_end_matches('/')
        )
    }

    /// Asks the authority for a verdict on `token` bound to `device_uuid`.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Network`] if the request cannot be sent or the
    /// response body cannot be read or decoded.
    pub fn verify(&self, token: &str, device_uuid: &str) -> LicenseResult<VerificationVerdict> {
        self.send(token, device_uuid, None)
    }

    /// Like [`verify`](Self::verify), but gives up once `deadline` passes.
    ///
    /// An already-elapsed deadline fails without touching the network.
    pub fn verify_with_deadline(
        &self,
        token: &str,
        device_uuid: &str,
        deadline: Instant,
    ) -> LicenseResult<VerificationVerdict> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(LicenseError::Network(
                "deadline elapsed before request was sent".to_string(),
            ));
        }
        self.send(token, device_uuid, Some(remaining.min(self.config.timeout())))
    }

    /// Verifies, substituting a simulated valid verdict on network failure
    /// when offline grace is enabled.
    pub fn verify_with_fallback(
        &self,
        token: &str,
        device_uuid: &str,
    ) -> LicenseResult<VerificationVerdict> {
        self.fallback(device_uuid, self.verify(token, device_uuid))
    }

    /// Deadline-bounded [`verify_with_fallback`](Self::verify_with_fallback).
    pub fn verify_with_fallback_until(
        &self,
        token: &str,
        device_uuid: &str,
        deadline: Instant,
    ) -> LicenseResult<VerificationVerdict> {
        self.fallback(
            device_uuid,
            self.verify_with_deadline(token, device_uuid, deadline),
        )
    }

    fn fallback(
        &self,
        device_uuid: &str,
        result: LicenseResult<VerificationVerdict>,
    ) -> LicenseResult<VerificationVerdict> {
        match result {
            Err(LicenseError::Network(reason)) if self.config.offline_grace_enabled => {
                warn!(error = %reason, "Authority unavailable, using simulated verdict");
                Ok(VerificationVerdict::simulated(device_uuid))
            }
            other => other,
        }
    }

    fn send(
        &self,
        token: &str,
        device_uuid: &str,
        timeout: Option<Duration>,
    ) -> LicenseResult<VerificationVerdict> {
        let body = VerifyTokenRequest {
            token: token.to_string(),
            device_uuid: device_uuid.to_string(),
        };

        let mut request = self
            .http
            .post(self.endpoint())
            .header(ACCEPT, "application/json")
            .json(&body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        debug!(token = %token_fingerprint(token), device_uuid = %device_uuid, "Verifying token");

        let response = request
            .send()
            .map_err(|e| LicenseError::Network(format!("request failed: {e}")))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .map_err(|e| LicenseError::Network(format!("failed to read response: {e}")))?;
        let verdict: VerificationVerdict = serde_json::from_slice(&bytes)
            .map_err(|e| LicenseError::Network(format!("failed to decode response: {e}")))?;

        if !status.is_success() {
            warn!(
                status = status.as_u16(),
                message = %verdict.message,
                "Authority returned non-success status"
            );
        }
        Ok(verdict)
    }
}
