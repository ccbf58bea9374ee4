//! Pairing handshake payloads.

use serde::{Deserialize, Serialize};

/// Status reported by the TV when a pairing step succeeds.
pub const PAIRING_SUCCESS: &str = "SUCCESS";

/// Permission requested during pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairingScope {
    Read,
    Write,
    Control,
}

impl PairingScope {
    /// The full scope every pairing request asks for.
    pub const ALL: [PairingScope; 3] = [
        PairingScope::Read,
        PairingScope::Write,
        PairingScope::Control,
    ];
}

/// Description of the device asking to pair.
///
/// `id` becomes the Digest username for all later requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub id: String,
    pub device_name: String,
    pub device_os: String,
    pub app_id: String,
    pub app_name: String,
    #[serde(rename = "type")]
    pub device_type: String,
}

/// Proof of the PIN shown on the TV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingAuthInfo {
    pub pin: String,
    pub auth_timestamp: i64,
    pub auth_signature: String,
}

/// Body of `POST pair/request`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingRequestPayload {
    pub scope: Vec<PairingScope>,
    pub device: DeviceInfo,
}

impl PairingRequestPayload {
    /// Requests read, write and control permissions for `device`.
    pub fn new(device: DeviceInfo) -> Self {
        Self {
            scope: PairingScope::ALL.to_vec(),
            device,
        }
    }
}

/// Body of `POST pair/grant`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingGrantPayload {
    pub auth: PairingAuthInfo,
    pub device: DeviceInfo,
}

/// Response to `POST pair/grant`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingResponse {
    pub error_id: String,
    pub error_text: String,
}

impl PairingResponse {
    pub fn is_success(&self) -> bool {
        self.error_id == PAIRING_SUCCESS
    }
}

/// Response to `POST pair/request`.
///
/// `auth_key` and `timestamp` are only present when the TV accepted the
/// request; `timeout` is the pairing session lifetime in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingRequestResponse {
    pub error_id: String,
    pub error_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl PairingRequestResponse {
    /// Returns the auth key and timestamp when the request step succeeded.
    pub fn accepted(&self) -> Option<(&str, i64)> {
        if self.error_id != PAIRING_SUCCESS {
            return None;
        }
        Some((self.auth_key.as_deref()?, self.timestamp?))
    }
}
