//! Two-step pairing handshake.
//!
//! Pairing exchanges the PIN shown on the TV for durable [`Credentials`]:
//!
//! ```text
//! -> pair/request  {scope, device}           <- {auth_key, timestamp, timeout}
//!    (user reads PIN from the screen)
//! -> pair/grant    {auth: {pin, signature}}  <- {error_id: SUCCESS}
//! ```
//!
//! The grant is sent Digest-authenticated as `(device.id, auth_key)`, and that
//! pair becomes the returned credentials.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::api::TvApi;
use crate::crypto::sign_pin;
use crate::error::{Result, TvError};
use crate::model::{DeviceInfo, PairingAuthInfo, PairingGrantPayload, PairingRequestPayload};
use crate::transport::{Credentials, Transport};

/// Progress of a pairing attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingState {
    /// Nothing sent yet.
    Idle,
    /// The TV accepted the request and displays a PIN.
    Requested,
    /// The grant succeeded; credentials are active on the client.
    Paired,
    /// The attempt failed; the client is left unauthenticated.
    Failed,
}

/// Drives one pairing attempt over a [`TvApi`].
///
/// Only one attempt may run per client at a time since pairing rewrites the
/// client's credentials.
#[derive(Debug)]
pub struct Pairer<'a, T> {
    api: &'a TvApi<T>,
    device: DeviceInfo,
    state: PairingState,
}

impl<'a, T: Transport> Pairer<'a, T> {
    pub fn new(api: &'a TvApi<T>, device: DeviceInfo) -> Self {
        Self {
            api,
            device,
            state: PairingState::Idle,
        }
    }

    pub fn state(&self) -> PairingState {
        self.state
    }

    pub fn device(&self) -> &DeviceInfo {
        &self.device
    }

    /// Runs the handshake, awaiting `pin_provider` for the PIN on screen.
    ///
    /// When the TV announces a session timeout the PIN wait is bounded by it.
    /// On success the returned credentials are also set on the client; on any
    /// failure the client's credentials are cleared. Calling this again
    /// restarts pairing from scratch.
    pub async fn pair<F, Fut, E>(&mut self, pin_provider: F) -> Result<Credentials>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<String, E>>,
        E: fmt::Display,
    {
        self.state = PairingState::Idle;

        match self.run(pin_provider).await {
            Ok(credentials) => {
                self.state = PairingState::Paired;
                info!(host = self.api.host(), device_id = %credentials.id, "Pairing completed");
                Ok(credentials)
            }
            Err(e) => {
                self.api.set_auth(None);
                self.state = PairingState::Failed;
                warn!(host = self.api.host(), error = %e, "Pairing failed");
                Err(e)
            }
        }
    }

    async fn run<F, Fut, E>(&mut self, pin_provider: F) -> Result<Credentials>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<String, E>>,
        E: fmt::Display,
    {
        // The TV rejects pairing requests carrying a previous session's auth.
        self.api.set_auth(None);

        debug!(device_id = %self.device.id, "Sending pairing request");
        let response = self
            .api
            .pair_request(&PairingRequestPayload::new(self.device.clone()))
            .await?;

        let accepted = response
            .accepted()
            .map(|(key, timestamp)| (key.to_string(), timestamp));
        let Some((auth_key, timestamp)) = accepted else {
            return Err(TvError::pairing(response.error_id, response.error_text));
        };
        self.state = PairingState::Requested;
        debug!(timestamp, timeout = ?response.timeout, "Pairing request accepted");

        let pin = wait_for_pin(pin_provider, response.timeout).await?;

        let credentials = Credentials::new(self.device.id.clone(), auth_key);
        self.api.set_auth(Some(credentials.clone()));

        let grant = PairingGrantPayload {
            auth: PairingAuthInfo {
                auth_signature: sign_pin(timestamp, &pin),
                pin,
                auth_timestamp: timestamp,
            },
            device: self.device.clone(),
        };
        let response = self.api.pair_grant(&grant).await?;
        if !response.is_success() {
            return Err(TvError::pairing(response.error_id, response.error_text));
        }

        Ok(credentials)
    }
}

async fn wait_for_pin<F, Fut, E>(pin_provider: F, timeout_secs: Option<u64>) -> Result<String>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = std::result::Result<String, E>>,
    E: fmt::Display,
{
    let pin = match timeout_secs {
        Some(secs) if secs > 0 => {
            tokio::time::timeout(Duration::from_secs(secs), pin_provider())
                .await
                .map_err(|_| TvError::PinTimeout { timeout_secs: secs })?
        }
        _ => pin_provider().await,
    };
    pin.map_err(|e| TvError::PinUnavailable(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{create_signature, SHARED_SECRET};
    use crate::error::HttpMethod;
    use crate::testing::FakeTransport;
    use serde_json::json;

    const REQUEST: &str = "6/pair/request";
    const GRANT: &str = "6/pair/grant";

    fn device() -> DeviceInfo {
        DeviceInfo {
            id: "<device_id>".to_string(),
            device_name: "<device_name>".to_string(),
            device_os: "<device_os>".to_string(),
            app_id: "<app_id>".to_string(),
            app_name: "<app_name>".to_string(),
            device_type: "<type>".to_string(),
        }
    }

    fn request_success() -> serde_json::Value {
        json!({
            "error_id": "SUCCESS",
            "error_text": "Authorization required",
            "auth_key": "<key>",
            "timestamp": 12345,
            "timeout": 60,
        })
    }

    fn grant_success() -> serde_json::Value {
        json!({"error_id": "SUCCESS", "error_text": "Pairing completed"})
    }

    async fn pin() -> std::result::Result<String, std::io::Error> {
        Ok("<pin>".to_string())
    }

    #[tokio::test]
    async fn test_pair_success() {
        let api = TvApi::new(
            FakeTransport::new()
                .with_post(REQUEST, request_success())
                .with_post(GRANT, grant_success()),
        );
        let mut pairer = Pairer::new(&api, device());

        let credentials = pairer.pair(pin).await.unwrap();

        assert_eq!(credentials, Credentials::new("<device_id>", "<key>"));
        assert_eq!(api.auth(), Some(Credentials::new("<device_id>", "<key>")));
        assert_eq!(pairer.state(), PairingState::Paired);
    }

    #[tokio::test]
    async fn test_pair_request_and_grant_payloads() {
        let api = TvApi::new(
            FakeTransport::new()
                .with_post(REQUEST, request_success())
                .with_post(GRANT, grant_success()),
        );

        Pairer::new(&api, device()).pair(pin).await.unwrap();

        let request = api.transport().last_post(REQUEST).unwrap();
        assert_eq!(request["scope"], json!(["read", "write", "control"]));
        assert_eq!(request["device"]["id"], "<device_id>");

        let grant = api.transport().last_post(GRANT).unwrap();
        assert_eq!(
            grant["auth"],
            json!({
                "pin": "<pin>",
                "auth_timestamp": 12345,
                "auth_signature": create_signature(&SHARED_SECRET, b"12345<pin>"),
            })
        );
        assert_eq!(grant["device"]["id"], "<device_id>");
        assert!(grant["auth"].get("auth_AppId").is_none());
    }

    #[tokio::test]
    async fn test_pair_request_is_unauthenticated_and_grant_is_authenticated() {
        let api = TvApi::new(
            FakeTransport::new()
                .with_post(REQUEST, request_success())
                .with_post(GRANT, grant_success()),
        );
        api.set_auth(Some(Credentials::new("old", "stale")));

        Pairer::new(&api, device()).pair(pin).await.unwrap();

        let transport = api.transport();
        assert_eq!(transport.requests_to(HttpMethod::Post, REQUEST)[0].auth, None);
        assert_eq!(
            transport.requests_to(HttpMethod::Post, GRANT)[0].auth,
            Some(Credentials::new("<device_id>", "<key>"))
        );
    }

    #[tokio::test]
    async fn test_pair_request_rejected() {
        let api = TvApi::new(
            FakeTransport::new()
                .with_post(
                    REQUEST,
                    json!({
                        "error_id": "CONCURRENT_PAIRING",
                        "error_text": "Another pairing is in process",
                    }),
                )
                .with_post(GRANT, grant_success()),
        );
        let mut pairer = Pairer::new(&api, device());

        let err = pairer.pair(pin).await.unwrap_err();

        assert!(err.to_string().contains("CONCURRENT_PAIRING"));
        assert!(matches!(err, TvError::Pairing { ref error_id, .. } if error_id == "CONCURRENT_PAIRING"));
        assert!(api.transport().requests_to(HttpMethod::Post, GRANT).is_empty());
        assert_eq!(api.auth(), None);
        assert_eq!(pairer.state(), PairingState::Failed);
    }

    #[tokio::test]
    async fn test_pair_request_rejected_does_not_ask_for_pin() {
        let api = TvApi::new(FakeTransport::new().with_post(
            REQUEST,
            json!({"error_id": "CONCURRENT_PAIRING", "error_text": "busy"}),
        ));

        let mut asked = false;
        let result = Pairer::new(&api, device())
            .pair(|| {
                asked = true;
                pin()
            })
            .await;

        assert!(result.is_err());
        assert!(!asked);
    }

    #[tokio::test]
    async fn test_pair_grant_rejected_clears_credentials() {
        let api = TvApi::new(
            FakeTransport::new()
                .with_post(REQUEST, request_success())
                .with_post(
                    GRANT,
                    json!({
                        "error_id": "INVALID_PIN",
                        "error_text": "Invalid authentication parameters",
                    }),
                ),
        );
        let mut pairer = Pairer::new(&api, device());

        let err = pairer.pair(pin).await.unwrap_err();

        assert!(err.to_string().contains("INVALID_PIN"));
        assert_eq!(api.auth(), None);
        assert_eq!(pairer.state(), PairingState::Failed);
    }

    #[tokio::test]
    async fn test_pair_grant_transport_error_clears_credentials() {
        let api = TvApi::new(
            FakeTransport::new()
                .with_post(REQUEST, request_success())
                .with_status(HttpMethod::Post, GRANT, 401),
        );

        let err = Pairer::new(&api, device()).pair(pin).await.unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(api.auth(), None);
    }

    #[tokio::test]
    async fn test_pin_provider_failure() {
        let api = TvApi::new(FakeTransport::new().with_post(REQUEST, request_success()));
        let mut pairer = Pairer::new(&api, device());

        let err = pairer
            .pair(|| async { Err::<String, _>("stdin closed") })
            .await
            .unwrap_err();

        assert!(matches!(err, TvError::PinUnavailable(ref msg) if msg == "stdin closed"));
        assert_eq!(pairer.state(), PairingState::Failed);
        assert!(api.transport().requests_to(HttpMethod::Post, GRANT).is_empty());
    }

    #[tokio::test]
    async fn test_pin_wait_bounded_by_session_timeout() {
        let api = TvApi::new(FakeTransport::new().with_post(
            REQUEST,
            json!({
                "error_id": "SUCCESS",
                "error_text": "Authorization required",
                "auth_key": "<key>",
                "timestamp": 12345,
                "timeout": 1,
            }),
        ));
        let mut pairer = Pairer::new(&api, device());

        let err = pairer
            .pair(std::future::pending::<std::result::Result<String, String>>)
            .await
            .unwrap_err();

        assert!(matches!(err, TvError::PinTimeout { timeout_secs: 1 }));
        assert_eq!(api.auth(), None);
        assert_eq!(pairer.state(), PairingState::Failed);
    }

    #[tokio::test]
    async fn test_pin_wait_unbounded_without_timeout() {
        let api = TvApi::new(
            FakeTransport::new()
                .with_post(
                    REQUEST,
                    json!({
                        "error_id": "SUCCESS",
                        "error_text": "Authorization required",
                        "auth_key": "<key>",
                        "timestamp": 12345,
                    }),
                )
                .with_post(GRANT, grant_success()),
        );

        let credentials = Pairer::new(&api, device())
            .pair(|| async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok::<_, String>("<pin>".to_string())
            })
            .await
            .unwrap();

        assert_eq!(credentials.key, "<key>");
    }

    #[test]
    fn test_new_pairer_is_idle() {
        let api = TvApi::new(FakeTransport::new());
        let pairer = Pairer::new(&api, device());
        assert_eq!(pairer.state(), PairingState::Idle);
        assert_eq!(pairer.device().id, "<device_id>");
    }
}
