//! # JointSpace Client Library
//!
//! Client for the local HTTP control API ("JointSpace") of Philips TVs.
//!
//! ## Overview
//!
//! The crate covers everything needed to talk to a TV on the local network:
//!
//! - **Pairing**: the two-step PIN handshake that yields durable credentials
//! - **Signatures**: HMAC-SHA256 signing of the PIN with the protocol secret
//! - **Transport**: HTTPS with Digest authentication against a self-signed TV
//! - **API Client**: typed endpoints with error translation
//! - **Models**: wire payloads validated on decode
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │                 Pairer                  │  PIN handshake
//! ├─────────────────────────────────────────┤
//! │                 TvApi                   │  Typed endpoints, 401 / validation
//! ├─────────────────────────────────────────┤
//! │               Transport                 │  JSON over HTTPS, Digest auth
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use jointspace::{Credentials, Pairer, TvApi, TvTransport};
//! use jointspace::model::DeviceInfo;
//!
//! # async fn run() -> jointspace::Result<()> {
//! let api = TvApi::new(TvTransport::with_auth("192.168.0.10", None)?);
//!
//! let device = DeviceInfo {
//!     id: jointspace::crypto::generate_device_id(),
//!     device_name: "living-room-pc".to_string(),
//!     device_os: "linux".to_string(),
//!     app_id: "1".to_string(),
//!     app_name: "example".to_string(),
//!     device_type: "native".to_string(),
//! };
//! let credentials: Credentials = Pairer::new(&api, device)
//!     .pair(|| async { Ok::<_, std::io::Error>("1234".to_string()) })
//!     .await?;
//!
//! // The client is now authenticated.
//! let volume = api.get_volume().await?;
//! println!("{} paired, volume {}", credentials.id, volume.current);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`api`]: Typed endpoint client
//! - [`pairing`]: Pairing handshake
//! - [`transport`]: HTTP transport and credentials
//! - [`digest`]: HTTP Digest authentication
//! - [`crypto`]: Pairing signatures and device IDs
//! - [`model`]: Wire payloads
//! - [`error`]: Error types

pub mod api;
pub mod crypto;
pub mod digest;
pub mod error;
pub mod model;
pub mod pairing;
pub mod transport;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use api::{TvApi, API_VERSION};
pub use crypto::{create_signature, generate_device_id, sign_pin, DEVICE_ID_LENGTH, SHARED_SECRET};
pub use error::{HttpMethod, Result, TvError};
pub use model::{ApiModel, ValidationError};
pub use pairing::{Pairer, PairingState};
pub use transport::{
    Credentials, Transport, TransportConfig, TransportFuture, TvTransport, DEFAULT_PORT,
};
