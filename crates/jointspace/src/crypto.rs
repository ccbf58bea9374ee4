//! Pairing signatures and device identifiers.
//!
//! The grant step of the pairing handshake proves knowledge of the PIN shown
//! on screen by signing `"{timestamp}{pin}"` with a secret shared by every
//! JointSpace client. The TV expects the HMAC-SHA256 digest hex-encoded and
//! then base64-encoded.

use std::sync::LazyLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::Sha256;

/// Length of a generated device ID in characters.
pub const DEVICE_ID_LENGTH: usize = 16;

const SHARED_SECRET_B64: &str =
    "JCqdN5AcnAHgJYseUn7ER5k3qgtemfUvMRghQpTfTZq7Cvv8EPQPqfz6dDxPQPSu4gKFPWkJGw32zyASgJkHwCjU";

/// HMAC key used for pairing signatures.
///
/// Identical for all clients; it is part of the device protocol, not a
/// per-installation secret, and is never sent over the wire.
pub static SHARED_SECRET: LazyLock<Vec<u8>> = LazyLock::new(|| {
    STANDARD
        .decode(SHARED_SECRET_B64)
        .expect("embedded pairing secret is valid base64")
});

/// Computes `base64(hex(HMAC-SHA256(secret, message)))`.
pub fn create_signature(secret: &[u8], message: &[u8]) -> String {
    // HMAC-SHA256 accepts keys of any length.
    let mut mac = Hmac::<Sha256>::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(message);
    let digest_hex = hex::encode(mac.finalize().into_bytes());
    STANDARD.encode(digest_hex)
}

/// Builds the message signed during the grant step: timestamp then PIN, no separator.
pub fn pairing_message(timestamp: i64, pin: &str) -> String {
    format!("{timestamp}{pin}")
}

/// Signs a pairing PIN with [`SHARED_SECRET`].
pub fn sign_pin(timestamp: i64, pin: &str) -> String {
    create_signature(&SHARED_SECRET, pairing_message(timestamp, pin).as_bytes())
}

/// Generates a random alphanumeric device ID.
pub fn generate_device_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(DEVICE_ID_LENGTH)
        .map(char::from)
        .collect()
}
