//! Generate pairing test vectors for cross-client interop testing.
//!
//! Run with: cargo run --package jointspace --example test_vectors

use jointspace::digest::DigestChallenge;
use jointspace::model::{DeviceInfo, PairingAuthInfo, PairingGrantPayload, PairingRequestPayload};
use jointspace::{create_signature, sign_pin, ApiModel, SHARED_SECRET};

fn main() {
    // Test vector 1: Signature over an arbitrary message
    print_test_vector("signature_12345_pin", &create_signature(&SHARED_SECRET, b"12345<pin>"));

    // Test vector 2: Grant signature for a numeric timestamp and PIN
    print_test_vector("sign_pin_123456789_1234", &sign_pin(123456789, "1234"));

    let device = DeviceInfo {
        id: "abcdefgh12345678".to_string(),
        device_name: "host".to_string(),
        device_os: "linux".to_string(),
        app_id: "1".to_string(),
        app_name: "tvremote".to_string(),
        device_type: "native".to_string(),
    };

    // Test vector 3: Pairing request body
    let request = PairingRequestPayload::new(device.clone());
    print_json_vector("pair_request", &request);

    // Test vector 4: Pairing grant body
    let grant = PairingGrantPayload {
        auth: PairingAuthInfo {
            pin: "1234".to_string(),
            auth_timestamp: 123456789,
            auth_signature: sign_pin(123456789, "1234"),
        },
        device,
    };
    print_json_vector("pair_grant", &grant);

    // Test vector 5: Digest response with qop=auth
    let challenge = DigestChallenge::parse(
        r#"Digest realm="testrealm@host.com", qop="auth", nonce="dcd98b7102dd2f0e8b11d0f600bfb0c093", opaque="5ccc069c403ebaf9f0171e9517f40e41""#,
    )
    .expect("challenge parses");
    let header = challenge.authorization(
        "Mufasa",
        "Circle Of Life",
        "GET",
        "/dir/index.html",
        1,
        "0a4f113b",
    );
    print_test_vector("digest_authorization", &header);
}

fn print_json_vector<M: ApiModel>(name: &str, model: &M) {
    let wire = model.to_wire().expect("serialization failed");
    print_test_vector(name, &wire.to_string());
}

fn print_test_vector(name: &str, value: &str) {
    println!("export const {} = {:?};", name, value);
}
