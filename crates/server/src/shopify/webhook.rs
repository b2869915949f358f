//! Webhook HMAC-SHA256 signature verification.
//!
//! Shopify signs each webhook delivery with an HMAC-SHA256 over the exact
//! request body bytes, base64-encoded into the `X-Shopify-Hmac-Sha256`
//! header. Verification must run on the raw wire bytes: re-serializing a
//! parsed body can change key order or whitespace and invalidate the
//! signature.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Verify a webhook signature against the raw body bytes.
///
/// Returns `false` for a malformed (non-base64) signature, a wrong digest,
/// or an unusable secret. Comparison is constant-time via `Mac::verify_slice`.
#[must_use]
pub fn verify_signature(raw_body: &[u8], provided_signature: &str, shared_secret: &str) -> bool {
    let Ok(provided) = BASE64.decode(provided_signature) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(shared_secret.as_bytes()) else {
        return false;
    };
    mac.update(raw_body);

    mac.verify_slice(&provided).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "shpss_test_webhook_secret";

    /// Compute the base64 signature the way the platform would.
    fn sign(raw_body: &[u8], shared_secret: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(shared_secret.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(raw_body);
        BASE64.encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_valid_signature_accepted() {
        let body = br#"{"id":501,"email":"buyer@shop.example"}"#;
        let signature = sign(body, SECRET);
        assert!(verify_signature(body, &signature, SECRET));
    }

    #[test]
    fn test_one_byte_body_change_rejected() {
        let body = br#"{"id":501,"email":"buyer@shop.example"}"#;
        let signature = sign(body, SECRET);

        let mut tampered = body.to_vec();
        tampered[8] = b'2';
        assert!(!verify_signature(&tampered, &signature, SECRET));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let body = br#"{"id":501}"#;
        let signature = sign(body, SECRET);
        assert!(!verify_signature(body, &signature, "different_secret"));
    }

    #[test]
    fn test_malformed_signature_rejected() {
        assert!(!verify_signature(b"{}", "not base64!!!", SECRET));
    }

    #[test]
    fn test_empty_signature_rejected() {
        assert!(!verify_signature(b"{}", "", SECRET));
    }
}
