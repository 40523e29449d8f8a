//! Gateway callback signature verification.
//!
//! Implements server-side verification of the payment gateway's callback
//! signature using HMAC-SHA256 over `"{order_id}|{payment_id}"`. This is
//! the only place in the system where "paid" becomes machine-verified;
//! the self-attested channel deliberately has no equivalent.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::domain::foundation::{DomainError, ErrorCode};

use super::order::PaymentCallback;

/// Verifier for gateway payment-callback signatures.
pub struct GatewaySignatureVerifier {
    /// The signing secret shared with the gateway.
    secret: SecretString,
}

impl GatewaySignatureVerifier {
    /// Creates a new verifier with the given signing secret.
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Verifies a callback's signature.
    ///
    /// # Verification Steps
    ///
    /// 1. Decode the hex signature
    /// 2. Compute expected HMAC-SHA256 over `"{order_id}|{payment_id}"`
    /// 3. Compare in constant time
    ///
    /// # Errors
    ///
    /// - `PaymentVerificationFailed` on malformed hex or mismatch; the
    ///   error never distinguishes the two, so a forger learns nothing
    ///   from the failure mode.
    pub fn verify(&self, callback: &PaymentCallback) -> Result<(), DomainError> {
        let provided = hex::decode(&callback.signature).map_err(|_| {
            DomainError::new(
                ErrorCode::PaymentVerificationFailed,
                "Gateway signature rejected",
            )
        })?;

        let expected = self.compute_signature(&callback.order_id, &callback.payment_id);

        if constant_time_compare(&expected, &provided) {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::PaymentVerificationFailed,
                "Gateway signature rejected",
            )
            .with_detail("order_id", callback.order_id.clone()))
        }
    }

    /// Computes the HMAC-SHA256 signature for an order/payment pair.
    fn compute_signature(&self, order_id: &str, payment_id: &str) -> Vec<u8> {
        let signed_payload = format!("{}|{}", order_id, payment_id);
        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC accepts any key");
        mac.update(signed_payload.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Computes a valid hex signature for use in test fixtures.
#[cfg(test)]
pub fn compute_test_signature(secret: &str, order_id: &str, payment_id: &str) -> String {
    let signed_payload = format!("{}|{}", order_id, payment_id);
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key");
    mac.update(signed_payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
