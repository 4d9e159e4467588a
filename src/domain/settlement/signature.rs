//! Payment signature verification.
//!
//! The gateway signs every completed checkout with HMAC-SHA256 over the
//! canonical string `"{remote_order_id}|{gateway_payment_id}"` using the
//! merchant secret. The caller relays that signature with its verification
//! request; this check is the authorization for everything that follows, and
//! it runs before any trust is placed in caller-supplied payment data.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::errors::SettlementError;

type HmacSha256 = Hmac<Sha256>;

/// Verifier for gateway payment signatures.
pub struct PaymentSignatureVerifier {
    /// Merchant secret shared with the gateway.
    secret: SecretString,
}

impl PaymentSignatureVerifier {
    /// Creates a new verifier with the given merchant secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: SecretString::new(secret.into()),
        }
    }

    /// Verifies a caller-supplied hex signature for an order/payment pair.
    ///
    /// # Verification Steps
    ///
    /// 1. Compute HMAC-SHA256 over `"{remote_order_id}|{payment_id}"`
    /// 2. Hex-decode the supplied signature
    /// 3. Compare in constant time
    ///
    /// # Errors
    ///
    /// Returns `InvalidSignature` on any mismatch, including signatures that
    /// are not valid hex.
    pub fn verify(
        &self,
        remote_order_id: &str,
        gateway_payment_id: &str,
        supplied_signature: &str,
    ) -> Result<(), SettlementError> {
        let expected = self.compute_signature(remote_order_id, gateway_payment_id);

        let supplied =
            hex::decode(supplied_signature).map_err(|_| SettlementError::InvalidSignature)?;

        if !constant_time_compare(&expected, &supplied) {
            return Err(SettlementError::InvalidSignature);
        }

        Ok(())
    }

    /// Computes the HMAC-SHA256 signature bytes for an order/payment pair.
    fn compute_signature(&self, remote_order_id: &str, gateway_payment_id: &str) -> Vec<u8> {
        let canonical = format!("{}|{}", remote_order_id, gateway_payment_id);

        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(canonical.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

/// Performs constant-time comparison of two byte slices.
///
/// This prevents timing attacks that could leak information about the
/// expected signature.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Computes the hex signature for an order/payment pair.
///
/// Used by test fixtures to build valid caller-side signatures.
pub fn sign_payment(secret: &str, remote_order_id: &str, gateway_payment_id: &str) -> String {
    let canonical = format!("{}|{}", remote_order_id, gateway_payment_id);
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(canonical.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "merchant_test_secret_12345";

    #[test]
    fn accepts_valid_signature() {
        let verifier = PaymentSignatureVerifier::new(TEST_SECRET);
        let signature = sign_payment(TEST_SECRET, "order_gw_1", "pay_1");

        assert!(verifier.verify("order_gw_1", "pay_1", &signature).is_ok());
    }

    #[test]
    fn rejects_signature_for_different_payment() {
        let verifier = PaymentSignatureVerifier::new(TEST_SECRET);
        let signature = sign_payment(TEST_SECRET, "order_gw_1", "pay_1");

        let result = verifier.verify("order_gw_1", "pay_2", &signature);
        assert!(matches!(result, Err(SettlementError::InvalidSignature)));
    }

    #[test]
    fn rejects_signature_for_different_order() {
        let verifier = PaymentSignatureVerifier::new(TEST_SECRET);
        let signature = sign_payment(TEST_SECRET, "order_gw_1", "pay_1");

        let result = verifier.verify("order_gw_2", "pay_1", &signature);
        assert!(matches!(result, Err(SettlementError::InvalidSignature)));
    }

    #[test]
    fn rejects_signature_made_with_wrong_secret() {
        let verifier = PaymentSignatureVerifier::new(TEST_SECRET);
        let signature = sign_payment("some_other_secret", "order_gw_1", "pay_1");

        let result = verifier.verify("order_gw_1", "pay_1", &signature);
        assert!(matches!(result, Err(SettlementError::InvalidSignature)));
    }

    #[test]
    fn rejects_non_hex_signature() {
        let verifier = PaymentSignatureVerifier::new(TEST_SECRET);

        let result = verifier.verify("order_gw_1", "pay_1", "zz-not-hex");
        assert!(matches!(result, Err(SettlementError::InvalidSignature)));
    }

    #[test]
    fn rejects_truncated_signature() {
        let verifier = PaymentSignatureVerifier::new(TEST_SECRET);
        let signature = sign_payment(TEST_SECRET, "order_gw_1", "pay_1");

        let result = verifier.verify("order_gw_1", "pay_1", &signature[..32]);
        assert!(matches!(result, Err(SettlementError::InvalidSignature)));
    }

    #[test]
    fn constant_time_compare_equal_values() {
        assert!(constant_time_compare(&[1, 2, 3], &[1, 2, 3]));
    }

    #[test]
    fn constant_time_compare_different_values() {
        assert!(!constant_time_compare(&[1, 2, 3], &[1, 2, 4]));
    }

    #[test]
    fn constant_time_compare_different_lengths() {
        assert!(!constant_time_compare(&[1, 2, 3], &[1, 2, 3, 4]));
    }
}
