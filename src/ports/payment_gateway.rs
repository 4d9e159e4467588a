//! Payment gateway port.
//!
//! A thin contract over the external payment processor: create a remote
//! order to charge against, and fetch the authoritative record of a payment.
//! Implementations must bound every outbound call with a timeout - an
//! unbounded wait here stalls license issuance.

use async_trait::async_trait;

use crate::domain::foundation::Money;
use crate::domain::settlement::PaymentInstrument;

/// Authoritative gateway-side view of one payment.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayPayment {
    /// Gateway payment identifier.
    pub id: String,

    /// Remote order the payment was made against.
    pub order_id: Option<String>,

    /// Gateway payment status (e.g. "created", "authorized", "captured",
    /// "failed", "refunded"). Only "captured" triggers issuance.
    pub status: String,

    /// Amount and currency as the gateway settled them.
    pub amount: Money,

    /// Instrument metadata as far as the gateway reported it.
    pub instrument: PaymentInstrument,

    /// Gateway error code for failed charges.
    pub error_code: Option<String>,

    /// Gateway error description for failed charges.
    pub error_description: Option<String>,
}

/// Errors from gateway operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    #[error("gateway request failed: {0}")]
    Request(String),

    #[error("gateway request timed out")]
    Timeout,

    #[error("gateway rejected credentials")]
    Authentication,

    #[error("gateway returned an unexpected response: {0}")]
    InvalidResponse(String),
}

/// Port for the external payment processor.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates a remote order to collect the given amount.
    ///
    /// Returns the gateway's order id, which later appears in the payment
    /// signature.
    async fn create_remote_order(&self, amount: &Money) -> Result<String, GatewayError>;

    /// Fetches the authoritative payment record for a gateway payment id.
    ///
    /// This is the second source of truth behind the signature check: a
    /// replayed signature pair can be valid without the charge having
    /// settled, so issuance always consults the gateway's own record.
    async fn fetch_payment(&self, gateway_payment_id: &str)
        -> Result<GatewayPayment, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn payment_gateway_is_object_safe() {
        fn _accepts_dyn(_gateway: &dyn PaymentGateway) {}
    }

    #[test]
    fn gateway_error_display_is_stable() {
        assert_eq!(
            GatewayError::Timeout.to_string(),
            "gateway request timed out"
        );
        assert!(GatewayError::Request("boom".into())
            .to_string()
            .contains("boom"));
    }
}
