//! Payment record entity.
//!
//! A Payment is the immutable record of a single gateway charge attempt
//! against an order. It is written exactly once, at verification time, and
//! never mutated afterward.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Money, OrderId, Timestamp};

/// Gateway payment status string that triggers license issuance.
///
/// Any other gateway-reported status is a hard verification failure.
pub const CAPTURED_STATUS: &str = "captured";

/// Gateway-reported payment method and instrument details.
///
/// All fields are optional; the gateway omits whatever does not apply to the
/// instrument used (card, netbanking, wallet, UPI).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInstrument {
    /// Payment method (e.g. "card", "netbanking", "wallet", "upi").
    pub method: Option<String>,

    /// Card identifier, when paid by card.
    pub card_id: Option<String>,

    /// Bank code, when paid by netbanking.
    pub bank: Option<String>,

    /// Wallet provider, when paid by wallet.
    pub wallet: Option<String>,

    /// Virtual payment address, when paid by UPI.
    pub vpa: Option<String>,

    /// Payer email as reported by the gateway.
    pub email: Option<String>,

    /// Payer contact number as reported by the gateway.
    pub contact: Option<String>,
}

/// Immutable record of one gateway charge attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Order this payment settles.
    pub order_id: OrderId,

    /// Gateway-side payment identifier.
    pub gateway_payment_id: String,

    /// Signature the caller presented to authenticate this payment.
    pub signature: String,

    /// Gateway-reported amount and currency.
    pub amount: Money,

    /// Gateway-reported payment status.
    pub status: String,

    /// Method and instrument metadata, as far as the gateway reported it.
    pub instrument: PaymentInstrument,

    /// Gateway error code for failed charges.
    pub error_code: Option<String>,

    /// Gateway error description for failed charges.
    pub error_description: Option<String>,

    /// When the record was written.
    pub created_at: Timestamp,
}

impl Payment {
    /// Creates a payment record from gateway-reported state.
    #[allow(clippy::too_many_arguments)]
    pub fn record(
        order_id: OrderId,
        gateway_payment_id: String,
        signature: String,
        amount: Money,
        status: String,
        instrument: PaymentInstrument,
        error_code: Option<String>,
        error_description: Option<String>,
    ) -> Self {
        Self {
            order_id,
            gateway_payment_id,
            signature,
            amount,
            status,
            instrument,
            error_code,
            error_description,
            created_at: Timestamp::now(),
        }
    }

    /// Returns true if the gateway captured the charge.
    pub fn is_captured(&self) -> bool {
        self.status == CAPTURED_STATUS
    }
}
