//! Razorpay API wire types.
//!
//! Only the fields the settlement engine reads are modeled; everything else
//! in the gateway's responses is ignored on deserialization.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Money;
use crate::domain::settlement::PaymentInstrument;
use crate::ports::GatewayPayment;

/// Request body for `POST /v1/orders`.
#[derive(Debug, Serialize)]
pub struct CreateOrderRequest {
    /// Amount in minor currency units.
    pub amount: i64,

    /// ISO 4217 currency code.
    pub currency: String,

    /// Merchant-side receipt reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<String>,
}

/// Response body of `POST /v1/orders`.
#[derive(Debug, Deserialize)]
pub struct RazorpayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
}

/// Response body of `GET /v1/payments/{id}`.
#[derive(Debug, Deserialize)]
pub struct RazorpayPayment {
    pub id: String,

    #[serde(default)]
    pub order_id: Option<String>,

    pub amount: i64,
    pub currency: String,
    pub status: String,

    #[serde(default)]
    pub method: Option<String>,

    #[serde(default)]
    pub card_id: Option<String>,

    #[serde(default)]
    pub bank: Option<String>,

    #[serde(default)]
    pub wallet: Option<String>,

    #[serde(default)]
    pub vpa: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub contact: Option<String>,

    #[serde(default)]
    pub error_code: Option<String>,

    #[serde(default)]
    pub error_description: Option<String>,
}

impl From<RazorpayPayment> for GatewayPayment {
    fn from(payment: RazorpayPayment) -> Self {
        GatewayPayment {
            id: payment.id,
            order_id: payment.order_id,
            status: payment.status,
            amount: Money::from_minor_units(payment.amount, payment.currency),
            instrument: PaymentInstrument {
                method: payment.method,
                card_id: payment.card_id,
                bank: payment.bank,
                wallet: payment.wallet,
                vpa: payment.vpa,
                email: payment.email,
                contact: payment.contact,
            },
            error_code: payment.error_code,
            error_description: payment.error_description,
        }
    }
}
