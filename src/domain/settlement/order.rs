//! Order aggregate entity.
//!
//! An Order is a buyer's purchase intent for one license option on one
//! track. It moves through a finite lifecycle driven entirely by payment
//! verification; an order is never deleted, and once `Paid` it never leaves
//! that state.
//!
//! # Invariants
//!
//! - At most one Payment and at most one License per order; both are created
//!   only as a side effect of the `Pending -> Paid` transition.
//! - The chosen license-option id is bound at creation time inside the order
//!   notes and read back at issuance.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use crate::domain::foundation::{
    LicenseOptionId, Money, OrderId, StateMachine, Timestamp, TrackId, UserId,
};

use super::errors::SettlementError;

/// How long a pending order stays payable before it expires.
pub const ORDER_EXPIRY_MINUTES: i64 = 15;

/// Notes key under which the chosen license-option id is stored.
pub const LICENSE_OPTION_ID_KEY: &str = "license_option_id";

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created locally and at the gateway, awaiting payment.
    Pending,

    /// Reserved intermediate state; not produced by the settlement engine.
    Processing,

    /// Payment verified and captured; license issued. Terminal.
    Paid,

    /// Payment verification failed or the order expired. Terminal.
    Failed,

    /// Buyer abandoned the order before paying. Terminal.
    Cancelled,
}

impl StateMachine for OrderStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use OrderStatus::*;
        matches!(
            (self, target),
            // From PENDING
            (Pending, Paid)
                | (Pending, Failed)
                | (Pending, Cancelled)
                | (Pending, Processing)
            // From PROCESSING (reserved)
                | (Processing, Paid)
                | (Processing, Failed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use OrderStatus::*;
        match self {
            Pending => vec![Paid, Failed, Cancelled, Processing],
            Processing => vec![Paid, Failed],
            Paid => vec![],
            Failed => vec![],
            Cancelled => vec![],
        }
    }
}

/// Small typed map of order-scoped facts.
///
/// The settlement engine only ever writes the license-option id here, but the
/// map shape is kept so the wire/storage format stays open for other keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNotes(HashMap<String, String>);

impl OrderNotes {
    /// Creates an empty notes map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates notes carrying the chosen license-option id.
    pub fn with_license_option(option_id: LicenseOptionId) -> Self {
        let mut notes = Self::new();
        notes
            .0
            .insert(LICENSE_OPTION_ID_KEY.to_string(), option_id.to_string());
        notes
    }

    /// Returns the raw value for a key, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Reads the license-option id bound at order creation.
    ///
    /// # Errors
    ///
    /// - `LicenseOptionIdMissing` when the key is absent
    /// - `InvalidLicenseOptionId` when present but not a valid identifier
    pub fn license_option_id(&self) -> Result<LicenseOptionId, SettlementError> {
        let raw = self
            .get(LICENSE_OPTION_ID_KEY)
            .ok_or(SettlementError::LicenseOptionIdMissing)?;
        LicenseOptionId::from_str(raw)
            .map_err(|_| SettlementError::InvalidLicenseOptionId(raw.to_string()))
    }
}

/// Order aggregate - a purchase intent with a payment lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique identifier for this order.
    pub id: OrderId,

    /// Buyer who placed the order.
    pub buyer_id: UserId,

    /// Track being licensed.
    pub track_id: TrackId,

    /// Human-readable license tier label (e.g. "Basic", "Premium").
    pub license_type: String,

    /// Charge amount in minor units with currency.
    pub amount: Money,

    /// Gateway-side order reference; None until the remote order exists.
    pub gateway_order_id: Option<String>,

    /// Current lifecycle status.
    pub status: OrderStatus,

    /// Order-scoped facts, including the chosen license-option id.
    pub notes: OrderNotes,

    /// When the order was created.
    pub created_at: Timestamp,

    /// When the order was last updated.
    pub updated_at: Timestamp,

    /// Absolute deadline after which verification refuses the order.
    pub expires_at: Timestamp,
}

impl Order {
    /// Creates a new pending order bound to a license option and a remote
    /// gateway order.
    pub fn create_pending(
        id: OrderId,
        buyer_id: UserId,
        track_id: TrackId,
        license_option_id: LicenseOptionId,
        license_type: String,
        amount: Money,
        gateway_order_id: String,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            buyer_id,
            track_id,
            license_type,
            amount,
            gateway_order_id: Some(gateway_order_id),
            status: OrderStatus::Pending,
            notes: OrderNotes::with_license_option(license_option_id),
            created_at: now,
            updated_at: now,
            expires_at: now.add_minutes(ORDER_EXPIRY_MINUTES),
        }
    }

    /// Returns true if the order's payment window has closed.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now.is_after(&self.expires_at)
    }

    /// Returns true if this order has already settled.
    pub fn is_paid(&self) -> bool {
        self.status == OrderStatus::Paid
    }
}
