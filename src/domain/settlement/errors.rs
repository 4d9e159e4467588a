//! Settlement-specific error types.
//!
//! Every failure mode of order creation, payment verification, license
//! issuance, and download-link retrieval has a stable kind here so the
//! (external) HTTP layer can map it to a status code. The core itself never
//! formats HTTP responses.
//!
//! Compound failures - a primary failure whose best-effort order-status
//! update also failed - are a distinct kind (`Unreconciled`) because they
//! signal that the order row needs manual reconciliation.

use crate::domain::foundation::{DomainError, ErrorCode, LicenseId, OrderId, TrackId};

/// Settlement-specific errors.
#[derive(Debug, Clone, PartialEq)]
pub enum SettlementError {
    /// Track does not exist or carries no license options.
    TrackNotFound(TrackId),

    /// Requested license option is not offered on the track.
    LicenseOptionNotFound(String),

    /// The payment gateway was unreachable or rejected the request.
    GatewayFailed { reason: String },

    /// Order was not found.
    OrderNotFound(OrderId),

    /// Order has already settled; no re-issuance, no state change.
    OrderAlreadyProcessed(OrderId),

    /// The payment window closed before verification.
    OrderExpired(OrderId),

    /// Order is in a state that cannot be verified (e.g. no gateway
    /// reference, or moved out of pending by another path).
    InvalidOrderState { order_id: OrderId, status: String },

    /// Caller-supplied payment signature did not match.
    InvalidSignature,

    /// Gateway reports the payment in a non-captured state.
    PaymentNotCaptured { status: String },

    /// Order notes carry no license-option id.
    LicenseOptionIdMissing,

    /// Order notes carry a license-option id that is not a valid identifier.
    InvalidLicenseOptionId(String),

    /// License was not found.
    LicenseNotFound(LicenseId),

    /// Requester does not own the license.
    Unauthorized,

    /// License has been deactivated.
    LicenseInactive(LicenseId),

    /// License has been revoked.
    LicenseRevoked(LicenseId),

    /// A primary failure coincided with a failed order-status update; the
    /// order row may be inconsistent and requires manual reconciliation.
    Unreconciled {
        primary: Box<SettlementError>,
        cause: String,
    },

    /// Data-store failure outside the taxonomy above.
    Storage(String),
}

impl SettlementError {
    pub fn track_not_found(id: TrackId) -> Self {
        SettlementError::TrackNotFound(id)
    }

    pub fn license_option_not_found(option_id: impl Into<String>) -> Self {
        SettlementError::LicenseOptionNotFound(option_id.into())
    }

    pub fn gateway_failed(reason: impl Into<String>) -> Self {
        SettlementError::GatewayFailed {
            reason: reason.into(),
        }
    }

    pub fn order_not_found(id: OrderId) -> Self {
        SettlementError::OrderNotFound(id)
    }

    pub fn already_processed(id: OrderId) -> Self {
        SettlementError::OrderAlreadyProcessed(id)
    }

    pub fn expired(id: OrderId) -> Self {
        SettlementError::OrderExpired(id)
    }

    pub fn invalid_order_state(order_id: OrderId, status: impl Into<String>) -> Self {
        SettlementError::InvalidOrderState {
            order_id,
            status: status.into(),
        }
    }

    pub fn payment_not_captured(status: impl Into<String>) -> Self {
        SettlementError::PaymentNotCaptured {
            status: status.into(),
        }
    }

    pub fn license_not_found(id: LicenseId) -> Self {
        SettlementError::LicenseNotFound(id)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        SettlementError::Storage(message.into())
    }

    /// Wraps a primary failure whose status update also failed.
    pub fn unreconciled(primary: SettlementError, cause: impl Into<String>) -> Self {
        SettlementError::Unreconciled {
            primary: Box::new(primary),
            cause: cause.into(),
        }
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            SettlementError::TrackNotFound(_) => ErrorCode::TrackNotFound,
            SettlementError::LicenseOptionNotFound(_) => ErrorCode::LicenseOptionNotFound,
            SettlementError::GatewayFailed { .. } => ErrorCode::GatewayError,
            SettlementError::OrderNotFound(_) => ErrorCode::OrderNotFound,
            SettlementError::OrderAlreadyProcessed(_) => ErrorCode::OrderAlreadyProcessed,
            SettlementError::OrderExpired(_) => ErrorCode::OrderExpired,
            SettlementError::InvalidOrderState { .. } => ErrorCode::InvalidOrderState,
            SettlementError::InvalidSignature => ErrorCode::InvalidSignature,
            SettlementError::PaymentNotCaptured { .. } => ErrorCode::PaymentNotCaptured,
            SettlementError::LicenseOptionIdMissing => ErrorCode::ValidationFailed,
            SettlementError::InvalidLicenseOptionId(_) => ErrorCode::ValidationFailed,
            SettlementError::LicenseNotFound(_) => ErrorCode::LicenseNotFound,
            SettlementError::Unauthorized => ErrorCode::Unauthorized,
            SettlementError::LicenseInactive(_) => ErrorCode::LicenseInactive,
            SettlementError::LicenseRevoked(_) => ErrorCode::LicenseRevoked,
            SettlementError::Unreconciled { .. } => ErrorCode::ReconciliationRequired,
            SettlementError::Storage(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            SettlementError::TrackNotFound(id) => format!("Track not found: {}", id),
            SettlementError::LicenseOptionNotFound(option_id) => {
                format!("License option not found: {}", option_id)
            }
            SettlementError::GatewayFailed { reason } => {
                format!("Payment gateway error: {}", reason)
            }
            SettlementError::OrderNotFound(id) => format!("Order not found: {}", id),
            SettlementError::OrderAlreadyProcessed(id) => {
                format!("Order {} has already been processed", id)
            }
            SettlementError::OrderExpired(id) => format!("Order {} has expired", id),
            SettlementError::InvalidOrderState { order_id, status } => {
                format!("Order {} cannot be verified in state '{}'", order_id, status)
            }
            SettlementError::InvalidSignature => "Payment signature mismatch".to_string(),
            SettlementError::PaymentNotCaptured { status } => {
                format!("Payment not captured (gateway status: '{}')", status)
            }
            SettlementError::LicenseOptionIdMissing => {
                "Order notes carry no license option id".to_string()
            }
            SettlementError::InvalidLicenseOptionId(raw) => {
                format!("Order notes carry an invalid license option id: '{}'", raw)
            }
            SettlementError::LicenseNotFound(id) => format!("License not found: {}", id),
            SettlementError::Unauthorized => "License is not owned by requester".to_string(),
            SettlementError::LicenseInactive(id) => format!("License {} is inactive", id),
            SettlementError::LicenseRevoked(id) => format!("License {} has been revoked", id),
            SettlementError::Unreconciled { primary, cause } => {
                format!("{} and status update failed: {}", primary.message(), cause)
            }
            SettlementError::Storage(msg) => format!("Storage error: {}", msg),
        }
    }

    /// Returns true if the caller may retry the same operation.
    ///
    /// Verification failures are never retryable: retrying a failed
    /// signature or an expired order can never succeed, and retrying after
    /// a reconciliation-required failure risks double issuance.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SettlementError::GatewayFailed { .. } | SettlementError::Storage(_)
        )
    }
}

impl std::fmt::Display for SettlementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for SettlementError {}

impl From<DomainError> for SettlementError {
    fn from(err: DomainError) -> Self {
        SettlementError::Storage(err.to_string())
    }
}

impl From<SettlementError> for DomainError {
    fn from(err: SettlementError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
