//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,

    // Not found errors
    TrackNotFound,
    LicenseOptionNotFound,
    OrderNotFound,
    LicenseNotFound,

    // Settlement state errors
    OrderAlreadyProcessed,
    OrderExpired,
    InvalidOrderState,
    InvalidSignature,
    PaymentNotCaptured,
    ReconciliationRequired,

    // License access errors
    LicenseInactive,
    LicenseRevoked,

    // Authorization errors
    Unauthorized,

    // Infrastructure errors
    GatewayError,
    StorageLinkError,
    DatabaseError,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::TrackNotFound => "TRACK_NOT_FOUND",
            ErrorCode::LicenseOptionNotFound => "LICENSE_OPTION_NOT_FOUND",
            ErrorCode::OrderNotFound => "ORDER_NOT_FOUND",
            ErrorCode::LicenseNotFound => "LICENSE_NOT_FOUND",
            ErrorCode::OrderAlreadyProcessed => "ORDER_ALREADY_PROCESSED",
            ErrorCode::OrderExpired => "ORDER_EXPIRED",
            ErrorCode::InvalidOrderState => "INVALID_ORDER_STATE",
            ErrorCode::InvalidSignature => "INVALID_SIGNATURE",
            ErrorCode::PaymentNotCaptured => "PAYMENT_NOT_CAPTURED",
            ErrorCode::ReconciliationRequired => "RECONCILIATION_REQUIRED",
            ErrorCode::LicenseInactive => "LICENSE_INACTIVE",
            ErrorCode::LicenseRevoked => "LICENSE_REVOKED",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::GatewayError => "GATEWAY_ERROR",
            ErrorCode::StorageLinkError => "STORAGE_LINK_ERROR",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::ValidationFailed,
            message: message.into(),
            details: HashMap::new(),
        }
        .with_detail("field", field.into())
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}
