//! Money value object in minor currency units.
//!
//! Catalog prices are decimal major units (e.g. 99.00 INR); the payment
//! gateway only accepts integer minor units (paise, cents). The conversion
//! `round(price * 100)` is the single precision boundary between the two and
//! lives here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An amount of money in integer minor units with its currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in minor units (paise, cents).
    pub amount_minor: i64,

    /// ISO 4217 currency code (e.g. "INR", "USD").
    pub currency: String,
}

impl Money {
    /// Creates a money value directly from minor units.
    pub fn from_minor_units(amount_minor: i64, currency: impl Into<String>) -> Self {
        Self {
            amount_minor,
            currency: currency.into(),
        }
    }

    /// Converts a decimal major-unit price into minor units.
    ///
    /// Uses `round(price * 100)`, matching what the gateway expects for
    /// prices quoted in decimal currency units.
    pub fn from_major_units(price: f64, currency: impl Into<String>) -> Self {
        Self {
            amount_minor: (price * 100.0).round() as i64,
            currency: currency.into(),
        }
    }

    /// Returns the amount as decimal major units for display.
    pub fn as_major_units(&self) -> f64 {
        self.amount_minor as f64 / 100.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.as_major_units(), self.currency)
    }
}
