//! License entity and key generation.
//!
//! A License is the issued right to download a purchased track's assets.
//! Exactly one exists per order that reached `Paid`. Apart from revocation
//! (an out-of-band operation) its only mutable state is the downloads
//! counter, a usage metric that must never be used to cap access.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{
    LicenseId, LicenseOptionId, Money, OrderId, Timestamp, TrackId, UserId,
};

/// License entity - proof of purchase granting download rights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    /// Unique identifier for this license.
    pub id: LicenseId,

    /// Order that produced this license.
    pub order_id: OrderId,

    /// Buyer who owns this license. The authorization boundary for
    /// download-link retrieval.
    pub buyer_id: UserId,

    /// Licensed track.
    pub track_id: TrackId,

    /// License option chosen at order creation.
    pub license_option_id: LicenseOptionId,

    /// License tier label as named at issuance time.
    pub license_type: String,

    /// Price paid for this license.
    pub purchase_price: Money,

    /// Display-only license key; carries no verification semantics.
    pub license_key: String,

    /// False permanently blocks new download links regardless of ownership.
    pub is_active: bool,

    /// Revocation permanently blocks new download links.
    pub is_revoked: bool,

    /// Why the license was revoked, when it was.
    pub revoked_reason: Option<String>,

    /// When the license was revoked, when it was.
    pub revoked_at: Option<Timestamp>,

    /// Successful download-link retrievals so far. A metric, not a cap.
    pub downloads: i64,

    /// When download links were last minted for this license.
    pub last_downloaded_at: Option<Timestamp>,

    /// When the license was issued.
    pub issued_at: Timestamp,

    /// When the row was created.
    pub created_at: Timestamp,

    /// When the row was last updated.
    pub updated_at: Timestamp,
}

impl License {
    /// Issues a fresh license for a settled order.
    pub fn issue(
        id: LicenseId,
        order_id: OrderId,
        buyer_id: UserId,
        track_id: TrackId,
        license_option_id: LicenseOptionId,
        license_type: String,
        purchase_price: Money,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            order_id,
            buyer_id,
            track_id,
            license_option_id,
            license_type,
            purchase_price,
            license_key: generate_license_key(),
            is_active: true,
            is_revoked: false,
            revoked_reason: None,
            revoked_at: None,
            downloads: 0,
            last_downloaded_at: None,
            issued_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true if the license may mint new download links.
    pub fn is_downloadable(&self) -> bool {
        self.is_active && !self.is_revoked
    }

    /// Returns true if the given user owns this license.
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.buyer_id == *user_id
    }
}

/// Generates a display-only license key.
///
/// Format: `BV-XXXX-XXXX-XXXX-XXXX` over uppercase hex. Opaque and unique;
/// never used to verify anything.
pub fn generate_license_key() -> String {
    let hex = Uuid::new_v4().simple().to_string().to_uppercase();
    format!(
        "BV-{}-{}-{}-{}",
        &hex[0..4],
        &hex[4..8],
        &hex[8..12],
        &hex[12..16]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_license() -> License {
        License::issue(
            LicenseId::new(),
            OrderId::new(),
            UserId::new(),
            TrackId::new(),
            LicenseOptionId::new(),
            "Premium".to_string(),
            Money::from_minor_units(9900, "INR"),
        )
    }

    #[test]
    fn issue_starts_active_with_zero_downloads() {
        let license = test_license();
        assert!(license.is_active);
        assert!(!license.is_revoked);
        assert_eq!(license.downloads, 0);
        assert!(license.last_downloaded_at.is_none());
        assert!(license.is_downloadable());
    }

    #[test]
    fn inactive_license_is_not_downloadable() {
        let mut license = test_license();
        license.is_active = false;
        assert!(!license.is_downloadable());
    }

    #[test]
    fn revoked_license_is_not_downloadable_even_if_active() {
        let mut license = test_license();
        license.is_revoked = true;
        assert!(license.is_active);
        assert!(!license.is_downloadable());
    }

    #[test]
    fn ownership_check_matches_buyer_only() {
        let license = test_license();
        assert!(license.is_owned_by(&license.buyer_id.clone()));
        assert!(!license.is_owned_by(&UserId::new()));
    }

    #[test]
    fn license_key_has_expected_shape() {
        let key = generate_license_key();
        assert_eq!(key.len(), 22);
        assert!(key.starts_with("BV-"));
        assert_eq!(key.matches('-').count(), 4);
        assert!(key
            .chars()
            .all(|c| c == '-' || c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn license_keys_are_unique() {
        assert_ne!(generate_license_key(), generate_license_key());
    }
}
