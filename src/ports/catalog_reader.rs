//! Catalog reader port.
//!
//! The catalog module owns tracks and their license options; the settlement
//! engine only reads them. Two lookups exist because download retrieval must
//! keep working for tracks soft-deleted after purchase.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, LicenseOptionId, Money, TrackId, UserId};

/// A sellable track as the settlement engine sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: TrackId,

    /// Producer who owns the track.
    pub producer_id: UserId,

    pub title: String,

    /// Artwork URL for display listings.
    pub artwork_url: Option<String>,

    /// Mandatory preview-quality asset URL.
    pub preview_url: String,

    /// Optional lossless asset URL.
    pub wav_url: Option<String>,

    /// Optional stems archive URL.
    pub stems_url: Option<String>,

    /// Whether the track has been soft-deleted from the catalog.
    pub is_deleted: bool,
}

/// A named pricing tier attached to a track.
#[derive(Debug, Clone, PartialEq)]
pub struct LicenseOption {
    pub id: LicenseOptionId,

    /// Tier name (e.g. "Basic", "Premium", "Exclusive").
    pub name: String,

    /// Price in decimal major currency units, as the catalog stores it.
    pub price: f64,

    /// ISO 4217 currency code.
    pub currency: String,
}

impl LicenseOption {
    /// Converts the catalog price to the minor units the gateway charges.
    pub fn charge_amount(&self) -> Money {
        Money::from_major_units(self.price, self.currency.clone())
    }
}

/// Read-only port into the catalog module.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// Resolves a live track together with its full license-option set.
    ///
    /// Returns `None` for unknown or soft-deleted tracks.
    async fn find_with_license_options(
        &self,
        id: &TrackId,
    ) -> Result<Option<(Track, Vec<LicenseOption>)>, DomainError>;

    /// Resolves a track even if soft-deleted.
    ///
    /// A purchased track removed from the catalog must remain downloadable.
    async fn find_by_id_including_deleted(
        &self,
        id: &TrackId,
    ) -> Result<Option<Track>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn catalog_reader_is_object_safe() {
        fn _accepts_dyn(_reader: &dyn CatalogReader) {}
    }

    #[test]
    fn charge_amount_converts_to_minor_units() {
        let option = LicenseOption {
            id: LicenseOptionId::new(),
            name: "Premium".to_string(),
            price: 99.00,
            currency: "INR".to_string(),
        };
        assert_eq!(option.charge_amount().amount_minor, 9900);
        assert_eq!(option.charge_amount().currency, "INR");
    }
}
