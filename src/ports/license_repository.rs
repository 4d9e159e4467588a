//! License repository port.
//!
//! Write side covers issuance and the download-counter side effect; the read
//! side adds the buyer's license listing with its denormalized track fields.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, LicenseId, OrderId, UserId};
use crate::domain::settlement::License;

/// Filters for the buyer's license listing.
#[derive(Debug, Clone, Default)]
pub struct LicenseListFilter {
    /// Free-text search over the track title.
    pub title_search: Option<String>,

    /// Exact license-type label filter (e.g. "Premium").
    pub license_type: Option<String>,
}

/// One row of the buyer's license listing.
///
/// Track title and artwork are denormalized display fields read at query
/// time from the catalog; they are never authorization inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct LicenseSummary {
    pub license: License,
    pub track_title: String,
    pub artwork_url: Option<String>,
}

/// Repository port for License persistence and listing.
#[async_trait]
pub trait LicenseRepository: Send + Sync {
    /// Persists a newly issued license.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure (including a second license
    ///   for the same order, which the unique order constraint rejects)
    async fn create(&self, license: &License) -> Result<(), DomainError>;

    /// Finds a license by its id.
    async fn find_by_id(&self, id: &LicenseId) -> Result<Option<License>, DomainError>;

    /// Finds the license issued for an order, if any.
    async fn find_by_order(&self, order_id: &OrderId) -> Result<Option<License>, DomainError>;

    /// Increments the downloads counter and stamps last-downloaded.
    ///
    /// A usage metric only. Lost updates under concurrent calls are
    /// acceptable; the counter never gates access.
    async fn record_download(&self, id: &LicenseId) -> Result<(), DomainError>;

    /// Lists a buyer's licenses with display fields, newest first.
    async fn list_for_buyer(
        &self,
        buyer_id: &UserId,
        filter: &LicenseListFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<LicenseSummary>, DomainError>;
}
