//! ListLicensesHandler - Query handler for the buyer's license collection.
//!
//! A page-number listing of the buyer's licenses with denormalized display
//! fields. Artwork URLs are presigned per entry on a best-effort basis: a
//! failed presign keeps the stored URL instead of dropping the entry, since
//! a stale artwork link is better than a missing purchase.

use std::sync::Arc;

use crate::application::pagination::Page;
use crate::domain::foundation::UserId;
use crate::domain::settlement::SettlementError;
use crate::ports::{FileLinkProvider, LicenseListFilter, LicenseRepository, LicenseSummary};

use super::get_license_downloads::DOWNLOAD_LINK_TTL;

/// Query for a page of the buyer's licenses.
#[derive(Debug, Clone, Default)]
pub struct ListLicensesQuery {
    pub filter: LicenseListFilter,
    pub page: Page,
}

/// Handler for the buyer's license listing.
pub struct ListLicensesHandler {
    licenses: Arc<dyn LicenseRepository>,
    links: Arc<dyn FileLinkProvider>,
}

impl ListLicensesHandler {
    pub fn new(licenses: Arc<dyn LicenseRepository>, links: Arc<dyn FileLinkProvider>) -> Self {
        Self { licenses, links }
    }

    pub async fn handle(
        &self,
        buyer_id: UserId,
        query: ListLicensesQuery,
    ) -> Result<Vec<LicenseSummary>, SettlementError> {
        let mut summaries = self
            .licenses
            .list_for_buyer(
                &buyer_id,
                &query.filter,
                query.page.limit(),
                query.page.offset(),
            )
            .await?;

        for summary in &mut summaries {
            if let Some(stored) = summary.artwork_url.clone() {
                summary.artwork_url = Some(self.presign_or_keep(stored).await);
            }
        }

        Ok(summaries)
    }

    /// Presigns a stored artwork URL, keeping the stored URL on failure.
    async fn presign_or_keep(&self, stored_url: String) -> String {
        let key = match self.links.key_from_url(&stored_url) {
            Ok(key) => key,
            Err(_) => return stored_url,
        };
        match self.links.presigned_url(&key, DOWNLOAD_LINK_TTL).await {
            Ok(url) => url,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "keeping stored artwork url");
                stored_url
            }
        }
    }
}
