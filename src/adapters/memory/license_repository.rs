//! In-memory implementation of LicenseRepository.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, LicenseId, OrderId, Timestamp, UserId};
use crate::domain::settlement::License;
use crate::ports::{LicenseListFilter, LicenseRepository, LicenseSummary};

use super::{lock, InMemoryCatalogReader};

/// In-memory implementation of the LicenseRepository port.
///
/// The catalog handle supplies the denormalized display fields the SQL
/// listing join would.
pub struct InMemoryLicenseRepository {
    licenses: Mutex<HashMap<LicenseId, License>>,
    catalog: Arc<InMemoryCatalogReader>,
}

impl InMemoryLicenseRepository {
    pub fn new(catalog: Arc<InMemoryCatalogReader>) -> Self {
        Self {
            licenses: Mutex::new(HashMap::new()),
            catalog,
        }
    }
}

#[async_trait]
impl LicenseRepository for InMemoryLicenseRepository {
    async fn create(&self, license: &License) -> Result<(), DomainError> {
        let mut licenses = lock(&self.licenses)?;
        if licenses.values().any(|l| l.order_id == license.order_id) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "Order already has a license",
            ));
        }
        licenses.insert(license.id, license.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &LicenseId) -> Result<Option<License>, DomainError> {
        Ok(lock(&self.licenses)?.get(id).cloned())
    }

    async fn find_by_order(&self, order_id: &OrderId) -> Result<Option<License>, DomainError> {
        Ok(lock(&self.licenses)?
            .values()
            .find(|l| l.order_id == *order_id)
            .cloned())
    }

    async fn record_download(&self, id: &LicenseId) -> Result<(), DomainError> {
        let mut licenses = lock(&self.licenses)?;
        if let Some(license) = licenses.get_mut(id) {
            license.downloads += 1;
            license.last_downloaded_at = Some(Timestamp::now());
            license.updated_at = Timestamp::now();
        }
        Ok(())
    }

    async fn list_for_buyer(
        &self,
        buyer_id: &UserId,
        filter: &LicenseListFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<LicenseSummary>, DomainError> {
        let licenses = lock(&self.licenses)?;

        let mut summaries = Vec::new();
        for license in licenses.values().filter(|l| l.buyer_id == *buyer_id) {
            let (track_title, artwork_url) = match self.catalog.display_fields(&license.track_id)? {
                Some(fields) => fields,
                None => continue,
            };

            if let Some(needle) = &filter.title_search {
                if !track_title.to_lowercase().contains(&needle.to_lowercase()) {
                    continue;
                }
            }
            if let Some(kind) = &filter.license_type {
                if license.license_type != *kind {
                    continue;
                }
            }

            summaries.push(LicenseSummary {
                license: license.clone(),
                track_title,
                artwork_url,
            });
        }

        summaries.sort_by(|a, b| b.license.issued_at.cmp(&a.license.issued_at));
        Ok(summaries
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }
}
