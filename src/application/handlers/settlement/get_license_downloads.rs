//! GetLicenseDownloadsHandler - Query handler for minting download links.
//!
//! Authorization is ownership of an active, unrevoked license; nothing about
//! the track's catalog visibility gates access, so a purchased track that
//! was later soft-deleted stays downloadable. Link minting itself is
//! best-effort per asset variant: a variant whose link cannot be resolved is
//! omitted from the bundle rather than failing the whole request.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::foundation::{LicenseId, UserId};
use crate::domain::settlement::SettlementError;
use crate::ports::{CatalogReader, FileLinkProvider, LicenseRepository};

/// How long a minted download link stays valid.
pub const DOWNLOAD_LINK_TTL: Duration = Duration::from_secs(60 * 60);

/// Query for the download links of one owned license.
#[derive(Debug, Clone)]
pub struct GetLicenseDownloadsQuery {
    pub requester_id: UserId,
    pub license_id: LicenseId,
}

/// Time-limited download links for a license's asset variants.
///
/// Each field is present only when its asset exists and its link resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadBundle {
    pub license_id: LicenseId,
    pub track_title: String,
    pub preview_url: Option<String>,
    pub wav_url: Option<String>,
    pub stems_url: Option<String>,
}

impl DownloadBundle {
    /// Returns true if at least one variant link resolved.
    pub fn has_any_link(&self) -> bool {
        self.preview_url.is_some() || self.wav_url.is_some() || self.stems_url.is_some()
    }
}

/// Handler for download-link retrieval.
pub struct GetLicenseDownloadsHandler {
    licenses: Arc<dyn LicenseRepository>,
    catalog: Arc<dyn CatalogReader>,
    links: Arc<dyn FileLinkProvider>,
}

impl GetLicenseDownloadsHandler {
    pub fn new(
        licenses: Arc<dyn LicenseRepository>,
        catalog: Arc<dyn CatalogReader>,
        links: Arc<dyn FileLinkProvider>,
    ) -> Self {
        Self {
            licenses,
            catalog,
            links,
        }
    }

    pub async fn handle(
        &self,
        query: GetLicenseDownloadsQuery,
    ) -> Result<DownloadBundle, SettlementError> {
        let license = self
            .licenses
            .find_by_id(&query.license_id)
            .await?
            .ok_or_else(|| SettlementError::license_not_found(query.license_id))?;

        if !license.is_owned_by(&query.requester_id) {
            return Err(SettlementError::Unauthorized);
        }
        if !license.is_active {
            return Err(SettlementError::LicenseInactive(license.id));
        }
        if license.is_revoked {
            return Err(SettlementError::LicenseRevoked(license.id));
        }

        // Deleted tracks resolve too; purchase outlives catalog visibility.
        let track = self
            .catalog
            .find_by_id_including_deleted(&license.track_id)
            .await?
            .ok_or_else(|| SettlementError::track_not_found(license.track_id))?;

        let preview_url = self.resolve_link(&track.preview_url).await;
        let wav_url = match track.wav_url.as_deref() {
            Some(url) => self.resolve_link(url).await,
            None => None,
        };
        let stems_url = match track.stems_url.as_deref() {
            Some(url) => self.resolve_link(url).await,
            None => None,
        };

        // Usage metric, never an access gate; a failed increment does not
        // block the download.
        if let Err(err) = self.licenses.record_download(&license.id).await {
            tracing::warn!(
                license_id = %license.id,
                error = %err,
                "failed to record download"
            );
        }

        Ok(DownloadBundle {
            license_id: license.id,
            track_title: track.title,
            preview_url,
            wav_url,
            stems_url,
        })
    }

    /// Resolves one stored URL into a presigned link, or None on failure.
    async fn resolve_link(&self, stored_url: &str) -> Option<String> {
        let key = match self.links.key_from_url(stored_url) {
            Ok(key) => key,
            Err(err) => {
                tracing::warn!(url = stored_url, error = %err, "skipping download variant");
                return None;
            }
        };
        match self.links.presigned_url(&key, DOWNLOAD_LINK_TTL).await {
            Ok(url) => Some(url),
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "skipping download variant");
                None
            }
        }
    }
}
