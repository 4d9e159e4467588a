//! File link provider port.
//!
//! Converts stored object URLs into time-limited, capability-bearing
//! download links. The settlement engine never hands out raw storage URLs
//! for purchased assets.

use async_trait::async_trait;
use std::time::Duration;

/// Errors from link resolution.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LinkError {
    #[error("URL does not belong to managed storage: {0}")]
    ForeignUrl(String),

    #[error("failed to sign link: {0}")]
    Signing(String),
}

/// Port for minting presigned download URLs from stored object references.
#[async_trait]
pub trait FileLinkProvider: Send + Sync {
    /// Extracts the storage key from a stored object URL.
    ///
    /// # Errors
    ///
    /// - `ForeignUrl` when the URL is not under managed storage
    fn key_from_url(&self, url: &str) -> Result<String, LinkError>;

    /// Mints a time-limited download URL for a storage key.
    async fn presigned_url(&self, key: &str, ttl: Duration) -> Result<String, LinkError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn file_link_provider_is_object_safe() {
        fn _accepts_dyn(_provider: &dyn FileLinkProvider) {}
    }
}
