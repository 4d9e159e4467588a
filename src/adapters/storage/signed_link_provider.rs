//! HMAC-signed download link provider.
//!
//! Implements the `FileLinkProvider` port by appending an expiry and an
//! HMAC-SHA256 signature over `"{key}|{expires}"` to the storage URL. The
//! file server validates the pair before serving, so possession of a link is
//! the capability and the link dies with its expiry.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use crate::ports::{FileLinkProvider, LinkError};

type HmacSha256 = Hmac<Sha256>;

/// Signed storage link configuration.
#[derive(Clone)]
pub struct StorageLinkConfig {
    /// Public base URL under which managed objects live. Trailing slash
    /// included.
    base_url: String,

    /// Link signing secret shared with the file server.
    signing_secret: SecretString,
}

impl StorageLinkConfig {
    /// Create a new storage link configuration.
    pub fn new(base_url: impl Into<String>, signing_secret: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            base_url,
            signing_secret: SecretString::new(signing_secret.into()),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads:
    /// - `STORAGE_BASE_URL`
    /// - `STORAGE_SIGNING_SECRET`
    pub fn from_env() -> Result<Self, std::env::VarError> {
        let base_url = std::env::var("STORAGE_BASE_URL")?;
        let signing_secret = std::env::var("STORAGE_SIGNING_SECRET")?;
        Ok(Self::new(base_url, signing_secret))
    }
}

/// HMAC-signed link provider over managed object storage.
pub struct SignedLinkProvider {
    config: StorageLinkConfig,
}

impl SignedLinkProvider {
    /// Creates a new provider with the given configuration.
    pub fn new(config: StorageLinkConfig) -> Self {
        Self { config }
    }

    fn sign(&self, key: &str, expires: u64) -> String {
        let canonical = format!("{}|{}", key, expires);
        let mut mac =
            HmacSha256::new_from_slice(self.config.signing_secret.expose_secret().as_bytes())
                .expect("HMAC accepts any key length");
        mac.update(canonical.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

#[async_trait]
impl FileLinkProvider for SignedLinkProvider {
    fn key_from_url(&self, url: &str) -> Result<String, LinkError> {
        match url.strip_prefix(&self.config.base_url) {
            Some(key) if !key.is_empty() => Ok(key.to_string()),
            _ => Err(LinkError::ForeignUrl(url.to_string())),
        }
    }

    async fn presigned_url(&self, key: &str, ttl: Duration) -> Result<String, LinkError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| LinkError::Signing(e.to_string()))?;
        let expires = (now + ttl).as_secs();
        let signature = self.sign(key, expires);

        Ok(format!(
            "{}{}?expires={}&signature={}",
            self.config.base_url, key, expires, signature
        ))
    }
}
