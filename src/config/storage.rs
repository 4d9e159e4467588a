//! Managed storage configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Storage and download-link configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Public base URL under which managed objects live
    pub base_url: String,

    /// Link signing secret shared with the file server
    pub signing_secret: String,

    /// Download link lifetime in seconds
    #[serde(default = "default_link_ttl_secs")]
    pub link_ttl_secs: u64,
}

fn default_link_ttl_secs() -> u64 {
    3600
}

impl StorageConfig {
    /// Get the link TTL as Duration
    pub fn link_ttl(&self) -> Duration {
        Duration::from_secs(self.link_ttl_secs)
    }

    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.base_url.is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__BASE_URL"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidStorageBaseUrl);
        }
        if self.signing_secret.is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__SIGNING_SECRET"));
        }
        if self.link_ttl_secs == 0 {
            return Err(ValidationError::InvalidLinkTtl);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> StorageConfig {
        StorageConfig {
            base_url: "https://storage.beatvault.example/".to_string(),
            signing_secret: "secret".to_string(),
            link_ttl_secs: 3600,
        }
    }

    #[test]
    fn accepts_valid_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn default_ttl_is_one_hour() {
        assert_eq!(default_link_ttl_secs(), 3600);
        assert_eq!(valid_config().link_ttl(), Duration::from_secs(3600));
    }

    #[test]
    fn rejects_non_http_base_url() {
        let mut config = valid_config();
        config.base_url = "s3://bucket/".to_string();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidStorageBaseUrl)
        ));
    }
}
