//! Payment gateway configuration (Razorpay)

use serde::Deserialize;

use super::error::ValidationError;

/// Payment gateway configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Razorpay merchant key id (rzp_live_... or rzp_test_...)
    pub key_id: String,

    /// Razorpay merchant key secret
    pub key_secret: String,

    /// Merchant secret used to verify payment signatures
    pub signature_secret: String,

    /// Hard timeout for each gateway call in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    5
}

impl GatewayConfig {
    /// Check if using a Razorpay test-mode key
    pub fn is_test_mode(&self) -> bool {
        self.key_id.starts_with("rzp_test_")
    }

    /// Validate gateway configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.key_id.is_empty() {
            return Err(ValidationError::MissingRequired("GATEWAY__KEY_ID"));
        }
        if self.key_secret.is_empty() {
            return Err(ValidationError::MissingRequired("GATEWAY__KEY_SECRET"));
        }
        if self.signature_secret.is_empty() {
            return Err(ValidationError::MissingRequired("GATEWAY__SIGNATURE_SECRET"));
        }
        if !self.key_id.starts_with("rzp_") {
            return Err(ValidationError::InvalidGatewayKeyId);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidGatewayTimeout);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> GatewayConfig {
        GatewayConfig {
            key_id: "rzp_test_abc123".to_string(),
            key_secret: "secret".to_string(),
            signature_secret: "sig_secret".to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn accepts_valid_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn detects_test_mode() {
        assert!(valid_config().is_test_mode());
    }

    #[test]
    fn rejects_foreign_key_prefix() {
        let mut config = valid_config();
        config.key_id = "sk_test_abc".to_string();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidGatewayKeyId)
        ));
    }

    #[test]
    fn rejects_zero_timeout() {
        let mut config = valid_config();
        config.timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidGatewayTimeout)
        ));
    }
}
