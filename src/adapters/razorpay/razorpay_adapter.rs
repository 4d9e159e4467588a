//! Razorpay payment gateway adapter.
//!
//! Implements the `PaymentGateway` port over the Razorpay REST API.
//! Authentication is HTTP basic auth with the merchant key id and key
//! secret; every outbound call carries a hard timeout so a slow gateway can
//! never stall settlement indefinitely.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::domain::foundation::Money;
use crate::ports::{GatewayError, GatewayPayment, PaymentGateway};

use super::types::{CreateOrderRequest, RazorpayOrder, RazorpayPayment};

/// Default hard timeout for gateway calls.
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Razorpay API configuration.
#[derive(Clone)]
pub struct RazorpayConfig {
    /// Merchant key id (rzp_live_... or rzp_test_...).
    key_id: String,

    /// Merchant key secret.
    key_secret: SecretString,

    /// Base URL for the Razorpay API (default: https://api.razorpay.com).
    api_base_url: String,

    /// Hard timeout for each gateway call.
    timeout_secs: u64,
}

impl RazorpayConfig {
    /// Create a new Razorpay configuration.
    pub fn new(key_id: impl Into<String>, key_secret: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret: SecretString::new(key_secret.into()),
            api_base_url: "https://api.razorpay.com".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads:
    /// - `RAZORPAY_KEY_ID`
    /// - `RAZORPAY_KEY_SECRET`
    pub fn from_env() -> Result<Self, std::env::VarError> {
        let key_id = std::env::var("RAZORPAY_KEY_ID")?;
        let key_secret = std::env::var("RAZORPAY_KEY_SECRET")?;
        Ok(Self::new(key_id, key_secret))
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set a custom call timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Whether the merchant key is a test-mode key.
    pub fn is_test_mode(&self) -> bool {
        self.key_id.starts_with("rzp_test_")
    }
}

/// Razorpay payment gateway adapter.
pub struct RazorpayGatewayAdapter {
    config: RazorpayConfig,
    http_client: reqwest::Client,
}

impl RazorpayGatewayAdapter {
    /// Create a new Razorpay adapter with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `Request` if the underlying HTTP client cannot be built.
    pub fn new(config: RazorpayConfig) -> Result<Self, GatewayError> {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn map_send_error(e: reqwest::Error) -> GatewayError {
        if e.is_timeout() {
            GatewayError::Timeout
        } else {
            GatewayError::Request(e.to_string())
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(GatewayError::Authentication);
        }
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, error = %error_text, "Razorpay API error");
            return Err(GatewayError::Request(format!(
                "gateway returned {}: {}",
                status, error_text
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGatewayAdapter {
    async fn create_remote_order(&self, amount: &Money) -> Result<String, GatewayError> {
        let url = format!("{}/v1/orders", self.config.api_base_url);

        let request = CreateOrderRequest {
            amount: amount.amount_minor,
            currency: amount.currency.clone(),
            receipt: None,
        };

        let response = self
            .http_client
            .post(&url)
            .basic_auth(
                &self.config.key_id,
                Some(self.config.key_secret.expose_secret()),
            )
            .json(&request)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let response = Self::check_status(response).await?;

        let order: RazorpayOrder = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        tracing::debug!(
            remote_order_id = %order.id,
            amount = order.amount,
            currency = %order.currency,
            status = %order.status,
            "remote order opened"
        );

        Ok(order.id)
    }

    async fn fetch_payment(
        &self,
        gateway_payment_id: &str,
    ) -> Result<GatewayPayment, GatewayError> {
        let url = format!(
            "{}/v1/payments/{}",
            self.config.api_base_url, gateway_payment_id
        );

        let response = self
            .http_client
            .get(&url)
            .basic_auth(
                &self.config.key_id,
                Some(self.config.key_secret.expose_secret()),
            )
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let response = Self::check_status(response).await?;

        let payment: RazorpayPayment = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        Ok(payment.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_detects_test_mode_keys() {
        assert!(RazorpayConfig::new("rzp_test_abc", "secret").is_test_mode());
        assert!(!RazorpayConfig::new("rzp_live_abc", "secret").is_test_mode());
    }

    #[test]
    fn config_base_url_override_applies() {
        let config = RazorpayConfig::new("rzp_test_abc", "secret")
            .with_base_url("http://localhost:9090")
            .with_timeout_secs(1);
        assert_eq!(config.api_base_url, "http://localhost:9090");
        assert_eq!(config.timeout_secs, 1);
    }

    #[test]
    fn adapter_builds_from_config() {
        let config = RazorpayConfig::new("rzp_test_abc", "secret");
        assert!(RazorpayGatewayAdapter::new(config).is_ok());
    }
}
