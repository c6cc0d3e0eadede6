use crate::error::{CheckoutError, Result};
use rust_decimal::Decimal;

pub const DEFAULT_PUBLIC_KEY: &str = "pk_sbox_gnrjo6pl5azfmgdnrfrbbejo7ev";
pub const DEFAULT_BASE_URL: &str = "https://api.sandbox.checkout.com";
pub const DEFAULT_SUCCESS_URL: &str = "https://example.com/payments/success";
pub const DEFAULT_FAILURE_URL: &str = "https://example.com/payments/fail";
pub const DEFAULT_AMOUNT_MINOR: i64 = 6540;
pub const DEFAULT_CURRENCY: &str = "GBP";

const MINOR_UNIT_SCALE: u32 = 2;

/// Externally supplied settings for one checkout flow.
///
/// The amount is held in minor units (pence for GBP), as the payments API expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutConfig {
    pub amount_minor: i64,
    pub currency: String,
    pub public_key: String,
    pub secret_key: String,
    pub base_url: String,
    pub success_url: String,
    pub failure_url: String,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            amount_minor: DEFAULT_AMOUNT_MINOR,
            currency: DEFAULT_CURRENCY.to_string(),
            public_key: DEFAULT_PUBLIC_KEY.to_string(),
            secret_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            success_url: DEFAULT_SUCCESS_URL.to_string(),
            failure_url: DEFAULT_FAILURE_URL.to_string(),
        }
    }
}

impl CheckoutConfig {
    pub fn tokenize_url(&self) -> String {
        format!("{}/tokens", self.base_url.trim_end_matches('/'))
    }

    pub fn payment_url(&self) -> String {
        format!("{}/payments", self.base_url.trim_end_matches('/'))
    }

    pub fn amount(&self) -> Decimal {
        Decimal::new(self.amount_minor, MINOR_UNIT_SCALE)
    }

    /// Amount and currency for display, e.g. `65.40 GBP`.
    pub fn display_amount(&self) -> String {
        format!("{:.2} {}", self.amount(), self.currency)
    }

    /// Checks the sentinel URLs that end a 3-D Secure challenge.
    ///
    /// Needed by every payment, simulated or live.
    pub fn validate_redirects(&self) -> Result<()> {
        for (name, url) in [("success", &self.success_url), ("failure", &self.failure_url)] {
            if url.trim().is_empty() {
                return Err(CheckoutError::Config(format!("{name} URL must not be empty")));
            }
        }
        Ok(())
    }

    /// Checks the settings a live payment needs.
    pub fn validate(&self) -> Result<()> {
        if self.secret_key.trim().is_empty() {
            return Err(CheckoutError::Config(
                "secret key is required (set CHECKOUT_SECRET_KEY)".to_string(),
            ));
        }
        if self.public_key.trim().is_empty() {
            return Err(CheckoutError::Config("public key is required".to_string()));
        }
        if self.amount_minor <= 0 {
            return Err(CheckoutError::Config(
                "amount must be positive".to_string(),
            ));
        }
        if self.currency.len() != 3 {
            return Err(CheckoutError::Config(format!(
                "currency must be a 3-letter code, got {:?}",
                self.currency
            )));
        }
        self.validate_redirects()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config() {
        let config = CheckoutConfig::default();
        assert_eq!(config.amount(), dec!(65.40));
        assert_eq!(config.display_amount(), "65.40 GBP");
        assert_eq!(
            config.tokenize_url(),
            "https://api.sandbox.checkout.com/tokens"
        );
        assert_eq!(
            config.payment_url(),
            "https://api.sandbox.checkout.com/payments"
        );
    }

    #[test]
    fn test_urls_tolerate_trailing_slash() {
        let config = CheckoutConfig {
            base_url: "http://127.0.0.1:1234/".to_string(),
            ..CheckoutConfig::default()
        };
        assert_eq!(config.tokenize_url(), "http://127.0.0.1:1234/tokens");
    }

    #[test]
    fn test_validate_requires_secret_key() {
        let config = CheckoutConfig::default();
        assert!(matches!(config.validate(), Err(CheckoutError::Config(_))));

        let config = CheckoutConfig {
            secret_key: "sk_sbox_test".to_string(),
            ..CheckoutConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_amount_and_currency() {
        let base = CheckoutConfig {
            secret_key: "sk_sbox_test".to_string(),
            ..CheckoutConfig::default()
        };
        let zero = CheckoutConfig {
            amount_minor: 0,
            ..base.clone()
        };
        assert!(zero.validate().is_err());
        let currency = CheckoutConfig {
            currency: "POUND".to_string(),
            ..base
        };
        assert!(currency.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_redirect_urls() {
        let base = CheckoutConfig {
            secret_key: "sk_sbox_test".to_string(),
            ..CheckoutConfig::default()
        };
        assert!(base.validate_redirects().is_ok());

        let no_success = CheckoutConfig {
            success_url: String::new(),
            ..base.clone()
        };
        assert!(matches!(
            no_success.validate_redirects(),
            Err(CheckoutError::Config(message)) if message == "success URL must not be empty"
        ));
        assert!(no_success.validate().is_err());

        let blank_failure = CheckoutConfig {
            failure_url: "   ".to_string(),
            ..base
        };
        assert!(blank_failure.validate().is_err());
    }
}
