//! HTTP client for the Checkout.com tokens and payments endpoints.

use crate::config::CheckoutConfig;
use crate::domain::card::CardDetails;
use crate::domain::payment::{CardToken, GatewayStatus, PaymentResponse};
use crate::domain::ports::{PaymentGateway, TokenizationGateway};
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct TokenizeRequest<'a> {
    #[serde(rename = "type")]
    source_type: &'static str,
    number: &'a str,
    expiry_month: &'a str,
    expiry_year: &'a str,
    cvv: &'a str,
}

#[derive(Debug, Serialize)]
struct TokenSource<'a> {
    #[serde(rename = "type")]
    source_type: &'static str,
    token: &'a str,
}

#[derive(Debug, Serialize)]
struct ThreeDsOptions {
    enabled: bool,
}

#[derive(Debug, Serialize)]
struct PaymentRequest<'a> {
    source: TokenSource<'a>,
    amount: i64,
    currency: &'a str,
    #[serde(rename = "3ds")]
    three_ds: ThreeDsOptions,
    success_url: &'a str,
    failure_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct Link {
    href: String,
}

#[derive(Debug, Default, Deserialize)]
struct PaymentLinks {
    redirect: Option<Link>,
}

#[derive(Debug, Deserialize)]
struct PaymentResponseBody {
    id: String,
    status: GatewayStatus,
    #[serde(rename = "_links", default)]
    links: PaymentLinks,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    error_type: Option<String>,
}

/// Gateway backed by the Checkout.com REST API.
///
/// Tokenization authenticates with the public key, payments with the secret key.
/// Cloning is cheap and shares the connection pool.
#[derive(Clone)]
pub struct CheckoutApi {
    client: Client,
    config: CheckoutConfig,
}

impl CheckoutApi {
    pub fn new(config: CheckoutConfig) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: CheckoutConfig, client: Client) -> Self {
        Self { client, config }
    }

    async fn post<T: Serialize + ?Sized>(&self, url: &str, key: &str, body: &T) -> Result<Response> {
        debug!(%url, "posting to gateway");
        let response = self
            .client
            .post(url)
            .bearer_auth(key)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;
        Ok(response)
    }
}

/// Best available description of a failed call: the body's `message`, then its
/// `error_type`, then the HTTP reason phrase.
async fn failure_reason(response: Response) -> String {
    let status = response.status();
    let fallback = status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string());

    match response.json::<ApiErrorBody>().await {
        Ok(ApiErrorBody {
            message: Some(message),
            ..
        }) if !message.is_empty() => message,
        Ok(ApiErrorBody {
            error_type: Some(error_type),
            ..
        }) if !error_type.is_empty() => error_type,
        _ => fallback,
    }
}

#[async_trait]
impl TokenizationGateway for CheckoutApi {
    async fn tokenize(&self, card: &CardDetails) -> Result<CardToken> {
        let request = TokenizeRequest {
            source_type: "card",
            number: &card.number,
            expiry_month: &card.expiry_month,
            expiry_year: &card.expiry_year,
            cvv: &card.cvv,
        };
        let response = self
            .post(&self.config.tokenize_url(), &self.config.public_key, &request)
            .await?;

        if !response.status().is_success() {
            let reason = failure_reason(response).await;
            return Err(CheckoutError::Tokenization(format!(
                "Tokenization failed: {reason}"
            )));
        }

        Ok(response.json::<CardToken>().await?)
    }
}

#[async_trait]
impl PaymentGateway for CheckoutApi {
    async fn pay(&self, token: &CardToken) -> Result<PaymentResponse> {
        let request = PaymentRequest {
            source: TokenSource {
                source_type: "token",
                token: &token.token,
            },
            amount: self.config.amount_minor,
            currency: &self.config.currency,
            three_ds: ThreeDsOptions { enabled: true },
            success_url: &self.config.success_url,
            failure_url: &self.config.failure_url,
        };
        let response = self
            .post(&self.config.payment_url(), &self.config.secret_key, &request)
            .await?;

        if !response.status().is_success() {
            let reason = failure_reason(response).await;
            return Err(CheckoutError::Payment(format!(
                "Payment processing failed: {reason}"
            )));
        }

        let body: PaymentResponseBody = response.json().await?;
        Ok(PaymentResponse {
            id: body.id,
            status: body.status,
            redirect_url: body.links.redirect.map(|link| link.href),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_request_wire_format() {
        let request = PaymentRequest {
            source: TokenSource {
                source_type: "token",
                token: "tok_123",
            },
            amount: 6540,
            currency: "GBP",
            three_ds: ThreeDsOptions { enabled: true },
            success_url: "https://example.com/payments/success",
            failure_url: "https://example.com/payments/fail",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["source"]["type"], "token");
        assert_eq!(json["source"]["token"], "tok_123");
        assert_eq!(json["amount"], 6540);
        assert_eq!(json["3ds"]["enabled"], true);
        assert_eq!(json["failure_url"], "https://example.com/payments/fail");
    }

    #[test]
    fn test_tokenize_request_wire_format() {
        let request = TokenizeRequest {
            source_type: "card",
            number: "4242424242424242",
            expiry_month: "12",
            expiry_year: "2030",
            cvv: "100",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["type"], "card");
        assert_eq!(json["expiry_year"], "2030");
    }

    #[test]
    fn test_payment_response_without_links() {
        let body: PaymentResponseBody =
            serde_json::from_str(r#"{"id":"pay_1","status":"Declined"}"#).unwrap();
        assert_eq!(body.status, GatewayStatus::Declined);
        assert!(body.links.redirect.is_none());
    }
}
