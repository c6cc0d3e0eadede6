use crate::domain::card::CardDetails;
use crate::domain::payment::{CardToken, GatewayStatus, PaymentResponse};
use crate::domain::ports::{PaymentGateway, TokenizationGateway};
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

pub const SIMULATED_CHALLENGE_URL: &str = "https://3ds.simulator.local/challenge";

/// A scripted gateway that answers both tokenization and payment calls from memory.
///
/// Every call is recorded behind `Arc<RwLock<..>>` so clones handed to a flow can
/// be inspected afterwards. Used by tests and by the CLI's simulation mode.
#[derive(Clone)]
pub struct InMemoryGateway {
    token_result: std::result::Result<String, String>,
    payment_result: std::result::Result<PaymentResponse, String>,
    tokenized: Arc<RwLock<Vec<CardDetails>>>,
    paid: Arc<RwLock<Vec<CardToken>>>,
}

impl InMemoryGateway {
    fn new(
        token_result: std::result::Result<String, String>,
        payment_result: std::result::Result<PaymentResponse, String>,
    ) -> Self {
        Self {
            token_result,
            payment_result,
            tokenized: Arc::default(),
            paid: Arc::default(),
        }
    }

    /// Tokenizes every card and answers with a pending payment that needs a challenge.
    pub fn pending_challenge(redirect_url: impl Into<String>) -> Self {
        Self::responding(GatewayStatus::Pending, Some(redirect_url.into()))
    }

    /// Tokenizes every card and answers payments with the given status.
    pub fn responding(status: GatewayStatus, redirect_url: Option<String>) -> Self {
        Self::new(
            Ok("tok_in_memory".to_string()),
            Ok(PaymentResponse {
                id: "pay_in_memory".to_string(),
                status,
                redirect_url,
            }),
        )
    }

    pub fn failing_tokenization(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(Err(message.clone()), Err(message))
    }

    pub fn failing_payment(message: impl Into<String>) -> Self {
        Self::new(Ok("tok_in_memory".to_string()), Err(message.into()))
    }

    pub async fn tokenized_cards(&self) -> Vec<CardDetails> {
        self.tokenized.read().await.clone()
    }

    pub async fn paid_tokens(&self) -> Vec<CardToken> {
        self.paid.read().await.clone()
    }
}

impl Default for InMemoryGateway {
    fn default() -> Self {
        Self::pending_challenge(SIMULATED_CHALLENGE_URL)
    }
}

#[async_trait]
impl TokenizationGateway for InMemoryGateway {
    async fn tokenize(&self, card: &CardDetails) -> Result<CardToken> {
        self.tokenized.write().await.push(card.clone());
        match &self.token_result {
            Ok(token) => Ok(CardToken {
                token: token.clone(),
            }),
            Err(message) => Err(CheckoutError::Tokenization(message.clone())),
        }
    }
}

#[async_trait]
impl PaymentGateway for InMemoryGateway {
    async fn pay(&self, token: &CardToken) -> Result<PaymentResponse> {
        self.paid.write().await.push(token.clone());
        self.payment_result
            .clone()
            .map_err(CheckoutError::Payment)
    }
}
