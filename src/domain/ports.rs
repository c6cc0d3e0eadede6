use super::card::CardDetails;
use super::payment::{CardToken, PaymentResponse};
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait TokenizationGateway: Send + Sync {
    async fn tokenize(&self, card: &CardDetails) -> Result<CardToken>;
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn pay(&self, token: &CardToken) -> Result<PaymentResponse>;
}

pub type TokenizationGatewayBox = Box<dyn TokenizationGateway>;
pub type PaymentGatewayBox = Box<dyn PaymentGateway>;
