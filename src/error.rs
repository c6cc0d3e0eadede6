use crate::domain::payment::PaymentStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("{0}")]
    Tokenization(String),
    #[error("{0}")]
    Payment(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid card details: {}", .0.join(", "))]
    InvalidCard(Vec<String>),
    #[error("A payment cannot be started while the flow is {0}")]
    FlowBusy(PaymentStatus),
}

pub type Result<T> = std::result::Result<T, CheckoutError>;
