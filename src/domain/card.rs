use serde::{Deserialize, Serialize};
use std::fmt;

/// Card network family, derived from the leading digits of a card number.
///
/// Never stored on its own: recompute it with
/// [`detect_scheme`](crate::domain::validation::detect_scheme) whenever the digits change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardScheme {
    Visa,
    Mastercard,
    Amex,
    #[default]
    Unknown,
}

impl CardScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardScheme::Visa => "visa",
            CardScheme::Mastercard => "mastercard",
            CardScheme::Amex => "amex",
            CardScheme::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CardScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Month and year of an expiry date, as typed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExpiryParts {
    pub month: String,
    pub year: String,
}

/// Canonical card data handed to the tokenization gateway.
///
/// `number` holds digits only. `Debug` masks the number and hides the CVV so the
/// value can appear in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct CardDetails {
    pub number: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub cvv: String,
}

impl CardDetails {
    pub fn new(
        number: impl Into<String>,
        expiry_month: impl Into<String>,
        expiry_year: impl Into<String>,
        cvv: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            expiry_month: expiry_month.into(),
            expiry_year: expiry_year.into(),
            cvv: cvv.into(),
        }
    }

    pub fn masked_number(&self) -> String {
        mask_number(&self.number)
    }
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("number", &self.masked_number())
            .field("expiry_month", &self.expiry_month)
            .field("expiry_year", &self.expiry_year)
            .field("cvv", &"***")
            .finish()
    }
}

/// Replaces every digit but the last four with `*`.
pub fn mask_number(number: &str) -> String {
    let digits: Vec<char> = number.chars().filter(|c| !c.is_whitespace()).collect();
    let visible = digits.len().saturating_sub(4);
    digits
        .iter()
        .enumerate()
        .map(|(i, c)| if i < visible { '*' } else { *c })
        .collect()
}
