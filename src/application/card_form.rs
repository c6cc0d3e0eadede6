//! Card entry form state.
//!
//! [`CardForm`] applies length caps while the user types and reports per-field
//! errors only after a field has been touched. Typing is never blocked by
//! validation; only [`CardForm::submit`] is.
//!
//! [`CardEntry`] holds values supplied whole, such as command-line arguments or a
//! CSV row. They are validated exactly as given.

use crate::domain::card::{CardDetails, CardScheme, ExpiryParts};
use crate::domain::formatting::{clean, format_expiry, format_number, parse_expiry, split_expiry};
use crate::domain::payment::PaymentStatus;
use crate::domain::validation::{
    detect_scheme, max_card_length, max_cvv_length, validate_card_number, validate_cvv,
    validate_expiry, validate_expiry_at,
};
use crate::error::{CheckoutError, Result};
use chrono::{Local, NaiveDate};

/// Longest expiry entry accepted, `MM/YYYY`.
const MAX_EXPIRY_INPUT: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardField {
    Number,
    Expiry,
    Cvv,
}

impl CardField {
    pub const ALL: [CardField; 3] = [CardField::Number, CardField::Expiry, CardField::Cvv];

    pub fn error_message(&self) -> &'static str {
        match self {
            CardField::Number => "Invalid card number",
            CardField::Expiry => "Invalid expiry date",
            CardField::Cvv => "Invalid CVV",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Touched {
    number: bool,
    expiry: bool,
    cvv: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardForm {
    number: String,
    expiry: String,
    cvv: String,
    touched: Touched,
}

impl CardForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Formatted card number as displayed.
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Formatted expiry as displayed.
    pub fn expiry(&self) -> &str {
        &self.expiry
    }

    pub fn cvv(&self) -> &str {
        &self.cvv
    }

    pub fn scheme(&self) -> CardScheme {
        detect_scheme(&self.number)
    }

    /// Accepts the new number text unless it is longer than the scheme allows.
    pub fn input_number(&mut self, text: &str) {
        let digits = clean(text);
        let scheme = detect_scheme(&digits);
        if digits.len() <= max_card_length(scheme) {
            self.number = format_number(&digits, scheme);
        }
    }

    pub fn input_expiry(&mut self, text: &str) {
        if text.chars().count() <= MAX_EXPIRY_INPUT {
            self.expiry = format_expiry(text);
        }
    }

    /// Keeps digits only, capped by the CVV length of the current scheme.
    pub fn input_cvv(&mut self, text: &str) {
        let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() <= max_cvv_length(self.scheme()) {
            self.cvv = digits;
        }
    }

    pub fn touch(&mut self, field: CardField) {
        match field {
            CardField::Number => self.touched.number = true,
            CardField::Expiry => self.touched.expiry = true,
            CardField::Cvv => self.touched.cvv = true,
        }
    }

    fn is_touched(&self, field: CardField) -> bool {
        match field {
            CardField::Number => self.touched.number,
            CardField::Expiry => self.touched.expiry,
            CardField::Cvv => self.touched.cvv,
        }
    }

    fn is_field_valid(&self, field: CardField) -> bool {
        match field {
            CardField::Number => validate_card_number(&self.number),
            CardField::Expiry => {
                let parts = parse_expiry(&self.expiry);
                validate_expiry(&parts.month, &parts.year)
            }
            CardField::Cvv => validate_cvv(&self.cvv, self.scheme()),
        }
    }

    pub fn value(&self, field: CardField) -> &str {
        match field {
            CardField::Number => &self.number,
            CardField::Expiry => &self.expiry,
            CardField::Cvv => &self.cvv,
        }
    }

    /// Error to show for a field: only once it is touched, non-empty and invalid.
    pub fn field_error(&self, field: CardField) -> Option<&'static str> {
        if !self.is_touched(field) || self.value(field).is_empty() || self.is_field_valid(field) {
            return None;
        }
        Some(field.error_message())
    }

    pub fn is_valid(&self) -> bool {
        CardField::ALL.iter().all(|field| self.is_field_valid(*field))
    }

    /// Submission is disabled while a tokenization is in flight.
    pub fn can_submit(&self, status: PaymentStatus) -> bool {
        status != PaymentStatus::Tokenizing && self.is_valid()
    }

    /// Produces the canonical card details.
    ///
    /// An invalid form marks every field touched so all errors become visible.
    pub fn submit(&mut self) -> Result<CardDetails> {
        if !self.is_valid() {
            for field in CardField::ALL {
                self.touch(field);
            }
            let errors = CardField::ALL
                .iter()
                .filter(|field| !self.is_field_valid(**field))
                .map(|field| field.error_message().to_string())
                .collect();
            return Err(CheckoutError::InvalidCard(errors));
        }

        let expiry = parse_expiry(&self.expiry);
        Ok(CardDetails::new(
            clean(&self.number),
            expiry.month,
            expiry.year,
            self.cvv.clone(),
        ))
    }
}

/// Card details given in one piece rather than typed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CardEntry {
    pub number: String,
    pub expiry: String,
    pub cvv: String,
}

impl CardEntry {
    pub fn new(
        number: impl Into<String>,
        expiry: impl Into<String>,
        cvv: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            expiry: expiry.into(),
            cvv: cvv.into(),
        }
    }

    pub fn scheme(&self) -> CardScheme {
        detect_scheme(&self.number)
    }

    pub fn expiry_parts(&self) -> ExpiryParts {
        split_expiry(&self.expiry)
    }

    pub fn value(&self, field: CardField) -> &str {
        match field {
            CardField::Number => &self.number,
            CardField::Expiry => &self.expiry,
            CardField::Cvv => &self.cvv,
        }
    }

    pub fn is_field_valid_at(&self, field: CardField, today: NaiveDate) -> bool {
        match field {
            CardField::Number => validate_card_number(&self.number),
            CardField::Expiry => {
                let parts = self.expiry_parts();
                validate_expiry_at(&parts.month, &parts.year, today)
            }
            CardField::Cvv => validate_cvv(&self.cvv, self.scheme()),
        }
    }

    pub fn errors_at(&self, today: NaiveDate) -> Vec<String> {
        CardField::ALL
            .iter()
            .filter(|field| !self.is_field_valid_at(**field, today))
            .map(|field| field.error_message().to_string())
            .collect()
    }

    /// Canonical card details, checked against the current month.
    pub fn card_details(&self) -> Result<CardDetails> {
        self.card_details_at(Local::now().date_naive())
    }

    pub fn card_details_at(&self, today: NaiveDate) -> Result<CardDetails> {
        let errors = self.errors_at(today);
        if !errors.is_empty() {
            return Err(CheckoutError::InvalidCard(errors));
        }
        let expiry = self.expiry_parts();
        Ok(CardDetails::new(
            clean(&self.number),
            expiry.month,
            expiry.year,
            self.cvv.clone(),
        ))
    }
}
