//! Application layer orchestrating a checkout.
//!
//! [`flow::PaymentFlow`] drives one payment attempt through the gateway ports and
//! the 3-D Secure challenge. [`card_form::CardForm`] holds the entry form that
//! gates submission.

pub mod card_form;
pub mod flow;
pub mod three_d_secure;
