//! Domain layer: card data rules, the payment state machine, and the gateway ports
//! it is driven through.

pub mod card;
pub mod formatting;
pub mod payment;
pub mod ports;
pub mod validation;
