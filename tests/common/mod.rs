#![allow(dead_code)]

use card_checkout::application::flow::PaymentFlow;
use card_checkout::application::three_d_secure::ThreeDSecureRedirect;
use chrono::{Datelike, Local};
use std::io::Write;
use tempfile::NamedTempFile;

pub const VISA: &str = "4242424242424242";
pub const AMEX: &str = "378282246310005";

/// An expiry two years ahead, as `MM/YYYY`.
pub fn future_expiry() -> String {
    format!("12/{}", Local::now().year() + 2)
}

pub fn card_csv(rows: &[[&str; 3]]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "number,expiry,cvv").unwrap();
    for row in rows {
        writeln!(file, "{}", row.join(",")).unwrap();
    }
    file.flush().unwrap();
    file
}

pub fn flow_with<G>(gateway: &G) -> PaymentFlow
where
    G: card_checkout::domain::ports::TokenizationGateway
        + card_checkout::domain::ports::PaymentGateway
        + Clone
        + 'static,
{
    PaymentFlow::new(
        Box::new(gateway.clone()),
        Box::new(gateway.clone()),
        ThreeDSecureRedirect::default(),
    )
}
