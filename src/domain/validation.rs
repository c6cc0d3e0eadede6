//! Card data validation.
//!
//! Pure checks that gate form submission. Only [`validate_expiry`] reads the clock;
//! use [`validate_expiry_at`] to evaluate against a fixed date.

use crate::domain::card::CardScheme;
use crate::domain::formatting::clean;
use chrono::{Datelike, Local, NaiveDate};
use std::ops::RangeInclusive;

const AMEX_PREFIXES: [&str; 2] = ["34", "37"];
const MASTERCARD_SECOND_DIGITS: RangeInclusive<u8> = b'1'..=b'5';
const MASTERCARD_2_SERIES: RangeInclusive<u16> = 2221..=2720;

/// Classifies a card number by its leading digits.
///
/// Works on partial input. Non-digit characters are ignored.
pub fn detect_scheme(card_number: &str) -> CardScheme {
    let digits: String = card_number.chars().filter(|c| c.is_ascii_digit()).collect();
    let bytes = digits.as_bytes();

    match bytes.first() {
        Some(b'4') => CardScheme::Visa,
        Some(b'3') => {
            if AMEX_PREFIXES.iter().any(|prefix| digits.starts_with(prefix)) {
                CardScheme::Amex
            } else {
                CardScheme::Unknown
            }
        }
        Some(b'5') => match bytes.get(1) {
            Some(second) if MASTERCARD_SECOND_DIGITS.contains(second) => CardScheme::Mastercard,
            _ => CardScheme::Unknown,
        },
        Some(b'2') => match digits.get(..4).and_then(|prefix| prefix.parse::<u16>().ok()) {
            Some(prefix) if MASTERCARD_2_SERIES.contains(&prefix) => CardScheme::Mastercard,
            _ => CardScheme::Unknown,
        },
        _ => CardScheme::Unknown,
    }
}

/// Digits in a complete card number. Unknown schemes fall back to 16.
pub fn max_card_length(scheme: CardScheme) -> usize {
    match scheme {
        CardScheme::Amex => 15,
        CardScheme::Visa | CardScheme::Mastercard | CardScheme::Unknown => 16,
    }
}

/// Digits in a complete CVV. Unknown schemes fall back to 3.
pub fn max_cvv_length(scheme: CardScheme) -> usize {
    match scheme {
        CardScheme::Amex => 4,
        CardScheme::Visa | CardScheme::Mastercard | CardScheme::Unknown => 3,
    }
}

/// Standard mod-10 checksum. Empty or non-digit input fails.
pub fn luhn_check(digits: &str) -> bool {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let sum: u32 = digits
        .bytes()
        .rev()
        .map(|b| u32::from(b - b'0'))
        .enumerate()
        .map(|(i, digit)| {
            if i % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                digit
            }
        })
        .sum();

    sum % 10 == 0
}

/// Requires the exact length for the detected scheme and a passing checksum.
pub fn validate_card_number(raw: &str) -> bool {
    let digits = clean(raw);
    let scheme = detect_scheme(&digits);
    digits.len() == max_card_length(scheme) && luhn_check(&digits)
}

/// Checks an expiry against the current local month.
pub fn validate_expiry(month: &str, year: &str) -> bool {
    validate_expiry_at(month, year, Local::now().date_naive())
}

/// Checks an expiry against the month containing `today`.
///
/// The month must be 1..=12, the year exactly four digits, and the pair must not
/// be earlier than `today`'s month.
pub fn validate_expiry_at(month: &str, year: &str, today: NaiveDate) -> bool {
    let (Some(month_num), Some(year_num)) = (parse_digits(month), parse_digits(year)) else {
        return false;
    };

    if !(1..=12).contains(&month_num) || year.len() != 4 {
        return false;
    }

    (year_num, month_num) >= (today.year() as u32, today.month())
}

/// All-digit CVV of exactly the scheme's length.
pub fn validate_cvv(cvv: &str, scheme: CardScheme) -> bool {
    !cvv.is_empty() && cvv.bytes().all(|b| b.is_ascii_digit()) && cvv.len() == max_cvv_length(scheme)
}

fn parse_digits(value: &str) -> Option<u32> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}
