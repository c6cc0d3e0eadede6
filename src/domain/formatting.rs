//! Display formatting for card input.
//!
//! These functions only reshape what the user typed. They never decide whether the
//! data is valid; that is the job of [`crate::domain::validation`].

use crate::domain::card::{CardScheme, ExpiryParts};

pub const EXPIRY_SEPARATOR: char = '/';

const AMEX_GROUPS: [usize; 3] = [4, 6, 5];
const DEFAULT_GROUP: usize = 4;
const MONTH_DIGITS: usize = 2;
const YEAR_DIGITS: usize = 4;

/// Removes all whitespace.
pub fn clean(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Re-groups a card number for display.
///
/// Amex numbers are grouped 4-6-5 once all 15 digits are present and are shown
/// ungrouped before that. Every other scheme is grouped in fours. The caller is
/// expected to have capped the input at the scheme's maximum length.
pub fn format_number(input: &str, scheme: CardScheme) -> String {
    let digits: Vec<char> = clean(input).chars().collect();

    match scheme {
        CardScheme::Amex => {
            let full: usize = AMEX_GROUPS.iter().sum();
            if digits.len() < full {
                return digits.into_iter().collect();
            }
            let mut groups = Vec::with_capacity(AMEX_GROUPS.len());
            let mut start = 0;
            for size in AMEX_GROUPS {
                groups.push(digits[start..start + size].iter().collect::<String>());
                start += size;
            }
            let mut formatted = groups.join(" ");
            formatted.extend(&digits[full..]);
            formatted
        }
        CardScheme::Visa | CardScheme::Mastercard | CardScheme::Unknown => digits
            .chunks(DEFAULT_GROUP)
            .map(|group| group.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join(" "),
    }
}

/// Formats an expiry entry as `MM`, `MM/` or `MM/YYYY`.
///
/// Input that already carries a separator keeps it as soon as the month has two
/// digits. Input without one gets a separator only once a third digit arrives.
pub fn format_expiry(input: &str) -> String {
    if let Some((before, after)) = input.split_once(EXPIRY_SEPARATOR) {
        let month = take_digits(before, MONTH_DIGITS);
        if month.len() < MONTH_DIGITS {
            return month;
        }
        let year = take_digits(after, YEAR_DIGITS);
        return format!("{month}{EXPIRY_SEPARATOR}{year}");
    }

    let digits = take_digits(input, usize::MAX);
    if digits.len() > MONTH_DIGITS {
        let year: String = digits[MONTH_DIGITS..].chars().take(YEAR_DIGITS).collect();
        format!("{}{EXPIRY_SEPARATOR}{year}", &digits[..MONTH_DIGITS])
    } else {
        digits
    }
}

/// Splits a displayed expiry on its first separator.
///
/// Only the segment directly after the first separator becomes the year; anything
/// after a second separator is dropped.
pub fn parse_expiry(display: &str) -> ExpiryParts {
    let mut parts = display.split(EXPIRY_SEPARATOR);
    ExpiryParts {
        month: parts.next().unwrap_or_default().to_string(),
        year: parts.next().unwrap_or_default().to_string(),
    }
}

/// Splits a complete expiry as given, without trimming or dropping characters.
///
/// `MM/YYYY` splits on the first separator and keeps everything after it as the
/// year. A bare entry such as `122030` takes the first two characters as the month
/// and the rest as the year.
pub fn split_expiry(raw: &str) -> ExpiryParts {
    if let Some((month, year)) = raw.split_once(EXPIRY_SEPARATOR) {
        return ExpiryParts {
            month: month.to_string(),
            year: year.to_string(),
        };
    }
    let split = raw
        .char_indices()
        .nth(MONTH_DIGITS)
        .map_or(raw.len(), |(index, _)| index);
    ExpiryParts {
        month: raw[..split].to_string(),
        year: raw[split..].to_string(),
    }
}

fn take_digits(input: &str, limit: usize) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(limit)
        .collect()
}
