use super::card_reader::CardRecord;
use crate::application::card_form::{CardEntry, CardField};
use crate::domain::card::{CardScheme, mask_number};
use crate::domain::formatting::clean;
use crate::error::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;

/// Validation verdict for one card record. The number is masked.
#[derive(Debug, Serialize, PartialEq, Eq, Clone)]
pub struct ValidationReport {
    pub number: String,
    pub scheme: CardScheme,
    pub number_valid: bool,
    pub expiry_valid: bool,
    pub cvv_valid: bool,
}

impl ValidationReport {
    pub fn evaluate(record: &CardRecord, today: NaiveDate) -> Self {
        let entry = CardEntry::from(record.clone());
        Self {
            number: mask_number(&clean(&entry.number)),
            scheme: entry.scheme(),
            number_valid: entry.is_field_valid_at(CardField::Number, today),
            expiry_valid: entry.is_field_valid_at(CardField::Expiry, today),
            cvv_valid: entry.is_field_valid_at(CardField::Cvv, today),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.number_valid && self.expiry_valid && self.cvv_valid
    }
}

/// Writes validation reports as CSV.
pub struct ValidationReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ValidationReportWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_reports(&mut self, reports: impl IntoIterator<Item = ValidationReport>) -> Result<()> {
        for report in reports {
            self.writer.serialize(report)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
