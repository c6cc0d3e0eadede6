use crate::application::card_form::CardEntry;
use crate::error::{CheckoutError, Result};
use serde::Deserialize;
use std::io::Read;

/// One row of a batch validation file: `number,expiry,cvv`.
///
/// `expiry` is either `MM/YYYY` or bare digits such as `122030`.
#[derive(Debug, Deserialize, PartialEq, Eq, Clone)]
pub struct CardRecord {
    pub number: String,
    pub expiry: String,
    pub cvv: String,
}

impl From<CardRecord> for CardEntry {
    fn from(record: CardRecord) -> Self {
        CardEntry::new(record.number, record.expiry, record.cvv)
    }
}

/// Batch file of cards to check, one `number,expiry,cvv` row each after a header.
///
/// Padding around a value is ignored. A row with a missing column is reported as
/// an error for that row alone and the rows after it are still read.
pub struct CardReader<R: Read> {
    rows: csv::Reader<R>,
}

impl<R: Read> CardReader<R> {
    pub fn new(source: R) -> Self {
        let rows = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(source);
        Self { rows }
    }

    /// Card rows in file order, parsed as they are pulled.
    pub fn records(self) -> impl Iterator<Item = Result<CardRecord>> {
        self.rows
            .into_deserialize::<CardRecord>()
            .map(|row| row.map_err(CheckoutError::from))
    }
}
