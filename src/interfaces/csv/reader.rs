use crate::error::{LedgerError, Result};
use serde::de::DeserializeOwned;
use std::io::Read;

/// Reads typed rows from a CSV source.
///
/// Wraps `csv::Reader` with whitespace trimming and flexible record lengths, and yields
/// `Result<T>` per row so a malformed line does not stop the stream.
pub struct CsvRecordReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CsvRecordReader<R> {
    /// Creates a new `CsvRecordReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes each row as `T`.
    pub fn records<T: DeserializeOwned>(self) -> impl Iterator<Item = Result<T>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(LedgerError::from))
    }
}
