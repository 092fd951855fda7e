//! CSV decoder: turns raw input bytes into contact rows

use std::io::Cursor;

use encoding_rs::{Encoding, UTF_8};

use crate::contact::{ColumnMapping, ContactRow};
use crate::error::{ConvertError, Result, RowDefect};

// The header always sits on the first line
const HEADER_LINE: u64 = 1;

/// Decodes CSV text in a given encoding into [`ContactRow`]s
pub struct Decoder {
    mapping: ColumnMapping,
}

impl Decoder {
    /// Create a decoder that validates headers against the standard mapping
    pub fn new() -> Self {
        Self::with_mapping(ColumnMapping::standard())
    }

    pub fn with_mapping(mapping: ColumnMapping) -> Self {
        Self { mapping }
    }

    /// Decode `bytes` as `encoding_label` text and read the CSV header.
    ///
    /// Fails if the text has malformed sequences for that encoding or if
    /// the header lacks a mapped column. Rows are parsed lazily by the
    /// returned iterator.
    pub fn decode(&self, bytes: &[u8], encoding_label: &str) -> Result<ContactRows> {
        let text = Self::decode_text(bytes, encoding_label)?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(Cursor::new(text));

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| Self::row_error(HEADER_LINE, e))?
            .iter()
            .map(str::to_string)
            .collect();

        if let Some(column) = self.mapping.missing_from(headers.iter().map(String::as_str)) {
            return Err(ConvertError::MalformedRow {
                line: HEADER_LINE,
                defect: RowDefect::MissingColumn(column.to_string()),
            });
        }

        Ok(ContactRows {
            headers,
            records: reader.into_records(),
        })
    }

    /// Convert bytes to UTF-8 text, dropping any byte-order mark
    fn decode_text(bytes: &[u8], encoding_label: &str) -> Result<String> {
        let encoding = Encoding::for_label(encoding_label.trim().as_bytes()).unwrap_or_else(|| {
            tracing::warn!("unknown encoding '{}', decoding as UTF-8", encoding_label);
            UTF_8
        });

        let (text, actual, had_errors) = encoding.decode(bytes);
        if had_errors {
            return Err(ConvertError::Decode {
                encoding: actual.name().to_string(),
            });
        }
        if actual != encoding {
            tracing::debug!("byte-order mark overrides {} with {}", encoding.name(), actual.name());
        }

        Ok(text.into_owned())
    }

    fn row_error(fallback_line: u64, err: csv::Error) -> ConvertError {
        let line = err.position().map(|p| p.line()).unwrap_or(fallback_line);
        let defect = match err.kind() {
            csv::ErrorKind::UnequalLengths { expected_len, len, .. } => RowDefect::Ragged {
                expected: *expected_len,
                found: *len,
            },
            _ => RowDefect::Csv(err.to_string()),
        };
        ConvertError::MalformedRow { line, defect }
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazily parsed data rows of a decoded CSV file
pub struct ContactRows {
    headers: Vec<String>,
    records: csv::StringRecordsIntoIter<Cursor<String>>,
}

impl ContactRows {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

impl Iterator for ContactRows {
    type Item = Result<ContactRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(Decoder::row_error(HEADER_LINE, e))),
        };
        let line = record.position().map(|p| p.line()).unwrap_or(HEADER_LINE);
        Some(Ok(ContactRow::from_record(
            line,
            self.headers.iter().map(String::as_str),
            record.iter(),
        )))
    }
}
