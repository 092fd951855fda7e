//! # emx-csv2vcf
//!
//! Convert a CSV contact list into vCard 3.0 records.
//!
//! ## Input
//!
//! The first CSV row is the header. Header names are expected to already be
//! vCard property tags:
//!
//! ```text
//! FN,N,TEL;TYPE=CELL,EMAIL;TYPE=HOME,...
//! Alice,Alice,555-1234,alice@example.com,...
//! ```
//!
//! The input encoding is detected automatically (BOM, UTF-8 validation,
//! then a statistical guess via `chardetng`), falling back to UTF-8.
//!
//! ## Output
//!
//! One vCard per row, written in row order to
//! `output_<YYYYMMDDHHMMSS>.vcf`:
//!
//! ```text
//! BEGIN:VCARD
//! VERSION:3.0
//! FN:Alice
//! TEL;TYPE=CELL:555-1234
//! END:VCARD
//! ```
//!
//! Values are escaped once: `;` becomes `\;` and `,` becomes `\,`.
//!
//! ## Missing data
//!
//! - A header without one of the mapped columns fails the run before any
//!   output file is created.
//! - Empty values are still written as `TAG:` unless
//!   [`EncoderConfig::skip_empty_fields`] is set.
//! - A ragged row aborts the run; records already written stay in the file.

pub mod contact;
pub mod convert;
pub mod decoder;
pub mod detect;
pub mod encoder;
pub mod error;

pub use contact::{ColumnMapping, ContactRow, VCardRecord, COLUMN_MAPPING};
pub use convert::{output_file_name, ConvertConfig, ConvertReport, ConvertState, Converter};
pub use decoder::{ContactRows, Decoder};
pub use detect::{detect_encoding, detect_file_encoding, CharsetDetector, FixedCharset, StatisticalDetector, DEFAULT_ENCODING};
pub use encoder::{escape_value, Encoder, EncoderConfig};
pub use error::{ConvertError, Result, RowDefect};
