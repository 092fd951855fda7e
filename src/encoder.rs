//! vCard encoder: maps one contact row onto vCard property lines

use std::io::Write;

use crate::contact::{ColumnMapping, ContactRow, VCardRecord};
use crate::error::{ConvertError, Result, RowDefect};

/// Escape vCard delimiters: `;` becomes `\;` and `,` becomes `\,`
pub fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if c == ';' || c == ',' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Options for how rows become vCards
#[derive(Debug, Clone, Default)]
pub struct EncoderConfig {
    /// Leave out properties whose value is empty instead of writing `TAG:`
    pub skip_empty_fields: bool,
}

/// Encodes contact rows into vCard records
pub struct Encoder {
    mapping: ColumnMapping,
    config: EncoderConfig,
}

impl Encoder {
    /// Create an encoder using the standard column mapping
    pub fn new() -> Self {
        Self::with_mapping(ColumnMapping::standard())
    }

    pub fn with_mapping(mapping: ColumnMapping) -> Self {
        Self {
            mapping,
            config: EncoderConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EncoderConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the vCard for a single row.
    ///
    /// Properties are emitted in mapping order. Every mapped column must be
    /// present in the row; an absent one is a [`ConvertError::MalformedRow`].
    pub fn encode_row(&self, row: &ContactRow) -> Result<VCardRecord> {
        let mut record = VCardRecord::new();

        for (column, tag) in self.mapping.iter() {
            let value = row.get(column).ok_or_else(|| ConvertError::MalformedRow {
                line: row.line(),
                defect: RowDefect::MissingColumn(column.to_string()),
            })?;

            if value.is_empty() && self.config.skip_empty_fields {
                continue;
            }

            record.push_property(tag, &escape_value(value));
        }

        Ok(record.finish())
    }

    /// Encode a row and write it straight to `writer`
    pub fn encode_to_writer<W: Write>(&self, row: &ContactRow, mut writer: W) -> Result<VCardRecord> {
        let record = self.encode_row(row)?;
        write!(writer, "{}", record)?;
        Ok(record)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_column_encoder() -> Encoder {
        let mapping = ColumnMapping::new([("FN", "FN"), ("TEL;TYPE=CELL", "TEL;TYPE=CELL")]).unwrap();
        Encoder::with_mapping(mapping)
    }

    #[test]
    fn test_escape_value() {
        assert_eq!(escape_value("Smith, John;Jr"), "Smith\\, John\\;Jr");
        assert_eq!(escape_value("plain text"), "plain text");
        assert_eq!(escape_value(""), "");
    }

    #[test]
    fn test_escape_touches_only_delimiters() {
        let value = "a;b,c\\d:e";
        let escaped = escape_value(value);
        assert_eq!(escaped, "a\\;b\\,c\\d:e");
        assert_eq!(escaped.replace("\\;", ";").replace("\\,", ","), value);
    }

    #[test]
    fn test_escape_already_escaped_is_escaped_again() {
        assert_eq!(escape_value("\\;"), "\\\\;");
    }

    #[test]
    fn test_encode_simple_row() {
        let row = ContactRow::from_record(2, ["FN", "TEL;TYPE=CELL"], ["Alice", "555-1234"]);
        let record = two_column_encoder().encode_row(&row).unwrap();

        assert_eq!(
            record.lines(),
            ["BEGIN:VCARD", "VERSION:3.0", "FN:Alice", "TEL;TYPE=CELL:555-1234", "END:VCARD"]
        );
        assert_eq!(
            record.to_string(),
            "BEGIN:VCARD\nVERSION:3.0\nFN:Alice\nTEL;TYPE=CELL:555-1234\nEND:VCARD\n"
        );
    }

    #[test]
    fn test_encode_escapes_value() {
        let row = ContactRow::from_record(2, ["FN", "TEL;TYPE=CELL"], ["Smith, John;Jr", ""]);
        let record = two_column_encoder().encode_row(&row).unwrap();
        assert!(record.lines().contains(&"FN:Smith\\, John\\;Jr".to_string()));
    }

    #[test]
    fn test_encode_line_count_matches_mapping() {
        let mapping = ColumnMapping::standard();
        let header: Vec<&str> = mapping.columns().collect();
        let values = vec!["x"; header.len()];
        let row = ContactRow::from_record(2, header.iter().copied(), values);

        let record = Encoder::new().encode_row(&row).unwrap();
        assert_eq!(record.lines().len(), mapping.len() + 3);
        assert_eq!(record.lines()[2], "FN:x");
        assert_eq!(record.lines()[mapping.len() + 1], "URL:x");
    }

    #[test]
    fn test_encode_empty_value_emitted_by_default() {
        let row = ContactRow::from_record(2, ["FN", "TEL;TYPE=CELL"], ["Alice", ""]);
        let record = two_column_encoder().encode_row(&row).unwrap();
        assert!(record.lines().contains(&"TEL;TYPE=CELL:".to_string()));
    }

    #[test]
    fn test_encode_skip_empty_fields() {
        let row = ContactRow::from_record(2, ["FN", "TEL;TYPE=CELL"], ["Alice", ""]);
        let encoder = two_column_encoder().with_config(EncoderConfig { skip_empty_fields: true });
        let record = encoder.encode_row(&row).unwrap();
        assert_eq!(record.lines(), ["BEGIN:VCARD", "VERSION:3.0", "FN:Alice", "END:VCARD"]);
    }

    #[test]
    fn test_encode_missing_column() {
        let row = ContactRow::from_record(7, ["FN"], ["Alice"]);
        let err = two_column_encoder().encode_row(&row).unwrap_err();
        match err {
            ConvertError::MalformedRow { line, defect } => {
                assert_eq!(line, 7);
                assert_eq!(defect, RowDefect::MissingColumn("TEL;TYPE=CELL".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_encode_to_writer() {
        let row = ContactRow::from_record(2, ["FN", "TEL;TYPE=CELL"], ["Bob", "1"]);
        let mut out = Vec::new();
        two_column_encoder().encode_to_writer(&row, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "BEGIN:VCARD\nVERSION:3.0\nFN:Bob\nTEL;TYPE=CELL:1\nEND:VCARD\n"
        );
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_encode_to_writer_io_error() {
        let row = ContactRow::from_record(2, ["FN", "TEL;TYPE=CELL"], ["Bob", "1"]);
        let err = two_column_encoder().encode_to_writer(&row, BrokenPipe).unwrap_err();
        match err {
            ConvertError::Io(source) => assert_eq!(source.kind(), std::io::ErrorKind::BrokenPipe),
            other => panic!("unexpected error: {other}"),
        }
    }
}
