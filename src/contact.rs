//! Contact data structures

use std::collections::HashMap;

use crate::error::{ConvertError, Result};

// vCard framing lines
pub const VCARD_BEGIN: &str = "BEGIN:VCARD";
pub const VCARD_VERSION: &str = "VERSION:3.0";
pub const VCARD_END: &str = "END:VCARD";
pub const LINE_BREAK: char = '\n';

/// Default CSV column to vCard tag table, in emission order.
///
/// The header of the input CSV is expected to already carry vCard-style
/// names, so every column maps onto an identical tag. Addresses are written
/// as a single escaped value, not split into the structured ADR parts.
pub const COLUMN_MAPPING: &[(&str, &str)] = &[
    ("FN", "FN"),
    ("N", "N"),
    ("TEL;TYPE=CELL", "TEL;TYPE=CELL"),
    ("TEL;TYPE=HOME", "TEL;TYPE=HOME"),
    ("TEL;TYPE=WORK", "TEL;TYPE=WORK"),
    ("EMAIL;TYPE=HOME", "EMAIL;TYPE=HOME"),
    ("EMAIL;TYPE=WORK", "EMAIL;TYPE=WORK"),
    ("ADR;TYPE=HOME;CHARSET=UTF-8", "ADR;TYPE=HOME;CHARSET=UTF-8"),
    ("ADR;TYPE=WORK;CHARSET=UTF-8", "ADR;TYPE=WORK;CHARSET=UTF-8"),
    ("ORG;CHARSET=UTF-8", "ORG;CHARSET=UTF-8"),
    ("NOTE;CHARSET=UTF-8", "NOTE;CHARSET=UTF-8"),
    ("URL", "URL"),
];

/// Ordered (source column, vCard tag) pairs with unique source columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pairs: Vec<(String, String)>,
}

impl ColumnMapping {
    /// The built-in mapping from [`COLUMN_MAPPING`]
    pub fn standard() -> Self {
        Self {
            pairs: COLUMN_MAPPING
                .iter()
                .map(|(column, tag)| (column.to_string(), tag.to_string()))
                .collect(),
        }
    }

    /// Build a custom mapping, rejecting duplicate source columns
    pub fn new<I, C, T>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (C, T)>,
        C: Into<String>,
        T: Into<String>,
    {
        let mut collected: Vec<(String, String)> = Vec::new();
        for (column, tag) in pairs {
            let column = column.into();
            if collected.iter().any(|(c, _)| *c == column) {
                return Err(ConvertError::InvalidMapping(format!(
                    "duplicate source column '{}'",
                    column
                )));
            }
            collected.push((column, tag.into()));
        }
        Ok(Self { pairs: collected })
    }

    /// Iterate (column, tag) pairs in emission order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(c, t)| (c.as_str(), t.as_str()))
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(c, _)| c.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// First mapped column that does not appear in `header`
    pub fn missing_from<'a, H>(&self, header: H) -> Option<&str>
    where
        H: IntoIterator<Item = &'a str>,
    {
        let header: Vec<&str> = header.into_iter().collect();
        self.columns().find(|column| !header.contains(column))
    }
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self::standard()
    }
}

/// One CSV record keyed by header name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRow {
    line: u64,
    fields: HashMap<String, String>,
}

impl ContactRow {
    /// Pair header names with values. A repeated header keeps its last value.
    pub fn from_record<'h, 'v, H, V>(line: u64, header: H, values: V) -> Self
    where
        H: IntoIterator<Item = &'h str>,
        V: IntoIterator<Item = &'v str>,
    {
        let fields = header
            .into_iter()
            .zip(values)
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        Self { line, fields }
    }

    /// Line in the source file where this record starts (1-based)
    pub fn line(&self) -> u64 {
        self.line
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }
}

/// A single vCard as an ordered list of property lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VCardRecord {
    lines: Vec<String>,
}

impl VCardRecord {
    /// Start a record with the BEGIN and VERSION lines
    pub fn new() -> Self {
        Self {
            lines: vec![VCARD_BEGIN.to_string(), VCARD_VERSION.to_string()],
        }
    }

    /// Append `TAG:value`. The value must already be escaped.
    pub fn push_property(&mut self, tag: &str, escaped_value: &str) {
        self.lines.push(format!("{}:{}", tag, escaped_value));
    }

    /// Append the END line
    pub fn finish(mut self) -> Self {
        self.lines.push(VCARD_END.to_string());
        self
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl Default for VCardRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for VCardRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in &self.lines {
            write!(f, "{}{}", line, LINE_BREAK)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_mapping_order() {
        let mapping = ColumnMapping::standard();
        let columns: Vec<&str> = mapping.columns().collect();
        assert_eq!(columns.len(), 12);
        assert_eq!(columns[0], "FN");
        assert_eq!(columns[2], "TEL;TYPE=CELL");
        assert_eq!(columns[11], "URL");
        assert!(mapping.iter().all(|(c, t)| c == t));
    }

    #[test]
    fn test_mapping_rejects_duplicates() {
        let result = ColumnMapping::new([("FN", "FN"), ("FN", "N")]);
        assert!(matches!(result, Err(ConvertError::InvalidMapping(_))));
    }

    #[test]
    fn test_mapping_missing_from_header() {
        let mapping = ColumnMapping::new([("FN", "FN"), ("TEL;TYPE=CELL", "TEL;TYPE=CELL")]).unwrap();
        assert_eq!(mapping.missing_from(["FN", "TEL;TYPE=CELL"]), None);
        assert_eq!(mapping.missing_from(["FN"]), Some("TEL;TYPE=CELL"));
    }

    #[test]
    fn test_row_last_duplicate_wins() {
        let row = ContactRow::from_record(2, ["FN", "FN"], ["first", "second"]);
        assert_eq!(row.get("FN"), Some("second"));
        assert_eq!(row.line(), 2);
        assert_eq!(row.get("N"), None);
    }

    #[test]
    fn test_record_display() {
        let mut record = VCardRecord::new();
        record.push_property("FN", "Alice");
        let record = record.finish();
        assert_eq!(record.to_string(), "BEGIN:VCARD\nVERSION:3.0\nFN:Alice\nEND:VCARD\n");
        assert_eq!(record.lines().len(), 4);
    }
}
