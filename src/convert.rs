//! Conversion driver: CSV file in, timestamped vCard file out

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use crate::contact::ColumnMapping;
use crate::decoder::Decoder;
use crate::detect::{detect_file_encoding, CharsetDetector, StatisticalDetector};
use crate::encoder::{Encoder, EncoderConfig};
use crate::error::{ConvertError, Result};

pub const DEFAULT_INPUT: &str = "contact.csv";
pub const DEFAULT_OUTPUT_PREFIX: &str = "output_";
pub const DEFAULT_OUTPUT_EXTENSION: &str = "vcf";
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Where and how the output file is named
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Directory the output file is created in
    pub output_dir: PathBuf,
    pub output_prefix: String,
    /// Extension without the leading dot
    pub output_extension: String,
    pub encoder: EncoderConfig,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            output_extension: DEFAULT_OUTPUT_EXTENSION.to_string(),
            encoder: EncoderConfig::default(),
        }
    }
}

impl ConvertConfig {
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_encoder(mut self, encoder: EncoderConfig) -> Self {
        self.encoder = encoder;
        self
    }
}

/// Build `<prefix><YYYYMMDDHHMMSS>.<extension>`.
///
/// Two runs within the same wall-clock second get the same name, and the
/// later one truncates the earlier file.
pub fn output_file_name(prefix: &str, timestamp: &NaiveDateTime, extension: &str) -> String {
    format!("{}{}.{}", prefix, timestamp.format(TIMESTAMP_FORMAT), extension)
}

/// Lifecycle of a single conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertState {
    NotStarted,
    /// Output is open; `records` vCards written so far
    Streaming { records: usize },
    Completed { records: usize },
    Failed,
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertReport {
    pub output_path: PathBuf,
    /// Encoding label the input was decoded with
    pub encoding: String,
    pub records: usize,
}

/// Converts one CSV file into one vCard file
pub struct Converter {
    config: ConvertConfig,
    mapping: ColumnMapping,
    detector: Box<dyn CharsetDetector>,
    state: ConvertState,
}

impl Converter {
    pub fn new() -> Self {
        Self::with_config(ConvertConfig::default())
    }

    pub fn with_config(config: ConvertConfig) -> Self {
        Self {
            config,
            mapping: ColumnMapping::standard(),
            detector: Box::new(StatisticalDetector::new()),
            state: ConvertState::NotStarted,
        }
    }

    pub fn with_mapping(mut self, mapping: ColumnMapping) -> Self {
        self.mapping = mapping;
        self
    }

    /// Replace the charset detector, e.g. to force an encoding
    pub fn with_detector(mut self, detector: impl CharsetDetector + 'static) -> Self {
        self.detector = Box::new(detector);
        self
    }

    pub fn state(&self) -> &ConvertState {
        &self.state
    }

    /// Convert `input`, naming the output after the current local time
    pub fn run(&mut self, input: &Path) -> Result<ConvertReport> {
        let now = Local::now().naive_local();
        self.run_at(input, now)
    }

    /// Convert `input`, naming the output after `timestamp`
    pub fn run_at(&mut self, input: &Path, timestamp: NaiveDateTime) -> Result<ConvertReport> {
        let result = self.convert(input, timestamp);
        match &result {
            Ok(report) => {
                self.state = ConvertState::Completed { records: report.records };
                tracing::info!(
                    output = %report.output_path.display(),
                    records = report.records,
                    encoding = %report.encoding,
                    "conversion complete"
                );
            }
            Err(e) => {
                self.state = ConvertState::Failed;
                tracing::debug!("conversion failed: {}", e);
            }
        }
        result
    }

    fn convert(&mut self, input: &Path, timestamp: NaiveDateTime) -> Result<ConvertReport> {
        let file_name = output_file_name(&self.config.output_prefix, &timestamp, &self.config.output_extension);
        let output_path = self.config.output_dir.join(file_name);

        // Everything about the input is checked before the output exists
        let (bytes, encoding) = detect_file_encoding(input, self.detector.as_ref())?;
        let rows = Decoder::with_mapping(self.mapping.clone()).decode(&bytes, &encoding)?;
        drop(bytes);

        let encoder = Encoder::with_mapping(self.mapping.clone()).with_config(self.config.encoder.clone());

        let file = fs::File::create(&output_path).map_err(|source| ConvertError::OutputWrite {
            path: output_path.clone(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        self.state = ConvertState::Streaming { records: 0 };
        tracing::debug!(output = %output_path.display(), "writing vCards");

        let mut records = 0;
        for row in rows {
            let row = row?;
            encoder
                .encode_to_writer(&row, &mut writer)
                .map_err(|e| e.at_output(&output_path))?;
            records += 1;
            self.state = ConvertState::Streaming { records };
            tracing::debug!(line = row.line(), "wrote vCard {}", records);
        }

        writer.flush().map_err(|source| ConvertError::OutputWrite {
            path: output_path.clone(),
            source,
        })?;

        Ok(ConvertReport {
            output_path,
            encoding,
            records,
        })
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}
