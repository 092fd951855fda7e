//! Conversion errors

use std::path::{Path, PathBuf};
use thiserror::Error;

/// What is wrong with a single CSV row (or the header)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowDefect {
    /// A column named in the mapping is not present
    MissingColumn(String),
    /// Row has a different number of fields than the header
    Ragged { expected: u64, found: u64 },
    /// Any other structural CSV problem reported by the parser
    Csv(String),
}

impl std::fmt::Display for RowDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowDefect::MissingColumn(column) => write!(f, "missing column '{}'", column),
            RowDefect::Ragged { expected, found } => {
                write!(f, "expected {} fields, found {}", expected, found)
            }
            RowDefect::Csv(msg) => write!(f, "{}", msg),
        }
    }
}

/// Errors raised while converting a CSV file into vCards
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("cannot read input file '{}'", .path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input is not valid {encoding} text")]
    Decode { encoding: String },

    #[error("malformed row at line {line}: {defect}")]
    MalformedRow { line: u64, defect: RowDefect },

    #[error("cannot write output file '{}'", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid column mapping: {0}")]
    InvalidMapping(String),

    /// Write failure with no destination attached yet, see [`ConvertError::at_output`]
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    /// Process exit code reported by the CLI for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            ConvertError::InvalidMapping(_) => 1,
            ConvertError::InputNotFound { .. } => 2,
            ConvertError::Decode { .. } => 3,
            ConvertError::MalformedRow { .. } => 4,
            ConvertError::OutputWrite { .. } | ConvertError::Io(_) => 5,
        }
    }

    /// Attach the output path to a bare I/O error
    pub fn at_output(self, path: &Path) -> Self {
        match self {
            ConvertError::Io(source) => ConvertError::OutputWrite {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
