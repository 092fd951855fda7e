//! Input charset detection
//!
//! Detection is a pluggable capability: anything implementing
//! [`CharsetDetector`] can be handed to the converter, which makes it easy
//! to force an encoding or stub detection out in tests.

use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;

use crate::error::{ConvertError, Result};

/// Encoding assumed when the detector has no guess
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Guesses the character encoding of a byte buffer
pub trait CharsetDetector {
    /// Return an encoding label, or `None` when there is nothing to go on
    fn detect(&self, bytes: &[u8]) -> Option<String>;
}

/// BOM sniffing, UTF-8 validation, then chardetng statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticalDetector;

impl StatisticalDetector {
    pub fn new() -> Self {
        Self
    }
}

impl CharsetDetector for StatisticalDetector {
    fn detect(&self, bytes: &[u8]) -> Option<String> {
        if bytes.is_empty() {
            return None;
        }

        if let Some((encoding, _bom_len)) = Encoding::for_bom(bytes) {
            return Some(encoding.name().to_string());
        }

        // ASCII is a subset of UTF-8, so this covers plain files too
        if std::str::from_utf8(bytes).is_ok() {
            return Some(DEFAULT_ENCODING.to_string());
        }

        let mut detector = EncodingDetector::new();
        detector.feed(bytes, true);
        let encoding = detector.guess(None, true);
        Some(encoding.name().to_string())
    }
}

/// Always reports the same encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedCharset(pub String);

impl FixedCharset {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }
}

impl CharsetDetector for FixedCharset {
    fn detect(&self, _bytes: &[u8]) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Run `detector` over `bytes`, falling back to [`DEFAULT_ENCODING`]
pub fn detect_encoding(bytes: &[u8], detector: &dyn CharsetDetector) -> String {
    match detector.detect(bytes) {
        Some(label) if !label.trim().is_empty() => label,
        _ => {
            tracing::debug!("no charset guess, assuming {}", DEFAULT_ENCODING);
            DEFAULT_ENCODING.to_string()
        }
    }
}

/// Read the whole file and detect its encoding.
///
/// Returns the raw bytes together with the label so the caller does not
/// need to read the file a second time.
pub fn detect_file_encoding(path: &Path, detector: &dyn CharsetDetector) -> Result<(Vec<u8>, String)> {
    let bytes = std::fs::read(path).map_err(|source| ConvertError::InputNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    let encoding = detect_encoding(&bytes, detector);
    tracing::debug!(path = %path.display(), %encoding, bytes = bytes.len(), "detected input encoding");
    Ok((bytes, encoding))
}
