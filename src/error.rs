//! Error types for palette extraction.
//!
//! The scan itself never fails: malformed samples are skipped and an empty
//! input yields an empty palette. Errors only surface at the edges, where
//! loosely typed data (hex strings, JSON pixels, encoded images, config
//! files) is turned into the crate's types.

use thiserror::Error;

/// Result type alias for palette operations
pub type Result<T> = std::result::Result<T, PaletteError>;

#[derive(Error, Debug)]
pub enum PaletteError {
    /// A channel value outside `0..=255`
    #[error("Invalid {channel} channel: {value} (expected 0-255)")]
    InvalidChannel { channel: &'static str, value: i64 },

    /// A sample that is not a triple of integers
    #[error("Malformed pixel sample: {reason}")]
    MalformedSample { reason: String },

    /// Hex color string that is not `#RRGGBB` / `RRGGBB`
    #[error("Invalid hex color {input:?}: {reason}")]
    InvalidHex { input: String, reason: String },

    /// Encoded image could not be decoded
    #[error("Unable to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// Config file could not be read or written
    #[error("Config I/O error: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// Config file is not valid JSON for [`crate::ExtractorConfig`]
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Config value out of range
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: &'static str, value: String },
}

impl PaletteError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedSample {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_hex(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidHex {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether this error concerns a single pixel sample, which the scan
    /// skips rather than reports.
    pub fn is_sample_error(&self) -> bool {
        matches!(
            self,
            PaletteError::InvalidChannel { .. } | PaletteError::MalformedSample { .. }
        )
    }
}
