//! Error types for walking correlator files.

use std::path::PathBuf;

use thiserror::Error;
use vdif::ReadError;

/// Errors that can occur while reading units or assembling spectra.
#[derive(Debug, Error)]
pub enum SpectraError {
    /// Failed to open the input file.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed while reading from the stream.
    #[error("failed to read unit {unit}: {source}")]
    Io {
        unit: usize,
        #[source]
        source: std::io::Error,
    },

    /// The header words of a unit could not be decoded.
    #[error("failed to decode the VDIF header of unit {unit}: {source}")]
    Header {
        unit: usize,
        #[source]
        source: ReadError,
    },

    /// The header time is outside what can be represented.
    #[error("unit {unit} has an unrepresentable timestamp")]
    Timestamp { unit: usize },

    /// A spectrum row does not have the expected number of channels.
    #[error("expected {expected} channels, got {got}")]
    ChannelMismatch { expected: usize, got: usize },

    /// The unit layout cannot describe a readable file.
    #[error("invalid unit layout: {reason}")]
    InvalidLayout { reason: String },
}
