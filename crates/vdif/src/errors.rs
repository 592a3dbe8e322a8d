//! Error types for field compilation and word reading.

use thiserror::Error;

/// Errors produced when compiling a [crate::field::FieldSpec] into a [crate::parser::Parser].
///
/// These only arise from a bad field table, never from frame data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// A 64-bit field must start at bit 0 of its low word.
    #[error("bit_index is expected to be 0 when bit_length is 64, got {bit_index}")]
    UnalignedWideField { bit_index: u32 },
    /// `bit_index + bit_length` is 0 or greater than 32.
    #[error(
        "the sum of bit_index and bit_length is expected to be greater than 0 \
         and less or equal to 32, got {end}"
    )]
    InvalidRange { end: u32 },
    /// Field name is invalid (e.g. empty or duplicate).
    #[error("invalid field name: {0:?}")]
    InvalidFieldName(String),
}

/// Errors produced when reading fields from a word sequence
/// (e.g. during [crate::layout::Layout::decode]).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    /// Requested word is beyond the end of the sequence.
    #[error("word {word_index} is out of range for a {len}-word header")]
    OutOfBounds { word_index: usize, len: usize },
    /// A field the header model needs is missing from the layout or wider than its type.
    #[error("layout does not provide a usable {name:?} field")]
    LayoutMismatch { name: String },
    /// Byte block cannot be split into a 4- or 8-word header.
    #[error("a header block is 16 or 32 bytes, got {0}")]
    UnalignedBytes(usize),
}
