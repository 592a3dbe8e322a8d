//! Validated bit-field parsers built from [FieldSpec]s.

use crate::{
    bits,
    errors::{FieldError, ReadError},
    field::FieldSpec,
};

/// A field extractor whose geometry has already been checked.
///
/// Parsers are plain values: building one validates the geometry, and
/// [Parser::extract] is a pure function of the word sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parser {
    /// `bit_length` bits of one word, starting at `bit_index`.
    Masked {
        word_index: usize,
        bit_index: u32,
        bit_length: u32,
    },
    /// Two consecutive words joined into a 64-bit value, low word first.
    Joined { word_index: usize },
}

/// Builds a parser for the field at `(word_index, bit_index, bit_length)`.
///
/// Fails if `bit_length` is 64 and `bit_index` is not 0, or if
/// `bit_index + bit_length` is not in `1..=32` otherwise.
pub fn make_parser(
    word_index: usize,
    bit_index: u32,
    bit_length: u32,
) -> Result<Parser, FieldError> {
    Parser::try_from(&FieldSpec::new(word_index, bit_index, bit_length))
}

impl TryFrom<&FieldSpec> for Parser {
    type Error = FieldError;

    fn try_from(spec: &FieldSpec) -> Result<Self, Self::Error> {
        if spec.is_wide() {
            if spec.bit_index != 0 {
                return Err(FieldError::UnalignedWideField {
                    bit_index: spec.bit_index,
                });
            }

            return Ok(Parser::Joined {
                word_index: spec.word_index,
            });
        }

        let end = spec.bit_index.saturating_add(spec.bit_length);
        if end == 0 || end > 32 {
            return Err(FieldError::InvalidRange { end });
        }

        Ok(Parser::Masked {
            word_index: spec.word_index,
            bit_index: spec.bit_index,
            bit_length: spec.bit_length,
        })
    }
}

impl Parser {
    /// Extracts this field from `words` as an unsigned value.
    pub fn extract(&self, words: &[u32]) -> Result<u64, ReadError> {
        match *self {
            Parser::Masked {
                word_index,
                bit_index,
                bit_length,
            } => {
                let word = word_at(words, word_index)?;
                Ok(bits::extract_bits(word, bit_index, bit_length))
            }
            Parser::Joined { word_index } => {
                let lo = word_at(words, word_index)?;
                let hi = word_at(words, word_index + 1)?;
                Ok(bits::join_words(lo, hi))
            }
        }
    }

    /// Number of words a sequence needs for this parser to succeed.
    pub fn min_words(&self) -> usize {
        match *self {
            Parser::Masked { word_index, .. } => word_index + 1,
            Parser::Joined { word_index } => word_index + 2,
        }
    }
}

fn word_at(words: &[u32], word_index: usize) -> Result<u32, ReadError> {
    words.get(word_index).copied().ok_or(ReadError::OutOfBounds {
        word_index,
        len: words.len(),
    })
}
