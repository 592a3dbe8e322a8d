//! Definition of header fields as word/bit geometry.

/// Where a field lives inside a header's word sequence.
///
/// `bit_index` is the offset of the field's least significant bit within the
/// word. A `bit_length` of 64 reads `word_index` and the following word as
/// one value and requires `bit_index == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldSpec {
    pub word_index: usize,
    pub bit_index: u32,
    pub bit_length: u32,
}

impl FieldSpec {
    pub const fn new(word_index: usize, bit_index: u32, bit_length: u32) -> Self {
        FieldSpec {
            word_index,
            bit_index,
            bit_length,
        }
    }

    /// Whether this field spans two consecutive words.
    pub const fn is_wide(&self) -> bool {
        self.bit_length == 64
    }

    /// Index of the last word this field touches.
    pub const fn last_word(&self) -> usize {
        if self.is_wide() {
            self.word_index + 1
        } else {
            self.word_index
        }
    }
}

#[cfg(feature = "serde")]
impl From<crate::serde::FieldDef> for FieldSpec {
    fn from(value: crate::serde::FieldDef) -> Self {
        FieldSpec::new(value.word_index, value.bit_index, value.bit_length)
    }
}

/// A field specification paired with the name it is decoded under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedField<'a> {
    pub name: &'a str,
    pub spec: FieldSpec,
}
