//! Layout: compiled set of named fields used to decode header words into values.

use std::{
    collections::{BTreeMap, HashSet},
    sync::LazyLock,
};

use crate::{
    errors::{FieldError, ReadError},
    field::{FieldSpec, NamedField},
    parser::Parser,
};

/// Bit layout shared by standard (8-word) and legacy (4-word) VDIF headers.
///
/// Every field lives in words 0..4, so the same table decodes both forms.
pub const VDIF_FIELDS: [NamedField<'static>; 12] = [
    field("seconds", 0, 0, 30),
    field("legacy_flag", 0, 30, 1),
    field("invalid_flag", 0, 31, 1),
    field("frame_index", 1, 0, 24),
    field("ref_epoch", 1, 24, 6),
    field("frame_length", 2, 0, 24),
    field("log2_num_ch", 2, 24, 5),
    field("version", 2, 29, 3),
    field("station_id", 3, 0, 16),
    field("thread_id", 3, 16, 10),
    field("bits_per_sample", 3, 26, 5),
    field("complex_flag", 3, 31, 1),
];

const fn field(
    name: &'static str,
    word_index: usize,
    bit_index: u32,
    bit_length: u32,
) -> NamedField<'static> {
    NamedField {
        name,
        spec: FieldSpec::new(word_index, bit_index, bit_length),
    }
}

static VDIF_LAYOUT: LazyLock<Layout> = LazyLock::new(|| {
    Layout::compile(&VDIF_FIELDS)
        .unwrap_or_else(|err| panic!("built-in VDIF field table is invalid: {err}"))
});

/// The compiled VDIF header layout, built once per process.
pub fn vdif() -> &'static Layout {
    &VDIF_LAYOUT
}

/// A compiled field: name plus validated parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledField {
    pub name: String,
    pub spec: FieldSpec,
    pub parser: Parser,
}

/// A compiled layout: list of [CompiledField]s and the number of words they need.
/// Use [Layout::compile] to build from [NamedField]s, then [Layout::decode] to decode words.
#[derive(Debug, Clone)]
pub struct Layout {
    min_words: usize,
    /// Compiled fields in definition order.
    pub fields: Vec<CompiledField>,
}

impl Layout {
    /// Compiles a slice of [NamedField]s into a layout.
    ///
    /// Fails on bad geometry or empty/duplicate names.
    pub fn compile(fields: &[NamedField<'_>]) -> Result<Self, FieldError> {
        let mut compiled_fields = Vec::with_capacity(fields.len());
        let mut seen = HashSet::with_capacity(fields.len());
        let mut min_words = 0;

        for field in fields {
            if field.name.is_empty() || !seen.insert(field.name) {
                return Err(FieldError::InvalidFieldName(field.name.to_string()));
            }

            let parser = Parser::try_from(&field.spec)?;
            min_words = min_words.max(parser.min_words());

            compiled_fields.push(CompiledField {
                name: field.name.to_string(),
                spec: field.spec,
                parser,
            });
        }

        Ok(Self {
            min_words,
            fields: compiled_fields,
        })
    }

    /// Smallest word sequence every field can be read from.
    pub fn min_words(&self) -> usize {
        self.min_words
    }

    /// Looks up a compiled field by name.
    pub fn get(&self, name: &str) -> Option<&CompiledField> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Decodes `words` according to this layout. Returns a map of field names to raw values.
    pub fn decode(&self, words: &[u32]) -> Result<BTreeMap<String, u64>, ReadError> {
        if words.len() < self.min_words {
            return Err(ReadError::OutOfBounds {
                word_index: self.min_words - 1,
                len: words.len(),
            });
        }

        let mut map = BTreeMap::new();
        for field in &self.fields {
            map.insert(field.name.clone(), field.parser.extract(words)?);
        }

        Ok(map)
    }
}
