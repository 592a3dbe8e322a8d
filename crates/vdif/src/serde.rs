//! JSON-deserializable layout description.
//!
//! These types describe where named fields sit inside a header's words. They
//! are meant to be read from a layout file and compiled into a
//! [Layout](crate::layout::Layout), which validates every field's geometry.

use serde::{Deserialize, Serialize};

use crate::{
    errors::FieldError,
    field::{FieldSpec, NamedField},
    layout::Layout,
};

/// Top-level layout definition consisting of a list of fields.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LayoutDef {
    /// Fields in decode order.
    pub fields: Vec<FieldDef>,
}

/// Description of a single field.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Becomes the key in the decoded map.
    pub name: String,
    /// Word holding the field (the low word for 64-bit fields).
    pub word_index: usize,
    /// Offset of the field's least significant bit.
    #[serde(default)]
    pub bit_index: u32,
    /// Width in bits: 1..=32, or 64 for two joined words.
    pub bit_length: u32,
}

impl TryFrom<LayoutDef> for Layout {
    type Error = FieldError;

    fn try_from(value: LayoutDef) -> Result<Self, Self::Error> {
        let fields: Vec<NamedField<'_>> = value
            .fields
            .iter()
            .map(|def| NamedField {
                name: def.name.as_str(),
                spec: FieldSpec::from(def.clone()),
            })
            .collect();

        Layout::compile(&fields)
    }
}

impl From<&Layout> for LayoutDef {
    fn from(layout: &Layout) -> Self {
        LayoutDef {
            fields: layout
                .fields
                .iter()
                .map(|field| FieldDef {
                    name: field.name.clone(),
                    word_index: field.spec.word_index,
                    bit_index: field.spec.bit_index,
                    bit_length: field.spec.bit_length,
                })
                .collect(),
        }
    }
}
