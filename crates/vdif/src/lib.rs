//! # vdif
//!
//! Decoding of VDIF (VLBI Data Interchange Format) frame headers.
//!
//! Header fields are declared as `(word_index, bit_index, bit_length)`
//! geometry over a sequence of 32-bit words. Each geometry is validated once
//! when it is compiled into a [parser::Parser]; a [layout::Layout] groups
//! named parsers, and [header::VdifHeader] decodes the VDIF layout into
//! typed fields and derived quantities.
//!
//! ## Example
//!
//! ```
//! use vdif::parser::make_parser;
//!
//! let words = [14363767, 469762048, 536871541, 67239932];
//! let ref_epoch = make_parser(1, 24, 6).unwrap();
//! assert_eq!(ref_epoch.extract(&words).unwrap(), 28);
//! assert!(make_parser(1, 24, 16).is_err());
//! ```

pub mod bits;
pub mod errors;
pub mod field;
pub mod header;
pub mod layout;
pub mod parser;
#[cfg(feature = "serde")]
pub mod serde;

pub use errors::{FieldError, ReadError};
pub use header::{RawFields, StationId, VdifHeader};
pub use parser::{Parser, make_parser};
