//! # Metadata Module
//!
//! Turns the tag block embedded in an image into printable lines.
//!
//! ## Flow
//! 1. A [`MetadataDecoder`] parses the container and yields a sequence of
//!    [`MetadataField`]s (the production decoder wraps `kamadak-exif`).
//! 2. [`visitor::render_field`] maps each field to an optional display line.
//! 3. [`TagReport::from_fields`] folds the lines into one report per file.

mod decoder;
pub mod visitor;

pub use decoder::ExifDecoder;
pub use visitor::{render_field, RenderedField, TagReport};

use crate::error::DecodeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{BufRead, Seek};

/// Declared storage type of a metadata field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    Byte,
    Ascii,
    Short,
    Long,
    Rational,
    SignedByte,
    Undefined,
    SignedShort,
    SignedLong,
    SignedRational,
    Float,
    Double,
    Unknown,
}

impl FieldType {
    /// Only single-byte character-like types are printed
    pub fn is_renderable(&self) -> bool {
        matches!(self, FieldType::Byte | FieldType::SignedByte | FieldType::Ascii)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Byte => "byte",
            FieldType::Ascii => "ascii",
            FieldType::Short => "short",
            FieldType::Long => "long",
            FieldType::Rational => "rational",
            FieldType::SignedByte => "signed byte",
            FieldType::Undefined => "undefined",
            FieldType::SignedShort => "signed short",
            FieldType::SignedLong => "signed long",
            FieldType::SignedRational => "signed rational",
            FieldType::Float => "float",
            FieldType::Double => "double",
            FieldType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// One decoded metadata entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataField {
    /// Field name as reported by the decoder (e.g. "ImageDescription")
    pub name: String,
    /// Declared type
    pub field_type: FieldType,
    /// Raw value bytes
    pub raw: Vec<u8>,
}

impl MetadataField {
    pub fn new(name: impl Into<String>, field_type: FieldType, raw: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            field_type,
            raw: raw.into(),
        }
    }
}

/// Parses an image container into its metadata fields.
///
/// Implement this trait to plug in another decoder (e.g., for testing).
pub trait MetadataDecoder: Send + Sync {
    /// Sequence of fields produced by one successful decode
    type Fields: IntoIterator<Item = MetadataField>;

    /// Decode the tag block of the stream. Called at most once per file.
    fn decode<R: BufRead + Seek>(&self, reader: &mut R) -> Result<Self::Fields, DecodeError>;
}
