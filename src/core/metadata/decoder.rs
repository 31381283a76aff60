//! `kamadak-exif` backed decoder.

use super::{FieldType, MetadataDecoder, MetadataField};
use crate::error::DecodeError;
use exif::{Field, Reader, Value};
use std::io::{BufRead, ErrorKind, Seek};

/// Decodes EXIF blocks from JPEG, TIFF, PNG, WebP and HEIF containers
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifDecoder;

impl MetadataDecoder for ExifDecoder {
    type Fields = Vec<MetadataField>;

    fn decode<R: BufRead + Seek>(&self, reader: &mut R) -> Result<Self::Fields, DecodeError> {
        let exif = Reader::new()
            .read_from_container(reader)
            .map_err(DecodeError::from)?;
        Ok(exif.fields().map(field_from_exif).collect())
    }
}

/// Container-level messages meaning the stream ran out before a tag block
/// was found, or the container cannot carry one at all.
///
/// `kamadak-exif` rewrites `UnexpectedEof` from its container parsers into
/// these, so they are matched by text.
const END_OF_CONTAINER: &[&str] = &[
    "Broken JPEG file",
    "Broken PNG file",
    "Broken WebP file",
    "Broken HEIF file",
    "Unknown image format",
];

impl From<exif::Error> for DecodeError {
    fn from(err: exif::Error) -> Self {
        match err {
            exif::Error::Io(e) if e.kind() == ErrorKind::UnexpectedEof => {
                DecodeError::NoMetadata(e.to_string())
            }
            exif::Error::Io(e) => DecodeError::Io(e),
            exif::Error::NotFound(container) => {
                DecodeError::NoMetadata(format!("no tag block in {container}"))
            }
            exif::Error::InvalidFormat(msg) if END_OF_CONTAINER.contains(&msg) => {
                DecodeError::NoMetadata(msg.to_string())
            }
            other => DecodeError::Malformed(other.to_string()),
        }
    }
}

fn field_from_exif(field: &Field) -> MetadataField {
    let (field_type, raw) = flatten_value(&field.value);
    MetadataField {
        name: field.tag.to_string(),
        field_type,
        raw,
    }
}

/// Map a decoded value back to its declared type and little-endian bytes
fn flatten_value(value: &Value) -> (FieldType, Vec<u8>) {
    match value {
        Value::Byte(v) => (FieldType::Byte, v.clone()),
        // Components were split on NUL by the decoder
        Value::Ascii(parts) => (FieldType::Ascii, parts.join(&0u8)),
        Value::SByte(v) => (FieldType::SignedByte, v.iter().map(|b| *b as u8).collect()),
        Value::Undefined(v, _) => (FieldType::Undefined, v.clone()),
        Value::Short(v) => (FieldType::Short, v.iter().flat_map(|n| n.to_le_bytes()).collect()),
        Value::Long(v) => (FieldType::Long, v.iter().flat_map(|n| n.to_le_bytes()).collect()),
        Value::SShort(v) => (
            FieldType::SignedShort,
            v.iter().flat_map(|n| n.to_le_bytes()).collect(),
        ),
        Value::SLong(v) => (
            FieldType::SignedLong,
            v.iter().flat_map(|n| n.to_le_bytes()).collect(),
        ),
        Value::Rational(v) => (
            FieldType::Rational,
            v.iter()
                .flat_map(|r| [r.num.to_le_bytes(), r.denom.to_le_bytes()])
                .flatten()
                .collect(),
        ),
        Value::SRational(v) => (
            FieldType::SignedRational,
            v.iter()
                .flat_map(|r| [r.num.to_le_bytes(), r.denom.to_le_bytes()])
                .flatten()
                .collect(),
        ),
        Value::Float(v) => (FieldType::Float, v.iter().flat_map(|n| n.to_le_bytes()).collect()),
        Value::Double(v) => (FieldType::Double, v.iter().flat_map(|n| n.to_le_bytes()).collect()),
        Value::Unknown(..) => (FieldType::Unknown, Vec::new()),
    }
}
