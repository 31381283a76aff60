//! Rendering of decoded fields into display lines.

use super::{FieldType, MetadataField};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Width the field name is right-aligned to
pub const NAME_WIDTH: usize = 40;

/// Field whose value starts with a character-code identifier
pub const USER_COMMENT: &str = "UserComment";

/// Length of the character-code identifier at the start of a user comment
pub const ENCODING_PREFIX_LEN: usize = 8;

/// One printable field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedField {
    pub name: String,
    pub field_type: FieldType,
    /// Display value with NUL bytes removed
    pub value: String,
    /// Hex form of a user comment's encoding identifier
    pub encoding: Option<String>,
}

impl fmt::Display for RenderedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(encoding) = &self.encoding {
            let label = format!("{} encoding", self.name);
            writeln!(
                f,
                "{:>width$}: {} ({})",
                label,
                encoding,
                self.field_type,
                width = NAME_WIDTH
            )?;
        }
        write!(f, "{:>width$}: {}", self.name, self.value, width = NAME_WIDTH)
    }
}

/// Render a field, or `None` when its type is not printed
pub fn render_field(field: &MetadataField) -> Option<RenderedField> {
    if !field.field_type.is_renderable() {
        return None;
    }

    let (encoding, payload) = if field.name == USER_COMMENT {
        let split = field.raw.len().min(ENCODING_PREFIX_LEN);
        let (prefix, rest) = field.raw.split_at(split);
        (Some(hex::encode(prefix)), rest)
    } else {
        (None, field.raw.as_slice())
    };

    Some(RenderedField {
        name: field.name.clone(),
        field_type: field.field_type,
        value: strip_nul(payload),
        encoding,
    })
}

fn strip_nul(bytes: &[u8]) -> String {
    let cleaned: Vec<u8> = bytes.iter().copied().filter(|b| *b != 0).collect();
    String::from_utf8_lossy(&cleaned).into_owned()
}

/// Everything printed for one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagReport {
    pub path: PathBuf,
    pub fields: Vec<RenderedField>,
}

impl TagReport {
    /// Fold a field sequence into a report, keeping only renderable fields
    pub fn from_fields<I>(path: &Path, fields: I) -> Self
    where
        I: IntoIterator<Item = MetadataField>,
    {
        let fields = fields
            .into_iter()
            .filter_map(|field| render_field(&field))
            .collect();
        Self {
            path: path.to_path_buf(),
            fields,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Path header once, then one line per field. Nothing at all for an empty report.
impl fmt::Display for TagReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fields.is_empty() {
            return Ok(());
        }
        writeln!(f, "{}", self.path.display())?;
        for field in &self.fields {
            writeln!(f, "{field}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_comment(payload: &[u8]) -> MetadataField {
        let mut raw = b"ASCII\0\0\0".to_vec();
        raw.extend_from_slice(payload);
        MetadataField::new(USER_COMMENT, FieldType::Ascii, raw)
    }

    #[test]
    fn user_comment_prefix_is_split_off() {
        let rendered = render_field(&user_comment(b"hello\0\0")).unwrap();

        assert_eq!(rendered.value, "hello");
        assert_eq!(rendered.encoding.as_deref(), Some("4153434949000000"));
        assert!(!rendered.value.contains("ASCII"));
    }

    #[test]
    fn short_user_comment_has_empty_payload() {
        let field = MetadataField::new(USER_COMMENT, FieldType::Byte, b"ASC".to_vec());
        let rendered = render_field(&field).unwrap();

        assert_eq!(rendered.value, "");
        assert_eq!(rendered.encoding.as_deref(), Some("415343"));
    }

    #[test]
    fn nul_bytes_are_stripped_everywhere() {
        let field = MetadataField::new("Artist", FieldType::Ascii, b"Ja\0ne\0Doe\0".to_vec());
        assert_eq!(render_field(&field).unwrap().value, "JaneDoe");
    }

    #[test]
    fn non_byte_types_are_skipped() {
        let short = MetadataField::new("Orientation", FieldType::Short, vec![1, 0]);
        let undefined = MetadataField::new(USER_COMMENT, FieldType::Undefined, vec![0; 12]);

        assert!(render_field(&short).is_none());
        assert!(render_field(&undefined).is_none());
    }

    #[test]
    fn user_comment_encoding_line_names_the_type() {
        let field = MetadataField::new(USER_COMMENT, FieldType::SignedByte, b"UNICODE\0x".to_vec());
        let text = render_field(&field).unwrap().to_string();

        assert!(text.lines().next().unwrap().ends_with("(signed byte)"), "{text}");
    }

    #[test]
    fn signed_bytes_render() {
        let field = MetadataField::new("XPTitle", FieldType::SignedByte, b"Title".to_vec());
        assert_eq!(render_field(&field).unwrap().value, "Title");
    }

    #[test]
    fn line_is_right_aligned() {
        let field = MetadataField::new("Make", FieldType::Ascii, b"Canon".to_vec());
        let line = render_field(&field).unwrap().to_string();

        assert_eq!(line, format!("{}Make: Canon", " ".repeat(NAME_WIDTH - 4)));
    }

    #[test]
    fn report_prints_header_once() {
        let fields = vec![
            MetadataField::new("Make", FieldType::Ascii, b"Canon".to_vec()),
            MetadataField::new("Orientation", FieldType::Short, vec![1, 0]),
            MetadataField::new("Model", FieldType::Ascii, b"EOS R5".to_vec()),
        ];
        let report = TagReport::from_fields(Path::new("/photos/a.jpg"), fields);
        let text = report.to_string();

        assert_eq!(report.fields.len(), 2);
        assert_eq!(text.matches("/photos/a.jpg").count(), 1);
        assert!(text.starts_with("/photos/a.jpg\n"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn report_without_renderable_fields_prints_nothing() {
        let fields = vec![MetadataField::new("Orientation", FieldType::Short, vec![1, 0])];
        let report = TagReport::from_fields(Path::new("/photos/a.jpg"), fields);

        assert!(report.is_empty());
        assert_eq!(report.to_string(), "");
    }

    #[test]
    fn user_comment_encoding_line_precedes_value() {
        let report = TagReport::from_fields(Path::new("c.jpg"), vec![user_comment(b"hi")]);
        let lines: Vec<_> = report.to_string().lines().map(str::to_owned).collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[1].ends_with("UserComment encoding: 4153434949000000 (ascii)"));
        assert!(lines[2].ends_with("UserComment: hi"));
    }
}
