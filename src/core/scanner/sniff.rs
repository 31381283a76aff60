//! Image detection from leading bytes.
//!
//! The decision never looks at the file extension: a renamed JPEG is still an
//! image and a `.jpg` full of text is not.

use image::ImageFormat;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Bytes read from the start of a file before deciding
pub const SNIFF_LEN: usize = 512;

/// Read up to [`SNIFF_LEN`] bytes from the current position of `reader`
pub fn read_prefix<R: Read>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut prefix = Vec::with_capacity(SNIFF_LEN);
    reader.take(SNIFF_LEN as u64).read_to_end(&mut prefix)?;
    Ok(prefix)
}

/// Detect the image format of the file at `path` from its first bytes
pub fn detect_format(path: &Path) -> io::Result<Option<ImageFormat>> {
    let mut file = File::open(path)?;
    let prefix = read_prefix(&mut file)?;
    Ok(image::guess_format(&prefix).ok())
}

/// Whether the prefix denotes an image
pub fn is_image_prefix(prefix: &[u8]) -> bool {
    image::guess_format(prefix).is_ok()
}

/// Whether the file at `path` is an image. Unreadable files are not.
pub fn is_image(path: &Path) -> bool {
    match detect_format(path) {
        Ok(format) => format.is_some(),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "cannot sniff file");
            false
        }
    }
}
