//! Byte fixtures shared by unit tests.

/// JPEG SOI followed by the start of an APP0 marker, then nothing
pub const BARE_JPEG: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];

/// PNG file signature with no chunks after it
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// GIF header and logical screen descriptor, no frames
pub const GIF_HEADER: &[u8] = b"GIF89a\x01\x00\x01\x00\x00\x00\x00";

/// BMP file header start
pub const BMP_HEADER: &[u8] = b"BM\x3a\x00\x00\x00\x00\x00\x00\x00\x36\x00\x00\x00";

/// Minimal JPEG carrying an APP1 Exif segment with two IFD0 entries:
/// `ImageDescription` (ASCII) and `Orientation` (SHORT, value 1).
pub fn exif_jpeg(description: &str) -> Vec<u8> {
    let mut ascii = description.as_bytes().to_vec();
    ascii.push(0);

    let entries: u16 = 2;
    let ifd_len = 2 + 12 * entries as u32 + 4;
    let data_offset = 8 + ifd_len;

    // Little-endian TIFF header, IFD0 at offset 8
    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(&42u16.to_le_bytes());
    tiff.extend_from_slice(&8u32.to_le_bytes());
    tiff.extend_from_slice(&entries.to_le_bytes());

    // ImageDescription
    tiff.extend_from_slice(&0x010Eu16.to_le_bytes());
    tiff.extend_from_slice(&2u16.to_le_bytes());
    tiff.extend_from_slice(&(ascii.len() as u32).to_le_bytes());
    if ascii.len() <= 4 {
        let mut inline = ascii.clone();
        inline.resize(4, 0);
        tiff.extend_from_slice(&inline);
    } else {
        tiff.extend_from_slice(&data_offset.to_le_bytes());
    }

    // Orientation
    tiff.extend_from_slice(&0x0112u16.to_le_bytes());
    tiff.extend_from_slice(&3u16.to_le_bytes());
    tiff.extend_from_slice(&1u32.to_le_bytes());
    tiff.extend_from_slice(&[1, 0, 0, 0]);

    // No next IFD
    tiff.extend_from_slice(&0u32.to_le_bytes());
    if ascii.len() > 4 {
        tiff.extend_from_slice(&ascii);
    }

    wrap_app1(&tiff)
}

/// JPEG whose Exif segment holds an invalid TIFF byte-order mark
pub fn corrupt_exif_jpeg() -> Vec<u8> {
    wrap_app1(b"ZZ\x2a\x00\x08\x00\x00\x00")
}

fn wrap_app1(tiff: &[u8]) -> Vec<u8> {
    let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
    let segment_len = (2 + 6 + tiff.len()) as u16;
    jpeg.extend_from_slice(&segment_len.to_be_bytes());
    jpeg.extend_from_slice(b"Exif\0\0");
    jpeg.extend_from_slice(tiff);
    jpeg.extend_from_slice(&[0xFF, 0xD9]);
    jpeg
}
