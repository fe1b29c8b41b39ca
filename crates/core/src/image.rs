//! Embedded image encoding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47];
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8];

/// Detect the image subtype from magic bytes, defaulting to `png`.
pub fn sniff_format(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(PNG_MAGIC) {
        "png"
    } else if bytes.starts_with(JPEG_MAGIC) {
        "jpeg"
    } else {
        "png"
    }
}

/// Encode image bytes as a self-describing `data:` URI.
pub fn data_uri(bytes: &[u8]) -> String {
    format!(
        "data:image/{};base64,{}",
        sniff_format(bytes),
        STANDARD.encode(bytes)
    )
}
