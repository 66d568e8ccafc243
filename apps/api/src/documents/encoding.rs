//! Byte-to-text conversions applied to uploads before they reach the model.

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Minimum trimmed length for decoded bytes to count as real text.
pub const MIN_DECODED_TEXT_CHARS: usize = 50;

/// A file ready to be embedded in a JSON request body.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedPayload {
    pub mime_type: String,
    pub data: String,
}

impl EncodedPayload {
    pub fn new(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: encode_base64(bytes),
        }
    }
}

/// Standard-alphabet, padded base64.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Returns the bytes as text when they are valid UTF-8 with at least
/// `MIN_DECODED_TEXT_CHARS` characters after trimming.
pub fn decode_substantive_text(bytes: &[u8]) -> Option<String> {
    let text = std::str::from_utf8(bytes).ok()?.trim();
    if text.contains('\0') || text.chars().count() < MIN_DECODED_TEXT_CHARS {
        return None;
    }
    Some(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_base64_padding() {
        assert_eq!(encode_base64(b"CV"), "Q1Y=");
        assert_eq!(encode_base64(b""), "");
    }

    #[test]
    fn test_large_buffer_encodes_fully() {
        let bytes = vec![0xAB_u8; 3 * 400_000];
        let encoded = encode_base64(&bytes);
        assert_eq!(encoded.len(), 4 * 400_000);
        assert_eq!(STANDARD.decode(encoded).unwrap(), bytes);
    }

    #[test]
    fn test_payload_keeps_mime() {
        let payload = EncodedPayload::new("image/png", b"png");
        assert_eq!(payload.mime_type, "image/png");
        assert_eq!(payload.data, "cG5n");
    }

    #[test]
    fn test_decode_substantive_text() {
        let text = "John Kila\nEducation: Grade 12, Port Moresby National High School\n";
        assert_eq!(decode_substantive_text(text.as_bytes()).as_deref(), Some(text.trim()));
    }

    #[test]
    fn test_decode_rejects_short_or_binary() {
        assert!(decode_substantive_text(b"   short   ").is_none());
        assert!(decode_substantive_text(&[0xFF, 0xFE, 0x00, 0x41]).is_none());
        let zip_like = [b"PK\x03\x04".as_slice(), &[0u8; 80][..]].concat();
        assert!(decode_substantive_text(&zip_like).is_none());
    }
}
