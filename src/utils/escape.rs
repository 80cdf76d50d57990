/// Maximum escaped-key length accepted by the decoder.
/// Anything longer is almost certainly corrupt input, not a real symbol.
const MAX_KEY_LENGTH: usize = 512;

/// Encode a display name into a search key.
///
/// Lowercase letters and digits pass through, uppercase letters are
/// lowercased, every other byte becomes `_` plus two lowercase hex digits
/// (so `_` itself becomes `_5f`).
pub fn encode_key(name: &str) -> String {
    let mut key = String::with_capacity(name.len());

    for &byte in name.as_bytes() {
        if byte.is_ascii_lowercase() || byte.is_ascii_digit() {
            key.push(byte as char);
        } else if byte.is_ascii_uppercase() {
            key.push(byte.to_ascii_lowercase() as char);
        } else {
            key.push('_');
            key.push(hex_digit(byte >> 4));
            key.push(hex_digit(byte & 0x0F));
        }
    }

    key
}

/// Decode a search key back into the normalized (lowercased) symbol name.
///
/// Returns `None` for truncated escapes, invalid hex, or byte sequences
/// that do not form valid UTF-8.
pub fn decode_key(key: &str) -> Option<String> {
    if key.len() > MAX_KEY_LENGTH {
        return None;
    }

    let bytes = key.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut pos = 0;

    while pos < bytes.len() {
        let byte = bytes[pos];
        if byte == b'_' {
            let hi = hex_value(*bytes.get(pos + 1)?)?;
            let lo = hex_value(*bytes.get(pos + 2)?)?;
            out.push((hi << 4) | lo);
            pos += 3;
        } else if byte.is_ascii_lowercase() || byte.is_ascii_digit() {
            out.push(byte);
            pos += 1;
        } else {
            // Uppercase or non-ASCII never appears in a well-formed key
            return None;
        }
    }

    String::from_utf8(out).ok()
}

fn hex_digit(value: u8) -> char {
    match value {
        0..=9 => (b'0' + value) as char,
        _ => (b'a' + value - 10) as char,
    }
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_underscore() {
        assert_eq!(encode_key("make_address"), "make_5faddress");
    }

    #[test]
    fn test_encode_lowercases() {
        assert_eq!(encode_key("IndexReader"), "indexreader");
    }

    #[test]
    fn test_encode_operator() {
        assert_eq!(encode_key("operator="), "operator_3d");
        assert_eq!(encode_key("operator=="), "operator_3d_3d");
    }

    #[test]
    fn test_decode_simple() {
        assert_eq!(decode_key("make_5faddress").unwrap(), "make_address");
        assert_eq!(decode_key("mark").unwrap(), "mark");
    }

    #[test]
    fn test_decode_rejects_truncated_escape() {
        assert!(decode_key("foo_5").is_none());
        assert!(decode_key("foo_").is_none());
    }

    #[test]
    fn test_decode_rejects_invalid_hex() {
        assert!(decode_key("foo_zz").is_none());
    }

    #[test]
    fn test_decode_rejects_uppercase() {
        assert!(decode_key("Mark").is_none());
    }

    #[test]
    fn test_roundtrip() {
        let names = [
            "make_address_v4",
            "max_size",
            "memory_writer_t",
            "operator<<",
            "operator[]",
            "merge",
            "c_str",
        ];
        for name in names {
            let key = encode_key(name);
            assert_eq!(decode_key(&key).unwrap(), *name, "key: {}", key);
        }
    }

    #[test]
    fn test_roundtrip_non_ascii() {
        // Multi-byte UTF-8 escapes byte-by-byte
        let key = encode_key("größe");
        assert_eq!(decode_key(&key).unwrap(), "größe");
    }

    #[test]
    fn test_decode_rejects_oversized() {
        let key = "a".repeat(MAX_KEY_LENGTH + 1);
        assert!(decode_key(&key).is_none());
    }
}
